//! Containers restricted to an explicit list of types.

use std::marker::PhantomData;

/// A closed set of types, declared with [`variant_set!`](crate::variant_set).
pub trait VariantSet: 'static {
    /// Space large enough for every member.
    type Space: 'static;
}

/// Implemented by each member type of the variant set `V`.
pub trait Member<V: VariantSet> {}

/// Admits only the members of `V`, and widens the inline space to fit the largest of them.
///
/// ```
/// use smallany::SmallAny;
/// use smallany::variant::Variant;
///
/// smallany::variant_set!(pub Scalars = i32, i64, String);
///
/// let mut a = SmallAny::<0, Variant<Scalars>>::empty();
/// assert_eq!(SmallAny::<0, Variant<Scalars>>::in_place_capacity(), std::mem::size_of::<String>());
/// a.set(456_i32);
/// a.set(String::from("this is a string"));
/// assert!(a.inplace());
/// ```
///
/// Other types are rejected when the program is built:
///
/// ```compile_fail
/// use smallany::SmallAny;
/// use smallany::variant::Variant;
///
/// smallany::variant_set!(pub Scalars = i32, i64, String);
///
/// let mut a = SmallAny::<0, Variant<Scalars>>::empty();
/// a.set(5.6);
/// ```
pub struct Variant<V, Next = ()>(PhantomData<(V, Next)>);

/// Declares a [`VariantSet`] and its members.
///
/// ```
/// smallany::variant_set! {
///     /// Numbers and text.
///     pub Scalars = i32, i64, String
/// }
/// ```
#[macro_export]
macro_rules! variant_set {
    ($(#[$meta:meta])* $vis:vis $name:ident = $($ty:ty),+ $(,)?) => {
        $(#[$meta])*
        $vis enum $name {}

        impl $crate::variant::VariantSet for $name {
            type Space = $crate::__variant_space!($($ty),+);
        }

        $(
            impl $crate::variant::Member<$name> for $ty {}
        )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __variant_space {
    ($ty:ty) => { $ty };
    ($ty:ty, $($rest:ty),+) => { $crate::space::Max<$ty, $crate::__variant_space!($($rest),+)> };
}
