//! Optional capabilities of a [`SmallAny`].
//!
//! A container's features are a nested list of feature nodes, ending in `()`:
//!
//! ```
//! use smallany::SmallAny;
//! use smallany::features::{StrictEq, StrictHash, StrictLess, StrictStreamed};
//!
//! type Key = SmallAny<16, StrictLess<StrictEq<StrictHash<StrictStreamed>>>>;
//!
//! let a = Key::new(3);
//! let b = Key::new(10);
//! assert!(a < b);
//! assert_ne!(a, b);
//! assert_eq!(a.to_string(), "3");
//! ```
//!
//! Each node places a bound on the types the container admits, may add slots to the
//! per-type operation table, and may add operations to the container. A type that does not
//! satisfy a node's bound is rejected when the program is built:
//!
//! ```compile_fail
//! use smallany::SmallAny;
//! use smallany::features::StrictLess;
//!
//! struct Opaque;
//!
//! // `Opaque` has no ordering.
//! let _ = SmallAny::<16, StrictLess>::new_unique(Opaque);
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::ops::Add;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::Error;
use crate::smallany::SmallAny;
use crate::space::Storage;
use crate::table::Buf;
use crate::variant::{Member, Variant, VariantSet};

/// A list of features, as used by the second parameter of [`SmallAny`].
pub trait Features: 'static {
    /// Minimum inline space the container must provide.
    type Space: 'static;

    /// Whether every admitted type must be stored inline.
    const INPLACE_ONLY: bool;

    /// Slots added to each operation table.
    type Slots<S: Storage>: Send + Sync + 'static;
}

/// Implemented by feature lists that can store values of type `T`.
///
/// Admission is decided by the feature nodes of this crate only, so the bound of a node such
/// as [`ThreadSafe`] cannot be bypassed for a particular type:
///
/// ```compile_fail
/// use std::rc::Rc;
/// use smallany::features::{Admits, Features, ThreadSafe};
/// use smallany::space::Storage;
///
/// struct Local(Rc<u8>);
///
/// impl<Next: Features> Admits<Local> for ThreadSafe<Next> {
///     fn slots<S: Storage>() -> Self::Slots<S> {
///         unimplemented!()
///     }
/// }
/// ```
pub trait Admits<T: 'static>: Features + sealed::Admission<T> {
    /// Builds the feature slots of `T`'s operation table.
    fn slots<S: Storage>() -> Self::Slots<S>;
}

mod sealed {
    /// Bounds a feature list places on stored types.
    pub trait Admission<T> {}

    /// Lists that contain a [`ThreadSafe`](super::ThreadSafe) node.
    pub trait ThreadSafeList {}
}

impl Features for () {
    type Space = ();
    const INPLACE_ONLY: bool = false;
    type Slots<S: Storage> = ();
}

impl<T: 'static> sealed::Admission<T> for () {}

impl<T: 'static> Admits<T> for () {
    fn slots<S: Storage>() -> Self::Slots<S> {}
}

/// Compares values of the stored type.
pub type CmpFn<S> = unsafe fn(&S, &S) -> Option<Ordering>;
/// Tests values of the stored type for equality.
pub type EqFn<S> = unsafe fn(&S, &S) -> bool;
/// Feeds a value of the stored type into a hasher.
pub type HashFn<S> = unsafe fn(&S, &mut dyn Hasher);
/// Writes a value of the stored type.
pub type StreamFn<S> = unsafe fn(&S, &mut fmt::Formatter<'_>) -> fmt::Result;
/// Places the sum of two values of the stored type into an empty storage.
pub type AddFn<S> = unsafe fn(&mut S, &S, &S);

macro_rules! feature {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<Next = ()>(PhantomData<Next>);
    };
}

feature! {
    /// Ordering between values of the same type: `partial_cmp`, and `<` with [`StrictEq`].
    StrictLess
}
feature! {
    /// Equality between values of the same type: `==`.
    StrictEq
}
feature! {
    /// Hashing of the stored value, for use as a `HashMap` key.
    StrictHash
}
feature! {
    /// `Display` for the container, writing values that implement [`Streamable`].
    Streamed
}
feature! {
    /// `Display` for the container; every stored type must implement `Display`.
    StrictStreamed
}
feature! {
    /// Addition of two containers holding the same type: `+`.
    StrictAdd
}
feature! {
    /// Only types that fit the inline space are admitted; nothing goes to the heap.
    ///
    /// ```compile_fail
    /// use smallany::SmallAny;
    /// use smallany::features::StrictInplace;
    ///
    /// let mut a = SmallAny::<8, StrictInplace>::empty();
    /// a.set([0u64; 4]);
    /// ```
    StrictInplace
}
feature! {
    /// Makes the container `Send + Sync`; every stored type must be `Send + Sync`.
    ///
    /// ```compile_fail
    /// use std::rc::Rc;
    /// use smallany::SmallAny;
    /// use smallany::features::ThreadSafe;
    ///
    /// let _ = SmallAny::<16, ThreadSafe>::new(Rc::new(1));
    /// ```
    ThreadSafe
}

impl<Next: Features> Features for StrictLess<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = (CmpFn<S>, Next::Slots<S>);
}

impl<T: PartialOrd + 'static, Next: Admits<T>> sealed::Admission<T> for StrictLess<Next> {}

impl<T: PartialOrd + 'static, Next: Admits<T>> Admits<T> for StrictLess<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        let cmp: CmpFn<S> = cmp::<T, S>;
        (cmp, Next::slots::<S>())
    }
}

impl<Next: Features> Features for StrictEq<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = (EqFn<S>, Next::Slots<S>);
}

impl<T: PartialEq + 'static, Next: Admits<T>> sealed::Admission<T> for StrictEq<Next> {}

impl<T: PartialEq + 'static, Next: Admits<T>> Admits<T> for StrictEq<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        let eq: EqFn<S> = eq::<T, S>;
        (eq, Next::slots::<S>())
    }
}

impl<Next: Features> Features for StrictHash<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = (HashFn<S>, Next::Slots<S>);
}

impl<T: Hash + 'static, Next: Admits<T>> sealed::Admission<T> for StrictHash<Next> {}

impl<T: Hash + 'static, Next: Admits<T>> Admits<T> for StrictHash<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        let hash: HashFn<S> = hash::<T, S>;
        (hash, Next::slots::<S>())
    }
}

impl<Next: Features> Features for Streamed<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = (StreamFn<S>, Next::Slots<S>);
}

impl<T: Streamable + 'static, Next: Admits<T>> sealed::Admission<T> for Streamed<Next> {}

impl<T: Streamable + 'static, Next: Admits<T>> Admits<T> for Streamed<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        let stream: StreamFn<S> = stream::<T, S>;
        (stream, Next::slots::<S>())
    }
}

impl<Next: Features> Features for StrictStreamed<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = (StreamFn<S>, Next::Slots<S>);
}

impl<T: fmt::Display + 'static, Next: Admits<T>> sealed::Admission<T> for StrictStreamed<Next> {}

impl<T: fmt::Display + 'static, Next: Admits<T>> Admits<T> for StrictStreamed<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        let display: StreamFn<S> = display::<T, S>;
        (display, Next::slots::<S>())
    }
}

impl<Next: Features> Features for StrictAdd<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = (AddFn<S>, Next::Slots<S>);
}

impl<T: Add<Output = T> + Clone + 'static, Next: Admits<T>> sealed::Admission<T> for StrictAdd<Next> {}

impl<T: Add<Output = T> + Clone + 'static, Next: Admits<T>> Admits<T> for StrictAdd<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        let add: AddFn<S> = add::<T, S>;
        (add, Next::slots::<S>())
    }
}

impl<Next: Features> Features for StrictInplace<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = true;
    type Slots<S: Storage> = ((), Next::Slots<S>);
}

impl<T: 'static, Next: Admits<T>> sealed::Admission<T> for StrictInplace<Next> {}

impl<T: 'static, Next: Admits<T>> Admits<T> for StrictInplace<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        ((), Next::slots::<S>())
    }
}

impl<Next: Features> Features for ThreadSafe<Next> {
    type Space = Next::Space;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = ((), Next::Slots<S>);
}

impl<T: Send + Sync + 'static, Next: Admits<T>> sealed::Admission<T> for ThreadSafe<Next> {}

impl<T: Send + Sync + 'static, Next: Admits<T>> Admits<T> for ThreadSafe<Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        ((), Next::slots::<S>())
    }
}

// The variant node only restricts admission and widens the inline space.
impl<V: VariantSet, Next: Features> Features for Variant<V, Next> {
    type Space = crate::space::Max<V::Space, Next::Space>;
    const INPLACE_ONLY: bool = Next::INPLACE_ONLY;
    type Slots<S: Storage> = ((), Next::Slots<S>);
}

impl<T: Member<V> + 'static, V: VariantSet, Next: Admits<T>> sealed::Admission<T> for Variant<V, Next> {}

impl<T: Member<V> + 'static, V: VariantSet, Next: Admits<T>> Admits<T> for Variant<V, Next> {
    fn slots<S: Storage>() -> Self::Slots<S> {
        ((), Next::slots::<S>())
    }
}

unsafe fn cmp<T: PartialOrd, S: Storage>(a: &S, b: &S) -> Option<Ordering> {
    a.get::<T>().partial_cmp(b.get::<T>())
}

unsafe fn eq<T: PartialEq, S: Storage>(a: &S, b: &S) -> bool {
    a.get::<T>() == b.get::<T>()
}

unsafe fn hash<T: Hash, S: Storage>(a: &S, mut state: &mut dyn Hasher) {
    a.get::<T>().hash(&mut state);
}

unsafe fn stream<T: Streamable, S: Storage>(a: &S, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    a.get::<T>().stream(f)
}

unsafe fn display<T: fmt::Display, S: Storage>(a: &S, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(a.get::<T>(), f)
}

unsafe fn add<T: Add<Output = T> + Clone, S: Storage>(out: &mut S, a: &S, b: &S) {
    let sum = a.get::<T>().clone() + b.get::<T>().clone();
    out.put(sum);
}

/// Containers whose features include [`StrictLess`].
pub trait HasLess: Features {
    /// The comparison slot.
    fn cmp_slot<S: Storage>(slots: &Self::Slots<S>) -> CmpFn<S>;
}

/// Containers whose features include [`StrictEq`].
pub trait HasEq: Features {
    /// The equality slot.
    fn eq_slot<S: Storage>(slots: &Self::Slots<S>) -> EqFn<S>;
}

/// Containers whose features include [`StrictHash`].
pub trait HasHash: Features {
    /// The hashing slot.
    fn hash_slot<S: Storage>(slots: &Self::Slots<S>) -> HashFn<S>;
}

/// Containers whose features include [`Streamed`] or [`StrictStreamed`].
pub trait HasStream: Features {
    /// The formatting slot.
    fn stream_slot<S: Storage>(slots: &Self::Slots<S>) -> StreamFn<S>;
}

/// Containers whose features include [`StrictAdd`].
pub trait HasAdd: Features {
    /// The addition slot.
    fn add_slot<S: Storage>(slots: &Self::Slots<S>) -> AddFn<S>;
}

/// Containers whose features include [`ThreadSafe`].
///
/// Only the feature nodes of this crate implement it; a foreign node cannot claim thread
/// safety without the [`ThreadSafe`] admission bound:
///
/// ```compile_fail
/// use smallany::features::{Features, HasThreadSafe};
/// use smallany::space::Storage;
///
/// struct Forged;
///
/// impl Features for Forged {
///     type Space = ();
///     const INPLACE_ONLY: bool = false;
///     type Slots<S: Storage> = ();
/// }
///
/// impl HasThreadSafe for Forged {}
/// ```
pub trait HasThreadSafe: Features + sealed::ThreadSafeList {}

macro_rules! provide {
    ($cap:ident, $slot:ident -> $ret:ident for $($node:ident),+) => {$(
        impl<Next: Features> $cap for $node<Next> {
            #[inline]
            fn $slot<S: Storage>(slots: &Self::Slots<S>) -> $ret<S> {
                slots.0
            }
        }
    )+};
}

macro_rules! forward {
    ($cap:ident, $slot:ident -> $ret:ident for $($node:ident $(<$v:ident: $bound:ident>)?),+) => {$(
        impl<$($v: $bound,)? Next: $cap> $cap for $node<$($v,)? Next> {
            #[inline]
            fn $slot<S: Storage>(slots: &Self::Slots<S>) -> $ret<S> {
                Next::$slot::<S>(&slots.1)
            }
        }
    )+};
}

macro_rules! forward_thread_safe {
    ($($node:ident $(<$v:ident: $bound:ident>)?),+) => {$(
        impl<$($v: $bound,)? Next: HasThreadSafe> sealed::ThreadSafeList for $node<$($v,)? Next> {}
        impl<$($v: $bound,)? Next: HasThreadSafe> HasThreadSafe for $node<$($v,)? Next> {}
    )+};
}

provide!(HasLess, cmp_slot -> CmpFn for StrictLess);
forward!(HasLess, cmp_slot -> CmpFn for
    StrictEq, StrictHash, Streamed, StrictStreamed, StrictAdd, StrictInplace, ThreadSafe,
    Variant<V: VariantSet>);

provide!(HasEq, eq_slot -> EqFn for StrictEq);
forward!(HasEq, eq_slot -> EqFn for
    StrictLess, StrictHash, Streamed, StrictStreamed, StrictAdd, StrictInplace, ThreadSafe,
    Variant<V: VariantSet>);

provide!(HasHash, hash_slot -> HashFn for StrictHash);
forward!(HasHash, hash_slot -> HashFn for
    StrictLess, StrictEq, Streamed, StrictStreamed, StrictAdd, StrictInplace, ThreadSafe,
    Variant<V: VariantSet>);

provide!(HasStream, stream_slot -> StreamFn for Streamed, StrictStreamed);
forward!(HasStream, stream_slot -> StreamFn for
    StrictLess, StrictEq, StrictHash, StrictAdd, StrictInplace, ThreadSafe,
    Variant<V: VariantSet>);

provide!(HasAdd, add_slot -> AddFn for StrictAdd);
forward!(HasAdd, add_slot -> AddFn for
    StrictLess, StrictEq, StrictHash, Streamed, StrictStreamed, StrictInplace, ThreadSafe,
    Variant<V: VariantSet>);

impl<Next: Features> sealed::ThreadSafeList for ThreadSafe<Next> {}
impl<Next: Features> HasThreadSafe for ThreadSafe<Next> {}
forward_thread_safe!(
    StrictLess, StrictEq, StrictHash, Streamed, StrictStreamed, StrictAdd, StrictInplace,
    Variant<V: VariantSet>);

/// Values that [`Streamed`] containers can write.
///
/// The default method writes nothing, so any type can opt in with an empty impl. The standard
/// library's `Display` types write themselves, smart pointers write their pointee, and
/// collections, options, arrays and tuples write nothing.
///
/// ```
/// use smallany::SmallAny;
/// use smallany::features::{Streamable, Streamed};
///
/// #[derive(Clone)]
/// struct Silent;
/// impl Streamable for Silent {}
///
/// let a = SmallAny::<16, Streamed>::new(Silent);
/// let b = SmallAny::<16, Streamed>::new(42u8);
/// let c = SmallAny::<16, Streamed>::new(vec![1, 2, 3]);
/// assert_eq!(format!("[{}] [{}] [{}]", a, b, c), "[] [42] []");
/// ```
pub trait Streamable {
    /// Writes the value, or nothing.
    fn stream(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

macro_rules! streamable_display {
    ($($ty:ty),* $(,)?) => {$(
        impl Streamable for $ty {
            fn stream(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    )*};
}

streamable_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    str, String, &'static str, Cow<'static, str>,
    IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
);

macro_rules! streamable_pointer {
    ($($ptr:ident),*) => {$(
        impl<T: Streamable + ?Sized> Streamable for $ptr<T> {
            fn stream(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                (**self).stream(f)
            }
        }
    )*};
}

streamable_pointer!(Box, Rc, Arc);

macro_rules! streamable_silent {
    ($(<$($p:ident $(: ?$unsized:ident)?),*> $ty:ty),* $(,)?) => {$(
        impl<$($p $(: ?$unsized)?),*> Streamable for $ty {}
    )*};
}

streamable_silent!(
    <T> Vec<T>,
    <T> VecDeque<T>,
    <T> Option<T>,
    <T, E> Result<T, E>,
    <K, V, H> HashMap<K, V, H>,
    <T, H> HashSet<T, H>,
    <K, V> BTreeMap<K, V>,
    <T> BTreeSet<T>,
    <T: ?Sized> PhantomData<T>,
);

impl<T, const N: usize> Streamable for [T; N] {}

macro_rules! streamable_tuple {
    ($(($($t:ident),*)),* $(,)?) => {$(
        impl<$($t),*> Streamable for ($($t,)*) {}
    )*};
}

streamable_tuple!(
    (),
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, G),
    (A, B, C, D, E, G, H),
    (A, B, C, D, E, G, H, I),
);

impl<const N: usize, F: HasLess> SmallAny<N, F> {
    /// Compares two values of the same type.
    ///
    /// Fails if either container is empty or the stored types differ.
    pub fn try_cmp(&self, other: &Self) -> Result<Option<Ordering>, Error> {
        let table = self.same_table(other, "<")?;
        Ok(unsafe { (F::cmp_slot::<Buf<N, F>>(&table.features))(&self.storage, &other.storage) })
    }

    /// `self < other`, for two values of the same type.
    pub fn try_lt(&self, other: &Self) -> Result<bool, Error> {
        Ok(self.try_cmp(other)? == Some(Ordering::Less))
    }
}

/// # Panics
///
/// Comparing an empty container, or two containers holding different types, panics.
/// Use [`SmallAny::try_cmp`] to handle these cases.
impl<const N: usize, F: HasLess + HasEq> PartialOrd for SmallAny<N, F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).unwrap_or_else(|err| panic!("{}", err))
    }
}

impl<const N: usize, F: HasEq> SmallAny<N, F> {
    /// `self == other`, for two values of the same type.
    ///
    /// Fails if either container is empty or the stored types differ.
    pub fn try_eq(&self, other: &Self) -> Result<bool, Error> {
        let table = self.same_table(other, "==")?;
        Ok(unsafe { (F::eq_slot::<Buf<N, F>>(&table.features))(&self.storage, &other.storage) })
    }
}

/// # Panics
///
/// Comparing an empty container, or two containers holding different types, panics.
/// Use [`SmallAny::try_eq`] to handle these cases.
impl<const N: usize, F: HasEq> PartialEq for SmallAny<N, F> {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or_else(|err| panic!("{}", err))
    }
}

// Admitted types are both `PartialEq` and `Hash`, which is what hash keys rely on.
impl<const N: usize, F: HasEq + HasHash> Eq for SmallAny<N, F> {}

impl<const N: usize, F: HasHash> SmallAny<N, F> {
    /// Hash of the stored value, computed with the standard library's default hasher.
    pub fn try_hash(&self) -> Result<u64, Error> {
        let table = self.table.ok_or(Error::Empty { op: "hash" })?;
        let mut hasher = DefaultHasher::new();
        unsafe { (F::hash_slot::<Buf<N, F>>(&table.features))(&self.storage, &mut hasher) };
        Ok(hasher.finish())
    }
}

/// # Panics
///
/// Hashing an empty container panics.
impl<const N: usize, F: HasHash> Hash for SmallAny<N, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.table {
            Some(table) => unsafe { (F::hash_slot::<Buf<N, F>>(&table.features))(&self.storage, state) },
            None => panic!("{}", Error::Empty { op: "hash" }),
        }
    }
}

/// Writes the stored value; an empty container writes nothing.
impl<const N: usize, F: HasStream> fmt::Display for SmallAny<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.table {
            Some(table) => unsafe { (F::stream_slot::<Buf<N, F>>(&table.features))(&self.storage, f) },
            None => Ok(()),
        }
    }
}

impl<const N: usize, F: HasAdd> SmallAny<N, F> {
    /// A new container holding `self + rhs`, for two values of the same type.
    ///
    /// Fails if either container is empty or the stored types differ.
    pub fn try_add(&self, rhs: &Self) -> Result<Self, Error> {
        let table = self.same_table(rhs, "+")?;
        let mut sum = Self::empty();
        unsafe { (F::add_slot::<Buf<N, F>>(&table.features))(&mut sum.storage, &self.storage, &rhs.storage) };
        sum.table = Some(table);
        Ok(sum)
    }
}

/// # Panics
///
/// Adding an empty container, or two containers holding different types, panics.
/// Use [`SmallAny::try_add`] to handle these cases.
impl<'a, const N: usize, F: HasAdd> Add<&'a SmallAny<N, F>> for &'a SmallAny<N, F> {
    type Output = SmallAny<N, F>;

    fn add(self, rhs: &'a SmallAny<N, F>) -> SmallAny<N, F> {
        self.try_add(rhs).unwrap_or_else(|err| panic!("{}", err))
    }
}

impl<const N: usize, F: HasAdd> Add for SmallAny<N, F> {
    type Output = SmallAny<N, F>;

    fn add(self, rhs: SmallAny<N, F>) -> SmallAny<N, F> {
        &self + &rhs
    }
}

// Every admitted type is `Send + Sync`.
unsafe impl<const N: usize, F: HasThreadSafe> Send for SmallAny<N, F> {}
unsafe impl<const N: usize, F: HasThreadSafe> Sync for SmallAny<N, F> {}
