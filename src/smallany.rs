use std::any::TypeId;
use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::ptr;

use crate::error::Error;
use crate::features::{Admits, Features};
use crate::space::{fits, Buffer, Storage};
use crate::table::{Buf, Cloneable, Cloning, Table, Unique};
use crate::type_name::type_name;

/// A type-erased value, stored inline when it fits in `N` bytes and on the heap otherwise.
///
/// `F` is the list of [features](crate::features) of the container. Containers with different
/// `N` or `F` are distinct types.
///
/// # Example
///
/// ```
/// use smallany::SmallAny;
///
/// let mut a: SmallAny<16> = SmallAny::new(345);
/// assert_eq!(a.cast_ref::<i32>(), Ok(&345));
/// assert!(a.cast_ref::<i64>().is_err());
/// assert!(a.inplace());
///
/// a.set(String::from("too large for sixteen bytes"));
/// assert!(!a.inplace());
/// assert_eq!(a.downcast_ref::<String>().map(String::len), Some(27));
/// ```
pub struct SmallAny<const N: usize = 16, F: Features = ()> {
    pub(crate) table: Option<&'static Table<N, F>>,
    pub(crate) storage: Buf<N, F>,
}

/// Type identity of an empty container.
enum NoType {}

impl<const N: usize, F: Features> SmallAny<N, F> {
    const VALID: () = assert!(
        Buf::<N, F>::CAPACITY >= mem::size_of::<*mut u8>(),
        "inline capacity must hold at least a pointer"
    );

    /// An empty container.
    ///
    /// The inline space must be able to hold a heap pointer:
    ///
    /// ```compile_fail
    /// let _ = smallany::SmallAny::<4>::empty();
    /// ```
    pub const fn empty() -> Self {
        let () = Self::VALID;
        SmallAny {
            table: None,
            storage: Buffer::uninit(),
        }
    }

    /// Stores `val`, inline if it fits.
    ///
    /// # Example
    ///
    /// ```
    /// use smallany::SmallAny;
    ///
    /// let small: SmallAny<16> = SmallAny::new([0usize; 2]);
    /// let large: SmallAny<16> = SmallAny::new([1usize; 8]);
    ///
    /// assert!(small.inplace());
    /// assert!(!large.inplace());
    /// ```
    pub fn new<T: Clone + 'static>(val: T) -> Self
    where
        F: Admits<T>,
    {
        let mut this = Self::empty();
        this.init::<T, Cloneable>(val);
        this
    }

    /// Stores `val`, which need not be `Clone`. Cloning the container then fails.
    pub fn new_unique<T: 'static>(val: T) -> Self
    where
        F: Admits<T>,
    {
        let mut this = Self::empty();
        this.init::<T, Unique>(val);
        this
    }

    /// Stores a `T` converted from `val`.
    ///
    /// Use it when the argument's type differs from the type to store:
    ///
    /// ```
    /// use smallany::SmallAny;
    ///
    /// let a = SmallAny::<32>::new_as::<String, _>("text");
    /// assert!(a.is::<String>());
    /// ```
    pub fn new_as<T: Clone + 'static, U: Into<T>>(val: U) -> Self
    where
        F: Admits<T>,
    {
        Self::new(val.into())
    }

    /// Stores `val` in an empty container.
    fn init<T: 'static, C: Cloning<T>>(&mut self, val: T) -> &mut T
    where
        F: Admits<T>,
    {
        const {
            assert!(
                !F::INPLACE_ONLY || fits::<T>(Buf::<N, F>::CAPACITY, Buf::<N, F>::ALIGN),
                "type does not fit the inline space of an inplace-only container"
            )
        };
        let table = Table::<N, F>::of::<T, C>();
        let slot = unsafe { self.storage.put(val) };
        self.table = Some(table);
        slot
    }

    /// Replaces the stored value with `val`.
    ///
    /// If the container already holds a `T`, the new value is assigned in place and the
    /// operation table is kept.
    pub fn set<T: Clone + 'static>(&mut self, val: T)
    where
        F: Admits<T>,
    {
        self.assign_value::<T, Cloneable>(val);
    }

    /// Replaces the stored value with `val`, which need not be `Clone`.
    pub fn set_unique<T: 'static>(&mut self, val: T)
    where
        F: Admits<T>,
    {
        self.assign_value::<T, Unique>(val);
    }

    fn assign_value<T: 'static, C: Cloning<T>>(&mut self, val: T)
    where
        F: Admits<T>,
    {
        if let Some(table) = self.table {
            if table.type_id == TypeId::of::<T>() {
                let val = ManuallyDrop::new(val);
                unsafe { (table.assign_move)(&mut self.storage, ptr::from_ref(&*val).cast()) };
                // a cloneable value may replace a unique one of the same type
                if table.cloneable != <C as Cloning<T>>::CLONEABLE {
                    self.table = Some(Table::<N, F>::of::<T, C>());
                }
                return;
            }
        }
        self.reset();
        self.init::<T, C>(val);
    }

    /// Replaces the stored value with `val` and returns a reference to it.
    pub fn emplace<T: Clone + 'static>(&mut self, val: T) -> &mut T
    where
        F: Admits<T>,
    {
        self.replace_with::<T, Cloneable>(move || val)
    }

    /// Replaces the stored value with the result of `make` and returns a reference to it.
    ///
    /// If the container already holds a `T`, its memory is reused.
    ///
    /// ```
    /// use smallany::SmallAny;
    ///
    /// let mut a = SmallAny::<16>::new(vec![1, 2, 3]);
    /// a.emplace_with(|| vec![4u8; 2]).push(5);
    /// assert_eq!(a.downcast_ref::<Vec<u8>>(), Some(&vec![4, 4, 5]));
    /// ```
    pub fn emplace_with<T: Clone + 'static>(&mut self, make: impl FnOnce() -> T) -> &mut T
    where
        F: Admits<T>,
    {
        self.replace_with::<T, Cloneable>(make)
    }

    /// Replaces the stored value with `val`, which need not be `Clone`.
    pub fn emplace_unique<T: 'static>(&mut self, val: T) -> &mut T
    where
        F: Admits<T>,
    {
        self.replace_with::<T, Unique>(move || val)
    }

    fn replace_with<T: 'static, C: Cloning<T>>(&mut self, make: impl FnOnce() -> T) -> &mut T
    where
        F: Admits<T>,
    {
        let val = make();
        match self.table {
            Some(old) if old.type_id == TypeId::of::<T>() => {
                let table = if old.cloneable == <C as Cloning<T>>::CLONEABLE {
                    old
                } else {
                    Table::<N, F>::of::<T, C>()
                };
                unsafe {
                    (old.destroy)(&mut self.storage);
                    self.table = Some(table);
                    self.storage.overwrite(val)
                }
            }
            _ => {
                self.reset();
                self.init::<T, C>(val)
            }
        }
    }

    /// Moves the value out into a new container, leaving this one empty.
    pub fn take(&mut self) -> Self {
        let mut out = Self::empty();
        if let Some(table) = self.table.take() {
            unsafe { (table.relocate)(&mut out.storage, &mut self.storage) };
            out.table = Some(table);
        }
        out
    }

    /// Clones the container.
    ///
    /// Fails if the value was stored without `Clone`.
    pub fn try_clone(&self) -> Result<Self, Error> {
        let mut out = Self::empty();
        if let Some(table) = self.table {
            unsafe { (table.clone)(&mut out.storage, &self.storage)? };
            out.table = Some(table);
        }
        Ok(out)
    }

    /// Replaces the stored value with a clone of `src`'s.
    ///
    /// A value of the same type is assigned in place. On failure the container is unchanged.
    pub fn try_clone_from(&mut self, src: &Self) -> Result<(), Error> {
        let Some(from) = src.table else {
            self.reset();
            return Ok(());
        };
        match self.table {
            Some(to) if to.type_id == from.type_id => {
                unsafe { (from.assign_clone)(&mut self.storage, &src.storage)? };
                self.table = Some(from);
                Ok(())
            }
            _ if !from.cloneable => Err(Error::NotCloneable {
                type_name: from.type_name,
            }),
            _ => {
                self.reset();
                unsafe { (from.clone)(&mut self.storage, &src.storage)? };
                self.table = Some(from);
                Ok(())
            }
        }
    }

    /// Replaces the stored value with `src`'s, leaving nothing behind in `src`.
    ///
    /// A value of the same type is assigned in place.
    pub fn assign(&mut self, mut src: Self) {
        let Some(from) = src.table.take() else {
            self.reset();
            return;
        };
        match self.table {
            Some(to) if to.type_id == from.type_id => {
                unsafe {
                    let val = src.storage.value_ptr(from.inplace);
                    (to.assign_move)(&mut self.storage, val);
                    if !from.inplace {
                        src.storage.release(from.layout);
                    }
                }
                self.table = Some(from);
            }
            _ => {
                self.reset();
                unsafe { (from.relocate)(&mut self.storage, &mut src.storage) };
                self.table = Some(from);
            }
        }
    }

    /// Drops the stored value, if any.
    pub fn reset(&mut self) {
        if let Some(table) = self.table.take() {
            unsafe { (table.delete)(&mut self.storage) };
        }
    }

    /// Returns true if the container holds a value.
    #[inline]
    pub fn has_value(&self) -> bool {
        self.table.is_some()
    }

    /// Identity of the stored type.
    ///
    /// An empty container reports the identity of a private uninhabited type, which no stored
    /// value can have.
    pub fn type_id(&self) -> TypeId {
        self.table.map_or(TypeId::of::<NoType>(), |table| table.type_id)
    }

    /// Returns true if the container holds a `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.table.is_some_and(|table| table.type_id == TypeId::of::<T>())
    }

    /// The stored `T`, or `None` if the container is empty or holds another type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            Some(unsafe { self.storage.get::<T>() })
        } else {
            None
        }
    }

    /// The stored `T`, or `None` if the container is empty or holds another type.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if self.is::<T>() {
            Some(unsafe { self.storage.get_mut::<T>() })
        } else {
            None
        }
    }

    /// The stored `T`, or [`Error::BadCast`] if the container is empty or holds another type.
    pub fn cast_ref<T: 'static>(&self) -> Result<&T, Error> {
        self.downcast_ref::<T>().ok_or_else(|| self.bad_cast::<T>())
    }

    /// The stored `T`, or [`Error::BadCast`] if the container is empty or holds another type.
    pub fn cast_mut<T: 'static>(&mut self) -> Result<&mut T, Error> {
        if self.is::<T>() {
            Ok(unsafe { self.storage.get_mut::<T>() })
        } else {
            Err(self.bad_cast::<T>())
        }
    }

    /// Moves the stored `T` out, or returns the container unchanged if it holds another type.
    pub fn into_inner<T: 'static>(mut self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        self.table = None;
        Ok(unsafe { self.storage.take::<T>() })
    }

    fn bad_cast<T: 'static>(&self) -> Error {
        Error::BadCast {
            requested: type_name::<T>(),
            held: self.src_type_name(),
        }
    }

    /// The shared table of two non-empty containers holding the same type.
    pub(crate) fn same_table(
        &self,
        other: &Self,
        op: &'static str,
    ) -> Result<&'static Table<N, F>, Error> {
        match (self.table, other.table) {
            (Some(lhs), Some(rhs)) if lhs.type_id == rhs.type_id => Ok(lhs),
            (Some(lhs), Some(rhs)) => Err(Error::TypeMismatch {
                op,
                lhs: lhs.type_name,
                rhs: rhs.type_name,
            }),
            _ => Err(Error::Empty { op }),
        }
    }

    /// Size of the stored value in bytes, 0 when empty.
    pub fn value_size(&self) -> usize {
        self.table.map_or(0, |table| table.layout.size())
    }

    /// Display name of the stored type, `"empty"` when empty.
    pub fn src_type_name(&self) -> &'static str {
        self.table.map_or("empty", |table| table.type_name)
    }

    /// Returns true if the value is stored inline, or if there is no value.
    pub fn inplace(&self) -> bool {
        self.table.map_or(true, |table| table.inplace)
    }

    /// Bytes available for inline values: `N`, or more if a feature requires it.
    pub const fn in_place_capacity() -> usize {
        Buf::<N, F>::CAPACITY
    }

    /// The operation table of the stored type.
    pub fn table(&self) -> Option<&'static Table<N, F>> {
        self.table
    }
}

impl<const N: usize, F: Features> Default for SmallAny<N, F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize, F: Features> Drop for SmallAny<N, F> {
    fn drop(&mut self) {
        self.reset();
    }
}

/// # Panics
///
/// Cloning a value stored without `Clone` panics. Use [`SmallAny::try_clone`] to handle it.
impl<const N: usize, F: Features> Clone for SmallAny<N, F> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| panic!("{}", err))
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_clone_from(source) {
            panic!("{}", err);
        }
    }
}

impl<const N: usize, F: Admits<String>> From<&str> for SmallAny<N, F> {
    fn from(s: &str) -> Self {
        Self::new(String::from(s))
    }
}

impl<const N: usize, F: Features> fmt::Debug for SmallAny<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SmallAny")
            .field("type", &self.src_type_name())
            .field("inplace", &self.inplace())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::SmallAny;
    use crate::error::Error;
    use crate::table;
    use std::any::TypeId;
    use std::cell::Cell;
    use std::mem::size_of;
    use std::ptr;
    use std::rc::Rc;

    #[derive(Clone)]
    struct Counted<T>(Rc<Cell<usize>>, T);

    impl<T> Drop for Counted<T> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_basic() {
        let stacked: SmallAny<16> = SmallAny::new(1234usize);
        assert_eq!(stacked.downcast_ref::<usize>(), Some(&1234));
        assert!(stacked.inplace());

        let heaped: SmallAny<16> = SmallAny::new((0usize, 1usize, 2usize));
        assert_eq!(heaped.downcast_ref::<(usize, usize, usize)>(), Some(&(0, 1, 2)));
        assert!(!heaped.inplace());
    }

    #[test]
    fn test_size() {
        assert_eq!(size_of::<SmallAny<8>>(), 8 + size_of::<usize>());
        assert_eq!(size_of::<SmallAny<16>>(), 16 + size_of::<usize>());
        assert_eq!(size_of::<SmallAny<24>>(), 24 + size_of::<usize>());
        assert_eq!(size_of::<SmallAny<32>>(), 32 + size_of::<usize>());
    }

    #[test]
    fn test_empty() {
        let mut empty = SmallAny::<16>::empty();
        assert!(!empty.has_value());
        assert!(empty.inplace());
        assert_eq!(empty.value_size(), 0);
        assert_eq!(empty.src_type_name(), "empty");
        assert_ne!(empty.type_id(), TypeId::of::<()>());
        assert_eq!(empty.type_id(), SmallAny::<32>::empty().type_id());
        assert!(empty.table().is_none());
        assert_eq!(empty.downcast_ref::<i32>(), None);
        assert_eq!(
            empty.cast_ref::<i32>(),
            Err(Error::BadCast {
                requested: "i32",
                held: "empty"
            })
        );
        empty.reset();
        empty.reset();
        assert!(!empty.has_value());
    }

    #[test]
    fn test_drop() {
        let drops = Rc::new(Cell::new(0));
        let val: SmallAny<16> = SmallAny::new_unique(Counted(drops.clone(), 0u8));
        assert_eq!(drops.get(), 0);
        drop(val);
        assert_eq!(drops.get(), 1);

        let drops = Rc::new(Cell::new(0));
        let val: SmallAny<16> = SmallAny::new_unique(Counted(drops.clone(), [0usize; 16]));
        assert!(!val.inplace());
        drop(val);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_reset_drops_once() {
        let drops = Rc::new(Cell::new(0));
        let mut val: SmallAny<16> = SmallAny::new_unique(Counted(drops.clone(), [0u64; 8]));
        val.reset();
        val.reset();
        drop(val);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_oversize() {
        let fit = SmallAny::<16>::new([0usize; 2]);
        let oversize = SmallAny::<16>::new([0usize; 3]);
        assert!(fit.inplace());
        assert!(!oversize.inplace());
        assert_eq!(SmallAny::<16>::in_place_capacity(), 16);
    }

    #[test]
    fn test_overaligned_goes_to_heap() {
        #[derive(Clone, Copy, PartialEq, Debug)]
        #[repr(align(32))]
        struct Aligned(u8);

        let a = SmallAny::<64>::new(Aligned(3));
        assert!(!a.inplace());
        assert_eq!(a.cast_ref::<Aligned>(), Ok(&Aligned(3)));
    }

    #[test]
    fn test_zst() {
        let a = SmallAny::<8>::new(());
        assert!(a.has_value());
        assert!(a.inplace());
        assert_eq!(a.value_size(), 0);
        assert_eq!(a.type_id(), TypeId::of::<()>());
        assert_ne!(a.type_id(), SmallAny::<8>::empty().type_id());
    }

    #[test]
    fn test_clone() {
        let stacked = SmallAny::<16>::new([0usize, 1]);
        let cloned = stacked.clone();
        assert_eq!(cloned.downcast_ref::<[usize; 2]>(), Some(&[0, 1]));

        let heaped = SmallAny::<16>::new(vec![1, 2, 3]);
        let cloned = heaped.try_clone().unwrap();
        assert_eq!(cloned.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
        assert!(ptr::eq(heaped.table().unwrap(), cloned.table().unwrap()));
    }

    #[test]
    fn test_clone_unique_fails() {
        let unique = SmallAny::<16>::new_unique(String::from("owned"));
        let err = unique.try_clone().unwrap_err();
        assert!(matches!(err, Error::NotCloneable { .. }));
        assert_eq!(unique.downcast_ref::<String>().map(String::as_str), Some("owned"));

        let mut dst = SmallAny::<16>::new(1u8);
        assert!(dst.try_clone_from(&unique).is_err());
        assert_eq!(dst.downcast_ref::<u8>(), Some(&1));
    }

    #[test]
    #[should_panic(expected = "non-cloneable")]
    fn test_clone_unique_panics() {
        let unique = SmallAny::<16>::new_unique(5u8);
        let _ = unique.clone();
    }

    #[test]
    fn test_take() {
        let mut src = SmallAny::<16>::new(String::from("moved"));
        let dst = src.take();
        assert!(!src.has_value());
        assert_eq!(dst.downcast_ref::<String>().map(String::as_str), Some("moved"));

        let mut src = SmallAny::<16>::new(7u32);
        let dst = src.take();
        assert!(!src.has_value());
        assert_eq!(dst.downcast_ref::<u32>(), Some(&7));

        let mut empty = SmallAny::<16>::empty();
        assert!(!empty.take().has_value());
    }

    #[test]
    fn test_set_same_type_keeps_table() {
        let mut a = SmallAny::<16>::new(1i64);
        let table = a.table().unwrap();
        a.set(2i64);
        assert!(ptr::eq(table, a.table().unwrap()));
        assert_eq!(a.downcast_ref::<i64>(), Some(&2));

        a.set(3u8);
        assert_eq!(a.type_id(), TypeId::of::<u8>());
    }

    #[test]
    fn test_same_type_assignment_skips_registry() {
        let mut a = SmallAny::<16>::new(String::from("first"));
        let before = table::lookups();
        for i in 0..10 {
            a.set(i.to_string());
            a.emplace(String::from("emplaced"));
        }
        assert_eq!(table::lookups(), before);
        assert_eq!(a.downcast_ref::<String>().map(String::as_str), Some("emplaced"));

        a.set_unique(String::from("unique"));
        assert_eq!(table::lookups(), before + 1);
        assert!(!a.table().unwrap().cloneable());
    }

    #[test]
    fn test_set_drops_previous() {
        let drops = Rc::new(Cell::new(0));
        let mut a = SmallAny::<16>::new(Counted(drops.clone(), [0u8; 64]));
        a.set(Counted(drops.clone(), [1u8; 64]));
        assert_eq!(drops.get(), 1);
        a.set(5u8);
        assert_eq!(drops.get(), 2);
        drop(a);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_assign() {
        let drops = Rc::new(Cell::new(0));
        let mut dst = SmallAny::<16>::new(Counted(drops.clone(), [1u64; 4]));
        let table = dst.table().unwrap();
        dst.assign(SmallAny::new(Counted(drops.clone(), [2u64; 4])));
        assert_eq!(drops.get(), 1);
        assert!(ptr::eq(table, dst.table().unwrap()));
        assert_eq!(dst.downcast_ref::<Counted<[u64; 4]>>().map(|c| c.1), Some([2; 4]));

        dst.assign(SmallAny::new(9i8));
        assert_eq!(drops.get(), 2);
        assert_eq!(dst.downcast_ref::<i8>(), Some(&9));

        dst.assign(SmallAny::empty());
        assert!(!dst.has_value());
    }

    #[test]
    fn test_clone_from() {
        let mut dst = SmallAny::<16>::new(String::from("before"));
        let table = dst.table().unwrap();
        dst.clone_from(&SmallAny::new(String::from("after")));
        assert!(ptr::eq(table, dst.table().unwrap()));
        assert_eq!(dst.downcast_ref::<String>().map(String::as_str), Some("after"));

        dst.clone_from(&SmallAny::new(4u16));
        assert_eq!(dst.downcast_ref::<u16>(), Some(&4));

        dst.clone_from(&SmallAny::empty());
        assert!(!dst.has_value());
    }

    #[test]
    fn test_emplace_reuses_storage() {
        let mut a = SmallAny::<16>::new([3u64; 8]);
        let before = ptr::from_ref(a.downcast_ref::<[u64; 8]>().unwrap());
        let val = a.emplace([4u64; 8]);
        assert_eq!(*val, [4; 8]);
        let after = ptr::from_ref(a.downcast_ref::<[u64; 8]>().unwrap());
        assert_eq!(before, after);

        *a.emplace(1u8) += 1;
        assert_eq!(a.downcast_ref::<u8>(), Some(&2));
    }

    #[test]
    fn test_emplace_adopts_cloneability() {
        let mut a = SmallAny::<16>::new_unique(1u32);
        assert!(a.try_clone().is_err());
        a.emplace(2u32);
        assert_eq!(a.try_clone().unwrap().downcast_ref::<u32>(), Some(&2));
        a.emplace_unique(3u32);
        assert!(a.try_clone().is_err());
    }

    #[test]
    fn test_assignment_adopts_cloneability() {
        let mut a = SmallAny::<16>::new_unique(String::from("unique"));
        a.set(String::from("cloneable"));
        assert!(a.table().unwrap().cloneable());

        a.assign(SmallAny::new_unique(String::from("unique again")));
        assert!(!a.table().unwrap().cloneable());

        a.clone_from(&SmallAny::new(String::from("cloned")));
        assert!(a.table().unwrap().cloneable());
        assert_eq!(a.downcast_ref::<String>().map(String::as_str), Some("cloned"));
    }

    #[test]
    fn test_cast_mut() {
        let mut a = SmallAny::<16>::new(10i32);
        *a.cast_mut::<i32>().unwrap() += 5;
        *a.downcast_mut::<i32>().unwrap() *= 2;
        assert_eq!(a.cast_ref::<i32>(), Ok(&30));
        assert!(a.cast_mut::<u32>().is_err());
        assert!(a.downcast_mut::<u32>().is_none());
    }

    #[test]
    fn test_into_inner() {
        let a = SmallAny::<16>::new(String::from("inner"));
        let a = a.into_inner::<&str>().unwrap_err();
        assert_eq!(a.into_inner::<String>().unwrap(), "inner");

        let drops = Rc::new(Cell::new(0));
        let b = SmallAny::<16>::new(Counted(drops.clone(), 1u8));
        let inner = b.into_inner::<Counted<u8>>().ok().unwrap();
        assert_eq!(drops.get(), 0);
        drop(inner);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_from_str() {
        let a: SmallAny<32> = "text".into();
        assert_eq!(a.cast_ref::<String>().map(String::as_str), Ok("text"));
    }

    #[test]
    fn test_debug() {
        let a = SmallAny::<16>::new(1u8);
        assert_eq!(format!("{:?}", a), "SmallAny { type: \"u8\", inplace: true }");
    }
}
