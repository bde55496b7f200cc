//! Inline storage used by [`SmallAny`](crate::SmallAny).
//!
//! A [`Buffer`] is a union of `N` raw bytes, the minimum space requested by the container's
//! features and a heap pointer. Whether a type lives inside the buffer or behind the pointer is
//! decided per type, at compile time, by [`fits`].

use std::mem::{self, ManuallyDrop, MaybeUninit};
use std::ptr;
use std::alloc::{self, Layout};

/// Returns true if a value of type `T` can be stored inline in a space of `capacity` bytes
/// aligned to `align`.
pub const fn fits<T>(capacity: usize, align: usize) -> bool {
    mem::size_of::<T>() <= capacity && mem::align_of::<T>() <= align
}

/// Raw storage that a container hands to the slots of its operation tables.
///
/// # Safety
///
/// Implementors must provide at least [`Storage::CAPACITY`] bytes aligned to
/// [`Storage::ALIGN`] at the address of `self`, and must be able to hold a heap pointer.
pub unsafe trait Storage: Sized + 'static {
    /// Bytes available for inline values.
    const CAPACITY: usize;

    /// Alignment of the inline space.
    const ALIGN: usize;

    /// Whether values of type `T` are stored inline.
    #[inline]
    fn is_inplace<T>() -> bool {
        fits::<T>(Self::CAPACITY, Self::ALIGN)
    }

    /// Shared reference to the stored `T`.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`.
    unsafe fn get<T>(&self) -> &T;

    /// Exclusive reference to the stored `T`.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`.
    unsafe fn get_mut<T>(&mut self) -> &mut T;

    /// Places `val` into the storage, boxing it when it does not fit inline.
    ///
    /// # Safety
    ///
    /// The storage must not hold a live value, otherwise it is leaked.
    unsafe fn put<T>(&mut self, val: T) -> &mut T;

    /// Writes `val` over a `T` whose destructor already ran, reusing its memory.
    ///
    /// # Safety
    ///
    /// The storage must hold a destroyed `T` (see [`Storage::drop_value`]).
    unsafe fn overwrite<T>(&mut self, val: T) -> &mut T;

    /// Moves the `T` held by `src` into this storage. Heap values are transferred by pointer.
    ///
    /// # Safety
    ///
    /// `src` must hold a live `T` and this storage none; afterwards `src` holds none.
    unsafe fn relocate<T>(&mut self, src: &mut Self);

    /// Moves the stored `T` out, freeing its heap block if any.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`; afterwards it holds none.
    unsafe fn take<T>(&mut self) -> T;

    /// Runs the destructor of the stored `T`, keeping its memory.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`; afterwards the memory is uninitialized.
    unsafe fn drop_value<T>(&mut self);

    /// Drops the stored `T` and frees its heap block if any.
    ///
    /// # Safety
    ///
    /// The storage must hold a live `T`; afterwards it holds none.
    unsafe fn delete<T>(&mut self);

    /// Address of the stored value, given its placement.
    ///
    /// # Safety
    ///
    /// The storage must hold a live value placed according to `inplace`.
    unsafe fn value_ptr(&self, inplace: bool) -> *const ();

    /// Frees the heap block of a value that was already moved out.
    ///
    /// # Safety
    ///
    /// The value must have been placed on the heap with `layout` and must not be used again.
    unsafe fn release(&mut self, layout: Layout);
}

/// Inline space of a container: `N` bytes, widened to fit `M`.
///
/// The union always fits a pointer, used when a value is heap-allocated.
#[repr(C)]
#[allow(dead_code)]
pub union Buffer<const N: usize, M> {
    inline: [MaybeUninit<u8>; N],
    min: ManuallyDrop<MaybeUninit<M>>,
    heap: *mut u8,
}

impl<const N: usize, M> Buffer<N, M> {
    /// Storage that holds no value.
    pub const fn uninit() -> Self {
        Buffer {
            heap: ptr::null_mut(),
        }
    }

    #[inline]
    fn inline_ptr(&self) -> *const u8 {
        ptr::from_ref(self).cast()
    }

    #[inline]
    fn inline_ptr_mut(&mut self) -> *mut u8 {
        ptr::from_mut(self).cast()
    }
}

unsafe impl<const N: usize, M: 'static> Storage for Buffer<N, M> {
    const CAPACITY: usize = if N > mem::size_of::<M>() {
        N
    } else {
        mem::size_of::<M>()
    };
    const ALIGN: usize = mem::align_of::<Self>();

    #[inline]
    unsafe fn get<T>(&self) -> &T {
        if Self::is_inplace::<T>() {
            &*self.inline_ptr().cast::<T>()
        } else {
            &*self.heap.cast::<T>()
        }
    }

    #[inline]
    unsafe fn get_mut<T>(&mut self) -> &mut T {
        if Self::is_inplace::<T>() {
            &mut *self.inline_ptr_mut().cast::<T>()
        } else {
            &mut *self.heap.cast::<T>()
        }
    }

    unsafe fn put<T>(&mut self, val: T) -> &mut T {
        if Self::is_inplace::<T>() {
            let slot = self.inline_ptr_mut().cast::<T>();
            slot.write(val);
            &mut *slot
        } else {
            let boxed = Box::into_raw(Box::new(val));
            self.heap = boxed.cast();
            &mut *boxed
        }
    }

    unsafe fn overwrite<T>(&mut self, val: T) -> &mut T {
        let slot = if Self::is_inplace::<T>() {
            self.inline_ptr_mut().cast::<T>()
        } else {
            self.heap.cast::<T>()
        };
        slot.write(val);
        &mut *slot
    }

    unsafe fn relocate<T>(&mut self, src: &mut Self) {
        if Self::is_inplace::<T>() {
            let from = src.inline_ptr().cast::<T>();
            ptr::copy_nonoverlapping(from, self.inline_ptr_mut().cast::<T>(), 1);
        } else {
            self.heap = src.heap;
            src.heap = ptr::null_mut();
        }
    }

    unsafe fn take<T>(&mut self) -> T {
        if Self::is_inplace::<T>() {
            self.inline_ptr().cast::<T>().read()
        } else {
            let boxed = Box::from_raw(self.heap.cast::<T>());
            self.heap = ptr::null_mut();
            *boxed
        }
    }

    unsafe fn drop_value<T>(&mut self) {
        ptr::drop_in_place(self.get_mut::<T>());
    }

    unsafe fn delete<T>(&mut self) {
        if Self::is_inplace::<T>() {
            self.drop_value::<T>();
        } else {
            drop(Box::from_raw(self.heap.cast::<T>()));
            self.heap = ptr::null_mut();
        }
    }

    #[inline]
    unsafe fn value_ptr(&self, inplace: bool) -> *const () {
        if inplace {
            self.inline_ptr().cast()
        } else {
            self.heap.cast_const().cast()
        }
    }

    unsafe fn release(&mut self, layout: Layout) {
        // zero-sized boxes own no allocation
        if layout.size() != 0 {
            alloc::dealloc(self.heap, layout);
        }
        self.heap = ptr::null_mut();
    }
}

/// Space large and aligned enough for both `A` and `B`.
///
/// Features use it to widen a container's inline space.
#[repr(C)]
#[allow(dead_code)]
pub union Max<A, B> {
    a: ManuallyDrop<MaybeUninit<A>>,
    b: ManuallyDrop<MaybeUninit<B>>,
}
