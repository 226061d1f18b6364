use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use core::slice;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_ptr {
    ($ptr:ident) => {
        impl From<$ptr<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(ptr: $ptr<'_>) -> Self {
                ptr.0
            }
        }

        impl $ptr<'_> {
            /// Checks alignment for `T` in debug builds only.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.0.as_ptr().cast::<T>().is_aligned(),
                    "pointer {:p} is not aligned to {} for type {}",
                    self.0,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
            }

            /// Moves the pointer forward by `count` bytes.
            ///
            /// # Safety
            /// - The result must stay inside the allocation of the pointee.
            /// - The target must be valid for the lifetime of this pointer.
            #[inline]
            pub const unsafe fn byte_add(self, count: usize) -> Self {
                // SAFETY: the caller keeps the result inside the same allocation.
                Self(unsafe { self.0.add(count) }, PhantomData)
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// Shared access to an erased object, similar to `&'a dyn Any`.
///
/// The pointee must stay valid and unchanged while the pointer is alive.
///
/// # Examples
///
/// ```
/// # use rfl_ptr::Ptr;
/// let value = 0x0102_0304_u32;
/// let ptr = Ptr::from_ref(&value);
///
/// let bytes = unsafe { ptr.as_bytes(4) };
/// assert_eq!(bytes, &value.to_ne_bytes());
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_ptr!(Ptr);

impl<'a> Ptr<'a> {
    /// Wraps a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid object for the whole lifetime `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Ptr<'a> {
        Ptr(ptr, PhantomData)
    }

    /// Borrows a typed value as an erased pointer.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Ptr<'a> {
        Ptr(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Returns the raw address, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Reinterprets the pointee as `T`.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: type and alignment are guaranteed by the caller.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }

    /// Views `len` bytes starting at the pointer.
    ///
    /// # Safety
    /// - `len` bytes starting at the pointer must be initialized and inside
    ///   the pointee's allocation.
    #[inline(always)]
    pub const unsafe fn as_bytes(self, len: usize) -> &'a [u8] {
        // SAFETY: the caller guarantees `len` initialized bytes.
        unsafe { slice::from_raw_parts(self.0.as_ptr(), len) }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// Exclusive access to a live erased object, similar to `&'a mut dyn Any`.
///
/// Not `Clone`; use [`reborrow`](PtrMut::reborrow) to hand out a shorter
/// lived copy.
///
/// # Examples
///
/// ```
/// # use rfl_ptr::PtrMut;
/// let mut value = [0u8; 4];
/// let ptr = PtrMut::from_mut(&mut value);
///
/// let tail = unsafe { ptr.byte_add(2) };
/// unsafe { tail.as_bytes_mut(2) }.copy_from_slice(&[7, 9]);
/// assert_eq!(value, [0, 0, 7, 9]);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Wraps a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must be valid for reads and writes for the whole lifetime `'a`.
    /// - No other pointer may access the pointee during `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> PtrMut<'a> {
        PtrMut(ptr, PhantomData)
    }

    /// Borrows a typed value mutably as an erased pointer.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> PtrMut<'a> {
        PtrMut(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Returns the raw address, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Reinterprets the pointee as `&T` for the borrow of `self`.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(&self) -> &'_ T {
        // SAFETY: type and alignment are guaranteed by the caller.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }

    /// Reinterprets the pointee as `&mut T` for the borrow of `self`.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn as_mut<T>(&mut self) -> &'_ mut T {
        // SAFETY: type and alignment are guaranteed by the caller.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// Converts into `&'a mut T`, consuming the pointer.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn consume<T>(self) -> &'a mut T {
        // SAFETY: type and alignment are guaranteed by the caller.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// Shared view with a shorter lifetime.
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Exclusive view with a shorter lifetime.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> PtrMut<'_> {
        PtrMut(self.0, PhantomData)
    }

    /// Views `len` bytes starting at the pointer for writing.
    ///
    /// # Safety
    /// - `len` bytes starting at the pointer must be inside the pointee's
    ///   allocation and initialized (plain bytes count as initialized once
    ///   written or zeroed).
    #[inline(always)]
    pub const unsafe fn as_bytes_mut(self, len: usize) -> &'a mut [u8] {
        // SAFETY: the caller guarantees `len` bytes of exclusive storage.
        unsafe { slice::from_raw_parts_mut(self.0.as_ptr(), len) }
    }

    /// Takes over the obligation to drop the pointee.
    ///
    /// # Safety
    /// - The pointee must be live, and nothing else may drop it afterwards.
    #[inline(always)]
    pub const unsafe fn promote(self) -> OwningPtr<'a> {
        OwningPtr(self.0, PhantomData)
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// OwningPtr

/// Ownership of an erased object without ownership of its storage.
///
/// The holder must drop the pointee, either with [`drop_as`](Self::drop_as)
/// or with a destructor from the type registry. Forgetting to do so leaks
/// the value, never the memory.
///
/// # Examples
///
/// ```
/// # use core::mem::ManuallyDrop;
/// # use rfl_ptr::PtrMut;
/// let mut slot = ManuallyDrop::new(String::from("Config"));
/// let owned = unsafe { PtrMut::from_mut(&mut *slot).promote() };
/// unsafe { owned.drop_as::<String>() };
/// ```
#[repr(transparent)]
pub struct OwningPtr<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(OwningPtr);

impl<'a> OwningPtr<'a> {
    /// Wraps a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a live value that nobody else will drop.
    /// - The storage must stay valid for `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> OwningPtr<'a> {
        Self(ptr, PhantomData)
    }

    /// Returns the raw address, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Shared view with a shorter lifetime.
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Drops the pointee in place as a `T`.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee and the pointer aligned for it.
    #[inline(always)]
    pub unsafe fn drop_as<T>(self) {
        // SAFETY: type and alignment are guaranteed by the caller.
        unsafe { ptr::drop_in_place(self.0.as_ptr().cast::<T>()) }
    }
}
