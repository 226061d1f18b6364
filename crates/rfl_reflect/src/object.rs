//! Creating, copying and destroying objects of graph types.
//!
//! [`ObjectBox`] owns the storage of one object and knows how to destroy it.
//! The `*_in_place` operations of [`TypeRegistry`] work on storage the
//! caller owns, such as a slot of a container.

use alloc::alloc as malloc;
use alloc::string::ToString;
use core::alloc::Layout;
use core::fmt;
use core::mem::ManuallyDrop;
use core::num::NonZeroUsize;
use core::ptr::{self, NonNull};

use rfl_ptr::{OwningPtr, Ptr, PtrMut};

use crate::graph::{Type, TypeHandle, TypeKind};
use crate::registry::{DestructFn, LifecycleError, TypeRegistry};

// -----------------------------------------------------------------------------
// ObjectBox

/// Heap storage holding one live object of a graph type.
///
/// The storage has exactly the size and alignment of the type. Dropping the
/// box runs the type's destructor, if it has one, and frees the storage.
///
/// The box is neither `Send` nor `Sync`: nothing is known about the thread
/// safety of the object it holds.
pub struct ObjectBox {
    ty: TypeHandle,
    data: NonNull<u8>,
    layout: Layout,
    destruct: Option<DestructFn>,
}

impl ObjectBox {
    /// Allocates zeroed storage for `layout`; the destructor is set once the
    /// object is live.
    fn alloc_zeroed(ty: TypeHandle, layout: Layout) -> Self {
        let data = if layout.size() == 0 {
            // SAFETY: a layout alignment is never zero.
            let align = unsafe { NonZeroUsize::new_unchecked(layout.align()) };
            NonNull::without_provenance(align)
        } else {
            NonNull::new(unsafe { malloc::alloc_zeroed(layout) })
                .unwrap_or_else(|| malloc::handle_alloc_error(layout))
        };
        Self {
            ty,
            data,
            layout,
            destruct: None,
        }
    }

    /// Frees the storage without running the destructor.
    fn dealloc(&mut self) {
        if self.layout.size() != 0 {
            unsafe { malloc::dealloc(self.data.as_ptr(), self.layout) };
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> TypeHandle {
        self.ty
    }

    #[inline(always)]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn as_ptr(&self) -> Ptr<'_> {
        // SAFETY: the object is live for as long as `self` is borrowed.
        unsafe { Ptr::new(self.data) }
    }

    #[inline]
    pub fn as_mut(&mut self) -> PtrMut<'_> {
        // SAFETY: as above, and the borrow is exclusive.
        unsafe { PtrMut::new(self.data) }
    }

    /// Views the object as a `T`.
    ///
    /// # Safety
    /// - The box's type must describe `T`.
    #[inline]
    pub unsafe fn downcast_ref<T>(&self) -> &T {
        unsafe { self.as_ptr().as_ref::<T>() }
    }

    /// # Safety
    /// - The box's type must describe `T`.
    #[inline]
    pub unsafe fn downcast_mut<T>(&mut self) -> &mut T {
        unsafe { self.as_mut().consume::<T>() }
    }

    /// Gives up ownership of the object and its storage.
    ///
    /// The caller becomes responsible for destroying the object and freeing
    /// the storage with the returned layout.
    pub fn into_raw(self) -> (NonNull<u8>, Layout) {
        let this = ManuallyDrop::new(self);
        (this.data, this.layout)
    }
}

impl Drop for ObjectBox {
    fn drop(&mut self) {
        if let Some(destruct) = self.destruct {
            // SAFETY: the object is live and is not used again.
            unsafe { destruct(OwningPtr::new(self.data)) };
        }
        self.dealloc();
    }
}

impl fmt::Debug for ObjectBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBox")
            .field("ty", &self.ty)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Lifecycle operations

fn object_type(registry: &TypeRegistry, ty: TypeHandle) -> Result<&Type, LifecycleError> {
    let info = registry.module().ty(ty);
    match info.kind {
        TypeKind::Template => Err(LifecycleError::NotConstructible(
            info.full_name().text().to_string(),
        )),
        _ => Ok(info),
    }
}

impl TypeRegistry {
    /// Creates a default object of `ty`.
    ///
    /// Runs the constructor if the type declares one. Without a constructor
    /// the contents are all zero bytes, though callers should not rely on it.
    /// Fails if a declared constructor or destructor is not bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfl_reflect::{Module, TypeRegistry};
    ///
    /// let module = Module::from_xml(r#"
    ///     <RflDb><Namespace><BaseTypes>
    ///       <BaseType><Name str="u16"/><FullName str="u16"/><Size>2</Size></BaseType>
    ///     </BaseTypes></Namespace></RflDb>"#).unwrap();
    /// let registry = TypeRegistry::new(module);
    ///
    /// let u16_ty = registry.module().find_type("u16").unwrap();
    /// let object = registry.create_object(u16_ty).unwrap();
    /// assert_eq!(object.layout().size(), 2);
    /// // SAFETY: the type is a two-byte integer.
    /// assert_eq!(unsafe { *object.downcast_ref::<u16>() }, 0);
    /// ```
    pub fn create_object(&self, ty: TypeHandle) -> Result<ObjectBox, LifecycleError> {
        let info = object_type(self, ty)?;
        let construct = self.constructor(ty)?;
        let destruct = self.destructor(ty)?;

        let mut object = ObjectBox::alloc_zeroed(ty, info.layout);
        if let Some(construct) = construct {
            // SAFETY: the storage fits the type and holds no object yet.
            unsafe { construct(object.as_mut()) };
        }
        object.destruct = destruct;
        Ok(object)
    }

    /// Destroys an object created by this registry.
    ///
    /// Same as dropping the box.
    #[inline]
    pub fn destroy_object(&self, object: ObjectBox) {
        drop(object);
    }

    /// Creates a copy of the object at `src`.
    ///
    /// Uses the copy constructor if the type declares one; types that
    /// declare no lifecycle function at all are copied as bytes.
    ///
    /// # Safety
    /// - `src` points to a live object of `ty`.
    pub unsafe fn copy_object(
        &self,
        ty: TypeHandle,
        src: Ptr<'_>,
    ) -> Result<ObjectBox, LifecycleError> {
        let info = object_type(self, ty)?;
        let copy = self.copier(ty)?;
        if copy.is_none() && !info.is_trivial() {
            return Err(LifecycleError::NotCopyable(info.full_name().text().to_string()));
        }
        let destruct = self.destructor(ty)?;

        let mut object = ObjectBox::alloc_zeroed(ty, info.layout);
        match copy {
            Some(copy) => unsafe { copy(src, object.as_mut()) },
            None => unsafe {
                ptr::copy_nonoverlapping(src.as_ptr(), object.data.as_ptr(), info.size());
            },
        }
        object.destruct = destruct;
        Ok(object)
    }

    /// Runs the constructor of `ty` on caller-owned storage.
    ///
    /// Storage of a type without constructor is left untouched.
    ///
    /// # Safety
    /// - `dst` points to storage that fits `ty` and holds no live object.
    pub unsafe fn construct_in_place(
        &self,
        ty: TypeHandle,
        dst: PtrMut<'_>,
    ) -> Result<(), LifecycleError> {
        object_type(self, ty)?;
        if let Some(construct) = self.constructor(ty)? {
            unsafe { construct(dst) };
        }
        Ok(())
    }

    /// Runs the destructor of `ty`; the storage is not freed.
    ///
    /// # Safety
    /// - `object` points to a live object of `ty`, which is not used again.
    pub unsafe fn destruct_in_place(
        &self,
        ty: TypeHandle,
        object: OwningPtr<'_>,
    ) -> Result<(), LifecycleError> {
        object_type(self, ty)?;
        if let Some(destruct) = self.destructor(ty)? {
            unsafe { destruct(object) };
        }
        Ok(())
    }

    /// Assigns the object at `src` over the live object at `dst`.
    ///
    /// Uses the assignment operator if the type declares one; types that
    /// declare no lifecycle function at all are copied as bytes.
    ///
    /// # Safety
    /// - `src` and `dst` point to distinct live objects of `ty`.
    pub unsafe fn assign_object(
        &self,
        ty: TypeHandle,
        src: Ptr<'_>,
        dst: PtrMut<'_>,
    ) -> Result<(), LifecycleError> {
        let info = object_type(self, ty)?;
        match self.assigner(ty)? {
            Some(assign) => unsafe { assign(src, dst) },
            None if info.is_trivial() => unsafe {
                ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), info.size());
            },
            None => return Err(LifecycleError::NotCopyable(info.full_name().text().to_string())),
        }
        Ok(())
    }
}
