use alloc::vec::Vec;

use rfl_utils::hash::NoOpHashMap;

use crate::NameHash;
use crate::graph::{
    Function, FunctionHandle, Modifier, Namespace, NamespaceHandle, Parameter, Type, TypeHandle,
    TypeOf, TypeRef, TypeSlots,
};
use crate::loader::LoadReport;

/// A loaded type database.
///
/// Owns every namespace, type and function record in arenas addressed by
/// handles, the global namespace at [`Module::global`], the full-name index
/// and the static slot table. A `Module` is only produced by the
/// [loader](crate::loader) and is immutable afterwards.
///
/// # Examples
///
/// ```
/// use rfl_reflect::Module;
///
/// let module = Module::from_xml(r#"
///     <RflDb><Namespace>
///       <Namespaces><Namespace>
///         <Name str="math"/><FullName str="math"/>
///         <BaseTypes>
///           <BaseType><Name str="real"/><FullName str="math::real"/><Size>8</Size></BaseType>
///         </BaseTypes>
///       </Namespace></Namespaces>
///     </Namespace></RflDb>"#).unwrap();
///
/// let real = module.find_type("math::real").unwrap();
/// assert_eq!(module.ty(real).size(), 8);
/// assert_eq!(module.ty(real).align(), 8);
/// assert!(module.find_type("real").is_none());
/// ```
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Module {
    pub(crate) namespaces: Vec<Namespace>,
    pub(crate) types: Vec<Type>,
    pub(crate) functions: Vec<Function>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) type_index: NoOpHashMap<NameHash, TypeHandle>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) slots: TypeSlots,
    pub(crate) report: LoadReport,
}

impl Module {
    /// The global namespace.
    #[inline]
    pub const fn global(&self) -> NamespaceHandle {
        NamespaceHandle::new(0)
    }

    /// # Panics
    ///
    /// Panics if the handle does not come from this module.
    #[inline]
    pub fn namespace(&self, handle: NamespaceHandle) -> &Namespace {
        &self.namespaces[handle.index()]
    }

    /// # Panics
    ///
    /// Panics if the handle does not come from this module.
    #[inline]
    pub fn ty(&self, handle: TypeHandle) -> &Type {
        &self.types[handle.index()]
    }

    /// # Panics
    ///
    /// Panics if the handle does not come from this module.
    #[inline]
    pub fn function(&self, handle: FunctionHandle) -> &Function {
        &self.functions[handle.index()]
    }

    /// Returns the type if the handle belongs to this module.
    #[inline]
    pub fn get_ty(&self, handle: TypeHandle) -> Option<&Type> {
        self.types.get(handle.index())
    }

    #[inline]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Every type with its handle, in document pre-order.
    pub fn types(&self) -> impl ExactSizeIterator<Item = (TypeHandle, &Type)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(index, ty)| (TypeHandle::new(index), ty))
    }

    pub fn functions(&self) -> impl ExactSizeIterator<Item = (FunctionHandle, &Function)> + '_ {
        self.functions
            .iter()
            .enumerate()
            .map(|(index, func)| (FunctionHandle::new(index), func))
    }

    pub fn namespaces(&self) -> impl ExactSizeIterator<Item = (NamespaceHandle, &Namespace)> + '_ {
        self.namespaces
            .iter()
            .enumerate()
            .map(|(index, ns)| (NamespaceHandle::new(index), ns))
    }

    /// Looks a type up by its fully qualified name.
    #[inline]
    pub fn find_type(&self, full_name: &str) -> Option<TypeHandle> {
        self.find_type_by_hash(NameHash::of(full_name))
    }

    #[inline]
    pub fn find_type_by_hash(&self, hash: NameHash) -> Option<TypeHandle> {
        self.type_index.get(&hash).copied()
    }

    /// The static slot table filled by the bind phase.
    #[inline]
    pub fn slots(&self) -> &TypeSlots {
        &self.slots
    }

    /// Returns the type bound at `T::SLOT`.
    ///
    /// A bound type whose size or alignment disagrees with `T` is rejected.
    pub fn type_of<T: TypeOf>(&self) -> Option<TypeHandle> {
        let handle = self.slots.get(T::SLOT)?;
        let ty = self.ty(handle);
        if ty.size() != size_of::<T>() || ty.align() != align_of::<T>() {
            log::warn!(
                "type `{}` bound at {:?} is {}/{} bytes, `{}` is {}/{}",
                ty.full_name(),
                T::SLOT,
                ty.size(),
                ty.align(),
                core::any::type_name::<T>(),
                size_of::<T>(),
                align_of::<T>(),
            );
            return None;
        }
        Some(handle)
    }

    /// Diagnostics collected while loading.
    #[inline]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Follows a reference.
    #[inline]
    pub fn resolve(&self, ty: TypeRef) -> Option<&Type> {
        ty.handle().map(|handle| self.ty(handle))
    }

    /// Size of one element of a parameter or field.
    ///
    /// Indirect values are address sized. Returns `None` when the type is absent.
    pub fn element_size(&self, param: &Parameter) -> Option<usize> {
        match param.modifier {
            Modifier::Pointer | Modifier::Reference => Some(size_of::<usize>()),
            Modifier::Value => self.resolve(param.ty).map(Type::size),
        }
    }

    /// Bytes covered by a parameter or field, all array elements included.
    ///
    /// Returns `None` when the type is absent or the product overflows.
    pub fn element_count_bytes(&self, param: &Parameter) -> Option<usize> {
        let size = self.element_size(param)?;
        size.checked_mul(param.array.element_count())
    }
}
