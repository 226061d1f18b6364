use crate::codec::TypeHooks;
use crate::graph::TypeHandle;

/// Per-type data attached after loading.
///
/// Created for every type of the module when the [`TypeRegistry`] is built.
///
/// [`TypeRegistry`]: crate::registry::TypeRegistry
#[derive(Debug, Clone)]
pub struct TypeMeta {
    ty: TypeHandle,
    hooks: Option<TypeHooks>,
}

impl TypeMeta {
    #[inline]
    pub(crate) const fn new(ty: TypeHandle) -> Self {
        Self { ty, hooks: None }
    }

    /// The described type.
    #[inline(always)]
    pub const fn ty(&self) -> TypeHandle {
        self.ty
    }

    /// Custom codec functions, if registered.
    #[inline(always)]
    pub const fn hooks(&self) -> Option<&TypeHooks> {
        self.hooks.as_ref()
    }

    #[inline]
    pub(crate) fn set_hooks(&mut self, hooks: TypeHooks) -> Option<TypeHooks> {
        self.hooks.replace(hooks)
    }
}
