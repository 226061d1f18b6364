use alloc::string::ToString;
use alloc::vec::Vec;

use crate::codec::{self, TypeHooks};
use crate::graph::{FunctionHandle, FunctionRef, Module, Type, TypeHandle, TypeKind};
use crate::registry::{
    AssignFn, BuiltinNames, Callable, Capabilities, ConstructFn, CopyFn, DestructFn, Lifecycle,
    LifecycleError, Role, TypeMeta,
};

/// A loaded [`Module`] plus everything attached to it at run time.
///
/// The registry is filled through `&mut self` during initialization:
/// lifecycle callables bound to graph functions, and codec hooks attached to
/// types. Object operations and the codec only take `&self`, so nothing can
/// be registered while an object is being (de)serialized. A filled registry
/// is `Send + Sync`.
///
/// # Examples
///
/// ```
/// use rfl_reflect::{Module, TypeRegistry};
/// use rfl_reflect::registry::{Capabilities, Lifecycle};
///
/// let module = Module::from_xml(r#"
///     <RflDb><Namespace>
///       <Classes>
///         <Class>
///           <Name str="Label"/><FullName str="Label"/><Size>24</Size><Align>8</Align>
///           <ConstructorIndex>0</ConstructorIndex><DestructorIndex>1</DestructorIndex>
///           <Functions>
///             <Function><Name str="Label"/></Function>
///             <Function><Name str="~Label"/></Function>
///           </Functions>
///         </Class>
///       </Classes>
///     </Namespace></RflDb>"#).unwrap();
///
/// let mut registry = TypeRegistry::new(module);
/// let label = registry.module().find_type("Label").unwrap();
/// assert!(!registry.capabilities(label).contains(Capabilities::CONSTRUCT));
///
/// registry.register_lifecycle(label, Lifecycle::of::<String>());
/// let caps = registry.capabilities(label);
/// assert!(caps.contains(Capabilities::CONSTRUCT | Capabilities::DESTRUCT));
/// assert!(!caps.contains(Capabilities::COPY));
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    module: Module,
    metas: Vec<TypeMeta>,
    callables: Vec<Option<Callable>>,
}

impl TypeRegistry {
    /// Wraps a module with nothing registered.
    pub fn new(module: Module) -> Self {
        let metas = module.types().map(|(handle, _)| TypeMeta::new(handle)).collect();
        let callables = alloc::vec![None; module.function_count()];
        Self {
            module,
            metas,
            callables,
        }
    }

    /// Wraps a module and installs the built-in hooks on the default names.
    ///
    /// See [`BuiltinNames`].
    pub fn with_builtin_hooks(module: Module) -> Self {
        let mut registry = Self::new(module);
        registry.register_builtin_hooks(&BuiltinNames::default());
        registry
    }

    #[inline(always)]
    pub const fn module(&self) -> &Module {
        &self.module
    }

    /// Drops every registration and returns the module.
    #[inline]
    pub fn into_module(self) -> Module {
        self.module
    }

    /// # Panics
    ///
    /// Panics if the handle does not come from this registry's module.
    #[inline]
    pub fn meta(&self, ty: TypeHandle) -> &TypeMeta {
        &self.metas[ty.index()]
    }

    // -------------------------------------------------------------------------
    // Lifecycle registration

    /// Binds a native callable to a graph function.
    ///
    /// Returns the callable previously bound to it.
    pub fn bind_function(
        &mut self,
        function: FunctionHandle,
        callable: Callable,
    ) -> Option<Callable> {
        self.callables[function.index()].replace(callable)
    }

    #[inline]
    pub fn callable(&self, function: FunctionHandle) -> Option<Callable> {
        self.callables.get(function.index()).copied().flatten()
    }

    /// Binds every callable of `lifecycle` to the function `ty` declares for
    /// its role, and returns how many were bound.
    ///
    /// Callables for roles the type does not declare are ignored.
    pub fn register_lifecycle(&mut self, ty: TypeHandle, lifecycle: Lifecycle) -> usize {
        let mut bound = 0;
        for role in [Role::Construct, Role::Destruct, Role::Copy, Role::Assign] {
            let Some(callable) = lifecycle.get(role) else {
                continue;
            };
            let info = self.module.ty(ty);
            match role_ref(info, role).handle() {
                Some(function) => {
                    self.callables[function.index()] = Some(callable);
                    bound += 1;
                }
                None => log::debug!("`{}` declares no {role}, callable ignored", info.full_name()),
            }
        }
        bound
    }

    /// Like [`TypeRegistry::register_lifecycle`], looking the type up by its
    /// full name.
    pub fn register_lifecycle_by_name(
        &mut self,
        full_name: &str,
        lifecycle: Lifecycle,
    ) -> Result<usize, LifecycleError> {
        let ty = self
            .module
            .find_type(full_name)
            .ok_or_else(|| LifecycleError::UnknownType(full_name.to_string()))?;
        Ok(self.register_lifecycle(ty, lifecycle))
    }

    /// The callable bound for `role` of `ty`.
    ///
    /// `Ok(None)` means the type declares no function for the role.
    pub fn lifecycle(
        &self,
        ty: TypeHandle,
        role: Role,
    ) -> Result<Option<Callable>, LifecycleError> {
        let info = self.module.ty(ty);
        let Some(function) = role_ref(info, role).handle() else {
            return Ok(None);
        };
        match self.callable(function) {
            Some(callable) if callable.role() == role => Ok(Some(callable)),
            Some(callable) => Err(LifecycleError::RoleMismatch {
                function,
                expected: role,
                found: callable.role(),
            }),
            None => Err(LifecycleError::Unbound {
                ty: info.full_name().text().to_string(),
                role,
            }),
        }
    }

    pub fn constructor(&self, ty: TypeHandle) -> Result<Option<ConstructFn>, LifecycleError> {
        Ok(match self.lifecycle(ty, Role::Construct)? {
            Some(Callable::Construct(func)) => Some(func),
            _ => None,
        })
    }

    pub fn destructor(&self, ty: TypeHandle) -> Result<Option<DestructFn>, LifecycleError> {
        Ok(match self.lifecycle(ty, Role::Destruct)? {
            Some(Callable::Destruct(func)) => Some(func),
            _ => None,
        })
    }

    pub fn copier(&self, ty: TypeHandle) -> Result<Option<CopyFn>, LifecycleError> {
        Ok(match self.lifecycle(ty, Role::Copy)? {
            Some(Callable::Copy(func)) => Some(func),
            _ => None,
        })
    }

    pub fn assigner(&self, ty: TypeHandle) -> Result<Option<AssignFn>, LifecycleError> {
        Ok(match self.lifecycle(ty, Role::Assign)? {
            Some(Callable::Assign(func)) => Some(func),
            _ => None,
        })
    }

    // -------------------------------------------------------------------------
    // Codec hooks

    /// Attaches codec hooks to a type or a template.
    ///
    /// Hooks on a template apply to every instance of it that has no hooks of
    /// its own. Returns the hooks previously attached.
    pub fn register_hooks(&mut self, ty: TypeHandle, hooks: TypeHooks) -> Option<TypeHooks> {
        self.metas[ty.index()].set_hooks(hooks)
    }

    /// Like [`TypeRegistry::register_hooks`], looking the type up by its full
    /// name. Returns the type, or `None` if no type has that name.
    pub fn register_hooks_by_name(
        &mut self,
        full_name: &str,
        hooks: TypeHooks,
    ) -> Option<TypeHandle> {
        let ty = self.module.find_type(full_name)?;
        self.register_hooks(ty, hooks);
        Some(ty)
    }

    /// The hooks the codec uses for `ty`: its own, or those of the template
    /// it instantiates.
    pub fn hooks(&self, ty: TypeHandle) -> Option<&TypeHooks> {
        let meta = &self.metas[ty.index()];
        if let Some(hooks) = meta.hooks() {
            return Some(hooks);
        }
        let template = self.module.ty(ty).as_instance()?.instance_of.handle()?;
        self.metas[template.index()].hooks()
    }

    /// Installs the text-buffer hooks for [`String`] on every type in
    /// `names.text`, and the dynamic-array hooks for [`DynArray`] on every
    /// template in `names.arrays`. Returns how many types received hooks.
    ///
    /// [`DynArray`]: crate::codec::DynArray
    pub fn register_builtin_hooks(&mut self, names: &BuiltinNames) -> usize {
        let text = TypeHooks::text_buffer::<alloc::string::String>();
        let array = TypeHooks::dyn_array::<codec::RawArray>();

        let mut installed = 0;
        let targets = names
            .text
            .iter()
            .map(|name| (name, text))
            .chain(names.arrays.iter().map(|name| (name, array)));
        for (name, hooks) in targets {
            match self.module.find_type(name) {
                Some(ty) => {
                    self.register_hooks(ty, hooks);
                    installed += 1;
                }
                None => log::debug!("no type `{name}` for built-in hooks"),
            }
        }
        installed
    }

    // -------------------------------------------------------------------------
    // Queries

    /// What can be done with objects of `ty`.
    pub fn capabilities(&self, ty: TypeHandle) -> Capabilities {
        let info = self.module.ty(ty);
        if matches!(info.kind, TypeKind::Template) {
            return Capabilities::empty();
        }

        let mut caps = Capabilities::empty();
        let trivial = info.is_trivial();
        let roles = [
            (Role::Construct, Capabilities::CONSTRUCT, true),
            (Role::Destruct, Capabilities::DESTRUCT, true),
            (Role::Copy, Capabilities::COPY, trivial),
            (Role::Assign, Capabilities::ASSIGN, trivial),
        ];
        for (role, flag, bytes_suffice) in roles {
            let available = match self.lifecycle(ty, role) {
                Ok(Some(_)) => true,
                Ok(None) => bytes_suffice,
                Err(_) => false,
            };
            caps.set(flag, available);
        }

        if codec::is_supported(self, ty) {
            caps |= Capabilities::CODEC;
        }
        caps
    }
}

fn role_ref(ty: &Type, role: Role) -> FunctionRef {
    match role {
        Role::Construct => ty.constructor,
        Role::Destruct => ty.destructor,
        Role::Copy => ty.copy_constructor,
        Role::Assign => ty.assignment,
    }
}
