use rfl_utils::hash::HashSet;

use crate::graph::{TypeHandle, TypeKind};
use crate::registry::TypeRegistry;

/// Returns `true` if the codec handles `ty` under [`UnsupportedPolicy::Fail`].
///
/// Types reached again through a hooked container count as supported, so
/// a class holding an array of itself is accepted.
///
/// [`UnsupportedPolicy::Fail`]: crate::codec::UnsupportedPolicy::Fail
pub(crate) fn is_supported(registry: &TypeRegistry, ty: TypeHandle) -> bool {
    let mut visiting = HashSet::default();
    check(registry, ty, &mut visiting)
}

fn check(registry: &TypeRegistry, ty: TypeHandle, visiting: &mut HashSet<TypeHandle>) -> bool {
    if !visiting.insert(ty) {
        return true;
    }
    let info = registry.module().ty(ty);

    if registry.hooks(ty).is_some() {
        return match info.as_instance() {
            Some(instance) => instance
                .args
                .iter()
                .filter_map(|arg| arg.handle())
                .all(|arg| check(registry, arg, visiting)),
            None => true,
        };
    }

    match &info.kind {
        TypeKind::Primitive | TypeKind::Enum(_) => true,
        TypeKind::Class(class) => class
            .fields
            .iter()
            .filter(|field| !field.is_transient())
            .all(|field| {
                !field.modifier.is_indirect()
                    && field
                        .ty
                        .handle()
                        .is_some_and(|field_ty| check(registry, field_ty, visiting))
            }),
        TypeKind::Template | TypeKind::TemplateInstance(_) => false,
    }
}
