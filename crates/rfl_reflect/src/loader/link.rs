use alloc::string::ToString;
use alloc::vec::Vec;
use core::mem;

use rfl_utils::hash::NoOpHashMap;
use rfl_utils::hash::hashbrown::hash_map::Entry;

use crate::graph::{
    FunctionHandle, FunctionRef, Parameter, ScopeOwner, Type, TypeHandle, TypeKind, TypeRef,
};
use crate::loader::{BadOrdinal, DuplicateName, LoadError, LoadReport, UnresolvedRef};
use crate::{Module, NameHash};

// -----------------------------------------------------------------------------
// Index

/// Second phase: map every type's full-name hash to its handle.
///
/// When two types share a hash the first one in document order is kept.
pub(super) fn index(module: &mut Module) {
    let mut index = NoOpHashMap::<NameHash, TypeHandle>::default();
    let mut duplicates = Vec::new();
    index.reserve(module.types.len());

    for (handle, ty) in module.types() {
        let hash = ty.full_name().hash();
        match index.entry(hash) {
            Entry::Vacant(entry) => {
                entry.insert(handle);
            }
            Entry::Occupied(entry) => {
                let kept = *entry.get();
                log::warn!(
                    "type `{}` shares full-name hash {} with `{}`, keeping the first",
                    ty.full_name(),
                    hash,
                    module.ty(kept).full_name(),
                );
                duplicates.push(DuplicateName {
                    name: ty.full_name().clone(),
                    kept,
                    ignored: handle,
                });
            }
        }
    }

    module.type_index = index;
    module.report.duplicates.extend(duplicates);
}

// -----------------------------------------------------------------------------
// Patch

/// Third phase: rewrite every placeholder to a handle or to absent.
pub(super) fn patch(module: &mut Module) {
    let index = mem::take(&mut module.type_index);
    let mut report = mem::take(&mut module.report);

    for (position, ty) in module.types.iter_mut().enumerate() {
        let handle = TypeHandle::new(position);
        let referrer = ScopeOwner::Type(handle);

        let mut resolve = |slot: &mut TypeRef| patch_type(&index, &mut report, referrer, slot);
        match &mut ty.kind {
            TypeKind::Class(class) => {
                for field in &mut class.fields {
                    resolve(&mut field.param.ty);
                }
            }
            TypeKind::TemplateInstance(instance) => {
                resolve(&mut instance.instance_of);
                instance.args.iter_mut().for_each(&mut resolve);
            }
            TypeKind::Primitive | TypeKind::Template | TypeKind::Enum(_) => {}
        }

        // Lifecycle ordinals index the type's own function list.
        let functions = &ty.scope.functions;
        for role in [
            &mut ty.constructor,
            &mut ty.destructor,
            &mut ty.copy_constructor,
            &mut ty.assignment,
        ] {
            patch_function(functions, &mut report, handle, role);
        }
    }

    for function in &mut module.functions {
        let referrer = function.owner;
        let params = function.return_param.iter_mut().chain(&mut function.params);
        for param in params {
            patch_type(&index, &mut report, referrer, &mut param.ty);
        }
    }

    module.type_index = index;
    module.report = report;
}

fn patch_type(
    index: &NoOpHashMap<NameHash, TypeHandle>,
    report: &mut LoadReport,
    referrer: ScopeOwner,
    slot: &mut TypeRef,
) {
    let TypeRef::Unresolved(hash) = *slot else {
        return;
    };
    *slot = match index.get(&hash) {
        Some(handle) => TypeRef::Resolved(*handle),
        None => {
            log::warn!("no type has full-name hash {hash}, reference set to absent");
            report.unresolved.push(UnresolvedRef { hash, referrer });
            TypeRef::Absent
        }
    };
}

fn patch_function(
    functions: &[FunctionHandle],
    report: &mut LoadReport,
    ty: TypeHandle,
    slot: &mut FunctionRef,
) {
    let FunctionRef::Ordinal(ordinal) = *slot else {
        return;
    };
    *slot = match functions.get(ordinal as usize) {
        Some(handle) => FunctionRef::Resolved(*handle),
        None => {
            log::warn!(
                "{ty:?} names function #{ordinal} but declares {} function(s)",
                functions.len(),
            );
            report.bad_ordinals.push(BadOrdinal { ty, ordinal });
            FunctionRef::Absent
        }
    };
}

// -----------------------------------------------------------------------------
// Checks

/// Fails if any resolved field reaches past the end of its class.
pub(super) fn check_fields(module: &Module) -> Result<(), LoadError> {
    for (_, ty) in module.types() {
        let Some(class) = ty.as_class() else {
            continue;
        };
        for field in &class.fields {
            // Absent types have no known size.
            let Some(bytes) = module.element_count_bytes(field) else {
                continue;
            };
            let end = u64::from(field.offset).saturating_add(bytes as u64);
            if end > ty.size() as u64 {
                return Err(out_of_bounds(ty, field, end));
            }
        }
    }
    Ok(())
}

/// Fails if a class contains itself by value, directly or through other
/// classes.
pub(super) fn check_containment(module: &Module) -> Result<(), LoadError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Open,
        Done,
    }

    fn value_fields(ty: &Type) -> impl Iterator<Item = TypeHandle> + '_ {
        ty.as_class()
            .into_iter()
            .flat_map(|class| &class.fields)
            .filter(|field| !field.modifier.is_indirect())
            .filter_map(|field| field.ty.handle())
    }

    let mut marks = alloc::vec![Mark::New; module.types.len()];
    let mut stack = Vec::new();
    for (root, _) in module.types() {
        if marks[root.index()] != Mark::New {
            continue;
        }
        marks[root.index()] = Mark::Open;
        stack.push((root, value_fields(module.ty(root))));

        while let Some((current, children)) = stack.last_mut() {
            match children.next() {
                Some(next) => match marks[next.index()] {
                    Mark::New => {
                        marks[next.index()] = Mark::Open;
                        stack.push((next, value_fields(module.ty(next))));
                    }
                    Mark::Open => {
                        return Err(LoadError::RecursiveLayout(
                            module.ty(next).full_name().text().to_string(),
                        ));
                    }
                    Mark::Done => {}
                },
                None => {
                    marks[current.index()] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}

fn out_of_bounds(owner: &Type, field: &Parameter, end: u64) -> LoadError {
    LoadError::FieldOutOfBounds {
        owner: owner.full_name().text().to_string(),
        field: field.name.text().to_string(),
        end,
        size: owner.size(),
    }
}

/// Turns recorded unresolved references into an error.
pub(super) fn deny_unresolved(report: &LoadReport) -> Result<(), LoadError> {
    match report.unresolved.first() {
        None => Ok(()),
        Some(first) => Err(LoadError::Unresolved {
            count: report.unresolved.len(),
            first: first.hash,
        }),
    }
}
