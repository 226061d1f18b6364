use crate::Module;
use crate::graph::TypeHandle;

/// Fourth phase: publish every type that carries a static slot.
///
/// A slot claimed twice keeps the first type.
pub(super) fn bind(module: &mut Module) {
    let mut rebound = 0;
    for (index, ty) in module.types.iter().enumerate() {
        let Some(slot) = ty.slot else {
            continue;
        };
        let handle = TypeHandle::new(index);
        match module.slots.get(slot) {
            None => {
                module.slots.bind(slot, handle);
            }
            Some(kept) => {
                log::warn!(
                    "{slot:?} is claimed by `{}` and `{}`, keeping the first",
                    module.types[kept.index()].full_name(),
                    ty.full_name(),
                );
                rebound += 1;
            }
        }
    }
    module.report.rebound_slots += rebound;
    log::debug!("bound {} static type slot(s)", module.slots.len());
}
