use crate::registry::{Lifecycle, TypeRegistry};

/// A lifecycle submitted by [`auto_register!`](crate::auto_register).
#[derive(Debug)]
pub struct AutoRegistration {
    /// Full name of the graph type.
    pub type_name: &'static str,
    pub lifecycle: Lifecycle,
}

inventory::collect!(AutoRegistration);

/// Submits a lifecycle for a graph type at link time.
///
/// `T => "name"` registers [`Lifecycle::of::<T>`]; `"name" => expr` registers
/// any constant [`Lifecycle`]. Entries are applied by
/// [`TypeRegistry::auto_register`].
///
/// # Examples
///
/// ```
/// use rfl_reflect::auto_register;
/// use rfl_reflect::registry::Lifecycle;
///
/// #[derive(Default, Clone)]
/// struct Settings {
///     volume: u8,
/// }
///
/// auto_register!(Settings => "app::Settings");
/// auto_register!("app::Blob" => Lifecycle::new().with_drop::<Vec<u8>>());
/// ```
///
/// [`Lifecycle::of::<T>`]: crate::registry::Lifecycle::of
#[macro_export]
macro_rules! auto_register {
    ($ty:ty => $name:literal) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::AutoRegistration {
                type_name: $name,
                lifecycle: $crate::registry::Lifecycle::of::<$ty>(),
            }
        }
    };
    ($name:literal => $lifecycle:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::AutoRegistration {
                type_name: $name,
                lifecycle: $lifecycle,
            }
        }
    };
}

impl TypeRegistry {
    /// Applies every [`auto_register!`](crate::auto_register) entry whose
    /// type exists in the module.
    ///
    /// Returns how many entries were applied. Calling it again rebinds the
    /// same callables.
    pub fn auto_register(&mut self) -> usize {
        let mut applied = 0;
        for entry in inventory::iter::<AutoRegistration> {
            match self.module().find_type(entry.type_name) {
                Some(ty) => {
                    self.register_lifecycle(ty, entry.lifecycle);
                    applied += 1;
                }
                None => log::debug!("`{}` is not in the module, skipped", entry.type_name),
            }
        }
        applied
    }
}
