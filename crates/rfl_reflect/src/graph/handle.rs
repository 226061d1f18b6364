use core::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wraps an arena index.
            ///
            /// Arenas never exceed `u32::MAX` entries, the loader checks this
            /// before any handle is created.
            #[inline(always)]
            pub(crate) const fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// Returns the arena index.
            #[inline(always)]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_handle!(
    /// Stable index of a [`Namespace`](super::Namespace) in its [`Module`](super::Module).
    NamespaceHandle,
    "Namespace"
);

define_handle!(
    /// Stable index of a [`Type`](super::Type) in its [`Module`](super::Module).
    ///
    /// Handles are only meaningful for the module that produced them.
    TypeHandle,
    "Type"
);

define_handle!(
    /// Stable index of a [`Function`](super::Function) in its [`Module`](super::Module).
    FunctionHandle,
    "Function"
);
