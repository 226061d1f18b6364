use bitflags::bitflags;

bitflags! {
    /// What can be done with objects of a type through a [`TypeRegistry`].
    ///
    /// A lifecycle flag is set when the operation can run: the declared role
    /// is bound, or no role is declared and plain bytes suffice. Copy and
    /// assignment fall back to bytes only for types that declare no
    /// lifecycle role at all. Templates have no capabilities.
    ///
    /// [`TypeRegistry`]: crate::registry::TypeRegistry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const CONSTRUCT = 1 << 0;
        const DESTRUCT = 1 << 1;
        const COPY = 1 << 2;
        const ASSIGN = 1 << 3;
        const SERIALIZE = 1 << 4;
        const DESERIALIZE = 1 << 5;
    }
}

impl Capabilities {
    /// Both codec directions.
    pub const CODEC: Self = Self::SERIALIZE.union(Self::DESERIALIZE);
}
