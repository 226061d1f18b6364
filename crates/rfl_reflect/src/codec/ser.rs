use alloc::vec::Vec;
use std::io::Write;

use rfl_ptr::Ptr;

use crate::TypeOf;
use crate::codec::{CodecError, UnsupportedPolicy, field_type};
use crate::graph::{Type, TypeHandle, TypeKind};
use crate::registry::TypeRegistry;

/// Writes objects to a byte stream as their graph types describe them.
///
/// See the [module documentation](crate::codec) for the dispatch rules.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'r> {
    registry: &'r TypeRegistry,
    policy: UnsupportedPolicy,
}

impl<'r> Serializer<'r> {
    #[inline]
    pub const fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            policy: UnsupportedPolicy::Fail,
        }
    }

    #[inline]
    pub const fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline(always)]
    pub const fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    #[inline(always)]
    pub const fn policy(&self) -> UnsupportedPolicy {
        self.policy
    }

    /// Writes the object at `value` as an instance of `ty`.
    ///
    /// # Safety
    /// - `value` points to a live object laid out as `ty` describes.
    /// - Every hook and array element type reached from `ty` describes the
    ///   memory it is applied to.
    /// - Bytes copied verbatim hold no uninitialized padding.
    pub unsafe fn serialize<W: Write>(
        &self,
        ty: TypeHandle,
        value: Ptr<'_>,
        out: &mut W,
    ) -> Result<(), CodecError> {
        unsafe { self.write_object(ty, value, out) }
    }

    /// Like [`Serializer::serialize`], collecting the stream into a buffer.
    ///
    /// # Safety
    /// Same as [`Serializer::serialize`].
    pub unsafe fn to_bytes(&self, ty: TypeHandle, value: Ptr<'_>) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        unsafe { self.write_object(ty, value, &mut out)? };
        Ok(out)
    }

    /// Writes a value whose Rust type is linked to the module by [`TypeOf`].
    pub fn serialize_typed<T: TypeOf, W: Write>(
        &self,
        value: &T,
        out: &mut W,
    ) -> Result<(), CodecError> {
        let ty = self
            .registry
            .module()
            .type_of::<T>()
            .ok_or(CodecError::UnboundType(core::any::type_name::<T>()))?;
        // SAFETY: `TypeOf` guarantees `ty` describes `T`.
        unsafe { self.write_object(ty, Ptr::from_ref(value), out) }
    }

    pub fn to_bytes_typed<T: TypeOf>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.serialize_typed(value, &mut out)?;
        Ok(out)
    }

    /// Writes one object; the entry point for hooks that nest objects.
    ///
    /// # Safety
    /// Same as [`Serializer::serialize`].
    pub unsafe fn write_object(
        &self,
        ty: TypeHandle,
        value: Ptr<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CodecError> {
        if let Some(hooks) = self.registry.hooks(ty) {
            return unsafe { (hooks.serialize)(self, ty, value, out) };
        }

        let info = self.registry.module().ty(ty);
        match &info.kind {
            TypeKind::Primitive | TypeKind::Enum(_) => {
                out.write_all(unsafe { value.as_bytes(info.size()) })?;
                Ok(())
            }
            TypeKind::Class(_) => unsafe { self.write_fields(info, value, out) },
            TypeKind::TemplateInstance(_) => self
                .policy
                .unsupported(info, "template instance without codec hooks"),
            TypeKind::Template => self.policy.unsupported(info, "templates have no objects"),
        }
    }

    /// Writes `count` consecutive objects of type `elem`.
    ///
    /// Element types without a constructor or hooks are copied in one block
    /// when they are base types, enums or POD classes.
    ///
    /// # Safety
    /// Same as [`Serializer::serialize`], for each of the `count` objects.
    pub unsafe fn write_elements(
        &self,
        elem: TypeHandle,
        data: Ptr<'_>,
        count: usize,
        out: &mut dyn Write,
    ) -> Result<(), CodecError> {
        let info = self.registry.module().ty(elem);
        let stride = info.size();

        if is_block(self.registry, elem, info) {
            let len = stride
                .checked_mul(count)
                .ok_or(CodecError::LengthOverflow(count))?;
            out.write_all(unsafe { data.as_bytes(len) })?;
            return Ok(());
        }
        for index in 0..count {
            unsafe { self.write_object(elem, data.byte_add(index * stride), out)? };
        }
        Ok(())
    }

    unsafe fn write_fields(
        &self,
        owner: &Type,
        object: Ptr<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CodecError> {
        let module = self.registry.module();
        let Some(class) = owner.as_class() else {
            return Ok(());
        };

        for field in &class.fields {
            let Some(ty) = field_type(module, self.policy, owner, field)? else {
                continue;
            };
            let data = unsafe { object.byte_add(field.offset as usize) };
            if field.array.is_array() {
                unsafe { self.write_elements(ty, data, field.array.element_count(), out)? };
            } else {
                unsafe { self.write_object(ty, data, out)? };
            }
        }
        Ok(())
    }
}

/// Returns `true` if objects of `ty` travel as one block of bytes: no
/// constructor, no hooks, and either a base type, an enum or a POD class.
pub(super) fn is_block(registry: &TypeRegistry, ty: TypeHandle, info: &Type) -> bool {
    if info.is_constructible() || registry.hooks(ty).is_some() {
        return false;
    }
    match &info.kind {
        TypeKind::Primitive | TypeKind::Enum(_) => true,
        // Non-POD classes go element by element even without a constructor,
        // so their padding is never read or written.
        TypeKind::Class(class) => class.is_pod,
        TypeKind::Template | TypeKind::TemplateInstance(_) => false,
    }
}
