use std::io::Read;

use rfl_ptr::PtrMut;

use crate::TypeOf;
use crate::codec::ser::is_block;
use crate::codec::{CodecError, UnsupportedPolicy, field_type};
use crate::graph::{Type, TypeHandle, TypeKind};
use crate::registry::TypeRegistry;

/// Reads objects back from a stream written by a [`Serializer`].
///
/// Values are overwritten in place: the target must already be a live
/// object, typically fresh from [`TypeRegistry::create_object`].
///
/// [`Serializer`]: crate::codec::Serializer
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'r> {
    registry: &'r TypeRegistry,
    policy: UnsupportedPolicy,
}

impl<'r> Deserializer<'r> {
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

    /// Reads an instance of `ty` into the object at `value`.
    ///
    /// On error the object stays valid but holds a mix of old and new
    /// values.
    ///
    /// # Safety
    /// - `value` points to a live object laid out as `ty` describes.
    /// - Every hook and array element type reached from `ty` describes the
    ///   memory it is applied to.
    /// - Any byte pattern is a valid value for data copied verbatim.
    pub unsafe fn deserialize<R: Read>(
        &self,
        ty: TypeHandle,
        value: PtrMut<'_>,
        input: &mut R,
    ) -> Result<(), CodecError> {
        unsafe { self.read_object(ty, value, input) }
    }

    /// Like [`Deserializer::deserialize`], reading from a byte slice.
    ///
    /// # Safety
    /// Same as [`Deserializer::deserialize`].
    pub unsafe fn from_bytes(
        &self,
        ty: TypeHandle,
        value: PtrMut<'_>,
        mut bytes: &[u8],
    ) -> Result<(), CodecError> {
        unsafe { self.read_object(ty, value, &mut bytes) }
    }

    /// Reads into a value whose Rust type is linked to the module by [`TypeOf`].
    pub fn deserialize_typed<T: TypeOf, R: Read>(
        &self,
        value: &mut T,
        input: &mut R,
    ) -> Result<(), CodecError> {
        let ty = self
            .registry
            .module()
            .type_of::<T>()
            .ok_or(CodecError::UnboundType(core::any::type_name::<T>()))?;
        // SAFETY: `TypeOf` guarantees `ty` describes `T`.
        unsafe { self.read_object(ty, PtrMut::from_mut(value), input) }
    }

    pub fn from_bytes_typed<T: TypeOf>(
        &self,
        value: &mut T,
        mut bytes: &[u8],
    ) -> Result<(), CodecError> {
        self.deserialize_typed(value, &mut bytes)
    }

    /// Reads one object; the entry point for hooks that nest objects.
    ///
    /// # Safety
    /// Same as [`Deserializer::deserialize`].
    pub unsafe fn read_object(
        &self,
        ty: TypeHandle,
        value: PtrMut<'_>,
        input: &mut dyn Read,
    ) -> Result<(), CodecError> {
        if let Some(hooks) = self.registry.hooks(ty) {
            return unsafe { (hooks.deserialize)(self, ty, value, input) };
        }

        let info = self.registry.module().ty(ty);
        match &info.kind {
            TypeKind::Primitive | TypeKind::Enum(_) => {
                input.read_exact(unsafe { value.as_bytes_mut(info.size()) })?;
                Ok(())
            }
            TypeKind::Class(_) => unsafe { self.read_fields(info, value, input) },
            TypeKind::TemplateInstance(_) => self
                .policy
                .unsupported(info, "template instance without codec hooks"),
            TypeKind::Template => self.policy.unsupported(info, "templates have no objects"),
        }
    }

    /// Reads `count` consecutive objects of type `elem`, all live.
    ///
    /// # Safety
    /// Same as [`Deserializer::deserialize`], for each of the `count` objects.
    pub unsafe fn read_elements(
        &self,
        elem: TypeHandle,
        mut data: PtrMut<'_>,
        count: usize,
        input: &mut dyn Read,
    ) -> Result<(), CodecError> {
        let info = self.registry.module().ty(elem);
        let stride = info.size();

        if is_block(self.registry, elem, info) {
            let len = stride
                .checked_mul(count)
                .ok_or(CodecError::LengthOverflow(count))?;
            input.read_exact(unsafe { data.as_bytes_mut(len) })?;
            return Ok(());
        }
        for index in 0..count {
            unsafe { self.read_object(elem, data.reborrow().byte_add(index * stride), input)? };
        }
        Ok(())
    }

    unsafe fn read_fields(
        &self,
        owner: &Type,
        mut object: PtrMut<'_>,
        input: &mut dyn Read,
    ) -> Result<(), CodecError> {
        let module = self.registry.module();
        let Some(class) = owner.as_class() else {
            return Ok(());
        };

        for field in &class.fields {
            let Some(ty) = field_type(module, self.policy, owner, field)? else {
                continue;
            };
            let data = unsafe { object.reborrow().byte_add(field.offset as usize) };
            if field.array.is_array() {
                unsafe { self.read_elements(ty, data, field.array.element_count(), input)? };
            } else {
                unsafe { self.read_object(ty, data, input)? };
            }
        }
        Ok(())
    }
}
