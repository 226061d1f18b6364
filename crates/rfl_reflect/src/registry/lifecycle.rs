use alloc::string::String;
use core::fmt;

use rfl_ptr::{OwningPtr, Ptr, PtrMut};
use thiserror::Error;

use crate::graph::FunctionHandle;

// -----------------------------------------------------------------------------
// Callables

/// Default-constructs an object in uninitialized storage.
pub type ConstructFn = unsafe fn(PtrMut<'_>);

/// Destroys an object; the storage itself is not released.
pub type DestructFn = unsafe fn(OwningPtr<'_>);

/// Clones `src` into uninitialized storage.
pub type CopyFn = unsafe fn(Ptr<'_>, PtrMut<'_>);

/// Clones `src` over a live object.
pub type AssignFn = unsafe fn(Ptr<'_>, PtrMut<'_>);

/// The four lifecycle roles a type can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Construct,
    Destruct,
    Copy,
    Assign,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Construct => "constructor",
            Self::Destruct => "destructor",
            Self::Copy => "copy constructor",
            Self::Assign => "assignment operator",
        })
    }
}

/// A native function bound to a graph [`Function`](crate::graph::Function).
#[derive(Clone, Copy)]
pub enum Callable {
    Construct(ConstructFn),
    Destruct(DestructFn),
    Copy(CopyFn),
    Assign(AssignFn),
}

impl Callable {
    #[inline]
    pub const fn role(&self) -> Role {
        match self {
            Self::Construct(_) => Role::Construct,
            Self::Destruct(_) => Role::Destruct,
            Self::Copy(_) => Role::Copy,
            Self::Assign(_) => Role::Assign,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({:?})", self.role())
    }
}

// -----------------------------------------------------------------------------
// Lifecycle

/// A set of lifecycle callables for one type.
///
/// # Examples
///
/// ```
/// use rfl_reflect::registry::Lifecycle;
///
/// let full = Lifecycle::of::<String>();
/// assert!(full.construct.is_some() && full.destruct.is_some());
///
/// let drop_only = Lifecycle::new().with_drop::<Vec<u8>>();
/// assert!(drop_only.construct.is_none());
/// assert!(drop_only.destruct.is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    pub construct: Option<ConstructFn>,
    pub destruct: Option<DestructFn>,
    pub copy: Option<CopyFn>,
    pub assign: Option<AssignFn>,
}

impl Lifecycle {
    /// An empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            construct: None,
            destruct: None,
            copy: None,
            assign: None,
        }
    }

    /// Every role, implemented with `Default`, `Drop` and `Clone`.
    #[inline]
    pub const fn of<T: Default + Clone>() -> Self {
        Self::new()
            .with_default::<T>()
            .with_drop::<T>()
            .with_clone::<T>()
    }

    /// Sets the constructor to `T::default()`.
    #[inline]
    pub const fn with_default<T: Default>(mut self) -> Self {
        self.construct = Some(construct_default::<T>);
        self
    }

    /// Sets the destructor to dropping a `T` in place.
    #[inline]
    pub const fn with_drop<T>(mut self) -> Self {
        self.destruct = Some(drop_in_place::<T>);
        self
    }

    /// Sets copy construction and assignment through `Clone`.
    #[inline]
    pub const fn with_clone<T: Clone>(mut self) -> Self {
        self.copy = Some(clone_into::<T>);
        self.assign = Some(clone_over::<T>);
        self
    }

    /// The callable this set provides for `role`.
    pub const fn get(&self, role: Role) -> Option<Callable> {
        match role {
            Role::Construct => match self.construct {
                Some(func) => Some(Callable::Construct(func)),
                None => None,
            },
            Role::Destruct => match self.destruct {
                Some(func) => Some(Callable::Destruct(func)),
                None => None,
            },
            Role::Copy => match self.copy {
                Some(func) => Some(Callable::Copy(func)),
                None => None,
            },
            Role::Assign => match self.assign {
                Some(func) => Some(Callable::Assign(func)),
                None => None,
            },
        }
    }
}

/// # Safety
/// - `ptr` points to uninitialized storage for a `T`.
unsafe fn construct_default<T: Default>(ptr: PtrMut<'_>) {
    ptr.debug_assert_aligned::<T>();
    unsafe {
        ptr.as_ptr().cast::<T>().write(T::default());
    }
}

/// # Safety
/// - `ptr` points to a live `T`.
unsafe fn drop_in_place<T>(ptr: OwningPtr<'_>) {
    ptr.debug_assert_aligned::<T>();
    unsafe {
        ptr.drop_as::<T>();
    }
}

/// # Safety
/// - `src` points to a live `T`.
/// - `dst` points to uninitialized storage for a `T`.
unsafe fn clone_into<T: Clone>(src: Ptr<'_>, dst: PtrMut<'_>) {
    src.debug_assert_aligned::<T>();
    dst.debug_assert_aligned::<T>();
    unsafe {
        let value = src.as_ref::<T>().clone();
        dst.as_ptr().cast::<T>().write(value);
    }
}

/// # Safety
/// - `src` and `dst` point to live `T`s.
unsafe fn clone_over<T: Clone>(src: Ptr<'_>, dst: PtrMut<'_>) {
    src.debug_assert_aligned::<T>();
    dst.debug_assert_aligned::<T>();
    unsafe {
        dst.consume::<T>().clone_from(src.as_ref::<T>());
    }
}

// -----------------------------------------------------------------------------
// LifecycleError

/// Error returned by lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LifecycleError {
    /// The graph declares the role but nothing was registered for it.
    #[error("`{ty}` declares a {role} but no callable is bound to it")]
    Unbound { ty: String, role: Role },
    /// A function holds a callable of another role.
    #[error("{function:?} is used as a {expected} but is bound to a {found}")]
    RoleMismatch {
        function: FunctionHandle,
        expected: Role,
        found: Role,
    },
    /// Templates describe no objects.
    #[error("`{0}` is a template and has no objects")]
    NotConstructible(String),
    /// Copy was requested for a type that declares no copy constructor and is
    /// not trivially copyable.
    #[error("`{0}` is not copyable")]
    NotCopyable(String),
    #[error("no type is named `{0}`")]
    UnknownType(String),
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use core::mem::MaybeUninit;
    use core::ptr::NonNull;

    use rfl_ptr::{OwningPtr, Ptr, PtrMut};

    use super::{Lifecycle, Role};

    #[test]
    fn typed_callables() {
        let lifecycle = Lifecycle::of::<Rc<String>>();
        let source = Rc::new(String::from("shared"));

        let mut copy = MaybeUninit::<Rc<String>>::uninit();
        unsafe {
            (lifecycle.copy.unwrap())(Ptr::from_ref(&source), PtrMut::from_mut(&mut copy));
        }
        assert_eq!(Rc::strong_count(&source), 2);

        let mut fresh = MaybeUninit::<Rc<String>>::uninit();
        unsafe {
            (lifecycle.construct.unwrap())(PtrMut::from_mut(&mut fresh));
            assert_eq!(**fresh.assume_init_ref(), "");
            (lifecycle.assign.unwrap())(Ptr::from_ref(&source), PtrMut::from_mut(&mut fresh));
        }
        assert_eq!(Rc::strong_count(&source), 3);

        let destruct = lifecycle.destruct.unwrap();
        unsafe {
            destruct(OwningPtr::new(NonNull::from(&mut copy).cast()));
            destruct(OwningPtr::new(NonNull::from(&mut fresh).cast()));
        }
        assert_eq!(Rc::strong_count(&source), 1);
    }

    #[test]
    fn partial_sets() {
        let lifecycle = Lifecycle::new().with_default::<u32>();
        assert!(lifecycle.get(Role::Construct).is_some());
        assert!(lifecycle.get(Role::Destruct).is_none());
        assert_eq!(
            lifecycle.get(Role::Construct).map(|c| c.role()),
            Some(Role::Construct)
        );
        assert_eq!(Role::Assign.to_string(), "assignment operator");
    }
}
