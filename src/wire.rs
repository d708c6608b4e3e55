use core::fmt::{self, Debug, Formatter};
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::{
    any::TypeInfo,
    errors::WireErrorKind,
    registry::Bean,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// A settable property of a bean.
///
/// The container assigns through `&self`, so a bean doesn't need to expose
/// mutable fields or setters for its dependencies.
pub trait Slot {
    /// Type of bean the slot holds
    fn accepts(&self) -> TypeInfo;

    /// Assigns the value, replacing a previous one.
    ///
    /// # Errors
    /// Gives the value back if it has another type than [`Self::accepts`]
    fn set(&self, value: RcAnyThreadSafety) -> Result<(), RcAnyThreadSafety>;

    /// Drops the assigned value, if any
    fn clear(&self);
}

/// Table of the property slots of a bean type, looked up by their declared name.
///
/// Usually generated with [`crate::wire!`].
pub trait Wire {
    /// Finds the slot by exact, case-sensitive name
    fn slot(&self, property: &str) -> Option<&dyn Slot>;

    /// Names of all slots
    fn properties(&self) -> &'static [&'static str];
}

/// Property slot holding a shared reference to another bean.
///
/// Empty until the container wires it.
pub struct Autowired<T> {
    value: RwLock<Option<RcThreadSafety<T>>>,
}

impl<T> Autowired<T> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { value: RwLock::new(None) }
    }

    /// Returns the wired bean, `None` before wiring or after the container is closed
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<RcThreadSafety<T>> {
        self.value.read().clone()
    }

    #[inline]
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.value.read().is_some()
    }
}

impl<T> Default for Autowired<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Debug for Autowired<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("type", &TypeInfo::of::<T>().short_name())
            .field("wired", &self.is_wired())
            .finish()
    }
}

impl<T: SendSafety + SyncSafety + 'static> Slot for Autowired<T> {
    #[inline]
    fn accepts(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn set(&self, value: RcAnyThreadSafety) -> Result<(), RcAnyThreadSafety> {
        let value = value.downcast::<T>()?;
        *self.value.write() = Some(value);
        Ok(())
    }

    #[inline]
    fn clear(&self) {
        self.value.write().take();
    }
}

/// Assigns `value` into the `property` slot of `owner`.
///
/// # Errors
/// - Returns [`WireErrorKind::NoSlot`] if the owner's type has no slot named `property`
/// - Returns [`WireErrorKind::IncorrectType`] if the slot can't hold the value's type
pub(crate) fn wire(owner: &Bean, property: &str, value: &Bean) -> Result<(), WireErrorKind> {
    let Some(slot) = owner.wire.slot(property) else {
        let err = WireErrorKind::NoSlot {
            type_info: owner.type_info,
        };
        error!("{}", err);
        return Err(err);
    };

    let expected = slot.accepts();
    let actual = value.type_info;
    if expected != actual {
        let err = WireErrorKind::IncorrectType { expected, actual };
        error!("{}", err);
        return Err(err);
    }

    match slot.set(value.instance.clone()) {
        Ok(()) => {
            debug!(property, value = actual.short_name(), "Wired");
            Ok(())
        }
        Err(_) => {
            let err = WireErrorKind::IncorrectType { expected, actual };
            error!("{}", err);
            Err(err)
        }
    }
}

/// Clears every slot of the bean
pub(crate) fn unwire(bean: &Bean) {
    for property in bean.wire.properties() {
        if let Some(slot) = bean.wire.slot(property) {
            slot.clear();
        }
    }
}

/// Implements [`Wire`] for a bean type from a list of its [`Slot`] fields.
///
/// A field is matched by its own name unless renamed with `as "name"`,
/// which is handy for configurations written with `camelCase` property names.
///
/// # Examples
/// ```rust
/// use beanwire::{wire, Autowired};
///
/// #[derive(Default)]
/// struct FruitDao;
///
/// #[derive(Default)]
/// struct FruitService {
///     fruit_dao: Autowired<FruitDao>,
/// }
///
/// wire!(FruitDao);
/// wire!(FruitService { fruit_dao as "fruitDAO" });
/// ```
#[macro_export]
macro_rules! wire {
    (@name $field:ident) => {
        ::core::stringify!($field)
    };
    (@name $field:ident $name:literal) => {
        $name
    };
    ($ty:ty { $( $field:ident $(as $name:literal)? ),* $(,)? }) => {
        impl $crate::Wire for $ty {
            #[allow(unused_variables)]
            fn slot(&self, property: &str) -> ::core::option::Option<&dyn $crate::Slot> {
                $(
                    if property == $crate::wire!(@name $field $($name)?) {
                        return ::core::option::Option::Some(&self.$field);
                    }
                )*
                ::core::option::Option::None
            }

            fn properties(&self) -> &'static [&'static str] {
                &[$( $crate::wire!(@name $field $($name)?) ),*]
            }
        }
    };
    ($ty:ty) => {
        $crate::wire!($ty {});
    };
}
