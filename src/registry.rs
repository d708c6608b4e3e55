use alloc::{collections::BTreeMap, string::String};
use tracing::{debug, error, warn};

use crate::{
    any::TypeInfo,
    errors::{BuildErrorKind, ResolveErrorKind},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, RcWireThreadSafety, SendSafety, SyncSafety},
    wire::Wire,
};

/// Live bean with two views of the same allocation:
/// `instance` for lookups and downcasts, `wire` for its slot table.
#[derive(Clone)]
pub(crate) struct Bean {
    pub(crate) instance: RcAnyThreadSafety,
    pub(crate) wire: RcWireThreadSafety,
    pub(crate) type_info: TypeInfo,
}

impl Bean {
    #[inline]
    #[must_use]
    pub(crate) fn new<T: Wire + SendSafety + SyncSafety + 'static>(value: T) -> Self {
        let value = RcThreadSafety::new(value);
        Self {
            instance: value.clone(),
            wire: value,
            type_info: TypeInfo::of::<T>(),
        }
    }
}

/// Bean id to instance mapping owned by a container
#[derive(Default)]
pub(crate) struct BeanRegistry {
    beans: BTreeMap<String, Bean>,
}

impl BeanRegistry {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { beans: BTreeMap::new() }
    }

    /// # Errors
    /// Returns [`BuildErrorKind::DuplicateBeanId`] if the id is already registered, the registered bean is kept
    pub(crate) fn put(&mut self, id: &str, bean: Bean) -> Result<(), BuildErrorKind> {
        use alloc::collections::btree_map::Entry::{Occupied, Vacant};

        match self.beans.entry(id.into()) {
            Vacant(entry) => {
                entry.insert(bean);
                debug!(id, "Registered");
                Ok(())
            }
            Occupied(_) => {
                let err = BuildErrorKind::DuplicateBeanId { id: id.into() };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// # Errors
    /// Returns [`ResolveErrorKind::UnknownBeanId`] if the id isn't registered
    pub(crate) fn get(&self, id: &str) -> Result<&Bean, ResolveErrorKind> {
        self.beans.get(id).ok_or_else(|| {
            let err = ResolveErrorKind::UnknownBeanId { id: id.into() };
            warn!("{}", err);
            err
        })
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.beans.contains_key(id)
    }

    #[inline]
    pub(crate) fn ids(&self) -> impl Iterator<Item = &str> {
        self.beans.keys().map(String::as_str)
    }

    #[inline]
    pub(crate) fn beans(&self) -> impl Iterator<Item = &Bean> {
        self.beans.values()
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.beans.len()
    }
}
