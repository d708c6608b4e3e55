use alloc::{string::String, vec::Vec};
use tracing::error;

use crate::errors::LoadErrorKind;

/// Reference from a property of the owning bean to another declared bean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    pub name: String,
    pub ref_id: String,
}

impl PropertyRef {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ref_id: ref_id.into(),
        }
    }
}

/// Static description of a bean: its id, the name its type is registered under
/// and the references wired into it, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDeclaration {
    pub id: String,
    pub type_name: String,
    pub properties: Vec<PropertyRef>,
}

impl BeanDeclaration {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            properties: Vec::new(),
        }
    }

    /// Appends a property reference, keeping declaration order
    #[inline]
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, ref_id: impl Into<String>) -> Self {
        self.properties.push(PropertyRef::new(name, ref_id));
        self
    }
}

/// Rejects declarations with empty identifiers before anything is instantiated.
///
/// # Errors
/// Returns [`LoadErrorKind::InvalidDeclaration`] for the first offending declaration
pub(crate) fn validate(declarations: &[BeanDeclaration]) -> Result<(), LoadErrorKind> {
    for (index, declaration) in declarations.iter().enumerate() {
        let reason = if declaration.id.is_empty() {
            "empty bean id"
        } else if declaration.type_name.is_empty() {
            "empty type name"
        } else if declaration.properties.iter().any(|property| property.name.is_empty()) {
            "empty property name"
        } else if declaration.properties.iter().any(|property| property.ref_id.is_empty()) {
            "empty property reference"
        } else {
            continue;
        };

        let err = LoadErrorKind::InvalidDeclaration { index, reason };
        error!("{}", err);
        return Err(err);
    }
    Ok(())
}
