use alloc::string::String;

use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Bean `{id}` not found in registry")]
    UnknownBeanId { id: String },
    #[error("Bean `{id}` has incorrect type. Actual: {actual}, expected: {expected}")]
    IncorrectType { id: String, expected: TypeInfo, actual: TypeInfo },
}
