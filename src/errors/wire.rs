use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum WireErrorKind {
    #[error("Type {type_info} has no property slot with this name")]
    NoSlot { type_info: TypeInfo },
    #[error("Incorrect property value type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
}
