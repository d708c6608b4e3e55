#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Type isn't registered")]
    UnknownType,
    #[error("Type is registered as abstract and can't be instantiated")]
    NotInstantiable,
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
