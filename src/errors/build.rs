use alloc::string::String;

use super::{instantiate::InstantiateErrorKind, load::LoadErrorKind, wire::WireErrorKind};

/// Failure of a container build. Every variant aborts the whole build,
/// no bean of a failed build is reachable.
#[derive(thiserror::Error, Debug)]
pub enum BuildErrorKind {
    #[error(transparent)]
    ConfigurationLoad(#[from] LoadErrorKind),
    #[error("Bean id `{id}` is declared more than once")]
    DuplicateBeanId { id: String },
    #[error("Type `{type_name}` of bean `{id}` can't be resolved: {source}")]
    TypeResolution {
        id: String,
        type_name: String,
        #[source]
        source: InstantiateErrorKind,
    },
    #[error("Property `{property}` of bean `{id}` can't be wired: {source}")]
    PropertyResolution {
        id: String,
        property: String,
        #[source]
        source: WireErrorKind,
    },
    #[error("Bean `{id}` referenced by property `{property}` of bean `{owner}` isn't declared")]
    UnknownBeanId { id: String, owner: String, property: String },
}
