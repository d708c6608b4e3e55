use alloc::{boxed::Box, string::String, vec::Vec};
use core::error::Error;

#[derive(thiserror::Error, Debug)]
pub enum LoadErrorKind {
    #[error("Configuration path isn't specified")]
    EmptyPath,
    #[error("Configuration `{path}` not found. Searched roots: {roots:?}")]
    NotFound { path: String, roots: Vec<String> },
    #[error("Configuration `{path}` can't be read")]
    Io {
        path: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("Configuration `{path}` has unsupported format")]
    UnsupportedFormat { path: String },
    #[error("Configuration can't be parsed as {format}")]
    Parse {
        format: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("Bean declaration #{index} is invalid: {reason}")]
    InvalidDeclaration { index: usize, reason: &'static str },
}
