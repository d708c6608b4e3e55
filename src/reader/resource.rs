use alloc::{
    boxed::Box,
    string::{String, ToString as _},
    vec::Vec,
};
use std::{fs, path::PathBuf};
use tracing::{debug, debug_span, error};

use super::DeclarationReader;
use crate::{config::Config, declaration::BeanDeclaration, errors::LoadErrorKind};

/// Resource read when no configuration path is given
pub const DEFAULT_RESOURCE: &str = "applicationContext.xml";

/// Configuration file looked up in the resource roots of a [`Config`].
/// The format is picked by the file extension: `xml` or `toml`.
#[derive(Debug, Clone)]
pub struct Resource {
    path: String,
    config: Config,
}

impl Resource {
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_config(path, Config::default())
    }

    #[inline]
    #[must_use]
    pub fn with_config(path: impl Into<String>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Finds the first existing file for the path.
    ///
    /// # Errors
    /// - Returns [`LoadErrorKind::EmptyPath`] if the path is empty
    /// - Returns [`LoadErrorKind::NotFound`] if no root contains the path
    pub fn locate(&self) -> Result<PathBuf, LoadErrorKind> {
        if self.path.is_empty() {
            let err = LoadErrorKind::EmptyPath;
            error!("{}", err);
            return Err(err);
        }

        if let Some(path) = self
            .config
            .roots
            .iter()
            .map(|root| root.join(&self.path))
            .find(|path| path.is_file())
        {
            debug!(path = %path.display(), "Located");
            return Ok(path);
        }

        let err = LoadErrorKind::NotFound {
            path: self.path.clone(),
            roots: self.config.roots.iter().map(|root| root.display().to_string()).collect(),
        };
        error!("{}", err);
        Err(err)
    }
}

impl Default for Resource {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE)
    }
}

impl DeclarationReader for Resource {
    fn read(self) -> Result<Vec<BeanDeclaration>, LoadErrorKind> {
        let span = debug_span!("read", resource = self.path.as_str());
        let _guard = span.enter();

        let path = self.locate()?;
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                let err = LoadErrorKind::Io {
                    path: self.path.clone(),
                    source: Box::new(err),
                };
                error!("{}", err);
                return Err(err);
            }
        };

        match path.extension().and_then(|extension| extension.to_str()) {
            #[cfg(feature = "xml")]
            Some(extension) if extension.eq_ignore_ascii_case("xml") => super::XmlReader::new(&source).read(),
            #[cfg(feature = "toml")]
            Some(extension) if extension.eq_ignore_ascii_case("toml") => super::TomlReader::new(&source).read(),
            _ => {
                let err = LoadErrorKind::UnsupportedFormat { path: self.path };
                error!("{}", err);
                Err(err)
            }
        }
    }
}
