use alloc::{boxed::Box, vec::Vec};
use tracing::{debug, error};

use super::{raw::RawBeans, DeclarationReader};
use crate::{declaration::BeanDeclaration, errors::LoadErrorKind};

/// Reads `[[bean]]` tables with `id`, `class` and `[[bean.property]]` entries of `name` and `ref`
#[derive(Debug, Clone, Copy)]
pub struct TomlReader<'a> {
    source: &'a str,
}

impl<'a> TomlReader<'a> {
    #[inline]
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self { source }
    }
}

impl DeclarationReader for TomlReader<'_> {
    fn read(self) -> Result<Vec<BeanDeclaration>, LoadErrorKind> {
        match ::toml::from_str::<RawBeans>(self.source) {
            Ok(beans) => {
                let declarations = Vec::from(beans);
                debug!(count = declarations.len(), "Read TOML declarations");
                Ok(declarations)
            }
            Err(err) => {
                let err = LoadErrorKind::Parse {
                    format: "TOML",
                    source: Box::new(err),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }
}
