use alloc::{boxed::Box, vec::Vec};
use tracing::{debug, error};

use super::{raw::RawBeans, DeclarationReader};
use crate::{declaration::BeanDeclaration, errors::LoadErrorKind};

/// Reads `<bean id=".." class="..">` elements with their `<property name=".." ref=".."/>` children.
///
/// The root element name isn't checked and elements other than `bean` and `property` are ignored.
#[derive(Debug, Clone, Copy)]
pub struct XmlReader<'a> {
    source: &'a str,
}

impl<'a> XmlReader<'a> {
    #[inline]
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self { source }
    }
}

impl DeclarationReader for XmlReader<'_> {
    fn read(self) -> Result<Vec<BeanDeclaration>, LoadErrorKind> {
        match quick_xml::de::from_str::<RawBeans>(self.source) {
            Ok(beans) => {
                let declarations = Vec::from(beans);
                debug!(count = declarations.len(), "Read XML declarations");
                Ok(declarations)
            }
            Err(err) => {
                let err = LoadErrorKind::Parse {
                    format: "XML",
                    source: Box::new(err),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }
}
