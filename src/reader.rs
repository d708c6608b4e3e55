use alloc::vec::Vec;

use crate::{declaration::BeanDeclaration, errors::LoadErrorKind};

#[cfg(any(feature = "xml", feature = "toml"))]
mod raw;
#[cfg(feature = "std")]
mod resource;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "xml")]
mod xml;

#[cfg(feature = "std")]
pub use resource::{Resource, DEFAULT_RESOURCE};
#[cfg(feature = "toml")]
pub use self::toml::TomlReader;
#[cfg(feature = "xml")]
pub use self::xml::XmlReader;

/// Source of bean declarations, read once per container build
pub trait DeclarationReader {
    /// Reads all declarations in source order.
    ///
    /// # Errors
    /// Returns [`LoadErrorKind`] if the source can't be read or parsed
    fn read(self) -> Result<Vec<BeanDeclaration>, LoadErrorKind>;
}

impl DeclarationReader for Vec<BeanDeclaration> {
    #[inline]
    fn read(self) -> Result<Vec<BeanDeclaration>, LoadErrorKind> {
        Ok(self)
    }
}
