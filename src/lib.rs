#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod any;
#[cfg(feature = "std")]
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod declaration;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod registry;
pub(crate) mod wire;

pub mod reader;
pub mod utils;

pub use any::TypeInfo;
#[cfg(feature = "std")]
pub use config::{Config, RESOURCE_PATH_ENV};
pub use container::{BeanFactory, Container};
pub use declaration::{BeanDeclaration, PropertyRef};
pub use errors::{BuildErrorKind, InstantiateErrorKind, LoadErrorKind, ResolveErrorKind, WireErrorKind};
pub use instantiator::{Instantiator, TypeRegistry};
pub use reader::DeclarationReader;
pub use wire::{Autowired, Slot, Wire};
