mod build;
mod instantiate;
mod load;
mod resolve;
mod wire;

pub use build::BuildErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use load::LoadErrorKind;
pub use resolve::ResolveErrorKind;
pub use wire::WireErrorKind;
