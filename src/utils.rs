pub mod thread_safety;

pub use thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};
