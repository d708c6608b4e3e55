#[cfg(feature = "thread_safe")]
mod thread_safe {
    use alloc::sync::Arc;
    use core::any::Any;

    use crate::wire::Wire;

    pub trait SendSafety: Send {}
    pub trait SyncSafety: Sync {}

    impl<T: Send> SendSafety for T {}
    impl<T: Sync> SyncSafety for T {}

    /// Shared pointer to a bean. `Arc` when beans may cross threads.
    pub type RcThreadSafety<T> = Arc<T>;
    /// Type-erased bean as handed out by [`crate::Container::get_bean`].
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any + Send + Sync>;
    pub(crate) type RcWireThreadSafety = RcThreadSafety<dyn Wire + Send + Sync>;
}

#[cfg(not(feature = "thread_safe"))]
mod thread_unsafe {
    use alloc::rc::Rc;
    use core::any::Any;

    use crate::wire::Wire;

    pub trait SendSafety {}
    pub trait SyncSafety {}

    impl<T> SendSafety for T {}
    impl<T> SyncSafety for T {}

    pub type RcThreadSafety<T> = Rc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any>;
    pub(crate) type RcWireThreadSafety = RcThreadSafety<dyn Wire>;
}

#[cfg(feature = "thread_safe")]
pub use thread_safe::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};
#[cfg(feature = "thread_safe")]
pub(crate) use thread_safe::RcWireThreadSafety;

#[cfg(not(feature = "thread_safe"))]
pub use thread_unsafe::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};
#[cfg(not(feature = "thread_safe"))]
pub(crate) use thread_unsafe::RcWireThreadSafety;
