//! Event system: the injected trace sink each stage reports into.
//! Handlers observe an estimation run without touching its computation.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::EstimationEventHandler;
pub use types::*;
