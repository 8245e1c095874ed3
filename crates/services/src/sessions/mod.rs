mod registry;
mod service;

pub use registry::SessionRegistry;
pub use service::{EndedSession, SessionLifecycleService, SessionStatusView};
