//! Application layer - Use cases and orchestration

pub mod compose;
pub mod init;
pub mod manage_config;
pub mod query;
pub mod scheduling;
pub mod session;

pub use compose::{compose_and_publish, ComposeRequest};
pub use manage_config::ConfigService;
pub use query::QueryFacade;
pub use scheduling::{CleanupWarning, Clock, Outcome, SchedulingService};
pub use session::CreatorSession;
