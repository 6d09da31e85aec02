pub mod driver;
pub mod events;

pub use driver::{DashboardSession, SessionConfig, SessionHandle};
pub use events::SessionEvent;
