pub mod handlers;
pub mod service;
pub mod types;

pub use handlers::process_player;
pub use service::TrackerService;
pub use types::{ProcessRequest, ProcessResponse};
