pub mod controller;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;

pub use controller::{Controller, ControllerConfig};
pub use error::{ApiError, ErrorCode};
pub use extractors::{ORG_ID_HEADER, OrgId};
pub use handlers::application_routes;
