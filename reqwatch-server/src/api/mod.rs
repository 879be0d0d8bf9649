//! HTTP API handlers for reqwatch-server

pub mod auth;
pub mod health;
pub mod requests;
pub mod submit;

pub use auth::auth_middleware;
pub use health::health_routes;
pub use requests::list_meeting_requests;
pub use submit::submit_meeting_request;
