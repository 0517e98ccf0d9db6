pub mod autofill;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod server;

pub use autofill::{AutofillError, AutofillProxy, AutofillRequest};
pub use config::{ConfigError, ConfigOverrides, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use health::HealthResponse;
pub use server::{AppState, build_router, serve, serve_on};
