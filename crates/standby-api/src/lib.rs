mod adapter;
pub use adapter::PipelineLauncher;

mod auth;
pub use auth::{AuthError, validate_auth};

mod coordinator;
pub use coordinator::TaskCoordinator;

mod error;
pub use error::ApiError;

mod http;
pub use http::HttpApi;

mod launcher;
pub use launcher::TaskLauncher;
