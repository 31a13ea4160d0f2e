mod domain;
pub use domain::*;

mod validate;
pub use validate::{ValidateError, filename_from_url, validate_task};
