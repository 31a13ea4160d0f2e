mod task_request;
pub use task_request::TaskRequest;

/// Script file extension accepted by the worker.
pub const SCRIPT_EXT: &str = ".py";
