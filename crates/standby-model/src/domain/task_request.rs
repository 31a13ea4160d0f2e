use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single fetch-and-run request accepted over HTTP.
///
/// Built from a validated JSON body; immutable afterwards. The optional
/// `payload` is an opaque object owned by the external script, the worker
/// only persists it to disk for the child to read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// HTTPS URL of the script to download and execute.
    pub script_url: String,
    /// Declared filename; must match the filename derived from `script_url`.
    pub script_name: String,
    /// Opaque task parameters handed to the script verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}
