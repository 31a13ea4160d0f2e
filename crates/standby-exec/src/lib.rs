mod error;
pub use error::{ExecError, ExecResult, FetchError};

mod fetch;
pub use fetch::{FETCH_TIMEOUT, ScriptFetcher};

mod script;
pub use script::{ExecOutcome, ScriptRunner};

mod pipeline;
pub use pipeline::{ExecConfig, PAYLOAD_FILE, SCRIPT_FILE, ScriptPipeline};

mod restart;
pub use restart::{FLUSH_DELAY, restart};

mod util;
