use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::FetchError;

/// Hard cap for a single script download.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin HTTP GET wrapper that lands script bytes on disk.
pub struct ScriptFetcher {
    client: reqwest::Client,
}

impl ScriptFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Download `url` to `dest`, verbatim. Non-2xx status and network errors
    /// fail the call; the response body is never inspected.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        debug!(target: "standby.fetch", %url, "downloading");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;

        #[cfg(target_family = "unix")]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o755)).await?;
        }

        debug!(target: "standby.fetch", dest = %dest.display(), size = bytes.len(), "saved");
        Ok(())
    }
}
