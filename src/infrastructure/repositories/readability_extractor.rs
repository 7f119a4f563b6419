use crate::domain::extract::{ExtractResponse, ExtractionError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Turns an article URL into its title and text chunks
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractResponse, ExtractionError>;
}

/// Runs the Readability-based Node script as a subprocess.
///
/// The script receives the URL as its only argument and prints
/// `{"title": ..., "chunks": [...]}` on stdout.
pub struct ReadabilityExtractor {
    program: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl ReadabilityExtractor {
    pub fn new(program: String, script_path: PathBuf, timeout: Duration) -> Self {
        Self {
            program,
            script_path,
            timeout,
        }
    }
}

#[async_trait]
impl ContentExtractor for ReadabilityExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractResponse, ExtractionError> {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.script_path)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            program = %self.program,
            script = %self.script_path.display(),
            "Spawning extractor"
        );

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                tracing::warn!(url = url, timeout = ?self.timeout, "Extractor timed out");
                ExtractionError::Timeout(self.timeout)
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                url = url,
                status = ?output.status.code(),
                stderr = %stderr,
                "Extractor exited with failure"
            );
            return Err(ExtractionError::Failed(stderr));
        }

        serde_json::from_slice::<ExtractResponse>(&output.stdout)
            .map_err(|e| ExtractionError::Malformed(e.to_string()))
    }
}
