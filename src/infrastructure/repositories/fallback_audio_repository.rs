use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// Source of the pre-recorded audio served when live synthesis fails
#[async_trait]
pub trait FallbackAudioRepository: Send + Sync {
    /// Load the fallback asset
    ///
    /// `Ok(None)` means no asset is configured on disk. Any other I/O failure
    /// is returned as an error.
    async fn load(&self) -> io::Result<Option<Vec<u8>>>;

    async fn is_available(&self) -> bool;
}

pub struct FileFallbackAudioRepository {
    path: PathBuf,
}

impl FileFallbackAudioRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FallbackAudioRepository for FileFallbackAudioRepository {
    async fn load(&self) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(audio) => {
                tracing::debug!(
                    path = %self.path.display(),
                    audio_size = audio.len(),
                    "Fallback audio loaded"
                );
                Ok(Some(audio))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}
