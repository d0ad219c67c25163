//! Attachment copies on the local filesystem

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chatlog_core::error::PlatformError;
use chatlog_core::traits::{AttachmentStore, AttachmentTarget, PlatformResult};
use reqwest::Client;
use tracing::debug;

/// Stores attachments under
/// `root/<community>/<channel>/<message>/<position>_<file>`
#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: PathBuf,
    http: Client,
}

impl FsAttachmentStore {
    pub fn new(root: impl Into<PathBuf>, http: Client) -> Self {
        Self {
            root: root.into(),
            http,
        }
    }

    /// Where an attachment is written
    pub fn path_for(&self, target: &AttachmentTarget) -> PathBuf {
        self.root
            .join(target.community_id.to_string())
            .join(target.channel_id.to_string())
            .join(target.message_id.to_string())
            .join(target.stored_name())
    }

    async fn write(path: &Path, bytes: &[u8]) -> PlatformResult<()> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| PlatformError::Storage(format!("{}: {e}", dir.display())))?;
        }
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| PlatformError::Storage(format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn store(&self, target: &AttachmentTarget) -> PlatformResult<()> {
        let response = self
            .http
            .get(&target.url)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
                route: "attachment".to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let path = self.path_for(target);
        Self::write(&path, &bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Stored attachment");
        Ok(())
    }
}
