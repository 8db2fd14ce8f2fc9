use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::format::ContainerFormat;
use crate::foundation::error::ReelResult;

/// A finished, encoded video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoArtifact {
    /// Complete container bytes.
    pub bytes: Vec<u8>,
    /// Container the bytes are encoded in.
    pub format: ContainerFormat,
}

impl VideoArtifact {
    /// Concatenate encoder chunks in emission order.
    pub fn from_chunks(chunks: Vec<Vec<u8>>, format: ContainerFormat) -> Self {
        Self {
            bytes: chunks.concat(),
            format,
        }
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// `text-video-<UTC timestamp>.<ext>` with the timestamp truncated to seconds and every
    /// `:` replaced by `-`.
    pub fn suggested_filename(&self, now: DateTime<Utc>) -> String {
        format!(
            "text-video-{}.{}",
            now.format("%Y-%m-%dT%H-%M-%S"),
            self.extension()
        )
    }

    /// Write the artifact into `dir` under its suggested filename and return the path.
    pub fn save_in(&self, dir: &Path, now: DateTime<Utc>) -> ReelResult<PathBuf> {
        use anyhow::Context as _;

        let path = dir.join(self.suggested_filename(now));
        ensure_parent_dir(&path)?;
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write video '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "video saved");
        Ok(path)
    }
}
