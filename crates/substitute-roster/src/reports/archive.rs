use super::ReportKind;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
#[error("failed to write report {}: {source}", path.display())]
pub struct ArchiveError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// `relatorio_<slug>_<YYYYMMDD_HHMMSS>.txt`
pub fn report_file_name(kind: ReportKind, now: NaiveDateTime) -> String {
    format!("relatorio_{}_{}.txt", kind.slug(), now.format("%Y%m%d_%H%M%S"))
}

/// Writes rendered reports into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct ReportArchive {
    dir: PathBuf,
}

impl ReportArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `content` as UTF-8 under `file_name` and returns the written path.
    pub fn save(&self, content: &str, file_name: &str) -> Result<PathBuf, ArchiveError> {
        let path = self.dir.join(file_name);
        let wrap = |source| ArchiveError {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(wrap)?;
        fs::write(&path, content).map_err(wrap)?;

        info!(path = %path.display(), bytes = content.len(), "report saved");
        Ok(path)
    }
}
