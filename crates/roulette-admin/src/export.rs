//! CSV export: fetch a bulk payload and save it as a local file.
//!
//! The download counterpart of the browser client's blob save. Success
//! means the file landed on disk; nothing confirms what the admin does
//! with it afterwards. No retry on failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::api::AdminApi;

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Session records only.
    Sessions,
    /// Everything the service will give us.
    All,
}

impl ExportKind {
    /// Returns the wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Sessions => "sessions",
            ExportKind::All => "all",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sessions" => Ok(ExportKind::Sessions),
            "all" => Ok(ExportKind::All),
            other => Err(format!("unknown export kind: {other}")),
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generated filename for an export, e.g. `stock-roulette-sessions-2025-03-01.csv`.
pub fn export_filename(kind: ExportKind, date: NaiveDate) -> String {
    format!("stock-roulette-{}-{}.csv", kind, date.format("%Y-%m-%d"))
}

/// Fetches export payloads and writes them into the output directory.
pub struct Exporter {
    api: Arc<AdminApi>,
    out_dir: PathBuf,
    /// In-flight flag.
    pub loading: bool,
    /// Last failure, human-readable.
    pub error: Option<String>,
}

impl Exporter {
    /// Create an exporter writing into `out_dir`.
    pub fn new(api: Arc<AdminApi>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            out_dir: out_dir.into(),
            loading: false,
            error: None,
        }
    }

    /// Returns the output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Fetch the export payload and save it with a date-stamped filename.
    ///
    /// Returns the written path on success; on failure records the error
    /// and returns `None`.
    pub async fn export_data(&mut self, kind: ExportKind) -> Option<PathBuf> {
        self.loading = true;
        self.error = None;

        let path = format!("/api/admin/export/{kind}");
        let result = self.api.get_bytes(&path).await;
        self.loading = false;

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, kind = %kind, "Export request failed");
                self.error = Some(e.failure_message("Failed to export data"));
                return None;
            }
        };

        let target = self
            .out_dir
            .join(export_filename(kind, Utc::now().date_naive()));
        if let Err(e) = tokio::fs::write(&target, &bytes).await {
            warn!(error = %e, path = ?target, "Failed to write export file");
            self.error = Some("Failed to export data".to_string());
            return None;
        }

        info!(path = ?target, bytes = bytes.len(), kind = %kind, "Export saved");
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_kind_round_trip() {
        assert_eq!("sessions".parse::<ExportKind>(), Ok(ExportKind::Sessions));
        assert_eq!("ALL".parse::<ExportKind>(), Ok(ExportKind::All));
        assert!("players".parse::<ExportKind>().is_err());
        assert_eq!(ExportKind::Sessions.to_string(), "sessions");
        assert_eq!(ExportKind::All.to_string(), "all");
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            export_filename(ExportKind::Sessions, date),
            "stock-roulette-sessions-2025-03-01.csv"
        );
        assert_eq!(
            export_filename(ExportKind::All, date),
            "stock-roulette-all-2025-03-01.csv"
        );
    }

    #[tokio::test]
    async fn test_export_failure_sets_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let api = Arc::new(AdminApi::new("http://127.0.0.1:9"));
        let mut exporter = Exporter::new(api, dir.path());

        let written = exporter.export_data(ExportKind::Sessions).await;
        assert!(written.is_none());
        assert!(!exporter.loading);
        assert_eq!(exporter.error.as_deref(), Some("Failed to export data"));
        // Nothing was written.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
