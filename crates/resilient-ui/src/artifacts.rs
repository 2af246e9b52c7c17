// Artifacts - Screenshot and trace files
//
// File names are `{test}-{timestamp}.png` / `{test}-{timestamp}.trace.json`,
// where the timestamp is ISO-8601 UTC with millisecond precision and every
// ':' and '.' replaced by '-' (e.g. `2025-03-07T14-05-09-042Z`).

use crate::error::Result;
use crate::target::Target;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Filesystem-safe ISO-8601 timestamp.
pub fn artifact_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

pub fn screenshot_file_name(test_name: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.png", test_name, artifact_timestamp(at))
}

pub fn trace_file_name(test_name: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.trace.json", test_name, artifact_timestamp(at))
}

/// Captures a full-page screenshot into `dir`, creating it if absent.
pub async fn save_screenshot(target: &dyn Target, dir: &Path, test_name: &str) -> Result<PathBuf> {
    let bytes = target.screenshot(true).await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(screenshot_file_name(test_name, Utc::now()));
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

/// Writes `report` as pretty JSON into `dir`, creating it if absent.
pub async fn save_trace<T: Serialize>(dir: &Path, test_name: &str, report: &T) -> Result<PathBuf> {
    let json = serde_json::to_vec_pretty(report)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(trace_file_name(test_name, Utc::now()));
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap() + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_artifact_timestamp_replaces_separators() {
        assert_eq!(artifact_timestamp(fixed_time()), "2025-03-07T14-05-09-042Z");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            screenshot_file_name("user-add-completed", fixed_time()),
            "user-add-completed-2025-03-07T14-05-09-042Z.png"
        );
        assert_eq!(
            trace_file_name("login", fixed_time()),
            "login-2025-03-07T14-05-09-042Z.trace.json"
        );
    }

    #[tokio::test]
    async fn test_save_trace_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("screenshots");

        let path = save_trace(&dir, "search", &serde_json::json!({"passed": true}))
            .await
            .unwrap();

        assert!(path.starts_with(&dir));
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["passed"], true);
    }
}
