// ABOUTME: Result types for applying templates to files and whole runs
// ABOUTME: Serializable so a run can be written out as a JSON report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    Failed,
}

/// One environment's output for a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputRecord {
    pub environment: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub input: PathBuf,
    pub status: FileStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub outputs: Vec<OutputRecord>,
    pub copyback: Option<PathBuf>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub outputs_written: usize,
    pub copybacks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub environments: Vec<String>,
    pub dry_run: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub status: RunStatus,
    pub files: Vec<FileResult>,
    pub summary: RunSummary,
}

fn elapsed_since(start: DateTime<Utc>) -> Duration {
    (Utc::now() - start).to_std().unwrap_or(Duration::ZERO)
}

impl FileResult {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            status: FileStatus::Pending,
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            outputs: Vec::new(),
            copyback: None,
            error: None,
        }
    }

    pub fn add_output(&mut self, environment: &str, path: PathBuf, bytes: usize) {
        self.outputs.push(OutputRecord {
            environment: environment.to_string(),
            path,
            bytes,
        });
    }

    pub fn mark_completed(&mut self, status: FileStatus, error: Option<String>) {
        self.status = status;
        self.end_time = Some(Utc::now());
        self.duration = Some(elapsed_since(self.start_time));
        self.error = error;
    }

    pub fn is_successful(&self) -> bool {
        self.status == FileStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == FileStatus::Failed
    }
}

impl RunResult {
    pub fn new(environments: Vec<String>, dry_run: bool) -> Self {
        Self {
            environments,
            dry_run,
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            status: RunStatus::Running,
            files: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn add_file_result(&mut self, result: FileResult) {
        self.files.push(result);
        self.update_summary();
    }

    pub fn mark_completed(&mut self) {
        self.end_time = Some(Utc::now());
        self.duration = Some(elapsed_since(self.start_time));
        self.status = if self.has_failures() {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };
        self.update_summary();
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(FileResult::is_failed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn update_summary(&mut self) {
        self.summary = RunSummary {
            total_files: self.files.len(),
            successful_files: self.files.iter().filter(|f| f.is_successful()).count(),
            failed_files: self.files.iter().filter(|f| f.is_failed()).count(),
            outputs_written: self.files.iter().map(|f| f.outputs.len()).sum(),
            copybacks: self.files.iter().filter(|f| f.copyback.is_some()).count(),
        };
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Pending => write!(f, "pending"),
            FileStatus::Success => write!(f, "success"),
            FileStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}
