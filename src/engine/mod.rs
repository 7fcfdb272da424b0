// ABOUTME: Template application engine driving files through every environment
// ABOUTME: Handles discovery, output naming, output sinks and run reporting

pub mod discovery;
pub mod error;
pub mod executor;
pub mod naming;
pub mod result;
pub mod sink;

pub use discovery::{TemplateDiscovery, DEFAULT_FILE_MASK};
pub use error::{ExecutionError, Result};
pub use executor::{TemplateExecutor, DEFAULT_ENVIRONMENT};
pub use naming::{OutputNaming, DEFAULT_OUTPUT_TRANSFORM, ENV_TOKEN};
pub use result::{FileResult, FileStatus, OutputRecord, RunResult, RunStatus, RunSummary};
pub use sink::{DryRunSink, FileSink, OutputSink, SinkAction};
