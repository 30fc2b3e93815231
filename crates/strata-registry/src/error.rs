use std::path::PathBuf;

use strata_bpmn::BpmnError;
use strata_process::DefinitionError;
use thiserror::Error;

/// Errors that can occur when loading process definitions.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// IO error when reading process files.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A JSON process document failed to parse.
  #[error("invalid process document {}: {source}", path.display())]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A BPMN document failed to parse.
  #[error("invalid BPMN document {}: {source}", path.display())]
  Bpmn {
    path: PathBuf,
    #[source]
    source: BpmnError,
  },

  /// The document parsed but the process is not well formed.
  #[error(transparent)]
  Definition(#[from] DefinitionError),

  /// No readable source defines the process, and some sources could not be
  /// parsed.
  #[error(
    "process '{process_id}' not found; unreadable sources: {}",
    unreadable.join("; ")
  )]
  NotFoundWithUnreadableSources {
    process_id: String,
    unreadable: Vec<String>,
  },

  /// File extension is neither `.json` nor `.bpmn`.
  #[error("unsupported process source: {}", path.display())]
  UnsupportedSource { path: PathBuf },
}
