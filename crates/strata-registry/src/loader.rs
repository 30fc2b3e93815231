use async_trait::async_trait;
use serde::Serialize;
use strata_process::ProcessDefinition;

use crate::error::RegistryError;

/// One process known to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
  pub process_id: String,
  pub name: String,
  pub executable: bool,
  /// Where the process came from: a file path or `memory`.
  pub source: String,
  /// Set when the source could not be parsed. `process_id` is then the file
  /// stem.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Source of process definitions, keyed by process id.
#[async_trait]
pub trait ProcessLoader: Send + Sync {
  /// Load and validate a process. Returns `None` if no source defines it.
  async fn load(&self, process_id: &str) -> Result<Option<ProcessDefinition>, RegistryError>;

  /// Whether the source of a process is marked executable, read without
  /// validating the process. Returns `None` if no source defines it.
  async fn is_executable(&self, process_id: &str) -> Result<Option<bool>, RegistryError>;

  /// List every process the loader knows about.
  async fn list(&self) -> Result<Vec<ProcessSummary>, RegistryError>;
}
