use strata_registry::RegistryError;
use thiserror::Error;

/// Errors that prevent a closed definition set from being built.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// No loader source defines the process. `path` is the call chain from the
  /// root, e.g. `root -> a -> b`.
  #[error("process '{process_id}' not found (call path: {path})")]
  ProcessNotFound { process_id: String, path: String },

  /// A call activity chain re-enters a process already on the path.
  #[error("cyclic composition: {}", cycle.join(" -> "))]
  CyclicComposition { cycle: Vec<String> },

  /// Abstract diagrams can only be reached through call activities.
  #[error("process '{process_id}' is not executable and cannot be a root")]
  NonExecutableRoot { process_id: String },

  /// Loader failure while reading a definition.
  #[error("registry error: {0}")]
  Registry(#[from] RegistryError),
}
