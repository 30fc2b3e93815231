use std::path::Path;

use strata_bpmn::parse_bpmn;
use strata_config::ProcessDef;

use crate::error::RegistryError;

/// Encoding of a process source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
  /// One `ProcessDef` per file.
  Json,
  /// BPMN 2.0 XML, any number of processes per file.
  Bpmn,
}

impl SourceFormat {
  pub fn from_path(path: &Path) -> Option<Self> {
    match path.extension()?.to_str()? {
      "json" => Some(SourceFormat::Json),
      "bpmn" | "xml" => Some(SourceFormat::Bpmn),
      _ => None,
    }
  }

  pub fn extension(&self) -> &'static str {
    match self {
      SourceFormat::Json => "json",
      SourceFormat::Bpmn => "bpmn",
    }
  }
}

/// Parse the processes held in a source document. `path` selects the format
/// and is used in error messages.
pub fn parse_source(path: &Path, content: &str) -> Result<Vec<ProcessDef>, RegistryError> {
  match SourceFormat::from_path(path) {
    Some(SourceFormat::Json) => ProcessDef::from_json(content)
      .map(|def| vec![def])
      .map_err(|source| RegistryError::Json {
        path: path.to_path_buf(),
        source,
      }),
    Some(SourceFormat::Bpmn) => parse_bpmn(content).map_err(|source| RegistryError::Bpmn {
      path: path.to_path_buf(),
      source,
    }),
    None => Err(RegistryError::UnsupportedSource {
      path: path.to_path_buf(),
    }),
  }
}
