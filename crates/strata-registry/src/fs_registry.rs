use std::path::{Path, PathBuf};

use async_trait::async_trait;
use strata_config::ProcessDef;
use strata_process::ProcessDefinition;
use tokio::fs;
use tracing::debug;

use crate::error::RegistryError;
use crate::loader::{ProcessLoader, ProcessSummary};
use crate::source::{SourceFormat, parse_source};

/// Filesystem-based process registry.
///
/// Processes are stored as JSON or BPMN files anywhere below the root:
/// ```text
/// {root}/
/// ├── capability_map.bpmn
/// ├── intake.json
/// └── level2/
///     └── notify.bpmn
/// ```
///
/// A process is looked up at `{root}/{id}.json` and `{root}/{id}.bpmn` first,
/// then by scanning every source file below the root.
pub struct FsProcessRegistry {
  root: PathBuf,
}

impl FsProcessRegistry {
  /// Create a new filesystem registry at the given root path.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory of the registry.
  pub fn root(&self) -> &Path {
    &self.root
  }

  async fn read_source(&self, path: &Path) -> Result<Vec<ProcessDef>, RegistryError> {
    let content = fs::read_to_string(path).await?;
    parse_source(path, &content)
  }

  /// Find the source definition of a process, unvalidated.
  ///
  /// Sources that fail to parse are skipped during the scan. If no other
  /// source defines the process, they are reported instead of `None`.
  async fn find_source(&self, process_id: &str) -> Result<Option<ProcessDef>, RegistryError> {
    for format in [SourceFormat::Json, SourceFormat::Bpmn] {
      let path = self.root.join(format!("{process_id}.{}", format.extension()));
      if !fs::try_exists(&path).await? {
        continue;
      }
      if let Some(def) = take_process(self.read_source(&path).await?, process_id) {
        debug!(process_id, path = %path.display(), "process_loaded");
        return Ok(Some(def));
      }
    }

    let mut unreadable = Vec::new();
    for path in self.source_files().await? {
      let defs = match self.read_source(&path).await {
        Ok(defs) => defs,
        Err(e) => {
          debug!(path = %path.display(), error = %e, "skipping unreadable process source");
          unreadable.push(e.to_string());
          continue;
        }
      };
      if let Some(def) = take_process(defs, process_id) {
        debug!(process_id, path = %path.display(), "process_loaded");
        return Ok(Some(def));
      }
    }

    if unreadable.is_empty() {
      return Ok(None);
    }
    Err(RegistryError::NotFoundWithUnreadableSources {
      process_id: process_id.to_string(),
      unreadable,
    })
  }

  /// Every process source file below the root, sorted by path.
  async fn source_files(&self) -> Result<Vec<PathBuf>, RegistryError> {
    let mut files = Vec::new();
    if fs::try_exists(&self.root).await? {
      collect_sources(&self.root, &mut files).await?;
    }
    files.sort();
    Ok(files)
  }
}

fn take_process(defs: Vec<ProcessDef>, process_id: &str) -> Option<ProcessDef> {
  defs.into_iter().find(|d| d.process_id == process_id)
}

#[async_trait]
impl ProcessLoader for FsProcessRegistry {
  async fn load(&self, process_id: &str) -> Result<Option<ProcessDefinition>, RegistryError> {
    match self.find_source(process_id).await? {
      Some(def) => Ok(Some(ProcessDefinition::load(def)?)),
      None => Ok(None),
    }
  }

  async fn is_executable(&self, process_id: &str) -> Result<Option<bool>, RegistryError> {
    Ok(self.find_source(process_id).await?.map(|def| def.executable))
  }

  async fn list(&self) -> Result<Vec<ProcessSummary>, RegistryError> {
    let mut summaries = Vec::new();

    for path in self.source_files().await? {
      let source = path
        .strip_prefix(&self.root)
        .unwrap_or(&path)
        .display()
        .to_string();

      match self.read_source(&path).await {
        Ok(mut defs) => {
          defs.sort_by(|a, b| a.process_id.cmp(&b.process_id));
          summaries.extend(defs.into_iter().map(|def| ProcessSummary {
            name: def.name.unwrap_or_else(|| def.process_id.clone()),
            process_id: def.process_id,
            executable: def.executable,
            source: source.clone(),
            error: None,
          }));
        }
        Err(e) => {
          let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
          summaries.push(ProcessSummary {
            name: stem.clone(),
            process_id: stem,
            executable: false,
            source,
            error: Some(e.to_string()),
          });
        }
      }
    }

    Ok(summaries)
  }
}

/// Recursively collect process source files.
async fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), std::io::Error> {
  let mut entries = fs::read_dir(dir).await?;
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();
    if entry.file_type().await?.is_dir() {
      Box::pin(collect_sources(&path, out)).await?;
    } else if SourceFormat::from_path(&path).is_some() {
      out.push(path);
    }
  }

  Ok(())
}
