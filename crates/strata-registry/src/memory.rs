use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use strata_config::ProcessDef;
use strata_process::ProcessDefinition;

use crate::error::RegistryError;
use crate::loader::{ProcessLoader, ProcessSummary};

/// In-memory process registry for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
  definitions: RwLock<BTreeMap<String, ProcessDefinition>>,
}

impl MemoryRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a registry from loaded definitions.
  pub fn from_definitions(definitions: impl IntoIterator<Item = ProcessDefinition>) -> Self {
    let registry = Self::new();
    for definition in definitions {
      registry.insert(definition);
    }
    registry
  }

  /// Add or replace a definition.
  pub fn insert(&self, definition: ProcessDefinition) {
    let mut definitions = self
      .definitions
      .write()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    definitions.insert(definition.process_id().to_string(), definition);
  }

  /// Validate a source definition and add it.
  pub fn register(&self, def: ProcessDef) -> Result<(), RegistryError> {
    self.insert(ProcessDefinition::load(def)?);
    Ok(())
  }
}

#[async_trait]
impl ProcessLoader for MemoryRegistry {
  async fn load(&self, process_id: &str) -> Result<Option<ProcessDefinition>, RegistryError> {
    let definitions = self
      .definitions
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(definitions.get(process_id).cloned())
  }

  async fn is_executable(&self, process_id: &str) -> Result<Option<bool>, RegistryError> {
    let definitions = self
      .definitions
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(definitions.get(process_id).map(ProcessDefinition::is_executable))
  }

  async fn list(&self) -> Result<Vec<ProcessSummary>, RegistryError> {
    let definitions = self
      .definitions
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(
      definitions
        .values()
        .map(|d| ProcessSummary {
          process_id: d.process_id().to_string(),
          name: d.name().to_string(),
          executable: d.is_executable(),
          source: "memory".to_string(),
          error: None,
        })
        .collect(),
    )
  }
}
