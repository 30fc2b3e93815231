use std::collections::HashMap;

use crate::definition::ProcessDefinition;

/// A root definition plus every definition reachable from it through call
/// activities.
///
/// Members are keyed by process id and refer to each other only by id, so a
/// set can be shared read-only across a root instance and all its children.
#[derive(Debug, Clone)]
pub struct ClosedDefinitionSet {
  root: String,
  definitions: HashMap<String, ProcessDefinition>,
  /// Insertion order, root first.
  order: Vec<String>,
}

impl ClosedDefinitionSet {
  pub fn new(root: ProcessDefinition) -> Self {
    let root_id = root.process_id().to_string();
    Self {
      root: root_id.clone(),
      definitions: HashMap::from([(root_id.clone(), root)]),
      order: vec![root_id],
    }
  }

  /// Add a member. Returns false if the id is already present.
  pub fn insert(&mut self, definition: ProcessDefinition) -> bool {
    let id = definition.process_id().to_string();
    if self.definitions.contains_key(&id) {
      return false;
    }
    self.order.push(id.clone());
    self.definitions.insert(id, definition);
    true
  }

  pub fn root(&self) -> &ProcessDefinition {
    &self.definitions[&self.root]
  }

  pub fn root_process_id(&self) -> &str {
    &self.root
  }

  pub fn get(&self, process_id: &str) -> Option<&ProcessDefinition> {
    self.definitions.get(process_id)
  }

  pub fn contains(&self, process_id: &str) -> bool {
    self.definitions.contains_key(process_id)
  }

  /// Member ids in resolution order, root first.
  pub fn process_ids(&self) -> impl Iterator<Item = &str> {
    self.order.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.definitions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.definitions.is_empty()
  }
}
