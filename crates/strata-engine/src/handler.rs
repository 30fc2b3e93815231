use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use strata_process::ActorTag;
use thiserror::Error;

use crate::instance::DataMap;

/// Failure reported by a task handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
  pub message: String,
}

impl HandlerError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// The task a handler is asked to perform.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
  pub process_id: &'a str,
  pub instance_id: &'a str,
  pub task_id: &'a str,
  pub task_name: &'a str,
  pub handler_ref: &'a str,
  pub actor: ActorTag,
}

/// External system that performs atomic tasks for one actor.
///
/// The returned map replaces the token's local data.
#[async_trait]
pub trait TaskHandler: Send + Sync {
  async fn handle(&self, task: &Invocation<'_>, local_data: DataMap) -> Result<DataMap, HandlerError>;
}

/// Adapter for a plain `(task_name, local_data)` closure.
pub struct FnHandler<F> {
  f: F,
}

/// Wrap a closure as a [`TaskHandler`].
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
  F: Fn(&str, DataMap) -> Result<DataMap, HandlerError> + Send + Sync,
{
  FnHandler { f }
}

#[async_trait]
impl<F> TaskHandler for FnHandler<F>
where
  F: Fn(&str, DataMap) -> Result<DataMap, HandlerError> + Send + Sync,
{
  async fn handle(&self, task: &Invocation<'_>, local_data: DataMap) -> Result<DataMap, HandlerError> {
    (self.f)(task.task_name, local_data)
  }
}

/// Handlers keyed by actor tag.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
  handlers: HashMap<ActorTag, Arc<dyn TaskHandler>>,
}

impl HandlerRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a handler, replacing any previous one for the actor.
  pub fn register(&mut self, actor: ActorTag, handler: impl TaskHandler + 'static) {
    self.handlers.insert(actor, Arc::new(handler));
  }

  /// Builder form of [`HandlerRegistry::register`].
  pub fn with(mut self, actor: ActorTag, handler: impl TaskHandler + 'static) -> Self {
    self.register(actor, handler);
    self
  }

  pub fn get(&self, actor: ActorTag) -> Option<Arc<dyn TaskHandler>> {
    self.handlers.get(&actor).cloned()
  }

  pub fn contains(&self, actor: ActorTag) -> bool {
    self.handlers.contains_key(&actor)
  }
}

impl fmt::Debug for HandlerRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut actors: Vec<&ActorTag> = self.handlers.keys().collect();
    actors.sort();
    f.debug_struct("HandlerRegistry")
      .field("actors", &actors)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn invocation(task_name: &str) -> Invocation<'_> {
    Invocation {
      process_id: "p",
      instance_id: "i",
      task_id: "t",
      task_name,
      handler_ref: "t",
      actor: ActorTag::StateStore,
    }
  }

  #[tokio::test]
  async fn test_fn_handler_receives_task_name() {
    let handler = handler_fn(|name, mut data| {
      data.insert("seen".to_string(), json!(name));
      Ok(data)
    });

    let out = handler
      .handle(&invocation("Record outcome"), DataMap::new())
      .await
      .unwrap();
    assert_eq!(out["seen"], "Record outcome");
  }

  #[tokio::test]
  async fn test_registry_lookup() {
    let registry = HandlerRegistry::new()
      .with(ActorTag::StateStore, handler_fn(|_, data| Ok(data)))
      .with(
        ActorTag::DecisionMaker,
        handler_fn(|_, _| Err(HandlerError::new("rejected"))),
      );

    assert!(registry.contains(ActorTag::StateStore));
    assert!(registry.get(ActorTag::AgentSpawner).is_none());

    let decider = registry.get(ActorTag::DecisionMaker).unwrap();
    let err = decider.handle(&invocation("decide"), DataMap::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "rejected");

    assert_eq!(
      format!("{registry:?}"),
      "HandlerRegistry { actors: [DecisionMaker, StateStore] }"
    );
  }
}
