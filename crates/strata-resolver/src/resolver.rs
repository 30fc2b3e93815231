use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use strata_process::{ClosedDefinitionSet, ProcessDefinition};
use strata_registry::ProcessLoader;
use tracing::{debug, info, instrument};

use crate::error::ResolveError;

/// Resolver turns a root process id into a closed definition set.
#[async_trait]
pub trait Resolver: Send + Sync {
  /// Resolve a root process and everything it calls.
  ///
  /// This process:
  /// 1. Rejects the root if its source is not executable, then loads it
  /// 2. Walks call activity targets depth-first, loading each one once
  /// 3. Fails on the first missing target or cycle
  async fn resolve(&self, root_process_id: &str) -> Result<ClosedDefinitionSet, ResolveError>;
}

/// Standard resolver implementation that uses a process loader.
pub struct StandardResolver<L: ProcessLoader> {
  loader: L,
}

impl<L: ProcessLoader> StandardResolver<L> {
  /// Create a new resolver with the given process loader.
  pub fn new(loader: L) -> Self {
    Self { loader }
  }

  pub fn loader(&self) -> &L {
    &self.loader
  }

  /// Load a definition, failing with the call path if it does not exist.
  async fn load(
    &self,
    process_id: &str,
    stack: &[String],
  ) -> Result<ProcessDefinition, ResolveError> {
    match self.loader.load(process_id).await? {
      Some(definition) => {
        debug!(process_id, depth = stack.len(), "definition_loaded");
        Ok(definition)
      }
      None => Err(not_found(process_id, stack)),
    }
  }

  /// Resolve the call targets of the definition on top of `stack`.
  fn visit<'a>(
    &'a self,
    targets: Vec<String>,
    stack: &'a mut Vec<String>,
    set: &'a mut ClosedDefinitionSet,
  ) -> Pin<Box<dyn Future<Output = Result<(), ResolveError>> + Send + 'a>> {
    Box::pin(async move {
      for target in targets {
        if let Some(position) = stack.iter().position(|id| *id == target) {
          let mut cycle = stack[position..].to_vec();
          cycle.push(target);
          return Err(ResolveError::CyclicComposition { cycle });
        }
        if set.contains(&target) {
          continue;
        }

        let child = self.load(&target, stack).await?;
        let child_targets: Vec<String> = child
          .call_targets()
          .into_iter()
          .map(String::from)
          .collect();
        set.insert(child);

        stack.push(target);
        self.visit(child_targets, stack, set).await?;
        stack.pop();
      }
      Ok(())
    })
  }
}

fn not_found(process_id: &str, stack: &[String]) -> ResolveError {
  let mut path: Vec<&str> = stack.iter().map(String::as_str).collect();
  path.push(process_id);
  ResolveError::ProcessNotFound {
    process_id: process_id.to_string(),
    path: path.join(" -> "),
  }
}

#[async_trait]
impl<L: ProcessLoader> Resolver for StandardResolver<L> {
  #[instrument(name = "resolve", skip(self))]
  async fn resolve(&self, root_process_id: &str) -> Result<ClosedDefinitionSet, ResolveError> {
    // The flag is checked on the raw source, so a malformed
    // non-executable root is still reported as non-executable.
    match self.loader.is_executable(root_process_id).await? {
      None => return Err(not_found(root_process_id, &[])),
      Some(false) => {
        return Err(ResolveError::NonExecutableRoot {
          process_id: root_process_id.to_string(),
        });
      }
      Some(true) => {}
    }

    let root = self.load(root_process_id, &[]).await?;
    let targets: Vec<String> = root.call_targets().into_iter().map(String::from).collect();
    let mut set = ClosedDefinitionSet::new(root);
    let mut stack = vec![root_process_id.to_string()];
    self.visit(targets, &mut stack, &mut set).await?;

    info!(members = set.len(), "composition_resolved");
    Ok(set)
  }
}
