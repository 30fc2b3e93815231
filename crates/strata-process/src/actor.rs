use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Owner of a task, used to route atomic work to a handler and to attribute
/// trace entries. Never consulted when choosing branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActorTag {
  DecisionMaker,
  StateStore,
  AutomationHook,
  KnowledgeIndex,
  AgentSpawner,
  FilesystemDeploy,
  NestedProcess,
}

impl ActorTag {
  pub const ALL: [ActorTag; 7] = [
    ActorTag::DecisionMaker,
    ActorTag::StateStore,
    ActorTag::AutomationHook,
    ActorTag::KnowledgeIndex,
    ActorTag::AgentSpawner,
    ActorTag::FilesystemDeploy,
    ActorTag::NestedProcess,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ActorTag::DecisionMaker => "decision-maker",
      ActorTag::StateStore => "state-store",
      ActorTag::AutomationHook => "automation-hook",
      ActorTag::KnowledgeIndex => "knowledge-index",
      ActorTag::AgentSpawner => "agent-spawner",
      ActorTag::FilesystemDeploy => "filesystem-deploy",
      ActorTag::NestedProcess => "nested-process",
    }
  }

  /// Match a free-form pool or lane label against the vocabulary.
  ///
  /// Case, spaces and underscores are ignored: "State Store" and
  /// "state_store" both map to [`ActorTag::StateStore`].
  pub fn from_label(label: &str) -> Option<ActorTag> {
    let normalized: String = label
      .trim()
      .chars()
      .map(|c| match c {
        ' ' | '_' => '-',
        c => c.to_ascii_lowercase(),
      })
      .collect();
    normalized.parse().ok()
  }
}

impl fmt::Display for ActorTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown actor tag: {0}")]
pub struct UnknownActorTag(pub String);

impl FromStr for ActorTag {
  type Err = UnknownActorTag;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ActorTag::ALL
      .into_iter()
      .find(|tag| tag.as_str() == s)
      .ok_or_else(|| UnknownActorTag(s.to_string()))
  }
}
