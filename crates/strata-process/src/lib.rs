//! Strata Process
//!
//! This crate provides the loaded representation of a process. A
//! [`ProcessDefinition`] is a validated, immutable form of a `ProcessDef`
//! from `strata-config` that the engine can execute.
//!
//! Key differences from `strata-config`:
//! - Flow endpoints, start/end events and gateway shapes are validated
//! - Tasks are a closed sum type with typed actor tags
//! - Guard syntax is checked at load time
//! - Incoming/outgoing flows and explicit join points are indexed
//!
//! A [`ClosedDefinitionSet`] bundles a root definition with every definition
//! reachable through call activities, keyed by process id.

mod actor;
mod closed_set;
mod definition;
mod error;
mod flow;
mod graph;
mod task;

pub use actor::{ActorTag, UnknownActorTag};
pub use closed_set::ClosedDefinitionSet;
pub use definition::{ElementDetail, ProcessDefinition, load};
pub use error::DefinitionError;
pub use flow::{MessageFlow, SequenceFlow};
pub use graph::Graph;
pub use strata_config::GatewayKind;
pub use task::{Guard, Task, TaskKind};
