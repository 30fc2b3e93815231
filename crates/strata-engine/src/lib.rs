//! Strata Engine
//!
//! Runs workflow instances over a [`ClosedDefinitionSet`]. One step processes
//! one ready token: atomic tasks are delegated to the handler registered for
//! their actor, call activities run a child instance to completion, gateways
//! evaluate every guard before choosing their branches, and explicit joins
//! hold tokens until their incoming branches have delivered.
//!
//! Build-time failures (malformed definitions, missing targets, cycles,
//! non-executable roots) are returned as [`ResolveError`] and no instance is
//! created. Run-time failures never surface as `Err`: they move the instance
//! to [`InstanceStatus::Failed`] with an [`ExecutionError`] recorded as the
//! failure reason.
//!
//! [`ClosedDefinitionSet`]: strata_process::ClosedDefinitionSet
//! [`ResolveError`]: strata_resolver::ResolveError

mod config;
mod engine;
mod error;
mod handler;
mod instance;
mod trace;

pub use config::{DEFAULT_MAX_STEPS, EngineConfig};
pub use engine::{Engine, StepOutcome};
pub use error::ExecutionError;
pub use handler::{FnHandler, HandlerError, HandlerRegistry, Invocation, TaskHandler, handler_fn};
pub use instance::{DataMap, InstanceStatus, TaskInstance, TaskState, WorkflowInstance};
pub use trace::{TraceEntry, TraceEvent};
