//! Strata Config
//!
//! This crate contains the serializable process definition types for Strata.
//! These types describe one process exactly as it appears in a source document,
//! before it is validated and loaded into an immutable `ProcessDefinition`.
//!
//! Sources can be:
//! - JSON documents (one `ProcessDef` per file)
//! - BPMN 2.0 XML, converted by the `strata-bpmn` crate
//!
//! Nothing here is validated. Flow endpoints, gateway shapes and actor tags are
//! checked when the definition is loaded.

mod element;
mod enums;
mod flow;
mod process;

pub use element::{ElementDef, ElementType};
pub use enums::GatewayKind;
pub use flow::{FlowDef, MessageFlowDef};
pub use process::ProcessDef;
