//! Strata BPMN
//!
//! Converts BPMN 2.0 XML documents into `ProcessDef`s. A document may hold any
//! number of `<process>` elements and an optional `<collaboration>` whose
//! participants become pools and whose message flows are attached to the
//! processes they connect.
//!
//! Only the subset that maps onto the Strata model is accepted: events, tasks,
//! call activities, exclusive/inclusive/parallel gateways and sequence flows.
//! Embedded subprocesses and event-driven constructs are rejected.

mod error;
mod parser;

pub use error::BpmnError;
pub use parser::parse_bpmn;
