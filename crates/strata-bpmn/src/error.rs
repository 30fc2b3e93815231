use thiserror::Error;

#[derive(Debug, Error)]
pub enum BpmnError {
  #[error("malformed XML: {0}")]
  Xml(#[from] quick_xml::Error),

  #[error("<{element}> is missing required attribute '{attribute}'")]
  MissingAttribute {
    element: String,
    attribute: &'static str,
  },

  /// A BPMN construct the engine cannot execute.
  #[error("unsupported element <{element}> '{id}'")]
  Unsupported { element: String, id: String },

  #[error("document contains no process")]
  NoProcesses,
}
