use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
  /// The expression does not compile.
  #[error("invalid condition '{expression}': {message}")]
  Syntax { expression: String, message: String },

  /// The expression names a variable absent from the context.
  #[error("condition references undefined variable '{variable}'")]
  MissingVariable { variable: String },

  /// The expression compiled but failed while evaluating.
  #[error("failed to evaluate condition '{expression}': {message}")]
  Evaluation { expression: String, message: String },
}
