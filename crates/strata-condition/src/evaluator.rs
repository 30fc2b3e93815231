use std::collections::BTreeSet;

use minijinja::{Environment, Expression, UndefinedBehavior};

use crate::error::ConditionError;

/// Variable context for evaluation, a token's local data.
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Compiles and evaluates guard expressions.
///
/// Undefined values are strict: touching a missing attribute fails instead of
/// silently evaluating to false.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
  pub fn new() -> Self {
    Self
  }

  /// Check that an expression compiles.
  pub fn validate(&self, expression: &str) -> Result<(), ConditionError> {
    let env = environment();
    compile(&env, expression).map(|_| ())
  }

  /// Top-level variables referenced by an expression, sorted.
  pub fn variables(&self, expression: &str) -> Result<BTreeSet<String>, ConditionError> {
    let env = environment();
    let compiled = compile(&env, expression)?;
    Ok(compiled.undeclared_variables(false).into_iter().collect())
  }

  /// Evaluate an expression against a context and return its truthiness.
  pub fn evaluate(&self, expression: &str, context: &Context) -> Result<bool, ConditionError> {
    let env = environment();
    let compiled = compile(&env, expression)?;

    let referenced: BTreeSet<String> = compiled.undeclared_variables(false).into_iter().collect();
    if let Some(missing) = referenced
      .into_iter()
      .find(|name| !context.contains_key(name))
    {
      return Err(ConditionError::MissingVariable { variable: missing });
    }

    let value = compiled
      .eval(context)
      .map_err(|e| ConditionError::Evaluation {
        expression: expression.to_string(),
        message: e.to_string(),
      })?;

    Ok(value.is_true())
  }
}

fn environment<'source>() -> Environment<'source> {
  let mut env = Environment::new();
  env.set_undefined_behavior(UndefinedBehavior::Strict);
  env
}

fn compile<'env, 'source>(
  env: &'env Environment<'source>,
  expression: &'source str,
) -> Result<Expression<'env, 'source>, ConditionError> {
  env
    .compile_expression(expression)
    .map_err(|e| ConditionError::Syntax {
      expression: expression.to_string(),
      message: e.to_string(),
    })
}

/// Evaluate a single expression with a fresh evaluator.
pub fn evaluate(expression: &str, context: &Context) -> Result<bool, ConditionError> {
  ConditionEvaluator::new().evaluate(expression, context)
}
