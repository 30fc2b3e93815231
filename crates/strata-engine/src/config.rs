pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  /// Step budget for `Engine::step` and its nested children.
  pub max_steps: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      max_steps: DEFAULT_MAX_STEPS,
    }
  }
}
