//! Interpreter configuration.
//!
//! Typed configuration with bon builders and environment variable fallbacks.

use bon::bon;

/// Default bound on WHILE iterations.
pub const DEFAULT_MAX_WHILE_ITERATIONS: usize = 1_000_000;

/// Limits applied while interpreting a computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Iterations a single WHILE may run before execution is aborted.
    pub max_while_iterations: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_while_iterations: DEFAULT_MAX_WHILE_ITERATIONS }
    }
}

#[bon]
impl InterpreterConfig {
    #[builder]
    pub fn builder(#[builder(default = DEFAULT_MAX_WHILE_ITERATIONS)] max_while_iterations: usize) -> Self {
        Self { max_while_iterations }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `FORI_MAX_WHILE_ITERATIONS` - Iteration bound per WHILE (default: 1000000)
    pub fn from_env() -> Self {
        let max_while_iterations = std::env::var("FORI_MAX_WHILE_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_WHILE_ITERATIONS);
        Self { max_while_iterations }
    }
}
