//! Lowering configuration.
//!
//! Typed configuration with bon builders and environment variable fallbacks.

use bon::bon;

pub const DEFAULT_CONDITION_NAME: &str = "condcomputation";
pub const DEFAULT_BODY_NAME: &str = "bodycomputation";
pub const DEFAULT_LOOP_NAME: &str = "fused_while";
pub const DEFAULT_OP_TAG: &str = "fori::while_loop";

/// Names given to the emitted computations and the fused operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringConfig {
    /// Name of the traced condition computation.
    pub condition_name: String,
    /// Name of the traced body computation.
    pub body_name: String,
    /// Name of the top-level computation holding the WHILE.
    pub loop_name: String,
    /// Tag under which the fused operation is submitted to the backend.
    pub op_tag: String,
    /// Log the text module of every emitted computation at `info` level.
    pub dump_ir: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            condition_name: DEFAULT_CONDITION_NAME.to_string(),
            body_name: DEFAULT_BODY_NAME.to_string(),
            loop_name: DEFAULT_LOOP_NAME.to_string(),
            op_tag: DEFAULT_OP_TAG.to_string(),
            dump_ir: false,
        }
    }
}

#[bon]
impl LoweringConfig {
    #[builder]
    pub fn builder(
        #[builder(into, default = DEFAULT_CONDITION_NAME.to_string())] condition_name: String,
        #[builder(into, default = DEFAULT_BODY_NAME.to_string())] body_name: String,
        #[builder(into, default = DEFAULT_LOOP_NAME.to_string())] loop_name: String,
        #[builder(into, default = DEFAULT_OP_TAG.to_string())] op_tag: String,
        #[builder(default = false)] dump_ir: bool,
    ) -> Self {
        Self { condition_name, body_name, loop_name, op_tag, dump_ir }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `FORI_DUMP_IR` - Log emitted modules when set to `1` or `true` (default: off)
    pub fn from_env() -> Self {
        let dump_ir = std::env::var("FORI_DUMP_IR").map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
        Self { dump_ir, ..Self::default() }
    }
}
