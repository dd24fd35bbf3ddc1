//! Registered placeholders for patterns without a safe automatic repair.
//!
//! Each one is dispatched like a real fix and always returns its input, so
//! affected documents show up as `No_Effective_Fix` rather than being
//! silently skipped.

use super::FixOutcome;

pub const BLOCK_END_VS_SEQUENCE_START: &str = "block_end_vs_sequence_start";
pub const MAPPING_VALUE_NOT_ALLOWED: &str = "mapping_value_not_allowed";
pub const BLOCK_END_VS_SCALAR: &str = "block_end_vs_scalar";

/// A list started where the enclosing mapping expected to end; usually
/// an indentation slip that needs a human to pick the intended parent.
pub fn block_end_vs_sequence_start(content: &str, _filename: &str) -> FixOutcome {
    FixOutcome::unchanged(content)
}

/// A second `: ` inside an unquoted value. Quoting would change the
/// value's meaning in some documents, so nothing is rewritten.
pub fn mapping_value_not_allowed(content: &str, _filename: &str) -> FixOutcome {
    FixOutcome::unchanged(content)
}

pub fn block_end_vs_scalar(content: &str, _filename: &str) -> FixOutcome {
    FixOutcome::unchanged(content)
}
