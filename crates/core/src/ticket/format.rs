//! Display codes for tickets.

use serde::{Deserialize, Serialize};

use super::PriorityClass;

/// Minimum number of digits in a display code.
const CODE_DIGITS: usize = 3;

/// How display codes are built.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CodeStyle {
    /// One prefix for every ticket: `A-007`.
    #[default]
    SingleClass,
    /// Prefix by priority class: `P001` / `N001`.
    PerClass,
}

/// Build the display code for a sequence number.
///
/// The numeric part is zero-padded to at least three digits and widens as
/// needed; it is never truncated.
pub fn format_code(sequence: u64, priority: PriorityClass, style: CodeStyle) -> String {
    match style {
        CodeStyle::SingleClass => format!("A-{:0width$}", sequence, width = CODE_DIGITS),
        CodeStyle::PerClass => {
            let prefix = match priority {
                PriorityClass::Priority => 'P',
                PriorityClass::Normal => 'N',
            };
            format!("{}{:0width$}", prefix, sequence, width = CODE_DIGITS)
        }
    }
}
