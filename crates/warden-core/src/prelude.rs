//! Convenience re-exports of the core types.

pub use crate::dirs::WardenHome;
pub use crate::error::ErrorCode;
pub use crate::shell::{ShellError, ShellExecutor, ShellOutput};
pub use crate::types::{ConfirmationId, Timestamp};
