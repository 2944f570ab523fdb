#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity of a transient notification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertKind {
    Error,
    Success,
    Warning,
    Info,
}
