//! Core dialog types
//!
//! Identifiers, options, phases and the error taxonomy shared by the
//! orchestrator, the submission controller and the presentation layer.

use super::submit::{ErasedSubmit, SubmitSpec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for dialog entries.
///
/// Ids increase monotonically for the lifetime of a [`DialogManager`](super::DialogManager)
/// and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DialogId(pub u64);

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Width hint for the rendered dialog box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogWidth {
    /// Compact box, the default
    Small,
    /// Roughly twice the compact width
    Large,
    /// Fixed number of terminal columns
    Columns(u16),
    /// Percentage of the available width
    Percent(u16),
}

impl Default for DialogWidth {
    fn default() -> Self {
        Self::Small
    }
}

impl DialogWidth {
    /// Resolve the hint against the available width, never exceeding it
    pub fn resolve(&self, available: u16) -> u16 {
        let wanted = match *self {
            DialogWidth::Small => 48,
            DialogWidth::Large => 84,
            DialogWidth::Columns(cols) => cols,
            DialogWidth::Percent(pct) => {
                (available as u32 * pct.min(100) as u32 / 100) as u16
            }
        };
        wanted.min(available)
    }
}

/// Options for one dialog invocation.
///
/// `C` is the content descriptor; the orchestrator never looks inside it.
/// `T` is the value the caller's [`DialogHandle`](super::DialogHandle) resolves to.
pub struct DialogOptions<C, T> {
    pub title: String,
    pub content: C,
    pub submit: Option<SubmitSpec<T>>,
    pub width: Option<DialogWidth>,
    pub icon: Option<String>,
}

impl<C, T> DialogOptions<C, T> {
    pub fn new(title: impl Into<String>, content: C) -> Self {
        Self {
            title: title.into(),
            content,
            submit: None,
            width: None,
            icon: None,
        }
    }

    pub fn with_submit(mut self, submit: SubmitSpec<T>) -> Self {
        self.submit = Some(submit);
        self
    }

    pub fn with_width(mut self, width: DialogWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Immutable, type-erased options stored on an entry
#[derive(Clone)]
pub(crate) struct EntryOptions<C> {
    pub title: String,
    pub content: C,
    pub submit: Option<Arc<dyn ErasedSubmit>>,
    pub submit_label: Option<String>,
    pub width: DialogWidth,
    pub icon: Option<String>,
}

impl<C> EntryOptions<C> {
    pub fn from_options<T: Send + 'static>(options: DialogOptions<C, T>) -> Self {
        let (submit, submit_label) = match options.submit {
            Some(spec) => {
                let (label, erased) = spec.into_erased();
                (Some(erased), Some(label))
            }
            None => (None, None),
        };

        Self {
            title: options.title,
            content: options.content,
            submit,
            submit_label,
            width: options.width.unwrap_or_default(),
            icon: options.icon,
        }
    }
}

/// Lifecycle phase of an entry.
///
/// `Busy` is a visible phase during which the submission controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryPhase {
    Entering,
    Visible,
    Busy,
    Exiting,
}

/// Visibility used to drive transition styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Entering,
    Visible,
    Exiting,
}

impl EntryPhase {
    pub fn visibility(&self) -> Visibility {
        match self {
            EntryPhase::Entering => Visibility::Entering,
            EntryPhase::Visible | EntryPhase::Busy => Visibility::Visible,
            EntryPhase::Exiting => Visibility::Exiting,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, EntryPhase::Busy)
    }
}

/// Observable settlement state of an entry (the value itself goes to the handle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementState {
    Pending,
    Resolved,
    Rejected,
}

impl SettlementState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, SettlementState::Pending)
    }
}

/// Read-only view of one entry, in stack order, for the presentation layer
#[derive(Debug, Clone)]
pub struct DialogView<C> {
    pub id: DialogId,
    pub title: String,
    pub content: C,
    pub submit_label: Option<String>,
    pub width: DialogWidth,
    pub icon: Option<String>,
    pub phase: EntryPhase,
    pub error: Option<String>,
    pub settlement: SettlementState,
    /// Only the last entry of the stack accepts input
    pub interactive: bool,
}

impl<C> DialogView<C> {
    pub fn visibility(&self) -> Visibility {
        self.phase.visibility()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn has_submit(&self) -> bool {
        self.submit_label.is_some()
    }
}

/// Notifications emitted by the orchestrator when an event sender is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Opened(DialogId),
    Shown(DialogId),
    Settled(DialogId, SettlementState),
    Removed(DialogId),
    ErrorShown(DialogId, String),
    ErrorCleared(DialogId),
}

/// Result type for dialog handles
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Fallback banner text for failures that carry no message
pub const FALLBACK_ERROR_MESSAGE: &str = "Validation failed.";

/// Dialog error taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// The content provider's validate step failed
    #[error("{0}")]
    Validation(String),

    /// The content provider's result step failed
    #[error("{0}")]
    Submission(String),

    /// The dialog was closed by the user or by caller code
    #[error("Dialog closed")]
    Cancelled,

    /// Caller code rejected the dialog explicitly
    #[error("{0}")]
    Rejected(String),

    /// The dialog was resolved with a value of another type
    #[error("Dialog resolved with a value that is not a {expected}")]
    ResultType { expected: &'static str },

    /// The orchestrator went away before the dialog settled
    #[error("Dialog dropped before it settled")]
    Dropped,
}

impl DialogError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DialogError::Cancelled)
    }

    /// Message shown in the inline error banner
    pub fn banner_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_resolution_is_clamped() {
        assert_eq!(DialogWidth::Small.resolve(200), 48);
        assert_eq!(DialogWidth::Large.resolve(60), 60);
        assert_eq!(DialogWidth::Columns(30).resolve(100), 30);
        assert_eq!(DialogWidth::Percent(50).resolve(120), 60);
        assert_eq!(DialogWidth::Percent(250).resolve(80), 80);
    }

    #[test]
    fn test_phase_visibility() {
        assert_eq!(EntryPhase::Busy.visibility(), Visibility::Visible);
        assert_eq!(EntryPhase::Entering.visibility(), Visibility::Entering);
        assert!(EntryPhase::Busy.is_busy());
        assert!(!EntryPhase::Exiting.is_busy());
    }

    #[test]
    fn test_banner_message_fallback() {
        assert_eq!(DialogError::Validation(String::new()).banner_message(), FALLBACK_ERROR_MESSAGE);
        assert_eq!(
            DialogError::Validation("name required".into()).banner_message(),
            "name required"
        );
        assert_eq!(DialogError::Cancelled.to_string(), "Dialog closed");
    }
}
