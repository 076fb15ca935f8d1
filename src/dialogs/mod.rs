//! Stacked modal dialogs
//!
//! Any part of the application can open a modal through a shared
//! [`DialogManager`] and await a [`DialogHandle`] for its outcome. Several
//! dialogs may be pending at once; only the topmost takes input. Entries
//! animate in and out on timers, and a dialog's submit action runs
//! validate → result through the submission controller, showing failures
//! as a banner that clears itself.

pub mod handle;
pub mod layer;
pub mod manager;
pub(crate) mod stack;
pub mod submit;
pub mod timers;
pub mod types;

pub use handle::DialogHandle;
pub use layer::{DialogGesture, DialogLayer, DialogLayout, GestureOutcome, LayerManager};
pub use manager::DialogManager;
pub use submit::{FnSubmit, SubmitHandler, SubmitOutcome, SubmitSkip, SubmitSpec};
pub use timers::DialogTimings;
pub use types::*;
