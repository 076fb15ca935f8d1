//! Submission controller
//!
//! Drives validate → result → resolve for a dialog's submit action. Failures
//! stay inside the entry as a self-clearing error banner and never reach the
//! caller's handle.

use super::handle::SettledValue;
use super::manager::DialogManager;
use super::timers::{TimerAction, TimerKind};
use super::types::{DialogError, DialogEvent, DialogId, EntryPhase};
use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Caller-supplied submit steps for a dialog
#[async_trait]
pub trait SubmitHandler<T>: Send + Sync {
    /// Check the dialog's input; an error is shown inline
    async fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Produce the value the dialog resolves with
    async fn result(&self) -> Result<T>;
}

/// Submit handler built from two closures
pub struct FnSubmit<V, R> {
    validate: V,
    result: R,
}

#[async_trait]
impl<T, V, VF, R, RF> SubmitHandler<T> for FnSubmit<V, R>
where
    T: Send + 'static,
    V: Fn() -> VF + Send + Sync + 'static,
    VF: Future<Output = Result<()>> + Send + 'static,
    R: Fn() -> RF + Send + Sync + 'static,
    RF: Future<Output = Result<T>> + Send + 'static,
{
    async fn validate(&self) -> Result<()> {
        (self.validate)().await
    }

    async fn result(&self) -> Result<T> {
        (self.result)().await
    }
}

/// Submit button label plus the handler it triggers
pub struct SubmitSpec<T> {
    label: String,
    handler: Arc<dyn SubmitHandler<T>>,
}

impl<T: Send + 'static> SubmitSpec<T> {
    pub fn new(label: impl Into<String>, handler: impl SubmitHandler<T> + 'static) -> Self {
        Self {
            label: label.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn from_fns<V, VF, R, RF>(label: impl Into<String>, validate: V, result: R) -> Self
    where
        V: Fn() -> VF + Send + Sync + 'static,
        VF: Future<Output = Result<()>> + Send + 'static,
        R: Fn() -> RF + Send + Sync + 'static,
        RF: Future<Output = Result<T>> + Send + 'static,
    {
        Self::new(label, FnSubmit { validate, result })
    }

    pub(crate) fn into_erased(self) -> (String, Arc<dyn ErasedSubmit>) {
        let erased: Arc<dyn ErasedSubmit> = Arc::new(Erased(self.handler));
        (self.label, erased)
    }
}

/// Submit handler with its result type erased, as stored on an entry
#[async_trait]
pub(crate) trait ErasedSubmit: Send + Sync {
    async fn validate(&self) -> Result<()>;
    async fn result(&self) -> Result<SettledValue>;
}

struct Erased<T>(Arc<dyn SubmitHandler<T>>);

#[async_trait]
impl<T: Send + 'static> ErasedSubmit for Erased<T> {
    async fn validate(&self) -> Result<()> {
        self.0.validate().await
    }

    async fn result(&self) -> Result<SettledValue> {
        let value = self.0.result().await?;
        Ok(Box::new(value) as Box<dyn Any + Send>)
    }
}

/// Why a submit action did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitSkip {
    /// No dialog matches the target
    NoDialog,
    /// The dialog has no submit action
    NoSubmit,
    /// A submission is already running for this dialog
    Busy,
    /// The dialog already settled
    Settled,
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The dialog resolved with the handler's result
    Resolved(DialogId),
    /// Validation or result failed; the error is shown on the dialog
    Failed(DialogId, DialogError),
    /// The dialog settled some other way while the handler was running
    Superseded(DialogId),
    /// Nothing was started
    Skipped(SubmitSkip),
}

/// A submission that has marked its entry busy and still has to run
pub(crate) struct PendingSubmission {
    id: DialogId,
    handler: Arc<dyn ErasedSubmit>,
}

impl<C: Clone + Send + 'static> DialogManager<C> {
    /// Run the submit action of the topmost dialog to completion
    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_to(None).await
    }

    /// Run the submit action of a specific dialog (default: the topmost)
    pub async fn submit_to(&self, target: Option<DialogId>) -> SubmitOutcome {
        match self.begin_submission(target) {
            Ok(pending) => self.run_submission(pending).await,
            Err(skip) => SubmitOutcome::Skipped(skip),
        }
    }

    /// Mark the target busy now and run the rest of the submission on the
    /// runtime. Returns `None` if no submission could start.
    pub fn trigger_submit(&self, target: Option<DialogId>) -> Option<JoinHandle<SubmitOutcome>> {
        let Some(runtime) = self.runtime() else {
            warn!("Submit ignored, no async runtime");
            return None;
        };
        match self.begin_submission(target) {
            Ok(pending) => {
                let manager = self.clone();
                Some(runtime.spawn(async move { manager.run_submission(pending).await }))
            }
            Err(skip) => {
                debug!(?skip, "Submit ignored");
                None
            }
        }
    }

    fn begin_submission(&self, target: Option<DialogId>) -> Result<PendingSubmission, SubmitSkip> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let entry = state
            .stack
            .submit_target(target)
            .ok_or(SubmitSkip::NoDialog)?;
        if entry.is_settled() {
            return Err(SubmitSkip::Settled);
        }
        if entry.phase.is_busy() {
            return Err(SubmitSkip::Busy);
        }
        let handler = entry.options.submit.clone().ok_or(SubmitSkip::NoSubmit)?;

        let id = entry.id;
        entry.phase = EntryPhase::Busy;
        let had_error = entry.error.take().is_some();

        state.timers.cancel(id, TimerKind::ErrorClear);
        if had_error {
            state.emit(DialogEvent::ErrorCleared(id));
        }
        debug!(dialog = %id, "Submission started");

        Ok(PendingSubmission { id, handler })
    }

    async fn run_submission(&self, pending: PendingSubmission) -> SubmitOutcome {
        let PendingSubmission { id, handler } = pending;

        if let Err(err) = handler.validate().await {
            return self.fail_submission(id, DialogError::Validation(err.to_string()));
        }

        match handler.result().await {
            Ok(value) => {
                if self.settle(Some(id), Ok(value)) {
                    SubmitOutcome::Resolved(id)
                } else {
                    debug!(dialog = %id, "Dialog settled while submitting");
                    SubmitOutcome::Superseded(id)
                }
            }
            Err(err) => self.fail_submission(id, DialogError::Submission(err.to_string())),
        }
    }

    fn fail_submission(&self, id: DialogId, error: DialogError) -> SubmitOutcome {
        let mut guard = self.lock();
        let state = &mut *guard;

        let Some(entry) = state.stack.get_mut(id) else {
            debug!(dialog = %id, "Dialog removed while submitting");
            return SubmitOutcome::Superseded(id);
        };
        if entry.is_settled() {
            debug!(dialog = %id, "Dialog settled while submitting");
            return SubmitOutcome::Superseded(id);
        }

        let message = error.banner_message();
        entry.phase = EntryPhase::Visible;
        entry.error = Some(message.clone());
        debug!(dialog = %id, error = %message, "Submission failed");

        self.schedule(state, id, TimerAction::ClearError(message.clone()));
        state.emit(DialogEvent::ErrorShown(id, message));

        SubmitOutcome::Failed(id, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::timers::DialogTimings;
    use crate::dialogs::types::DialogOptions;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::sleep;

    fn manager() -> DialogManager<&'static str> {
        DialogManager::new(DialogTimings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_failure_stays_inline() {
        let result_calls = Arc::new(AtomicUsize::new(0));
        let calls = result_calls.clone();

        let dialogs = manager();
        let mut handle = dialogs.open(DialogOptions::new("Add", "form").with_submit(
            SubmitSpec::<u32>::from_fns(
                "Save",
                || async { Err(anyhow!("name required")) },
                move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(0) }
                },
            ),
        ));
        let id = handle.id();

        let outcome = dialogs.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(id, DialogError::Validation("name required".into()))
        );

        let view = dialogs.view(id).expect("dialog still stacked");
        assert_eq!(view.error.as_deref(), Some("name required"));
        assert!(!view.is_busy());
        assert_eq!(dialogs.len(), 1);
        assert!(handle.try_settled().is_none());
        assert_eq!(result_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_entering_stays_busy() {
        let gate = Arc::new(Notify::new());
        let release = gate.clone();

        let dialogs = manager();
        let mut handle = dialogs.open(DialogOptions::new("Add", "form").with_submit(
            SubmitSpec::<u32>::from_fns(
                "Save",
                move || {
                    let gate = gate.clone();
                    async move {
                        gate.notified().await;
                        Err(anyhow!("not yet"))
                    }
                },
                || async { Ok(1) },
            ),
        ));
        let id = handle.id();
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Entering));

        let task = dialogs.trigger_submit(None).expect("submission started");
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Busy));

        // the enter timer fires at 10ms and must leave the busy entry alone
        sleep(Duration::from_millis(20)).await;
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Busy));

        release.notify_one();
        let outcome = task.await.expect("submission task");
        assert_eq!(outcome, SubmitOutcome::Failed(id, DialogError::Validation("not yet".into())));

        let view = dialogs.view(id).expect("dialog still stacked");
        assert_eq!(view.phase, EntryPhase::Visible);
        assert_eq!(view.error.as_deref(), Some("not yet"));
        assert!(handle.try_settled().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_clears_after_timeout() {
        let dialogs = manager();
        let _handle = dialogs.open(DialogOptions::new("Add", "form").with_submit(
            SubmitSpec::<()>::from_fns(
                "Save",
                || async { Err(anyhow!("too short")) },
                || async { Ok(()) },
            ),
        ));
        dialogs.submit().await;
        let id = dialogs.top_id().expect("top dialog");

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(dialogs.view(id).and_then(|v| v.error), Some("too short".to_string()));

        sleep(Duration::from_millis(2)).await;
        assert_eq!(dialogs.view(id).and_then(|v| v.error), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_error_is_not_wiped_by_stale_timer() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let dialogs = manager();
        let _handle = dialogs.open(DialogOptions::new("Add", "form").with_submit(
            SubmitSpec::<()>::from_fns(
                "Save",
                move || {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Err(anyhow!("attempt {attempt} failed")) }
                },
                || async { Ok(()) },
            ),
        ));
        let id = dialogs.top_id().expect("top dialog");

        dialogs.submit().await;
        sleep(Duration::from_millis(2000)).await;
        dialogs.submit().await;
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        // The first banner's timer would have fired here
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(
            dialogs.view(id).and_then(|v| v.error),
            Some("attempt 2 failed".to_string())
        );

        sleep(Duration::from_millis(1600)).await;
        assert_eq!(dialogs.view(id).and_then(|v| v.error), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submit_resolves_and_removes() {
        let dialogs = manager();
        let handle = dialogs.open(DialogOptions::new("Answer", "form").with_submit(
            SubmitSpec::from_fns("Ok", || async { Ok(()) }, || async { Ok(42u32) }),
        ));
        let id = handle.id();

        assert_eq!(dialogs.submit().await, SubmitOutcome::Resolved(id));
        assert_eq!(handle.await, Ok(42));
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Exiting));

        sleep(Duration::from_millis(199)).await;
        assert_eq!(dialogs.len(), 1);
        sleep(Duration::from_millis(2)).await;
        assert!(dialogs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_failure_is_a_submission_error() {
        let dialogs = manager();
        let _handle = dialogs.open(DialogOptions::new("Save", "form").with_submit(
            SubmitSpec::<String>::from_fns(
                "Save",
                || async { Ok(()) },
                || async { Err(anyhow!("Failed to get form data")) },
            ),
        ));
        let id = dialogs.top_id().expect("top dialog");

        assert_eq!(
            dialogs.submit().await,
            SubmitOutcome::Failed(id, DialogError::Submission("Failed to get form data".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_busy_is_skipped() {
        let gate = Arc::new(Notify::new());
        let waiter = gate.clone();

        let dialogs = manager();
        let handle = dialogs.open(DialogOptions::new("Slow", "form").with_submit(
            SubmitSpec::from_fns(
                "Go",
                move || {
                    let waiter = waiter.clone();
                    async move {
                        waiter.notified().await;
                        Ok(())
                    }
                },
                || async { Ok("done") },
            ),
        ));

        let running = dialogs.trigger_submit(None).expect("submission started");
        assert!(dialogs.snapshot()[0].is_busy());
        assert_eq!(dialogs.submit().await, SubmitOutcome::Skipped(SubmitSkip::Busy));
        assert!(dialogs.trigger_submit(None).is_none());

        gate.notify_one();
        assert!(matches!(running.await, Ok(SubmitOutcome::Resolved(_))));
        assert_eq!(handle.await, Ok("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_submission_wins() {
        let gate = Arc::new(Notify::new());
        let waiter = gate.clone();

        let dialogs = manager();
        let handle = dialogs.open(DialogOptions::new("Slow", "form").with_submit(
            SubmitSpec::from_fns(
                "Go",
                || async { Ok(()) },
                move || {
                    let waiter = waiter.clone();
                    async move {
                        waiter.notified().await;
                        Ok(1u8)
                    }
                },
            ),
        ));
        let id = handle.id();

        let running = dialogs.trigger_submit(None).expect("submission started");
        assert!(dialogs.close(None));
        gate.notify_one();

        assert_eq!(running.await.ok(), Some(SubmitOutcome::Superseded(id)));
        assert_eq!(handle.await, Err(DialogError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_without_spec_or_dialog() {
        let dialogs = manager();
        assert_eq!(dialogs.submit().await, SubmitOutcome::Skipped(SubmitSkip::NoDialog));

        dialogs.open_detached(DialogOptions::<_, ()>::new("Info", "text"));
        assert_eq!(dialogs.submit().await, SubmitOutcome::Skipped(SubmitSkip::NoSubmit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_error_message_uses_fallback() {
        let dialogs = manager();
        let _handle = dialogs.open(DialogOptions::new("Add", "form").with_submit(
            SubmitSpec::<()>::from_fns("Save", || async { Err(anyhow!("")) }, || async { Ok(()) }),
        ));
        dialogs.submit().await;
        assert_eq!(
            dialogs.snapshot()[0].error.as_deref(),
            Some(crate::dialogs::types::FALLBACK_ERROR_MESSAGE)
        );
    }
}
