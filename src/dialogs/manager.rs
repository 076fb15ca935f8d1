//! Dialog manager: the stack orchestrator
//!
//! The dialog manager is responsible for:
//! - Owning the stack of dialog entries (last = topmost)
//! - Handing out deferred-result handles from `open`
//! - Settling entries through `close`, `resolve` and `reject`
//! - Scheduling enter, exit and error-banner timers
//! - Publishing whether any dialog is open
//!
//! Every operation takes the stack lock once and never holds it across an
//! await, so no observer ever sees a half-applied change.

use super::handle::{DialogHandle, Outcome, Settler};
use super::stack::{DialogEntry, DialogStack};
use super::timers::{DialogTimings, TimerAction, TimerKind, TimerTable, TimerToken};
use super::types::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

/// Orchestrates a stack of modal dialogs.
///
/// Cheap to clone; all clones share the same stack. `C` is the content
/// descriptor type the presentation layer knows how to render.
pub struct DialogManager<C> {
    inner: Arc<Shared<C>>,
}

impl<C> Clone for DialogManager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Shared<C> {
    state: Mutex<StackState<C>>,
    timings: DialogTimings,
    open_tx: watch::Sender<bool>,
    runtime: Option<Handle>,
}

/// Everything guarded by the stack lock
pub(crate) struct StackState<C> {
    pub stack: DialogStack<C>,
    pub timers: TimerTable,
    next_id: u64,
    event_sender: Option<mpsc::UnboundedSender<DialogEvent>>,
}

impl<C> StackState<C> {
    fn allocate_id(&mut self) -> DialogId {
        let id = DialogId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn emit(&self, event: DialogEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}

impl<C: Clone + Send + 'static> DialogManager<C> {
    /// Create an empty dialog manager.
    ///
    /// Lifecycle timers run on the tokio runtime current at creation, or
    /// the one current at the call site if the manager was created outside
    /// a runtime. With no runtime at all, transitions complete immediately.
    pub fn new(timings: DialogTimings) -> Self {
        let (open_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Shared {
                state: Mutex::new(StackState {
                    stack: DialogStack::new(),
                    timers: TimerTable::new(),
                    next_id: 0,
                    event_sender: None,
                }),
                timings,
                open_tx,
                runtime: Handle::try_current().ok(),
            }),
        }
    }

    /// Set the sender for dialog lifecycle events
    pub fn set_event_sender(&self, sender: mpsc::UnboundedSender<DialogEvent>) {
        self.lock().event_sender = Some(sender);
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, StackState<C>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a dialog and get a handle that settles with its outcome
    pub fn open<T: Send + 'static>(&self, options: DialogOptions<C, T>) -> DialogHandle<T> {
        let mut guard = self.lock();
        let id = guard.allocate_id();
        let (settler, handle) = Settler::attached(id);
        self.push_entry(&mut guard, id, EntryOptions::from_options(options), settler);
        handle
    }

    /// Open a dialog whose outcome nobody awaits.
    ///
    /// Rejections, including the user closing it, are logged and dropped.
    pub fn open_detached<T: Send + 'static>(&self, options: DialogOptions<C, T>) -> DialogId {
        let mut guard = self.lock();
        let id = guard.allocate_id();
        self.push_entry(&mut guard, id, EntryOptions::from_options(options), Settler::Detached);
        id
    }

    fn push_entry(
        &self,
        state: &mut StackState<C>,
        id: DialogId,
        options: EntryOptions<C>,
        settler: Settler,
    ) {
        debug!(dialog = %id, title = %options.title, depth = state.stack.len() + 1, "Opening dialog");
        state.stack.push(DialogEntry::new(id, options, settler));
        self.publish_open(state);
        state.emit(DialogEvent::Opened(id));
        self.schedule(state, id, TimerAction::Enter);
    }

    /// Close the target dialog (default: topmost unsettled), rejecting its
    /// handle with [`DialogError::Cancelled`]. Returns `false` if nothing
    /// was settled.
    pub fn close(&self, target: Option<DialogId>) -> bool {
        self.settle(target, Err(DialogError::Cancelled))
    }

    /// Resolve the target dialog (default: topmost unsettled) with `value`
    pub fn resolve<T: Send + 'static>(&self, value: T, target: Option<DialogId>) -> bool {
        self.settle(target, Ok(Box::new(value)))
    }

    /// Reject the target dialog (default: topmost unsettled) with `error`
    pub fn reject(&self, error: DialogError, target: Option<DialogId>) -> bool {
        self.settle(target, Err(error))
    }

    pub(crate) fn settle(&self, target: Option<DialogId>, outcome: Outcome) -> bool {
        let mut guard = self.lock();
        let state = &mut *guard;

        let Some(entry) = state.stack.settle_target(target) else {
            trace!(?target, "Settle ignored, no matching dialog");
            return false;
        };
        let id = entry.id;
        if entry.is_settled() {
            trace!(dialog = %id, "Settle ignored, dialog already settled");
            return false;
        }

        let settlement = if outcome.is_ok() {
            SettlementState::Resolved
        } else {
            SettlementState::Rejected
        };
        if !entry.settler.settle(id, outcome) {
            return false;
        }
        entry.settlement = settlement;
        entry.phase = EntryPhase::Exiting;

        debug!(dialog = %id, ?settlement, "Dialog settled");
        state.emit(DialogEvent::Settled(id, settlement));

        state.timers.cancel(id, TimerKind::Enter);
        state.timers.cancel(id, TimerKind::ErrorClear);
        self.schedule(state, id, TimerAction::Close);
        true
    }

    /// Spawn a timer for `id`, replacing any live timer of the same kind
    pub(crate) fn schedule(&self, state: &mut StackState<C>, id: DialogId, action: TimerAction) {
        let kind = action.kind();
        let delay = self.inner.timings.delay_for(kind);
        let token = state.timers.next_token();
        let Some(runtime) = self.runtime() else {
            warn!(dialog = %id, ?kind, "No async runtime, applying timer immediately");
            state.timers.cancel(id, kind);
            self.apply_timer(state, id, action);
            return;
        };
        let shared = Arc::downgrade(&self.inner);

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = shared.upgrade() {
                DialogManager { inner }.fire_timer(id, action, token);
            }
        });

        if state.timers.insert(id, kind, token, handle) {
            trace!(dialog = %id, ?kind, "Replaced pending timer");
        }
    }

    /// Runtime that timers and submissions are spawned on
    pub(crate) fn runtime(&self) -> Option<Handle> {
        self.inner
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
    }

    fn fire_timer(&self, id: DialogId, action: TimerAction, token: TimerToken) {
        let mut guard = self.lock();
        let state = &mut *guard;

        if !state.timers.complete(id, action.kind(), token) {
            trace!(dialog = %id, ?action, "Stale timer ignored");
            return;
        }
        self.apply_timer(state, id, action);
    }

    fn apply_timer(&self, state: &mut StackState<C>, id: DialogId, action: TimerAction) {
        match action {
            TimerAction::Enter => {
                if let Some(entry) = state.stack.get_mut(id) {
                    if entry.phase == EntryPhase::Entering {
                        entry.phase = EntryPhase::Visible;
                        state.emit(DialogEvent::Shown(id));
                    }
                }
            }
            TimerAction::Close => {
                if state.stack.remove(id).is_some() {
                    state.timers.cancel_all(id);
                    debug!(dialog = %id, remaining = state.stack.len(), "Dialog removed");
                    self.publish_open(state);
                    state.emit(DialogEvent::Removed(id));
                }
            }
            TimerAction::ClearError(message) => {
                if let Some(entry) = state.stack.get_mut(id) {
                    if entry.error.as_deref() == Some(message.as_str()) {
                        entry.error = None;
                        state.emit(DialogEvent::ErrorCleared(id));
                    }
                }
            }
        }
    }

    fn publish_open(&self, state: &StackState<C>) {
        let open = !state.stack.is_empty();
        self.inner.open_tx.send_if_modified(|current| {
            if *current == open {
                false
            } else {
                *current = open;
                true
            }
        });
    }

    /// Current stack in render order (oldest first)
    pub fn snapshot(&self) -> Vec<DialogView<C>> {
        self.lock().stack.views()
    }

    /// View of one entry, if it is still on the stack
    pub fn view(&self, id: DialogId) -> Option<DialogView<C>> {
        self.lock().stack.view(id)
    }

    /// Whether any dialog, including one that is exiting, is on the stack
    pub fn is_open(&self) -> bool {
        !self.lock().stack.is_empty()
    }

    /// Watch "is any dialog open", e.g. to freeze background scrolling
    pub fn subscribe_open(&self) -> watch::Receiver<bool> {
        self.inner.open_tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().stack.is_empty()
    }

    /// Id of the last entry, the only one that accepts input
    pub fn top_id(&self) -> Option<DialogId> {
        self.lock().stack.top().map(|entry| entry.id)
    }

    pub fn dialog_ids(&self) -> Vec<DialogId> {
        self.lock().stack.ids()
    }

    /// Close every unsettled dialog, topmost first
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        while self.close(None) {
            closed += 1;
        }
        closed
    }

    #[cfg(test)]
    pub(crate) fn has_timer(&self, id: DialogId, kind: TimerKind) -> bool {
        self.lock().timers.is_scheduled(id, kind)
    }
}

impl<C: Clone + Send + 'static> Default for DialogManager<C> {
    fn default() -> Self {
        Self::new(DialogTimings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn manager() -> DialogManager<&'static str> {
        DialogManager::default()
    }

    fn info(title: &str) -> DialogOptions<&'static str, u32> {
        DialogOptions::new(title, "body")
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_keeps_call_order() {
        let dialogs = manager();
        let handles: Vec<_> = (0..4).map(|i| dialogs.open(info(&format!("d{i}")))).collect();

        let views = dialogs.snapshot();
        assert_eq!(views.len(), 4);
        assert_eq!(
            views.iter().map(|v| v.id).collect::<Vec<_>>(),
            handles.iter().map(|h| h.id()).collect::<Vec<_>>()
        );
        assert_eq!(views.iter().filter(|v| v.interactive).count(), 1);
        assert!(views[3].interactive);
        assert!(views.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_transition() {
        let dialogs = manager();
        let handle = dialogs.open(info("Hello"));
        assert_eq!(dialogs.snapshot()[0].phase, EntryPhase::Entering);

        sleep(Duration::from_millis(11)).await;
        assert_eq!(dialogs.snapshot()[0].phase, EntryPhase::Visible);
        assert!(!dialogs.has_timer(handle.id(), TimerKind::Enter));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_settles_exactly_once() {
        let dialogs = manager();
        let mut handle = dialogs.open(info("Pick"));
        let id = handle.id();

        assert!(dialogs.resolve(5u32, None));
        assert!(!dialogs.resolve(6u32, Some(id)));
        assert!(!dialogs.reject(DialogError::rejected("late"), Some(id)));
        assert!(!dialogs.close(Some(id)));

        assert_eq!(handle.try_settled(), Some(Ok(5)));
        assert_eq!(dialogs.view(id).map(|v| v.settlement), Some(SettlementState::Resolved));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_targets_topmost_unsettled() {
        let dialogs = manager();
        let mut first = dialogs.open(info("A"));
        let second = dialogs.open(info("B"));

        assert!(dialogs.close(None));
        assert_eq!(second.await, Err(DialogError::Cancelled));
        assert!(first.try_settled().is_none());
        assert!(dialogs.dialog_ids().contains(&first.id()));

        // B is exiting but still stacked; the next close reaches A
        assert!(dialogs.close(None));
        assert_eq!(first.await, Err(DialogError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_waits_for_exit_timer() {
        let dialogs = manager();
        let handle = dialogs.open(info("Bye"));
        let id = handle.id();

        dialogs.reject(DialogError::rejected("nope"), None);
        assert_eq!(handle.await, Err(DialogError::Rejected("nope".into())));
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Exiting));

        sleep(Duration::from_millis(199)).await;
        assert!(dialogs.is_open());
        sleep(Duration::from_millis(2)).await;
        assert!(!dialogs.is_open());
        assert!(!dialogs.has_timer(id, TimerKind::Close));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_enter_never_shows() {
        let dialogs = manager();
        let handle = dialogs.open(info("Quick"));
        let id = handle.id();
        dialogs.close(None);

        sleep(Duration::from_millis(20)).await;
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Exiting));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_and_empty_stack_are_noops() {
        let dialogs = manager();
        assert!(!dialogs.close(None));
        assert!(!dialogs.resolve(1u32, None));

        let _handle = dialogs.open(info("Only"));
        assert!(!dialogs.close(Some(DialogId(99))));
        assert_eq!(dialogs.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_close_is_swallowed() {
        let dialogs = manager();
        let id = dialogs.open_detached(info("Saved"));
        assert!(dialogs.close(None));
        assert_eq!(dialogs.view(id).map(|v| v.settlement), Some(SettlementState::Rejected));

        sleep(Duration::from_millis(250)).await;
        assert!(dialogs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_watch_and_events() {
        let dialogs = manager();
        let (tx, mut rx) = mpsc::unbounded_channel();
        dialogs.set_event_sender(tx);
        let mut open = dialogs.subscribe_open();
        assert!(!*open.borrow());

        let handle = dialogs.open(info("Watch"));
        let id = handle.id();
        assert!(*open.borrow_and_update());

        sleep(Duration::from_millis(11)).await;
        dialogs.resolve(1u32, None);
        sleep(Duration::from_millis(201)).await;
        assert!(open.has_changed().unwrap_or(false));
        assert!(!*open.borrow_and_update());

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                DialogEvent::Opened(id),
                DialogEvent::Shown(id),
                DialogEvent::Settled(id, SettlementState::Resolved),
                DialogEvent::Removed(id),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_resolve_type_reaches_handle() {
        let dialogs = manager();
        let handle = dialogs.open(info("Typed"));
        dialogs.resolve("not a number", None);
        assert!(matches!(handle.await, Err(DialogError::ResultType { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_never_reused() {
        let dialogs = manager();
        let first = dialogs.open(info("1")).id();
        dialogs.close(None);
        sleep(Duration::from_millis(250)).await;
        let second = dialogs.open(info("2")).id();
        assert!(second > first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_all() {
        let dialogs = manager();
        let a = dialogs.open(info("A"));
        let b = dialogs.open(info("B"));
        assert_eq!(dialogs.close_all(), 2);
        assert_eq!(a.await, Err(DialogError::Cancelled));
        assert_eq!(b.await, Err(DialogError::Cancelled));
    }

    #[tokio::test]
    async fn test_dropping_manager_drops_handles() {
        let dialogs = manager();
        let handle = dialogs.open(info("Orphan"));
        drop(dialogs);
        assert_eq!(handle.await, Err(DialogError::Dropped));
    }

    #[test]
    fn test_transitions_complete_without_runtime() {
        let dialogs = manager();
        let mut handle = dialogs.open(info("Sync"));
        let id = handle.id();
        assert_eq!(dialogs.view(id).map(|v| v.phase), Some(EntryPhase::Visible));
        assert!(!dialogs.has_timer(id, TimerKind::Enter));

        assert!(dialogs.resolve(5u32, None));
        assert!(dialogs.is_empty());
        assert_eq!(handle.try_settled(), Some(Ok(5)));

        let detached = dialogs.open_detached(info("Detached"));
        assert!(dialogs.close(Some(detached)));
        assert!(!dialogs.is_open());
    }
}
