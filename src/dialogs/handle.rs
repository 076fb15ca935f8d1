//! Deferred-result handles
//!
//! Every entry owns a [`Settler`]; the caller owns the matching [`DialogHandle`].
//! The settler can fire exactly once, after which it is spent.

use super::types::{DialogError, DialogId, DialogResult};
use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

/// Type-erased value carried from `resolve` to the handle
pub(crate) type SettledValue = Box<dyn Any + Send>;

/// Type-erased outcome of a settlement
pub(crate) type Outcome = Result<SettledValue, DialogError>;

/// Settle-once side of a dialog entry
pub(crate) enum Settler {
    /// A caller is awaiting the handle
    Attached(oneshot::Sender<Outcome>),
    /// Fire-and-forget dialog; outcomes are swallowed
    Detached,
    /// Already settled
    Spent,
}

impl Settler {
    /// Create a settler together with the caller's handle
    pub fn attached<T>(id: DialogId) -> (Self, DialogHandle<T>) {
        let (sender, receiver) = oneshot::channel();
        let handle = DialogHandle {
            id,
            receiver,
            _marker: PhantomData,
        };
        (Settler::Attached(sender), handle)
    }

    pub fn is_spent(&self) -> bool {
        matches!(self, Settler::Spent)
    }

    /// Deliver the outcome. Returns `false` if this settler already fired.
    pub fn settle(&mut self, id: DialogId, outcome: Outcome) -> bool {
        match std::mem::replace(self, Settler::Spent) {
            Settler::Attached(sender) => {
                if sender.send(outcome).is_err() {
                    debug!(dialog = %id, "Dialog handle dropped before settlement");
                }
                true
            }
            Settler::Detached => {
                if let Err(err) = outcome {
                    debug!(dialog = %id, error = %err, "Detached dialog rejected");
                }
                true
            }
            Settler::Spent => false,
        }
    }
}

/// Future returned by [`DialogManager::open`](super::DialogManager::open).
///
/// Resolves with the value passed to `resolve` (or produced by the submit
/// handler) and fails with the error passed to `reject`, or
/// [`DialogError::Cancelled`] when the dialog is closed.
#[must_use = "a dialog handle does nothing unless awaited; use `open_detached` to ignore the outcome"]
pub struct DialogHandle<T> {
    id: DialogId,
    receiver: oneshot::Receiver<Outcome>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> DialogHandle<T> {
    /// Id of the entry this handle belongs to
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Take the outcome if the dialog already settled.
    ///
    /// Returns `None` while pending. Once an outcome has been taken, later
    /// calls report [`DialogError::Dropped`].
    pub fn try_settled(&mut self) -> Option<DialogResult<T>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(downcast(outcome)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(DialogError::Dropped)),
        }
    }
}

impl<T: 'static> Future for DialogHandle<T> {
    type Output = DialogResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(downcast(outcome)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(DialogError::Dropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}

fn downcast<T: 'static>(outcome: Outcome) -> DialogResult<T> {
    let value = outcome?;
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| DialogError::ResultType {
            expected: std::any::type_name::<T>(),
        })
}
