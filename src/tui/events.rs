use crate::dialogs::{DialogEvent, DialogId};
use crate::materials::NewMaterial;
use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Lifecycle notification from the dialog stack
    Dialog(DialogEvent),

    /// The add/edit form dialog resolved with valid data
    MaterialSubmitted {
        dialog: DialogId,
        editing: Option<String>,
        data: NewMaterial,
    },

    /// The delete confirmation dialog was accepted
    DeleteConfirmed(String),

    /// Status message event
    StatusMessage(String),
}

/// Event handler for managing input events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,

    /// Terminal input reader, started on demand
    reader: Option<JoinHandle<()>>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval,
            reader: None,
        }
    }

    /// Start reading terminal input on a blocking thread
    pub fn start(&mut self) {
        if self.reader.is_some() {
            return;
        }

        let sender = self.sender.clone();
        let tick_interval = self.tick_interval;
        self.reader = Some(tokio::task::spawn_blocking(move || loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => convert_crossterm_event(event),
                    Err(e) => {
                        debug!("Failed to read terminal event: {}", e);
                        None
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    debug!("Failed to poll terminal events: {}", e);
                    return;
                }
            };

            if let Some(event) = event {
                if sender.send(event).is_err() {
                    return;
                }
            }
        }));
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Send an internal event
    pub fn send(&self, event: Event) -> Result<()> {
        self.sender.send(event)?;
        Ok(())
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Forward dialog lifecycle notifications into this handler
    pub fn forward_dialog_events(&self) -> mpsc::UnboundedSender<DialogEvent> {
        let (dialog_tx, mut dialog_rx) = mpsc::unbounded_channel();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            while let Some(event) = dialog_rx.recv().await {
                if sender.send(Event::Dialog(event)).is_err() {
                    break;
                }
            }
        });
        dialog_tx
    }
}

/// Convert crossterm events to application events
fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            Some(Event::Key(key_event))
        }
        CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}
