//! Dialog layering, layout and input gating
//!
//! Every entry renders as one layer, in stack order. Only the topmost layer
//! takes input: pointer hits are resolved against it alone, and gestures
//! aimed at any other entry are ignored.

use super::manager::DialogManager;
use super::types::{DialogId, DialogView, DialogWidth};
use ratatui::layout::Rect;
use tracing::trace;

/// Gestures the presentation layer forwards to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogGesture {
    /// Click on the dimmed area around the dialog
    BackdropClick,
    /// The explicit close control (or Escape)
    CloseButton,
    /// The submit button (or its keyboard shortcut)
    SubmitButton,
    /// Click inside the dialog body; never reaches the backdrop
    BodyClick,
}

/// What a gesture did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Closed,
    SubmitStarted,
    Ignored,
}

impl<C: Clone + Send + 'static> DialogManager<C> {
    /// Apply a gesture aimed at `id`. Entries below the top are inert.
    pub fn handle_gesture(&self, id: DialogId, gesture: DialogGesture) -> GestureOutcome {
        if self.top_id() != Some(id) {
            trace!(dialog = %id, ?gesture, "Gesture on inert dialog ignored");
            return GestureOutcome::Ignored;
        }

        match gesture {
            DialogGesture::BackdropClick | DialogGesture::CloseButton => {
                if self.close(Some(id)) {
                    GestureOutcome::Closed
                } else {
                    GestureOutcome::Ignored
                }
            }
            DialogGesture::SubmitButton => match self.trigger_submit(Some(id)) {
                Some(_) => GestureOutcome::SubmitStarted,
                None => GestureOutcome::Ignored,
            },
            DialogGesture::BodyClick => GestureOutcome::Ignored,
        }
    }
}

/// Rows taken by the title line and borders
const CHROME_HEIGHT: u16 = 3;
/// Rows taken by the submit button row
const SUBMIT_HEIGHT: u16 = 3;
/// Rows reserved for the error banner
const BANNER_HEIGHT: u16 = 1;
/// Width of the `[x]` close control
const CLOSE_WIDTH: u16 = 3;

/// Computed areas of one dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    /// Full available area, covered by the backdrop
    pub backdrop: Rect,
    /// Dialog box including border
    pub dialog_area: Rect,
    /// Inner area for the caller's content
    pub content_area: Rect,
    /// Error banner line, above the submit row
    pub banner_area: Option<Rect>,
    /// Submit button row
    pub submit_area: Option<Rect>,
    /// The `[x]` control on the top border
    pub close_area: Rect,
}

impl DialogLayout {
    /// Lay out a dialog centered in `available`
    pub fn calculate(
        width: DialogWidth,
        content_height: u16,
        has_submit: bool,
        available: Rect,
    ) -> Self {
        let width = width.resolve(available.width.saturating_sub(2)).max(CLOSE_WIDTH + 4);
        let extra = if has_submit { SUBMIT_HEIGHT + BANNER_HEIGHT } else { 0 };
        let height = content_height
            .saturating_add(CHROME_HEIGHT)
            .saturating_add(extra)
            .min(available.height);

        let dialog_area = Rect {
            x: available.x + available.width.saturating_sub(width) / 2,
            y: available.y + available.height.saturating_sub(height) / 2,
            width: width.min(available.width),
            height,
        };

        let inner = Rect {
            x: dialog_area.x + 1,
            y: dialog_area.y + 2,
            width: dialog_area.width.saturating_sub(2),
            height: dialog_area.height.saturating_sub(CHROME_HEIGHT),
        };

        let (content_area, banner_area, submit_area) = if has_submit {
            let submit_y = inner.y + inner.height.saturating_sub(SUBMIT_HEIGHT);
            let banner_y = submit_y.saturating_sub(BANNER_HEIGHT).max(inner.y);
            (
                Rect {
                    height: banner_y - inner.y,
                    ..inner
                },
                Some(Rect {
                    y: banner_y,
                    height: BANNER_HEIGHT,
                    ..inner
                }),
                Some(Rect {
                    y: submit_y,
                    height: inner.height.min(SUBMIT_HEIGHT),
                    ..inner
                }),
            )
        } else {
            (inner, None, None)
        };

        let close_area = Rect {
            x: (dialog_area.x + dialog_area.width).saturating_sub(CLOSE_WIDTH + 1),
            y: dialog_area.y,
            width: CLOSE_WIDTH,
            height: 1,
        };

        Self {
            backdrop: available,
            dialog_area,
            content_area,
            banner_area,
            submit_area,
            close_area,
        }
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

/// A rendered dialog, kept for hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayer {
    pub dialog_id: DialogId,
    pub layout: DialogLayout,
    pub interactive: bool,
}

impl DialogLayer {
    pub fn new<C>(view: &DialogView<C>, layout: DialogLayout) -> Self {
        Self {
            dialog_id: view.id,
            layout,
            interactive: view.interactive,
        }
    }

    /// Classify a pointer position relative to this layer
    pub fn gesture_at(&self, x: u16, y: u16) -> DialogGesture {
        let layout = &self.layout;
        if contains(layout.close_area, x, y) {
            DialogGesture::CloseButton
        } else if layout.submit_area.is_some_and(|area| contains(area, x, y)) {
            DialogGesture::SubmitButton
        } else if contains(layout.dialog_area, x, y) {
            DialogGesture::BodyClick
        } else {
            DialogGesture::BackdropClick
        }
    }
}

/// Layers from the last render, bottom to top
#[derive(Debug, Default, Clone)]
pub struct LayerManager {
    layers: Vec<DialogLayer>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn add_layer(&mut self, layer: DialogLayer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[DialogLayer] {
        &self.layers
    }

    pub fn topmost_layer(&self) -> Option<&DialogLayer> {
        self.layers.last()
    }

    /// Resolve a pointer press to a gesture on the interactive layer
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(DialogId, DialogGesture)> {
        let top = self.topmost_layer().filter(|layer| layer.interactive)?;
        Some((top.dialog_id, top.gesture_at(x, y)))
    }
}
