//! Content carried by the application's dialogs

use super::form::SharedForm;

/// What a dialog shows. The stack treats this as opaque.
#[derive(Clone)]
pub enum AppDialog {
    /// Add or edit form for a material
    Form(SharedForm),
    /// Yes/no question answered through the submit button
    Confirm { message: String },
    /// Read-only text, closed with Esc or Enter
    Message { body: String },
}

/// Rows of the form: name box, its error, extract box, its error
pub(crate) const FORM_NAME_HEIGHT: u16 = 3;
pub(crate) const FORM_EXTRACT_HEIGHT: u16 = 8;
pub(crate) const FORM_ERROR_HEIGHT: u16 = 1;

impl AppDialog {
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::Confirm {
            message: message.into(),
        }
    }

    pub fn message(body: impl Into<String>) -> Self {
        Self::Message { body: body.into() }
    }

    /// Whether the dialog owns a text input, so Enter is not a submit key
    pub fn has_text_input(&self) -> bool {
        matches!(self, AppDialog::Form(_))
    }

    /// Rows needed to show the content at `width` columns
    pub fn content_height(&self, width: u16) -> u16 {
        match self {
            AppDialog::Form(_) => {
                FORM_NAME_HEIGHT + FORM_EXTRACT_HEIGHT + 2 * FORM_ERROR_HEIGHT
            }
            AppDialog::Confirm { message } => wrapped_lines(message, width),
            AppDialog::Message { body } => wrapped_lines(body, width),
        }
    }
}

fn wrapped_lines(text: &str, width: u16) -> u16 {
    let lines = textwrap::wrap(text, usize::from(width.max(1))).len();
    u16::try_from(lines.max(1)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_height_wraps() {
        assert_eq!(AppDialog::message("one\ntwo").content_height(40), 2);
        assert_eq!(AppDialog::confirm("one two three four").content_height(10), 2);
        assert_eq!(AppDialog::message("").content_height(10), 1);
    }
}
