//! Material form dialog content

use crate::dialogs::SubmitHandler;
use crate::materials::form::FORM_ERROR_MESSAGE;
use crate::materials::{MaterialForm, NewMaterial};
use anyhow::Result;
use async_trait::async_trait;
use ratatui::widgets::{Block, Borders};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tui_textarea::{CursorMove, Input, TextArea};

/// Which field has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Extract,
}

/// Editable form state shown inside a dialog
pub struct FormView {
    pub name: TextArea<'static>,
    pub extract: TextArea<'static>,
    pub focus: FormField,
    pub form: MaterialForm,
}

impl FormView {
    pub fn new(form: MaterialForm) -> Self {
        let mut name = TextArea::from(form.name.lines().map(String::from).collect::<Vec<_>>());
        name.set_placeholder_text("e.g. Cell biology");
        name.set_block(Block::default().borders(Borders::ALL).title("Name"));
        name.move_cursor(CursorMove::End);

        let mut extract = TextArea::from(form.extract.lines().map(String::from).collect::<Vec<_>>());
        extract.set_placeholder_text("Paste or type the text to revise...");
        extract.set_block(Block::default().borders(Borders::ALL).title("Content"));
        extract.move_cursor(CursorMove::Bottom);
        extract.move_cursor(CursorMove::End);

        Self {
            name,
            extract,
            focus: FormField::Name,
            form,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Extract,
            FormField::Extract => FormField::Name,
        };
    }

    /// Feed a key to the focused field. The name field stays on one line.
    pub fn input(&mut self, input: impl Into<Input>) {
        let input = input.into();
        match self.focus {
            FormField::Name => {
                if input.key == tui_textarea::Key::Enter {
                    return;
                }
                self.name.input(input);
                let name = self.name.lines().join(" ");
                self.form.set_name(name);
            }
            FormField::Extract => {
                self.extract.input(input);
                let extract = self.extract.lines().join("\n");
                self.form.set_extract(extract);
            }
        }
    }

    /// Run the form rules against the current text
    pub fn validate(&mut self) -> bool {
        self.form.validate()
    }
}

/// Form view shared between the dialog content and its submit handler
#[derive(Clone)]
pub struct SharedForm(Arc<Mutex<FormView>>);

impl SharedForm {
    pub fn new(form: MaterialForm) -> Self {
        Self(Arc::new(Mutex::new(FormView::new(form))))
    }

    pub fn lock(&self) -> MutexGuard<'_, FormView> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Validates the form and resolves the dialog with its data
pub struct FormSubmit {
    form: SharedForm,
}

impl FormSubmit {
    pub fn new(form: SharedForm) -> Self {
        Self { form }
    }
}

#[async_trait]
impl SubmitHandler<NewMaterial> for FormSubmit {
    async fn validate(&self) -> Result<()> {
        if self.form.lock().validate() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(FORM_ERROR_MESSAGE))
        }
    }

    async fn result(&self) -> Result<NewMaterial> {
        Ok(self.form.lock().form.data())
    }
}
