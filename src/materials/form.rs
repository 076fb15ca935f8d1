//! Add/edit form rules for materials

use super::model::{NewMaterial, RevisionMaterial};
use std::fmt;

pub const NAME_MIN_CHARS: usize = 2;
pub const EXTRACT_MIN_CHARS: usize = 10;

/// Message shown on the dialog when any field is invalid
pub const FORM_ERROR_MESSAGE: &str = "Please fix the errors in the form";

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub extract: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.extract.is_none()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [self.name.as_deref(), self.extract.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Form state for creating or editing a material
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialForm {
    pub name: String,
    pub extract: String,
    pub errors: FieldErrors,
}

impl MaterialForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form prefilled from an existing material
    pub fn from_material(material: &RevisionMaterial) -> Self {
        Self {
            name: material.name.clone(),
            extract: material.extract.clone(),
            errors: FieldErrors::default(),
        }
    }

    /// Run the field rules, keeping the messages on the form
    pub fn validate(&mut self) -> bool {
        self.errors = check(&self.name, &self.extract);
        self.errors.is_empty()
    }

    /// Editing a field clears that field's message
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.errors.name = None;
    }

    pub fn set_extract(&mut self, extract: impl Into<String>) {
        self.extract = extract.into();
        self.errors.extract = None;
    }

    pub fn data(&self) -> NewMaterial {
        NewMaterial {
            name: self.name.clone(),
            extract: self.extract.clone(),
        }
    }
}

/// Field rules shared by the form and the command line
pub fn check(name: &str, extract: &str) -> FieldErrors {
    let name = name.trim();
    let extract = extract.trim();

    let name_error = if name.is_empty() {
        Some("Name is required".to_string())
    } else if name.chars().count() < NAME_MIN_CHARS {
        Some(format!("Name must be at least {NAME_MIN_CHARS} characters long"))
    } else {
        None
    };

    let extract_error = if extract.is_empty() {
        Some("Content is required".to_string())
    } else if extract.chars().count() < EXTRACT_MIN_CHARS {
        Some(format!("Content must be at least {EXTRACT_MIN_CHARS} characters long"))
    } else {
        None
    };

    FieldErrors {
        name: name_error,
        extract: extract_error,
    }
}
