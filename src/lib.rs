//! Revise: a study-materials manager for the terminal.
//!
//! The [`dialogs`] module holds the stacked modal dialog orchestrator used by
//! the terminal UI; [`materials`] is the storage layer it edits and
//! [`quiz`] holds the practice games played on a material's text.

pub mod cli;
pub mod config;
pub mod dialogs;
pub mod materials;
pub mod quiz;
pub mod tui;
