//! Practice games played on a material's text
//!
//! Both games are pure state machines. The terminal UI drives them with
//! key presses and passes in the random source, so tests can seed it.

pub mod fill_word;
pub mod say_aloud;

pub use fill_word::{Feedback, FillWordGame, Pick, PracticeLine, Slot};
pub use say_aloud::{SayAloudGame, Sentence};
