//! Fill the Word: rebuild each line by picking its missing words
//!
//! Every line of the material is practised in rounds. A round blanks out
//! `difficulty` randomly chosen words and the player fills the blanks left
//! to right from a handful of options. Completing a round raises the line's
//! difficulty until a quarter of its words are blanked, then the game moves
//! on to the next line. A wrong pick reveals the full line and the round is
//! dealt again at the same difficulty.

use crate::materials::RevisionMaterial;
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Share of a line's words blanked at its hardest round
pub const MAX_DIFFICULTY_FRACTION: f64 = 0.25;
/// Minimum number of options offered per blank
pub const OPTION_COUNT: usize = 4;
/// Text drawn in place of a missing word
pub const BLANK: &str = "_____";

const FILLER_WORDS: [&str; 10] = [
    "the", "and", "for", "with", "this", "that", "from", "they", "have", "been",
];

/// A line of the material being practised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeLine {
    words: Vec<String>,
    difficulty: usize,
    completed: bool,
}

impl PracticeLine {
    fn new(words: Vec<String>) -> Self {
        Self {
            words,
            difficulty: 1,
            completed: false,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// Number of words blanked in the current round
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn max_difficulty(&self) -> usize {
        ((self.words.len() as f64 * MAX_DIFFICULTY_FRACTION).ceil() as usize).max(1)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// Non-blank lines with more than one word, across all paragraphs
pub fn parse_lines(text: &str) -> Vec<PracticeLine> {
    text.lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|words| words.len() > 1)
        .map(PracticeLine::new)
        .collect()
}

/// How a word of the current line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    Word(&'a str),
    /// A blank the player already filled
    Filled(&'a str),
    /// The blank the next pick fills
    Current,
    Blank,
}

/// Result of picking an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Right word, more blanks to go
    Filled,
    /// Right word and every blank is filled
    RoundComplete,
    Wrong,
    /// No round is waiting for a pick
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
struct Round {
    /// Blanked word positions, left to right
    blanks: Vec<usize>,
    filled: usize,
    options: Vec<String>,
}

/// Game state for one material
#[derive(Debug, Clone)]
pub struct FillWordGame {
    title: String,
    lines: Vec<PracticeLine>,
    current: usize,
    completed_lines: usize,
    round: Option<Round>,
    feedback: Option<Feedback>,
}

impl FillWordGame {
    pub fn new<R: Rng + ?Sized>(material: &RevisionMaterial, rng: &mut R) -> Self {
        Self::from_text(&material.name, &material.extract, rng)
    }

    pub fn from_text<R: Rng + ?Sized>(title: &str, text: &str, rng: &mut R) -> Self {
        let mut game = Self {
            title: title.to_string(),
            lines: parse_lines(text),
            current: 0,
            completed_lines: 0,
            round: None,
            feedback: None,
        };
        game.deal(rng);
        game
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The material has no line worth practising
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        !self.lines.is_empty() && self.completed_lines == self.lines.len()
    }

    /// Completed and total lines
    pub fn progress(&self) -> (usize, usize) {
        (self.completed_lines, self.lines.len())
    }

    pub fn current_line(&self) -> Option<&PracticeLine> {
        self.lines.get(self.current)
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Filled and total blanks of the current round
    pub fn blank_progress(&self) -> (usize, usize) {
        self.round
            .as_ref()
            .map(|round| (round.filled, round.blanks.len()))
            .unwrap_or((0, 0))
    }

    /// Options offered for the current blank
    pub fn options(&self) -> &[String] {
        self.round
            .as_ref()
            .map(|round| round.options.as_slice())
            .unwrap_or(&[])
    }

    /// The current line with its blanks, in reading order
    pub fn slots(&self) -> Vec<Slot<'_>> {
        let (Some(line), Some(round)) = (self.current_line(), self.round.as_ref()) else {
            return Vec::new();
        };
        line.words
            .iter()
            .enumerate()
            .map(|(position, word)| match round.blanks.iter().position(|&b| b == position) {
                None => Slot::Word(word),
                Some(blank) if blank < round.filled => Slot::Filled(word),
                Some(blank) if blank == round.filled => Slot::Current,
                Some(_) => Slot::Blank,
            })
            .collect()
    }

    /// Fill the current blank with option `index`
    pub fn choose(&mut self, index: usize) -> Pick {
        if self.feedback.is_some() {
            return Pick::Ignored;
        }
        let (Some(line), Some(round)) = (self.lines.get(self.current), self.round.as_mut()) else {
            return Pick::Ignored;
        };
        let Some(option) = round.options.get(index) else {
            return Pick::Ignored;
        };
        let Some(&position) = round.blanks.get(round.filled) else {
            return Pick::Ignored;
        };

        if *option != line.words[position] {
            self.feedback = Some(Feedback::Incorrect);
            return Pick::Wrong;
        }

        round.filled += 1;
        if round.filled == round.blanks.len() {
            self.feedback = Some(Feedback::Correct);
            Pick::RoundComplete
        } else {
            Pick::Filled
        }
    }

    /// Move past the feedback of a finished round.
    ///
    /// After a correct round the line gets harder, or the game moves to the
    /// next line once the line's hardest round is done. After a wrong pick
    /// the round is dealt again. Returns false when there was no feedback.
    pub fn proceed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.feedback.take() {
            Some(Feedback::Correct) => {
                if let Some(line) = self.lines.get_mut(self.current) {
                    line.difficulty += 1;
                    if line.difficulty > line.max_difficulty() {
                        line.completed = true;
                        self.completed_lines += 1;
                        self.current += 1;
                    }
                }
                self.deal(rng);
                true
            }
            Some(Feedback::Incorrect) => {
                self.deal(rng);
                true
            }
            None => false,
        }
    }

    /// Start over from the first line at the easiest difficulty
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for line in &mut self.lines {
            line.difficulty = 1;
            line.completed = false;
        }
        self.current = 0;
        self.completed_lines = 0;
        self.feedback = None;
        self.deal(rng);
    }

    fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.round = self.lines.get(self.current).map(|line| {
            let count = line.difficulty.min(line.words.len());
            let mut blanks = index::sample(rng, line.words.len(), count).into_vec();
            blanks.sort_unstable();
            let options = build_options(line, &blanks, rng);
            Round {
                blanks,
                filled: 0,
                options,
            }
        });
    }
}

/// Missing words plus distractors from the line, then filler words, shuffled
fn build_options<R: Rng + ?Sized>(line: &PracticeLine, blanks: &[usize], rng: &mut R) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for &position in blanks {
        let word = &line.words[position];
        if !options.contains(word) {
            options.push(word.clone());
        }
    }

    let mut distractors: Vec<&String> = Vec::new();
    for word in &line.words {
        if !options.contains(word) && !distractors.contains(&word) {
            distractors.push(word);
        }
    }
    distractors.shuffle(rng);
    let wanted = OPTION_COUNT.saturating_sub(options.len());
    options.extend(distractors.into_iter().take(wanted).cloned());

    let mut fillers = FILLER_WORDS;
    fillers.shuffle(rng);
    for filler in fillers {
        if options.len() >= OPTION_COUNT {
            break;
        }
        if !options.iter().any(|option| option == filler) {
            options.push(filler.to_string());
        }
    }

    options.shuffle(rng);
    options
}
