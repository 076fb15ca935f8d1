//! Say It Out Loud: recite each sentence from its opening words

use crate::materials::RevisionMaterial;

/// Words of each sentence shown before reveal
pub const VISIBLE_WORDS: usize = 3;

/// One sentence of the material, split into words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<String>,
}

impl Sentence {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Opening words, always on screen
    pub fn visible(&self) -> &[String] {
        &self.words[..self.words.len().min(VISIBLE_WORDS)]
    }

    /// Words masked until the player reveals them
    pub fn hidden(&self) -> &[String] {
        &self.words[self.words.len().min(VISIBLE_WORDS)..]
    }

    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Split text on periods into sentences, dropping empty pieces
pub fn parse_sentences(text: &str) -> Vec<Sentence> {
    text.split('.')
        .map(|piece| Sentence {
            words: piece.split_whitespace().map(str::to_string).collect(),
        })
        .filter(|sentence| !sentence.words.is_empty())
        .collect()
}

/// Game state for one material
#[derive(Debug, Clone)]
pub struct SayAloudGame {
    title: String,
    sentences: Vec<Sentence>,
    index: usize,
    revealing: bool,
}

impl SayAloudGame {
    pub fn new(material: &RevisionMaterial) -> Self {
        Self::from_text(&material.name, &material.extract)
    }

    pub fn from_text(title: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            sentences: parse_sentences(text),
            index: 0,
            revealing: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn current(&self) -> Option<&Sentence> {
        self.sentences.get(self.index)
    }

    /// 1-based position and total, for "Sentence n of m"
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.sentences.len())
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    pub fn set_revealing(&mut self, revealing: bool) {
        self.revealing = revealing;
    }

    pub fn toggle_reveal(&mut self) {
        self.revealing = !self.revealing;
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.sentences.len()
    }

    /// Step back one sentence; hides the reveal. Returns false at the start.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.index -= 1;
        self.revealing = false;
        true
    }

    /// Step forward one sentence; hides the reveal. Returns false at the end.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.index += 1;
        self.revealing = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_split_on_periods() {
        let sentences = parse_sentences("Cells divide by mitosis.  Each  daughter gets a copy. . Done");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].text(), "Cells divide by mitosis");
        assert_eq!(sentences[1].text(), "Each daughter gets a copy");
        assert_eq!(sentences[2].text(), "Done");
    }

    #[test]
    fn test_first_three_words_stay_visible() {
        let sentences = parse_sentences("The heart pumps blood around the body. Two words.");
        assert_eq!(sentences[0].visible(), ["The", "heart", "pumps"]);
        assert_eq!(sentences[0].hidden(), ["blood", "around", "the", "body"]);
        assert_eq!(sentences[1].visible(), ["Two", "words"]);
        assert!(sentences[1].hidden().is_empty());
    }

    #[test]
    fn test_navigation_is_bounded_and_hides_reveal() {
        let mut game = SayAloudGame::from_text("Bio", "One two three four. Five six. Seven.");
        assert_eq!(game.position(), (1, 3));
        assert!(!game.previous());

        game.toggle_reveal();
        assert!(game.is_revealing());
        assert!(game.next());
        assert!(!game.is_revealing());

        assert!(game.next());
        assert_eq!(game.position(), (3, 3));
        game.set_revealing(true);
        assert!(!game.next());
        assert!(game.is_revealing());

        assert!(game.previous());
        assert_eq!(game.current().map(Sentence::text), Some("Five six".to_string()));
    }

    #[test]
    fn test_text_without_sentences() {
        let game = SayAloudGame::from_text("Empty", " . .. ");
        assert!(game.is_empty());
        assert!(game.current().is_none());
    }
}
