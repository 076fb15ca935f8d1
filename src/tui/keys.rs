use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub label: &'static str,
    pub description: &'static str,
}

impl KeyBinding {
    pub const fn new(
        key: KeyCode,
        modifiers: KeyModifiers,
        label: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            modifiers,
            label,
            description,
        }
    }

    /// Shift is ignored for printable keys; `?` arrives shifted on most layouts
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers & !KeyModifiers::SHIFT,
            _ => event.modifiers,
        };
        self.key == event.code && self.modifiers == modifiers
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: KeyBinding,
    pub force_quit: KeyBinding,
    pub add: KeyBinding,
    pub edit: KeyBinding,
    pub delete: KeyBinding,
    pub search: KeyBinding,
    pub help: KeyBinding,
    pub up: KeyBinding,
    pub down: KeyBinding,
    /// Play Fill the Word on the selected material
    pub fill_word: KeyBinding,
    /// Play Say It Out Loud on the selected material
    pub say_aloud: KeyBinding,

    /// Leave a game for the material list
    pub back: KeyBinding,
    pub reveal: KeyBinding,
    pub previous: KeyBinding,
    pub next: KeyBinding,
    /// Continue after a round's result
    pub proceed: KeyBinding,
    pub restart: KeyBinding,

    /// Close the top dialog
    pub close: KeyBinding,
    /// Submit the top dialog
    pub submit: KeyBinding,
    /// Submit dialogs without text input
    pub confirm: KeyBinding,
    /// Switch form field
    pub next_field: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(KeyCode::Char('q'), KeyModifiers::NONE, "q", "Quit"),
            force_quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Ctrl+C", "Quit"),
            add: KeyBinding::new(KeyCode::Char('a'), KeyModifiers::NONE, "a", "Add material"),
            edit: KeyBinding::new(KeyCode::Char('e'), KeyModifiers::NONE, "e", "Edit selected"),
            delete: KeyBinding::new(KeyCode::Char('d'), KeyModifiers::NONE, "d", "Delete selected"),
            search: KeyBinding::new(KeyCode::Char('/'), KeyModifiers::NONE, "/", "Search"),
            help: KeyBinding::new(KeyCode::Char('?'), KeyModifiers::NONE, "?", "Show help"),
            up: KeyBinding::new(KeyCode::Up, KeyModifiers::NONE, "↑", "Previous material"),
            down: KeyBinding::new(KeyCode::Down, KeyModifiers::NONE, "↓", "Next material"),
            fill_word: KeyBinding::new(KeyCode::Char('f'), KeyModifiers::NONE, "f", "Fill the word"),
            say_aloud: KeyBinding::new(KeyCode::Char('s'), KeyModifiers::NONE, "s", "Say it out loud"),
            back: KeyBinding::new(KeyCode::Esc, KeyModifiers::NONE, "Esc", "Back to materials"),
            reveal: KeyBinding::new(KeyCode::Char(' '), KeyModifiers::NONE, "Space", "Reveal sentence"),
            previous: KeyBinding::new(KeyCode::Left, KeyModifiers::NONE, "←", "Previous sentence"),
            next: KeyBinding::new(KeyCode::Right, KeyModifiers::NONE, "→", "Next sentence"),
            proceed: KeyBinding::new(KeyCode::Enter, KeyModifiers::NONE, "Enter", "Continue"),
            restart: KeyBinding::new(KeyCode::Char('r'), KeyModifiers::NONE, "r", "Play again"),
            close: KeyBinding::new(KeyCode::Esc, KeyModifiers::NONE, "Esc", "Close dialog"),
            submit: KeyBinding::new(KeyCode::Char('s'), KeyModifiers::CONTROL, "Ctrl+S", "Submit dialog"),
            confirm: KeyBinding::new(KeyCode::Enter, KeyModifiers::NONE, "Enter", "Confirm dialog"),
            next_field: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE, "Tab", "Switch field"),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event) || self.force_quit.matches(event)
    }

    fn list_bindings(&self) -> [&KeyBinding; 10] {
        [
            &self.add,
            &self.edit,
            &self.delete,
            &self.search,
            &self.fill_word,
            &self.say_aloud,
            &self.up,
            &self.down,
            &self.help,
            &self.quit,
        ]
    }

    fn dialog_bindings(&self) -> [&KeyBinding; 4] {
        [&self.close, &self.submit, &self.confirm, &self.next_field]
    }

    fn game_bindings(&self) -> [&KeyBinding; 6] {
        [
            &self.proceed,
            &self.restart,
            &self.reveal,
            &self.previous,
            &self.next,
            &self.back,
        ]
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        let format = |bindings: &[&KeyBinding]| {
            bindings
                .iter()
                .map(|b| format!("  {:<8} {}", b.label, b.description))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!(
            "Materials\n{}\n\nDialogs\n{}\n\nGames\n  {:<8} Pick a word\n{}",
            format(&self.list_bindings()[..]),
            format(&self.dialog_bindings()[..]),
            "1-9",
            format(&self.game_bindings()[..])
        )
    }

    /// One-line hint for the status bar
    pub fn status_hint(&self) -> String {
        self.list_bindings()
            .iter()
            .filter(|b| !matches!(b.key, KeyCode::Up | KeyCode::Down))
            .map(|b| format!("{} {}", b.label, b.description.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}
