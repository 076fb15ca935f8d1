//! Practice game screens
//!
//! A game takes over the main area until the player goes back to the list.
//! Dialogs, such as help, still open on top of it.

use super::keys::{KeyBinding, KeyMap};
use super::styles::Theme;
use super::Frame;
use crate::quiz::{fill_word::BLANK, Feedback, FillWordGame, Pick, SayAloudGame, Slot};
use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use tracing::debug;

/// What fills the main area
#[derive(Debug, Clone, Default)]
pub enum Screen {
    #[default]
    List,
    FillWord(FillWordGame),
    SayAloud(SayAloudGame),
}

impl Screen {
    pub fn is_list(&self) -> bool {
        matches!(self, Screen::List)
    }

    /// Header text for a game screen
    pub fn title(&self) -> Option<String> {
        match self {
            Screen::List => None,
            Screen::FillWord(game) => Some(format!("Fill the Word · {}", game.title())),
            Screen::SayAloud(game) => Some(format!("Say It Out Loud · {}", game.title())),
        }
    }

    /// Apply a key to the running game. Returns false if the key means nothing here.
    pub fn handle_key<R: Rng + ?Sized>(&mut self, keys: &KeyMap, key: KeyEvent, rng: &mut R) -> bool {
        match self {
            Screen::List => false,
            Screen::FillWord(game) => {
                if game.is_finished() {
                    if keys.restart.matches(&key) {
                        game.restart(rng);
                        return true;
                    }
                    return false;
                }
                if game.feedback().is_some() {
                    return (keys.proceed.matches(&key) || keys.reveal.matches(&key)) && game.proceed(rng);
                }
                match key.code {
                    KeyCode::Char(digit @ '1'..='9') => {
                        let index = digit as usize - '1' as usize;
                        let pick = game.choose(index);
                        debug!(index, ?pick, "Word picked");
                        pick != Pick::Ignored
                    }
                    _ => false,
                }
            }
            Screen::SayAloud(game) => {
                if keys.reveal.matches(&key) {
                    game.toggle_reveal();
                    true
                } else if keys.previous.matches(&key) {
                    game.previous()
                } else if keys.next.matches(&key) {
                    game.next()
                } else {
                    false
                }
            }
        }
    }

    /// Pointer held down or released over a Say It Out Loud screen
    pub fn hold_reveal(&mut self, held: bool) {
        if let Screen::SayAloud(game) = self {
            game.set_revealing(held);
        }
    }

    pub fn status_hint(&self, keys: &KeyMap) -> String {
        match self {
            Screen::List => keys.status_hint(),
            Screen::FillWord(game) if game.is_finished() => hint(&[&keys.restart, &keys.back]),
            Screen::FillWord(game) if game.feedback().is_some() => hint(&[&keys.proceed, &keys.back]),
            Screen::FillWord(_) => format!("1-9 pick a word · {}", hint(&[&keys.back])),
            Screen::SayAloud(_) => hint(&[&keys.reveal, &keys.previous, &keys.next, &keys.back]),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        match self {
            Screen::List => {}
            Screen::FillWord(game) => render_fill_word(frame, game, area, theme),
            Screen::SayAloud(game) => render_say_aloud(frame, game, area, theme),
        }
    }
}

fn hint(bindings: &[&KeyBinding]) -> String {
    bindings
        .iter()
        .map(|b| format!("{} {}", b.label, b.description.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn panel(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
}

fn progress_gauge(label: String, ratio: f64, theme: &Theme) -> Gauge<'static> {
    Gauge::default()
        .block(panel(theme))
        .gauge_style(theme.info_style())
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label)
}

fn ratio(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64
    }
}

fn render_fill_word(frame: &mut Frame, game: &FillWordGame, area: Rect, theme: &Theme) {
    if game.is_empty() {
        let text = "This material has no lines with more than one word.";
        frame.render_widget(Paragraph::new(text).style(theme.dim_style()).block(panel(theme)), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    let (completed, total) = game.progress();
    frame.render_widget(
        progress_gauge(
            format!("{} / {} lines completed", completed, total),
            ratio(completed, total),
            theme,
        ),
        chunks[0],
    );

    if game.is_finished() {
        let text = vec![
            Line::from(Span::styled("Congratulations!", theme.success_style())),
            Line::from(format!(
                "You've completed all {} lines in \"{}\"",
                total,
                game.title()
            )),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(panel(theme)),
            chunks[1],
        );
        return;
    }

    let Some(line) = game.current_line() else {
        return;
    };

    let mut text = Vec::new();
    if game.feedback() == Some(Feedback::Incorrect) {
        text.push(Line::from(Span::styled(line.text(), theme.text_style())));
    } else {
        let mut spans = Vec::new();
        for (i, slot) in game.slots().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(match slot {
                Slot::Word(word) => Span::styled(word.to_string(), theme.text_style()),
                Slot::Filled(word) => Span::styled(word.to_string(), theme.success_style()),
                Slot::Current => Span::styled(BLANK, theme.current_blank_style()),
                Slot::Blank => Span::styled(BLANK, theme.dim_style()),
            });
        }
        text.push(Line::from(spans));
    }
    text.push(Line::raw(""));
    let difficulty = line.difficulty();
    text.push(Line::from(Span::styled(
        format!(
            "Difficulty: {} word{} removed · level {} / {}",
            difficulty,
            if difficulty > 1 { "s" } else { "" },
            difficulty,
            line.max_difficulty()
        ),
        theme.dim_style(),
    )));
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(panel(theme).title(" Fill in the blanks ")),
        chunks[1],
    );

    let bottom = match game.feedback() {
        Some(Feedback::Correct) => vec![Line::from(Span::styled(
            "Correct! Press Enter to continue.",
            theme.success_style(),
        ))],
        Some(Feedback::Incorrect) => vec![Line::from(Span::styled(
            "Not quite. Read the full line, then press Enter to try again.",
            theme.error_style(),
        ))],
        None => {
            let (filled, blanks) = game.blank_progress();
            let options: Vec<Span> = game
                .options()
                .iter()
                .enumerate()
                .flat_map(|(i, word)| {
                    [
                        Span::styled(format!("[{}] ", i + 1), theme.info_style()),
                        Span::styled(format!("{}   ", word), theme.text_style()),
                    ]
                })
                .collect();
            vec![
                Line::from(Span::styled(
                    format!("Select word {} of {}", filled + 1, blanks),
                    theme.dim_style(),
                )),
                Line::from(options),
            ]
        }
    };
    frame.render_widget(
        Paragraph::new(bottom).wrap(Wrap { trim: true }).block(panel(theme)),
        chunks[2],
    );
}

fn render_say_aloud(frame: &mut Frame, game: &SayAloudGame, area: Rect, theme: &Theme) {
    let Some(sentence) = game.current() else {
        let text = "This material has no sentences to practise.";
        frame.render_widget(Paragraph::new(text).style(theme.dim_style()).block(panel(theme)), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let (position, total) = game.position();
    frame.render_widget(
        progress_gauge(
            format!("Sentence {} of {}", position, total),
            ratio(position, total),
            theme,
        ),
        chunks[0],
    );

    let mut spans = vec![Span::styled(sentence.visible().join(" "), theme.text_style())];
    for word in sentence.hidden() {
        spans.push(Span::raw(" "));
        if game.is_revealing() {
            spans.push(Span::styled(word.clone(), theme.text_style()));
        } else {
            spans.push(Span::styled("░".repeat(word.chars().count()), theme.dim_style()));
        }
    }
    let reveal = if game.is_revealing() {
        Line::from(Span::styled("Showing full text", theme.info_style()))
    } else {
        Line::from(Span::styled("Hold the mouse button or press Space to reveal", theme.dim_style()))
    };
    let text = vec![
        Line::from(Span::styled("Say this sentence out loud:", theme.dim_style())),
        Line::raw(""),
        Line::from(spans),
        Line::raw(""),
        reveal,
    ];
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(panel(theme)),
        chunks[1],
    );

    let nav_style = |enabled: bool| {
        if enabled {
            theme.text_style()
        } else {
            theme.dim_style()
        }
    };
    let nav = Line::from(vec![
        Span::styled("← Previous", nav_style(game.has_previous())),
        Span::raw(format!("   {} / {}   ", position, total)),
        Span::styled("Next →", nav_style(game.has_next())),
    ]);
    frame.render_widget(
        Paragraph::new(nav).alignment(Alignment::Center).block(panel(theme)),
        chunks[2],
    );
}
