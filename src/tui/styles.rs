use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,
    pub accent: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,
    pub backdrop: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Status colors
    pub error: Color,
    pub info: Color,
    pub success: Color,

    pub placeholder: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(147, 51, 234),   // Purple
            accent: Color::Rgb(236, 72, 153),    // Pink

            text: Color::Rgb(248, 250, 252),       // Slate-50
            text_dim: Color::Rgb(148, 163, 184),   // Slate-400
            text_bright: Color::Rgb(255, 255, 255), // White

            background: Color::Rgb(15, 23, 42),     // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800
            backdrop: Color::Rgb(8, 12, 24),

            border: Color::Rgb(71, 85, 105),          // Slate-600
            border_focused: Color::Rgb(147, 51, 234), // Purple

            error: Color::Rgb(239, 68, 68), // Red-500
            info: Color::Rgb(59, 130, 246), // Blue-500
            success: Color::Rgb(34, 197, 94), // Green-500

            placeholder: Color::Rgb(100, 116, 139), // Slate-500
            selection: Color::Rgb(30, 58, 138),     // Blue-900
        }
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    /// Style for placeholder text
    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder)
            .add_modifier(Modifier::ITALIC)
    }

    /// Dimmed area behind a dialog; keeps the symbols, mutes the colors
    pub fn backdrop_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .bg(self.backdrop)
            .add_modifier(Modifier::DIM)
    }

    /// Dialog box body
    pub fn dialog_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    /// Dialog box while entering or exiting
    pub fn dialog_transition_style(&self) -> Style {
        self.dialog_style().fg(self.text_dim).add_modifier(Modifier::DIM)
    }

    pub fn dialog_title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn close_button_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn submit_button_style(&self, busy: bool) -> Style {
        if busy {
            Style::default().fg(self.text_dim).bg(self.background)
        } else {
            Style::default()
                .fg(self.text_bright)
                .bg(self.primary)
                .add_modifier(Modifier::BOLD)
        }
    }

    /// Inline error banner and field errors
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    /// Blank waiting for the next pick
    pub fn current_blank_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }
}
