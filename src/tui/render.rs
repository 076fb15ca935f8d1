//! Drawing the dialog stack
//!
//! Every entry is drawn in stack order so lower dialogs stay visible behind
//! the top one. The layers recorded here drive mouse hit-testing.

use super::dialog::{AppDialog, FORM_ERROR_HEIGHT, FORM_NAME_HEIGHT};
use super::form::{FormField, FormView};
use super::styles::Theme;
use super::Frame;
use crate::dialogs::{DialogLayer, DialogLayout, DialogView, LayerManager, Visibility};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Draw all dialogs over `area` and record their layers
pub fn render_dialogs(
    frame: &mut Frame,
    area: Rect,
    views: &[DialogView<AppDialog>],
    theme: &Theme,
    layers: &mut LayerManager,
) {
    layers.clear();
    for view in views {
        let inner_width = view.width.resolve(area.width.saturating_sub(2)).saturating_sub(2);
        let layout = DialogLayout::calculate(
            view.width,
            view.content.content_height(inner_width),
            view.has_submit(),
            area,
        );
        render_dialog(frame, view, &layout, theme);
        layers.add_layer(DialogLayer::new(view, layout));
    }
}

fn render_dialog(frame: &mut Frame, view: &DialogView<AppDialog>, layout: &DialogLayout, theme: &Theme) {
    frame.render_widget(Block::default().style(theme.backdrop_style()), layout.backdrop);
    frame.render_widget(Clear, layout.dialog_area);

    let transitioning = view.visibility() != Visibility::Visible;
    let body_style = if transitioning {
        theme.dialog_transition_style()
    } else {
        theme.dialog_style()
    };
    let border_style = if view.interactive && !transitioning {
        theme.focused_border_style()
    } else {
        theme.border_style()
    };

    let mut title = Vec::new();
    if let Some(icon) = &view.icon {
        title.push(Span::raw(format!(" {} ", icon)));
    }
    title.push(Span::styled(format!(" {} ", view.title), theme.dialog_title_style()));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title))
        .style(body_style);
    frame.render_widget(block, layout.dialog_area);

    frame.render_widget(
        Paragraph::new("[x]").style(theme.close_button_style()),
        layout.close_area,
    );

    render_content(frame, view, layout.content_area, theme);

    if let (Some(area), Some(error)) = (layout.banner_area, &view.error) {
        frame.render_widget(
            Paragraph::new(format!("⚠ {}", error)).style(theme.error_style()),
            area,
        );
    }

    if let (Some(area), Some(label)) = (layout.submit_area, &view.submit_label) {
        let busy = view.is_busy();
        let text = if busy { "Loading..." } else { label.as_str() };
        let button = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(theme.submit_button_style(busy))
            .block(Block::default().borders(Borders::ALL).border_style(theme.border_style()));
        frame.render_widget(button, area);
    }
}

fn render_content(frame: &mut Frame, view: &DialogView<AppDialog>, area: Rect, theme: &Theme) {
    match &view.content {
        AppDialog::Form(form) => {
            let mut form = form.lock();
            render_form(frame, &mut form, area, view.interactive, theme);
        }
        AppDialog::Confirm { message } => {
            frame.render_widget(
                Paragraph::new(message.as_str())
                    .wrap(Wrap { trim: false })
                    .style(theme.text_style()),
                area,
            );
        }
        AppDialog::Message { body } => {
            frame.render_widget(
                Paragraph::new(body.as_str()).wrap(Wrap { trim: false }),
                area,
            );
        }
    }
}

fn render_form(frame: &mut Frame, form: &mut FormView, area: Rect, interactive: bool, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORM_NAME_HEIGHT),
            Constraint::Length(FORM_ERROR_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(FORM_ERROR_HEIGHT),
        ])
        .split(area);

    let focus = form.focus;
    let field_style = |field: FormField| {
        if interactive && focus == field {
            theme.focused_border_style()
        } else {
            theme.border_style()
        }
    };
    let cursor_style = |field: FormField| {
        if interactive && focus == field {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        }
    };

    form.name.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title("Name")
            .border_style(field_style(FormField::Name)),
    );
    form.name.set_cursor_style(cursor_style(FormField::Name));
    form.name.set_placeholder_style(theme.placeholder_style());
    form.extract.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title("Content")
            .border_style(field_style(FormField::Extract)),
    );
    form.extract.set_cursor_style(cursor_style(FormField::Extract));
    form.extract.set_placeholder_style(theme.placeholder_style());

    frame.render_widget(form.name.widget(), chunks[0]);
    frame.render_widget(form.extract.widget(), chunks[2]);

    if let Some(error) = &form.form.errors.name {
        frame.render_widget(Paragraph::new(error.as_str()).style(theme.error_style()), chunks[1]);
    }
    if let Some(error) = &form.form.errors.extract {
        frame.render_widget(Paragraph::new(error.as_str()).style(theme.error_style()), chunks[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{DialogGesture, DialogId, DialogWidth, EntryPhase, SettlementState};
    use crate::materials::MaterialForm;
    use crate::tui::form::SharedForm;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn view(id: u64, content: AppDialog, submit: Option<&str>) -> DialogView<AppDialog> {
        DialogView {
            id: DialogId(id),
            title: format!("Dialog {}", id),
            content,
            submit_label: submit.map(String::from),
            width: DialogWidth::Small,
            icon: None,
            phase: EntryPhase::Visible,
            error: None,
            settlement: SettlementState::Pending,
            interactive: true,
        }
    }

    fn draw(views: &[DialogView<AppDialog>], layers: &mut LayerManager) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| render_dialogs(frame, frame.size(), views, &theme, layers))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }

    #[test]
    fn test_message_dialog_renders_chrome() {
        let mut layers = LayerManager::new();
        let lines = draw(&[view(1, AppDialog::message("Hello there"), None)], &mut layers);

        assert!(contains(&lines, "Dialog 1"));
        assert!(contains(&lines, "[x]"));
        assert!(contains(&lines, "Hello there"));
        assert_eq!(layers.layers().len(), 1);
    }

    #[test]
    fn test_busy_submit_shows_loading_and_banner() {
        let mut busy = view(1, AppDialog::confirm("Delete it?"), Some("Delete"));
        busy.phase = EntryPhase::Busy;
        let mut layers = LayerManager::new();
        let lines = draw(&[busy.clone()], &mut layers);
        assert!(contains(&lines, "Loading..."));

        busy.phase = EntryPhase::Visible;
        busy.error = Some("Please fix the errors in the form".into());
        let lines = draw(&[busy], &mut layers);
        assert!(contains(&lines, "Delete"));
        assert!(contains(&lines, "Please fix the errors in the form"));
    }

    #[test]
    fn test_stacked_dialogs_only_top_is_hit() {
        let mut lower = view(1, AppDialog::message("lower"), None);
        lower.interactive = false;
        lower.width = DialogWidth::Large;
        let upper = view(2, AppDialog::message("upper"), None);
        let mut layers = LayerManager::new();
        let lines = draw(&[lower, upper], &mut layers);

        assert!(contains(&lines, "Dialog 1"));
        assert!(contains(&lines, "upper"));
        assert_eq!(layers.layers().len(), 2);
        assert_eq!(layers.hit_test(0, 0), Some((DialogId(2), DialogGesture::BackdropClick)));
    }

    #[test]
    fn test_form_shows_field_errors() {
        let shared = SharedForm::new(MaterialForm::new());
        shared.lock().validate();
        let mut layers = LayerManager::new();
        let mut form = view(3, AppDialog::Form(shared), Some("Save"));
        form.width = DialogWidth::Large;
        let lines = draw(&[form], &mut layers);

        assert!(contains(&lines, "Name is required"));
        assert!(contains(&lines, "Content is required"));
        assert!(contains(&lines, "Save"));
    }
}
