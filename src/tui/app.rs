use super::dialog::AppDialog;
use super::events::Event;
use super::form::{FormSubmit, SharedForm};
use super::keys::KeyMap;
use super::practice::Screen;
use super::render::render_dialogs;
use super::styles::Theme;
use super::Frame;
use crate::config::Config;
use crate::dialogs::{
    DialogError, DialogGesture, DialogId, DialogManager, DialogOptions, DialogView, DialogWidth,
    LayerManager, SubmitSpec,
};
use crate::materials::{MaterialForm, MaterialPatch, MaterialRepository, NewMaterial, RevisionMaterial};
use crate::quiz::{FillWordGame, SayAloudGame};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Rows above the material list
const HEADER_HEIGHT: u16 = 3;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Modal dialogs shown over the list
    pub dialogs: DialogManager<AppDialog>,

    /// Dialog layers from the last draw, for mouse hit-testing
    layers: LayerManager,

    repository: MaterialRepository,

    /// Materials matching the current search
    materials: Vec<RevisionMaterial>,
    selected: usize,
    query: String,
    searching: bool,

    /// List area from the last draw
    list_area: Rect,

    /// Material list or a running practice game
    screen: Screen,
    rng: StdRng,

    mouse_enabled: bool,

    /// Event sender for internal communication
    event_sender: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Create a new application instance
    pub fn new(
        config: &Config,
        repository: MaterialRepository,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Result<Self> {
        let mut app = Self {
            should_quit: false,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            status_message: None,
            dialogs: DialogManager::new(config.dialogs),
            layers: LayerManager::new(),
            repository,
            materials: Vec::new(),
            selected: 0,
            query: String::new(),
            searching: false,
            list_area: Rect::default(),
            screen: Screen::default(),
            rng: StdRng::from_entropy(),
            mouse_enabled: config.mouse_enabled,
            event_sender,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Materials currently listed
    pub fn materials(&self) -> &[RevisionMaterial] {
        &self.materials
    }

    pub fn selected_material(&self) -> Option<&RevisionMaterial> {
        self.materials.get(self.selected)
    }

    /// Reload the list from the repository using the current search
    pub fn refresh(&mut self) -> Result<()> {
        self.materials = self.repository.search(&self.query)?;
        if self.selected >= self.materials.len() {
            self.selected = self.materials.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Handle incoming events; returns true when the app should exit
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event)?,

            Event::Mouse(mouse_event) => {
                if self.mouse_enabled {
                    self.handle_mouse_event(mouse_event);
                }
            }

            Event::Resize(_, _) | Event::Tick => {}

            Event::Dialog(dialog_event) => {
                trace!(?dialog_event, "Dialog event");
            }

            Event::MaterialSubmitted {
                dialog,
                editing,
                data,
            } => {
                debug!(dialog = %dialog, "Material form submitted");
                self.save_material(editing, data)?;
            }

            Event::DeleteConfirmed(id) => {
                if self.repository.delete(&id)? {
                    info!(id = %id, "Material deleted");
                    self.status_message = Some("Material deleted".to_string());
                }
                self.refresh()?;
            }

            Event::StatusMessage(message) => {
                self.status_message = Some(message);
            }
        }

        Ok(self.should_quit)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.key_map.force_quit.matches(&key) {
            self.should_quit = true;
            return Ok(());
        }

        // Keys belong to the top dialog while any is on screen
        if let Some(top) = self.dialogs.snapshot().pop() {
            self.handle_dialog_key(top, key);
            return Ok(());
        }

        if !self.screen.is_list() {
            self.handle_game_key(key);
            return Ok(());
        }

        if self.searching {
            return self.handle_search_key(key);
        }

        let keys = &self.key_map;
        if keys.should_quit(&key) {
            self.should_quit = true;
        } else if keys.add.matches(&key) {
            self.open_form(None);
        } else if keys.edit.matches(&key) {
            if let Some(material) = self.selected_material().cloned() {
                self.open_form(Some(material));
            }
        } else if keys.delete.matches(&key) {
            if let Some(material) = self.selected_material().cloned() {
                self.confirm_delete(material);
            }
        } else if keys.search.matches(&key) {
            self.searching = true;
        } else if keys.help.matches(&key) {
            self.show_help();
        } else if keys.fill_word.matches(&key) {
            self.play_fill_word();
        } else if keys.say_aloud.matches(&key) {
            self.play_say_aloud();
        } else if keys.up.matches(&key) {
            self.selected = self.selected.saturating_sub(1);
        } else if keys.down.matches(&key) {
            if self.selected + 1 < self.materials.len() {
                self.selected += 1;
            }
        }

        Ok(())
    }

    fn handle_game_key(&mut self, key: KeyEvent) {
        let keys = &self.key_map;
        if keys.back.matches(&key) || keys.quit.matches(&key) {
            debug!("Leaving practice game");
            self.screen = Screen::List;
        } else if keys.help.matches(&key) {
            self.show_help();
        } else if !self.screen.handle_key(keys, key, &mut self.rng) {
            trace!(?key, "Key ignored by game");
        }
    }

    /// Start Fill the Word on the selected material
    pub fn play_fill_word(&mut self) {
        let Some(material) = self.selected_material().cloned() else {
            return;
        };
        let game = FillWordGame::new(&material, &mut self.rng);
        if game.is_empty() {
            self.status_message = Some(format!(
                "\"{}\" has no lines with more than one word",
                material.name
            ));
            return;
        }
        info!(id = %material.id, lines = game.progress().1, "Starting Fill the Word");
        self.status_message = None;
        self.screen = Screen::FillWord(game);
    }

    /// Start Say It Out Loud on the selected material
    pub fn play_say_aloud(&mut self) {
        let Some(material) = self.selected_material().cloned() else {
            return;
        };
        let game = SayAloudGame::new(&material);
        if game.is_empty() {
            self.status_message = Some(format!("\"{}\" has no sentences", material.name));
            return;
        }
        info!(id = %material.id, sentences = game.position().1, "Starting Say It Out Loud");
        self.status_message = None;
        self.screen = Screen::SayAloud(game);
    }

    fn handle_dialog_key(&mut self, top: DialogView<AppDialog>, key: KeyEvent) {
        let keys = &self.key_map;

        if keys.close.matches(&key) {
            self.dialogs.handle_gesture(top.id, DialogGesture::CloseButton);
            return;
        }

        let submit = keys.submit.matches(&key)
            || (!top.content.has_text_input() && keys.confirm.matches(&key));
        if submit {
            let gesture = if top.has_submit() {
                DialogGesture::SubmitButton
            } else {
                DialogGesture::CloseButton
            };
            self.dialogs.handle_gesture(top.id, gesture);
            return;
        }

        if let AppDialog::Form(form) = &top.content {
            if top.is_busy() || top.settlement.is_settled() {
                return;
            }
            let mut form = form.lock();
            if keys.next_field.matches(&key) {
                form.toggle_focus();
            } else {
                form.input(key);
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.searching = false;
                self.query.clear();
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Char(c) => self.query.push(c),
            _ => return Ok(()),
        }
        self.refresh()
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((id, gesture)) = self.layers.hit_test(mouse.column, mouse.row) {
                    let outcome = self.dialogs.handle_gesture(id, gesture);
                    trace!(dialog = %id, ?gesture, ?outcome, "Pointer gesture");
                } else if self.dialogs.is_empty() {
                    if self.screen.is_list() {
                        self.select_at(mouse.row);
                    } else {
                        self.screen.hold_reveal(true);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.screen.hold_reveal(false),
            MouseEventKind::ScrollUp if self.dialogs.is_empty() && self.screen.is_list() => {
                self.selected = self.selected.saturating_sub(1);
            }
            MouseEventKind::ScrollDown if self.dialogs.is_empty() && self.screen.is_list() => {
                if self.selected + 1 < self.materials.len() {
                    self.selected += 1;
                }
            }
            _ => {}
        }
    }

    fn select_at(&mut self, row: u16) {
        let top = self.list_area.y + 1;
        if row < top || row >= self.list_area.y + self.list_area.height.saturating_sub(1) {
            return;
        }
        let index = usize::from(row - top);
        if index < self.materials.len() {
            self.selected = index;
        }
    }

    /// Open the add form, or the edit form prefilled from `editing`
    pub fn open_form(&mut self, editing: Option<RevisionMaterial>) -> DialogId {
        let form = editing
            .as_ref()
            .map(MaterialForm::from_material)
            .unwrap_or_default();
        let shared = SharedForm::new(form);
        let (title, label) = match &editing {
            Some(material) => (format!("Edit {}", material.name), "Save changes"),
            None => ("Add material".to_string(), "Add"),
        };

        let options = DialogOptions::new(title, AppDialog::Form(shared.clone()))
            .with_submit(SubmitSpec::new(label, FormSubmit::new(shared)))
            .with_width(DialogWidth::Large)
            .with_icon("✎");
        let handle = self.dialogs.open(options);
        let dialog = handle.id();

        let sender = self.event_sender.clone();
        let editing = editing.map(|material| material.id);
        tokio::spawn(async move {
            match handle.await {
                Ok(data) => {
                    let _ = sender.send(Event::MaterialSubmitted {
                        dialog,
                        editing,
                        data,
                    });
                }
                Err(e) => report_dialog_error(&sender, dialog, "Material form", e),
            }
        });
        dialog
    }

    /// Ask before deleting `material`
    pub fn confirm_delete(&mut self, material: RevisionMaterial) -> DialogId {
        let options = DialogOptions::new(
            "Delete material",
            AppDialog::confirm(format!(
                "Delete \"{}\"? This cannot be undone.",
                material.name
            )),
        )
        .with_submit(SubmitSpec::from_fns(
            "Delete",
            || async { Ok(()) },
            || async { Ok(true) },
        ))
        .with_icon("!");
        let handle = self.dialogs.open(options);
        let dialog = handle.id();

        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            match handle.await {
                Ok(true) => {
                    let _ = sender.send(Event::DeleteConfirmed(material.id));
                }
                Ok(false) => {}
                Err(e) => report_dialog_error(&sender, dialog, "Delete confirmation", e),
            }
        });
        dialog
    }

    /// Show the key reference; nobody waits on its outcome
    pub fn show_help(&mut self) -> DialogId {
        let options: DialogOptions<AppDialog, ()> =
            DialogOptions::new("Keyboard shortcuts", AppDialog::message(self.key_map.help_text()))
                .with_icon("?");
        self.dialogs.open_detached(options)
    }

    fn save_material(&mut self, editing: Option<String>, data: NewMaterial) -> Result<()> {
        match editing {
            Some(id) => match self.repository.update(&id, &MaterialPatch::from(data))? {
                Some(material) => {
                    info!(id = %material.id, "Material updated");
                    self.status_message = Some(format!("Updated \"{}\"", material.name));
                }
                None => {
                    warn!(id = %id, "Edited material no longer exists");
                    self.status_message = Some("Material no longer exists".to_string());
                }
            },
            None => {
                let material = self.repository.create(&data)?;
                info!(id = %material.id, "Material created");
                self.status_message = Some(format!("Added \"{}\"", material.name));
            }
        }
        self.refresh()
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        frame.render_widget(Block::default().style(self.theme.base_style()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        if self.screen.is_list() {
            self.render_list(frame, chunks[1]);
        } else {
            self.screen.render(frame, chunks[1], &self.theme);
        }
        self.render_status_bar(frame, chunks[2]);

        let views = self.dialogs.snapshot();
        render_dialogs(frame, area, &views, &self.theme, &mut self.layers);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = self
            .screen
            .title()
            .unwrap_or_else(|| format!("Revision materials ({})", self.materials.len()));
        let mut spans = vec![Span::styled(format!(" {} ", title), self.theme.dialog_title_style())];
        if self.screen.is_list() && (self.searching || !self.query.is_empty()) {
            spans.push(Span::styled(
                format!(" /{}{}", self.query, if self.searching { "_" } else { "" }),
                self.theme.info_style(),
            ));
        }
        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border_style()),
        );
        frame.render_widget(header, area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        self.list_area = area;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        if self.materials.is_empty() {
            let text = if self.query.is_empty() {
                "No materials yet. Press a to add one."
            } else {
                "No materials match your search."
            };
            frame.render_widget(
                Paragraph::new(text).style(self.theme.dim_style()).block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .materials
            .iter()
            .map(|material| {
                ListItem::new(Line::from(vec![
                    Span::styled(material.name.clone(), self.theme.text_style()),
                    Span::styled(
                        format!("  {} words", material.word_count()),
                        self.theme.dim_style(),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.selection_style())
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = match &self.status_message {
            Some(message) => format!(" {}", message),
            None => format!(" {}", self.screen.status_hint(&self.key_map)),
        };
        frame.render_widget(
            Paragraph::new(text).style(self.theme.status_bar_style()),
            area,
        );
    }
}

/// Log a dialog that ended without a value. Anything but a plain close is
/// also shown in the status bar.
fn report_dialog_error(
    sender: &mpsc::UnboundedSender<Event>,
    dialog: DialogId,
    what: &str,
    error: DialogError,
) {
    if error.is_cancelled() {
        debug!(dialog = %dialog, "{} dismissed", what);
        return;
    }
    warn!(dialog = %dialog, "{} failed: {}", what, error);
    let _ = sender.send(Event::StatusMessage(format!(
        "{} failed: {}",
        what,
        error.banner_message()
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::GestureOutcome;
    use crate::materials::form::FORM_ERROR_MESSAGE;
    use crate::materials::Database;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn test_app() -> (App, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let repository = MaterialRepository::new(Database::in_memory().unwrap());
        let app = App::new(&Config::default(), repository, tx).unwrap();
        (app, rx)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("no event delivered")
            .expect("channel closed")
    }

    async fn settle_time() {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_material_through_form_dialog() {
        let (mut app, mut rx) = test_app();

        app.handle_event(key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.dialogs.len(), 1);

        // 'q' types into the form instead of quitting
        type_text(&mut app, "quantum");
        assert!(!app.should_quit);
        app.handle_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "Particles behave like waves.");

        app.handle_event(ctrl('s')).unwrap();
        let event = next_event(&mut rx).await;
        assert!(matches!(event, Event::MaterialSubmitted { editing: None, .. }));
        app.handle_event(event).unwrap();

        assert_eq!(app.materials().len(), 1);
        assert_eq!(app.materials()[0].name, "quantum");
        settle_time().await;
        assert!(app.dialogs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_keeps_dialog_open_with_error() {
        let (mut app, _rx) = test_app();
        let id = app.open_form(None);
        tokio::time::sleep(Duration::from_millis(20)).await;

        type_text(&mut app, "X");
        app.handle_event(ctrl('s')).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        let view = app.dialogs.view(id).unwrap();
        assert_eq!(view.error.as_deref(), Some(FORM_ERROR_MESSAGE));
        assert!(!view.settlement.is_settled());

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(app.dialogs.view(id).unwrap().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_prefills_and_updates() {
        let (mut app, mut rx) = test_app();
        app.repository
            .create(&NewMaterial {
                name: "Chem".into(),
                extract: "Acids donate protons.".into(),
            })
            .unwrap();
        app.refresh().unwrap();

        app.handle_event(key(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, "istry");
        app.handle_event(ctrl('s')).unwrap();

        let event = next_event(&mut rx).await;
        app.handle_event(event).unwrap();
        assert_eq!(app.materials()[0].name, "Chemistry");
        assert_eq!(app.materials()[0].extract, "Acids donate protons.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_requires_confirmation() {
        let (mut app, mut rx) = test_app();
        app.repository
            .create(&NewMaterial {
                name: "Art".into(),
                extract: "Impressionism began in France.".into(),
            })
            .unwrap();
        app.refresh().unwrap();

        // Cancelled confirmation leaves the material alone
        app.handle_event(key(KeyCode::Char('d'))).unwrap();
        app.handle_event(key(KeyCode::Esc)).unwrap();
        settle_time().await;
        assert!(app.dialogs.is_empty());
        assert!(rx.try_recv().is_err());
        assert_eq!(app.materials().len(), 1);

        app.handle_event(key(KeyCode::Char('d'))).unwrap();
        app.handle_event(key(KeyCode::Enter)).unwrap();
        let event = next_event(&mut rx).await;
        assert!(matches!(event, Event::DeleteConfirmed(_)));
        app.handle_event(event).unwrap();
        assert!(app.materials().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_over_form_only_top_takes_input() {
        let (mut app, _rx) = test_app();
        let form = app.open_form(None);
        let help = app.show_help();
        assert_eq!(app.dialogs.top_id(), Some(help));

        // Gestures on the covered form are inert
        assert_eq!(
            app.dialogs.handle_gesture(form, DialogGesture::CloseButton),
            GestureOutcome::Ignored
        );

        app.handle_event(key(KeyCode::Esc)).unwrap();
        settle_time().await;
        assert_eq!(app.dialogs.dialog_ids(), vec![form]);

        app.handle_event(key(KeyCode::Esc)).unwrap();
        settle_time().await;
        assert!(app.dialogs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_backdrop_closes_top_dialog() {
        let (mut app, _rx) = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let handle_id = app.confirm_delete(RevisionMaterial::create(&NewMaterial {
            name: "Tmp".into(),
            extract: "temporary text".into(),
        }));
        terminal.draw(|frame| app.render(frame)).unwrap();

        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };

        // Body clicks do nothing
        let body = app.layers.topmost_layer().unwrap().layout.content_area;
        app.handle_event(click(body.x, body.y)).unwrap();
        assert!(!app.dialogs.view(handle_id).unwrap().settlement.is_settled());

        app.handle_event(click(0, 0)).unwrap();
        assert!(app.dialogs.view(handle_id).unwrap().settlement.is_settled());
        settle_time().await;
        assert!(app.dialogs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_filters_list() {
        let (mut app, _rx) = test_app();
        for (name, extract) in [("Maths", "Pythagoras theorem"), ("Music", "Bach wrote fugues")] {
            app.repository
                .create(&NewMaterial {
                    name: name.into(),
                    extract: extract.into(),
                })
                .unwrap();
        }
        app.refresh().unwrap();

        app.handle_event(key(KeyCode::Char('/'))).unwrap();
        type_text(&mut app, "bach");
        app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.materials().len(), 1);
        assert_eq!(app.materials()[0].name, "Music");

        app.handle_event(key(KeyCode::Char('/'))).unwrap();
        app.handle_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.materials().len(), 2);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _rx) = test_app();
        assert!(app.handle_event(key(KeyCode::Char('q'))).unwrap());

        let (mut app, _rx) = test_app();
        app.show_help();
        assert!(app.handle_event(ctrl('c')).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_dialog_failure_reaches_status_bar() {
        let (mut app, mut rx) = test_app();
        let id = app.open_form(None);
        app.dialogs.resolve(42u32, Some(id));

        let event = next_event(&mut rx).await;
        assert!(matches!(&event, Event::StatusMessage(message) if message.starts_with("Material form failed")));
        app.handle_event(event).unwrap();
        assert!(app.status_message.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_a_dialog_is_not_reported() {
        let (mut app, mut rx) = test_app();
        app.open_form(None);
        app.dialogs.close(None);
        settle_time().await;
        assert!(rx.try_recv().is_err());
        assert!(app.status_message.is_none());
    }

    fn add_material(app: &mut App, name: &str, extract: &str) {
        app.repository
            .create(&NewMaterial {
                name: name.into(),
                extract: extract.into(),
            })
            .unwrap();
        app.refresh().unwrap();
    }

    #[tokio::test]
    async fn test_say_aloud_opens_on_selected_material() {
        let (mut app, _rx) = test_app();
        add_material(&mut app, "Physics", "Light travels very fast indeed. Sound is slower.");

        app.handle_event(key(KeyCode::Char('s'))).unwrap();
        assert!(matches!(app.screen, Screen::SayAloud(_)));

        // list keys do nothing inside a game
        app.handle_event(key(KeyCode::Char('a'))).unwrap();
        assert!(app.dialogs.is_empty());
        app.handle_event(key(KeyCode::Right)).unwrap();
        let Screen::SayAloud(game) = &app.screen else { unreachable!() };
        assert_eq!(game.position(), (2, 2));

        app.handle_event(key(KeyCode::Char('q'))).unwrap();
        assert!(app.screen.is_list());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_fill_word_needs_multi_word_lines() {
        let (mut app, _rx) = test_app();
        add_material(&mut app, "Vocab", "Photosynthesis\nChlorophyll");

        app.handle_event(key(KeyCode::Char('f'))).unwrap();
        assert!(app.screen.is_list());
        assert_eq!(
            app.status_message.as_deref(),
            Some("\"Vocab\" has no lines with more than one word")
        );
    }

    #[tokio::test]
    async fn test_fill_word_screen_renders_and_takes_help() {
        let (mut app, _rx) = test_app();
        add_material(&mut app, "Bio", "Cells are the basic unit of life");

        app.handle_event(key(KeyCode::Char('f'))).unwrap();
        assert!(matches!(app.screen, Screen::FillWord(_)));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Fill the Word · Bio"));
        assert!(text.contains("lines completed"));

        app.handle_event(key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.dialogs.len(), 1);
        app.handle_event(key(KeyCode::Esc)).unwrap();
        assert!(matches!(app.screen, Screen::FillWord(_)));
    }

    #[tokio::test]
    async fn test_holding_the_pointer_reveals_the_sentence() {
        let (mut app, _rx) = test_app();
        add_material(&mut app, "Geo", "Rivers carve deep valleys over time.");
        app.handle_event(key(KeyCode::Char('s'))).unwrap();

        let pointer = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 10,
                row: 10,
                modifiers: KeyModifiers::NONE,
            })
        };
        app.handle_event(pointer(MouseEventKind::Down(MouseButton::Left))).unwrap();
        let Screen::SayAloud(game) = &app.screen else { unreachable!() };
        assert!(game.is_revealing());

        app.handle_event(pointer(MouseEventKind::Up(MouseButton::Left))).unwrap();
        let Screen::SayAloud(game) = &app.screen else { unreachable!() };
        assert!(!game.is_revealing());
    }
}
