use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use internal_link_config::Config;
use internal_link_engine::{
    CLASS_HIGHLIGHT, CaretDirection, Editor, EditorConfig, LinkCommand, ModelSelection, Position,
    UnlinkCommand,
    basics::SOFT_BREAK,
    link::{is_link_element, new_link_id},
    model::ModelElement,
    view::{ElementKind, ViewNodeData, ViewNodeId, ViewTree},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

struct App {
    path: PathBuf,
    editor: Editor,
    message: String,
    dirty: bool,
}

impl App {
    fn new(path: PathBuf, config: &EditorConfig) -> Result<Self> {
        let mut editor = Editor::new(config);
        let message = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            editor
                .set_data(&content)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            format!("Opened {}", path.display())
        } else {
            format!("New document {}", path.display())
        };

        Ok(Self {
            path,
            editor,
            message,
            dirty: false,
        })
    }

    fn save(&mut self) {
        match std::fs::write(&self.path, self.editor.get_data()) {
            Ok(()) => {
                self.dirty = false;
                self.message = format!("Saved {}", self.path.display());
            }
            Err(e) => {
                log::warn!("Saving {} failed: {e}", self.path.display());
                self.message = format!("Error saving file: {e}");
            }
        }
    }

    /// Run an editor operation, reporting failures in the status line.
    fn apply<T, E: std::fmt::Display>(
        &mut self,
        edit: bool,
        operation: impl FnOnce(&mut Editor) -> Result<T, E>,
    ) {
        match operation(&mut self.editor) {
            Ok(_) => {
                self.dirty |= edit;
                self.message.clear();
            }
            Err(e) => self.message = format!("Error: {e}"),
        }
    }

    /// Put the caret in the block above or below, at the same offset when it
    /// fits.
    fn move_block(&mut self, down: bool) {
        let focus = self.editor.model().selection().focus();
        let Some(block) = focus.block() else {
            return;
        };
        let target = if down {
            block + 1
        } else if let Some(above) = block.checked_sub(1) {
            above
        } else {
            return;
        };
        let Ok(element) = self.editor.model().element_at(&[target]) else {
            return;
        };
        let offset = focus.offset.min(element.max_offset());
        self.apply(false, |editor| {
            editor.set_selection(ModelSelection::collapsed(Position::in_block(target, offset)))
        });
    }

    fn insert_soft_break(&mut self) {
        let caret = self.editor.model().selection().first_position().clone();
        self.apply(true, |editor| {
            editor.insert_element(&caret, ModelElement::new(SOFT_BREAK))?;
            editor.set_selection(ModelSelection::collapsed(caret.with_offset(caret.offset + 1)))
        });
    }

    fn status_line(&self) -> String {
        let selection = self.editor.model().selection();
        let focus = selection.focus();
        let position = if selection.is_collapsed() {
            format!("block {} offset {}", focus.block().unwrap_or(0), focus.offset)
        } else {
            let range = selection.range();
            format!(
                "block {} offset {}..{}",
                focus.block().unwrap_or(0),
                range.start.offset,
                range.end.offset
            )
        };
        let link = match LinkCommand::value(&self.editor) {
            Some(id) => {
                let url = self.editor.link().url_for(id);
                format!(" | link {}", url.as_deref().unwrap_or(id))
            }
            None => String::new(),
        };
        let dirty = if self.dirty { " [modified]" } else { "" };

        format!(
            "{position} | {:?}{link}{dirty} {}",
            self.editor.caret_state(),
            self.message
        )
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    // Determine document path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let path = match args.len() {
        2 => PathBuf::from(&args[1]),
        1 => match config.default_document.clone() {
            Some(path) => path,
            None => {
                eprintln!("Error: No document provided and no default_document configured");
                eprintln!("Usage: {} <document.html>", args[0]);
                eprintln!("Or set default_document in {}", config_path.display());
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [document.html]", args[0]);
            process::exit(1);
        }
    };

    log::info!("Opening {}", path.display());
    let mut app = App::new(path, &config.link)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && !handle_key(app, key)
        {
            return Ok(());
        }
    }
}

/// Returns `false` when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('q') if control => return false,
        KeyCode::Char('s') if control => app.save(),
        KeyCode::Char('l') if control => {
            let id = new_link_id();
            app.apply(true, |editor| LinkCommand::execute(editor, &id));
        }
        KeyCode::Char('k') if control => {
            if UnlinkCommand::is_enabled(&app.editor) {
                app.apply(true, UnlinkCommand::execute);
            }
        }
        KeyCode::Char(c) if !control => {
            app.apply(true, |editor| editor.type_text(c.encode_utf8(&mut [0; 4])));
        }
        KeyCode::Left if shift => {
            app.apply(false, |editor| editor.extend_selection(CaretDirection::Backward))
        }
        KeyCode::Right if shift => {
            app.apply(false, |editor| editor.extend_selection(CaretDirection::Forward))
        }
        KeyCode::Left => app.apply(false, |editor| editor.move_caret(CaretDirection::Backward)),
        KeyCode::Right => app.apply(false, |editor| editor.move_caret(CaretDirection::Forward)),
        KeyCode::Up => app.move_block(false),
        KeyCode::Down => app.move_block(true),
        KeyCode::Backspace => app.apply(true, Editor::delete_backward),
        KeyCode::Enter => app.insert_soft_break(),
        _ => {}
    }
    true
}

/// Lines drawn for the editing view, plus where the caret goes.
struct ViewLines {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    caret: Option<(usize, usize)>,
    caret_block: usize,
    caret_offset: usize,
    block: usize,
    offset: usize,
    column: usize,
}

impl ViewLines {
    fn build(editor: &Editor) -> Self {
        let focus = editor.model().selection().focus();
        let mut out = Self {
            lines: Vec::new(),
            spans: Vec::new(),
            caret: None,
            caret_block: focus.block().unwrap_or(0),
            caret_offset: focus.offset,
            block: 0,
            offset: 0,
            column: 0,
        };

        let view = editor.view();
        for (block, &id) in view.children(view.root()).iter().enumerate() {
            out.block = block;
            out.offset = 0;
            out.column = 0;
            for &child in view.children(id) {
                out.push_node(view, child, Style::default());
            }
            out.mark_caret();
            out.end_line();
            out.lines.push(Line::default());
        }
        out
    }

    fn push_node(&mut self, view: &ViewTree, id: ViewNodeId, style: Style) {
        let Some(node) = view.get(id) else {
            return;
        };
        match &node.data {
            ViewNodeData::Text(text) => {
                let len = text.chars().count();
                if self.block == self.caret_block
                    && (self.offset..self.offset + len).contains(&self.caret_offset)
                {
                    let column = self.column + self.caret_offset - self.offset;
                    self.caret = Some((column, self.lines.len()));
                }
                self.spans.push(Span::styled(text.clone(), style));
                self.offset += len;
                self.column += len;
            }
            ViewNodeData::Element(element) => match element.kind {
                ElementKind::Ui => {
                    self.spans
                        .push(Span::styled("|", Style::default().fg(Color::Yellow)));
                    self.column += 1;
                }
                ElementKind::Empty => {
                    self.mark_caret();
                    self.end_line();
                    self.offset += 1;
                }
                _ => {
                    let mut style = style;
                    if is_link_element(element) {
                        style = style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
                        if element.has_class(CLASS_HIGHLIGHT) {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                    }
                    match element.name.as_str() {
                        "strong" => style = style.add_modifier(Modifier::BOLD),
                        "em" => style = style.add_modifier(Modifier::ITALIC),
                        _ => {}
                    }
                    for &child in node.children() {
                        self.push_node(view, child, style);
                    }
                }
            },
            ViewNodeData::Root => {}
        }
    }

    fn mark_caret(&mut self) {
        if self.caret.is_none()
            && self.block == self.caret_block
            && self.offset == self.caret_offset
        {
            self.caret = Some((self.column, self.lines.len()));
        }
    }

    fn end_line(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        self.column = 0;
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let view = ViewLines::build(&app.editor);
    let title = app.path.display().to_string();
    let content =
        Paragraph::new(view.lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(content, chunks[0]);

    if let Some((column, row)) = view.caret {
        let x = chunks[0].x + 1 + column as u16;
        let y = chunks[0].y + 1 + row as u16;
        f.set_cursor_position((x, y));
    }

    let status = Paragraph::new(Line::from(app.status_line()))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, chunks[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("Esc/^Q: Quit | "),
        Span::raw("←/→/↑/↓: Move | "),
        Span::raw("Enter: Line break | "),
        Span::raw("Shift+←/→: Select | "),
        Span::raw("^L: Link | ^K: Unlink | ^S: Save"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[2]);
}
