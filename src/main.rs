use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cloze::app::{App, AppScreen, DynAnswerLog};
use cloze::config::Config;
use cloze::event::{AppEvent, EventHandler};
use cloze::session::quiz::Phase;
use cloze::source::BundledSource;
use cloze::store::KeyValueStore;
use cloze::store::answer_log::AnswerLog;
use cloze::store::json_store::JsonStore;
use cloze::ui::components::countdown_bar::CountdownBar;
use cloze::ui::components::feedback_view::FeedbackView;
use cloze::ui::components::question_card::QuestionCard;
use cloze::ui::components::status_panel::{StatusKind, StatusPanel};
use cloze::ui::layout::{QuizLayout, centered_rect, pack_hint_lines};
use cloze::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "cloze", version, about = "Timed fill-in-the-blank quiz for the terminal")]
struct Cli {
    #[arg(short, long, help = "Seconds allowed per question")]
    time: Option<u32>,

    #[arg(short, long, help = "Question source: bundled, bundled:<name>, a file path or an http(s) URL")]
    source: Option<String>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Shuffle the options of every question")]
    shuffle: bool,

    #[arg(short, long, help = "Open the feedback for the last recorded quiz")]
    feedback: bool,

    #[arg(long, help = "Write the effective settings to the config file")]
    save_config: bool,

    #[arg(long, help = "List bundled question sets and themes, then exit")]
    list: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Log verbosity (-v, -vv, -vvv)")]
    verbose: u8,
}

fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cloze")
}

/// The terminal belongs to the TUI, so logs go to a file under the data dir.
fn init_logging(verbose: u8) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let dir = log_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, "cloze.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()?;
    Some(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.list {
        print_available();
        return Ok(());
    }
    let _guard = init_logging(cli.verbose);

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "unreadable config, using defaults");
        Config::default()
    });
    if let Some(time) = cli.time {
        config.time_per_question = time;
    }
    if let Some(source) = cli.source {
        config.question_source = source;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.shuffle {
        config.shuffle_options = true;
    }
    config.validate();
    if cli.save_config {
        config.save()?;
    }
    info!(
        time_per_question = config.time_per_question,
        source = %config.question_source,
        "starting cloze"
    );

    let answer_log: Option<DynAnswerLog> = match JsonStore::new() {
        Ok(store) => {
            info!(dir = %store.base_dir().display(), "answer storage ready");
            let store: Box<dyn KeyValueStore> = Box::new(store);
            Some(AnswerLog::new(store))
        }
        Err(e) => {
            warn!(error = %e, "answer storage unavailable, answers will not be kept");
            None
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, answer_log, events.sender());
    if cli.feedback {
        app.open_feedback();
    } else {
        app.start_fetch();
    }

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn print_available() {
    println!("Question sets:");
    for name in BundledSource::available() {
        println!("  bundled:{name}");
    }
    println!("Themes:");
    for name in Theme::available_themes() {
        println!("  {name}");
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::QuizLoaded(result) => app.on_quiz_loaded(result, Instant::now()),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Feedback => handle_feedback_key(app, key),
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let phase = app.session.phase().clone();
    match phase {
        Phase::Loading => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                app.should_quit = true;
            }
        }
        Phase::Error(_) => match key.code {
            KeyCode::Char('r') => app.retry(),
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            _ => {}
        },
        Phase::Active => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-2),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(2),
            KeyCode::Char(' ') => app.toggle_cursor(),
            KeyCode::Char(ch @ '1'..='9') => {
                app.toggle_option(ch as usize - '1' as usize);
            }
            KeyCode::Enter => app.next_question(Instant::now()),
            _ => {}
        },
        Phase::Completed => match key.code {
            KeyCode::Char('r') => app.restart(Instant::now()),
            KeyCode::Char('f') => app.open_feedback(),
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            _ => {}
        },
    }
}

fn handle_feedback_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Backspace => app.back_to_quiz(Instant::now()),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_feedback(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_feedback(-1),
        KeyCode::Char('r') => app.restart(Instant::now()),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Feedback => render_feedback(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let session = &app.session;

    let info = match session.phase() {
        Phase::Active => format!(
            " Question {} of {} | Score: {} | Current: +{}",
            session.state().current_index + 1,
            session.question_count(),
            session.score(),
            session.pending_points(),
        ),
        Phase::Completed => format!(
            " Completed | Score: {} / {}",
            session.score(),
            session.max_score()
        ),
        _ => String::new(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " cloze ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = QuizLayout::new(area);
    let session = &app.session;

    render_header(frame, app, layout.header);

    match session.phase() {
        Phase::Loading => {
            let panel = StatusPanel::new(
                StatusKind::Loading {
                    source: &app.config.question_source,
                },
                app.theme,
            );
            frame.render_widget(panel, centered_rect(50, 40, area));
        }
        Phase::Error(message) => {
            let panel = StatusPanel::new(StatusKind::Error { message }, app.theme);
            frame.render_widget(panel, centered_rect(60, 40, area));
        }
        Phase::Completed => {
            let panel = StatusPanel::new(
                StatusKind::Completed {
                    score: session.score(),
                    max_score: session.max_score(),
                },
                app.theme,
            );
            frame.render_widget(panel, centered_rect(50, 40, area));
        }
        Phase::Active => {
            if let Some(timer) = session.timer() {
                let bar = CountdownBar::new(timer, app.config.warning_threshold, app.theme);
                frame.render_widget(bar, layout.timer);
            }
            if let Some(question) = session.current_question() {
                let card = QuestionCard::new(
                    question,
                    &session.state().selection,
                    app.option_cursor,
                    app.theme,
                )
                .last(session.is_last_question())
                .can_advance(session.can_advance());
                frame.render_widget(card, layout.main);
            }
            render_footer(
                frame,
                app,
                layout.footer,
                &[
                    "[1-9] Toggle option",
                    "[Arrows/hjkl] Move",
                    "[Space] Toggle",
                    "[Enter] Next",
                    "[q] Quit",
                ],
            );
        }
    }
}

fn render_feedback(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = QuizLayout::new(area);
    let colors = &app.theme.colors;

    let title = Paragraph::new(Line::from(Span::styled(
        " Feedback ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Left)
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(title, layout.header);

    let body = ratatui::layout::Rect::new(
        layout.timer.x,
        layout.timer.y,
        layout.timer.width,
        layout.timer.height + layout.main.height,
    );
    if let Some(report) = &app.feedback {
        frame.render_widget(FeedbackView::new(report, app.feedback_scroll, app.theme), body);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &["[j/k] Scroll", "[r] Restart Quiz", "[Esc] Back", "[q] Quit"],
    );
}
