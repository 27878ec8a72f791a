use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use quizdr::app::{App, AppScreen, Direction};
use quizdr::config::Config;
use quizdr::data::loader::Dataset;
use quizdr::engine::list::Mode;
use quizdr::event::{AppEvent, EventHandler};
use quizdr::store::json_store::JsonStore;
use quizdr::ui::components::explanation_panel::ExplanationPanel;
use quizdr::ui::components::question_panel::QuestionPanel;
use quizdr::ui::components::score_bar::ScoreBar;
use quizdr::ui::layout::{AppLayout, centered_rect};

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Terminal self-quizzing with persistent progress")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(
        long,
        requires = "explanations",
        help = "Path to questions JSON (pairs with --explanations; bundled sample used when neither is set)"
    )]
    questions: Option<PathBuf>,

    #[arg(
        long,
        requires = "questions",
        help = "Path to explanations JSON (pairs with --questions; bundled sample used when neither is set)"
    )]
    explanations: Option<PathBuf>,

    #[arg(long, help = "Directory for the session snapshot")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Ignore the persisted snapshot for this run")]
    fresh: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(path) = cli.questions {
        config.questions_path = Some(path.to_string_lossy().to_string());
    }
    if let Some(path) = cli.explanations {
        config.explanations_path = Some(path.to_string_lossy().to_string());
    }

    // Dataset failure is fatal for the session: bail before touching the
    // terminal so the error stays readable.
    let dataset = Dataset::load(
        config.questions_path.as_deref().map(Path::new),
        config.explanations_path.as_deref().map(Path::new),
    )
    .context("could not load quiz dataset")?;

    let store = match cli.data_dir {
        Some(dir) => JsonStore::with_base_dir(dir).ok(),
        None => JsonStore::new().ok(),
    };

    let mut app = App::new(config, dataset, store, cli.fresh);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
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
            AppEvent::Tick => app.poll_images(),
            AppEvent::Resize => {}
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

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.select_mode(Mode::Normal),
        KeyCode::Char('2') => app.select_mode(Mode::WrongOnly),
        KeyCode::Char('3') => app.select_mode(Mode::Shuffle),
        KeyCode::Char('r') => app.resume(),
        KeyCode::Char('x') => app.start_over(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.select_mode(Mode::Normal),
            1 => app.select_mode(Mode::WrongOnly),
            2 => app.select_mode(Mode::Shuffle),
            3 => app.resume(),
            4 => app.start_over(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => app.go_to_menu(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.cursor_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_next(),
        KeyCode::Char(' ') => app.toggle_choice(),
        KeyCode::Enter => app.submit_answer(),
        KeyCode::Right | KeyCode::Char('n') => app.navigate(Direction::Forward),
        KeyCode::Left | KeyCode::Char('p') => app.navigate(Direction::Back),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    let summary = app.score_summary();
    frame.render_widget(
        ScoreBar::new(app.session.mode(), None, summary, app.theme),
        layout.header,
    );

    let menu_area = centered_rect(60, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [1-3] Mode  [r] Resume  [x] Start over  [q] Quit ",
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    let position = app
        .session
        .position()
        .map(|p| (p, app.session.list_len()));
    frame.render_widget(
        ScoreBar::new(app.session.mode(), position, app.score_summary(), app.theme),
        layout.header,
    );

    let Some(question) = app.session.current_question(&app.dataset) else {
        // Empty working list: quiz complete for this mode
        let notice = Paragraph::new(Line::from(Span::styled(
            "No questions available in this mode — nothing left to retry.",
            Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD),
        )))
        .centered();
        frame.render_widget(notice, centered_rect(80, 20, layout.main));
        render_quiz_footer(frame, app, layout.footer);
        return;
    };

    let show_result = app.feedback.is_some() || app.data_fault.is_some();
    let main_chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(if show_result {
            vec![Constraint::Min(6), Constraint::Length(7)]
        } else {
            vec![Constraint::Min(6)]
        })
        .split(layout.main);

    let correct_labels = app.feedback.as_ref().map(|f| &f.correct_labels);
    frame.render_widget(
        QuestionPanel::new(
            question,
            &app.chosen,
            app.cursor,
            correct_labels,
            app.current_image_note(),
            app.theme,
        ),
        main_chunks[0],
    );

    if let Some(ref fault) = app.data_fault {
        let panel = Paragraph::new(Line::from(Span::styled(
            format!("Dataset error: {fault}"),
            Style::default().fg(colors.incorrect()).add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::bordered()
                .title(" Result ")
                .border_style(Style::default().fg(colors.incorrect())),
        );
        frame.render_widget(panel, main_chunks[1]);
    } else if let Some(ref feedback) = app.feedback {
        frame.render_widget(
            ExplanationPanel::new(
                feedback.correct,
                &feedback.correct_answers,
                &feedback.explanation,
                app.theme,
            ),
            main_chunks[1],
        );
    }

    render_quiz_footer(frame, app, layout.footer);
}

fn render_quiz_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    if app.needs_selection {
        let warning = Paragraph::new(Line::from(Span::styled(
            " Select at least one answer before submitting ",
            Style::default().fg(colors.warning()).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(warning, area);
        return;
    }

    // Mirror the engine's boundary state in the affordances
    let prev = if app.session.can_retreat() { "[p] Prev" } else { "       " };
    let next = if app.session.can_advance() { "[n] Next" } else { "       " };
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {prev}  {next}  [Space] Select  [Enter] Submit  [Esc] Menu "),
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, area);
}
