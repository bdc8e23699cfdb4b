use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::app::{App, AppChannels, View};
use crate::boundary::FALLBACK_MESSAGE;
use crate::lookup::LookupSource;

const TICK: Duration = Duration::from_millis(100);
const INPUT_POLL: Duration = Duration::from_millis(250);
const SLIDER_WIDTH: u16 = 8;

/// Restores the terminal on drop, including on early returns.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

type PanicReport = Box<dyn Fn(String) + Send + Sync>;

/// Sends panic reports to the log while the alternate screen is up and puts
/// the default hook back afterwards.
struct PanicRoute;

impl PanicRoute {
    fn install() -> Self {
        Self::install_with(Box::new(|report: String| tracing::error!(panic = %report, "panic")))
    }

    fn install_with(report: PanicReport) -> Self {
        std::panic::set_hook(Box::new(move |info| report(info.to_string())));
        PanicRoute
    }
}

impl Drop for PanicRoute {
    fn drop(&mut self) {
        if !thread::panicking() {
            drop(std::panic::take_hook());
        }
    }
}

/// Reads terminal input on a blocking thread and forwards it.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || loop {
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::error!(%error, "failed to read terminal event");
                    break;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(error) => {
                tracing::error!(%error, "failed to poll terminal events");
                break;
            }
        }
    });
    rx
}

pub async fn run<S: LookupSource>(mut app: App<S>, channels: AppChannels) -> anyhow::Result<()> {
    let AppChannels {
        mut terms,
        mut settled,
    } = channels;
    let mut guard = TerminalGuard::enter()?;
    let _panics = PanicRoute::install();
    let mut input = spawn_input_reader();
    let mut ticker = tokio::time::interval(TICK);

    // A word given on the command line is already published.
    if terms.has_changed().unwrap_or(false) {
        let term = terms.borrow_and_update().clone();
        app.on_term(term);
    }

    loop {
        guard
            .terminal
            .draw(|frame| paint(frame, &mut app, Instant::now(), draw))
            .context("failed to draw frame")?;

        tokio::select! {
            event = input.recv() => match event {
                Some(event) => app.handle_event(event),
                None => break,
            },
            changed = terms.changed() => {
                if changed.is_err() {
                    break;
                }
                let term = terms.borrow_and_update().clone();
                app.on_term(term);
            }
            Some(settlement) = settled.recv() => app.on_settled(settlement),
            _ = ticker.tick() => app.on_tick(Instant::now()),
        }

        if app.should_quit() {
            break;
        }
    }
    tracing::info!("shutting down");
    Ok(())
}

/// Looks up the already published word and prints the results panel as
/// plain text. Returns whether the lookup succeeded.
pub async fn print_once<S: LookupSource>(
    mut app: App<S>,
    channels: AppChannels,
) -> anyhow::Result<bool> {
    let AppChannels {
        mut terms,
        mut settled,
    } = channels;
    let term = terms.borrow_and_update().clone();
    app.on_term(term);
    let settlement = settled
        .recv()
        .await
        .context("lookup finished without a result")?;
    app.on_settled(settlement);

    let view = app.view(Instant::now()).context("failed to build results view")?;
    for line in crate::results::plain_lines(&view.results) {
        println!("{line}");
    }
    Ok(matches!(
        app.pipeline().status(),
        crate::lookup::FetchStatus::Success(_)
    ))
}

/// Builds the view and draws it, both under the app's error boundary.
fn paint<S: LookupSource>(
    frame: &mut Frame,
    app: &mut App<S>,
    now: Instant,
    draw_view: impl FnOnce(&mut Frame, &View),
) {
    let drawn = app
        .view(now)
        .and_then(|view| app.guard(|| draw_view(frame, &view)));
    if drawn.is_none() {
        draw_fallback(frame);
    }
}

fn draw(frame: &mut Frame, view: &View) {
    let base = view.palette.base();
    frame.render_widget(Block::default().style(base), frame.area());

    let [header_area, search_area, results_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(1),
    ])
    .areas(frame.area());

    draw_header(frame, view, header_area);
    draw_search(frame, view, search_area);

    let title = if view.loading { " Results (loading…) " } else { " Results " };
    let results = Paragraph::new(view.results.clone())
        .style(base)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title).style(base));
    frame.render_widget(results, results_area);
}

fn draw_header(frame: &mut Frame, view: &View, area: Rect) {
    let base = view.palette.base();
    let track = slider_track(view.slider_offset);
    let line = Line::from(vec![
        Span::styled(format!(" {} ", view.logo), base.add_modifier(Modifier::BOLD)),
        Span::styled("Dictionary", base.add_modifier(Modifier::BOLD)),
        Span::styled("   │ font: ", base.fg(view.palette.muted)),
        Span::styled(format!("{} [^F]", view.font_label), base),
        Span::styled("  │ ", base.fg(view.palette.muted)),
        Span::styled(
            track,
            Style::default()
                .fg(view.palette.background)
                .bg(view.palette.slider),
        ),
        Span::styled(format!(" {} [^T]", view.theme_indicator), base),
    ]);
    let header = Paragraph::new(line)
        .style(base)
        .block(Block::default().borders(Borders::BOTTOM).style(base));
    frame.render_widget(header, area);
}

/// The slider track with its knob at `offset` percent.
fn slider_track(offset: f32) -> String {
    let travel = f32::from(SLIDER_WIDTH - 1) * offset / crate::animation::SLIDE_OFFSET;
    let position = (travel.round() as u16).min(SLIDER_WIDTH - 1);
    (0..SLIDER_WIDTH)
        .map(|cell| if cell == position { '●' } else { ' ' })
        .collect()
}

fn draw_search(frame: &mut Frame, view: &View, area: Rect) {
    let base = view.palette.base();
    let [box_area, error_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);

    let border = if view.search_error.is_some() {
        base.fg(view.palette.error)
    } else {
        base.fg(view.palette.accent)
    };
    let placeholder = view.search_text.is_empty();
    let text = if placeholder {
        Span::styled("Enter a word to know its meaning", base.fg(view.palette.muted))
    } else {
        Span::styled(view.search_text.clone(), base)
    };
    let input = Paragraph::new(Line::from(text)).style(base).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search [Enter] ")
            .style(base),
    );
    frame.render_widget(input, box_area);

    let typed = u16::try_from(view.search_text.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = box_area
        .x
        .saturating_add(1)
        .saturating_add(typed)
        .min(box_area.right().saturating_sub(2));
    frame.set_cursor_position((cursor_x, box_area.y + 1));

    if let Some(message) = view.search_error {
        frame.render_widget(
            Paragraph::new(Span::styled(message, base.fg(view.palette.error))),
            error_area,
        );
    }
}

fn draw_fallback(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
    let message = Paragraph::new(Line::styled(
        FALLBACK_MESSAGE,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, frame.area());
}
