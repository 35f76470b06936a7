use std::{
    io,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;

use crate::{
    config::{self, Tuning},
    core::{random::RngSource, EffectSurface},
    render::{self, CellWidth, Emphasis, FrameBuffer, RenderCell, Viewport},
    types::ColorId,
};

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    pub seed: Option<u64>,
    pub render_interval: Duration,
}

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub fn run(options: RunOptions) -> anyhow::Result<()> {
    let source = match options.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let surface = EffectSurface::mount(Tuning::default(), Box::new(source), epoch_ms())?;

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, surface, options);
    shutdown_terminal(&mut terminal)?;
    result
}

fn run_loop(terminal: &mut Term, mut surface: EffectSurface, options: RunOptions) -> anyhow::Result<()> {
    let step = Duration::from_secs_f32(1.0 / config::SIM_HZ);
    let render_interval = options.render_interval;
    let mut framebuf = FrameBuffer::new(0, 0);
    let mut accumulator = Duration::ZERO;
    let mut last_tick = Instant::now();
    let mut last_render: Option<Instant> = None;
    let mut frames = 0_u64;

    loop {
        let now = Instant::now();
        accumulator += now - last_tick;
        last_tick = now;
        while accumulator >= step {
            surface.advance(step);
            accumulator -= step;
        }

        while event::poll(Duration::from_millis(0))? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if is_quit(&key) {
                    let stats = surface.unmount();
                    info!(frames, population = stats.population, "quit requested");
                    return Ok(());
                }
            }
        }

        if last_render.is_none_or(|at| at.elapsed() >= render_interval) {
            let scene = render::scene::compose(surface.population(), surface.flash_active());
            let t = surface.elapsed().as_secs_f64();
            terminal.draw(|frame| {
                let area = frame.size();
                render::paint(
                    &scene,
                    t,
                    Viewport {
                        width: area.width,
                        height: area.height,
                    },
                    &mut framebuf,
                );
                frame.render_widget(Paragraph::new(to_lines(&framebuf)), area);
            })?;
            last_render = Some(Instant::now());
            frames += 1;
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Raw mode is switched back off if any later setup step fails.
fn setup_terminal() -> anyhow::Result<Term> {
    enable_raw_mode().context("failed to enable raw mode")?;
    rollback_on_err(enter_session(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

fn rollback_on_err<T>(result: anyhow::Result<T>, rollback: impl FnOnce()) -> anyhow::Result<T> {
    if result.is_err() {
        rollback();
    }
    result
}

fn enter_session() -> anyhow::Result<Term> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn shutdown_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Converts the frame buffer to styled lines, merging runs of equal style.
fn to_lines(framebuf: &FrameBuffer) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(framebuf.height() as usize);
    for y in 0..framebuf.height() {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_style = Style::default();
        let mut after_head = false;
        for x in 0..framebuf.width() {
            let cell = framebuf.get(x, y);
            let ch = match cell.width {
                CellWidth::WideTail if after_head => {
                    after_head = false;
                    continue;
                }
                CellWidth::WideTail => ' ',
                CellWidth::WideHead | CellWidth::Narrow => cell.ch,
            };
            after_head = cell.width == CellWidth::WideHead;
            let style = style_for(&cell);
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn style_for(cell: &RenderCell) -> Style {
    let mut style = Style::default().fg(color_for(cell.color));
    if let Some(bg) = cell.bg {
        style = style.bg(color_for(bg));
    }
    match cell.emphasis {
        Emphasis::Normal => style,
        Emphasis::Bold => style.add_modifier(Modifier::BOLD),
        Emphasis::Dim => style.add_modifier(Modifier::DIM),
    }
}

fn color_for(color: ColorId) -> Color {
    match color {
        ColorId::White => Color::White,
        ColorId::Gold => Color::Rgb(255, 204, 51),
        ColorId::Green => Color::Rgb(80, 220, 120),
        ColorId::DimGreen => Color::Rgb(40, 120, 70),
        ColorId::DeepGreen => Color::Rgb(20, 70, 40),
        ColorId::Gray => Color::DarkGray,
        ColorId::Magenta => Color::Magenta,
        ColorId::Cyan => Color::Cyan,
        ColorId::Flash => Color::Rgb(255, 250, 220),
        ColorId::Shade(level) => Color::Rgb(0, level, level / 2),
    }
}
