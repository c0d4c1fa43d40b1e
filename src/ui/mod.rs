use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    config,
    core::Simulation,
    render::{self, RenderCell},
    types::{AttractorConfig, Rgb},
};

type Backend = CrosstermBackend<io::Stdout>;

pub fn run() -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal);
    shutdown_terminal(&mut terminal)?;
    result
}

fn run_loop(terminal: &mut Terminal<Backend>) -> Result<()> {
    let mut sim = Simulation::new(AttractorConfig::default());
    let mut ui_state = UiState::new();

    let start = Instant::now();
    let render_interval = Duration::from_secs_f64(1.0 / config::RENDER_HZ);
    let mut last_render = start;
    let mut sim_counter = 0_u32;
    let mut render_counter = 0_u32;
    let mut last_fps_sample = start;
    let mut sim_fps = 0.0_f64;
    let mut render_fps = 0.0_f64;

    loop {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') => {
                        if sim.is_paused() {
                            sim.play();
                        } else {
                            sim.pause();
                        }
                    }
                    KeyCode::Char('s') => {
                        if sim.is_paused() {
                            sim.update(config::STEP_DELTA);
                            sim.draw(&mut ui_state.framebuf);
                        }
                    }
                    KeyCode::Char('n') => {
                        sim.spawn();
                        sim.draw(&mut ui_state.framebuf);
                    }
                    KeyCode::Char('c') => {
                        sim.clear();
                        sim.draw(&mut ui_state.framebuf);
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        sim.set_attractor(resized_attractor(
                            sim.attractor(),
                            config::ATTRACTOR_SIZE_STEP,
                        ));
                        sim.draw(&mut ui_state.framebuf);
                    }
                    KeyCode::Char('-') => {
                        sim.set_attractor(resized_attractor(
                            sim.attractor(),
                            -config::ATTRACTOR_SIZE_STEP,
                        ));
                        sim.draw(&mut ui_state.framebuf);
                    }
                    _ => {}
                },
                CrosstermEvent::Resize(width, height) => {
                    info!("terminal resized to {}x{}", width, height);
                }
                _ => {}
            }
        }

        if last_render.elapsed() >= render_interval {
            if sim.tick(start.elapsed().as_secs_f64(), &mut ui_state.framebuf) {
                sim_counter += 1;
            }
            if last_fps_sample.elapsed() >= Duration::from_secs(1) {
                let secs = last_fps_sample.elapsed().as_secs_f64();
                sim_fps = sim_counter as f64 / secs;
                render_fps = render_counter as f64 / secs;
                sim_counter = 0;
                render_counter = 0;
                last_fps_sample = Instant::now();
            }

            let stats = sim.stats();
            terminal.draw(|frame| {
                let size = frame.size();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(3),
                        Constraint::Length(3),
                    ])
                    .split(size);

                let header = Paragraph::new(format!(
                    "{} | alive: {} | decaying: {} | spawned: {} | t: {:.1}s | attractor: {:.0} | sim fps: {:.1} | render fps: {:.1}",
                    if sim.is_paused() { "PAUSED" } else { "RUNNING" },
                    stats.alive,
                    stats.decaying,
                    stats.spawned,
                    sim.time(),
                    sim.attractor().size,
                    sim_fps,
                    render_fps
                ))
                .block(Block::default().borders(Borders::ALL).title("attractor"));
                frame.render_widget(header, chunks[0]);

                let block = Block::default().borders(Borders::ALL).title("Viewport");
                let inner = block.inner(chunks[1]);
                if ui_state.ensure_viewport(inner.width, inner.height) {
                    sim.draw(&mut ui_state.framebuf);
                }
                let viewport = Paragraph::new(framebuffer_lines(&ui_state.framebuf)).block(block);
                frame.render_widget(viewport, chunks[1]);

                let footer = Paragraph::new(
                    "space: play/pause | s: step | n: spawn | c: clear | +/-: attractor size | q: quit",
                )
                .block(Block::default().borders(Borders::ALL).title("Controls"));
                frame.render_widget(footer, chunks[2]);
            })?;

            last_render = Instant::now();
            render_counter += 1;
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

fn shutdown_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

struct UiState {
    framebuf: render::FrameBuffer,
}

impl UiState {
    fn new() -> Self {
        Self {
            framebuf: render::FrameBuffer::new(0, 0),
        }
    }

    /// Returns true when the frame buffer had to be resized.
    fn ensure_viewport(&mut self, width: u16, height: u16) -> bool {
        if self.framebuf.width() != width || self.framebuf.height() != height {
            self.framebuf.resize(width, height);
            return true;
        }
        false
    }
}

fn resized_attractor(current: AttractorConfig, delta: f64) -> AttractorConfig {
    let size = (current.size + delta).clamp(config::ATTRACTOR_MIN_SIZE, config::ATTRACTOR_MAX_SIZE);
    AttractorConfig::from_size(size)
}

fn framebuffer_lines(framebuf: &render::FrameBuffer) -> Vec<Line<'static>> {
    (0..framebuf.height())
        .map(|y| {
            let spans: Vec<Span> = (0..framebuf.width())
                .map(|x| {
                    let cell = framebuf.get(x, y);
                    Span::styled(cell.ch.to_string(), style_for(cell))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn style_for(cell: RenderCell) -> Style {
    let style = Style::default().fg(color_for(cell.fg));
    match cell.bg {
        Some(bg) => style.bg(color_for(bg)),
        None => style,
    }
}

fn color_for(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
