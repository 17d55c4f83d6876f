/// Terminal front-end for the starfx effects
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info, warn};
use starfx_core::{Effect, MemoryBudget};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod renderer;

pub use config::AppConfig;
pub use error::AppError;
pub use renderer::{PixelBuffer, TerminalCanvas};

use input::{InputRouter, RouteAction};

/// Start `env_logger`, honouring `RUST_LOG` over `default_level`
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A second call (tests, embedding) keeps the first logger
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Charge an effect's state against the emulated device RAM
pub fn report_budget<E: Effect>(effect: &E, capacity: usize) -> MemoryBudget {
    let mut budget = MemoryBudget::new(capacity);
    if let Err(e) = budget.charge(effect.name(), effect.footprint_bytes()) {
        warn!("{}", e);
    }
    info!(
        "{} uses {} of {} bytes of device RAM",
        effect.name(),
        budget.used(),
        budget.capacity()
    );
    budget
}

/// Raw mode and the alternate screen, undone on drop whichever way the
/// loop exits. Restore errors are ignored.
struct TerminalGuard<W: Write> {
    out: W,
    enhanced: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self {
            out,
            enhanced: false,
        };
        execute!(guard.out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }

    /// Ask for press/repeat/release reporting
    fn enhance(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        self.enhanced = true;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show);
    }
}

/// Main application struct driving one effect in the terminal
pub struct TerminalApp<E: Effect> {
    effect: E,
    canvas: TerminalCanvas<Stdout>,
    router: InputRouter,
    release_after: Duration,
    input_wait: Duration,
    show_overlay: bool,
    budget: MemoryBudget,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl<E: Effect> TerminalApp<E> {
    pub fn new(effect: E, config: &AppConfig) -> Self {
        let budget = report_budget(&effect, config.memory.ram_budget_bytes);
        let display = &config.display;

        Self {
            effect,
            canvas: TerminalCanvas::new(display.width, display.height, display.scale, stdout()),
            router: InputRouter::new(),
            release_after: config.input.release_after(),
            input_wait: config.input.wait(),
            show_overlay: config.debug.show_overlay,
            budget,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        let mut guard = TerminalGuard::enter(stdout())?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            guard.enhance()?;
            self.router = InputRouter::new();
        } else {
            debug!("terminal cannot report key releases, synthesizing them");
            self.router = InputRouter::synthesizing(self.release_after);
        }

        let (columns, rows) = terminal::size()?;
        if columns < self.canvas.columns() || rows < self.canvas.rows() {
            warn!(
                "terminal is {}x{} but the canvas needs {}x{}",
                columns,
                rows,
                self.canvas.columns(),
                self.canvas.rows()
            );
        }

        info!("running {}", self.effect.name());
        let result = self.main_loop();
        drop(guard);
        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let frame_period = self.effect.frame_period();

        while self.running {
            let frame_start = Instant::now();

            // Handle input, waiting a bounded time for the first event
            if event::poll(self.input_wait.min(frame_period))? {
                self.handle_event(event::read()?);
                while self.running && event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }
            let action = self.router.expire(&mut self.effect, Instant::now());
            self.apply(action);
            if !self.running {
                break;
            }

            // Update
            self.effect.tick();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < frame_period {
                std::thread::sleep(frame_period - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!(
            "{} stopped, {} bytes of device RAM charged",
            self.effect.name(),
            self.budget.used()
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        let action = self.router.route_key(&key, &mut self.effect, Instant::now());
        self.apply(action);
    }

    fn apply(&mut self, action: RouteAction) {
        match action {
            RouteAction::Continue => {}
            RouteAction::SetScale(scale) => {
                debug!("scale set to {}", scale);
                self.canvas.set_scale(scale);
            }
            RouteAction::Stop => self.running = false,
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.effect.render(&mut self.canvas)?;

        if self.show_overlay {
            let row = self.canvas.rows();
            let status = format!(
                "{} | FPS: {:.1} | {} | Arrows=Pan/Speed Enter=Invert 1-4=Scale Q=Quit",
                self.effect.name(),
                self.fps,
                self.effect.status()
            );
            let out = self.canvas.writer();
            queue!(
                out,
                cursor::MoveTo(0, row),
                SetForegroundColor(Color::Yellow),
                Print(status),
                terminal::Clear(ClearType::UntilNewLine),
                ResetColor
            )?;
            out.flush()?;
        }

        Ok(())
    }
}
