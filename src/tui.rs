//! Terminal driver.
//!
//! [`Tui`] owns raw mode, the alternate screen and mouse capture, and runs a
//! background task that merges terminal input with the tick and frame timers
//! into one [`Event`] stream.

use std::io::{Stdout, stdout};
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::cursor;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, EventStream, KeyCode,
    KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt, StreamExt};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::rate_period;

/// After this long the input task is aborted.
const ABORT_AFTER: Duration = Duration::from_millis(500);
/// After this long shutdown gives up.
const GIVE_UP_AFTER: Duration = Duration::from_secs(2);

pub type Backend = CrosstermBackend<Stdout>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Input task is running.
    Init,
    /// Ctrl+C or SIGTERM.
    Quit,
    /// Reading from the terminal failed.
    Error(String),
    /// Time to sample the stopwatches.
    Tick,
    /// Time to draw, if anything changed.
    Render,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Map a raw terminal event. Returns `None` for events the app never sees.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Press => None,
        CrosstermEvent::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(Event::Quit)
        }
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}

/// Used when a rate has no usable timer period.
const FALLBACK_PERIOD: Duration = Duration::from_micros(16_667);

/// Interval that fires `rate` times per second and drops missed beats.
fn ticker(rate: f64) -> Interval {
    let period = rate_period(rate).unwrap_or_else(|| {
        warn!(rate, "Unusable rate, falling back to 60 per second");
        FALLBACK_PERIOD
    });
    let mut ticker = interval(period);
    // Every beat samples the clock, so replaying late ones is pointless.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

pub struct Tui {
    terminal: Terminal<Backend>,
    task: Option<JoinHandle<()>>,
    token: CancellationToken,
    event_tx: UnboundedSender<Event>,
    event_rx: UnboundedReceiver<Event>,
    tick_rate: f64,
    frame_rate: f64,
}

impl Tui {
    /// Both rates are per second and must be positive.
    pub fn new(frame_rate: f64, tick_rate: f64) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(Backend::new(stdout()))?,
            task: None,
            token: CancellationToken::new(),
            event_tx,
            event_rx,
            tick_rate,
            frame_rate,
        })
    }

    /// Take over the terminal and start producing events.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        self.spawn_input_task();
        Ok(())
    }

    /// Stop producing events and hand the terminal back.
    pub fn exit(&mut self) -> Result<()> {
        self.stop_input_task()?;
        if terminal::is_raw_mode_enabled()? {
            self.terminal.flush()?;
            crossterm::execute!(
                stdout(),
                DisableMouseCapture,
                LeaveAlternateScreen,
                cursor::Show
            )?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Restore the terminal and stop the process as the shell's Ctrl+Z would.
    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn spawn_input_task(&mut self) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.task = Some(tokio::spawn(run_input(
            self.event_tx.clone(),
            self.token.clone(),
            self.tick_rate,
            self.frame_rate,
        )));
    }

    fn stop_input_task(&mut self) -> Result<()> {
        self.token.cancel();
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        let started = Instant::now();
        while !task.is_finished() {
            let waited = started.elapsed();
            if waited >= GIVE_UP_AFTER {
                return Err(eyre!("Input task did not stop within {GIVE_UP_AFTER:?}"));
            }
            if waited >= ABORT_AFTER {
                task.abort();
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }
}

/// Forward terminal input and timer beats until cancelled or the app hangs up.
async fn run_input(
    event_tx: UnboundedSender<Event>,
    token: CancellationToken,
    tick_rate: f64,
    frame_rate: f64,
) {
    let mut input = EventStream::new();
    let mut tick = ticker(tick_rate);
    let mut frame = ticker(frame_rate);

    #[cfg(unix)]
    watch_sigterm(event_tx.clone(), token.clone());

    if event_tx.send(Event::Init).is_err() {
        return;
    }
    debug!(tick_rate, frame_rate, "Input task started");

    loop {
        let event = tokio::select! {
            () = token.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = frame.tick() => Event::Render,
            next = input.next().fuse() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => Event::Error(e.to_string()),
                None => break,
            },
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }

    token.cancel();
    debug!("Input task stopped");
}

#[cfg(unix)]
fn watch_sigterm(event_tx: UnboundedSender<Event>, token: CancellationToken) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!("SIGTERM will not quit cleanly: {e}");
            return;
        }
    };
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {}
            _ = sigterm.recv() => {
                let _ = event_tx.send(Event::Quit);
            }
        }
    });
}

impl Deref for Tui {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!("Failed to restore terminal: {e}");
        }
    }
}
