use std::rc::Rc;
use std::sync::Arc;

use chrono::Local;
use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{AppConfig, GlobalAction, KeyResolver, TimingConfig};
use crate::message::AppMessage;
use crate::stopwatch::Stopwatches;
use crate::theme::ThemePair;
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, EventResult, Footer, Header, HelpEvent, HelpSection, HelpView, Keybinding,
    StopwatchList,
};

pub struct App {
    timing: TimingConfig,
    resolver: Arc<KeyResolver>,
    themes: ThemePair,
    header: Header,
    list: StopwatchList,
    footer: Footer,
    help: Option<HelpView>,
    should_quit: bool,
    should_suspend: bool,
    needs_redraw: bool,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(config: &AppConfig, resolver: Arc<KeyResolver>, clock: Rc<dyn Clock>) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let stopwatches = Stopwatches::new(clock, config.stopwatches.initial);
        let list = StopwatchList::new(stopwatches, resolver.clone());
        let mut footer = Footer::new(
            list.keybindings()
                .into_iter()
                .chain(global_keybindings(&resolver))
                .collect(),
        );
        footer.set_counts(list.stopwatches().len(), 0);

        Self {
            timing: config.timing.clone(),
            themes: ThemePair::from_config(&config.theme),
            header: Header::new(&config.header),
            list,
            footer,
            help: None,
            resolver,
            should_quit: false,
            should_suspend: false,
            needs_redraw: true,
            message_tx,
            message_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(self.timing.frame_rate, self.timing.tick_rate)?;
        tui.enter()?;

        loop {
            if let Some(event) = tui.next_event().await {
                self.handle_event(event)?;
            }
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.message_tx.send(AppMessage::Resume)?;
                self.message_tx.send(AppMessage::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        info!("Exiting");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Init => {}
            Event::Quit => self.message_tx.send(AppMessage::Quit)?,
            Event::Tick => self.message_tx.send(AppMessage::Tick)?,
            Event::Render => self.message_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => {
                self.message_tx.send(AppMessage::Resize(width, height))?;
            }
            Event::Error(error) => self.message_tx.send(AppMessage::DisplayError(error))?,
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.footer.clear_error() {
            self.needs_redraw = true;
        }

        if let Some(help) = &mut self.help {
            if let Ok(EventResult::Event(HelpEvent::Close)) = help.handle_key(key) {
                self.message_tx.send(AppMessage::ToggleHelp)?;
            }
            return Ok(());
        }

        let global = match self.resolver.resolve::<GlobalAction>(&key) {
            Some(GlobalAction::Quit) => Some(AppMessage::Quit),
            Some(GlobalAction::Help) => Some(AppMessage::ToggleHelp),
            Some(GlobalAction::Theme) => Some(AppMessage::ToggleTheme),
            Some(GlobalAction::Suspend) => Some(AppMessage::Suspend),
            // Back only means something inside the help overlay.
            Some(GlobalAction::Back) | None => None,
        };
        if let Some(message) = global {
            self.message_tx.send(message)?;
            return Ok(());
        }

        match self.list.handle_key(key) {
            Ok(EventResult::Event(msg)) => self.message_tx.send(AppMessage::Stopwatch(msg))?,
            Ok(_) => {}
            Err(error) => self
                .message_tx
                .send(AppMessage::DisplayError(error.to_string()))?,
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.help.is_some() {
            return Ok(());
        }
        match self.list.handle_mouse(mouse) {
            Ok(EventResult::Event(msg)) => self.message_tx.send(AppMessage::Stopwatch(msg))?,
            Ok(_) => {}
            Err(error) => self
                .message_tx
                .send(AppMessage::DisplayError(error.to_string()))?,
        }
        Ok(())
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.message_rx.try_recv() {
            match message {
                AppMessage::Render => {
                    if self.take_needs_redraw() {
                        tui.draw(|frame| self.draw(frame))?;
                    }
                }
                AppMessage::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.needs_redraw = true;
                }
                AppMessage::ClearScreen => {
                    tui.clear()?;
                    self.needs_redraw = true;
                }
                other => self.update(other),
            }
        }
        Ok(())
    }

    /// Apply a message that does not need the terminal.
    fn update(&mut self, message: AppMessage) {
        if !matches!(message, AppMessage::Tick | AppMessage::Render) {
            debug!(?message, "Handling message");
        }

        match message {
            AppMessage::Tick => {
                self.list.handle_tick();
                if self.header.set_time(Local::now().time()) {
                    self.needs_redraw = true;
                }
            }
            AppMessage::Quit => self.should_quit = true,
            AppMessage::Suspend => self.should_suspend = true,
            AppMessage::Resume => self.should_suspend = false,
            AppMessage::DisplayError(error) => {
                warn!("{error}");
                self.footer.set_error(error);
                self.needs_redraw = true;
            }
            AppMessage::ToggleHelp => {
                self.help = match self.help.take() {
                    Some(_) => None,
                    None => Some(self.help_view()),
                };
                self.needs_redraw = true;
            }
            AppMessage::ToggleTheme => {
                self.themes.toggle();
                info!(mode = ?self.themes.mode(), "Switched theme");
                self.needs_redraw = true;
            }
            AppMessage::Stopwatch(msg) => self.list.update(msg),
            // Terminal-bound messages are handled in `handle_messages`.
            AppMessage::Render | AppMessage::Resize(..) | AppMessage::ClearScreen => {}
        }

        let stopwatches = self.list.stopwatches();
        if self
            .footer
            .set_counts(stopwatches.len(), stopwatches.running_count())
        {
            self.needs_redraw = true;
        }
    }

    fn take_needs_redraw(&mut self) -> bool {
        let list = self.list.take_dirty();
        std::mem::take(&mut self.needs_redraw) || list
    }

    fn help_view(&self) -> HelpView {
        HelpView::new(
            vec![
                HelpSection {
                    title: "Stopwatches",
                    keybindings: self.list.keybindings(),
                },
                HelpSection {
                    title: "Global",
                    keybindings: global_keybindings(&self.resolver),
                },
            ],
            self.resolver.clone(),
        )
    }

    fn draw(&mut self, frame: &mut Frame) {
        let theme = *self.themes.current();
        let area = frame.area();
        let [header_area, list_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.header.render(frame, header_area, &theme);
        self.list.render(frame, list_area, &theme);
        self.footer.render(frame, footer_area, &theme);

        if let Some(help) = &mut self.help {
            help.render(frame, area, &theme);
        }
    }
}

fn global_keybindings(resolver: &KeyResolver) -> Vec<Keybinding> {
    vec![
        Keybinding::new(resolver.display(GlobalAction::Theme), "Toggle dark mode"),
        Keybinding::new(resolver.display(GlobalAction::Help), "Help").in_footer(),
        Keybinding::new(resolver.display(GlobalAction::Quit), "Quit").in_footer(),
        Keybinding::new(resolver.display(GlobalAction::Suspend), "Suspend"),
    ]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{
        KeyCode, KeyModifiers, MouseButton, MouseEventKind,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ThemeMode;
    use crate::config::keybindings::KeybindingsConfig;
    use crate::stopwatch::ZERO_READOUT;

    fn app(count: usize) -> (Rc<ManualClock>, App) {
        let mut config = AppConfig::default();
        config.stopwatches.initial = count;
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        let clock = Rc::new(ManualClock::new());
        let app = App::new(&config, resolver, clock.clone());
        (clock, app)
    }

    /// Feed events and apply every resulting message, except the ones that
    /// need a real terminal.
    fn feed(app: &mut App, events: impl IntoIterator<Item = Event>) {
        for event in events {
            app.handle_event(event).unwrap();
            while let Ok(message) = app.message_rx.try_recv() {
                app.update(message);
            }
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_start_tick_stop() {
        let (clock, mut app) = app(3);
        feed(&mut app, [key('j'), key('s')]);
        clock.advance(Duration::from_millis(1_230));
        feed(&mut app, [Event::Tick, key('x')]);
        clock.advance(Duration::from_secs(9));
        feed(&mut app, [Event::Tick]);

        assert_eq!(
            app.list.snapshot(),
            vec![
                (ZERO_READOUT.to_string(), false),
                ("00:00:01.23".to_string(), false),
                (ZERO_READOUT.to_string(), false),
            ]
        );
    }

    #[test]
    fn test_add_and_remove() {
        let (_, mut app) = app(3);
        feed(&mut app, [key('a')]);
        assert_eq!(app.list.stopwatches().len(), 4);
        assert_eq!(app.list.selected(), 3);

        feed(&mut app, [key('r'), key('r'), key('r'), key('r'), key('r')]);
        assert!(app.list.stopwatches().is_empty());
        assert!(draw(&mut app).contains("No stopwatches"));
    }

    #[test]
    fn test_reset_running_keeps_running() {
        let (clock, mut app) = app(1);
        feed(&mut app, [key(' ')]);
        clock.advance(Duration::from_secs(5));
        feed(&mut app, [key('z')]);
        clock.advance(Duration::from_millis(500));
        feed(&mut app, [Event::Tick]);
        assert_eq!(app.list.snapshot(), vec![("00:00:00.50".to_string(), true)]);
    }

    #[test]
    fn test_global_keys() {
        let (_, mut app) = app(1);
        feed(&mut app, [key('d')]);
        assert_eq!(app.themes.mode(), ThemeMode::Light);

        feed(&mut app, [key('?')]);
        assert!(app.help.is_some());
        // Keys go to the overlay while it is open.
        feed(&mut app, [key('s')]);
        assert_eq!(app.list.stopwatches().running_count(), 0);
        feed(&mut app, [Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))]);
        assert!(app.help.is_none());

        feed(&mut app, [key('q')]);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let (_, mut app) = app(1);
        feed(&mut app, [Event::Quit]);
        assert!(app.should_quit);
    }

    #[test]
    fn test_errors_show_in_footer_until_next_key() {
        let (_, mut app) = app(1);
        feed(&mut app, [Event::Error("stdin closed".to_string())]);
        assert!(draw(&mut app).contains("Error: stdin closed"));
        feed(&mut app, [key('j')]);
        assert!(!draw(&mut app).contains("Error"));
    }

    #[test]
    fn test_mouse_click_starts_stopwatch() {
        let (_, mut app) = app(2);
        draw(&mut app);
        // Header takes the first line, so the first row's start button is at y 2..5.
        feed(
            &mut app,
            [Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 4,
                row: 3,
                modifiers: KeyModifiers::NONE,
            })],
        );
        assert_eq!(app.list.stopwatches().running_count(), 1);
        assert!(app.list.stopwatches().get(0).is_some_and(|s| s.is_running()));
    }

    #[test]
    fn test_redraw_only_when_dirty() {
        let (clock, mut app) = app(1);
        assert!(app.take_needs_redraw());
        feed(&mut app, [Event::Tick]);
        // The header clock may have ticked over; drain it.
        app.take_needs_redraw();
        clock.advance(Duration::from_secs(1));
        app.list.handle_tick();
        assert!(!app.take_needs_redraw());

        feed(&mut app, [key('s')]);
        assert!(app.take_needs_redraw());
    }

    #[test]
    fn test_draw_shows_header_and_footer() {
        let (_, mut app) = app(2);
        let screen = draw(&mut app);
        assert!(screen.contains("Stopwatch · As per textual tutorial"));
        assert!(screen.contains("2 stopwatches · 0 running"));
        assert!(screen.contains("Start"));
    }
}
