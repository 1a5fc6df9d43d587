use std::io::{self, Stderr};
use std::sync::Once;
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, KeyEventKind,
        MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::{Stream, StreamExt};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Spinner and task polling cadence
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    /// Terminal input is gone; nothing more can reach the form.
    InputClosed,
}

/// Raw mode plus alternate screen for as long as the value lives.
pub struct TerminalSession {
    terminal: Tui,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = leave_screen();
                previous(info);
            }));
        });

        enable_raw_mode()?;
        execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = leave_screen() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}

fn leave_screen() -> io::Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Terminal input and ticks merged onto one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::from_stream(EventStream::new())
    }

    pub fn from_stream<S>(input: S) -> Self
    where
        S: Stream<Item = io::Result<Event>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut input = Box::pin(input);
            let mut ticks = tokio::time::interval(TICK_RATE);
            loop {
                let event = tokio::select! {
                    next = input.next() => match next {
                        Some(Ok(event)) => match translate(event) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(e)) => {
                            log::error!("Terminal event stream failed: {}", e);
                            let _ = tx.send(AppEvent::InputClosed);
                            break;
                        }
                        None => {
                            log::warn!("Terminal event stream ended");
                            let _ = tx.send(AppEvent::InputClosed);
                            break;
                        }
                    },
                    _ = ticks.tick() => AppEvent::Tick,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Key release events are reported on some platforms
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures_util::stream;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    async fn drain(events: &mut EventHandler) -> Vec<AppEvent> {
        let mut seen = Vec::new();
        while let Some(event) = events.next().await {
            if !matches!(event, AppEvent::Tick) {
                seen.push(event);
            }
        }
        seen
    }

    #[tokio::test]
    async fn test_stream_error_closes_input() {
        let input = stream::iter(vec![
            Ok(key(KeyCode::Char('x'), KeyEventKind::Press)),
            Ok(key(KeyCode::Char('x'), KeyEventKind::Release)),
            Err(io::Error::other("tty gone")),
            Ok(key(KeyCode::Char('y'), KeyEventKind::Press)),
        ]);
        let mut events = EventHandler::from_stream(input);

        let seen = drain(&mut events).await;
        assert_eq!(seen.len(), 2, "{:?}", seen);
        assert!(matches!(&seen[0], AppEvent::Key(k) if k.code == KeyCode::Char('x')));
        assert!(matches!(seen[1], AppEvent::InputClosed));
    }

    #[tokio::test]
    async fn test_stream_end_closes_input() {
        let mut events = EventHandler::from_stream(stream::iter(vec![Ok(Event::Resize(80, 24))]));

        let seen = drain(&mut events).await;
        assert!(matches!(seen[..], [AppEvent::Resize(80, 24), AppEvent::InputClosed]));
    }
}
