use std::sync::mpsc::{self, Receiver};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Terminal event consumed by the app loop. The assessment core is strictly
/// synchronous, so there is no tick: the loop blocks for one event, applies
/// it, re-renders.
#[derive(Clone, Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize,
}

/// Source of terminal events (keyboard, resize).
pub trait EventSource {
    /// Block for the next event. `None` means the source is gone and the
    /// loop should exit.
    fn next(&self) -> Option<InputEvent>;
}

/// Production event source backed by crossterm's blocking reader.
pub struct CrosstermEventSource {
    rx: Receiver<InputEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows terminals report both press and release
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(InputEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(InputEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn next(&self) -> Option<InputEvent> {
        self.rx.recv().ok()
    }
}

/// Channel-fed event source for headless tests.
pub struct TestEventSource {
    rx: Receiver<InputEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn next(&self) -> Option<InputEvent> {
        self.rx.recv().ok()
    }
}
