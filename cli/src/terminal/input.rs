use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};

/// Watches the keyboard for 'q' and clears `running` when it arrives.
///
/// Returns `None` when stdin is not a terminal (piped runs, CI), in which
/// case ctrl-c remains the only way to stop early.
pub fn spawn_quit_listener(running: Arc<AtomicBool>) -> Option<JoinHandle<()>> {
    if !std::io::stdin().is_terminal() {
        return None;
    }

    Some(thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            match event::poll(Duration::from_millis(200)) {
                Ok(true) => {
                    if let Ok(Event::Key(key)) = event::read() {
                        if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                            running.store(false, Ordering::Relaxed);
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    }))
}
