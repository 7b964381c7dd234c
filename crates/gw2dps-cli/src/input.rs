use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::shutdown::ShutdownSignal;

/// What a key press asks the tracker to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Reset,
}

/// Spawn a thread that watches the keyboard while the tracker runs.
///
/// Esc, q and Ctrl+C quit; r forgets the session max and the last combat
/// average.
pub fn spawn_keyboard_monitor(signal: Arc<ShutdownSignal>) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !signal.is_shutdown() {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key_event)) = event::read() else {
                continue;
            };
            match key_action(&key_event) {
                Some(KeyAction::Quit) => {
                    debug!("Quit key pressed: {:?}", key_event.code);
                    signal.trigger();
                    break;
                }
                Some(KeyAction::Reset) => {
                    debug!("Reset requested");
                    signal.request_reset();
                }
                None => {}
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::Reset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
        key_action(&KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Esc, KeyModifiers::NONE), Some(KeyAction::Quit));
        assert_eq!(press(KeyCode::Char('q'), KeyModifiers::NONE), Some(KeyAction::Quit));
        assert_eq!(press(KeyCode::Char('Q'), KeyModifiers::SHIFT), Some(KeyAction::Quit));
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(KeyAction::Quit));
    }

    #[test]
    fn test_reset_key() {
        assert_eq!(press(KeyCode::Char('r'), KeyModifiers::NONE), Some(KeyAction::Reset));
        assert_eq!(press(KeyCode::Char('R'), KeyModifiers::SHIFT), Some(KeyAction::Reset));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert_eq!(press(KeyCode::Char('a'), KeyModifiers::NONE), None);
        assert_eq!(press(KeyCode::Enter, KeyModifiers::NONE), None);
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut event = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(key_action(&event), None);
    }
}
