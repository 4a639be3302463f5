use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;

use crate::domain::models::Event;

/// Merges worker events, terminal input and a UI tick into one stream.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

pub fn map_key(keyevent: KeyEvent) -> Option<Event> {
    if keyevent.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = keyevent.modifiers.contains(KeyModifiers::CONTROL);
    let event = match (keyevent.code, ctrl) {
        (KeyCode::Char('c'), true) => Event::KeyboardCTRLC,
        (KeyCode::Char('n'), true) => Event::KeyboardCTRLN,
        (KeyCode::Char('o'), true) => Event::KeyboardCTRLO,
        (KeyCode::Char('u'), true) => Event::UIScrollPageUp,
        (KeyCode::Char('d'), true) => Event::UIScrollPageDown,
        (KeyCode::Up, _) => Event::UIScrollUp,
        (KeyCode::Down, _) => Event::UIScrollDown,
        (KeyCode::PageUp, _) => Event::UIScrollPageUp,
        (KeyCode::PageDown, _) => Event::UIScrollPageDown,
        (KeyCode::Enter, _) => Event::KeyboardEnter,
        _ => Event::KeyboardCharInput(Input::from(keyevent)),
    };

    return Some(event);
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        return match event {
            CrosstermEvent::Paste(text) => Some(Event::KeyboardPaste(text)),
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => Some(Event::UIScrollUp),
                MouseEventKind::ScrollDown => Some(Event::UIScrollDown),
                _ => None,
            },
            CrosstermEvent::Key(keyevent) => map_key(keyevent),
            _ => None,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick)
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
