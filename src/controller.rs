use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode};
use tracing::trace;

use crate::domain::{CastError, Config, Message};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &Config) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, CastError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    return Ok(self.handle_key(model, key));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => (),
            }
        }
        Ok(None)
    }

    fn handle_key(&self, model: &Model, key: event::KeyEvent) -> Option<Message> {
        // The search line consumes every key while it is active.
        if model.raw_keyevents() {
            return Some(Message::RawKey(key));
        }
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Char('s') => Some(Message::ToggleSort),
            KeyCode::Char('a') => Some(Message::SortAscending),
            KeyCode::Char('d') => Some(Message::SortDescending),
            KeyCode::Char('n') | KeyCode::Right => Some(Message::NextPage),
            KeyCode::Char('p') | KeyCode::Left => Some(Message::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Message::LastPage),
            KeyCode::Char('z') => Some(Message::CyclePageSize),
            KeyCode::Char('r') => Some(Message::Reset),
            KeyCode::Char('c') => Some(Message::CopyPage),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
