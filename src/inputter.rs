use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};
use tracing::trace;

/// Line editor behind the search box. Every edit is reported back so the
/// model can apply the buffer to the filter live, keystroke by keystroke.
#[derive(Default)]
pub struct SearchInput {
    current_input: String,
    curser_pos: usize,
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputUpdate {
    pub text: String,
    pub finished: bool,
    pub canceled: bool,
    pub curser_pos: usize,
}

impl SearchInput {
    pub fn read(&mut self, key: event::KeyEvent) -> InputUpdate {
        trace!("Search input key: {key:?}");
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) => self.enter(),
            (KeyCode::Esc, KeyModifiers::NONE) => self.escape(),
            (KeyCode::Backspace, KeyModifiers::NONE) => self.backspace(),
            (KeyCode::Left, KeyModifiers::NONE) => self.left(),
            (KeyCode::Right, KeyModifiers::NONE) => self.right(),
            (kc, km) => self.key(kc, km),
        }
    }

    /// Seed the editor with an existing search text, curser at the end.
    pub fn seed(&mut self, text: &str) {
        self.clear();
        self.current_input = text.to_string();
        self.curser_pos = self.current_input.chars().count();
    }

    pub fn get(&self) -> InputUpdate {
        InputUpdate {
            canceled: self.canceled,
            finished: self.finished,
            text: self.current_input.clone(),
            curser_pos: self.curser_pos,
        }
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.current_input.clear();
        self.curser_pos = 0;
    }

    fn enter(&mut self) -> InputUpdate {
        self.finished = true;
        self.get()
    }

    fn escape(&mut self) -> InputUpdate {
        self.clear();
        self.canceled = true;
        self.finished = true;
        self.get()
    }

    fn backspace(&mut self) -> InputUpdate {
        if self.curser_pos > 0 {
            self.curser_pos -= 1;
            let pos = self.byte_pos();
            self.current_input.remove(pos);
        }
        self.get()
    }

    fn left(&mut self) -> InputUpdate {
        self.curser_pos = self.curser_pos.saturating_sub(1);
        self.get()
    }

    fn right(&mut self) -> InputUpdate {
        if self.curser_pos < self.current_input.chars().count() {
            self.curser_pos += 1;
        }
        self.get()
    }

    fn key(&mut self, code: KeyCode, _modifier: KeyModifiers) -> InputUpdate {
        if let Some(chr) = code.as_char() {
            let pos = self.byte_pos();
            self.current_input.insert(pos, chr);
            self.curser_pos += 1;
        }
        self.get()
    }

    fn byte_pos(&self) -> usize {
        self.current_input
            .char_indices()
            .nth(self.curser_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}
