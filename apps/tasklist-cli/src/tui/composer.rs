use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text input with a byte-offset cursor
#[derive(Debug, Default, Clone)]
pub struct Composer {
    pub buffer: String,
    pub cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: text.to_string(),
            cursor: text.len(),
        }
    }

    /// Apply an editing key. Returns whether the buffer or cursor changed.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            KeyCode::Char('u') => {
                if self.buffer.is_empty() {
                    return false;
                }
                self.clear();
                true
            }
            KeyCode::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            KeyCode::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                true
            }
            KeyCode::Left if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                true
            }
            KeyCode::Right if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                true
            }
            KeyCode::Home if self.cursor > 0 => {
                self.cursor = 0;
                true
            }
            KeyCode::End if self.cursor < self.buffer.len() => {
                self.cursor = self.buffer.len();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Text before the cursor, for placing the terminal cursor.
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.cursor]
    }
}

fn prev_char_boundary(text: &str, idx: usize) -> usize {
    let mut i = idx.saturating_sub(1);
    while !text.is_char_boundary(i) {
        i = i.saturating_sub(1);
    }
    i
}

fn next_char_boundary(text: &str, idx: usize) -> usize {
    let mut i = idx.saturating_add(1).min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
