/// Single-line numeric entry field used by the deposit and borrow screens.
///
/// Only ASCII digits and one decimal point are accepted, so the cursor is
/// always a byte offset on a char boundary.
#[derive(Debug, Default)]
pub struct AmountInput {
    pub text: String,
    pub cursor: usize,
}

impl AmountInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the cursor. Returns false if the char was rejected.
    pub fn insert_char(&mut self, c: char) -> bool {
        let ok = c.is_ascii_digit() || (c == '.' && !self.text.contains('.'));
        if ok {
            self.text.insert(self.cursor, c);
            self.cursor += 1;
        }
        ok
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Replace the contents with `value`, cursor at the end.
    pub fn set(&mut self, value: f64) {
        self.text = if value.is_finite() && value > 0.0 {
            value.to_string()
        } else {
            String::new()
        };
        self.cursor = self.text.len();
    }

    pub fn value(&self) -> Option<f64> {
        self.text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_numeric() {
        let mut input = AmountInput::new();
        assert!(input.insert_char('1'));
        assert!(!input.insert_char('x'));
        assert!(input.insert_char('.'));
        assert!(!input.insert_char('.'));
        assert!(input.insert_char('5'));
        assert_eq!(input.text, "1.5");
        assert_eq!(input.value(), Some(1.5));
    }

    #[test]
    fn test_cursor_editing() {
        let mut input = AmountInput::new();
        for c in "125".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.delete_back();
        assert_eq!(input.text, "15");
        assert_eq!(input.cursor, 1);
        input.move_home();
        input.delete_forward();
        assert_eq!(input.text, "5");
        input.move_end();
        input.insert_char('0');
        assert_eq!(input.value(), Some(50.0));
        input.set(0.0);
        assert_eq!(input.value(), None);
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_set_round_trips() {
        let mut input = AmountInput::new();
        input.set(15.5 * 0.75);
        assert_eq!(input.value(), Some(11.625));
        input.set(0.0);
        assert!(input.is_empty());
    }
}
