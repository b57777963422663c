use crate::error::{ParseError, Result};

/// Step-scanning primitive over an immutable string.
///
/// The position only ever moves forward; it is either on a character or
/// exactly one past the end ("done"). Scans operate on whole characters,
/// never bytes.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    position: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            position: 0,
        }
    }

    /// True once the position has moved past the last character.
    pub fn is_done(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// The character under the cursor, or `None` when done.
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// The character under the cursor; fails when the cursor is done.
    pub fn get(&self) -> Result<char> {
        self.current().ok_or(ParseError::OutOfBounds {
            position: self.position,
        })
    }

    /// The character after the current one, if any.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Advance one position. Advancing past the end is allowed and leaves
    /// the cursor done.
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// True if any of `symbols` occurs anywhere in the original string,
    /// consumed or not.
    pub fn contains_any(&self, symbols: &str) -> bool {
        self.chars.iter().any(|c| symbols.contains(*c))
    }

    /// Accumulate characters up to, but not including, the first occurrence
    /// of any of `symbols`. Leaves the cursor on the stopping character; if
    /// none occurs the cursor ends up done.
    pub fn get_until(&mut self, symbols: &str) -> String {
        self.scan(symbols, true)
    }

    /// Inverted polarity of [`get_until`](Cursor::get_until): accumulate
    /// while characters are in `symbols`, stopping on the first that is not.
    pub fn get_while(&mut self, symbols: &str) -> String {
        self.scan(symbols, false)
    }

    fn scan(&mut self, symbols: &str, match_positive: bool) -> String {
        let mut scanned = String::new();
        while let Some(c) = self.current() {
            if symbols.contains(c) == match_positive {
                break;
            }
            scanned.push(c);
            self.advance();
        }
        scanned
    }

    /// Advance until just *after* the first occurrence of any of `symbols`.
    /// If none occurs, everything is consumed and the cursor is left done.
    pub fn move_past_next(&mut self, symbols: &str) {
        while let Some(c) = self.current() {
            self.advance();
            if symbols.contains(c) {
                break;
            }
        }
    }

    /// Everything from the current position to the end, without moving.
    pub fn get_remaining(&self) -> String {
        self.chars[self.position.min(self.chars.len())..]
            .iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_advance() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.get().unwrap(), 'a');
        assert_eq!(cursor.peek(), Some('b'));
        cursor.advance();
        assert_eq!(cursor.get().unwrap(), 'b');
        assert_eq!(cursor.peek(), None);
        cursor.advance();
        assert!(cursor.is_done());
        assert!(cursor.get().is_err());
    }

    #[test]
    fn test_get_until_stops_on_symbol() {
        let mut cursor = Cursor::new("abc:def");
        assert_eq!(cursor.get_until(":"), "abc");
        // Cursor sits on the stopping character, not past it.
        assert_eq!(cursor.get().unwrap(), ':');
    }

    #[test]
    fn test_get_until_no_match_consumes_all() {
        let mut cursor = Cursor::new("abc");
        assert_eq!(cursor.get_until(":"), "abc");
        assert!(cursor.is_done());
        assert_eq!(cursor.get_until(":"), "");
    }

    #[test]
    fn test_get_until_immediate_match() {
        let mut cursor = Cursor::new(":abc");
        assert_eq!(cursor.get_until(":"), "");
        assert_eq!(cursor.get().unwrap(), ':');
    }

    #[test]
    fn test_get_while() {
        let mut cursor = Cursor::new("123abc");
        assert_eq!(cursor.get_while("0123456789"), "123");
        assert_eq!(cursor.get().unwrap(), 'a');
    }

    #[test]
    fn test_move_past_next() {
        let mut cursor = Cursor::new("ab:cd");
        cursor.move_past_next(":");
        assert_eq!(cursor.get_remaining(), "cd");

        let mut cursor = Cursor::new("abcd");
        cursor.move_past_next(":");
        assert!(cursor.is_done());
    }

    #[test]
    fn test_contains_any_checks_whole_string() {
        let mut cursor = Cursor::new("ab9");
        cursor.advance();
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_done());
        assert!(cursor.contains_any("0123456789"));
        assert!(!cursor.contains_any("xyz"));
    }

    #[test]
    fn test_get_remaining_does_not_move() {
        let mut cursor = Cursor::new("abc");
        cursor.advance();
        assert_eq!(cursor.get_remaining(), "bc");
        assert_eq!(cursor.get_remaining(), "bc");
    }
}
