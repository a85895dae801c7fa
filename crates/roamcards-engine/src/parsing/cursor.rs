/// A byte cursor for scanning one plain-text span.
///
/// Every delimiter the scanners look for is ASCII, so slicing `s` at a
/// position the cursor stopped on a delimiter always lands on a char boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The span being scanned.
    pub s: &'a str,
    /// Current index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Starts scanning at byte `i`.
    pub fn at(s: &'a str, i: usize) -> Self {
        Self { s, i }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current one.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// The byte just behind the cursor, `None` at the start of the span.
    pub fn prev(&self) -> Option<u8> {
        self.i
            .checked_sub(1)
            .and_then(|j| self.s.as_bytes().get(j).copied())
    }

    /// The char just behind the cursor.
    pub fn prev_char(&self) -> Option<char> {
        self.s.get(..self.i).and_then(|head| head.chars().next_back())
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Remaining input from the cursor.
    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or("")
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Advances past the current char, whatever its encoded width.
    pub fn bump_char(&mut self) {
        let width = self.rest().chars().next().map_or(1, char::len_utf8);
        self.i += width;
    }

    /// Advances while `pred` holds for the current byte, returning how many were consumed.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.i;
        while self.peek().is_some_and(&pred) {
            self.i += 1;
        }
        self.i - start
    }

    /// Moves to the next occurrence of `pat`, leaving the cursor on it.
    pub fn seek(&mut self, pat: &str) -> bool {
        match self.rest().find(pat) {
            Some(off) => {
                self.i += off;
                true
            }
            None => false,
        }
    }

    /// Slice of `s` from `start` up to the cursor.
    pub fn since(&self, start: usize) -> &'a str {
        self.s.get(start..self.i).unwrap_or("")
    }
}
