#![deny(warnings)]

// Character scanner with one char of lookahead.
// `curr` is the char under the cursor, `peek` the one right after it.
pub struct Scanner {
    src: Vec<char>,
    pos: usize,
    read_pos: usize,
    ch: Option<char>,
}

impl Scanner {
    pub fn new(source: &str) -> Scanner {
        let mut scanner = Scanner{src: source.chars().collect(), pos: 0, read_pos: 0, ch: None};
        scanner.advance();
        scanner
    }

    pub fn pos(&self) -> usize { self.pos }

    pub fn curr(&self) -> Option<char> { self.ch }

    pub fn peek(&self) -> Option<char> {
        self.src.get(self.read_pos).copied()
    }

    // Move the cursor one char forward, past the end it stays on None
    pub fn advance(&mut self) -> Option<char> {
        self.ch = self.src.get(self.read_pos).copied();
        self.pos = self.read_pos;
        if self.read_pos < self.src.len() {
            self.read_pos += 1;
        }
        self.ch
    }

    // Advance only if the next char is 'what', curr() then returns it
    pub fn accept(&mut self, what: char) -> bool {
        if self.peek() == Some(what) {
            self.advance();
            return true;
        }
        false
    }

    // Skip over chars matching 'pred', result is if the scanner advanced.
    // Afterwards curr() is the first non-matching char
    pub fn skip_all<P: Fn(char) -> bool>(&mut self, pred: P) -> bool {
        let mut advanced = false;
        while self.ch.is_some_and(&pred) {
            self.advance();
            advanced = true;
        }
        advanced
    }

    // Collect the run of chars matching 'pred' starting at curr()
    pub fn take_while<P: Fn(char) -> bool>(&mut self, pred: P) -> String {
        let start = self.pos;
        self.skip_all(pred);
        self.slice(start, self.pos)
    }

    pub fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.src.len());
        let from = from.min(to);
        self.src[from..to].iter().collect()
    }
}
