/// Tokenizer for Paren source text.
///
/// Splits a source buffer into token strings. There is no token type: the
/// reader discriminates on the first character of each token, and string
/// literals keep a leading `"` for that purpose. The tokenizer is total -
/// malformed input produces degenerate tokens, never an error.
pub struct Tokenizer {
    /// Source code as character vector
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Accumulated tokens
    tokens: Vec<String>,
    /// Accumulator for the token being built
    acc: String,
    /// Net count of unmatched `(` and `"` seen so far.
    ///
    /// The REPL treats `unclosed <= 0` as "form complete"; negative values
    /// happen with surplus `)` and are allowed.
    pub unclosed: i64,
}

impl Tokenizer {
    /// Creates a tokenizer over a source buffer
    pub fn new(source: &str) -> Self {
        Tokenizer {
            source: source.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            acc: String::new(),
            unclosed: 0,
        }
    }

    /// Scans the whole buffer and returns the token list.
    ///
    /// After this returns, `unclosed` holds the net open-delimiter count
    /// for the buffer.
    pub fn tokenize(&mut self) -> Vec<String> {
        while !self.is_at_end() {
            let c = self.advance();
            match c {
                ' ' | '\t' | '\r' | '\n' => self.emit(),
                ';' => {
                    self.emit();
                    self.skip_line_comment();
                }
                '#' if self.peek() == '!' => {
                    self.emit();
                    self.skip_line_comment();
                }
                '"' => {
                    self.unclosed += 1;
                    self.emit();
                    self.scan_string();
                    self.emit();
                }
                '(' => {
                    self.unclosed += 1;
                    self.emit();
                    self.tokens.push("(".to_string());
                }
                ')' => {
                    self.unclosed -= 1;
                    self.emit();
                    self.tokens.push(")".to_string());
                }
                _ => self.acc.push(c),
            }
        }
        self.emit();
        std::mem::take(&mut self.tokens)
    }

    /// Scans a string literal body after the opening quote.
    ///
    /// The emitted token starts with `"` so the reader can tell it from an
    /// atom. `\r`, `\n` and `\t` escapes are translated; any other escaped
    /// character stands for itself. An unterminated literal runs to end of
    /// input and leaves `unclosed` incremented.
    fn scan_string(&mut self) {
        self.acc.push('"');
        while !self.is_at_end() {
            let c = self.advance();
            match c {
                '"' => {
                    self.unclosed -= 1;
                    return;
                }
                '\\' => {
                    let escaped = if self.is_at_end() { '\\' } else { self.advance() };
                    self.acc.push(match escaped {
                        'r' => '\r',
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                other => self.acc.push(other),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.advance() != '\n' {}
    }

    /// Flushes the accumulator into the token list
    fn emit(&mut self) {
        if !self.acc.is_empty() {
            self.tokens.push(std::mem::take(&mut self.acc));
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.pos];
        self.pos += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.pos]
        }
    }
}

/// Tokenizes a source buffer, discarding the `unclosed` count
pub fn tokenize(source: &str) -> Vec<String> {
    Tokenizer::new(source).tokenize()
}
