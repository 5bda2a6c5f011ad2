/// Characters that carry meaning outside of a literal run. A backtick in
/// front of one of these (or of another backtick) turns it into plain text.
const SPECIAL: [char; 6] = ['*', '(', ')', '|', '&', '!'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    Not,
    GroupStart,
    InvertedGroupStart,
    GroupEnd,
    Any,
    AnyPath,
    Text(String),
    Eof,
}

/// Lazy tokenizer over a pattern string with a single token of lookahead.
#[derive(Debug)]
pub struct Lexer<'a> {
    pattern: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
    last_start: usize,
    pending: Option<(Token, usize)>,
}

impl<'a> Lexer<'a> {
    pub fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.char_indices().collect(),
            index: 0,
            last_start: 0,
            pending: None,
        }
    }

    /// Byte offset of the next token to be returned, for error reporting.
    pub fn byte_index(&self) -> usize {
        if let Some((_, start)) = &self.pending {
            return *start;
        }
        self.chars
            .get(self.index)
            .map(|(idx, _)| *idx)
            .unwrap_or(self.pattern.len())
    }

    pub fn next_token(&mut self) -> Token {
        if let Some((token, start)) = self.pending.take() {
            self.last_start = start;
            return token;
        }

        self.last_start = self.byte_index();
        let Some(ch) = self.peek() else {
            return Token::Eof;
        };

        match ch {
            '&' => {
                self.advance();
                Token::And
            }
            '|' => {
                self.advance();
                Token::Or
            }
            '(' => {
                self.advance();
                Token::GroupStart
            }
            ')' => {
                self.advance();
                Token::GroupEnd
            }
            '!' => {
                self.advance();
                if self.peek() == Some('(') {
                    self.advance();
                    Token::InvertedGroupStart
                } else {
                    Token::Not
                }
            }
            '*' => {
                self.advance();
                if self.peek() == Some('*') {
                    // '**' is a path wildcard only when a separator follows;
                    // otherwise the second '*' is left for the next token.
                    if matches!(self.peek_at(1), Some('/') | Some('\\')) {
                        self.advance();
                        self.advance();
                        Token::AnyPath
                    } else {
                        Token::Any
                    }
                } else {
                    Token::Any
                }
            }
            _ => self.lex_text(),
        }
    }

    /// Pushes a token back; at most one token may be buffered.
    pub fn unget(&mut self, token: Token) {
        debug_assert!(self.pending.is_none());
        self.pending = Some((token, self.last_start));
    }

    fn lex_text(&mut self) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if SPECIAL.contains(&ch) {
                break;
            }
            if ch == '`' {
                self.advance();
                match self.peek() {
                    Some(next) if SPECIAL.contains(&next) || next == '`' => {
                        text.push(next);
                        self.advance();
                    }
                    // A backtick in front of anything else is an ordinary character.
                    _ => text.push('`'),
                }
            } else {
                text.push(ch);
                self.advance();
            }
        }
        Token::Text(text)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|(_, ch)| *ch)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).map(|(_, ch)| *ch)
    }

    fn advance(&mut self) {
        if self.index < self.chars.len() {
            self.index += 1;
        }
    }
}
