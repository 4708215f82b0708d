use std::{iter::Peekable, str::CharIndices};

use derive_more::with_trait::{Display, Error};

use crate::parser::{SourcePosition, Spanning};

#[doc(hidden)]
#[derive(Debug)]
pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    source: &'a str,
    position: SourcePosition,
    finished: bool,
}

/// Raw string literal as it appears in the source, quotes stripped.
///
/// Escape sequences and block indentation are resolved later, when the
/// literal is turned into an [`InputValue`](crate::ast::InputValue).
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StringLiteral<'a> {
    /// Literal delimited by a single `"`.
    #[display("\"{_0}\"")]
    Quoted(&'a str),

    /// Literal delimited by `"""`.
    #[display("\"\"\"{_0}\"\"\"")]
    Block(&'a str),
}

/// Raw unparsed scalar literal, tagged by how the lexer recognized it.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ScalarToken<'a> {
    String(StringLiteral<'a>),
    Float(&'a str),
    Int(&'a str),
}

/// A single token in the input source
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Token<'a> {
    Name(&'a str),
    Scalar(ScalarToken<'a>),
    #[display("!")]
    ExclamationMark,
    #[display("$")]
    Dollar,
    #[display("(")]
    ParenOpen,
    #[display(")")]
    ParenClose,
    #[display("[")]
    BracketOpen,
    #[display("]")]
    BracketClose,
    #[display("{{")]
    CurlyOpen,
    #[display("}}")]
    CurlyClose,
    #[display("...")]
    Ellipsis,
    #[display(":")]
    Colon,
    #[display("=")]
    Equals,
    #[display("@")]
    At,
    #[display("|")]
    Pipe,
    #[display("End of file")]
    EndOfFile,
}

/// Error when tokenizing the input source
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum LexerError {
    /// A character that does not occur anywhere in the language, such as `?`.
    #[display("Unknown character \"{_0}\"")]
    UnknownCharacter(#[error(not(source))] char),

    /// A known character in a position where it cannot appear.
    #[display("Unexpected character \"{_0}\"")]
    UnexpectedCharacter(#[error(not(source))] char),

    /// A quoted string without its closing `"`, or with a line break inside.
    #[display("Unterminated string literal")]
    UnterminatedString,

    /// A block string without its closing `"""`.
    #[display("Unterminated block string literal")]
    UnterminatedBlockString,

    /// A control character inside a string literal.
    #[display("Unknown character \"{_0}\" in string literal")]
    UnknownCharacterInString(#[error(not(source))] char),

    /// An escape sequence other than the ones allowed in quoted strings.
    #[display("Unknown escape sequence \"{_0}\" in string")]
    UnknownEscapeSequence(#[error(not(source))] String),

    /// The source ended while a token still needed more characters, e.g. `1.`.
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,

    /// A malformed number literal, e.g. `00` or `1.e`.
    #[display("Invalid number literal")]
    InvalidNumber,
}

pub type LexerResult<'a> = Result<Spanning<Token<'a>>, Spanning<LexerError>>;

impl<'a> Lexer<'a> {
    #[doc(hidden)]
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            source,
            position: SourcePosition::new_origin(),
            finished: false,
        }
    }

    fn peek_char(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, ch)) = next {
            if ch == '\n' {
                self.position.advance_line();
            } else {
                self.position.advance_col();
            }
        }
        next
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.peek_char().map_or(self.source.len(), |(idx, _)| idx)
    }

    fn eof(&self) -> Spanning<LexerError> {
        Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile)
    }

    fn emit_single_char(&mut self, token: Token<'a>) -> Spanning<Token<'a>> {
        let start = self.position;
        self.next_char();
        Spanning::single_width(&start, token)
    }

    fn skip_ignored(&mut self) {
        while let Some((_, ch)) = self.peek_char() {
            match ch {
                '\t' | ' ' | '\n' | '\r' | ',' | '\u{feff}' => {
                    self.next_char();
                }
                '#' => {
                    while let Some((_, ch)) = self.peek_char() {
                        if ch == '\n' || ch == '\r' {
                            break;
                        }
                        self.next_char();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_ellipsis(&mut self) -> LexerResult<'a> {
        let start = self.position;
        for _ in 0..3 {
            match self.next_char() {
                Some((_, '.')) => {}
                Some(_) => {
                    return Err(Spanning::zero_width(
                        &start,
                        LexerError::UnexpectedCharacter('.'),
                    ));
                }
                None => return Err(self.eof()),
            }
        }
        Ok(Spanning::start_end(&start, &self.position, Token::Ellipsis))
    }

    fn scan_name(&mut self) -> LexerResult<'a> {
        let start = self.position;
        let from = self.offset();
        while let Some((_, ch)) = self.peek_char() {
            if !is_name_cont(ch) {
                break;
            }
            self.next_char();
        }
        let to = self.offset();
        Ok(Spanning::start_end(
            &start,
            &self.position,
            Token::Name(&self.source[from..to]),
        ))
    }

    fn scan_string(&mut self) -> LexerResult<'a> {
        let start = self.position;
        self.next_char();

        if self.source[self.offset()..].starts_with("\"\"") {
            self.next_char();
            self.next_char();
            return self.scan_block_string(start);
        }

        let from = self.offset();
        loop {
            let before = self.position;
            let Some((idx, ch)) = self.next_char() else {
                return Err(Spanning::zero_width(
                    &self.position,
                    LexerError::UnterminatedString,
                ));
            };
            match ch {
                '"' => {
                    return Ok(Spanning::start_end(
                        &start,
                        &self.position,
                        Token::Scalar(ScalarToken::String(StringLiteral::Quoted(
                            &self.source[from..idx],
                        ))),
                    ));
                }
                '\\' => self.scan_escape(&before)?,
                '\n' | '\r' => {
                    return Err(Spanning::zero_width(
                        &before,
                        LexerError::UnterminatedString,
                    ));
                }
                c if !is_source_char(c) => {
                    return Err(Spanning::zero_width(
                        &before,
                        LexerError::UnknownCharacterInString(c),
                    ));
                }
                _ => {}
            }
        }
    }

    fn scan_escape(&mut self, at: &SourcePosition) -> Result<(), Spanning<LexerError>> {
        match self.next_char() {
            Some((_, 'b' | 'f' | 'n' | 'r' | 't' | '\\' | '/' | '"')) => Ok(()),
            Some((_, 'u')) => {
                let from = self.offset();
                for _ in 0..4 {
                    match self.peek_char() {
                        Some((_, ch)) if ch.is_ascii_hexdigit() => {
                            self.next_char();
                        }
                        Some(_) => break,
                        None => {
                            return Err(Spanning::zero_width(
                                &self.position,
                                LexerError::UnterminatedString,
                            ));
                        }
                    }
                }
                let digits = &self.source[from..self.offset()];
                let valid = digits.len() == 4
                    && u32::from_str_radix(digits, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .is_some();
                if valid {
                    Ok(())
                } else {
                    Err(Spanning::zero_width(
                        at,
                        LexerError::UnknownEscapeSequence(format!("\\u{digits}")),
                    ))
                }
            }
            Some((_, c)) => Err(Spanning::zero_width(
                at,
                LexerError::UnknownEscapeSequence(format!("\\{c}")),
            )),
            None => Err(Spanning::zero_width(
                &self.position,
                LexerError::UnterminatedString,
            )),
        }
    }

    fn scan_block_string(&mut self, start: SourcePosition) -> LexerResult<'a> {
        let from = self.offset();
        loop {
            let rest = &self.source[self.offset()..];
            if rest.starts_with("\\\"\"\"") {
                for _ in 0..4 {
                    self.next_char();
                }
                continue;
            }
            if rest.starts_with("\"\"\"") {
                let to = self.offset();
                for _ in 0..3 {
                    self.next_char();
                }
                return Ok(Spanning::start_end(
                    &start,
                    &self.position,
                    Token::Scalar(ScalarToken::String(StringLiteral::Block(
                        &self.source[from..to],
                    ))),
                ));
            }
            let before = self.position;
            match self.next_char() {
                Some((_, c)) if !is_source_char(c) => {
                    return Err(Spanning::zero_width(
                        &before,
                        LexerError::UnknownCharacterInString(c),
                    ));
                }
                Some(_) => {}
                None => {
                    return Err(Spanning::zero_width(
                        &self.position,
                        LexerError::UnterminatedBlockString,
                    ));
                }
            }
        }
    }

    fn scan_digits(&mut self) -> Result<usize, Spanning<LexerError>> {
        let mut count = 0;
        while let Some((_, ch)) = self.peek_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.next_char();
            count += 1;
        }
        if count == 0 {
            return Err(match self.peek_char() {
                Some((_, ch)) => {
                    Spanning::zero_width(&self.position, LexerError::UnexpectedCharacter(ch))
                }
                None => self.eof(),
            });
        }
        Ok(count)
    }

    fn scan_number(&mut self) -> LexerResult<'a> {
        let start = self.position;
        let from = self.offset();
        let mut is_float = false;

        if let Some((_, '-')) = self.peek_char() {
            self.next_char();
        }

        let int_start = self.position;
        let leading_zero = matches!(self.peek_char(), Some((_, '0')));
        let int_digits = self.scan_digits()?;
        if leading_zero && int_digits > 1 {
            return Err(Spanning::zero_width(&int_start, LexerError::InvalidNumber));
        }

        if let Some((_, '.')) = self.peek_char() {
            is_float = true;
            self.next_char();
            self.scan_digits()?;
        }

        if let Some((_, 'e' | 'E')) = self.peek_char() {
            is_float = true;
            self.next_char();
            if let Some((_, '+' | '-')) = self.peek_char() {
                self.next_char();
            }
            self.scan_digits()?;
        }

        // `1x`, `1.5_` and the like are a single bad token, not two tokens.
        if let Some((_, ch)) = self.peek_char() {
            if ch == '.' || is_name_start(ch) {
                return Err(Spanning::zero_width(
                    &self.position,
                    LexerError::UnexpectedCharacter(ch),
                ));
            }
        }

        let number = &self.source[from..self.offset()];
        let token = if is_float {
            Token::Scalar(ScalarToken::Float(number))
        } else {
            Token::Scalar(ScalarToken::Int(number))
        };
        Ok(Spanning::start_end(&start, &self.position, token))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexerResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_ignored();

        Some(match self.peek_char().map(|(_, ch)| ch) {
            Some('!') => Ok(self.emit_single_char(Token::ExclamationMark)),
            Some('$') => Ok(self.emit_single_char(Token::Dollar)),
            Some('(') => Ok(self.emit_single_char(Token::ParenOpen)),
            Some(')') => Ok(self.emit_single_char(Token::ParenClose)),
            Some('[') => Ok(self.emit_single_char(Token::BracketOpen)),
            Some(']') => Ok(self.emit_single_char(Token::BracketClose)),
            Some('{') => Ok(self.emit_single_char(Token::CurlyOpen)),
            Some('}') => Ok(self.emit_single_char(Token::CurlyClose)),
            Some(':') => Ok(self.emit_single_char(Token::Colon)),
            Some('=') => Ok(self.emit_single_char(Token::Equals)),
            Some('@') => Ok(self.emit_single_char(Token::At)),
            Some('|') => Ok(self.emit_single_char(Token::Pipe)),
            Some('.') => self.scan_ellipsis(),
            Some('"') => self.scan_string(),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.scan_number(),
            Some(ch) if is_name_start(ch) => self.scan_name(),
            Some(ch) => {
                self.finished = true;
                Err(Spanning::zero_width(
                    &self.position,
                    LexerError::UnknownCharacter(ch),
                ))
            }
            None => {
                self.finished = true;
                Ok(Spanning::zero_width(&self.position, Token::EndOfFile))
            }
        })
    }
}

fn is_source_char(c: char) -> bool {
    c == '\t' || c == '\n' || c == '\r' || c >= ' '
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_cont(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}
