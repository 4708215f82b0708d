use derive_more::with_trait::{Display, Error, From};

use crate::parser::{Lexer, LexerError, Spanning, Token};

/// Error while parsing a GraphQL query
#[derive(Clone, Debug, Display, Eq, Error, From, PartialEq)]
pub enum ParseError {
    /// An unexpected token occurred in the source
    #[display("Unexpected \"{_0}\"")]
    #[from(ignore)]
    UnexpectedToken(#[error(not(source))] String),

    /// The input source abruptly ended
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,

    /// An error during tokenization occurred
    #[display("{_0}")]
    LexerError(LexerError),

    /// A scalar literal that cannot be represented, e.g. an integer with too
    /// many digits for 64 bits
    #[display("{_0}")]
    #[from(ignore)]
    InvalidLiteral(#[error(not(source))] String),
}

impl ParseError {
    /// Creates a [`ParseError::UnexpectedToken`] out of the provided [`Token`].
    #[must_use]
    pub fn unexpected_token(token: Token<'_>) -> Self {
        Self::UnexpectedToken(token.to_string())
    }
}

#[doc(hidden)]
pub type ParseResult<T> = Result<Spanning<T>, Spanning<ParseError>>;

#[doc(hidden)]
pub type UnlocatedParseResult<T> = Result<T, Spanning<ParseError>>;

#[doc(hidden)]
pub type OptionParseResult<T> = Result<Option<Spanning<T>>, Spanning<ParseError>>;

/// Cursor over the fully tokenized source.
///
/// The token list always ends with [`Token::EndOfFile`], which is never
/// consumed.
#[doc(hidden)]
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Spanning<Token<'a>>>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    #[doc(hidden)]
    pub fn new(lexer: Lexer<'a>) -> Result<Self, Spanning<LexerError>> {
        Ok(Self {
            tokens: lexer.collect::<Result<_, _>>()?,
            cursor: 0,
        })
    }

    #[doc(hidden)]
    pub fn peek(&self) -> &Spanning<Token<'a>> {
        &self.tokens[self.cursor]
    }

    #[doc(hidden)]
    pub fn next_token(&mut self) -> ParseResult<Token<'a>> {
        let token = self.tokens[self.cursor];
        if token.item == Token::EndOfFile {
            Err(Spanning::new(token.span, ParseError::UnexpectedEndOfFile))
        } else {
            self.cursor += 1;
            Ok(token)
        }
    }

    fn unexpected(&mut self) -> Spanning<ParseError> {
        match self.next_token() {
            Ok(token) => token.map(ParseError::unexpected_token),
            Err(e) => e,
        }
    }

    #[doc(hidden)]
    pub fn expect(&mut self, expected: &Token) -> ParseResult<Token<'a>> {
        if &self.peek().item == expected {
            self.next_token()
        } else {
            Err(self.unexpected())
        }
    }

    #[doc(hidden)]
    pub fn skip(&mut self, expected: &Token) -> OptionParseResult<Token<'a>> {
        if &self.peek().item == expected {
            self.next_token().map(Some)
        } else if self.peek().item == Token::EndOfFile {
            Err(Spanning::zero_width(
                &self.peek().span.start,
                ParseError::UnexpectedEndOfFile,
            ))
        } else {
            Ok(None)
        }
    }

    #[doc(hidden)]
    pub fn delimited_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<Spanning<T>>>
    where
        F: Fn(&mut Parser<'a>) -> ParseResult<T>,
    {
        let start = self.expect(opening)?.span.start;
        let mut items = Vec::new();
        loop {
            if let Some(end) = self.skip(closing)? {
                return Ok(Spanning::start_end(&start, &end.end(), items));
            }
            items.push(parser(self)?);
        }
    }

    #[doc(hidden)]
    pub fn delimited_nonempty_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<T>>
    where
        F: Fn(&mut Parser<'a>) -> UnlocatedParseResult<T>,
    {
        let start = self.expect(opening)?.span.start;
        let mut items = Vec::new();
        loop {
            items.push(parser(self)?);
            if let Some(end) = self.skip(closing)? {
                return Ok(Spanning::start_end(&start, &end.end(), items));
            }
        }
    }

    #[doc(hidden)]
    pub fn expect_name(&mut self) -> ParseResult<&'a str> {
        match self.peek().item {
            Token::Name(name) => Ok(self.next_token()?.map(|_| name)),
            _ => Err(self.unexpected()),
        }
    }

    /// Consumes the name token if it equals `keyword`.
    #[doc(hidden)]
    pub fn skip_keyword(&mut self, keyword: &str) -> OptionParseResult<Token<'a>> {
        match self.peek().item {
            Token::Name(name) if name == keyword => self.next_token().map(Some),
            _ => Ok(None),
        }
    }

    #[doc(hidden)]
    pub fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Token<'a>> {
        self.skip_keyword(keyword)?
            .ok_or_else(|| self.unexpected())
    }
}
