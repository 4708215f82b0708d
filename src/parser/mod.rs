//! Query parser and language utilities
#![expect(clippy::module_inception, reason = "`parser::parser` mirrors the lexer layout")]

mod document;
mod lexer;
mod parser;
mod utils;
mod value;


pub use self::{
    document::{parse_document_source, parse_type},
    lexer::{Lexer, LexerError, ScalarToken, StringLiteral, Token},
    parser::{OptionParseResult, ParseError, ParseResult, Parser, UnlocatedParseResult},
    utils::{SourcePosition, Span, Spanning},
    value::parse_value_literal,
};
