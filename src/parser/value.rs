use crate::{
    ast::InputValue,
    parser::{ParseError, ParseResult, Parser, ScalarToken, Spanning, StringLiteral, Token},
};

/// Parses a value literal. Variables are rejected when `is_const` is set.
pub fn parse_value_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    match parser.peek().item {
        Token::BracketOpen => parse_list_literal(parser, is_const),
        Token::CurlyOpen => parse_object_literal(parser, is_const),
        Token::Dollar if !is_const => parse_variable_literal(parser),
        Token::Scalar(token) => {
            let span = parser.next_token()?.span;
            parse_scalar_literal(token)
                .map(|v| Spanning::new(span, v))
                .map_err(|e| Spanning::new(span, e))
        }
        Token::Name("true") => Ok(parser.next_token()?.map(|_| InputValue::Boolean(true))),
        Token::Name("false") => Ok(parser.next_token()?.map(|_| InputValue::Boolean(false))),
        Token::Name("null") => Ok(parser.next_token()?.map(|_| InputValue::Null)),
        Token::Name(name) => Ok(parser.next_token()?.map(|_| InputValue::Enum(name.into()))),
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_list_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    Ok(parser
        .delimited_list(
            &Token::BracketOpen,
            |p| parse_value_literal(p, is_const),
            &Token::BracketClose,
        )?
        .map(InputValue::List))
}

fn parse_object_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    Ok(parser
        .delimited_list(
            &Token::CurlyOpen,
            |p| parse_object_field(p, is_const),
            &Token::CurlyClose,
        )?
        .map(|items| InputValue::Object(items.into_iter().map(|s| s.item).collect())))
}

fn parse_object_field(
    parser: &mut Parser<'_>,
    is_const: bool,
) -> ParseResult<(Spanning<String>, Spanning<InputValue>)> {
    let key = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value = parse_value_literal(parser, is_const)?;

    Ok(Spanning::start_end(
        &key.start(),
        &value.end(),
        (key.map(str::to_owned), value),
    ))
}

fn parse_variable_literal(parser: &mut Parser<'_>) -> ParseResult<InputValue> {
    let start = parser.expect(&Token::Dollar)?.start();
    let name = parser.expect_name()?;

    Ok(Spanning::start_end(
        &start,
        &name.end(),
        InputValue::Variable(name.item.into()),
    ))
}

fn parse_scalar_literal(token: ScalarToken<'_>) -> Result<InputValue, ParseError> {
    match token {
        ScalarToken::Int(raw) => raw
            .parse()
            .map(InputValue::Int)
            .map_err(|_| ParseError::InvalidLiteral(format!("Integer \"{raw}\" is too large"))),
        ScalarToken::Float(raw) => raw
            .parse()
            .map(InputValue::Float)
            .map_err(|_| ParseError::InvalidLiteral(format!("Invalid float \"{raw}\""))),
        ScalarToken::String(StringLiteral::Quoted(raw)) => Ok(InputValue::String(unescape(raw))),
        ScalarToken::String(StringLiteral::Block(raw)) => {
            Ok(InputValue::String(dedent_block_string(raw)))
        }
    }
}

/// Resolves escape sequences of a quoted string. The lexer already rejected
/// malformed sequences.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                if let Some(c) = u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32)
                {
                    out.push(c);
                }
            }
            Some(c) => out.push(c),
            None => {}
        }
    }
    out
}

/// Removes the common indentation and the leading/trailing blank lines of a
/// block string, and unescapes `\"""`.
fn dedent_block_string(raw: &str) -> String {
    let raw = raw.replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();

    let is_blank = |l: &str| l.chars().all(|c| c == ' ' || c == '\t');
    let indent_of = |l: &str| l.chars().take_while(|&c| c == ' ' || c == '\t').count();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|l| !is_blank(l))
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    let mut lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, &l)| {
            if i == 0 {
                l
            } else {
                l.get(common_indent.min(indent_of(l))..).unwrap_or_default()
            }
        })
        .collect();

    while lines.first().is_some_and(|l| is_blank(l)) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| is_blank(l)) {
        lines.pop();
    }
    lines.join("\n")
}
