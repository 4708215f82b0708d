use std::borrow::Cow;

use crate::{
    ast::{
        Arguments, Definition, Directive, Document, Field, Fragment, FragmentSpread,
        InlineFragment, Operation, OperationType, Selection, Type, VariableDefinition,
        VariableDefinitions,
    },
    parser::{
        Lexer, OptionParseResult, ParseError, ParseResult, Parser, Spanning, Token,
        UnlocatedParseResult, value::parse_value_literal,
    },
};

/// Parses an executable document (operations and fragments) from `source`.
///
/// Parsing does not consult any schema: type names and field names are kept
/// as written and checked later by validation and execution.
pub fn parse_document_source(source: &str) -> UnlocatedParseResult<Document<'_>> {
    let mut parser = Parser::new(Lexer::new(source)).map_err(|e| e.map(ParseError::LexerError))?;
    parse_document(&mut parser)
}

fn parse_document<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Document<'a>> {
    let mut defs = Vec::new();
    loop {
        defs.push(parse_definition(parser)?);
        if parser.peek().item == Token::EndOfFile {
            return Ok(defs);
        }
    }
}

fn parse_definition<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Definition<'a>> {
    match parser.peek().item {
        Token::CurlyOpen
        | Token::Name("query")
        | Token::Name("mutation")
        | Token::Name("subscription") => {
            parse_operation_definition(parser).map(Definition::Operation)
        }
        Token::Name("fragment") => parse_fragment_definition(parser).map(Definition::Fragment),
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_operation_definition<'a>(parser: &mut Parser<'a>) -> ParseResult<Operation<'a>> {
    if parser.peek().item == Token::CurlyOpen {
        let selection_set = parse_selection_set(parser)?;
        return Ok(selection_set.map(|selection_set| Operation {
            operation_type: OperationType::Query,
            name: None,
            variable_definitions: None,
            directives: None,
            selection_set,
        }));
    }

    let start = parser.peek().span.start;
    let operation_type = parse_operation_type(parser)?;
    let name = match parser.peek().item {
        Token::Name(_) => Some(parser.expect_name()?),
        _ => None,
    };
    let variable_definitions = parse_variable_definitions(parser)?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_selection_set(parser)?;

    Ok(Spanning::start_end(
        &start,
        &selection_set.end(),
        Operation {
            operation_type: operation_type.item,
            name,
            variable_definitions,
            directives: directives.map(|d| d.item),
            selection_set: selection_set.item,
        },
    ))
}

fn parse_fragment_definition<'a>(parser: &mut Parser<'a>) -> ParseResult<Fragment<'a>> {
    let start = parser.expect_keyword("fragment")?.start();
    let name = parser.expect_name()?;
    if name.item == "on" {
        return Err(name.map(|_| ParseError::UnexpectedToken("on".into())));
    }

    let variable_definitions = parse_variable_definitions(parser)?;
    parser.expect_keyword("on")?;
    let type_condition = parser.expect_name()?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_selection_set(parser)?;

    Ok(Spanning::start_end(
        &start,
        &selection_set.end(),
        Fragment {
            name,
            variable_definitions,
            type_condition,
            directives: directives.map(|d| d.item),
            selection_set: selection_set.item,
        },
    ))
}

fn parse_optional_selection_set<'a>(
    parser: &mut Parser<'a>,
) -> OptionParseResult<Vec<Selection<'a>>> {
    if parser.peek().item == Token::CurlyOpen {
        parse_selection_set(parser).map(Some)
    } else {
        Ok(None)
    }
}

fn parse_selection_set<'a>(parser: &mut Parser<'a>) -> ParseResult<Vec<Selection<'a>>> {
    parser.delimited_nonempty_list(&Token::CurlyOpen, parse_selection, &Token::CurlyClose)
}

fn parse_selection<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Selection<'a>> {
    match parser.peek().item {
        Token::Ellipsis => parse_fragment(parser),
        _ => parse_field(parser).map(Selection::Field),
    }
}

fn parse_fragment<'a>(parser: &mut Parser<'a>) -> UnlocatedParseResult<Selection<'a>> {
    let start = parser.expect(&Token::Ellipsis)?.start();

    match parser.peek().item {
        Token::Name("on") => {
            parser.next_token()?;
            let type_condition = parser.expect_name()?;
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                &start,
                &selection_set.end(),
                InlineFragment {
                    type_condition: Some(type_condition),
                    directives: directives.map(|d| d.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::CurlyOpen | Token::At => {
            let directives = parse_directives(parser)?;
            let selection_set = parse_selection_set(parser)?;

            Ok(Selection::InlineFragment(Spanning::start_end(
                &start,
                &selection_set.end(),
                InlineFragment {
                    type_condition: None,
                    directives: directives.map(|d| d.item),
                    selection_set: selection_set.item,
                },
            )))
        }
        Token::Name(_) => {
            let name = parser.expect_name()?;
            let arguments = parse_arguments(parser)?;
            let directives = parse_directives(parser)?;
            let end = directives
                .as_ref()
                .map(Spanning::end)
                .or_else(|| arguments.as_ref().map(Spanning::end))
                .unwrap_or_else(|| name.end());

            Ok(Selection::FragmentSpread(Spanning::start_end(
                &start,
                &end,
                FragmentSpread {
                    name,
                    arguments,
                    directives: directives.map(|d| d.item),
                },
            )))
        }
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_field<'a>(parser: &mut Parser<'a>) -> ParseResult<Field<'a>> {
    let first = parser.expect_name()?;
    let (alias, name) = if parser.skip(&Token::Colon)?.is_some() {
        (Some(first), parser.expect_name()?)
    } else {
        (None, first)
    };

    let arguments = parse_arguments(parser)?;
    let directives = parse_directives(parser)?;
    let selection_set = parse_optional_selection_set(parser)?;

    let start = alias.as_ref().unwrap_or(&name).start();
    let end = selection_set
        .as_ref()
        .map(Spanning::end)
        .or_else(|| directives.as_ref().map(Spanning::end))
        .or_else(|| arguments.as_ref().map(Spanning::end))
        .unwrap_or_else(|| name.end());

    Ok(Spanning::start_end(
        &start,
        &end,
        Field {
            alias,
            name,
            arguments,
            directives: directives.map(|d| d.item),
            selection_set: selection_set.map(|s| s.item),
        },
    ))
}

fn parse_arguments<'a>(parser: &mut Parser<'a>) -> OptionParseResult<Arguments<'a>> {
    if parser.peek().item != Token::ParenOpen {
        return Ok(None);
    }
    parser
        .delimited_nonempty_list(&Token::ParenOpen, parse_argument, &Token::ParenClose)
        .map(|args| Some(args.map(|items| Arguments { items })))
}

fn parse_argument<'a>(
    parser: &mut Parser<'a>,
) -> UnlocatedParseResult<(Spanning<&'a str>, Spanning<crate::ast::InputValue>)> {
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let value = parse_value_literal(parser, false)?;
    Ok((name, value))
}

fn parse_operation_type(parser: &mut Parser<'_>) -> ParseResult<OperationType> {
    match parser.peek().item {
        Token::Name("query") => Ok(parser.next_token()?.map(|_| OperationType::Query)),
        Token::Name("mutation") => Ok(parser.next_token()?.map(|_| OperationType::Mutation)),
        Token::Name("subscription") => {
            Ok(parser.next_token()?.map(|_| OperationType::Subscription))
        }
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_variable_definitions<'a>(
    parser: &mut Parser<'a>,
) -> OptionParseResult<VariableDefinitions<'a>> {
    if parser.peek().item != Token::ParenOpen {
        return Ok(None);
    }
    parser
        .delimited_nonempty_list(
            &Token::ParenOpen,
            parse_variable_definition,
            &Token::ParenClose,
        )
        .map(|defs| Some(defs.map(|items| VariableDefinitions { items })))
}

fn parse_variable_definition<'a>(
    parser: &mut Parser<'a>,
) -> UnlocatedParseResult<(Spanning<&'a str>, VariableDefinition<'a>)> {
    let start = parser.expect(&Token::Dollar)?.start();
    let name = parser.expect_name()?;
    parser.expect(&Token::Colon)?;
    let var_type = parse_type(parser)?;

    let default_value = if parser.skip(&Token::Equals)?.is_some() {
        Some(parse_value_literal(parser, true)?)
    } else {
        None
    };
    let directives = parse_directives(parser)?;

    Ok((
        Spanning::start_end(&start, &name.end(), name.item),
        VariableDefinition {
            var_type,
            default_value,
            directives: directives.map(|d| d.item),
        },
    ))
}

fn parse_directives<'a>(parser: &mut Parser<'a>) -> OptionParseResult<Vec<Spanning<Directive<'a>>>> {
    if parser.peek().item != Token::At {
        return Ok(None);
    }

    let mut items = Vec::new();
    while parser.peek().item == Token::At {
        items.push(parse_directive(parser)?);
    }
    let start = items[0].start();
    let end = items[items.len() - 1].end();
    Ok(Some(Spanning::start_end(&start, &end, items)))
}

fn parse_directive<'a>(parser: &mut Parser<'a>) -> ParseResult<Directive<'a>> {
    let start = parser.expect(&Token::At)?.start();
    let name = parser.expect_name()?;
    let arguments = parse_arguments(parser)?;
    let end = arguments.as_ref().map_or_else(|| name.end(), Spanning::end);

    Ok(Spanning::start_end(
        &start,
        &end,
        Directive { name, arguments },
    ))
}

/// Parses a type reference such as `[Int!]!`.
pub fn parse_type<'a>(parser: &mut Parser<'a>) -> ParseResult<Type<'a>> {
    let parsed = if let Some(open) = parser.skip(&Token::BracketOpen)? {
        let inner = parse_type(parser)?;
        let end = parser.expect(&Token::BracketClose)?.end();
        Spanning::start_end(&open.start(), &end, Type::list(inner.item))
    } else {
        parser.expect_name()?.map(|n| Type::Named(Cow::Borrowed(n)))
    };

    match parser.peek().item {
        Token::ExclamationMark => {
            let end = parser.next_token()?.end();
            Ok(Spanning::start_end(&parsed.start(), &end, parsed.item.non_null()))
        }
        _ => Ok(parsed),
    }
}
