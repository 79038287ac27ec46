//! A `nom`-based parser for the JPath path language.
use super::ast::{CompareOp, Path, PathSegment, Predicate};
use crate::error::JPathError;
use crate::functions::ModifierRegistry;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{eof, map, opt, peek, value},
    error::{Error, ErrorKind},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, terminated},
};
use serde_json::{Value, json};

// --- Main Public Parser ---

pub fn parse_path(input: &str) -> Result<Path, JPathError> {
    if input.is_empty() {
        return Err(JPathError::EmptyPath);
    }
    let segments = match separated_list1(char('.'), segment).parse(input) {
        Ok(("", segments)) => segments,
        Ok((rem, _)) => {
            return Err(JPathError::JPathParse(
                input.to_string(),
                format!("Parser did not consume all input. Remainder: '{}'", rem),
            ));
        }
        Err(e) => return Err(JPathError::JPathParse(input.to_string(), e.to_string())),
    };

    for segment in &segments {
        if let PathSegment::Modifier(name) = segment {
            if ModifierRegistry::builtins().get(name).is_none() {
                return Err(JPathError::UnknownModifier(name.clone()));
            }
        }
    }
    Ok(Path { segments })
}

// --- Segment Parsers ---

fn segment(input: &str) -> IResult<&str, PathSegment> {
    alt((query, hash, modifier, key)).parse(input)
}

fn hash(input: &str) -> IResult<&str, PathSegment> {
    map(terminated(char('#'), peek(alt((eof, tag("."))))), |_| {
        PathSegment::Hash
    })
    .parse(input)
}

fn modifier(input: &str) -> IResult<&str, PathSegment> {
    map(
        preceded(
            char('@'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        ),
        |name: &str| PathSegment::Modifier(name.to_string()),
    )
    .parse(input)
}

/// A plain or wildcard key. `\` escapes the next character.
fn key(input: &str) -> IResult<&str, PathSegment> {
    // A malformed query must not be swallowed as a key.
    if input.starts_with("#(") {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)));
    }
    let mut literal = String::new();
    let mut pattern = String::new();
    let mut has_wildcard = false;
    let mut end = input.len();
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '.' => {
                end = idx;
                break;
            }
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(nom::Err::Error(Error::new(&input[idx..], ErrorKind::Escaped)));
                };
                literal.push(escaped);
                pattern.push('\\');
                pattern.push(escaped);
            }
            '*' | '?' => {
                has_wildcard = true;
                literal.push(c);
                pattern.push(c);
            }
            _ => {
                literal.push(c);
                pattern.push(c);
            }
        }
    }

    if end == 0 {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }
    let segment = if has_wildcard {
        PathSegment::Pattern(pattern)
    } else {
        PathSegment::Key(literal)
    };
    Ok((&input[end..], segment))
}

// --- Query Parsers ---

fn query(input: &str) -> IResult<&str, PathSegment> {
    map(
        (delimited(tag("#("), predicate, char(')')), opt(char('#'))),
        |(predicate, all)| PathSegment::Query {
            predicate,
            all: all.is_some(),
        },
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    map(
        (ws(opt(field_path)), ws(compare_op), ws(literal)),
        |(field, op, literal)| Predicate {
            field: field.unwrap_or_default(),
            op,
            value: literal,
        },
    )
    .parse(input)
}

fn is_field_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '.' | '=' | '!' | '<' | '>' | '%' | '(' | ')' | '"')
}

fn field_path(input: &str) -> IResult<&str, Vec<PathSegment>> {
    separated_list1(
        char('.'),
        map(take_while1(is_field_char), |s: &str| {
            PathSegment::Key(s.to_string())
        }),
    )
    .parse(input)
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    alt((
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
        value(CompareOp::Like, tag("%")),
    ))
    .parse(input)
}

// --- Literal Parsers ---

fn boolean(input: &str) -> IResult<&str, Value> {
    alt((
        map(tag("true"), |_| json!(true)),
        map(tag("false"), |_| json!(false)),
    ))
    .parse(input)
}

fn null(input: &str) -> IResult<&str, Value> {
    map(tag("null"), |_| json!(null)).parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Value> {
    map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        |s: &str| json!(s),
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    map(double, |n: f64| json!(n)).parse(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((null, boolean, string_literal, number)).parse(input)
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}
