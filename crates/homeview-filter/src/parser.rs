//! Filter grammar parser using nom
//!
//! Grammar:
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr ('||' and_expr)*
//! and_expr   := not_expr ('&&' not_expr)*
//! not_expr   := '!' not_expr | atom
//! atom       := 'all' | 'none' | '(' expr ')' | membership | comparison
//! membership := field 'in' '[' literal (',' literal)* ']'
//! comparison := field op literal
//! op         := '<' | '<=' | '>' | '>=' | '==' | '!='
//! literal    := number | string
//! ```

use crate::ast::*;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{map, not, recognize, value},
    multi::{many0, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use thiserror::Error;

/// Parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unexpected characters at end: '{0}'")]
    TrailingInput(String),
}

/// Parse a filter expression from a string
///
/// Blank input selects every row.
pub fn parse_filter(input: &str) -> Result<FilterExpr, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(FilterExpr::All);
    }

    match expr(input) {
        Ok(("", result)) => Ok(result),
        Ok((remaining, _)) => Err(ParseError::TrailingInput(remaining.to_string())),
        Err(e) => Err(ParseError::Parse(format!("{:?}", e))),
    }
}

/// Parse whitespace
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn expr(input: &str) -> IResult<&str, FilterExpr> {
    or_expr(input)
}

fn or_expr(input: &str) -> IResult<&str, FilterExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("||")), and_expr))(input)?;

    Ok((input, rest.into_iter().fold(first, FilterExpr::or)))
}

fn and_expr(input: &str) -> IResult<&str, FilterExpr> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("&&")), not_expr))(input)?;

    Ok((input, rest.into_iter().fold(first, FilterExpr::and)))
}

fn not_expr(input: &str) -> IResult<&str, FilterExpr> {
    alt((
        map(preceded(ws(char('!')), not_expr), FilterExpr::not),
        atom,
    ))(input)
}

fn atom(input: &str) -> IResult<&str, FilterExpr> {
    ws(alt((
        value(FilterExpr::All, keyword("all")),
        value(FilterExpr::None, keyword("none")),
        delimited(char('('), expr, ws(char(')'))),
        membership,
        comparison,
    )))(input)
}

/// A keyword not followed by more identifier characters
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}

fn membership(input: &str) -> IResult<&str, FilterExpr> {
    let (input, field) = identifier(input)?;
    let (input, _) = ws(keyword("in"))(input)?;
    let (input, values) = delimited(
        char('['),
        separated_list0(ws(char(',')), ws(literal)),
        char(']'),
    )(input)?;

    Ok((
        input,
        FilterExpr::In {
            field: field.to_string(),
            values,
        },
    ))
}

fn comparison(input: &str) -> IResult<&str, FilterExpr> {
    let (input, field) = identifier(input)?;
    let (input, op) = ws(comparison_op)(input)?;
    let (input, value) = literal(input)?;

    Ok((
        input,
        FilterExpr::Compare {
            field: field.to_string(),
            op,
            value,
        },
    ))
}

fn comparison_op(input: &str) -> IResult<&str, ComparisonOp> {
    alt((
        value(ComparisonOp::Le, tag("<=")),
        value(ComparisonOp::Ge, tag(">=")),
        value(ComparisonOp::Eq, tag("==")),
        value(ComparisonOp::Ne, tag("!=")),
        value(ComparisonOp::Lt, tag("<")),
        value(ComparisonOp::Gt, tag(">")),
    ))(input)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(double, Literal::Number),
        map(string_literal, |s| Literal::Text(s.to_string())),
    ))(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse an identifier (starts with letter or underscore, followed by alphanumeric or underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

fn string_literal(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))(input)
}
