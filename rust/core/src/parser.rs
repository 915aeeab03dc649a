// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP entity-line parser using nom
//!
//! Tokenizes one `#id=TYPE(...);` record at a time, zero-copy.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// A STEP attribute token, borrowing from the input buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text'
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Float: 3.14, 1.5E-10, 0.
    Float(f64),
    /// Enum: .TRUE., .ELEMENT.
    Enum(&'a str),
    /// List: (1,2,3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCLABEL('x')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Derived value: *
    Derived,
}

fn entity_ref(input: &str) -> IResult<&str, Token<'_>> {
    map(
        preceded(char('#'), map_res(digit1, str::parse::<u32>)),
        Token::EntityRef,
    )(input)
}

/// String content up to an unescaped closing quote ('' escapes a quote)
fn quoted_content(input: &str, quote: u8) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == quote {
            if i + 1 < bytes.len() && bytes[i + 1] == quote {
                i += 2;
                continue;
            }
            return Ok((&input[i..], &input[..i]));
        }
        i += 1;
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn string_literal(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(char('\''), |i| quoted_content(i, b'\''), char('\'')),
        Token::String,
    )(input)
}

fn integer(input: &str) -> IResult<&str, Token<'_>> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// STEP floats may omit decimal digits ("0.") and carry an exponent
fn float(input: &str) -> IResult<&str, Token<'_>> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>().map(Token::Float),
    )(input)
}

fn enum_value(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(char('.'), ident, char('.')),
        Token::Enum,
    )(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn typed_value(input: &str) -> IResult<&str, Token<'_>> {
    map(pair(ident, token_list), |(name, args)| {
        Token::TypedValue(name, args)
    })(input)
}

fn ws(input: &str) -> IResult<&str, ()> {
    map(take_while(|c: char| c.is_whitespace()), |_| ())(input)
}

/// Parenthesized, comma-separated tokens
fn token_list(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    delimited(
        char('('),
        separated_list0(delimited(ws, char(','), ws), token),
        char(')'),
    )(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    delimited(
        ws,
        alt((
            float, // before integer: float includes '.'
            integer,
            entity_ref,
            string_literal,
            enum_value,
            map(token_list, Token::List),
            typed_value,
            map(char('$'), |_| Token::Null),
            map(char('*'), |_| Token::Derived),
        )),
        ws,
    )(input)
}

/// Parse a complete entity record.
///
/// Example: `#123=IFCWALL('guid',$,$,$,'name',$,$,$);`
/// Returns the id, the raw type name and the attribute tokens. The type
/// name is returned verbatim so unknown kinds round-trip unchanged.
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<Token<'_>>)> {
    let result: IResult<&str, (u32, &str, Vec<Token<'_>>)> = tuple((
        delimited(
            ws,
            preceded(char('#'), map_res(digit1, str::parse::<u32>)),
            ws,
        ),
        preceded(char('='), delimited(ws, ident, ws)),
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            tuple((char(')'), ws, char(';'))),
        ),
    ))(input);

    match result {
        Ok((_, parsed)) => Ok(parsed),
        Err(e) => {
            let id = input
                .trim_start()
                .strip_prefix('#')
                .and_then(|rest| {
                    rest.split(|c: char| !c.is_ascii_digit())
                        .next()?
                        .parse()
                        .ok()
                })
                .unwrap_or(0);
            Err(Error::parse(id, format!("{e}")))
        }
    }
}
