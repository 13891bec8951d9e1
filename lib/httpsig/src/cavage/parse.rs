//!
//! Single-pass scanner for the header grammars
//!
//! Every byte is classified once and drives an explicit state transition.
//! No regular expressions, no backtracking.
//!

use super::{DigestHeader, SignatureHeader, CREATED, SIGNATURE_KEYWORD};
use miette::{Diagnostic, SourceSpan};
use std::{borrow::Cow, collections::HashSet, ops::Range};
use thiserror::Error;

const EQUAL: u8 = b'=';
const QUOTE: u8 = b'"';
const SPACE: u8 = b' ';
const COMMA: u8 = b',';
const MINUS: u8 = b'-';

#[inline]
fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

#[inline]
fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

#[inline]
fn is_algorithm_symbol(byte: u8) -> bool {
    is_letter(byte) || is_digit(byte) || byte == MINUS
}

/// Grammar violation
#[derive(Debug, Diagnostic, Error)]
#[error("{message}")]
pub struct ParseError {
    message: Cow<'static, str>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl ParseError {
    fn new<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self {
            message: message.into(),
            span: None,
        }
    }

    fn unsupported_symbol(byte: u8, expectation: &str) -> Self {
        Self::new(format!(
            "found '{}' — unsupported symbol{expectation}",
            byte.escape_ascii()
        ))
    }

    #[must_use]
    fn at(mut self, offset: usize) -> Self {
        self.span = Some((offset, 1).into());
        self
    }

    /// Human-readable description
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset into the header the error was detected at
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.span.map(|span| span.offset())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Keyword,
    Param,
    Equal,
    Quote,
    StringValue,
    IntValue,
    Div,
}

/// Transient state of one parameter-header scan
///
/// Constructed fresh for every parse, so nothing carries over between headers
struct Scanner<'a> {
    input: &'a str,
    state: State,
    keyword: Range<usize>,
    key: Range<usize>,
    value: Range<usize>,
    seen: HashSet<&'a str>,
    header: SignatureHeader<'a>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, state: State) -> Self {
        Self {
            input,
            state,
            keyword: 0..0,
            key: 0..0,
            value: 0..0,
            seen: HashSet::new(),
            header: SignatureHeader::default(),
        }
    }

    fn scan(mut self) -> Result<SignatureHeader<'a>, ParseError> {
        if self.input.is_empty() {
            return Err(ParseError::new("empty header"));
        }

        for (pos, byte) in self.input.bytes().enumerate() {
            self.state = match self.state {
                State::Keyword => self.keyword(pos, byte),
                State::Param => self.param(pos, byte),
                State::Equal => self.equal(pos, byte),
                State::Quote => self.quote(pos, byte),
                State::StringValue => self.string_value(pos, byte),
                State::IntValue => self.int_value(pos, byte),
                State::Div => self.div(pos, byte),
            }?;
        }

        self.end_of_input()?;

        // Absent `headers` means the signature covers `(created)` only
        if self.header.headers.is_empty() {
            self.header.headers.push(CREATED);
        }

        Ok(self.header)
    }

    fn keyword(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        if is_letter(byte) {
            extend(&mut self.keyword, pos);
            Ok(State::Keyword)
        } else if byte == SPACE {
            if self.keyword.is_empty() {
                return Ok(State::Keyword);
            }

            self.set_keyword().map_err(|err| err.at(self.keyword.start))?;
            Ok(State::Param)
        } else {
            Err(ParseError::unsupported_symbol(byte, " in keyword").at(pos))
        }
    }

    fn param(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        if is_letter(byte) {
            extend(&mut self.key, pos);
            Ok(State::Param)
        } else if byte == EQUAL && !self.key.is_empty() {
            Ok(self.value_state(pos))
        } else if byte == SPACE {
            if self.key.is_empty() {
                Ok(State::Param)
            } else {
                Ok(State::Equal)
            }
        } else {
            Err(ParseError::unsupported_symbol(byte, " in key").at(pos))
        }
    }

    fn equal(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        match byte {
            EQUAL => Ok(self.value_state(pos)),
            SPACE => Ok(State::Equal),
            _ => {
                Err(ParseError::unsupported_symbol(byte, ", expected '=' or space symbol").at(pos))
            }
        }
    }

    fn quote(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        match byte {
            QUOTE => {
                self.value = pos + 1..pos + 1;
                Ok(State::StringValue)
            }
            SPACE => Ok(State::Quote),
            _ => {
                Err(ParseError::unsupported_symbol(byte, ", expected '\"' or space symbol").at(pos))
            }
        }
    }

    fn string_value(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        if byte == QUOTE {
            self.value.end = pos;
            self.set_key_value(pos)?;
            Ok(State::Div)
        } else {
            Ok(State::StringValue)
        }
    }

    fn int_value(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        if is_digit(byte) {
            extend(&mut self.value, pos);
            Ok(State::IntValue)
        } else if byte == SPACE {
            if self.value.is_empty() {
                return Ok(State::IntValue);
            }

            self.set_key_value(pos)?;
            Ok(State::Div)
        } else if byte == COMMA {
            self.set_key_value(pos)?;
            Ok(State::Param)
        } else {
            Err(ParseError::unsupported_symbol(byte, " in integer value").at(pos))
        }
    }

    fn div(&mut self, pos: usize, byte: u8) -> Result<State, ParseError> {
        match byte {
            COMMA => Ok(State::Param),
            SPACE => Ok(State::Div),
            _ => {
                Err(ParseError::unsupported_symbol(byte, ", expected ',' or space symbol").at(pos))
            }
        }
    }

    fn end_of_input(&mut self) -> Result<(), ParseError> {
        let end = self.input.len();
        let message = match self.state {
            State::Keyword => {
                self.set_keyword()?;
                "unexpected end of header, expected parameter"
            }
            // Nothing but the keyword or whitespace was read
            State::Param if self.key.is_empty() && self.seen.is_empty() => {
                "unexpected end of header, expected parameter"
            }
            State::Param if self.key.is_empty() => return Ok(()),
            State::Param => "unexpected end of header, expected '=' symbol and field value",
            State::Equal => "unexpected end of header, expected field value",
            State::Quote => "unexpected end of header, expected '\"' symbol and field value",
            State::StringValue => "unexpected end of header, expected '\"' symbol",
            State::IntValue => return self.set_key_value(end),
            State::Div => return Ok(()),
        };

        Err(ParseError::new(message).at(end.saturating_sub(1)))
    }

    /// `created` and `expires` carry bare integers, everything else quoted strings
    fn value_state(&mut self, pos: usize) -> State {
        self.value = pos + 1..pos + 1;

        match &self.input[self.key.clone()] {
            "created" | "expires" => State::IntValue,
            _ => State::Quote,
        }
    }

    fn set_keyword(&mut self) -> Result<(), ParseError> {
        let keyword = &self.input[self.keyword.clone()];
        if keyword != SIGNATURE_KEYWORD {
            return Err(ParseError::new(
                "invalid Authorization header, must start from Signature keyword",
            ));
        }

        self.header.keyword = Some(SIGNATURE_KEYWORD);
        Ok(())
    }

    fn set_key_value(&mut self, pos: usize) -> Result<(), ParseError> {
        let input = self.input;
        let key = &input[self.key.clone()];
        let value = &input[self.value.clone()];

        if value.is_empty() {
            return Err(ParseError::new(format!("empty value for key '{key}'")).at(pos));
        }

        if !self.seen.insert(key) {
            return Err(ParseError::new(format!("duplicate param '{key}'")).at(self.key.start));
        }

        match key {
            "keyId" => self.header.key_id = value,
            "signature" => self.header.signature = value,
            "algorithm" => self.header.algorithm = Some(value),
            "headers" => self.header.headers = value.split_whitespace().collect(),
            "created" => self.header.created = Some(parse_timestamp(key, value, pos)?),
            "expires" => self.header.expires = Some(parse_timestamp(key, value, pos)?),
            // Unrecognised parameters are valid but carry nothing we use
            _ => {}
        }

        self.key = 0..0;
        self.value = 0..0;

        Ok(())
    }
}

#[inline]
fn extend(range: &mut Range<usize>, pos: usize) {
    if range.is_empty() {
        *range = pos..pos + 1;
    } else {
        range.end = pos + 1;
    }
}

/// Seconds since the Unix epoch, capped at `i64::MAX` to stay convertible into a `SystemTime`
fn parse_timestamp(key: &str, value: &str, pos: usize) -> Result<u64, ParseError> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|timestamp| u64::try_from(timestamp).ok())
        .ok_or_else(|| ParseError::new(format!("wrong '{key}' param value")).at(pos))
}

/// Parse a `Signature` header into its parameters
#[inline]
pub fn parse(input: &str) -> Result<SignatureHeader<'_>, ParseError> {
    Scanner::new(input, State::Param).scan()
}

/// Parse an `Authorization` header, which has to start with the `Signature` keyword
#[inline]
pub fn parse_authorization(input: &str) -> Result<SignatureHeader<'_>, ParseError> {
    Scanner::new(input, State::Keyword).scan()
}

/// Parse a `Digest` header of the form `NAME=value`
///
/// The value is everything after the first `=`, taken verbatim, so base64 padding survives
pub fn parse_digest(input: &str) -> Result<DigestHeader<'_>, ParseError> {
    if input.is_empty() {
        return Err(ParseError::new("empty digest header"));
    }

    let mut algorithm = 0..0;
    let mut value = None;

    for (pos, byte) in input.bytes().enumerate() {
        if is_algorithm_symbol(byte) {
            extend(&mut algorithm, pos);
        } else if byte == EQUAL {
            value = Some(pos + 1);
            break;
        } else {
            return Err(ParseError::unsupported_symbol(byte, " in algorithm").at(pos));
        }
    }

    let Some(value_start) = value else {
        return Err(
            ParseError::new("unexpected end of header, expected digest value").at(input.len() - 1),
        );
    };

    if algorithm.is_empty() {
        return Err(ParseError::new("empty digest algorithm").at(0));
    }

    let digest = &input[value_start..];
    if digest.is_empty() {
        return Err(ParseError::new("empty digest value").at(value_start - 1));
    }

    Ok(DigestHeader {
        algorithm: input[algorithm].to_ascii_uppercase(),
        digest,
    })
}
