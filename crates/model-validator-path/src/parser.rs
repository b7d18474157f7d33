//! Address text parser.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::types::{AddressError, Segment};

/// Parse address text into segments.
///
/// Only the first segment may omit its field name, which allows addressing
/// into a root-level array (`[*].name`).
pub fn parse_address(input: &str) -> Result<Vec<Segment>, AddressError> {
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    let mut segments = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut first = true;

    loop {
        let start = position(&mut chars, input);

        let mut name = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if matches!(c, '.' | '[' | ']') {
                break;
            }
            name.push(c);
            chars.next();
        }
        let named = !name.is_empty();
        if named {
            segments.push(Segment::Field(name));
        }

        let mut brackets = 0usize;
        while let Some(&(open, '[')) = chars.peek() {
            chars.next();
            segments.push(parse_bracket(&mut chars, open)?);
            brackets += 1;
        }

        if !named && (brackets == 0 || !first) {
            return Err(AddressError::EmptySegment { position: start });
        }
        first = false;

        match chars.next() {
            None => break,
            Some((_, '.')) => continue,
            Some((position, ch)) => return Err(AddressError::UnexpectedChar { position, ch }),
        }
    }

    Ok(segments)
}

fn position(chars: &mut Peekable<CharIndices<'_>>, input: &str) -> usize {
    chars.peek().map(|&(i, _)| i).unwrap_or(input.len())
}

fn parse_bracket(
    chars: &mut Peekable<CharIndices<'_>>,
    open: usize,
) -> Result<Segment, AddressError> {
    let mut inner = String::new();
    let mut closed = false;
    for (_, c) in chars.by_ref() {
        if c == ']' {
            closed = true;
            break;
        }
        inner.push(c);
    }
    if !closed {
        return Err(AddressError::UnclosedBracket { position: open });
    }

    match inner.as_str() {
        "" => Ok(Segment::Whole),
        "*" => Ok(Segment::Each),
        digits if digits.bytes().all(|b| b.is_ascii_digit()) => digits
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| AddressError::InvalidIndex {
                position: open,
                text: inner.clone(),
            }),
        _ => Err(AddressError::InvalidIndex {
            position: open,
            text: inner.clone(),
        }),
    }
}
