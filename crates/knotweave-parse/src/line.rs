//! Parsing of single choice (`* ...`) and text block (`- ...`) lines.
//!
//! A choice line has the shape
//!
//! ```text
//! * {condition} label ~ name = bool ~ name = bool -> target
//! ```
//!
//! where every part is optional. Parts are taken off right to left: the
//! target first, then the state changes, then the condition; whatever is
//! left is the label.

use knotweave_core::{Choice, Condition, Destination, Mutation, TextBlock};

use crate::error::{ParseError, Result};

/// Parse a choice line, with or without its leading `*`.
pub fn parse_choice(text: &str, line: usize) -> Result<Choice> {
    let mut remainder = text.trim().strip_prefix('*').unwrap_or(text).trim().to_string();
    let mut choice = Choice::default();

    if let Some((left, right)) = remainder.split_once("->") {
        let target = right.trim();
        choice.destination = match target.strip_prefix('.') {
            Some(tag) if tag.trim().is_empty() => return Err(ParseError::EmptyAnchor { line }),
            Some(_) => Destination::Anchor(target.to_string()),
            None if target.is_empty() => return Err(ParseError::EmptyTarget { line }),
            None => Destination::Unit(target.to_string()),
        };
        remainder = left.trim().to_string();
    }

    if let Some((left, changes)) = remainder.split_once('~') {
        for change in changes.split('~').map(str::trim).filter(|c| !c.is_empty()) {
            let mutation: Mutation = change
                .parse()
                .map_err(|source| ParseError::Mutation { line, source })?;
            choice.mutations.push(mutation);
        }
        remainder = left.trim().to_string();
    }

    let (condition, label) = extract_condition(&remainder, line)?;
    choice.condition = condition;
    choice.label = label;

    if choice.label.is_empty()
        && choice.mutations.is_empty()
        && choice.destination == Destination::Stay
    {
        return Err(ParseError::EmptyChoice { line });
    }
    Ok(choice)
}

/// Parse a conditional text block line, with or without its leading `-`.
pub fn parse_text_block(text: &str, line: usize) -> Result<TextBlock> {
    let remainder = text.trim().strip_prefix('-').unwrap_or(text).trim();
    let (condition, content) = extract_condition(remainder, line)?;
    Ok(TextBlock { condition, content })
}

/// Cut the first `{...}` out of `text`, returning the parsed condition and
/// the rest of the text, trimmed.
fn extract_condition(text: &str, line: usize) -> Result<(Condition, String)> {
    let Some(start) = text.find('{') else {
        return Ok((Condition::always(), text.trim().to_string()));
    };
    let end = match text.find('}') {
        Some(end) if end > start => end,
        _ => return Err(ParseError::MismatchedBraces { line }),
    };
    let condition = Condition::parse(&text[start + 1..end])
        .map_err(|source| ParseError::Condition { line, source })?;
    let rest = format!("{}{}", &text[..start], &text[end + 1..]);
    Ok((condition, rest.trim().to_string()))
}
