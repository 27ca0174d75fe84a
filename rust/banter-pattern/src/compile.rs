//! The pattern compiler — definition string to element list.
//!
//! Compilation is pure syntax-to-structure translation; it never inspects a
//! token stream. The grammar, one element per whitespace-separated unit:
//!
//! ```text
//! pattern     = unit (' ' unit)*
//! unit        = category | variable | literal
//! category    = '[' name ('|' restriction? capture?)? ']'
//! restriction = pos-tag ('*' | '?')?
//! capture     = '#' name
//! variable    = '$' name ('*' | '?')?
//! literal     = any other unit, verbatim
//! style       = pair (';' pair)*
//! pair        = key '=' value
//! ```

use std::collections::BTreeMap;

use crate::element::{PatternDefinition, PatternElement, PosRestriction, Quantifier};
use crate::error::CompileError;

/// Compile a pattern definition string and an optional style string.
///
/// The `id` identifies the authored template in error reports and in match
/// results; several patterns may share one id.
///
/// # Example
///
/// ```
/// use banter_pattern::compile;
///
/// let def = compile("greet", "hello $name? [friend]", Some("mood=warm")).unwrap();
/// assert_eq!(def.elements.len(), 3);
/// assert_eq!(def.style.get("mood").map(String::as_str), Some("warm"));
/// assert_eq!(def.to_string(), "hello $name? [friend]");
/// ```
pub fn compile(
    id: &str,
    pattern_text: &str,
    style_text: Option<&str>,
) -> Result<PatternDefinition, CompileError> {
    let mut elements = Vec::new();
    for unit in pattern_text.split_whitespace() {
        elements.push(compile_unit(id, unit)?);
    }
    if elements.is_empty() {
        return Err(CompileError::EmptyPattern { id: id.to_string() });
    }
    for pair in elements.windows(2) {
        if pair[0].is_unbounded() && pair[1].is_unbounded() {
            return Err(CompileError::AdjacentUnbounded { id: id.to_string() });
        }
    }

    Ok(PatternDefinition {
        id: id.to_string(),
        elements,
        style: compile_style(id, style_text)?,
    })
}

fn compile_unit(id: &str, unit: &str) -> Result<PatternElement, CompileError> {
    if let Some(rest) = unit.strip_prefix('[') {
        let Some(body) = rest.strip_suffix(']') else {
            return Err(CompileError::UnterminatedBracket {
                id: id.to_string(),
                unit: unit.to_string(),
            });
        };
        return compile_category(id, unit, body);
    }

    if let Some(body) = unit.strip_prefix('$') {
        let (name, quantifier) = split_quantifier(body);
        if name.is_empty() {
            return Err(CompileError::EmptyVariable {
                id: id.to_string(),
                unit: unit.to_string(),
            });
        }
        return Ok(PatternElement::Variable {
            name: name.to_string(),
            quantifier,
        });
    }

    Ok(PatternElement::Literal(unit.to_string()))
}

/// Parse the inside of a bracket element: `name`, or `name|restriction`,
/// where the restriction may end in a `#capture` suffix.
fn compile_category(id: &str, unit: &str, body: &str) -> Result<PatternElement, CompileError> {
    let (name, tail) = match body.split_once('|') {
        Some((name, tail)) => (name, Some(tail)),
        None => (body, None),
    };
    if name.is_empty() {
        return Err(CompileError::EmptyCategory {
            id: id.to_string(),
            unit: unit.to_string(),
        });
    }

    let mut restriction = None;
    let mut capture = None;
    if let Some(tail) = tail {
        let tail = match tail.split_once('#') {
            Some((rest, capture_name)) => {
                if capture_name.is_empty() {
                    return Err(CompileError::EmptyCapture {
                        id: id.to_string(),
                        unit: unit.to_string(),
                    });
                }
                capture = Some(capture_name.to_string());
                rest
            }
            None => tail,
        };
        let (tag, quantifier) = split_quantifier(tail);
        // A tail that is only a capture (`[name|#attr]`) carries no
        // restriction at all.
        if !tag.is_empty() || quantifier != Quantifier::One {
            restriction = Some(PosRestriction {
                tag: tag.to_string(),
                quantifier,
            });
        }
    }

    Ok(PatternElement::Category {
        name: name.to_string(),
        restriction,
        capture,
    })
}

/// Split a trailing quantifier sigil off a unit body.
fn split_quantifier(body: &str) -> (&str, Quantifier) {
    if let Some(name) = body.strip_suffix('*') {
        (name, Quantifier::Star)
    } else if let Some(name) = body.strip_suffix('?') {
        (name, Quantifier::Optional)
    } else {
        (body, Quantifier::One)
    }
}

/// Parse a style string into key/value pairs.
///
/// Pairs are separated by `;`, keys and values are trimmed. Empty pieces
/// (trailing or doubled separators) are skipped; a non-empty piece with no
/// `=` is an error.
fn compile_style(
    id: &str,
    style_text: Option<&str>,
) -> Result<BTreeMap<String, String>, CompileError> {
    let mut style = BTreeMap::new();
    let Some(text) = style_text else {
        return Ok(style);
    };
    for piece in text.split(';') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let Some((key, value)) = piece.split_once('=') else {
            return Err(CompileError::MalformedStyle {
                id: id.to_string(),
                pair: piece.to_string(),
            });
        };
        style.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(style)
}
