use std::collections::HashMap;

use crate::ast::NodeKind;
use crate::cursor::Cursor;
use crate::decimal::Decimal;
use crate::error::{ParseError, Result};

const DIGITS: &str = "0123456789";
/// Characters that end the name part of an argument entry.
const ARG_NAME_BREAKERS: &str = "0123456789+-*";

/// The decomposed annotation of a node: derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInformation {
    /// Contents before the first digit (atomic nodes only).
    pub prefix: String,
    /// The first maximal digit run; empty when the token has no index.
    pub index_string: String,
    /// Contents after the index, up to `*` or `:`.
    pub suffix: String,
    /// Contents after `*` but before `:`; defaults to 1.
    pub repetition: usize,
    /// Final contents after `:`, kept verbatim for the argument parser.
    pub arg_source: String,
}

impl Default for ElementInformation {
    fn default() -> Self {
        ElementInformation {
            prefix: String::new(),
            index_string: String::new(),
            suffix: String::new(),
            repetition: 1,
            arg_source: String::new(),
        }
    }
}

enum InformationPart {
    Prefix,
    Index,
    Suffix,
    Repetition,
    Args,
}

/// Decompose a node's annotation string into its parts.
///
/// Atomic nodes scan from the prefix; composite nodes have no prefix or
/// index and start directly at the suffix. Pure: the same input always
/// yields the same result.
pub fn divide_information(kind: NodeKind, information: &str) -> Result<ElementInformation> {
    let mut info = ElementInformation::default();
    if information.is_empty() {
        return Ok(info);
    }

    let mut part = match kind {
        NodeKind::Atomic => InformationPart::Prefix,
        NodeKind::Section | NodeKind::Alternation => InformationPart::Suffix,
    };
    let mut cursor = Cursor::new(information);

    loop {
        match part {
            InformationPart::Prefix => {
                if !cursor.contains_any(DIGITS) {
                    // No index at all is allowed; the whole string is suffix.
                    part = InformationPart::Suffix;
                } else {
                    info.prefix = cursor.get_until(DIGITS);
                    part = InformationPart::Index;
                }
            }
            InformationPart::Index => {
                info.index_string = cursor.get_while(DIGITS);
                part = InformationPart::Suffix;
            }
            InformationPart::Suffix => {
                let remaining = cursor.get_remaining();
                let star = remaining.find('*');
                let colon = remaining.find(':');

                // '*' can also appear inside argument values, so it only
                // counts as a repetition marker before any ':'.
                let star_first = match (star, colon) {
                    (Some(s), Some(c)) => s < c,
                    (Some(_), None) => true,
                    _ => false,
                };

                if star_first {
                    info.suffix = cursor.get_until("*");
                    cursor.move_past_next("*");
                    part = InformationPart::Repetition;
                } else if colon.is_some() {
                    info.suffix = cursor.get_until(":");
                    cursor.move_past_next(":");
                    part = InformationPart::Args;
                } else {
                    info.suffix = remaining;
                    break;
                }
            }
            InformationPart::Repetition => {
                let remaining = cursor.get_remaining();
                if remaining.contains(':') {
                    let count = cursor.get_until(":");
                    info.repetition = parse_repetition(&count)?;
                    cursor.move_past_next(":");
                    part = InformationPart::Args;
                } else if !remaining.is_empty() {
                    info.repetition = parse_repetition(&remaining)?;
                    break;
                } else {
                    // Bare trailing '*': keep the default of 1.
                    break;
                }
            }
            InformationPart::Args => {
                if !cursor.is_done() {
                    info.arg_source = cursor.get_remaining();
                }
                break;
            }
        }
    }

    Ok(info)
}

fn parse_repetition(source: &str) -> Result<usize> {
    let error = || ParseError::InvalidRepetition {
        value: source.to_string(),
    };
    let count: usize = source.parse().map_err(|_| error())?;
    if count == 0 {
        // A zero repeat on an alternation would stall expansion.
        return Err(error());
    }
    Ok(count)
}

/// Combination operator carried by a [`DynamicArg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgOperator {
    /// No operator written: overwrites any running value.
    #[default]
    Assign,
    /// `+`: adds to the running value; taken as-is when first.
    Add,
    /// `-`: negates when first; multiplies afterwards, exactly like `*`.
    Subtract,
    /// `*`: multiplies the running value.
    Multiply,
}

/// An argument value before folding: a decimal, its operator, and an
/// optional reference to another argument's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicArg {
    pub value: Decimal,
    pub operator: ArgOperator,
    pub reference: Option<String>,
}

impl DynamicArg {
    pub fn plain(value: Decimal) -> Self {
        DynamicArg {
            value,
            operator: ArgOperator::Assign,
            reference: None,
        }
    }
}

/// Parse a comma-separated argument source like `0.2,sus+0.5,amp*2` into
/// named [`DynamicArg`]s.
///
/// A nameless entry is only legal while no argument has been stored yet and
/// is implicitly named `time`. Names found in `aliases` are substituted.
/// Later entries overwrite earlier ones sharing a key.
pub fn parse_args(
    arg_source: &str,
    aliases: &HashMap<String, String>,
) -> Result<HashMap<String, DynamicArg>> {
    let mut args = HashMap::new();
    let mut cursor = Cursor::new(arg_source);

    loop {
        let entry = cursor.get_until(",");
        if !entry.is_empty() {
            parse_entry(&entry, aliases, &mut args)?;
        }
        cursor.move_past_next(",");
        if cursor.is_done() {
            break;
        }
    }

    Ok(args)
}

fn parse_entry(
    entry: &str,
    aliases: &HashMap<String, String>,
    args: &mut HashMap<String, DynamicArg>,
) -> Result<()> {
    let mut cursor = Cursor::new(entry);
    let name = cursor.get_until(ARG_NAME_BREAKERS);
    let numeric = cursor.get_remaining();

    // A name with nothing after it contributes no argument.
    if numeric.is_empty() {
        return Ok(());
    }

    let (operator, literal) = match numeric.chars().next() {
        Some('+') => (ArgOperator::Add, &numeric[1..]),
        Some('-') => (ArgOperator::Subtract, &numeric[1..]),
        Some('*') => (ArgOperator::Multiply, &numeric[1..]),
        _ => (ArgOperator::Assign, numeric.as_str()),
    };

    // A trailing alphabetic run after the decimal digits references another
    // argument by name; any other trailing content is a bad literal.
    let split = literal
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(literal.len());
    let (number, rest) = literal.split_at(split);

    let bad_literal = || ParseError::InvalidNumber {
        value: literal.to_string(),
    };
    if !rest.is_empty() && !rest.chars().all(|c| c.is_alphabetic()) {
        return Err(bad_literal());
    }
    let value: Decimal = number.parse().map_err(|_| bad_literal())?;

    let arg = DynamicArg {
        value,
        operator,
        reference: if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        },
    };

    if name.is_empty() {
        if args.is_empty() {
            args.insert("time".to_string(), arg);
        } else {
            return Err(ParseError::UnnamedArgument {
                entry: entry.to_string(),
            });
        }
    } else {
        let key = aliases.get(&name).cloned().unwrap_or(name);
        args.insert(key, arg);
    }

    Ok(())
}
