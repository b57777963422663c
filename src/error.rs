use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Coarse failure classes. Every [`ParseError`] belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bracket/alternation structure errors from the section parser.
    Grammar,
    /// Token-level errors from the information divider and argument parser.
    Lexical,
    /// Argument reference errors from the resolver.
    Resolution,
}

/// Errors produced anywhere in the notation pipeline.
///
/// All failures are fatal to the call that produced them; no stage returns
/// partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("section does not start with '(': {token}")]
    SectionStart { token: String },

    #[error("section has no closing ')': {token}")]
    UnclosedSection { token: String },

    #[error("possible duplicate '/': no element since the previous branch")]
    EmptyAlternationBranch,

    #[error("'/' before any element in section")]
    LeadingAlternation,

    #[error("unnamed non-first argument: {entry}")]
    UnnamedArgument { entry: String },

    #[error("malformed numeric literal: {value}")]
    InvalidNumber { value: String },

    #[error("malformed repetition count: {value}")]
    InvalidRepetition { value: String },

    #[error("argument reference cannot be resolved: {name}")]
    UnresolvedReference { name: String },

    #[error("cursor read past the end of input at position {position}")]
    OutOfBounds { position: usize },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::SectionStart { .. }
            | ParseError::UnclosedSection { .. }
            | ParseError::EmptyAlternationBranch
            | ParseError::LeadingAlternation => ErrorKind::Grammar,
            ParseError::UnnamedArgument { .. }
            | ParseError::InvalidNumber { .. }
            | ParseError::InvalidRepetition { .. }
            | ParseError::OutOfBounds { .. } => ErrorKind::Lexical,
            ParseError::UnresolvedReference { .. } => ErrorKind::Resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ParseError::LeadingAlternation.kind(),
            ErrorKind::Grammar
        );
        assert_eq!(
            ParseError::InvalidNumber {
                value: "1..2".into()
            }
            .kind(),
            ErrorKind::Lexical
        );
        assert_eq!(
            ParseError::UnresolvedReference { name: "ca".into() }.kind(),
            ErrorKind::Resolution
        );
    }

    #[test]
    fn test_error_display() {
        let err = ParseError::UnclosedSection {
            token: "(a b".into(),
        };
        assert_eq!(err.to_string(), "section has no closing ')': (a b");
    }
}
