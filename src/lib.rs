//! Shuttle notation parser and resolver
//!
//! This crate compiles a terse, human-written score string into a flat,
//! ordered sequence of resolved events, each carrying a numeric index,
//! textual tags, and a final set of named decimal arguments.
//!
//! # Examples
//!
//! ```
//! use shuttle_notation::parse;
//!
//! let events = parse("a4 (b2 / c3)*2").unwrap();
//! let rendered: Vec<String> = events.iter().map(|e| e.to_text()).collect();
//! assert_eq!(rendered, vec!["a4", "b2", "c3"]);
//! ```
//!
//! Argument aliases and defaults are supplied through [`Parser`]:
//!
//! ```
//! use shuttle_notation::Parser;
//!
//! let mut parser = Parser::new();
//! parser.arg_aliases.insert(">".into(), "sus".into());
//! parser.arg_defaults.insert("sus".into(), "1.0".parse().unwrap());
//!
//! let events = parser.parse("0:>0.5 1").unwrap();
//! assert_eq!(events[0].to_text(), "0:sus0.5");
//! assert_eq!(events[1].to_text(), "1:sus1.0");
//! ```
//!
//! # Notation Syntax
//!
//! - Space-separated event tokens: `a4 b4 c4`
//! - Nested groups: `(a4 b4) c4`
//! - Alternation branches, cycled across passes: `a4 / b4`
//! - Repetition: `a4*3`, `(a4 b4)*2`
//! - Arguments with inheritance and operators: `(c4 e4):0.5,sus+0.2`
//!
//! A token decomposes as `prefix index suffix *repeat :args`, e.g.
//! `a4x*2:0.5,sus1.2`. Composite groups carry only `suffix *repeat :args`
//! after their closing bracket; argument values inherit down the tree,
//! where `+` adds, `*` multiplies and a bare value overwrites.
//!
//! # Pipeline
//!
//! - [`build_tree`]: raw text to [`Tree`] of sections/alternations/atomics
//! - [`TreeExpander`]: tree to ordered atomic sequence
//! - [`divide_information`]: annotation to prefix/index/suffix/repeat/args
//! - [`resolve_arguments`]: ancestor argument histories to final decimals
//! - [`parse`] / [`Parser::parse`]: the whole pipeline in one call

pub mod ast;
pub mod cursor;
pub mod decimal;
pub mod error;
pub mod expander;
pub mod information;
pub mod parser;
pub mod resolver;

#[cfg(test)]
mod parser_tests;

pub use ast::{Node, NodeId, NodeKind, Tree};
pub use cursor::Cursor;
pub use decimal::Decimal;
pub use error::{ErrorKind, ParseError, Result};
pub use expander::TreeExpander;
pub use information::{
    divide_information, parse_args, ArgOperator, DynamicArg, ElementInformation,
};
pub use parser::{build_tree, section_split};
pub use resolver::{parse, resolve_arguments, Parser, ResolvedElement};
