// Whole-pipeline tests: source text through expansion and resolution.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::ast::NodeKind;
use crate::decimal::Decimal;
use crate::error::ErrorKind;
use crate::information::divide_information;
use crate::parser::build_tree;
use crate::resolver::{parse, Parser};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn test_alias_and_default() {
    let mut parser = Parser::new();
    parser.arg_aliases = HashMap::from([(">".to_string(), "sus".to_string())]);
    parser.arg_defaults = HashMap::from([("sus".to_string(), dec("1.0"))]);

    let events = parser.parse("0:>0.5").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].args["sus"], dec("0.5"));
}

#[test]
fn test_default_reaches_every_event() {
    let mut parser = Parser::new();
    parser.arg_defaults = HashMap::from([("time".to_string(), dec("1.0"))]);

    let events = parser.parse("a4*3 (d4 / g4)").unwrap();
    let rendered: Vec<&str> = events.iter().map(|e| e.prefix.as_str()).collect();
    assert_eq!(rendered, vec!["a", "a", "a", "d", "a", "a", "a", "g"]);
    for event in &events {
        assert_eq!(event.args["time"], dec("1.0"));
    }
}

#[test]
fn test_inherited_reference_argument() {
    let events = parse("(c4:sus*0.5):2.0,sus1time").unwrap();
    assert_eq!(events.len(), 1);
    // Section level sets time=2.0 and sus=1*time; the atomic then halves sus.
    assert_eq!(events[0].args["time"], dec("2.0"));
    assert_eq!(events[0].args["sus"], dec("1.0"));
}

#[test]
fn test_resolved_fields() {
    let events = parse("bass12slide*2:0.5").unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].prefix, "bass");
    assert_eq!(events[0].index, 12);
    assert_eq!(events[0].suffix, "slide");
    assert_eq!(events[0].args["time"], dec("0.5"));
    assert_eq!(events[0], events[1]);
}

#[test]
fn test_index_defaults_to_zero() {
    let events = parse("x").unwrap();
    assert_eq!(events[0].index, 0);
    assert_eq!(events[0].suffix, "x");
    assert_eq!(events[0].to_text(), "0x");
}

#[test]
fn test_empty_input_yields_no_events() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("      ").unwrap().is_empty());
}

#[test]
fn test_grammar_errors() {
    for source in ["(a c v", "(((((/)))))", "a / / b", "a(b)"] {
        let err = parse(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar, "kind of {:?}", source);
    }
}

#[test]
fn test_lexical_errors() {
    for source in ["a4*x", "0:a1,2", "0:a+"] {
        let err = parse(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical, "kind of {:?}", source);
    }
}

#[test]
fn test_resolution_errors() {
    let err = parse("0:xa2xb,xb2xa").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

#[test]
fn test_expansion_order_is_preserved() {
    let events = parse("1 2 3").unwrap();
    let indices: Vec<i64> = events.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn test_events_serialize() {
    let events = parse("a4:sus0.5 (b2 / c3)").unwrap();
    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<crate::resolver::ResolvedElement> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, events);
}

proptest! {
    #[test]
    fn prop_atom_sequences_parse(tokens in proptest::collection::vec("[a-z]{1,3}[0-9]{0,2}", 1..8)) {
        let source = tokens.join(" ");
        let events = parse(&source).unwrap();
        prop_assert_eq!(events.len(), tokens.len());
    }

    #[test]
    fn prop_decompiled_text_reparses(tokens in proptest::collection::vec("[a-z]{1,3}[0-9]{0,2}", 1..8)) {
        let source = tokens.join(" / ");
        let tree = build_tree(&source).unwrap();
        let decompiled = tree.decompile(tree.root());
        prop_assert!(build_tree(&decompiled).is_ok());
    }

    #[test]
    fn prop_alternation_visits_every_branch(tokens in proptest::collection::vec("[a-z]{1,3}", 2..6)) {
        let source = tokens.join(" / ");
        let events = parse(&source).unwrap();
        let suffixes: Vec<String> = events.iter().map(|e| e.suffix.clone()).collect();
        prop_assert_eq!(suffixes, tokens);
    }

    #[test]
    fn prop_divide_is_pure(information in "[a-z]{0,3}[0-9]{0,3}[a-z]{0,3}") {
        let first = divide_information(NodeKind::Atomic, &information).unwrap();
        let second = divide_information(NodeKind::Atomic, &information).unwrap();
        prop_assert_eq!(first, second);
    }
}
