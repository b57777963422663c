use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::ast::{NodeId, Tree};
use crate::decimal::Decimal;
use crate::error::{ParseError, Result};
use crate::expander::TreeExpander;
use crate::information::{
    divide_information, parse_args, ArgOperator, DynamicArg, ElementInformation,
};
use crate::parser::build_tree;

/// A fully resolved notation event: one per expanded atomic node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedElement {
    pub prefix: String,
    /// Parsed index, 0 when the token carried none.
    pub index: i64,
    pub suffix: String,
    pub args: BTreeMap<String, Decimal>,
}

impl ResolvedElement {
    /// Render the element back as notation-like text:
    /// `prefix + index + suffix` plus a `:name value` argument list when any
    /// arguments are present.
    pub fn to_text(&self) -> String {
        let mut text = format!("{}{}{}", self.prefix, self.index, self.suffix);
        if !self.args.is_empty() {
            text.push(':');
            let rendered: Vec<String> = self
                .args
                .iter()
                .map(|(name, value)| format!("{}{}", name, value))
                .collect();
            text.push_str(&rendered.join(","));
        }
        text
    }
}

/// Merge the argument histories of an element and its ancestors into final
/// values.
///
/// `history` is ordered closest-first (the element itself, then each
/// ancestor up to the root). Caller defaults act as an extra outermost
/// level, but only for names not defined anywhere in the history. Folding
/// runs oldest-first: the first entry for a name is taken as-is (a leading
/// `-` negates it), later entries combine by their operator, where `-`
/// multiplies just like `*` and a bare value overwrites. An entry carrying
/// a reference contributes `value * resolved(reference)`; names are folded
/// in dependency order and an unresolvable reference is fatal.
pub fn resolve_arguments(
    history: &[ElementInformation],
    defaults: &HashMap<String, Decimal>,
    aliases: &HashMap<String, String>,
) -> Result<BTreeMap<String, Decimal>> {
    let mut levels: Vec<HashMap<String, DynamicArg>> = Vec::new();
    for info in history {
        if !info.arg_source.is_empty() {
            levels.push(parse_args(&info.arg_source, aliases)?);
        }
    }

    // Per-name histories, oldest level first.
    let mut histories: BTreeMap<String, Vec<DynamicArg>> = BTreeMap::new();
    for level in levels.iter().rev() {
        for (name, arg) in level {
            histories.entry(name.clone()).or_default().push(arg.clone());
        }
    }
    for (name, value) in defaults {
        if !histories.contains_key(name) {
            histories.insert(name.clone(), vec![DynamicArg::plain(*value)]);
        }
    }

    // Fold names in dependency order: every round resolves the names whose
    // references are already available; a round without progress means the
    // remainder forms a reference cycle.
    let mut resolved: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut pending = histories;
    while !pending.is_empty() {
        let ready: Vec<String> = pending
            .iter()
            .filter(|(_, history)| {
                history.iter().all(|arg| {
                    arg.reference
                        .as_ref()
                        .map_or(true, |name| resolved.contains_key(name))
                })
            })
            .map(|(name, _)| name.clone())
            .collect();

        if ready.is_empty() {
            let name = pending.keys().next().cloned().unwrap_or_default();
            return Err(ParseError::UnresolvedReference { name });
        }

        for name in ready {
            if let Some(history) = pending.remove(&name) {
                let value = fold_history(&history, &resolved)?;
                resolved.insert(name, value);
            }
        }
    }

    Ok(resolved)
}

fn fold_history(
    history: &[DynamicArg],
    resolved: &BTreeMap<String, Decimal>,
) -> Result<Decimal> {
    let mut value: Option<Decimal> = None;

    for arg in history {
        let contribution = match &arg.reference {
            Some(name) => {
                let target = resolved
                    .get(name)
                    .ok_or_else(|| ParseError::UnresolvedReference { name: name.clone() })?;
                arg.value * *target
            }
            None => arg.value,
        };

        value = Some(match value {
            // First entry for the name: taken as-is, except that a value
            // cannot subtract from nothing, so `-` negates instead.
            None => match arg.operator {
                ArgOperator::Subtract => -contribution,
                _ => contribution,
            },
            Some(current) => match arg.operator {
                ArgOperator::Add => current + contribution,
                // `-` combines exactly like `*` after the first entry.
                ArgOperator::Multiply | ArgOperator::Subtract => current * contribution,
                ArgOperator::Assign => contribution,
            },
        });
    }

    Ok(value.unwrap_or_default())
}

/// Full notation pipeline with caller-supplied argument aliases and
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    /// Name substitutions applied while parsing argument lists, as
    /// alias → real name.
    pub arg_aliases: HashMap<String, String>,
    /// Root-level argument values for names no level defines.
    pub arg_defaults: HashMap<String, Decimal>,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    /// Run the whole pipeline: build the tree, expand it, and resolve every
    /// surviving atomic node, in expansion order.
    pub fn parse(&self, source: &str) -> Result<Vec<ResolvedElement>> {
        let tree = build_tree(source)?;
        let mut expander = TreeExpander::new(&tree);
        let sequence = expander.expand()?;
        sequence
            .iter()
            .map(|id| self.resolve(&tree, *id))
            .collect()
    }

    fn resolve(&self, tree: &Tree, id: NodeId) -> Result<ResolvedElement> {
        let node = tree.node(id);
        let info = divide_information(node.kind, &node.information)?;

        let history: Vec<ElementInformation> = tree
            .ancestor_chain(id)
            .iter()
            .map(|ancestor| {
                let node = tree.node(*ancestor);
                divide_information(node.kind, &node.information)
            })
            .collect::<Result<_>>()?;

        let args = resolve_arguments(&history, &self.arg_defaults, &self.arg_aliases)?;

        let index = if info.index_string.is_empty() {
            0
        } else {
            info.index_string
                .parse()
                .map_err(|_| ParseError::InvalidNumber {
                    value: info.index_string.clone(),
                })?
        };

        Ok(ResolvedElement {
            prefix: info.prefix,
            index,
            suffix: info.suffix,
            args,
        })
    }
}

/// Parse with no aliases and no defaults.
pub fn parse(source: &str) -> Result<Vec<ResolvedElement>> {
    Parser::new().parse(source)
}
