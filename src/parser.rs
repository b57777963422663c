use crate::ast::{NodeId, NodeKind, Tree};
use crate::cursor::Cursor;
use crate::error::{ParseError, Result};

/// Split notation text into tokens on spaces, except inside a balanced
/// parenthesis run: `(` raises the bracket depth, `)` lowers it, and a space
/// is a delimiter only at depth zero.
pub fn section_split(source: &str) -> Vec<String> {
    let mut cursor = Cursor::new(source);
    let mut depth: i32 = 0;
    let mut tokens = Vec::new();
    let mut current = String::new();

    while let Some(c) = cursor.current() {
        match c {
            '(' => {
                current.push(c);
                depth += 1;
            }
            ')' => {
                current.push(c);
                depth -= 1;
            }
            ' ' if depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
        cursor.advance();
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Build the node tree for `source`. Whitespace-only and empty input are
/// accepted and produce an empty root section.
pub fn build_tree(source: &str) -> Result<Tree> {
    let mut tree = Tree::new();
    let root = parse_section(&mut tree, source)?;
    tree.set_root(root);
    Ok(tree)
}

fn parse_section(tree: &mut Tree, source: &str) -> Result<NodeId> {
    let node = tree.add_node(NodeKind::Section);
    // Elements accumulated since the last '/', while `node` is an alternation.
    let mut branch: Vec<NodeId> = Vec::new();

    for token in section_split(source) {
        if token.contains('(') || token.contains(')') {
            if !token.starts_with('(') {
                return Err(ParseError::SectionStart { token });
            }

            // Annotation is everything after the last ')'. A suffix that
            // itself contains ')' is unsupported.
            let close = match token.rfind(')') {
                Some(index) => index,
                None => return Err(ParseError::UnclosedSection { token }),
            };
            let information = token[close + 1..].to_string();

            let child = parse_section(tree, &token[1..close])?;
            tree.node_mut(child).information = information;
            store(tree, node, &mut branch, child);
        } else if token == "/" {
            match tree.node(node).kind {
                NodeKind::Alternation => {
                    if branch.is_empty() {
                        return Err(ParseError::EmptyAlternationBranch);
                    }
                    close_branch(tree, node, &mut branch);
                }
                _ if !tree.node(node).children.is_empty() => {
                    // Reclassify the ongoing section as an alternation; any
                    // previously stored elements become its first branch,
                    // grouped into a subsection when plural.
                    tree.node_mut(node).kind = NodeKind::Alternation;
                    branch.clear();

                    if tree.node(node).children.len() > 1 {
                        let moved = std::mem::take(&mut tree.node_mut(node).children);
                        let wrapper = tree.add_node(NodeKind::Section);
                        for id in moved {
                            tree.attach(wrapper, id);
                        }
                        tree.attach(node, wrapper);
                    }
                }
                _ => return Err(ParseError::LeadingAlternation),
            }
        } else {
            let atomic = tree.add_node(NodeKind::Atomic);
            tree.node_mut(atomic).information = token;
            store(tree, node, &mut branch, atomic);
        }
    }

    // The final branch of an alternation has no trailing '/'.
    close_branch(tree, node, &mut branch);
    Ok(node)
}

fn store(tree: &mut Tree, node: NodeId, branch: &mut Vec<NodeId>, child: NodeId) {
    if tree.node(node).kind == NodeKind::Alternation {
        branch.push(child);
    } else {
        tree.attach(node, child);
    }
}

/// Attach the accumulated branch to `node`: directly when it holds a single
/// element, wrapped in a new subsection when plural.
fn close_branch(tree: &mut Tree, node: NodeId, branch: &mut Vec<NodeId>) {
    if branch.len() > 1 {
        let wrapper = tree.add_node(NodeKind::Section);
        for id in branch.drain(..) {
            tree.attach(wrapper, id);
        }
        tree.attach(node, wrapper);
    } else {
        for id in branch.drain(..) {
            tree.attach(node, id);
        }
    }
}
