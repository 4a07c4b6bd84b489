//! Tree folder.
//!
//! Collapses the flat, bracketed, macro-expanded token sequence into a
//! nested tree, one `Struct` node per bracketed span. Works level by
//! level: a scan with signed bracket depth collapses each maximal depth-0
//! span that is wider than a single operator application, redundant
//! whole-level bracket pairs are stripped, and the procedure recurses into
//! every `Struct` child. A level that ends up without any operator gets
//! the grammar's identity operator, so a single bare operand parses as
//! "identity applied to operand".

use crate::error::ParseError;
use crate::tree::{NodeKind, SyntaxNode};

/// Ceiling on `Struct` nesting. Converts pathologically nested input into
/// an error instead of unbounded recursion.
const MAX_FOLD_DEPTH: usize = 64;

/// Folds `node`'s flat child sequence into a nested tree.
pub(crate) fn fold(node: &mut SyntaxNode, identity: &str) -> Result<(), ParseError> {
    fold_level(node, identity, 0)
}

fn fold_level(node: &mut SyntaxNode, identity: &str, level: usize) -> Result<(), ParseError> {
    if level >= MAX_FOLD_DEPTH {
        return Err(ParseError::NestingTooDeep {
            limit: MAX_FOLD_DEPTH,
        });
    }

    loop {
        let children = node.children_mut();
        if children.is_empty() {
            return Err(ParseError::EmptyExpression);
        }
        let first_kind = children[0].kind();
        let mut depth = 0i32;
        // Set once any element sits at depth 0 before the last position;
        // only then can outer brackets be redundant wrapping.
        let mut zero_level_run = false;
        // Index of the last element that closed a depth-0 span; the next
        // collapse folds everything after it.
        let mut anchor: isize = -1;
        let mut i = 0usize;
        while i < children.len() {
            let kind = children[i].kind();
            match kind {
                NodeKind::GroupOpen => {
                    if depth == 0 {
                        anchor = i as isize - 1;
                    }
                    depth += 1;
                }
                NodeKind::GroupClose => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ParseError::UnmatchedGroupClose);
                    }
                }
                _ => {}
            }
            if depth == 0 {
                if i + 1 < children.len() {
                    zero_level_run = true;
                }
                match kind {
                    NodeKind::GroupOpen | NodeKind::GroupClose => {}
                    NodeKind::Operand => anchor = i as isize,
                    _ => {
                        if i as isize - anchor > 2 {
                            collapse(children, anchor, i);
                            // Rescan from the freshly built struct node.
                            i = (anchor + 1) as usize;
                            continue;
                        }
                        anchor = i as isize - 1;
                    }
                }
            }
            i += 1;
        }
        if depth > 0 {
            return Err(ParseError::UnmatchedGroupOpen);
        }

        if !zero_level_run && first_kind == NodeKind::GroupOpen {
            // The whole level is wrapped in one redundant bracket pair.
            children.remove(0);
            children.pop();
            continue;
        }

        let end = children.len();
        if end as isize - anchor > 2 {
            collapse(children, anchor, end);
        }
        break;
    }

    let children = node.children_mut();
    if !children.iter().any(|c| c.kind() == NodeKind::Operator) {
        children.insert(0, SyntaxNode::new(identity, NodeKind::Operator));
    }
    for child in children.iter_mut() {
        if child.kind() == NodeKind::Struct {
            fold_level(child, identity, level + 1)?;
        }
    }
    Ok(())
}

/// Replaces the span `(anchor, end)` (exclusive both sides of the anchor,
/// exclusive of `end`) with one `Struct` node owning the span. The span
/// still carries its surrounding bracket markers; the child-level fold
/// strips them.
fn collapse(children: &mut Vec<SyntaxNode>, anchor: isize, end: usize) {
    let start = (anchor + 1) as usize;
    let span: Vec<SyntaxNode> = children.drain(start..end).collect();
    children.insert(start, SyntaxNode::structure(span));
}
