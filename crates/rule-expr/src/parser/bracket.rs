//! Precedence bracketer.
//!
//! Encodes operator precedence on the still-flat token sequence by
//! wrapping each tightly-bound operator span in synthetic bracket markers,
//! ascending priority level by level, ties resolved by scan position.
//! Lower priority values bind tighter and are therefore bracketed (and
//! later nested) first; a closed group is atomic to every scan.

use crate::grammar::Grammar;
use crate::tree::{NodeKind, SyntaxNode};

/// Inserts group markers around every operator span that is wider than the
/// operator's immediate neighbors.
pub(crate) fn apply_precedence(grammar: &Grammar, nodes: &mut Vec<SyntaxNode>) {
    for &level in grammar.levels() {
        let mut j = 0;
        while j < nodes.len() {
            if !is_operator_at_level(grammar, &nodes[j], level) {
                j += 1;
                continue;
            }
            let Some(arity) = grammar.arity_of(nodes[j].name()) else {
                j += 1;
                continue;
            };

            // Borders are computed on a stable snapshot, then the sequence
            // is rebuilt once; nothing shifts under the scans.
            let mut left = j as isize - 1;
            let mut right = j + 1;
            if arity.needs_left() {
                left = find_left_border(grammar, nodes, j, level);
            }
            if arity.needs_right() {
                right = find_right_border(grammar, nodes, j, level);
            }

            if right > j + 1 || left < j as isize - 1 {
                let open_at = (left + 1) as usize;
                let close_at = right.min(nodes.len());
                let mut rebuilt = Vec::with_capacity(nodes.len() + 2);
                rebuilt.extend_from_slice(&nodes[..open_at]);
                rebuilt.push(SyntaxNode::group_open());
                rebuilt.extend_from_slice(&nodes[open_at..close_at]);
                rebuilt.push(SyntaxNode::group_close());
                rebuilt.extend_from_slice(&nodes[close_at..]);
                *nodes = rebuilt;
                // The inserted opener shifted the operator one to the right.
                j += 1;
            }
            j += 1;
        }
    }
}

fn is_operator_at_level(grammar: &Grammar, node: &SyntaxNode, level: i32) -> bool {
    node.kind() == NodeKind::Operator && grammar.priority_of(node.name()) == Some(level)
}

/// Scans left from the operator for the border of its left operand span:
/// the enclosing group opener, a depth-0 operator that binds equally or
/// looser, or the start of the sequence (-1). The border itself is not part
/// of the span.
fn find_left_border(grammar: &Grammar, nodes: &[SyntaxNode], pos: usize, priority: i32) -> isize {
    let mut depth = 0i32;
    let mut k = pos as isize - 1;
    while k >= 0 {
        let node = &nodes[k as usize];
        match node.kind() {
            NodeKind::GroupClose => depth += 1,
            NodeKind::GroupOpen => {
                depth -= 1;
                if depth < 0 {
                    return k;
                }
            }
            NodeKind::Operator if depth == 0 => {
                if grammar
                    .priority_of(node.name())
                    .is_some_and(|p| p >= priority)
                {
                    return k;
                }
            }
            _ => {}
        }
        k -= 1;
    }
    -1
}

/// Mirror image of [`find_left_border`]; returns the border index, or the
/// sequence length when the span runs to the end.
fn find_right_border(grammar: &Grammar, nodes: &[SyntaxNode], pos: usize, priority: i32) -> usize {
    let mut depth = 0i32;
    let mut k = pos + 1;
    while k < nodes.len() {
        let node = &nodes[k];
        match node.kind() {
            NodeKind::GroupOpen => depth += 1,
            NodeKind::GroupClose => {
                depth -= 1;
                if depth < 0 {
                    return k;
                }
            }
            NodeKind::Operator if depth == 0 => {
                if grammar
                    .priority_of(node.name())
                    .is_some_and(|p| p >= priority)
                {
                    return k;
                }
            }
            _ => {}
        }
        k += 1;
    }
    nodes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect;
    use crate::parser::tokenizer::tokenize;

    fn bracketed(grammar: &Grammar, text: &str) -> Vec<String> {
        let mut nodes = tokenize(grammar, text);
        apply_precedence(grammar, &mut nodes);
        nodes.iter().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn tighter_operators_are_bracketed_first() {
        let grammar = dialect::arithmetic();
        assert_eq!(
            bracketed(&grammar, "a + b * c"),
            vec!["GROUP", "a", "PLUS", "GROUP", "b", "MULT", "c", "UNGROUP", "UNGROUP"]
        );
    }

    #[test]
    fn equal_priority_chains_group_left_to_right() {
        let grammar = dialect::arithmetic();
        assert_eq!(
            bracketed(&grammar, "a + b - c"),
            vec!["GROUP", "GROUP", "a", "PLUS", "b", "UNGROUP", "MINUS", "c", "UNGROUP"]
        );
    }

    #[test]
    fn prefix_operators_take_only_their_right_span() {
        let grammar = dialect::boolean();
        assert_eq!(
            bracketed(&grammar, "!a & b"),
            vec!["GROUP", "GROUP", "NOT", "a", "UNGROUP", "AND", "b", "UNGROUP"]
        );
    }

    #[test]
    fn closed_groups_are_atomic_to_the_scan() {
        let grammar = dialect::arithmetic();
        // MULT (level 3) treats the user's group as one operand; PLUS
        // (level 4) then brackets its own span inside that group.
        assert_eq!(
            bracketed(&grammar, "(a + b) * c"),
            vec![
                "GROUP", "GROUP", "GROUP", "a", "PLUS", "b", "UNGROUP", "UNGROUP", "MULT", "c",
                "UNGROUP"
            ]
        );
    }
}
