//! Meta-rule expander.
//!
//! Compound operators (`IMP`, `NAND`, …) are rewritten into equivalent
//! sequences of primitive operators before folding, while the token
//! sequence is still flat. Each template is tokenized, placeholder-marked
//! and precedence-bracketed once per parser; expansion then substitutes the
//! operator's left/right operand spans into deep copies of the template.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::parser::{bracket, tokenizer};
use crate::tree::{NodeKind, SyntaxNode};

/// Ceiling on expansion passes. Every pass replaces one compound operator;
/// a well-formed rule set settles long before this, a mutually-rewriting
/// one never would.
const MAX_REWRITE_PASSES: usize = 256;

/// Prepares the template table: one bracketed node sequence per meta-rule.
pub(crate) fn prepare_templates(grammar: &Grammar) -> HashMap<String, Vec<SyntaxNode>> {
    let mut templates = HashMap::new();
    for (key, template) in grammar.meta_rules() {
        let mut nodes = tokenizer::tokenize(grammar, template);
        mark_placeholders(&mut nodes);
        bracket::apply_precedence(grammar, &mut nodes);
        templates.insert(key.clone(), nodes);
    }
    templates
}

/// Turns the literal `LEFT`/`RIGHT` operands of a template into placeholder
/// markers. Only template preparation does this; parsed input never
/// contains marker kinds.
fn mark_placeholders(nodes: &mut [SyntaxNode]) {
    for node in nodes.iter_mut() {
        if node.kind() == NodeKind::Operand {
            match node.name() {
                "LEFT" => *node = SyntaxNode::new("LEFT", NodeKind::LeftMarker),
                "RIGHT" => *node = SyntaxNode::new("RIGHT", NodeKind::RightMarker),
                _ => {}
            }
        }
    }
}

/// Expands compound operators until none remains.
pub(crate) fn expand(
    nodes: &mut Vec<SyntaxNode>,
    templates: &HashMap<String, Vec<SyntaxNode>>,
) -> Result<(), ParseError> {
    if templates.is_empty() {
        return Ok(());
    }
    let mut passes = 0;
    while let Some(pos) = nodes
        .iter()
        .position(|n| n.kind() == NodeKind::Operator && templates.contains_key(n.name()))
    {
        passes += 1;
        if passes > MAX_REWRITE_PASSES {
            return Err(ParseError::RewriteLimit {
                limit: MAX_REWRITE_PASSES,
            });
        }

        let template = &templates[nodes[pos].name()];
        let needs_left = template.iter().any(|n| n.kind() == NodeKind::LeftMarker);
        let needs_right = template.iter().any(|n| n.kind() == NodeKind::RightMarker);

        let left = if needs_left {
            Some(left_operand_span(nodes, pos)?)
        } else {
            None
        };
        let right = if needs_right {
            Some(right_operand_span(nodes, pos)?)
        } else {
            None
        };

        let left_nodes: Vec<SyntaxNode> = left.clone().map_or_else(Vec::new, |r| nodes[r].to_vec());
        let right_nodes: Vec<SyntaxNode> =
            right.clone().map_or_else(Vec::new, |r| nodes[r].to_vec());

        let mut replacement = Vec::with_capacity(template.len());
        for node in template {
            match node.kind() {
                NodeKind::LeftMarker => replacement.extend(left_nodes.iter().cloned()),
                NodeKind::RightMarker => replacement.extend(right_nodes.iter().cloned()),
                _ => replacement.push(node.clone()),
            }
        }

        let start = left.map_or(pos, |r| r.start);
        let end = right.map_or(pos + 1, |r| r.end);
        nodes.splice(start..end, replacement);
    }
    Ok(())
}

/// The contiguous span directly left of `pos` whose bracket depth closes
/// back to zero: a single token, or a whole group including its brackets.
fn left_operand_span(nodes: &[SyntaxNode], pos: usize) -> Result<Range<usize>, ParseError> {
    let mut depth = 0i32;
    let mut k = pos;
    while k > 0 {
        k -= 1;
        match nodes[k].kind() {
            NodeKind::GroupClose => depth += 1,
            NodeKind::GroupOpen => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Ok(k..pos);
        }
    }
    Err(ParseError::MissingLeftOperand {
        operator: nodes[pos].name().to_string(),
    })
}

/// Mirror image of [`left_operand_span`].
fn right_operand_span(nodes: &[SyntaxNode], pos: usize) -> Result<Range<usize>, ParseError> {
    let mut depth = 0i32;
    let mut k = pos;
    while k + 1 < nodes.len() {
        k += 1;
        match nodes[k].kind() {
            NodeKind::GroupOpen => depth += 1,
            NodeKind::GroupClose => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Ok(pos + 1..k + 1);
        }
    }
    Err(ParseError::MissingRightOperand {
        operator: nodes[pos].name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect;
    use crate::parser::bracket::apply_precedence;
    use crate::parser::tokenizer::tokenize;

    fn expanded(grammar: &Grammar, text: &str) -> Result<Vec<String>, ParseError> {
        let templates = prepare_templates(grammar);
        let mut nodes = tokenize(grammar, text);
        apply_precedence(grammar, &mut nodes);
        expand(&mut nodes, &templates)?;
        Ok(nodes.iter().map(|n| n.name().to_string()).collect())
    }

    #[test]
    fn templates_are_bracketed_like_input() {
        let grammar = dialect::boolean();
        let templates = prepare_templates(&grammar);
        let imp: Vec<&str> = templates["IMP"].iter().map(|n| n.name()).collect();
        assert_eq!(
            imp,
            vec!["GROUP", "GROUP", "NOT", "LEFT", "UNGROUP", "OR", "RIGHT", "UNGROUP"]
        );
    }

    #[test]
    fn implication_expands_to_negated_disjunction() {
        let grammar = dialect::boolean();
        let names = expanded(&grammar, "a => b").unwrap();
        assert!(!names.contains(&"IMP".to_string()));
        assert!(names.contains(&"NOT".to_string()));
        assert!(names.contains(&"OR".to_string()));
    }

    #[test]
    fn whole_groups_are_consumed_as_one_operand() {
        let grammar = dialect::boolean();
        let names = expanded(&grammar, "(x & a) => b").unwrap();
        assert!(!names.contains(&"IMP".to_string()));
        // The negation applies to the whole left-hand group.
        let not_at = names.iter().position(|n| n == "NOT").unwrap();
        assert_eq!(names[not_at + 1], "GROUP");
    }

    #[test]
    fn missing_left_operand_is_reported() {
        let grammar = dialect::boolean();
        let err = expanded(&grammar, "=> b").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingLeftOperand {
                operator: "IMP".to_string()
            }
        );
    }

    #[test]
    fn missing_right_operand_is_reported() {
        let grammar = dialect::boolean();
        let err = expanded(&grammar, "a =>").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingRightOperand {
                operator: "IMP".to_string()
            }
        );
    }

    #[test]
    fn cyclic_rule_sets_hit_the_pass_ceiling() {
        let grammar = crate::GrammarBuilder::new()
            .group("GROUP", &["("])
            .group_close("UNGROUP", &[")"])
            .infix("PING", &["<+>"], 1)
            .infix("PONG", &["<->"], 1)
            .meta_rule("PING", "LEFT <-> RIGHT")
            .meta_rule("PONG", "LEFT <+> RIGHT")
            .build()
            .unwrap();
        let err = expanded(&grammar, "a <+> b").unwrap_err();
        assert!(matches!(err, ParseError::RewriteLimit { .. }));
    }
}
