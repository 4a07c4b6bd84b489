//! Masking tokenizer.
//!
//! Reserved spellings are replaced with whitespace-delimited `_KEY_`
//! markers, longest/containing spellings first, then the text is split on
//! whitespace and each piece classified against the grammar's arity table.
//! Word-character spellings are matched at word boundaries so operand names
//! such as `Check_AND_Go` survive untouched; symbolic spellings are matched
//! exactly. The markers are underscore-fenced, which keeps later
//! word-boundary replacements from matching inside them.

use regex::NoExpand;

use crate::grammar::Grammar;
use crate::tree::SyntaxNode;

/// Splits `text` into a flat, classified token sequence.
pub(crate) fn tokenize(grammar: &Grammar, text: &str) -> Vec<SyntaxNode> {
    let masked = mask(grammar, text, None);
    masked
        .split_whitespace()
        .map(|piece| grammar.classify(piece))
        .collect()
}

/// Returns every operand in `text`, in order of appearance, duplicates
/// retained. Uses the same mask rules as [`tokenize`], so the two can never
/// disagree about what counts as an operand.
pub(crate) fn operands(grammar: &Grammar, text: &str) -> Vec<String> {
    let masked = mask(grammar, text, Some(" "));
    masked.split_whitespace().map(str::to_string).collect()
}

fn mask(grammar: &Grammar, text: &str, replacement: Option<&str>) -> String {
    let mut masked = text.to_string();
    for rule in grammar.mask_rules() {
        let replacement = replacement.unwrap_or(rule.marker.as_str());
        masked = rule
            .pattern
            .replace_all(&masked, NoExpand(replacement))
            .into_owned();
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect;
    use crate::tree::NodeKind;

    fn names(nodes: &[SyntaxNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn classifies_operators_groups_and_operands() {
        let grammar = dialect::boolean();
        let tokens = tokenize(&grammar, "(a & b)");
        assert_eq!(names(&tokens), vec!["GROUP", "a", "AND", "b", "UNGROUP"]);
        assert_eq!(tokens[0].kind(), NodeKind::GroupOpen);
        assert_eq!(tokens[2].kind(), NodeKind::Operator);
        assert_eq!(tokens[4].kind(), NodeKind::GroupClose);
    }

    #[test]
    fn containing_spellings_win_over_contained_ones() {
        let grammar = dialect::logical();
        let tokens = tokenize(&grammar, "a<=b");
        assert_eq!(names(&tokens), vec!["a", "LE", "b"]);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        let grammar = dialect::boolean();
        let tokens = tokenize(&grammar, "a and not b");
        assert_eq!(names(&tokens), vec!["a", "AND", "NOT", "b"]);
    }

    #[test]
    fn operand_case_and_underscores_are_preserved() {
        let grammar = dialect::boolean();
        let tokens = tokenize(&grammar, "Check_A & my_val_2");
        assert_eq!(names(&tokens), vec!["Check_A", "AND", "my_val_2"]);
        assert!(tokens[0].is_operand());
        assert!(tokens[2].is_operand());
    }

    #[test]
    fn keywords_inside_operand_names_are_not_masked() {
        let grammar = dialect::boolean();
        let tokens = tokenize(&grammar, "Brand & ANDROID");
        assert_eq!(names(&tokens), vec!["Brand", "AND", "ANDROID"]);
        assert!(tokens[2].is_operand());
    }

    #[test]
    fn operands_lists_every_occurrence_in_order() {
        let grammar = dialect::boolean();
        assert_eq!(
            operands(&grammar, "Check_C AND Check_D"),
            vec!["Check_C", "Check_D"]
        );
        assert_eq!(operands(&grammar, "(a & b) | a"), vec!["a", "b", "a"]);
    }

    #[test]
    fn operands_and_tokenize_agree() {
        let grammar = dialect::threshold();
        let text = "Job_1 TR50 Job_2 & (x >= y)";
        let from_tokens: Vec<String> = tokenize(&grammar, text)
            .iter()
            .filter(|n| n.is_operand())
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(operands(&grammar, text), from_tokens);
    }
}
