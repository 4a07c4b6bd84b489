//! The parser facade: tokenize → bracket → expand → fold.

mod bracket;
mod fold;
mod rewrite;
mod tokenizer;

use std::collections::HashMap;

use once_cell::unsync::OnceCell;

use crate::error::ParseResult;
use crate::grammar::Grammar;
use crate::tree::SyntaxNode;

/// Parses expressions of one dialect into syntax trees.
///
/// A `Parser` owns its [`Grammar`] and a lazily-built cache of pre-parsed
/// meta-rule templates, computed on the first parse and reused across
/// calls. The cache lives in an unsynchronized cell, so a `Parser` is
/// deliberately not `Sync`; share one per thread, or guard it externally.
///
/// # Examples
///
/// ```
/// use rule_expr::{dialect, Parser};
///
/// let parser = Parser::new(dialect::boolean());
/// let tree = parser.parse("(Check_A & Check_B) | !Check_C").unwrap();
/// assert_eq!(tree.flatten(), "( Check_A AND Check_B ) OR ( NOT Check_C )");
///
/// assert_eq!(parser.operands("Check_C AND Check_D"), ["Check_C", "Check_D"]);
/// ```
#[derive(Debug)]
pub struct Parser {
    grammar: Grammar,
    templates: OnceCell<HashMap<String, Vec<SyntaxNode>>>,
}

impl Parser {
    /// Creates a parser for `grammar`.
    pub fn new(grammar: Grammar) -> Self {
        Parser {
            grammar,
            templates: OnceCell::new(),
        }
    }

    /// The grammar this parser was built with.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parses `expression` into a syntax tree.
    ///
    /// The returned root is a `Struct` node named `ROOT`; walking its
    /// children yields operators, operands and nested `Struct` groups in
    /// expression order. Each call builds a fresh tree; nothing is shared
    /// between results.
    pub fn parse(&self, expression: &str) -> ParseResult<SyntaxNode> {
        let mut nodes = tokenizer::tokenize(&self.grammar, expression);
        bracket::apply_precedence(&self.grammar, &mut nodes);
        rewrite::expand(&mut nodes, self.templates())?;
        let mut root = SyntaxNode::root(nodes);
        fold::fold(&mut root, self.grammar.identity())?;
        Ok(root)
    }

    /// Returns every name in `expression` that is not a reserved token of
    /// the grammar, in order of appearance, duplicates retained. Useful to
    /// check that all referenced variables are bound before evaluating a
    /// parsed tree.
    pub fn operands(&self, expression: &str) -> Vec<String> {
        tokenizer::operands(&self.grammar, expression)
    }

    fn templates(&self) -> &HashMap<String, Vec<SyntaxNode>> {
        self.templates
            .get_or_init(|| rewrite::prepare_templates(&self.grammar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect;
    use crate::error::ParseError;
    use crate::tree::NodeKind;

    #[test]
    fn parse_builds_a_fresh_tree_per_call() {
        let parser = Parser::new(dialect::boolean());
        let first = parser.parse("a & b").unwrap();
        let second = parser.parse("a & b").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_is_a_format_error() {
        let parser = Parser::new(dialect::boolean());
        assert_eq!(parser.parse("").unwrap_err(), ParseError::EmptyExpression);
    }

    #[test]
    fn leaf_operands_match_the_operand_listing() {
        let parser = Parser::new(dialect::logical());
        let text = "(Alpha & Beta) | Alpha >= Gamma";
        let tree = parser.parse(text).unwrap();
        let mut leaves: Vec<String> = Vec::new();
        tree.walk(&mut |_, node| {
            if node.kind() == NodeKind::Operand {
                leaves.push(node.name().to_string());
            }
        });
        assert_eq!(parser.operands(text), leaves);
    }
}
