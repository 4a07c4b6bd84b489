//! Tree presentation: an indented multi-line view and a normalized,
//! fully-parenthesized flat re-stringification.

use std::fmt;

use crate::tree::{NodeKind, SyntaxNode};

impl SyntaxNode {
    /// Renders the tree one node per line, pre-order, indented with one
    /// `indent` unit per depth level.
    pub fn render(&self, indent: &str) -> Vec<String> {
        let mut lines = Vec::new();
        self.walk(&mut |depth, node| {
            lines.push(format!("{}{}", indent.repeat(depth), node.name()));
        });
        lines
    }

    /// Rebuilds a fully parenthesized textual form of the tree.
    ///
    /// `Struct` nodes contribute no text of their own; a parenthesis opens
    /// whenever the traversal descends past the first level and every open
    /// parenthesis is closed at the end. The result is normalized rather
    /// than byte-identical to the original input: operators appear under
    /// their canonical keys and bracketing reflects the parsed nesting.
    /// Re-parsing and re-flattening the result reproduces it unchanged.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        let mut current = 0usize;
        self.walk(&mut |depth, node| {
            if depth > current && depth > 1 {
                out.push_str("( ");
            }
            while depth < current {
                trim_trailing(&mut out);
                out.push_str(" ) ");
                current -= 1;
            }
            if node.kind() != NodeKind::Struct {
                out.push_str(node.name());
                out.push(' ');
            }
            current = depth;
        });
        while current > 1 {
            trim_trailing(&mut out);
            out.push_str(" )");
            current -= 1;
        }
        out.trim().to_string()
    }
}

fn trim_trailing(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten())
    }
}
