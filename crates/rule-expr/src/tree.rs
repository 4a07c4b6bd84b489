//! Syntax tree nodes produced by a parse.

/// Classification of a [`SyntaxNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NodeKind {
    /// A free operand: any token that matches no reserved spelling.
    Operand,
    /// An opening bracket. Only present in intermediate flat sequences.
    GroupOpen,
    /// A closing bracket. Only present in intermediate flat sequences.
    GroupClose,
    /// A named operator from the grammar.
    Operator,
    /// The `LEFT` placeholder inside a meta-rule template. Never appears
    /// in a finished tree.
    LeftMarker,
    /// The `RIGHT` placeholder inside a meta-rule template. Never appears
    /// in a finished tree.
    RightMarker,
    /// A fully resolved bracketed sub-expression.
    Struct,
}

/// Synthetic node name for grouping nodes.
pub(crate) const STRUCT_NAME: &str = "STRUCT";
/// Synthetic node name for the tree root.
pub(crate) const ROOT_NAME: &str = "ROOT";
/// Synthetic node names for bracket markers inserted by the bracketer.
pub(crate) const GROUP_NAME: &str = "GROUP";
pub(crate) const UNGROUP_NAME: &str = "UNGROUP";

/// One node of a parsed expression tree.
///
/// A finished tree consists of `Struct` nodes (one per bracketed
/// sub-expression, the root included), `Operator` nodes and `Operand`
/// leaves. Children are owned exclusively by their node; cloning a node
/// deep-copies its whole subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxNode {
    name: String,
    kind: NodeKind,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        SyntaxNode {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Root node wrapping the top-level child sequence of a parse.
    pub(crate) fn root(children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            name: ROOT_NAME.to_string(),
            kind: NodeKind::Struct,
            children,
        }
    }

    /// Grouping node holding one collapsed bracketed span.
    pub(crate) fn structure(children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            name: STRUCT_NAME.to_string(),
            kind: NodeKind::Struct,
            children,
        }
    }

    /// Synthetic opening bracket inserted by the precedence bracketer.
    pub(crate) fn group_open() -> Self {
        SyntaxNode::new(GROUP_NAME, NodeKind::GroupOpen)
    }

    /// Synthetic closing bracket inserted by the precedence bracketer.
    pub(crate) fn group_close() -> Self {
        SyntaxNode::new(UNGROUP_NAME, NodeKind::GroupClose)
    }

    /// The node's name: an operator key, an operand's original text, or a
    /// synthetic `STRUCT`/`ROOT` label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's classification.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's children, in expression order.
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<SyntaxNode> {
        &mut self.children
    }

    /// Whether this node is a free operand.
    pub fn is_operand(&self) -> bool {
        self.kind == NodeKind::Operand
    }

    /// Whether this node is an operator.
    pub fn is_operator(&self) -> bool {
        self.kind == NodeKind::Operator
    }

    /// Whether this node is a resolved sub-expression group.
    pub fn is_struct(&self) -> bool {
        self.kind == NodeKind::Struct
    }

    /// Pre-order traversal. The visitor receives each node together with
    /// its depth below the starting node (the starting node is depth 0).
    pub fn walk<F: FnMut(usize, &SyntaxNode)>(&self, visit: &mut F) {
        self.walk_at(0, visit);
    }

    fn walk_at<F: FnMut(usize, &SyntaxNode)>(&self, depth: usize, visit: &mut F) {
        visit(depth, self);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// All operand leaves in pre-order, duplicates retained.
    ///
    /// For a tree produced by [`Parser::parse`](crate::Parser::parse) this
    /// agrees with [`Parser::operands`](crate::Parser::operands) on the
    /// same input.
    pub fn operand_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_operands(self, &mut names);
        names
    }
}

fn collect_operands<'a>(node: &'a SyntaxNode, names: &mut Vec<&'a str>) {
    if node.kind == NodeKind::Operand {
        names.push(node.name());
    }
    for child in node.children() {
        collect_operands(child, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode {
        let inner = SyntaxNode::structure(vec![
            SyntaxNode::new("a", NodeKind::Operand),
            SyntaxNode::new("AND", NodeKind::Operator),
            SyntaxNode::new("b", NodeKind::Operand),
        ]);
        SyntaxNode::root(vec![
            inner,
            SyntaxNode::new("OR", NodeKind::Operator),
            SyntaxNode::new("c", NodeKind::Operand),
        ])
    }

    #[test]
    fn walk_visits_preorder_with_depth() {
        let tree = sample();
        let mut seen = Vec::new();
        tree.walk(&mut |depth, node| seen.push((depth, node.name().to_string())));
        assert_eq!(
            seen,
            vec![
                (0, "ROOT".to_string()),
                (1, "STRUCT".to_string()),
                (2, "a".to_string()),
                (2, "AND".to_string()),
                (2, "b".to_string()),
                (1, "OR".to_string()),
                (1, "c".to_string()),
            ]
        );
    }

    #[test]
    fn operand_names_keeps_order_and_duplicates() {
        let tree = SyntaxNode::root(vec![
            SyntaxNode::new("x", NodeKind::Operand),
            SyntaxNode::new("AND", NodeKind::Operator),
            SyntaxNode::new("x", NodeKind::Operand),
        ]);
        assert_eq!(tree.operand_names(), vec!["x", "x"]);
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let tree = sample();
        let mut copy = tree.clone();
        copy.children_mut().clear();
        assert_eq!(tree.children().len(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn nodes_round_trip_through_json() {
        let tree = sample();
        let json = serde_json::to_string(&tree).unwrap();
        let back: SyntaxNode = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }
}
