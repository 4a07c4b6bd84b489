//! Grammar definitions: the declarative description of one dialect.
//!
//! A [`Grammar`] is pure data. It lists every reserved token with its
//! spellings, its role ([`Arity`]), its binding priority and optionally a
//! meta-rule template that rewrites it into more primitive operators. All
//! configuration invariants are checked once in [`GrammarBuilder::build`];
//! the parsing hot path never re-validates.

use std::collections::{BTreeSet, HashMap};

use regex::{Regex, RegexBuilder};

use crate::error::GrammarError;
use crate::tree::{NodeKind, SyntaxNode};

/// Role of an operator within an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Arity {
    /// Consumes the expression to its right only (`!a`).
    Prefix,
    /// Consumes the expression to its left only.
    Postfix,
    /// Consumes expressions on both sides (`a & b`).
    Infix,
    /// Opens a bracketed group.
    GroupOpen,
    /// Closes a bracketed group.
    GroupClose,
}

impl Arity {
    pub(crate) fn needs_left(self) -> bool {
        matches!(self, Arity::Infix | Arity::Postfix)
    }

    pub(crate) fn needs_right(self) -> bool {
        matches!(self, Arity::Infix | Arity::Prefix)
    }
}

#[derive(Debug, Clone)]
struct OperatorDef {
    key: String,
    spellings: Vec<String>,
    arity: Arity,
    priority: Option<i32>,
}

/// One compiled masking rule: a pattern matching one spelling and the
/// whitespace-delimited marker it is replaced with.
#[derive(Debug, Clone)]
pub(crate) struct MaskRule {
    pub(crate) pattern: Regex,
    pub(crate) marker: String,
}

/// Immutable description of one expression dialect.
///
/// Built once through [`GrammarBuilder`], validated, then only read. The
/// ready-made dialects live in [`crate::dialect`].
#[derive(Debug, Clone)]
pub struct Grammar {
    defs: Vec<OperatorDef>,
    index: HashMap<String, usize>,
    rules: Vec<MaskRule>,
    levels: Vec<i32>,
    meta_rules: Vec<(String, String)>,
    identity: String,
}

impl Grammar {
    /// Starts building a new grammar.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// The keys of all defined operators, in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.defs.iter().map(|def| def.key.as_str())
    }

    /// Whether `key` names a defined operator.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The key inserted as implicit operator when an expression level has
    /// none, e.g. for a single bare operand.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Masking rules in containment order: spellings that contain other
    /// spellings are masked first.
    pub(crate) fn mask_rules(&self) -> &[MaskRule] {
        &self.rules
    }

    /// Distinct operator priorities, ascending (tightest binding first).
    pub(crate) fn levels(&self) -> &[i32] {
        &self.levels
    }

    /// Meta-rule templates in declaration order.
    pub(crate) fn meta_rules(&self) -> &[(String, String)] {
        &self.meta_rules
    }

    pub(crate) fn priority_of(&self, name: &str) -> Option<i32> {
        self.index
            .get(name)
            .and_then(|&idx| self.defs[idx].priority)
    }

    pub(crate) fn arity_of(&self, name: &str) -> Option<Arity> {
        self.index.get(name).map(|&idx| self.defs[idx].arity)
    }

    /// Classifies one whitespace-split piece of masked text. Marker pieces
    /// map back to their operator key and take their kind from the arity
    /// table; everything else is an operand, original text preserved.
    pub(crate) fn classify(&self, piece: &str) -> SyntaxNode {
        let candidate = piece.trim_matches('_');
        if let Some(&idx) = self.index.get(candidate) {
            let def = &self.defs[idx];
            let kind = match def.arity {
                Arity::GroupOpen => NodeKind::GroupOpen,
                Arity::GroupClose => NodeKind::GroupClose,
                _ => NodeKind::Operator,
            };
            return SyntaxNode::new(def.key.clone(), kind);
        }
        SyntaxNode::new(piece, NodeKind::Operand)
    }
}

/// Builder assembling and validating a [`Grammar`].
///
/// # Examples
///
/// ```
/// use rule_expr::{GrammarBuilder, Parser};
///
/// let grammar = GrammarBuilder::new()
///     .group("GROUP", &["("])
///     .group_close("UNGROUP", &[")"])
///     .prefix("NOT", &["!", "NOT"], 1)
///     .infix("AND", &["&", "AND"], 2)
///     .build()
///     .unwrap();
///
/// let parser = Parser::new(grammar);
/// let tree = parser.parse("!(a & b)").unwrap();
/// assert_eq!(tree.flatten(), "NOT ( a AND b )");
/// ```
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    defs: Vec<OperatorDef>,
    meta_rules: Vec<(String, String)>,
    identity: Option<String>,
}

impl GrammarBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines an opening-bracket token.
    pub fn group(self, key: &str, spellings: &[&str]) -> Self {
        self.push(key, spellings, Arity::GroupOpen, None)
    }

    /// Defines a closing-bracket token.
    pub fn group_close(self, key: &str, spellings: &[&str]) -> Self {
        self.push(key, spellings, Arity::GroupClose, None)
    }

    /// Defines a prefix operator. Lower `priority` binds tighter.
    pub fn prefix(self, key: &str, spellings: &[&str], priority: i32) -> Self {
        self.push(key, spellings, Arity::Prefix, Some(priority))
    }

    /// Defines a postfix operator. Lower `priority` binds tighter.
    pub fn postfix(self, key: &str, spellings: &[&str], priority: i32) -> Self {
        self.push(key, spellings, Arity::Postfix, Some(priority))
    }

    /// Defines an infix operator. Lower `priority` binds tighter.
    pub fn infix(self, key: &str, spellings: &[&str], priority: i32) -> Self {
        self.push(key, spellings, Arity::Infix, Some(priority))
    }

    /// Declares a rewrite template for `key`. The template is written in
    /// the dialect's own syntax with `LEFT` and `RIGHT` placeholders,
    /// e.g. `"!LEFT | RIGHT"`.
    pub fn meta_rule(mut self, key: &str, template: &str) -> Self {
        self.meta_rules.push((key.to_string(), template.to_string()));
        self
    }

    /// Overrides the implicit identity operator key (default `IS`).
    pub fn identity(mut self, key: &str) -> Self {
        self.identity = Some(key.to_string());
        self
    }

    fn push(mut self, key: &str, spellings: &[&str], arity: Arity, priority: Option<i32>) -> Self {
        self.defs.push(OperatorDef {
            key: key.to_string(),
            spellings: spellings.iter().map(|s| s.to_string()).collect(),
            arity,
            priority,
        });
        self
    }

    /// Validates the assembled tables and produces the immutable grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut index = HashMap::new();
        for (idx, def) in self.defs.iter().enumerate() {
            if def.key.is_empty() || !def.key.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(GrammarError::InvalidKey(def.key.clone()));
            }
            if index.insert(def.key.clone(), idx).is_some() {
                return Err(GrammarError::DuplicateKey(def.key.clone()));
            }
            if def.spellings.is_empty() {
                return Err(GrammarError::EmptySpelling(def.key.clone()));
            }
            for spelling in &def.spellings {
                if spelling.is_empty() {
                    return Err(GrammarError::EmptySpelling(def.key.clone()));
                }
                if spelling_class(spelling) == SpellingClass::Mixed {
                    return Err(GrammarError::MixedSpelling {
                        key: def.key.clone(),
                        spelling: spelling.clone(),
                    });
                }
            }
        }
        for (key, _) in &self.meta_rules {
            if !index.contains_key(key) {
                return Err(GrammarError::UnknownMetaRuleKey(key.clone()));
            }
        }

        let order = containment_order(&self.defs)?;
        let mut rules = Vec::new();
        for &idx in &order {
            let def = &self.defs[idx];
            let marker = format!(" _{}_ ", def.key);
            for spelling in &def.spellings {
                let pattern = match spelling_class(spelling) {
                    SpellingClass::Word => format!(r"\b{}\b", regex::escape(spelling)),
                    SpellingClass::Symbolic => regex::escape(spelling),
                    SpellingClass::Mixed => unreachable!("rejected above"),
                };
                let pattern = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|_| GrammarError::InvalidSpelling {
                        key: def.key.clone(),
                        spelling: spelling.clone(),
                    })?;
                rules.push(MaskRule {
                    pattern,
                    marker: marker.clone(),
                });
            }
        }

        let levels: BTreeSet<i32> = self.defs.iter().filter_map(|def| def.priority).collect();

        Ok(Grammar {
            defs: self.defs,
            index,
            rules,
            levels: levels.into_iter().collect(),
            meta_rules: self.meta_rules,
            identity: self.identity.unwrap_or_else(|| "IS".to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpellingClass {
    Word,
    Symbolic,
    Mixed,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ' '
}

fn spelling_class(spelling: &str) -> SpellingClass {
    if spelling.chars().all(is_word_char) {
        SpellingClass::Word
    } else if spelling.chars().any(is_word_char) {
        SpellingClass::Mixed
    } else {
        SpellingClass::Symbolic
    }
}

/// Whether any spelling of `container` contains any spelling of `inner`.
fn contains_any(container: &OperatorDef, inner: &OperatorDef) -> bool {
    container
        .spellings
        .iter()
        .any(|c| inner.spellings.iter().any(|i| c.contains(i.as_str())))
}

/// Orders token definitions so that containing spellings are masked before
/// contained ones: if a spelling of B is a substring of a spelling of A,
/// A precedes B. Mutually containing pairs and containment cycles are
/// configuration errors.
fn containment_order(defs: &[OperatorDef]) -> Result<Vec<usize>, GrammarError> {
    let n = defs.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if contains_any(&defs[i], &defs[j]) && contains_any(&defs[j], &defs[i]) {
                return Err(GrammarError::MutualContainment {
                    a: defs[i].key.clone(),
                    b: defs[j].key.clone(),
                });
            }
        }
    }

    // container -> contained edges; Kahn's algorithm, stable by
    // definition order among ready nodes.
    let mut indegree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in 0..n {
            if i != j && contains_any(&defs[i], &defs[j]) {
                successors[i].push(j);
                indegree[j] += 1;
            }
        }
    }

    let mut emitted = vec![false; n];
    let mut order = Vec::with_capacity(n);
    while order.len() < n {
        let Some(next) = (0..n).find(|&i| !emitted[i] && indegree[i] == 0) else {
            // Indirect containment cycle across spelling sets.
            let mut remaining = (0..n).filter(|&i| !emitted[i]);
            let a = remaining.next().map(|i| defs[i].key.clone()).unwrap_or_default();
            let b = remaining.next().map(|i| defs[i].key.clone()).unwrap_or_default();
            return Err(GrammarError::MutualContainment { a, b });
        };
        emitted[next] = true;
        order.push(next);
        for &succ in &successors[next] {
            indegree[succ] -= 1;
        }
    }
    Ok(order)
}
