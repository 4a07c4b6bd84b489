//! Error types for grammar construction and expression parsing.

use thiserror::Error;

/// Errors detected once, when a [`Grammar`](crate::Grammar) is built.
///
/// These are configuration mistakes in the dialect tables themselves and are
/// reported by [`GrammarBuilder::build`](crate::GrammarBuilder::build), before
/// any expression is parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// An operator key is empty or contains non-alphanumeric characters.
    #[error("invalid operator key {0:?}: keys must be non-empty ASCII alphanumerics")]
    InvalidKey(String),

    /// The same operator key was defined twice.
    #[error("duplicate operator key {0:?}")]
    DuplicateKey(String),

    /// An operator was defined without any spelling, or with an empty one.
    #[error("operator {0} has an empty spelling")]
    EmptySpelling(String),

    /// A spelling mixes word characters (`[A-Za-z0-9_ ]`) with symbols.
    #[error("spelling {spelling:?} of operator {key} mixes word and symbol characters")]
    MixedSpelling {
        /// The operator key the spelling belongs to.
        key: String,
        /// The offending spelling.
        spelling: String,
    },

    /// A spelling could not be compiled into a match pattern.
    #[error("spelling {spelling:?} of operator {key} is not matchable")]
    InvalidSpelling {
        /// The operator key the spelling belongs to.
        key: String,
        /// The offending spelling.
        spelling: String,
    },

    /// Two operators' spellings contain each other, so no masking order
    /// can disambiguate them.
    #[error("token spellings of {a} and {b} contain each other")]
    MutualContainment {
        /// One operator of the ambiguous pair.
        a: String,
        /// The other operator of the ambiguous pair.
        b: String,
    },

    /// A meta-rule was declared for a key that has no token definition.
    #[error("meta rule references undefined operator {0}")]
    UnknownMetaRuleKey(String),
}

/// Errors raised while parsing a single expression.
///
/// These are data-dependent: the grammar is fine, the input is not. The
/// failing call produces no partial tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The expression contained no tokens at all.
    #[error("empty expression")]
    EmptyExpression,

    /// A closing bracket appeared with no opening bracket to match.
    #[error("closing bracket without a matching opening bracket")]
    UnmatchedGroupClose,

    /// An opening bracket was never closed.
    #[error("opening bracket without a matching closing bracket")]
    UnmatchedGroupOpen,

    /// A meta-rule operator had nothing usable to its left.
    #[error("no left operand found for operator {operator}")]
    MissingLeftOperand {
        /// The operator whose expansion failed.
        operator: String,
    },

    /// A meta-rule operator had nothing usable to its right.
    #[error("no right operand found for operator {operator}")]
    MissingRightOperand {
        /// The operator whose expansion failed.
        operator: String,
    },

    /// Bracket nesting exceeded the folding depth ceiling.
    #[error("expression nesting exceeds {limit} levels")]
    NestingTooDeep {
        /// The configured ceiling.
        limit: usize,
    },

    /// Meta-rule expansion kept producing rewritable operators; the rule
    /// set most likely rewrites in a cycle.
    #[error("meta rule expansion did not settle within {limit} passes")]
    RewriteLimit {
        /// The configured pass ceiling.
        limit: usize,
    },
}

/// Result type for parse operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
