//! # rule-expr
//!
//! A grammar-driven parser that turns free-form rule condition expressions
//! into syntax trees.
//!
//! This crate provides:
//! - **Declarative grammars**: a dialect is data (token spellings, arities,
//!   priorities, meta-rules), not hand-written parse code
//! - **Ready-made dialects**: boolean, arithmetic, logical and threshold
//!   expression grammars
//! - **Syntax trees**: plain owned nodes for an external evaluator to walk
//!
//! Parsing happens on a flat token sequence: reserved spellings are masked
//! (containing spellings before contained ones, so `<=` never reads as `<`
//! plus a stray `=`), precedence is encoded by bracketing tightly-bound
//! operator spans in place, compound operators are rewritten into
//! primitives by their meta-rules, and the bracketed sequence is folded
//! into a nested tree. Evaluating the tree is the consumer's job; the
//! crate is a pure text-to-tree transform.
//!
//! ## Usage
//!
//! ```rust
//! use rule_expr::{dialect, Parser};
//!
//! let parser = Parser::new(dialect::boolean());
//!
//! // Parse a condition into a tree and show its normalized form.
//! let tree = parser.parse("(Check_A & Check_B) | !Check_C").unwrap();
//! assert_eq!(tree.flatten(), "( Check_A AND Check_B ) OR ( NOT Check_C )");
//!
//! // List the free variables the evaluator has to bind.
//! assert_eq!(parser.operands("Check_C AND Check_D"), ["Check_C", "Check_D"]);
//! ```
//!
//! Equal-priority operators chain left to right:
//!
//! ```rust
//! use rule_expr::{dialect, Parser};
//!
//! let parser = Parser::new(dialect::threshold());
//! let tree = parser.parse("Job_A TR50 Job_B TR50 Job_C").unwrap();
//! assert_eq!(tree.flatten(), "( Job_A TR50 Job_B ) TR50 Job_C");
//! ```
//!
//! ## Dialect quick reference
//!
//! | Dialect | Operators | Notes |
//! |---------|-----------|-------|
//! | [`dialect::boolean`] | not, and, xor, or + compounds imp, nand, nor, xnor | compounds rewritten via meta-rules |
//! | [`dialect::arithmetic`] | `! v ^ / * - +` | experimental |
//! | [`dialect::logical`] | boolean + `< <= >= > <> ==` | comparisons bind tighter |
//! | [`dialect::threshold`] | logical + `TR10` … `TR90` | threshold semantics live in the evaluator |
//!
//! Every operator also has a keyword spelling (`AND`, `OR`, `NOT`, …);
//! keyword matching is case-insensitive, operand names keep their case.
//! Custom dialects are assembled with [`GrammarBuilder`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod dialect;
mod error;
mod formatter;
mod grammar;
mod parser;
mod tree;

pub use error::{GrammarError, ParseError, ParseResult};
pub use grammar::{Arity, Grammar, GrammarBuilder};
pub use parser::Parser;
pub use tree::{NodeKind, SyntaxNode};
