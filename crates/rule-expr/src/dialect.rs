//! Ready-made dialect grammars.
//!
//! Four dialects are provided: plain boolean logic, experimental
//! arithmetic, logical (boolean plus relational comparisons) and threshold
//! (logical plus the `TR10` … `TR90` percentage operators used for job
//! dependency conditions). Threshold semantics live in the consumer's
//! evaluator; here `TRnn` is just another infix operator.
//!
//! The tables are static and known-valid, so the constructors return the
//! grammar directly.

use crate::grammar::{Grammar, GrammarBuilder};

fn boolean_rules() -> GrammarBuilder {
    GrammarBuilder::new()
        .group("GROUP", &["(", "[", "{"])
        .group_close("UNGROUP", &[")", "]", "}"])
        .prefix("IS", &[":", "IS"], 5)
        .prefix("NOT", &["!", "NOT"], 5)
        .infix("AND", &["&", "AND"], 21)
        .infix("XOR", &["><", "XOR"], 22)
        .infix("OR", &["|", "OR"], 23)
        .infix("IMP", &["=>", "IMP"], 24)
        .infix("NAND", &["!&", "NAND"], 25)
        .infix("XNOR", &["!><", "XNOR"], 26)
        .infix("NOR", &["!|", "NOR"], 27)
        .meta_rule("IMP", "!LEFT | RIGHT")
        .meta_rule("NAND", "!(LEFT & RIGHT)")
        .meta_rule("NOR", "!(LEFT | RIGHT)")
        .meta_rule("XNOR", "!(LEFT >< RIGHT)")
}

fn logical_rules() -> GrammarBuilder {
    boolean_rules()
        .infix("GE", &[">="], 10)
        .infix("LT", &["<"], 10)
        .infix("GT", &[">"], 10)
        .infix("LE", &["<="], 10)
        .infix("NE", &["<>", "!="], 11)
        .infix("EQ", &["==", "="], 11)
}

/// Boolean expressions: `&`, `|`, `!`, `><` plus the compound operators
/// `=>`, `!&`, `!|`, `!><` (rewritten into the primitives by meta-rules),
/// with keyword alternates for all of them.
pub fn boolean() -> Grammar {
    boolean_rules()
        .build()
        .expect("boolean dialect tables are valid")
}

/// Arithmetic expressions (experimental): `+ - * / ^` and friends. Lower
/// priority values bind tighter, so `MULT`/`DIV` nest below `PLUS`/`MINUS`.
pub fn arithmetic() -> Grammar {
    GrammarBuilder::new()
        .group("GROUP", &["(", "[", "{"])
        .group_close("UNGROUP", &[")", "]", "}"])
        .prefix("NEGATIVE", &["!", "NEGATIVE"], 1)
        .infix("SQR", &["v", "SQUARED"], 2)
        .infix("POW", &["^", "POWERED"], 2)
        .infix("DIV", &["/", "DIVIDED"], 3)
        .infix("MULT", &["*", "MULTIPLIED"], 3)
        .infix("MINUS", &["-", "MINUS"], 4)
        .infix("PLUS", &["+", "PLUS"], 4)
        .build()
        .expect("arithmetic dialect tables are valid")
}

/// Boolean expressions extended with the relational operators
/// `< <= >= > <> == `, which bind tighter than any boolean connective.
pub fn logical() -> Grammar {
    logical_rules()
        .build()
        .expect("logical dialect tables are valid")
}

/// Logical expressions extended with the threshold operators `TR10` …
/// `TR90`, all at one priority so chains fold left to right.
pub fn threshold() -> Grammar {
    let mut rules = logical_rules();
    for pct in (10..=90).step_by(10) {
        let key = format!("TR{pct}");
        rules = rules.infix(&key, &[key.as_str()], 21);
    }
    rules.build().expect("threshold dialect tables are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_dialects_build() {
        assert!(boolean().contains_key("NAND"));
        assert!(arithmetic().contains_key("POW"));
        assert!(logical().contains_key("LE"));
        assert!(threshold().contains_key("TR50"));
    }

    #[test]
    fn layered_dialects_keep_their_base_tables() {
        let grammar = threshold();
        for key in ["AND", "OR", "NOT", "IMP", "LE", "EQ", "TR10", "TR90"] {
            assert!(grammar.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn identity_defaults_to_is() {
        assert_eq!(boolean().identity(), "IS");
        assert_eq!(arithmetic().identity(), "IS");
    }
}
