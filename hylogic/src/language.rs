//! Object languages: which glyphs mean what.
//!
//! A [`Language`] is the symbol table the parser, the renderer and the
//! head-item tokenizer consult. Every glyph belongs to exactly one class;
//! [`Language::validate`] enforces that and rejects glyphs reserved by the
//! concrete syntax (`,` `/` `^` `_`).
//!
//! Connective fields list every accepted glyph for the operator, the first
//! one being the primary glyph (used when the engine has to synthesize a
//! symbol, e.g. the negation behind `a ≠ b`).
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expr::operator::{BinaryConnective, Quantifier};
use crate::symbol::Brackets;

/// Characters the concrete syntax uses for transforms and argument lists.
pub const RESERVED_GLYPHS: [char; 4] = [',', '/', '^', '_'];

/// An infix relation glyph and, optionally, the glyph of its complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfixRelation {
    pub symbol: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<char>,
}

impl InfixRelation {
    pub const fn new(symbol: char, complement: Option<char>) -> Self {
        Self { symbol, complement }
    }
}

/// Operator glyphs handed to the head-item tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSet {
    pub unary: Vec<char>,
    pub binary: Vec<char>,
    /// Quantifier glyphs. Unary operators in the scope of one stay in its item.
    #[serde(default)]
    pub binders: Vec<char>,
}

impl OperatorSet {
    pub fn new(unary: impl IntoIterator<Item = char>, binary: impl IntoIterator<Item = char>) -> Self {
        Self {
            unary: unary.into_iter().collect(),
            binary: binary.into_iter().collect(),
            binders: Vec::new(),
        }
    }

    pub fn with_binders(mut self, binders: impl IntoIterator<Item = char>) -> Self {
        self.binders = binders.into_iter().collect();
        self
    }

    #[inline]
    pub fn is_unary(&self, c: char) -> bool {
        self.unary.contains(&c)
    }

    #[inline]
    pub fn is_binary(&self, c: char) -> bool {
        self.binary.contains(&c)
    }

    #[inline]
    pub fn is_binder(&self, c: char) -> bool {
        self.binders.contains(&c)
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.is_unary(c) || self.is_binary(c)
    }
}

/// Symbol table of one object language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    /// Sentence letters, also used as relation symbols when followed by terms.
    pub letters: String,
    pub constants: String,
    pub variables: String,
    pub functions: String,
    pub infix_relations: Vec<InfixRelation>,
    pub infix_functions: String,

    pub negation: String,
    pub conditional: String,
    pub conjunction: String,
    pub disjunction: String,
    pub biconditional: String,
    pub nand: String,
    pub nor: String,
    pub universal: String,
    pub existential: String,
    /// Separator of a restricted quantifier, `(∀x: Fx)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divider: Option<char>,
    pub brackets: Vec<Brackets>,

    pub formula_metas: String,
    pub term_metas: String,
    /// Metavariables ranging over object-language variables only.
    pub variable_metas: String,
    pub any_metas: String,
}

impl Default for Language {
    fn default() -> Self {
        Self::sentential()
    }
}

impl Language {
    pub const SENTENTIAL: &'static str = "Sentential";
    pub const PREDICATE: &'static str = "Predicate";

    /// Propositional language: sentence letters and the seven connectives.
    pub fn sentential() -> Self {
        Self {
            name: Self::SENTENTIAL.to_string(),
            letters: ('A'..='Z').collect(),
            constants: String::new(),
            variables: String::new(),
            functions: String::new(),
            infix_relations: Vec::new(),
            infix_functions: String::new(),
            negation: "~¬".to_string(),
            conditional: "→⊃".to_string(),
            conjunction: "∧&".to_string(),
            disjunction: "∨".to_string(),
            biconditional: "↔≡".to_string(),
            nand: "↑".to_string(),
            nor: "↓".to_string(),
            universal: String::new(),
            existential: String::new(),
            divider: None,
            brackets: vec![Brackets::ROUND, Brackets::SQUARE, Brackets::CURLY],
            formula_metas: "αβγδεζηθικλμ".to_string(),
            term_metas: "ρστυφχψω".to_string(),
            variable_metas: "νξπ".to_string(),
            any_metas: "ΓΔΘΛΞΠΣΦΨΩ".to_string(),
        }
    }

    /// First-order language: adds terms, relations, infix symbols and quantifiers.
    pub fn predicate() -> Self {
        Self {
            name: Self::PREDICATE.to_string(),
            constants: "abcdeijklmnopqrst".to_string(),
            variables: "uvwxyz".to_string(),
            functions: "fgh".to_string(),
            infix_relations: vec![
                InfixRelation::new('=', Some('≠')),
                InfixRelation::new('<', Some('≮')),
                InfixRelation::new('≤', Some('≰')),
            ],
            infix_functions: "+×*".to_string(),
            universal: "∀".to_string(),
            existential: "∃".to_string(),
            divider: Some(':'),
            ..Self::sentential()
        }
    }

    /// Glyph used when the engine synthesizes a negation.
    pub fn primary_negation(&self) -> char {
        self.negation.chars().next().unwrap_or('~')
    }

    /// Primary glyph of a binary connective, if the language has one.
    pub fn primary_glyph(&self, connective: BinaryConnective) -> Option<char> {
        self.connective_glyphs(connective).chars().next()
    }

    fn connective_glyphs(&self, connective: BinaryConnective) -> &str {
        match connective {
            BinaryConnective::Conditional => &self.conditional,
            BinaryConnective::Conjunction => &self.conjunction,
            BinaryConnective::Disjunction => &self.disjunction,
            BinaryConnective::Biconditional => &self.biconditional,
            BinaryConnective::Nand => &self.nand,
            BinaryConnective::Nor => &self.nor,
        }
    }

    #[inline]
    pub fn is_negation(&self, c: char) -> bool {
        self.negation.contains(c)
    }

    pub fn connective(&self, c: char) -> Option<BinaryConnective> {
        use BinaryConnective::*;
        [Conditional, Conjunction, Disjunction, Biconditional, Nand, Nor]
            .into_iter()
            .find(|op| self.connective_glyphs(*op).contains(c))
    }

    pub fn quantifier(&self, c: char) -> Option<Quantifier> {
        if self.universal.contains(c) {
            Some(Quantifier::Universal)
        } else if self.existential.contains(c) {
            Some(Quantifier::Existential)
        } else {
            None
        }
    }

    pub fn opening(&self, c: char) -> Option<Brackets> {
        self.brackets.iter().copied().find(|b| b.open == c)
    }

    pub fn closing(&self, c: char) -> Option<Brackets> {
        self.brackets.iter().copied().find(|b| b.close == c)
    }

    pub fn infix_relation(&self, c: char) -> Option<&InfixRelation> {
        self.infix_relations.iter().find(|r| r.symbol == c)
    }

    /// Infix relation whose complement glyph is `c`.
    pub fn complemented_relation(&self, c: char) -> Option<&InfixRelation> {
        self.infix_relations
            .iter()
            .find(|r| r.complement == Some(c))
    }

    /// Operator glyphs as seen by the head-item tokenizer.
    pub fn operator_set(&self) -> OperatorSet {
        let binary = [
            &self.conditional,
            &self.conjunction,
            &self.disjunction,
            &self.biconditional,
            &self.nand,
            &self.nor,
        ];
        OperatorSet::new(
            self.negation.chars(),
            binary.into_iter().flat_map(|s| s.chars()),
        )
        .with_binders(self.universal.chars().chain(self.existential.chars()))
    }

    fn glyph_classes(&self) -> Vec<(char, &'static str)> {
        let mut out = Vec::new();
        let mut push = |s: &str, class: &'static str| out.extend(s.chars().map(|c| (c, class)));
        push(&self.letters, "letter");
        push(&self.constants, "constant");
        push(&self.variables, "variable");
        push(&self.functions, "function");
        push(&self.infix_functions, "infix function");
        push(&self.negation, "negation");
        push(&self.conditional, "conditional");
        push(&self.conjunction, "conjunction");
        push(&self.disjunction, "disjunction");
        push(&self.biconditional, "biconditional");
        push(&self.nand, "nand");
        push(&self.nor, "nor");
        push(&self.universal, "universal quantifier");
        push(&self.existential, "existential quantifier");
        push(&self.formula_metas, "formula metavariable");
        push(&self.term_metas, "term metavariable");
        push(&self.variable_metas, "variable metavariable");
        push(&self.any_metas, "any-expression metavariable");
        for r in &self.infix_relations {
            out.push((r.symbol, "infix relation"));
            if let Some(c) = r.complement {
                out.push((c, "infix relation complement"));
            }
        }
        if let Some(d) = self.divider {
            out.push((d, "divider"));
        }
        for b in &self.brackets {
            out.push((b.open, "open bracket"));
            out.push((b.close, "close bracket"));
        }
        out
    }

    /// Check that no glyph is claimed twice and that none is reserved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let classes = self.glyph_classes();
        for (i, &(glyph, class)) in classes.iter().enumerate() {
            if RESERVED_GLYPHS.contains(&glyph) || glyph.is_whitespace() {
                return Err(ConfigError::ReservedGlyph {
                    language: self.name.clone(),
                    glyph,
                    class,
                });
            }
            if let Some(&(_, first)) = classes[..i].iter().find(|(c, _)| *c == glyph) {
                return Err(ConfigError::OverlappingGlyph {
                    language: self.name.clone(),
                    glyph,
                    first,
                    second: class,
                });
            }
        }
        Ok(())
    }
}

/// Registry resolving object-language names.
#[derive(Debug, Clone)]
pub struct Languages {
    entries: Vec<Language>,
}

impl Default for Languages {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Languages {
    /// Registry holding the sentential and predicate languages.
    pub fn builtin() -> Self {
        Self {
            entries: vec![Language::sentential(), Language::predicate()],
        }
    }

    /// Add a language, replacing any previous one with the same name.
    pub fn register(&mut self, language: Language) -> Result<(), ConfigError> {
        language.validate()?;
        match self.entries.iter_mut().find(|l| l.name == language.name) {
            Some(slot) => {
                log::debug!("replacing object language `{}`", language.name);
                *slot = language;
            }
            None => self.entries.push(language),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Language, ConfigError> {
        self.entries
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| ConfigError::UnknownLanguage(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|l| l.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_languages_are_valid() {
        Language::sentential().validate().unwrap();
        Language::predicate().validate().unwrap();
    }

    #[test]
    fn overlapping_glyph_is_rejected() {
        let mut lang = Language::predicate();
        lang.constants.push('x');
        let err = lang.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OverlappingGlyph { glyph: 'x', first: "constant", second: "variable", .. }
        ));
    }

    #[test]
    fn reserved_glyph_is_rejected() {
        let mut lang = Language::sentential();
        lang.nor.push('/');
        assert!(lang.validate().unwrap_err().is_reserved_glyph());
    }

    #[test]
    fn operator_set_lists_connectives() {
        let ops = Language::sentential().operator_set();
        assert!(ops.is_unary('~'));
        assert!(ops.is_binary('→'));
        assert!(ops.is_binary('&'));
        assert!(!ops.contains('P'));
    }
}
