//! Operators: truth-functional connectives and quantifier prefixes.
use strum::{Display, EnumIs, EnumIter};

use crate::expr::formula::Formula;
use crate::expr::term::Term;
use crate::symbol::{Brackets, Layout, Symbol};

/// The six binary truth-functional connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumIs, Display)]
pub enum BinaryConnective {
    Conditional,
    Conjunction,
    Disjunction,
    Biconditional,
    Nand,
    Nor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumIs, Display)]
pub enum Quantifier {
    Universal,
    Existential,
}

/// What a quantifier prefix restricts its bound variable by, if anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Restriction {
    /// `∀x`
    None,
    /// `(∀x < t)`: an infix relation between the bound variable and a term.
    Bounded {
        relation: Symbol,
        bound: Term,
        brackets: Layout<Brackets>,
    },
    /// `(∀x: Fx)`: a formula the bound variable must satisfy.
    Restricted {
        divider: Symbol,
        formula: Box<Formula>,
        brackets: Layout<Brackets>,
    },
}

/// A quantifier prefix together with its auxiliary parts.
///
/// Equality covers the quantifier glyph, the bound variable and, for bounded
/// and restricted forms, the relation/bound or divider/formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantifierOp {
    pub symbol: Symbol,
    pub quantifier: Quantifier,
    pub variable: Term,
    pub restriction: Restriction,
}

impl QuantifierOp {
    /// `∀x` / `∃x`.
    pub fn plain(symbol: Symbol, quantifier: Quantifier, variable: Term) -> Self {
        Self {
            symbol,
            quantifier,
            variable,
            restriction: Restriction::None,
        }
    }

    /// `(∀x < t)`.
    pub fn bounded(
        symbol: Symbol,
        quantifier: Quantifier,
        variable: Term,
        relation: Symbol,
        bound: Term,
        brackets: Brackets,
    ) -> Self {
        Self {
            symbol,
            quantifier,
            variable,
            restriction: Restriction::Bounded {
                relation,
                bound,
                brackets: Layout(brackets),
            },
        }
    }

    /// `(∀x: Fx)`.
    pub fn restricted(
        symbol: Symbol,
        quantifier: Quantifier,
        variable: Term,
        divider: Symbol,
        formula: Formula,
        brackets: Brackets,
    ) -> Self {
        Self {
            symbol,
            quantifier,
            variable,
            restriction: Restriction::Restricted {
                divider,
                formula: Box::new(formula),
                brackets: Layout(brackets),
            },
        }
    }
}

/// Borrowed view of the main operator of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum Operator<'a> {
    Negation(&'a Symbol),
    Binary(&'a Symbol, BinaryConnective),
    Quantifier(&'a QuantifierOp),
}

impl<'a> Operator<'a> {
    /// Glyph the operator is written with.
    pub fn symbol(&self) -> &'a Symbol {
        match self {
            Operator::Negation(s) | Operator::Binary(s, _) => s,
            Operator::Quantifier(q) => &q.symbol,
        }
    }

    /// Negation and quantifiers take a single formula operand.
    pub fn is_unary(&self) -> bool {
        !self.is_binary()
    }
}
