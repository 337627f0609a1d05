//! Expression model: formulas, terms, operators and substitution transforms.
//!
//! Role
//! - [`Formula`] and [`Term`] are owned, immutable trees built by the
//!   [`parser`](crate::parser) or by the constructors on each type.
//! - [`Expression`] is the capability every node exposes: a stable
//!   [`ExprType`] tag, its children, its nesting level and (through
//!   [`pretty::PrettyExpr`]) its plain and styled renderings.
//! - [`Expr`] is the owned "formula or term" value metavariables bind to, and
//!   [`ExprRef`] its borrowed counterpart used for children.
//!
//! Equality semantics
//! - Structural and recursive over children, transforms included.
//! - Brackets, negated-infix display and the transform notation are
//!   presentation only and never affect equality (see [`Layout`](crate::symbol::Layout)).
//!
//! Example
//! ```
//! use hylogic::prelude::*;
//!
//! let lang = Language::sentential();
//! let parser = FormulaParser::new(&lang);
//! let f = parser.parse_formula("(P → ~Q)").unwrap();
//! assert_eq!(f.type_(), ExprType::Conditional);
//! assert_eq!(f.level(), 2);
//! assert_eq!(f.to_string(), "(P → ~Q)");
//! ```
pub mod formula;
pub mod operator;
pub mod pretty;
pub mod term;
pub mod transform;
pub mod variant;

use smallvec::SmallVec;
use strum::{EnumIs, EnumTryAs};

pub use formula::{Formula, FormulaKind};
pub use operator::{BinaryConnective, Operator, Quantifier, QuantifierOp, Restriction};
pub use term::{Term, TermKind, TermType};
pub use transform::SubstitutionTransform;
pub use variant::{ExprCategory, ExprType};

/// Capability shared by every expression node.
pub trait Expression {
    /// Discriminant for switch-style dispatch.
    fn type_(&self) -> ExprType;

    /// Ordered children, possibly empty.
    fn children(&self) -> SmallVec<ExprRef<'_>, 4>;

    /// Nesting level: `0` for leaves, otherwise one more than the deepest child.
    fn level(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.level() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Sentences are formula-valued; terms are not.
    fn is_sentence(&self) -> bool {
        self.type_().category() != ExprCategory::Term
    }
}

/// Borrowed child of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum ExprRef<'a> {
    Formula(&'a Formula),
    Term(&'a Term),
}

impl<'a> ExprRef<'a> {
    pub fn to_owned(&self) -> Expr {
        match self {
            ExprRef::Formula(f) => Expr::Formula((*f).clone()),
            ExprRef::Term(t) => Expr::Term((*t).clone()),
        }
    }
}

impl<'a> Expression for ExprRef<'a> {
    fn type_(&self) -> ExprType {
        match self {
            ExprRef::Formula(f) => f.type_(),
            ExprRef::Term(t) => t.type_(),
        }
    }

    fn children(&self) -> SmallVec<ExprRef<'_>, 4> {
        match self {
            ExprRef::Formula(f) => f.children(),
            ExprRef::Term(t) => t.children(),
        }
    }

    fn is_sentence(&self) -> bool {
        self.is_formula()
    }
}

/// Owned formula or term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum Expr {
    Formula(Formula),
    Term(Term),
}

impl Expr {
    pub fn as_ref(&self) -> ExprRef<'_> {
        match self {
            Expr::Formula(f) => ExprRef::Formula(f),
            Expr::Term(t) => ExprRef::Term(t),
        }
    }

    pub fn has_metavariables(&self) -> bool {
        match self {
            Expr::Formula(f) => f.has_metavariables(),
            Expr::Term(t) => t.has_metavariables(),
        }
    }
}

impl From<Formula> for Expr {
    fn from(f: Formula) -> Self {
        Expr::Formula(f)
    }
}

impl From<Term> for Expr {
    fn from(t: Term) -> Self {
        Expr::Term(t)
    }
}

impl Expression for Expr {
    fn type_(&self) -> ExprType {
        self.as_ref().type_()
    }

    fn children(&self) -> SmallVec<ExprRef<'_>, 4> {
        match self {
            Expr::Formula(f) => f.children(),
            Expr::Term(t) => t.children(),
        }
    }

    fn is_sentence(&self) -> bool {
        self.is_formula()
    }
}
