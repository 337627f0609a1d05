use strum::{Display, EnumIter, FromRepr};

use crate::expr::operator::{BinaryConnective, Quantifier, QuantifierOp, Restriction};

/// Stable discriminant of every expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr, Display)]
#[repr(u8)]
pub enum ExprType {
    // Any-expression metavariable (formula or term position)
    AnyExpression,

    // Atomic formulas
    SentenceLetter,
    Relation,
    InfixRelation,

    // Truth-functional operators
    Negation,
    Conditional,
    Conjunction,
    Disjunction,
    Biconditional,
    Nand,
    Nor,

    // Quantifiers
    Universal,
    Existential,
    BoundedUniversal,
    BoundedExistential,
    RestrictedUniversal,
    RestrictedExistential,

    // Terms
    Constant,
    Variable,
    Function,
    InfixFunction,

    // Metavariables
    MFormula,
    MComplexFormula,
    MTerm,
    MComplexTerm,
    PMTerm,
}

/// Coarse classification of an [`ExprType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ExprCategory {
    AnyExpression,
    Formula,
    Term,
}

impl ExprType {
    pub fn category(self) -> ExprCategory {
        use ExprType::*;
        match self {
            AnyExpression => ExprCategory::AnyExpression,
            Constant | Variable | Function | InfixFunction | MTerm | MComplexTerm | PMTerm => {
                ExprCategory::Term
            }
            _ => ExprCategory::Formula,
        }
    }

    pub fn is_metavariable(self) -> bool {
        use ExprType::*;
        matches!(
            self,
            AnyExpression | MFormula | MComplexFormula | MTerm | MComplexTerm | PMTerm
        )
    }

    pub fn is_quantifier(self) -> bool {
        use ExprType::*;
        matches!(
            self,
            Universal
                | Existential
                | BoundedUniversal
                | BoundedExistential
                | RestrictedUniversal
                | RestrictedExistential
        )
    }

    /// Negation and the six binary connectives.
    pub fn is_truth_functional(self) -> bool {
        use ExprType::*;
        matches!(
            self,
            Negation | Conditional | Conjunction | Disjunction | Biconditional | Nand | Nor
        )
    }
}

impl From<BinaryConnective> for ExprType {
    fn from(c: BinaryConnective) -> Self {
        match c {
            BinaryConnective::Conditional => ExprType::Conditional,
            BinaryConnective::Conjunction => ExprType::Conjunction,
            BinaryConnective::Disjunction => ExprType::Disjunction,
            BinaryConnective::Biconditional => ExprType::Biconditional,
            BinaryConnective::Nand => ExprType::Nand,
            BinaryConnective::Nor => ExprType::Nor,
        }
    }
}

impl From<&QuantifierOp> for ExprType {
    fn from(op: &QuantifierOp) -> Self {
        use Quantifier::*;
        match (&op.restriction, op.quantifier) {
            (Restriction::None, Universal) => ExprType::Universal,
            (Restriction::None, Existential) => ExprType::Existential,
            (Restriction::Bounded { .. }, Universal) => ExprType::BoundedUniversal,
            (Restriction::Bounded { .. }, Existential) => ExprType::BoundedExistential,
            (Restriction::Restricted { .. }, Universal) => ExprType::RestrictedUniversal,
            (Restriction::Restricted { .. }, Existential) => ExprType::RestrictedExistential,
        }
    }
}
