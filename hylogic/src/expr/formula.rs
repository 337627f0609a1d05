//! Formulas: the Boolean-valued half of the expression model.
use smallvec::SmallVec;

use crate::expr::operator::{BinaryConnective, Operator, QuantifierOp, Restriction};
use crate::expr::term::Term;
use crate::expr::transform::SubstitutionTransform;
use crate::expr::variant::ExprType;
use crate::expr::{ExprRef, Expression};
use crate::symbol::{Brackets, Layout, Symbol};

/// Outer constructor of a [`Formula`].
///
/// Atomic kinds carry no main operator. Brackets, the complement glyph of
/// infix relations and similar presentation data are wrapped in [`Layout`]
/// and do not take part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormulaKind {
    Letter(Symbol),
    Relation {
        relation: Symbol,
        args: Vec<Term>,
    },
    /// `a = b`. When `negated` holds a complement glyph the atomic was
    /// written negated (`a ≠ b`) and sits under a negation.
    Infix {
        relation: Symbol,
        left: Term,
        right: Term,
        negated: Layout<Option<Symbol>>,
    },
    Meta(Symbol),
    ComplexMeta {
        symbol: Symbol,
        params: Vec<Term>,
        brackets: Layout<Brackets>,
    },
    /// Any-expression metavariable written in formula position.
    AnyMeta(Symbol),
    Negation {
        symbol: Symbol,
        inner: Box<Formula>,
    },
    Binary {
        symbol: Symbol,
        connective: BinaryConnective,
        left: Box<Formula>,
        right: Box<Formula>,
        /// `None` only for an outermost formula written without brackets.
        brackets: Layout<Option<Brackets>>,
    },
    Quantified {
        op: QuantifierOp,
        inner: Box<Formula>,
    },
}

/// A formula, optionally annotated with a substitution transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula {
    kind: FormulaKind,
    transform: Option<Box<SubstitutionTransform>>,
}

impl Formula {
    pub fn new(kind: FormulaKind) -> Self {
        Self {
            kind,
            transform: None,
        }
    }

    pub fn letter(symbol: Symbol) -> Self {
        Self::new(FormulaKind::Letter(symbol))
    }

    pub fn relation(relation: Symbol, args: Vec<Term>) -> Self {
        Self::new(FormulaKind::Relation { relation, args })
    }

    pub fn infix(relation: Symbol, left: Term, right: Term) -> Self {
        Self::new(FormulaKind::Infix {
            relation,
            left,
            right,
            negated: Layout(None),
        })
    }

    /// `a ≠ b`: the negation of `a = b`, displayed with the complement glyph.
    pub fn negated_infix(
        negation: Symbol,
        relation: Symbol,
        complement: Symbol,
        left: Term,
        right: Term,
    ) -> Self {
        let atomic = Self::new(FormulaKind::Infix {
            relation,
            left,
            right,
            negated: Layout(Some(complement)),
        });
        Self::negation(negation, atomic)
    }

    pub fn meta(symbol: Symbol) -> Self {
        Self::new(FormulaKind::Meta(symbol))
    }

    pub fn complex_meta(symbol: Symbol, params: Vec<Term>, brackets: Brackets) -> Self {
        Self::new(FormulaKind::ComplexMeta {
            symbol,
            params,
            brackets: Layout(brackets),
        })
    }

    pub fn any_meta(symbol: Symbol) -> Self {
        Self::new(FormulaKind::AnyMeta(symbol))
    }

    pub fn negation(symbol: Symbol, inner: Formula) -> Self {
        Self::new(FormulaKind::Negation {
            symbol,
            inner: Box::new(inner),
        })
    }

    pub fn binary(
        symbol: Symbol,
        connective: BinaryConnective,
        left: Formula,
        right: Formula,
        brackets: Option<Brackets>,
    ) -> Self {
        Self::new(FormulaKind::Binary {
            symbol,
            connective,
            left: Box::new(left),
            right: Box::new(right),
            brackets: Layout(brackets),
        })
    }

    pub fn quantified(op: QuantifierOp, inner: Formula) -> Self {
        Self::new(FormulaKind::Quantified {
            op,
            inner: Box::new(inner),
        })
    }

    /// Attach (or replace) the substitution transform.
    pub fn with_transform(mut self, transform: SubstitutionTransform) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Same formula with its transform removed.
    pub fn without_transform(mut self) -> Self {
        self.transform = None;
        self
    }

    #[inline]
    pub fn kind(&self) -> &FormulaKind {
        &self.kind
    }

    #[inline]
    pub fn transform(&self) -> Option<&SubstitutionTransform> {
        self.transform.as_deref()
    }

    /// Main operator, absent for atomic formulas.
    pub fn main_operator(&self) -> Option<Operator<'_>> {
        match &self.kind {
            FormulaKind::Negation { symbol, .. } => Some(Operator::Negation(symbol)),
            FormulaKind::Binary {
                symbol, connective, ..
            } => Some(Operator::Binary(symbol, *connective)),
            FormulaKind::Quantified { op, .. } => Some(Operator::Quantifier(op)),
            _ => None,
        }
    }

    /// Formula operands of the main operator (empty for atomics).
    pub fn operands(&self) -> SmallVec<&Formula, 2> {
        let mut out = SmallVec::new();
        match &self.kind {
            FormulaKind::Negation { inner, .. } | FormulaKind::Quantified { inner, .. } => {
                out.push(&**inner)
            }
            FormulaKind::Binary { left, right, .. } => {
                out.push(&**left);
                out.push(&**right);
            }
            _ => {}
        }
        out
    }

    /// A formula is basic for truth tables when it has no children, or when
    /// one of its children is not a sentence. Quantified formulas are basic
    /// because the bound variable is a term child.
    pub fn is_basic(&self) -> bool {
        let children = self.children();
        children.is_empty() || children.iter().any(|c| !c.is_sentence())
    }

    /// `true` if a metavariable occurs anywhere in the formula, transform included.
    pub fn has_metavariables(&self) -> bool {
        if self.type_().is_metavariable() {
            return true;
        }
        if let Some(t) = &self.transform {
            if t.has_metavariables() {
                return true;
            }
        }
        self.children().iter().any(|c| match c {
            ExprRef::Formula(f) => f.has_metavariables(),
            ExprRef::Term(t) => t.has_metavariables(),
        })
    }

    /// Replace the free occurrences of `variable` by `replacement`.
    ///
    /// Occurrences bound by a quantifier on the same variable are left alone,
    /// the bound of a bounded quantifier lies outside its scope. No renaming
    /// is performed.
    pub fn substitute(&self, variable: &Term, replacement: &Term) -> Formula {
        let sub = |t: &Term| t.substitute(variable, replacement);
        let kind = match &self.kind {
            FormulaKind::Relation { relation, args } => FormulaKind::Relation {
                relation: relation.clone(),
                args: args.iter().map(sub).collect(),
            },
            FormulaKind::Infix {
                relation,
                left,
                right,
                negated,
            } => FormulaKind::Infix {
                relation: relation.clone(),
                left: sub(left),
                right: sub(right),
                negated: negated.clone(),
            },
            FormulaKind::ComplexMeta {
                symbol,
                params,
                brackets,
            } => FormulaKind::ComplexMeta {
                symbol: symbol.clone(),
                params: params.iter().map(sub).collect(),
                brackets: *brackets,
            },
            FormulaKind::Negation { symbol, inner } => FormulaKind::Negation {
                symbol: symbol.clone(),
                inner: Box::new(inner.substitute(variable, replacement)),
            },
            FormulaKind::Binary {
                symbol,
                connective,
                left,
                right,
                brackets,
            } => FormulaKind::Binary {
                symbol: symbol.clone(),
                connective: *connective,
                left: Box::new(left.substitute(variable, replacement)),
                right: Box::new(right.substitute(variable, replacement)),
                brackets: *brackets,
            },
            FormulaKind::Quantified { op, inner } => {
                let captured = op.variable == *variable;
                let restriction = match &op.restriction {
                    Restriction::None => Restriction::None,
                    Restriction::Bounded {
                        relation,
                        bound,
                        brackets,
                    } => Restriction::Bounded {
                        relation: relation.clone(),
                        bound: sub(bound),
                        brackets: *brackets,
                    },
                    Restriction::Restricted {
                        divider,
                        formula,
                        brackets,
                    } => Restriction::Restricted {
                        divider: divider.clone(),
                        formula: if captured {
                            formula.clone()
                        } else {
                            Box::new(formula.substitute(variable, replacement))
                        },
                        brackets: *brackets,
                    },
                };
                FormulaKind::Quantified {
                    op: QuantifierOp {
                        symbol: op.symbol.clone(),
                        quantifier: op.quantifier,
                        variable: op.variable.clone(),
                        restriction,
                    },
                    inner: if captured {
                        inner.clone()
                    } else {
                        Box::new(inner.substitute(variable, replacement))
                    },
                }
            }
            FormulaKind::Letter(_) | FormulaKind::Meta(_) | FormulaKind::AnyMeta(_) => {
                self.kind.clone()
            }
        };
        Formula {
            kind,
            transform: self
                .transform
                .as_ref()
                .map(|t| Box::new(t.substitute_inside(variable, replacement))),
        }
    }
}

impl Expression for Formula {
    fn type_(&self) -> ExprType {
        match &self.kind {
            FormulaKind::Letter(_) => ExprType::SentenceLetter,
            FormulaKind::Relation { .. } => ExprType::Relation,
            FormulaKind::Infix { .. } => ExprType::InfixRelation,
            FormulaKind::Meta(_) => ExprType::MFormula,
            FormulaKind::ComplexMeta { .. } => ExprType::MComplexFormula,
            FormulaKind::AnyMeta(_) => ExprType::AnyExpression,
            FormulaKind::Negation { .. } => ExprType::Negation,
            FormulaKind::Binary { connective, .. } => ExprType::from(*connective),
            FormulaKind::Quantified { op, .. } => ExprType::from(op),
        }
    }

    fn children(&self) -> SmallVec<ExprRef<'_>, 4> {
        let mut out = SmallVec::new();
        match &self.kind {
            FormulaKind::Letter(_) | FormulaKind::Meta(_) | FormulaKind::AnyMeta(_) => {}
            FormulaKind::Relation { args, .. } => out.extend(args.iter().map(ExprRef::Term)),
            FormulaKind::ComplexMeta { params, .. } => {
                out.extend(params.iter().map(ExprRef::Term))
            }
            FormulaKind::Infix { left, right, .. } => {
                out.push(ExprRef::Term(left));
                out.push(ExprRef::Term(right));
            }
            FormulaKind::Negation { inner, .. } => out.push(ExprRef::Formula(inner)),
            FormulaKind::Binary { left, right, .. } => {
                out.push(ExprRef::Formula(left));
                out.push(ExprRef::Formula(right));
            }
            FormulaKind::Quantified { op, inner } => {
                out.push(ExprRef::Term(&op.variable));
                match &op.restriction {
                    Restriction::None => {}
                    Restriction::Bounded { bound, .. } => out.push(ExprRef::Term(bound)),
                    Restriction::Restricted { formula, .. } => {
                        out.push(ExprRef::Formula(formula))
                    }
                }
                out.push(ExprRef::Formula(inner));
            }
        }
        out
    }
}
