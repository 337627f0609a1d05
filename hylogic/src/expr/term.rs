//! Terms: the value-valued half of the expression model.
use smallvec::SmallVec;
use strum::{Display, EnumIs};

use crate::expr::transform::SubstitutionTransform;
use crate::expr::variant::ExprType;
use crate::expr::{ExprRef, Expression};
use crate::symbol::{Brackets, Layout, Symbol};

/// Distinguishes ordinary terms from schematic ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Display)]
pub enum TermType {
    Ordinary,
    /// Metavariable over arbitrary terms (`MTERM`).
    Meta,
    /// Pseudo-metavariable over object-language variables only (`PMTERM`).
    PseudoMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    Constant(Symbol),
    Variable(Symbol),
    Function {
        symbol: Symbol,
        args: Vec<Term>,
        brackets: Layout<Brackets>,
    },
    Infix {
        symbol: Symbol,
        left: Box<Term>,
        right: Box<Term>,
        brackets: Layout<Brackets>,
    },
    Meta(Symbol),
    PseudoMeta(Symbol),
    ComplexMeta {
        symbol: Symbol,
        params: Vec<Term>,
        brackets: Layout<Brackets>,
    },
    /// Any-expression metavariable written in term position.
    AnyMeta(Symbol),
}

/// A term, optionally annotated with a substitution transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    kind: TermKind,
    transform: Option<Box<SubstitutionTransform>>,
}

impl Term {
    pub fn new(kind: TermKind) -> Self {
        Self {
            kind,
            transform: None,
        }
    }

    pub fn constant(symbol: Symbol) -> Self {
        Self::new(TermKind::Constant(symbol))
    }

    pub fn variable(symbol: Symbol) -> Self {
        Self::new(TermKind::Variable(symbol))
    }

    pub fn function(symbol: Symbol, args: Vec<Term>, brackets: Brackets) -> Self {
        Self::new(TermKind::Function {
            symbol,
            args,
            brackets: Layout(brackets),
        })
    }

    pub fn infix(symbol: Symbol, left: Term, right: Term, brackets: Brackets) -> Self {
        Self::new(TermKind::Infix {
            symbol,
            left: Box::new(left),
            right: Box::new(right),
            brackets: Layout(brackets),
        })
    }

    pub fn meta(symbol: Symbol) -> Self {
        Self::new(TermKind::Meta(symbol))
    }

    pub fn pseudo_meta(symbol: Symbol) -> Self {
        Self::new(TermKind::PseudoMeta(symbol))
    }

    pub fn complex_meta(symbol: Symbol, params: Vec<Term>, brackets: Brackets) -> Self {
        Self::new(TermKind::ComplexMeta {
            symbol,
            params,
            brackets: Layout(brackets),
        })
    }

    pub fn any_meta(symbol: Symbol) -> Self {
        Self::new(TermKind::AnyMeta(symbol))
    }

    /// Attach (or replace) the substitution transform.
    pub fn with_transform(mut self, transform: SubstitutionTransform) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Same term with its transform removed.
    pub fn without_transform(mut self) -> Self {
        self.transform = None;
        self
    }

    #[inline]
    pub fn kind(&self) -> &TermKind {
        &self.kind
    }

    #[inline]
    pub fn transform(&self) -> Option<&SubstitutionTransform> {
        self.transform.as_deref()
    }

    pub fn term_type(&self) -> TermType {
        match self.kind {
            TermKind::Meta(_) | TermKind::ComplexMeta { .. } | TermKind::AnyMeta(_) => {
                TermType::Meta
            }
            TermKind::PseudoMeta(_) => TermType::PseudoMeta,
            _ => TermType::Ordinary,
        }
    }

    /// `true` for object-language variables.
    pub fn is_variable(&self) -> bool {
        self.transform.is_none() && matches!(self.kind, TermKind::Variable(_))
    }

    /// `true` if a metavariable occurs anywhere in the term, transform included.
    pub fn has_metavariables(&self) -> bool {
        if self.term_type() != TermType::Ordinary {
            return true;
        }
        if let Some(t) = &self.transform {
            if t.has_metavariables() {
                return true;
            }
        }
        self.child_terms().iter().any(|t| t.has_metavariables())
    }

    pub(crate) fn child_terms(&self) -> SmallVec<&Term, 2> {
        match &self.kind {
            TermKind::Function { args, .. } => args.iter().collect(),
            TermKind::ComplexMeta { params, .. } => params.iter().collect(),
            TermKind::Infix { left, right, .. } => {
                let mut out = SmallVec::new();
                out.push(&**left);
                out.push(&**right);
                out
            }
            TermKind::Constant(_)
            | TermKind::Variable(_)
            | TermKind::Meta(_)
            | TermKind::PseudoMeta(_)
            | TermKind::AnyMeta(_) => SmallVec::new(),
        }
    }

    /// Replace every occurrence of `variable` by `replacement`.
    pub fn substitute(&self, variable: &Term, replacement: &Term) -> Term {
        if self == variable {
            return replacement.clone();
        }
        let kind = match &self.kind {
            TermKind::Function {
                symbol,
                args,
                brackets,
            } => TermKind::Function {
                symbol: symbol.clone(),
                args: args
                    .iter()
                    .map(|a| a.substitute(variable, replacement))
                    .collect(),
                brackets: *brackets,
            },
            TermKind::ComplexMeta {
                symbol,
                params,
                brackets,
            } => TermKind::ComplexMeta {
                symbol: symbol.clone(),
                params: params
                    .iter()
                    .map(|p| p.substitute(variable, replacement))
                    .collect(),
                brackets: *brackets,
            },
            TermKind::Infix {
                symbol,
                left,
                right,
                brackets,
            } => TermKind::Infix {
                symbol: symbol.clone(),
                left: Box::new(left.substitute(variable, replacement)),
                right: Box::new(right.substitute(variable, replacement)),
                brackets: *brackets,
            },
            other => other.clone(),
        };
        Term {
            kind,
            transform: self
                .transform
                .as_ref()
                .map(|t| Box::new(t.substitute_inside(variable, replacement))),
        }
    }
}

impl Expression for Term {
    fn type_(&self) -> ExprType {
        match self.kind {
            TermKind::Constant(_) => ExprType::Constant,
            TermKind::Variable(_) => ExprType::Variable,
            TermKind::Function { .. } => ExprType::Function,
            TermKind::Infix { .. } => ExprType::InfixFunction,
            TermKind::Meta(_) => ExprType::MTerm,
            TermKind::PseudoMeta(_) => ExprType::PMTerm,
            TermKind::ComplexMeta { .. } => ExprType::MComplexTerm,
            TermKind::AnyMeta(_) => ExprType::AnyExpression,
        }
    }

    fn children(&self) -> SmallVec<ExprRef<'_>, 4> {
        self.child_terms().into_iter().map(ExprRef::Term).collect()
    }
}
