//! Substitution transforms: `A[t/x]` and `A^x_t`.
//!
//! A transform records that `term` is to be put in place of the free
//! occurrences of `variable` in the carrier expression. Schemata use it to
//! describe instances (`α[τ/ν]`); once every metavariable is bound,
//! [`MatchSession::resolve_formula`](crate::session::MatchSession::resolve_formula)
//! performs the substitution.
use crate::expr::term::Term;
use crate::symbol::Layout;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubstitutionTransform {
    /// Variable being replaced, shown as the superscript.
    pub variable: Term,
    /// Replacement, shown as the subscript.
    pub term: Term,
    /// `true` for the stacked `^x_t` notation, `false` for inline `[t/x]`.
    pub combines: Layout<bool>,
}

impl SubstitutionTransform {
    /// Inline notation, `[term/variable]`.
    pub fn inline(variable: Term, term: Term) -> Self {
        Self {
            variable,
            term,
            combines: Layout(false),
        }
    }

    /// Stacked notation, `^variable_term`.
    pub fn stacked(variable: Term, term: Term) -> Self {
        Self {
            variable,
            term,
            combines: Layout(true),
        }
    }

    pub fn has_metavariables(&self) -> bool {
        self.variable.has_metavariables() || self.term.has_metavariables()
    }

    pub(crate) fn substitute_inside(&self, variable: &Term, replacement: &Term) -> Self {
        Self {
            variable: self.variable.clone(),
            term: self.term.substitute(variable, replacement),
            combines: self.combines,
        }
    }
}
