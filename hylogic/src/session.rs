//! Metavariable binding store and schematic matching.
//!
//! Role
//! - A [`MatchSession`] owns every metavariable binding of one matching pass.
//!   Sessions are plain values: independent passes use independent sessions
//!   (or call [`MatchSession::clear`] in between), and nothing is shared.
//! - Each metavariable is keyed by its [`MetaFamily`], its symbol and, for
//!   complex metavariables (`α(t)`, `τ(t)`), the resolved parameters. A key
//!   is bound at most once per pass; rebinding to an equal expression is a
//!   no-op, rebinding to a different one is a [`MatchError::VariableConflict`].
//! - [`MatchSession::match_formula`] walks a schema against a concrete
//!   formula and binds the metavariables it meets;
//!   [`MatchSession::instantiate_formula`] builds the concrete tree a schema
//!   denotes under the current bindings, and
//!   [`MatchSession::resolve_formula`] also carries out its substitution
//!   transforms.
//! - A pattern with a transform matches a concrete expression with one part
//!   by part; against one without, it is resolved and compared whole.
//!
//! Example
//! ```
//! use hylogic::prelude::*;
//!
//! let lang = Language::predicate();
//! let parser = FormulaParser::new(&lang);
//! let schema = parser.parse_formula("(α → (β → α))").unwrap();
//! let concrete = parser.parse_formula("(Fa → (P → Fa))").unwrap();
//!
//! let mut session = MatchSession::new();
//! session.match_formula(&schema, &concrete).unwrap();
//! assert_eq!(session.instantiate_formula(&schema), concrete);
//!
//! let other = parser.parse_formula("(Fa → (P → Fb))").unwrap();
//! session.clear();
//! assert!(session.match_formula(&schema, &other).unwrap_err().is_variable_conflict());
//! ```
use std::collections::HashMap;

use strum::{Display, EnumIter};

use crate::error::MatchError;
use crate::expr::formula::{Formula, FormulaKind};
use crate::expr::operator::{QuantifierOp, Restriction};
use crate::expr::pretty::{PrettyExpr, Rendering};
use crate::expr::term::{Term, TermKind};
use crate::expr::transform::SubstitutionTransform;
use crate::expr::{Expr, ExprRef, Expression};
use crate::symbol::{Layout, Symbol};

/// What a metavariable ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MetaFamily {
    #[strum(to_string = "formula")]
    Formula,
    #[strum(to_string = "term")]
    Term,
    /// Object-language variables only.
    #[strum(to_string = "variable")]
    PseudoTerm,
    #[strum(to_string = "formula or term")]
    AnyExpression,
    #[strum(to_string = "complex formula")]
    ComplexFormula,
    #[strum(to_string = "complex term")]
    ComplexTerm,
}

impl MetaFamily {
    fn accepts(self, value: &Expr) -> bool {
        match self {
            MetaFamily::Formula | MetaFamily::ComplexFormula => value.is_formula(),
            MetaFamily::Term | MetaFamily::ComplexTerm => value.is_term(),
            MetaFamily::PseudoTerm => matches!(value, Expr::Term(t) if t.is_variable()),
            MetaFamily::AnyExpression => true,
        }
    }
}

/// Handle on a metavariable of a session.
///
/// For complex metavariables `params` are the parameter terms as written in
/// the schema; they are resolved against the session when the handle is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaVariable {
    family: MetaFamily,
    symbol: Symbol,
    params: Vec<Term>,
}

impl MetaVariable {
    #[inline]
    pub fn family(&self) -> MetaFamily {
        self.family
    }

    #[inline]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[inline]
    pub fn params(&self) -> &[Term] {
        &self.params
    }

    /// The metavariable as an expression, as it would be written in a schema.
    pub fn to_expr(&self) -> Expr {
        let s = self.symbol.clone();
        let params = self.params.clone();
        match self.family {
            MetaFamily::Formula => Formula::meta(s).into(),
            MetaFamily::Term => Term::meta(s).into(),
            MetaFamily::PseudoTerm => Term::pseudo_meta(s).into(),
            MetaFamily::AnyExpression => Formula::any_meta(s).into(),
            MetaFamily::ComplexFormula => Formula::complex_meta(s, params, Default::default()).into(),
            MetaFamily::ComplexTerm => Term::complex_meta(s, params, Default::default()).into(),
        }
    }
}

const NO_PARAMS: &[Term] = &[];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MetaKey {
    family: MetaFamily,
    symbol: Symbol,
    params: Vec<Term>,
}

/// Bindings of one matching pass.
#[derive(Debug, Default, Clone)]
pub struct MatchSession {
    bindings: HashMap<MetaKey, Option<Expr>>,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (if needed) and return the metavariable `symbol` of `family`.
    pub fn instance(&mut self, family: MetaFamily, symbol: &Symbol) -> MetaVariable {
        let var = MetaVariable {
            family,
            symbol: symbol.clone(),
            params: Vec::new(),
        };
        self.bindings.entry(Self::plain_key(&var)).or_insert(None);
        var
    }

    /// Handle on a complex metavariable. It is registered once its
    /// parameters resolve.
    pub fn complex_instance(
        &mut self,
        family: MetaFamily,
        symbol: &Symbol,
        params: Vec<Term>,
    ) -> MetaVariable {
        let var = MetaVariable {
            family,
            symbol: symbol.clone(),
            params,
        };
        if let Ok(key) = self.resolve_key(&var) {
            self.bindings.entry(key).or_insert(None);
        }
        var
    }

    fn plain_key(var: &MetaVariable) -> MetaKey {
        MetaKey {
            family: var.family,
            symbol: var.symbol.clone(),
            params: Vec::new(),
        }
    }

    fn resolve_key(&self, var: &MetaVariable) -> Result<MetaKey, MatchError> {
        let mut params = Vec::with_capacity(var.params.len());
        for p in &var.params {
            if let Some(dependency) = self.unbound(ExprRef::Term(p)) {
                return Err(MatchError::UnresolvedDependency {
                    pattern: Rendering::of(&var.to_expr()),
                    dependency,
                });
            }
            params.push(self.instantiate_term(p));
        }
        Ok(MetaKey {
            family: var.family,
            symbol: var.symbol.clone(),
            params,
        })
    }

    /// Bind `var` to `value`.
    ///
    /// Binding an already bound variable to an equal value succeeds and
    /// changes nothing.
    pub fn set_match(&mut self, var: &MetaVariable, value: Expr) -> Result<(), MatchError> {
        if !var.family.accepts(&value) {
            return Err(MatchError::KindMismatch {
                variable: var.symbol.clone(),
                family: var.family,
                found: Rendering::of(&value),
            });
        }
        let key = self.resolve_key(var)?;
        let slot = self.bindings.entry(key).or_insert(None);
        if let Some(existing) = slot.as_ref() {
            if *existing == value {
                return Ok(());
            }
            return Err(MatchError::VariableConflict {
                variable: Rendering::of(&var.to_expr()),
                existing: Rendering::of(existing),
                attempted: Rendering::of(&value),
            });
        }
        log::trace!("bound {} metavariable `{}` to `{}`", var.family, var.symbol, value);
        *slot = Some(value);
        Ok(())
    }

    /// Current binding of `var`, `None` while unbound or unresolved.
    pub fn get_match(&self, var: &MetaVariable) -> Option<&Expr> {
        let key = self.resolve_key(var).ok()?;
        self.bindings.get(&key)?.as_ref()
    }

    pub fn is_bound(&self, var: &MetaVariable) -> bool {
        self.get_match(var).is_some()
    }

    /// Number of registered metavariables, bound or not.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of bound metavariables.
    pub fn bound_count(&self) -> usize {
        self.bindings.values().filter(|v| v.is_some()).count()
    }

    /// Forget every registration and binding.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing match session ({} registered, {} bound)",
            self.len(),
            self.bound_count()
        );
        self.bindings.clear();
    }

    // ---------------- matching ----------------

    pub fn match_expression(&mut self, pattern: &Expr, concrete: &Expr) -> Result<(), MatchError> {
        let any = match pattern {
            Expr::Formula(p) => match (p.kind(), concrete) {
                (_, Expr::Formula(c)) => return self.match_formula(p, c),
                (FormulaKind::AnyMeta(s), Expr::Term(_)) => s,
                _ => return Err(shape_mismatch(pattern, concrete)),
            },
            Expr::Term(p) => match (p.kind(), concrete) {
                (_, Expr::Term(c)) => return self.match_term(p, c),
                (TermKind::AnyMeta(s), Expr::Formula(_)) => s,
                _ => return Err(shape_mismatch(pattern, concrete)),
            },
        };
        let var = self.instance(MetaFamily::AnyExpression, any);
        self.set_match(&var, concrete.clone())
    }

    /// A pattern carrying a transform, against a concrete expression without
    /// one, is resolved and compared as a whole.
    fn match_resolved<T>(
        &self,
        pattern: &T,
        as_ref: ExprRef<'_>,
        resolved: T,
        concrete: T,
    ) -> Result<(), MatchError>
    where
        T: PrettyExpr + PartialEq,
    {
        if let Some(dependency) = self.unbound(as_ref) {
            return Err(MatchError::UnresolvedDependency {
                pattern: Rendering::of(pattern),
                dependency,
            });
        }
        if resolved == concrete {
            Ok(())
        } else {
            Err(shape_mismatch(pattern, &concrete))
        }
    }

    /// Walk `pattern` against `concrete`, binding the metavariables of `pattern`.
    ///
    /// Bindings made before a failure are kept; clear the session to retry
    /// from scratch.
    pub fn match_formula(&mut self, pattern: &Formula, concrete: &Formula) -> Result<(), MatchError> {
        if let Some(pt) = pattern.transform() {
            if let Some(ct) = concrete.transform() {
                self.match_formula(
                    &pattern.clone().without_transform(),
                    &concrete.clone().without_transform(),
                )?;
                return self.match_transform(pt, ct);
            }
            let resolved = self.resolve_formula(pattern);
            let concrete = carried_out(concrete);
            return self.match_resolved(pattern, ExprRef::Formula(pattern), resolved, concrete);
        }
        match pattern.kind() {
            FormulaKind::Meta(s) => {
                let var = self.instance(MetaFamily::Formula, s);
                return self.set_match(&var, concrete.clone().into());
            }
            FormulaKind::AnyMeta(s) => {
                let var = self.instance(MetaFamily::AnyExpression, s);
                return self.set_match(&var, concrete.clone().into());
            }
            FormulaKind::ComplexMeta { symbol, params, .. } => {
                // `α(τ)` against `α(t)` tells what `τ` stands for
                if let FormulaKind::ComplexMeta {
                    symbol: other,
                    params: args,
                    ..
                } = concrete.kind()
                {
                    if other == symbol && args.len() == params.len() && concrete.transform().is_none() {
                        for (p, c) in params.iter().zip(args) {
                            self.match_term(p, c)?;
                        }
                    }
                }
                let var = self.complex_instance(MetaFamily::ComplexFormula, symbol, params.clone());
                return self.set_match(&var, concrete.clone().into());
            }
            _ => {}
        }
        if concrete.transform().is_some() {
            return Err(shape_mismatch(pattern, concrete));
        }

        let mismatch = || shape_mismatch(pattern, concrete);
        match (pattern.kind(), concrete.kind()) {
            (FormulaKind::Letter(a), FormulaKind::Letter(b)) if a == b => Ok(()),
            (
                FormulaKind::Relation { relation: r1, args: a1 },
                FormulaKind::Relation { relation: r2, args: a2 },
            ) if r1 == r2 && a1.len() == a2.len() => {
                for (p, c) in a1.iter().zip(a2) {
                    self.match_term(p, c)?;
                }
                Ok(())
            }
            (
                FormulaKind::Infix { relation: r1, left: l1, right: rt1, .. },
                FormulaKind::Infix { relation: r2, left: l2, right: rt2, .. },
            ) if r1 == r2 => {
                self.match_term(l1, l2)?;
                self.match_term(rt1, rt2)
            }
            (
                FormulaKind::Negation { symbol: s1, inner: i1 },
                FormulaKind::Negation { symbol: s2, inner: i2 },
            ) if s1 == s2 => self.match_formula(i1, i2),
            (
                FormulaKind::Binary { symbol: s1, connective: c1, left: l1, right: r1, .. },
                FormulaKind::Binary { symbol: s2, connective: c2, left: l2, right: r2, .. },
            ) if s1 == s2 && c1 == c2 => {
                self.match_formula(l1, l2)?;
                self.match_formula(r1, r2)
            }
            (
                FormulaKind::Quantified { op: o1, inner: i1 },
                FormulaKind::Quantified { op: o2, inner: i2 },
            ) => {
                self.match_quantifier(o1, o2).map_err(|e| match e {
                    MatchError::ShapeMismatch { .. } => mismatch(),
                    other => other,
                })?;
                self.match_formula(i1, i2)
            }
            _ => Err(mismatch()),
        }
    }

    fn match_quantifier(&mut self, p: &QuantifierOp, c: &QuantifierOp) -> Result<(), MatchError> {
        let mismatch = || MatchError::ShapeMismatch {
            pattern: Rendering::of(&p.variable),
            concrete: Rendering::of(&c.variable),
        };
        if p.symbol != c.symbol || p.quantifier != c.quantifier {
            return Err(mismatch());
        }
        self.match_term(&p.variable, &c.variable)?;
        match (&p.restriction, &c.restriction) {
            (Restriction::None, Restriction::None) => Ok(()),
            (
                Restriction::Bounded { relation: r1, bound: b1, .. },
                Restriction::Bounded { relation: r2, bound: b2, .. },
            ) if r1 == r2 => self.match_term(b1, b2),
            (
                Restriction::Restricted { divider: d1, formula: f1, .. },
                Restriction::Restricted { divider: d2, formula: f2, .. },
            ) if d1 == d2 => self.match_formula(f1, f2),
            _ => Err(mismatch()),
        }
    }

    fn match_transform(
        &mut self,
        pattern: &SubstitutionTransform,
        concrete: &SubstitutionTransform,
    ) -> Result<(), MatchError> {
        self.match_term(&pattern.variable, &concrete.variable)?;
        self.match_term(&pattern.term, &concrete.term)
    }

    pub fn match_term(&mut self, pattern: &Term, concrete: &Term) -> Result<(), MatchError> {
        if let Some(pt) = pattern.transform() {
            if let Some(ct) = concrete.transform() {
                self.match_term(
                    &pattern.clone().without_transform(),
                    &concrete.clone().without_transform(),
                )?;
                return self.match_transform(pt, ct);
            }
            let resolved = self.resolve_term(pattern);
            let concrete = carried_out_term(concrete);
            return self.match_resolved(pattern, ExprRef::Term(pattern), resolved, concrete);
        }
        let meta = match pattern.kind() {
            TermKind::Meta(s) => Some((MetaFamily::Term, s)),
            TermKind::PseudoMeta(s) => Some((MetaFamily::PseudoTerm, s)),
            TermKind::AnyMeta(s) => Some((MetaFamily::AnyExpression, s)),
            _ => None,
        };
        if let Some((family, s)) = meta {
            let var = self.instance(family, s);
            return self.set_match(&var, concrete.clone().into());
        }
        if let TermKind::ComplexMeta { symbol, params, .. } = pattern.kind() {
            if let TermKind::ComplexMeta {
                symbol: other,
                params: args,
                ..
            } = concrete.kind()
            {
                if other == symbol && args.len() == params.len() && concrete.transform().is_none() {
                    for (p, c) in params.iter().zip(args) {
                        self.match_term(p, c)?;
                    }
                }
            }
            let var = self.complex_instance(MetaFamily::ComplexTerm, symbol, params.clone());
            return self.set_match(&var, concrete.clone().into());
        }

        let mismatch = || shape_mismatch(pattern, concrete);
        if concrete.transform().is_some() {
            return Err(mismatch());
        }
        match (pattern.kind(), concrete.kind()) {
            (TermKind::Constant(a), TermKind::Constant(b))
            | (TermKind::Variable(a), TermKind::Variable(b))
                if a == b =>
            {
                Ok(())
            }
            (
                TermKind::Function { symbol: s1, args: a1, .. },
                TermKind::Function { symbol: s2, args: a2, .. },
            ) if s1 == s2 && a1.len() == a2.len() => {
                for (p, c) in a1.iter().zip(a2) {
                    self.match_term(p, c)?;
                }
                Ok(())
            }
            (
                TermKind::Infix { symbol: s1, left: l1, right: r1, .. },
                TermKind::Infix { symbol: s2, left: l2, right: r2, .. },
            ) if s1 == s2 => {
                self.match_term(l1, l2)?;
                self.match_term(r1, r2)
            }
            _ => Err(mismatch()),
        }
    }

    // ---------------- instantiation ----------------

    fn lookup(&self, family: MetaFamily, symbol: &Symbol, params: &[Term]) -> Option<&Expr> {
        let key = MetaKey {
            family,
            symbol: symbol.clone(),
            params: params.to_vec(),
        };
        self.bindings.get(&key)?.as_ref()
    }

    /// Symbol of the first metavariable of `e` without a binding, transforms
    /// and complex parameters included.
    fn unbound(&self, e: ExprRef<'_>) -> Option<Symbol> {
        let (slot, transform) = match e {
            ExprRef::Formula(f) => (
                match f.kind() {
                    FormulaKind::Meta(s) => Some((MetaFamily::Formula, s, NO_PARAMS)),
                    FormulaKind::AnyMeta(s) => Some((MetaFamily::AnyExpression, s, NO_PARAMS)),
                    FormulaKind::ComplexMeta { symbol, params, .. } => {
                        Some((MetaFamily::ComplexFormula, symbol, params.as_slice()))
                    }
                    _ => None,
                },
                f.transform(),
            ),
            ExprRef::Term(t) => (
                match t.kind() {
                    TermKind::Meta(s) => Some((MetaFamily::Term, s, NO_PARAMS)),
                    TermKind::PseudoMeta(s) => Some((MetaFamily::PseudoTerm, s, NO_PARAMS)),
                    TermKind::AnyMeta(s) => Some((MetaFamily::AnyExpression, s, NO_PARAMS)),
                    TermKind::ComplexMeta { symbol, params, .. } => {
                        Some((MetaFamily::ComplexTerm, symbol, params.as_slice()))
                    }
                    _ => None,
                },
                t.transform(),
            ),
        };
        let own = match slot {
            Some((family, symbol, params)) => {
                params.iter().find_map(|p| self.unbound(ExprRef::Term(p))).or_else(|| {
                    let params: Vec<Term> = params.iter().map(|p| self.instantiate_term(p)).collect();
                    self.lookup(family, symbol, &params)
                        .is_none()
                        .then(|| symbol.clone())
                })
            }
            None => e.children().into_iter().find_map(|c| self.unbound(c)),
        };
        own.or_else(|| {
            let t = transform?;
            self.unbound(ExprRef::Term(&t.variable))
                .or_else(|| self.unbound(ExprRef::Term(&t.term)))
        })
    }

    fn rebuild_transform(&self, t: &SubstitutionTransform, resolve: bool) -> SubstitutionTransform {
        SubstitutionTransform {
            variable: self.rebuild_term(&t.variable, resolve),
            term: self.rebuild_term(&t.term, resolve),
            combines: t.combines,
        }
    }

    /// The concrete formula `pattern` denotes under the current bindings.
    ///
    /// Every symbol is copied, bound metavariables are replaced by their
    /// values and unbound ones are left in place. Transforms stay on their
    /// nodes, so an expression without metavariables instantiates to an
    /// equal tree.
    pub fn instantiate_formula(&self, pattern: &Formula) -> Formula {
        self.rebuild_formula(pattern, false)
    }

    /// The concrete term `pattern` denotes under the current bindings.
    pub fn instantiate_term(&self, pattern: &Term) -> Term {
        self.rebuild_term(pattern, false)
    }

    /// [`MatchSession::instantiate_formula`], then every transform whose
    /// carrier and parts are free of metavariables is carried out.
    ///
    /// ```
    /// use hylogic::prelude::*;
    ///
    /// let lang = Language::predicate();
    /// let parser = FormulaParser::new(&lang);
    /// let f = parser.parse_formula("Fx[a/x]").unwrap();
    /// let session = MatchSession::new();
    /// assert_eq!(session.instantiate_formula(&f), f);
    /// assert_eq!(session.resolve_formula(&f).to_string(), "Fa");
    /// ```
    pub fn resolve_formula(&self, pattern: &Formula) -> Formula {
        self.rebuild_formula(pattern, true)
    }

    pub fn resolve_term(&self, pattern: &Term) -> Term {
        self.rebuild_term(pattern, true)
    }

    fn rebuild_formula(&self, pattern: &Formula, resolve: bool) -> Formula {
        let terms = |ts: &[Term]| {
            ts.iter()
                .map(|t| self.rebuild_term(t, resolve))
                .collect::<Vec<_>>()
        };
        let boxed = |f: &Formula| Box::new(self.rebuild_formula(f, resolve));
        let bound = |f: &Formula| if resolve { carried_out(f) } else { f.clone() };

        let body = match pattern.kind() {
            FormulaKind::Letter(s) => Formula::letter(s.fresh()),
            FormulaKind::Meta(s) => match self.lookup(MetaFamily::Formula, s, &[]) {
                Some(Expr::Formula(f)) => bound(f),
                _ => Formula::meta(s.fresh()),
            },
            FormulaKind::AnyMeta(s) => match self.lookup(MetaFamily::AnyExpression, s, &[]) {
                Some(Expr::Formula(f)) => bound(f),
                _ => Formula::any_meta(s.fresh()),
            },
            FormulaKind::ComplexMeta {
                symbol,
                params,
                brackets,
            } => {
                // keys hold instantiated parameters
                let key: Vec<Term> = params.iter().map(|p| self.instantiate_term(p)).collect();
                match self.lookup(MetaFamily::ComplexFormula, symbol, &key) {
                    Some(Expr::Formula(f)) => bound(f),
                    _ => Formula::complex_meta(symbol.fresh(), terms(params), brackets.0),
                }
            }
            FormulaKind::Relation { relation, args } => {
                Formula::relation(relation.fresh(), terms(args))
            }
            FormulaKind::Infix {
                relation,
                left,
                right,
                negated,
            } => Formula::new(FormulaKind::Infix {
                relation: relation.fresh(),
                left: self.rebuild_term(left, resolve),
                right: self.rebuild_term(right, resolve),
                negated: Layout(negated.0.as_ref().map(Symbol::fresh)),
            }),
            FormulaKind::Negation { symbol, inner } => Formula::new(FormulaKind::Negation {
                symbol: symbol.fresh(),
                inner: boxed(inner),
            }),
            FormulaKind::Binary {
                symbol,
                connective,
                left,
                right,
                brackets,
            } => Formula::new(FormulaKind::Binary {
                symbol: symbol.fresh(),
                connective: *connective,
                left: boxed(left),
                right: boxed(right),
                brackets: *brackets,
            }),
            FormulaKind::Quantified { op, inner } => {
                let restriction = match &op.restriction {
                    Restriction::None => Restriction::None,
                    Restriction::Bounded {
                        relation,
                        bound,
                        brackets,
                    } => Restriction::Bounded {
                        relation: relation.fresh(),
                        bound: self.rebuild_term(bound, resolve),
                        brackets: *brackets,
                    },
                    Restriction::Restricted {
                        divider,
                        formula,
                        brackets,
                    } => Restriction::Restricted {
                        divider: divider.fresh(),
                        formula: boxed(formula),
                        brackets: *brackets,
                    },
                };
                let op = QuantifierOp {
                    symbol: op.symbol.fresh(),
                    quantifier: op.quantifier,
                    variable: self.rebuild_term(&op.variable, resolve),
                    restriction,
                };
                Formula::quantified(op, self.rebuild_formula(inner, resolve))
            }
        };

        match pattern.transform() {
            None => body,
            Some(t) => {
                let t = self.rebuild_transform(t, resolve);
                if resolve && !body.has_metavariables() && !t.has_metavariables() {
                    body.substitute(&t.variable, &t.term)
                } else {
                    body.with_transform(t)
                }
            }
        }
    }

    fn rebuild_term(&self, pattern: &Term, resolve: bool) -> Term {
        let terms = |ts: &[Term]| {
            ts.iter()
                .map(|t| self.rebuild_term(t, resolve))
                .collect::<Vec<_>>()
        };
        let bound_term = |family, s: &Symbol, params: &[Term]| match self.lookup(family, s, params) {
            Some(Expr::Term(t)) if resolve => Some(carried_out_term(t)),
            Some(Expr::Term(t)) => Some(t.clone()),
            _ => None,
        };

        let body = match pattern.kind() {
            TermKind::Constant(s) => Term::constant(s.fresh()),
            TermKind::Variable(s) => Term::variable(s.fresh()),
            TermKind::Meta(s) => {
                bound_term(MetaFamily::Term, s, &[]).unwrap_or_else(|| Term::meta(s.fresh()))
            }
            TermKind::PseudoMeta(s) => bound_term(MetaFamily::PseudoTerm, s, &[])
                .unwrap_or_else(|| Term::pseudo_meta(s.fresh())),
            TermKind::AnyMeta(s) => bound_term(MetaFamily::AnyExpression, s, &[])
                .unwrap_or_else(|| Term::any_meta(s.fresh())),
            TermKind::ComplexMeta {
                symbol,
                params,
                brackets,
            } => {
                let key: Vec<Term> = params.iter().map(|p| self.instantiate_term(p)).collect();
                bound_term(MetaFamily::ComplexTerm, symbol, &key)
                    .unwrap_or_else(|| Term::complex_meta(symbol.fresh(), terms(params), brackets.0))
            }
            TermKind::Function {
                symbol,
                args,
                brackets,
            } => Term::function(symbol.fresh(), terms(args), brackets.0),
            TermKind::Infix {
                symbol,
                left,
                right,
                brackets,
            } => Term::infix(
                symbol.fresh(),
                self.rebuild_term(left, resolve),
                self.rebuild_term(right, resolve),
                brackets.0,
            ),
        };

        match pattern.transform() {
            None => body,
            Some(t) => {
                let t = self.rebuild_transform(t, resolve);
                if resolve && !body.has_metavariables() && !t.has_metavariables() {
                    body.substitute(&t.variable, &t.term)
                } else {
                    body.with_transform(t)
                }
            }
        }
    }

    /// Like [`MatchSession::instantiate_formula`], but a bare any-expression
    /// metavariable becomes whatever it is bound to, formula or term.
    pub fn instantiate(&self, pattern: &Expr) -> Expr {
        let any = match pattern {
            Expr::Formula(f) if f.transform().is_none() => match f.kind() {
                FormulaKind::AnyMeta(s) => Some(s),
                _ => None,
            },
            Expr::Term(t) if t.transform().is_none() => match t.kind() {
                TermKind::AnyMeta(s) => Some(s),
                _ => None,
            },
            _ => None,
        };
        if let Some(bound) = any.and_then(|s| self.lookup(MetaFamily::AnyExpression, s, &[])) {
            return bound.clone();
        }
        match pattern {
            Expr::Formula(f) => Expr::Formula(self.instantiate_formula(f)),
            Expr::Term(t) => Expr::Term(self.instantiate_term(t)),
        }
    }
}

/// `f` with its transforms carried out, metavariables left as they are.
fn carried_out(f: &Formula) -> Formula {
    MatchSession::new().resolve_formula(f)
}

fn carried_out_term(t: &Term) -> Term {
    MatchSession::new().resolve_term(t)
}

fn shape_mismatch<P, C>(pattern: &P, concrete: &C) -> MatchError
where
    P: PrettyExpr + ?Sized,
    C: PrettyExpr + ?Sized,
{
    MatchError::ShapeMismatch {
        pattern: Rendering::of(pattern),
        concrete: Rendering::of(concrete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolClass;

    fn alpha() -> Symbol {
        Symbol::new("α", SymbolClass::FormulaMeta)
    }

    #[test]
    fn instance_registers_once() {
        let mut session = MatchSession::new();
        let a = session.instance(MetaFamily::Formula, &alpha());
        let b = session.instance(MetaFamily::Formula, &alpha());
        assert_eq!(a, b);
        assert_eq!(session.len(), 1);
        assert!(!session.is_bound(&a));
    }

    #[test]
    fn pseudo_term_only_takes_variables() {
        let mut session = MatchSession::new();
        let nu = Symbol::new("ν", SymbolClass::VariableMeta);
        let var = session.instance(MetaFamily::PseudoTerm, &nu);
        let a = Term::constant(Symbol::new("a", SymbolClass::Constant));
        assert!(session.set_match(&var, a.into()).unwrap_err().is_kind_mismatch());
        let x = Term::variable(Symbol::new("x", SymbolClass::Variable));
        session.set_match(&var, x.into()).unwrap();
    }

    #[test]
    fn complex_meta_waits_for_parameters() {
        let mut session = MatchSession::new();
        let tau = Symbol::new("τ", SymbolClass::TermMeta);
        let var = session.complex_instance(
            MetaFamily::ComplexFormula,
            &alpha(),
            vec![Term::meta(tau.clone())],
        );
        let p = Formula::letter(Symbol::new("P", SymbolClass::SentenceLetter));
        let err = session.set_match(&var, p.clone().into()).unwrap_err();
        assert!(matches!(err, MatchError::UnresolvedDependency { ref dependency, .. } if *dependency == tau));

        let tau_var = session.instance(MetaFamily::Term, &tau);
        let a = Term::constant(Symbol::new("a", SymbolClass::Constant));
        session.set_match(&tau_var, a.into()).unwrap();
        session.set_match(&var, p.clone().into()).unwrap();
        assert_eq!(session.get_match(&var), Some(&Expr::Formula(p)));
    }
}
