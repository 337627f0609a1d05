//! Parser for formula and term text using chumsky.
//!
//! Role
//! - Turn plain formula text (as extracted from a rich-text span) into
//!   [`Formula`]/[`Term`] trees of a given [`Language`].
//! - Mirrors the notation produced by the renderer in `expr::pretty`, so
//!   printing a parsed expression and parsing it again yields an equal tree.
//!
//! Two stages:
//! 1) Tokenisation: every non-blank character (plus an optional index made
//!    of digits, subscript digits or primes) is classified against the
//!    language. Unknown glyphs are rejected here, so no unrecognized operator
//!    ever reaches the truth evaluator.
//! 2) Parsing tokens into expression trees with chumsky combinators.
//!
//! Accepted syntax (glyphs of the predicate language):
//! - Sentence letters `P`, relations `Fab`, infix relations `a = b`, negated
//!   infix relations `a ≠ b` (the negation of `a = b`).
//! - Terms: constants, variables, `f(a, b)`, bracketed infix terms `(a + b)`,
//!   metavariables `τ`, `ν` and complex term metavariables `τ(a)`.
//! - Negation `~A`; binary formulas `(A → B)` inside any configured bracket
//!   pair; the outermost binary formula may drop its brackets.
//! - Quantifiers `∀xA`, bounded `(∀x < t)A` and restricted `(∀x: Fx)A`.
//! - Formula metavariables `α`, complex formula metavariables `α(t)` and
//!   any-expression metavariables `Γ`.
//! - Substitution transforms `A[t/x]` and `A^x_t`.
use std::fmt;

use chumsky::{input::ValueInput, prelude::*};

use crate::error::ParseError;
use crate::expr::operator::{BinaryConnective, Quantifier, QuantifierOp};
use crate::expr::transform::SubstitutionTransform;
use crate::expr::{Expr, Expression, Formula, Term};
use crate::language::Language;
use crate::symbol::{Brackets, Symbol, SymbolClass};

pub type Spanned<T> = (T, SimpleSpan);
type Span = SimpleSpan;
type Extra<'t> = extra::Err<Rich<'t, Token, Span>>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Token {
    // Delimiters & punctuation
    Open(Brackets),
    Close(Brackets),
    Comma,
    Slash,
    Caret,
    Underscore,

    // Operators
    Negation(Symbol),
    Connective(Symbol, BinaryConnective),
    Quantifier(Symbol, Quantifier),
    Divider(Symbol),
    InfixRelation(Symbol),
    /// Complement glyph, e.g. `≠`, with the relation it negates.
    NegatedInfix {
        relation: Symbol,
        complement: Symbol,
    },
    InfixFunction(Symbol),

    // Symbols
    Upper(Symbol),
    Constant(Symbol),
    Variable(Symbol),
    Function(Symbol),
    FormulaMeta(Symbol),
    TermMeta(Symbol),
    VariableMeta(Symbol),
    AnyMeta(Symbol),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open(b) => write!(f, "{}", b.open),
            Token::Close(b) => write!(f, "{}", b.close),
            Token::Comma => write!(f, ","),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::Underscore => write!(f, "_"),
            Token::NegatedInfix { complement, .. } => write!(f, "{complement}"),
            Token::Negation(s)
            | Token::Connective(s, _)
            | Token::Quantifier(s, _)
            | Token::Divider(s)
            | Token::InfixRelation(s)
            | Token::InfixFunction(s)
            | Token::Upper(s)
            | Token::Constant(s)
            | Token::Variable(s)
            | Token::Function(s)
            | Token::FormulaMeta(s)
            | Token::TermMeta(s)
            | Token::VariableMeta(s)
            | Token::AnyMeta(s) => write!(f, "{s}"),
        }
    }
}

// ---------------- Lexer ----------------

/// Characters that may follow a symbol as part of its index.
fn is_index(c: char) -> bool {
    c.is_ascii_digit() || ('₀'..='₉').contains(&c) || c == '′' || c == '\''
}

/// Classify one symbol (a glyph plus its index) against `lang`.
fn classify(lang: &Language, s: &str) -> Result<Token, String> {
    let mut chars = s.chars();
    let Some(c) = chars.next() else {
        return Err("empty symbol".to_string());
    };
    let indexed = !chars.as_str().is_empty();
    let sym = |class| Symbol::new(s, class);

    // Glyphs that never take an index
    let fixed = if let Some(b) = lang.opening(c) {
        Some(Token::Open(b))
    } else if let Some(b) = lang.closing(c) {
        Some(Token::Close(b))
    } else if lang.is_negation(c) {
        Some(Token::Negation(sym(SymbolClass::Connective)))
    } else if let Some(op) = lang.connective(c) {
        Some(Token::Connective(sym(SymbolClass::Connective), op))
    } else if let Some(q) = lang.quantifier(c) {
        Some(Token::Quantifier(sym(SymbolClass::Quantifier), q))
    } else if lang.divider == Some(c) {
        Some(Token::Divider(sym(SymbolClass::Divider)))
    } else if lang.infix_relation(c).is_some() {
        Some(Token::InfixRelation(sym(SymbolClass::InfixRelation)))
    } else if let Some(r) = lang.complemented_relation(c) {
        Some(Token::NegatedInfix {
            relation: Symbol::new(r.symbol.to_string(), SymbolClass::InfixRelation),
            complement: sym(SymbolClass::InfixRelation),
        })
    } else if lang.infix_functions.contains(c) {
        Some(Token::InfixFunction(sym(SymbolClass::InfixFunction)))
    } else {
        match c {
            ',' => Some(Token::Comma),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '_' => Some(Token::Underscore),
            _ => None,
        }
    };
    if let Some(tok) = fixed {
        if indexed {
            return Err(format!("`{c}` cannot carry an index, found `{s}`"));
        }
        return Ok(tok);
    }

    let tok = if lang.letters.contains(c) {
        Token::Upper(sym(SymbolClass::SentenceLetter))
    } else if lang.constants.contains(c) {
        Token::Constant(sym(SymbolClass::Constant))
    } else if lang.variables.contains(c) {
        Token::Variable(sym(SymbolClass::Variable))
    } else if lang.functions.contains(c) {
        Token::Function(sym(SymbolClass::Function))
    } else if lang.formula_metas.contains(c) {
        Token::FormulaMeta(sym(SymbolClass::FormulaMeta))
    } else if lang.term_metas.contains(c) {
        Token::TermMeta(sym(SymbolClass::TermMeta))
    } else if lang.variable_metas.contains(c) {
        Token::VariableMeta(sym(SymbolClass::VariableMeta))
    } else if lang.any_metas.contains(c) {
        Token::AnyMeta(sym(SymbolClass::AnyMeta))
    } else {
        return Err(format!(
            "unrecognized symbol `{s}` in language `{}`",
            lang.name
        ));
    };
    Ok(tok)
}

fn lexer<'a>(
    lang: &'a Language,
) -> impl Parser<'a, &'a str, Vec<Spanned<Token>>, extra::Err<Rich<'a, char>>> {
    let index = any().filter(|c: &char| is_index(*c));

    let symbol = any()
        .filter(|c: &char| !c.is_whitespace())
        .then(index.repeated())
        .to_slice()
        .try_map(move |s: &str, span| classify(lang, s).map_err(|msg| Rich::custom(span, msg)));

    symbol
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
        .then_ignore(end())
}

// ---------------- chumsky parsers over tokens ----------------

/// `inner` wrapped in one matching bracket pair of the language.
fn bracketed<'t, I, O, P>(inner: P) -> impl Parser<'t, I, (O, Brackets), Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = Span>,
    P: Parser<'t, I, O, Extra<'t>> + Clone,
{
    select! { Token::Open(b) => b }
        .then(inner)
        .then(select! { Token::Close(b) => b })
        .try_map(|((open, inner), close), span| {
            if open == close {
                Ok((inner, open))
            } else {
                Err(Rich::custom(
                    span,
                    format!("`{}` is closed by `{}`", open.open, close.close),
                ))
            }
        })
}

/// `[t/x]` (any bracket pair) or `^x_t`.
fn transform<'t, I, P>(term: P) -> impl Parser<'t, I, SubstitutionTransform, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = Span>,
    P: Parser<'t, I, Term, Extra<'t>> + Clone,
{
    let inline = bracketed(
        term.clone()
            .then_ignore(just(Token::Slash))
            .then(term.clone()),
    )
    .map(|((replacement, variable), _)| SubstitutionTransform::inline(variable, replacement));

    let stacked = just(Token::Caret)
        .ignore_then(term.clone())
        .then_ignore(just(Token::Underscore))
        .then(term)
        .map(|(variable, replacement)| SubstitutionTransform::stacked(variable, replacement));

    inline.or(stacked).labelled("substitution transform")
}

/// Bare terms: no transform on the outermost node.
fn term_parser<'t, I>() -> impl Parser<'t, I, Term, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = Span>,
{
    recursive(|term| {
        let with_transform = term
            .clone()
            .then(transform(term.clone()).or_not())
            .map(|(t, tr): (Term, Option<SubstitutionTransform>)| match tr {
                Some(tr) => t.with_transform(tr),
                None => t,
            });

        let args = bracketed(
            with_transform
                .clone()
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        );

        let function = select! { Token::Function(s) => s }
            .then(args.clone())
            .map(|(s, (args, b))| Term::function(s, args, b))
            .labelled("function application");

        let complex_meta = select! { Token::TermMeta(s) => s }
            .then(args)
            .map(|(s, (params, b))| Term::complex_meta(s, params, b));

        let infix = bracketed(
            with_transform
                .clone()
                .then(select! { Token::InfixFunction(s) => s })
                .then(with_transform),
        )
        .map(|(((left, s), right), b)| Term::infix(s, left, right, b))
        .labelled("infix term");

        let leaf = select! {
            Token::Constant(s) => Term::constant(s),
            Token::Variable(s) => Term::variable(s),
            Token::TermMeta(s) => Term::meta(s),
            Token::VariableMeta(s) => Term::pseudo_meta(s),
            Token::AnyMeta(s) => Term::any_meta(s),
        };

        choice((function, complex_meta, infix, leaf)).labelled("term")
    })
}

/// Formulas, including an unbracketed binary formula at the top level.
fn formula_parser<'t, I>(negation: Symbol) -> impl Parser<'t, I, Formula, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = Span>,
{
    let term = term_parser();
    let connective = select! { Token::Connective(s, c) => (s, c) };

    let formula = recursive(|formula| {
        let relation_or_letter = select! { Token::Upper(s) => s }
            .then(term.clone().repeated().collect::<Vec<_>>())
            .map(|(s, args)| {
                if args.is_empty() {
                    Formula::letter(s)
                } else {
                    Formula::relation(s.with_class(SymbolClass::Relation), args)
                }
            })
            .labelled("atomic formula");

        let infix = term
            .clone()
            .then(select! { Token::InfixRelation(s) => s })
            .then(term.clone())
            .map(|((left, relation), right)| Formula::infix(relation, left, right));

        let negated_infix = term
            .clone()
            .then(select! { Token::NegatedInfix { relation, complement } => (relation, complement) })
            .then(term.clone())
            .map(move |((left, (relation, complement)), right)| {
                Formula::negated_infix(negation.clone(), relation, complement, left, right)
            });

        let meta = select! { Token::FormulaMeta(s) => s }
            .then(
                bracketed(
                    term.clone()
                        .separated_by(just(Token::Comma))
                        .at_least(1)
                        .collect::<Vec<_>>(),
                )
                .or_not(),
            )
            .map(|(s, params)| match params {
                Some((params, b)) => Formula::complex_meta(s, params, b),
                None => Formula::meta(s),
            });

        let any_meta = select! { Token::AnyMeta(s) => Formula::any_meta(s) };

        let negation_op = select! { Token::Negation(s) => s }
            .then(formula.clone())
            .map(|(s, inner)| Formula::negation(s, inner))
            .labelled("negation");

        let quantifier = select! { Token::Quantifier(s, q) => (s, q) };
        let bound_variable = select! {
            Token::Variable(s) => Term::variable(s),
            Token::VariableMeta(s) => Term::pseudo_meta(s),
        };

        let plain_prefix = quantifier
            .clone()
            .then(bound_variable.clone())
            .map(|((s, q), v)| QuantifierOp::plain(s, q, v));

        let bounded_prefix = bracketed(
            quantifier
                .clone()
                .then(bound_variable.clone())
                .then(select! { Token::InfixRelation(r) => r })
                .then(term.clone()),
        )
        .map(|(((((s, q), v), r), bound), b)| QuantifierOp::bounded(s, q, v, r, bound, b));

        let restricted_prefix = bracketed(
            quantifier
                .then(bound_variable)
                .then(select! { Token::Divider(d) => d })
                .then(formula.clone()),
        )
        .map(|(((((s, q), v), d), restriction), b)| {
            QuantifierOp::restricted(s, q, v, d, restriction, b)
        });

        let quantified = choice((plain_prefix, bounded_prefix, restricted_prefix))
            .then(formula.clone())
            .map(|(op, inner)| Formula::quantified(op, inner))
            .labelled("quantified formula");

        let binary = bracketed(formula.clone().then(connective.clone()).then(formula))
            .map(|(((left, (s, c)), right), b)| Formula::binary(s, c, left, right, Some(b)))
            .labelled("binary formula");

        let unit = choice((
            infix,
            negated_infix,
            meta,
            any_meta,
            relation_or_letter,
            negation_op,
            quantified,
            binary,
        ));

        unit.then(transform(term.clone()).or_not())
            .map(|(f, tr): (Formula, Option<SubstitutionTransform>)| match tr {
                Some(tr) => f.with_transform(tr),
                None => f,
            })
    });

    formula
        .clone()
        .then(connective.then(formula).or_not())
        .map(|(left, rest)| match rest {
            Some(((s, c), right)) => Formula::binary(s, c, left, right, None),
            None => left,
        })
}

// ---------------- Public API ----------------

fn finish<T>(
    src: &str,
    (output, errs): (Option<T>, Vec<Rich<'_, Token, Span>>),
) -> Result<T, ParseError> {
    let messages: Vec<String> = errs
        .into_iter()
        .map(|e| format!("parse error: {e}"))
        .collect();
    match output {
        Some(out) if messages.is_empty() => Ok(out),
        _ => Err(ParseError {
            text: src.to_string(),
            messages,
        }),
    }
}

/// Parser bound to one object language.
///
/// Example
/// ```
/// use hylogic::prelude::*;
///
/// let lang = Language::predicate();
/// let parser = FormulaParser::new(&lang);
/// let f = parser.parse_formula("∀x(Fx → x ≠ a)").unwrap();
/// assert_eq!(f.type_(), ExprType::Universal);
/// assert!(parser.parse_expression("f(a, x)").unwrap().is_term());
/// assert!(parser.parse_formula("P ⊕ Q").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FormulaParser<'l> {
    language: &'l Language,
}

impl<'l> FormulaParser<'l> {
    pub fn new(language: &'l Language) -> Self {
        Self { language }
    }

    #[inline]
    pub fn language(&self) -> &'l Language {
        self.language
    }

    fn negation_symbol(&self) -> Symbol {
        Symbol::new(
            self.language.primary_negation().to_string(),
            SymbolClass::Connective,
        )
    }

    fn lex(&self, src: &str) -> Result<Vec<Token>, ParseError> {
        let (tokens, lex_errs) = lexer(self.language).parse(src).into_output_errors();
        let messages: Vec<String> = lex_errs
            .into_iter()
            .map(|e| format!("lexing error: {e}"))
            .collect();
        match tokens {
            Some(tokens) if messages.is_empty() => {
                Ok(tokens.into_iter().map(|(tok, _span)| tok).collect())
            }
            _ => Err(ParseError {
                text: src.to_string(),
                messages,
            }),
        }
    }

    /// Parse `src` as a formula.
    pub fn parse_formula(&self, src: &str) -> Result<Formula, ParseError> {
        let tokens = self.lex(src)?;
        let result = formula_parser(self.negation_symbol())
            .then_ignore(end())
            .parse(tokens.as_slice())
            .into_output_errors();
        let f = finish(src, result)?;
        log::trace!("parsed `{src}` as {} formula", f.type_());
        Ok(f)
    }

    /// Parse `src` as a term, optionally followed by a substitution transform.
    pub fn parse_term(&self, src: &str) -> Result<Term, ParseError> {
        let tokens = self.lex(src)?;
        let term = term_parser();
        let result = term
            .clone()
            .then(transform(term).or_not())
            .map(|(t, tr)| match tr {
                Some(tr) => t.with_transform(tr),
                None => t,
            })
            .then_ignore(end())
            .parse(tokens.as_slice())
            .into_output_errors();
        let t = finish(src, result)?;
        log::trace!("parsed `{src}` as {} term", t.type_());
        Ok(t)
    }

    /// Parse `src` as a formula if possible, else as a term.
    ///
    /// When neither succeeds the error of the formula attempt is returned.
    pub fn parse_expression(&self, src: &str) -> Result<Expr, ParseError> {
        match self.parse_formula(src) {
            Ok(f) => Ok(Expr::Formula(f)),
            Err(err) => self.parse_term(src).map(Expr::Term).map_err(|_| err),
        }
    }

    /// `true` if `src` is a well-formed sentence of the language.
    pub fn is_sentence(&self, src: &str) -> bool {
        self.parse_formula(src).is_ok()
    }
}
