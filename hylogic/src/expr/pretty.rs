//! RcDoc-based renderer with style annotations for formulas and terms.
//!
//! Role
//! - Build one annotated document per expression and render it to three sinks:
//!   a plain `String` (`Display`, ordering, diagnostics), a list of styled
//!   [`TextRun`]s for rich-text consumers, and a termcolor writer for terminals.
//! - Because every sink renders the same document, stripping the styles from
//!   the runs always yields the plain string.
//!
//! Notation
//! - Binary formulas are written infix inside their own bracket pair; an
//!   outermost formula parsed without brackets is printed without them, any
//!   nested one falls back to `(` `)`.
//! - A negation over an infix atomic written negated (`a ≠ b`) is printed
//!   through [`Formula::negated_rendering`] instead of prefixing the glyph.
//! - Substitution transforms are appended as `[t/x]` or, when they combine,
//!   as the stacked `^x_t`; `x` carries [`Style::Superscript`] and `t`
//!   [`Style::Subscript`].
use std::fmt;
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::expr::formula::{Formula, FormulaKind};
use crate::expr::operator::Restriction;
use crate::expr::term::{Term, TermKind};
use crate::expr::transform::SubstitutionTransform;
use crate::expr::{Expr, ExprRef};
use crate::symbol::{Brackets, Layout, Symbol};

/// Number of distinct bracket colors.
const BRACKET_COLORS: u8 = 6;

/// Documents never contain line breaks, the width only matters to `pretty`.
const RENDER_WIDTH: usize = 80;

/// Styles used to annotate parts of a rendered expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Unstyled text (spacing, header text that is not an expression).
    Plain,
    Letter,
    Relation,
    Term,
    Operator,
    Meta,
    Punct,
    /// Brackets are colored by nesting depth so matching pairs share a color.
    Bracket(u8),
    Superscript,
    Subscript,
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Plain => {}
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Bracket(depth) => {
                let fg = match depth % BRACKET_COLORS {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    5 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Letter | Style::Relation => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Term => {
                s.set_fg(Some(Color::Cyan));
            }
            Style::Meta => {
                s.set_fg(Some(Color::Magenta)).set_italic(true);
            }
            Style::Superscript | Style::Subscript => {
                s.set_fg(Some(Color::Cyan)).set_italic(true);
            }
        }
        s
    }
}

/// A piece of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextRun {
    pub text: String,
    pub style: Style,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::Plain)
    }
}

/// Concatenate the text of `runs`, dropping the styles.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Both renderings of an expression, as carried by diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rendering {
    pub text: String,
    pub runs: Vec<TextRun>,
}

impl Rendering {
    pub fn of<E: PrettyExpr + ?Sized>(e: &E) -> Self {
        Self {
            text: e.pretty_string(),
            runs: e.text_runs(),
        }
    }
}

impl fmt::Display for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn styled(style: Style, s: impl Into<String>) -> RcDoc<'static, Style> {
    RcDoc::text(s.into()).annotate(style)
}

fn symbol(style: Style, s: &Symbol) -> RcDoc<'static, Style> {
    styled(style, s.text())
}

fn punct(s: impl Into<String>) -> RcDoc<'static, Style> {
    styled(Style::Punct, s)
}

fn space() -> RcDoc<'static, Style> {
    RcDoc::text(" ")
}

/// Bracket colors cycle with nesting depth.
pub(crate) fn bracket_style(depth: usize) -> Style {
    let cycled = depth % usize::from(BRACKET_COLORS);
    Style::Bracket(u8::try_from(cycled).unwrap_or_default())
}

#[inline]
fn lbracket(b: Brackets, depth: usize) -> RcDoc<'static, Style> {
    styled(bracket_style(depth), b.open)
}

#[inline]
fn rbracket(b: Brackets, depth: usize) -> RcDoc<'static, Style> {
    styled(bracket_style(depth), b.close)
}

fn infix(
    left: RcDoc<'static, Style>,
    op: &Symbol,
    right: RcDoc<'static, Style>,
) -> RcDoc<'static, Style> {
    left.append(space())
        .append(symbol(Style::Operator, op))
        .append(space())
        .append(right)
}

fn bracketed(b: Brackets, depth: usize, inner: RcDoc<'static, Style>) -> RcDoc<'static, Style> {
    lbracket(b, depth).append(inner).append(rbracket(b, depth))
}

fn arg_list(args: &[Term], brackets: &Layout<Brackets>, depth: usize) -> RcDoc<'static, Style> {
    let inner = RcDoc::intersperse(args.iter().map(|a| term_doc(a, depth + 1)), punct(", "));
    bracketed(brackets.0, depth, inner)
}

fn transform_doc(t: &SubstitutionTransform) -> RcDoc<'static, Style> {
    let variable = styled(Style::Superscript, t.variable.to_string());
    let term = styled(Style::Subscript, t.term.to_string());
    if *t.combines {
        punct("^").append(variable).append(punct("_")).append(term)
    } else {
        punct("[")
            .append(term)
            .append(punct("/"))
            .append(variable)
            .append(punct("]"))
    }
}

fn with_transform(
    body: RcDoc<'static, Style>,
    transform: Option<&SubstitutionTransform>,
) -> RcDoc<'static, Style> {
    match transform {
        Some(t) => body.append(transform_doc(t)),
        None => body,
    }
}

fn term_doc(t: &Term, depth: usize) -> RcDoc<'static, Style> {
    let body = match t.kind() {
        TermKind::Constant(s) | TermKind::Variable(s) => symbol(Style::Term, s),
        TermKind::Function {
            symbol: s,
            args,
            brackets,
        } => symbol(Style::Term, s).append(arg_list(args, brackets, depth)),
        TermKind::Infix {
            symbol: s,
            left,
            right,
            brackets,
        } => bracketed(
            brackets.0,
            depth,
            infix(term_doc(left, depth + 1), s, term_doc(right, depth + 1)),
        ),
        TermKind::Meta(s) | TermKind::PseudoMeta(s) | TermKind::AnyMeta(s) => {
            symbol(Style::Meta, s)
        }
        TermKind::ComplexMeta {
            symbol: s,
            params,
            brackets,
        } => symbol(Style::Meta, s).append(arg_list(params, brackets, depth)),
    };
    with_transform(body, t.transform())
}

fn formula_doc(f: &Formula, depth: usize, root: bool) -> RcDoc<'static, Style> {
    let body = match f.kind() {
        FormulaKind::Letter(s) => symbol(Style::Letter, s),
        FormulaKind::Relation { relation, args } => symbol(Style::Relation, relation)
            .append(RcDoc::concat(args.iter().map(|a| term_doc(a, depth)))),
        FormulaKind::Infix {
            relation,
            left,
            right,
            ..
        } => infix(term_doc(left, depth), relation, term_doc(right, depth)),
        FormulaKind::Meta(s) | FormulaKind::AnyMeta(s) => symbol(Style::Meta, s),
        FormulaKind::ComplexMeta {
            symbol: s,
            params,
            brackets,
        } => symbol(Style::Meta, s).append(arg_list(params, brackets, depth)),
        FormulaKind::Negation { symbol: s, inner } => match inner.negated_rendering() {
            Some(doc) => doc,
            None => symbol(Style::Operator, s).append(formula_doc(inner, depth, false)),
        },
        FormulaKind::Binary {
            symbol: s,
            left,
            right,
            brackets,
            ..
        } => {
            let brackets = match brackets.0 {
                Some(b) => Some(b),
                None if root && f.transform().is_none() => None,
                None => Some(Brackets::ROUND),
            };
            let inner_depth = if brackets.is_some() { depth + 1 } else { depth };
            let core = infix(
                formula_doc(left, inner_depth, false),
                s,
                formula_doc(right, inner_depth, false),
            );
            match brackets {
                Some(b) => bracketed(b, depth, core),
                None => core,
            }
        }
        FormulaKind::Quantified { op, inner } => {
            let prefix = symbol(Style::Operator, &op.symbol).append(term_doc(&op.variable, depth));
            let prefix = match &op.restriction {
                Restriction::None => prefix,
                Restriction::Bounded {
                    relation,
                    bound,
                    brackets,
                } => bracketed(
                    brackets.0,
                    depth,
                    infix(prefix, relation, term_doc(bound, depth + 1)),
                ),
                Restriction::Restricted {
                    divider,
                    formula,
                    brackets,
                } => bracketed(
                    brackets.0,
                    depth,
                    prefix
                        .append(symbol(Style::Punct, divider))
                        .append(space())
                        .append(formula_doc(formula, depth + 1, false)),
                ),
            };
            prefix.append(formula_doc(inner, depth, false))
        }
    };
    with_transform(body, f.transform())
}

impl Formula {
    /// Rendering used when this formula is the operand of a negation.
    ///
    /// Only an infix atomic written negated has one: `~(a = b)` written as
    /// `a ≠ b` renders with the complement glyph. Other formulas return
    /// `None` and the negation glyph is prefixed as usual.
    pub fn negated_rendering(&self) -> Option<RcDoc<'static, Style>> {
        if self.transform().is_some() {
            return None;
        }
        match self.kind() {
            FormulaKind::Infix {
                left,
                right,
                negated: Layout(Some(complement)),
                ..
            } => Some(infix(term_doc(left, 0), complement, term_doc(right, 0))),
            _ => None,
        }
    }
}

/// Collects rendered text into style runs, merging neighbours with the same style.
#[derive(Default)]
struct RunCollector {
    runs: Vec<TextRun>,
    stack: Vec<Style>,
}

impl RunCollector {
    fn push(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let style = self.stack.last().copied().unwrap_or(Style::Plain);
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(s),
            _ => self.runs.push(TextRun::new(s, style)),
        }
    }
}

impl pretty::Render for RunCollector {
    type Error = fmt::Error;

    fn write_str(&mut self, s: &str) -> Result<usize, fmt::Error> {
        self.push(s);
        Ok(s.len())
    }

    fn write_str_all(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.push(s);
        Ok(())
    }

    fn fail_doc(&self) -> Self::Error {
        fmt::Error
    }
}

impl<'a> RenderAnnotated<'a, Style> for RunCollector {
    fn push_annotation(&mut self, ann: &'a Style) -> Result<(), fmt::Error> {
        self.stack.push(*ann);
        Ok(())
    }

    fn pop_annotation(&mut self) -> Result<(), fmt::Error> {
        self.stack.pop();
        Ok(())
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render styled runs to a `termcolor::WriteColor`.
pub fn write_runs<W: WriteColor + Write>(runs: &[TextRun], out: &mut W) -> io::Result<()> {
    for run in runs {
        out.set_color(&run.style.to_color_spec())?;
        out.write_all(run.text.as_bytes())?;
    }
    out.reset()
}

/// Retrieve the width of the terminal, or 80 if it cannot be determined.
pub fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Rendering conveniences for expressions.
pub trait PrettyExpr {
    /// Annotated document for this expression.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Styled runs, content-equivalent to [`PrettyExpr::pretty_string`].
    fn text_runs(&self) -> Vec<TextRun> {
        let mut collector = RunCollector::default();
        // RunCollector never fails
        let _ = self.pretty_doc().render_raw(RENDER_WIDTH, &mut collector);
        collector.runs
    }

    /// Render with colors to any termcolor writer.
    fn pretty_render_to<W: WriteColor + Write>(&self, out: &mut W) -> io::Result<()> {
        let mut cw = ColorWriter { out };
        self.pretty_doc().render_raw(RENDER_WIDTH, &mut cw)
    }

    /// Print to stdout with colors (TTY-aware), followed by a newline.
    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        let mut cw = ColorWriter { out: &mut stdout };
        self.pretty_doc().render_raw(terminal_width(), &mut cw)?;
        stdout.write_all(b"\n")
    }

    /// Plain string, no colors.
    fn pretty_string(&self) -> String {
        let mut buf = String::new();
        let _ = self.pretty_doc().render_fmt(RENDER_WIDTH, &mut buf);
        buf
    }
}

impl PrettyExpr for Formula {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        formula_doc(self, 0, true)
    }
}

impl PrettyExpr for Term {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        term_doc(self, 0)
    }
}

impl<'a> PrettyExpr for ExprRef<'a> {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        match self {
            ExprRef::Formula(f) => f.pretty_doc(),
            ExprRef::Term(t) => t.pretty_doc(),
        }
    }
}

impl PrettyExpr for Expr {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        self.as_ref().pretty_doc()
    }
}

macro_rules! impl_display_for_type {
    ($t:ty $(, $lt:lifetime)?) => {
        impl $(<$lt>)? fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut w = FmtWrite::new(f);
                self.pretty_doc().render_raw(RENDER_WIDTH, &mut w)
            }
        }
    };
}

impl_display_for_type!(Formula);
impl_display_for_type!(Term);
impl_display_for_type!(Expr);
impl_display_for_type!(ExprRef<'a>, 'a);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_merges_equal_styles() {
        let mut c = RunCollector::default();
        c.push("a");
        c.stack.push(Style::Operator);
        c.push("→");
        c.push("");
        c.stack.pop();
        c.push(" ");
        c.push("b");
        assert_eq!(
            c.runs,
            vec![
                TextRun::plain("a"),
                TextRun::new("→", Style::Operator),
                TextRun::plain(" b"),
            ]
        );
    }

    #[test]
    fn bracket_colors_cycle() {
        assert_eq!(bracket_style(0), Style::Bracket(0));
        assert_eq!(bracket_style(7), Style::Bracket(1));
        assert_eq!(bracket_style(usize::MAX), Style::Bracket((usize::MAX % 6) as u8));
    }

    #[test]
    fn plain_text_concatenates() {
        let runs = [TextRun::plain("("), TextRun::new("P", Style::Letter)];
        assert_eq!(plain_text(&runs), "(P");
    }
}
