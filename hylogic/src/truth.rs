//! Truth-table evaluation.
//!
//! Role
//! - [`TruthTableSetup`] collects the declared basic formulas, the main
//!   formulas and the declared row count, checks them (first failure wins)
//!   and builds a [`TruthTable`].
//! - Each main formula is decomposed in in-order position (left operand,
//!   node, right operand; a negation before its operand). The nodes live in
//!   a side table next to the parsed tree, which itself stays untouched.
//! - Values are propagated per node in ascending nesting level, so every
//!   operand is known before the operator applying to it.
//!
//! Row convention: with `n` basic formulas, row `i` gives basic formula `j`
//! the value `T` when bit `n - 1 - j` of `i` is clear. The last basic
//! formula alternates every row, the first one is `T` for the top half.
//!
//! Example
//! ```
//! use hylogic::prelude::*;
//!
//! let lang = Language::sentential();
//! let table = TruthTableSetup::new(&lang)
//!     .basic(["P", "Q"])
//!     .main(["(P → Q)"])
//!     .rows(4)
//!     .build()
//!     .unwrap();
//! let root = table.main_columns()[0];
//! assert_eq!(table.key().to_strings()[root].as_deref(), Some(&["T", "F", "T", "T"][..]));
//! ```
use std::fmt;
use std::io::{self, Write};
use std::ops::Not;

use strum::{Display, EnumIs};
use termcolor::{ColorSpec, NoColor, WriteColor};

use crate::config::EngineConfig;
use crate::error::{OperandRole, SetupError};
use crate::expr::formula::{Formula, FormulaKind};
use crate::expr::operator::BinaryConnective;
use crate::expr::pretty::{PrettyExpr, Rendering, write_runs};
use crate::expr::{Expr, Expression};
use crate::head::{Alignment, TableHeadItem, language_head_items};
use crate::language::Language;
use crate::parser::FormulaParser;

/// Classical truth value, written `T` / `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Display)]
pub enum TruthValue {
    #[strum(to_string = "T")]
    True,
    #[strum(to_string = "F")]
    False,
}

impl TruthValue {
    pub fn as_str(self) -> &'static str {
        match self {
            TruthValue::True => "T",
            TruthValue::False => "F",
        }
    }

    /// Case-insensitive `T` / `F`, surrounding blanks ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "T" | "t" => Some(TruthValue::True),
            "F" | "f" => Some(TruthValue::False),
            _ => None,
        }
    }
}

impl From<bool> for TruthValue {
    fn from(b: bool) -> Self {
        if b { TruthValue::True } else { TruthValue::False }
    }
}

impl From<TruthValue> for bool {
    fn from(v: TruthValue) -> Self {
        v.is_true()
    }
}

impl Not for TruthValue {
    type Output = TruthValue;

    fn not(self) -> TruthValue {
        match self {
            TruthValue::True => TruthValue::False,
            TruthValue::False => TruthValue::True,
        }
    }
}

impl BinaryConnective {
    /// Truth function of the connective.
    pub fn apply(self, left: TruthValue, right: TruthValue) -> TruthValue {
        let (l, r) = (left.is_true(), right.is_true());
        TruthValue::from(match self {
            BinaryConnective::Conditional => !l || r,
            BinaryConnective::Conjunction => l && r,
            BinaryConnective::Disjunction => l || r,
            BinaryConnective::Biconditional => l == r,
            BinaryConnective::Nand => !(l && r),
            BinaryConnective::Nor => !(l || r),
        })
    }
}

/// One assignment of truth values to the basic formulas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interpretation {
    values: Vec<TruthValue>,
}

impl Interpretation {
    /// Assignment of row `row` for `n` basic formulas.
    pub fn for_row(n: usize, row: usize) -> Self {
        let values = (0..n)
            .map(|j| TruthValue::from((row >> (n - 1 - j)) & 1 == 0))
            .collect();
        Self { values }
    }

    #[inline]
    pub fn value(&self, basic: usize) -> TruthValue {
        self.values[basic]
    }

    #[inline]
    pub fn values(&self) -> &[TruthValue] {
        &self.values
    }
}

/// `2^n`, or `None` when it does not fit a `usize`.
pub fn row_count(n: usize) -> Option<usize> {
    1usize.checked_shl(u32::try_from(n).ok()?)
}

/// All `2^n` interpretations in row order.
///
/// # Panics
/// When `2^n` does not fit a `usize`; see [`row_count`].
pub fn interpretations(n: usize) -> impl Iterator<Item = Interpretation> {
    let rows = row_count(n).expect("row count overflows usize");
    (0..rows).map(move |row| Interpretation::for_row(n, row))
}

/// Computed values, indexed `[column][row]`; blank columns hold `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthKey {
    columns: Vec<Option<Vec<TruthValue>>>,
    rows: usize,
}

impl TruthKey {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, column: usize) -> Option<&[TruthValue]> {
        self.columns.get(column)?.as_deref()
    }

    pub fn value(&self, column: usize, row: usize) -> Option<TruthValue> {
        self.column(column)?.get(row).copied()
    }

    /// The key as `"T"` / `"F"` strings.
    pub fn to_strings(&self) -> Vec<Option<Vec<&'static str>>> {
        self.columns
            .iter()
            .map(|c| c.as_ref().map(|vs| vs.iter().map(|v| v.as_str()).collect()))
            .collect()
    }
}

/// A built truth table: header layout, key and highlight policy.
#[derive(Debug, Clone)]
pub struct TruthTable {
    basic: Vec<Formula>,
    main: Vec<Formula>,
    head: Vec<TableHeadItem>,
    key: TruthKey,
    highlight: Vec<bool>,
    basic_columns: Vec<bool>,
    main_columns: Vec<usize>,
    interpretations: Vec<Interpretation>,
}

impl TruthTable {
    pub fn basic_formulas(&self) -> &[Formula] {
        &self.basic
    }

    pub fn main_formulas(&self) -> &[Formula] {
        &self.main
    }

    pub fn head(&self) -> &[TableHeadItem] {
        &self.head
    }

    pub fn key(&self) -> &TruthKey {
        &self.key
    }

    /// Columns that must be highlighted: the value of each whole main formula.
    pub fn highlight(&self) -> &[bool] {
        &self.highlight
    }

    /// Columns of the declared basic formulas.
    pub fn basic_columns(&self) -> &[bool] {
        &self.basic_columns
    }

    /// Column holding the value of each main formula, in declaration order.
    pub fn main_columns(&self) -> &[usize] {
        &self.main_columns
    }

    pub fn interpretations(&self) -> &[Interpretation] {
        &self.interpretations
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.key.rows()
    }

    fn column_widths(&self) -> Vec<usize> {
        self.head
            .iter()
            .map(|h| h.layout.min_width.max(h.text().chars().count()))
            .collect()
    }

    /// Print the table, highlighted columns in bold.
    pub fn write_to<W: WriteColor + Write>(&self, out: &mut W) -> io::Result<()> {
        let widths = self.column_widths();
        for (item, &width) in self.head.iter().zip(&widths) {
            if item.divider_column {
                write!(out, "|")?;
                continue;
            }
            let (left, right) = padding(item.text().chars().count(), width, item.layout.alignment);
            write!(out, "{:left$}", "")?;
            write_runs(&item.runs, out)?;
            write!(out, "{:right$}", "")?;
        }
        writeln!(out)?;

        let mut bold = ColorSpec::new();
        bold.set_bold(true);
        for row in 0..self.rows() {
            for (column, (item, &width)) in self.head.iter().zip(&widths).enumerate() {
                if item.divider_column {
                    write!(out, "|")?;
                    continue;
                }
                let cell = self.key.value(column, row).map_or("", TruthValue::as_str);
                let (left, right) = padding(cell.chars().count(), width, item.layout.alignment);
                write!(out, "{:left$}", "")?;
                if self.highlight[column] {
                    out.set_color(&bold)?;
                    write!(out, "{cell}")?;
                    out.reset()?;
                } else {
                    write!(out, "{cell}")?;
                }
                write!(out, "{:right$}", "")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = NoColor::new(Vec::new());
        self.write_to(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf.into_inner()))
    }
}

fn padding(len: usize, width: usize, alignment: Alignment) -> (usize, usize) {
    let extra = width.saturating_sub(len);
    match alignment {
        Alignment::Left => (0, extra),
        Alignment::Right => (extra, 0),
        Alignment::Center => (extra / 2, extra - extra / 2),
    }
}

// ---------------- decomposition side table ----------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    /// Index into the declared basic formulas.
    Basic(usize),
    Negation(usize),
    Binary(BinaryConnective, usize, usize),
}

#[derive(Debug)]
struct Node<'f> {
    formula: &'f Formula,
    kind: NodeKind,
}

struct Undeclared<'f> {
    subformula: &'f Formula,
    /// Position among the displayed nodes, if the node is displayed.
    display_index: Option<usize>,
}

struct Decomposition<'f, 'b> {
    basic: &'b [Formula],
    nodes: Vec<Node<'f>>,
    /// Displayed nodes in in-order position; one per header value column.
    displayed: Vec<usize>,
}

impl<'f, 'b> Decomposition<'f, 'b> {
    fn of(root: &'f Formula, basic: &'b [Formula]) -> Result<(Self, usize), Undeclared<'f>> {
        let mut d = Self {
            basic,
            nodes: Vec::new(),
            displayed: Vec::new(),
        };
        let root = d.visit(root, true)?;
        Ok((d, root))
    }

    fn push(&mut self, formula: &'f Formula, kind: NodeKind, shown: bool) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node { formula, kind });
        if shown {
            self.displayed.push(idx);
        }
        idx
    }

    fn visit(&mut self, f: &'f Formula, shown: bool) -> Result<usize, Undeclared<'f>> {
        match f.kind() {
            FormulaKind::Negation { inner, .. } if !f.is_basic() => {
                let idx = self.push(f, NodeKind::Negation(usize::MAX), shown);
                // `a ≠ b` shows one column for the negation and its operand
                let hide = inner.negated_rendering().is_some();
                let child = self.visit(inner, shown && !hide)?;
                self.nodes[idx].kind = NodeKind::Negation(child);
                Ok(idx)
            }
            FormulaKind::Binary {
                connective,
                left,
                right,
                ..
            } if !f.is_basic() => {
                let l = self.visit(left, shown)?;
                let idx = self.push(f, NodeKind::Binary(*connective, l, usize::MAX), shown);
                let r = self.visit(right, shown)?;
                self.nodes[idx].kind = NodeKind::Binary(*connective, l, r);
                Ok(idx)
            }
            _ => match self.basic.iter().position(|b| b == f) {
                Some(j) => Ok(self.push(f, NodeKind::Basic(j), shown)),
                None => Err(Undeclared {
                    subformula: f,
                    display_index: shown.then_some(self.displayed.len()),
                }),
            },
        }
    }

    /// Values of every node, indexed `[node][row]`.
    fn evaluate(&self, interpretations: &[Interpretation]) -> Vec<Vec<TruthValue>> {
        let mut order: Vec<usize> = (0..self.nodes.len()).collect();
        order.sort_by_key(|&i| self.nodes[i].formula.level());

        let mut values: Vec<Vec<TruthValue>> = vec![Vec::new(); self.nodes.len()];
        for i in order {
            let column: Vec<TruthValue> = match self.nodes[i].kind {
                NodeKind::Basic(j) => interpretations.iter().map(|it| it.value(j)).collect(),
                NodeKind::Negation(c) => values[c].iter().map(|v| !*v).collect(),
                NodeKind::Binary(op, l, r) => values[l]
                    .iter()
                    .zip(&values[r])
                    .map(|(a, b)| op.apply(*a, *b))
                    .collect(),
            };
            values[i] = column;
        }
        values
    }
}

// ---------------- setup ----------------

/// Inputs of a truth table.
#[derive(Debug, Clone)]
pub struct TruthTableSetup<'l> {
    language: &'l Language,
    basic: Vec<String>,
    main: Vec<String>,
    rows: Option<usize>,
    max_rows: usize,
}

impl<'l> TruthTableSetup<'l> {
    pub fn new(language: &'l Language) -> Self {
        Self {
            language,
            basic: Vec::new(),
            main: Vec::new(),
            rows: None,
            max_rows: EngineConfig::default().max_rows,
        }
    }

    /// Declared basic formulas, in ascending order of their text.
    pub fn basic<I, S>(mut self, formulas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.basic.extend(formulas.into_iter().map(Into::into));
        self
    }

    pub fn main<I, S>(mut self, formulas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.main.extend(formulas.into_iter().map(Into::into));
        self
    }

    /// Declared row count; when absent the table gets `2^n` rows.
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_config(self, config: &EngineConfig) -> Self {
        self.max_rows(config.max_rows)
    }

    fn parse_operand(
        &self,
        parser: &FormulaParser<'_>,
        role: OperandRole,
        position: usize,
        text: &str,
    ) -> Result<Formula, SetupError> {
        let malformed = |reason: String| SetupError::MalformedOperand {
            role,
            position,
            text: text.to_string(),
            reason,
        };
        match parser.parse_expression(text) {
            Ok(Expr::Formula(f)) => Ok(f),
            Ok(Expr::Term(_)) => Err(malformed("it is a term".to_string())),
            Err(e) => Err(malformed(e.messages.join("; "))),
        }
    }

    /// Check the setup and compute the table.
    pub fn build(&self) -> Result<TruthTable, SetupError> {
        self.try_build().inspect_err(|e| log::debug!("truth table setup rejected: {e}"))
    }

    fn try_build(&self) -> Result<TruthTable, SetupError> {
        let parser = FormulaParser::new(self.language);

        if self.basic.is_empty() {
            return Err(SetupError::NoBasicFormula);
        }
        if let Some(i) = self.basic.iter().position(|s| s.trim().is_empty()) {
            return Err(SetupError::EmptyBasicFormula { position: i + 1 });
        }
        let basic = self
            .basic
            .iter()
            .enumerate()
            .map(|(i, s)| self.parse_operand(&parser, OperandRole::Basic, i + 1, s))
            .collect::<Result<Vec<_>, _>>()?;

        let texts: Vec<String> = basic.iter().map(|f| f.to_string()).collect();
        if let Some(i) = (1..texts.len()).find(|&i| texts[i - 1] >= texts[i]) {
            return Err(SetupError::SetupOrderViolation {
                previous: Rendering::of(&basic[i - 1]),
                next: Rendering::of(&basic[i]),
            });
        }

        let n = basic.len();
        let Some(expected) = row_count(n) else {
            return Err(SetupError::RowLimitExceeded {
                rows: usize::MAX,
                limit: self.max_rows,
            });
        };
        if let Some(declared) = self.rows {
            if declared == 0 || declared != expected {
                return Err(SetupError::RowCountMismatch {
                    declared,
                    expected,
                    basic_count: n,
                });
            }
        }
        if expected > self.max_rows {
            return Err(SetupError::RowLimitExceeded {
                rows: expected,
                limit: self.max_rows,
            });
        }

        let main = self
            .main
            .iter()
            .enumerate()
            .map(|(i, s)| self.parse_operand(&parser, OperandRole::Main, i + 1, s))
            .collect::<Result<Vec<_>, _>>()?;

        let interpretations: Vec<Interpretation> = (0..expected)
            .map(|row| Interpretation::for_row(n, row))
            .collect();
        let mut head = Vec::new();
        let mut columns: Vec<Option<Vec<TruthValue>>> = Vec::new();
        let mut basic_columns = Vec::new();

        for (j, f) in basic.iter().enumerate() {
            head.push(TableHeadItem::value(f.text_runs()));
            columns.push(Some(interpretations.iter().map(|it| it.value(j)).collect()));
            basic_columns.push(true);
        }

        let mut main_columns = Vec::with_capacity(main.len());
        for f in &main {
            head.push(TableHeadItem::divider());
            columns.push(None);
            basic_columns.push(false);

            let base = head.len();
            let items = language_head_items(self.language, &f.to_string())?;
            let value_columns: Vec<usize> = items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.holds_values())
                .map(|(k, _)| base + k)
                .collect();

            let (deco, root) = Decomposition::of(f, &basic).map_err(|u| {
                SetupError::UndeclaredBasicDependency {
                    formula: Rendering::of(f),
                    subformula: Rendering::of(u.subformula),
                    column: u
                        .display_index
                        .and_then(|k| value_columns.get(k).copied())
                        .unwrap_or(base),
                }
            })?;
            if deco.displayed.len() != value_columns.len() {
                return Err(SetupError::LayoutMismatch {
                    formula: Rendering::of(f),
                    columns: deco.displayed.len(),
                    head_items: value_columns.len(),
                });
            }

            let values = deco.evaluate(&interpretations);
            columns.extend(std::iter::repeat_n(None, items.len()));
            basic_columns.extend(std::iter::repeat_n(false, items.len()));
            head.extend(items);
            for (&node, &column) in deco.displayed.iter().zip(&value_columns) {
                columns[column] = Some(values[node].clone());
                if node == root {
                    main_columns.push(column);
                }
            }
        }

        let mut highlight = vec![false; head.len()];
        for &c in &main_columns {
            highlight[c] = true;
        }

        log::debug!(
            "built truth table: {} basic, {} main, {} columns, {} rows",
            basic.len(),
            main.len(),
            head.len(),
            interpretations.len()
        );
        Ok(TruthTable {
            basic,
            main,
            head,
            key: TruthKey {
                columns,
                rows: interpretations.len(),
            },
            highlight,
            basic_columns,
            main_columns,
            interpretations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn connectives_follow_their_truth_tables() {
        use TruthValue::{False as F, True as T};
        let expected = [
            (BinaryConnective::Conditional, [T, F, T, T]),
            (BinaryConnective::Conjunction, [T, F, F, F]),
            (BinaryConnective::Disjunction, [T, T, T, F]),
            (BinaryConnective::Biconditional, [T, F, F, T]),
            (BinaryConnective::Nand, [F, T, T, T]),
            (BinaryConnective::Nor, [F, F, F, T]),
        ];
        assert_eq!(expected.len(), BinaryConnective::iter().count());
        for (op, column) in expected {
            let got: Vec<_> = [(T, T), (T, F), (F, T), (F, F)]
                .into_iter()
                .map(|(l, r)| op.apply(l, r))
                .collect();
            assert_eq!(got, column, "{op}");
        }
    }

    #[test]
    fn truth_value_parsing_ignores_case() {
        assert_eq!(TruthValue::parse(" t "), Some(TruthValue::True));
        assert_eq!(TruthValue::parse("F"), Some(TruthValue::False));
        assert_eq!(TruthValue::parse("x"), None);
        assert_eq!(!TruthValue::True, TruthValue::False);
    }

    #[test]
    fn row_count_never_overflows() {
        assert_eq!(row_count(0), Some(1));
        assert_eq!(row_count(6), Some(64));
        assert_eq!(row_count(usize::BITS as usize), None);
        assert_eq!(row_count(usize::MAX), None);
    }

    #[test]
    fn padding_centers() {
        assert_eq!(padding(1, 4, Alignment::Center), (1, 2));
        assert_eq!(padding(5, 4, Alignment::Center), (0, 0));
    }
}
