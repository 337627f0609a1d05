//! Segmentation of formula text into truth-table header items.
//!
//! The scanner walks the text once with a cursor and classifies each
//! character as an open bracket, a close bracket, an operator (membership in
//! the caller's [`OperatorSet`]) or a relation character (anything else).
//!
//! - Whitespace never starts an item.
//! - An operator is an item of its own; binary operators are padded with one
//!   space on each side.
//! - An open-bracket run takes the following open brackets, then either one
//!   operator character (a bracketed operator prefix such as `(~`) or a
//!   relation run.
//! - A relation run takes relation characters and whole nested bracket
//!   groups (operators inside a group included), then the close brackets
//!   that follow it. Text directly after those close brackets continues the
//!   run, so `(∀x < a)Fx` stays one item.
//! - Once a run has met a quantifier glyph (a binder of the operator set),
//!   unary operators in its scope belong to the run: `∀x~Fx` is one item.
//! - A close bracket with no open bracket left to match stops the scan with
//!   [`LayoutError::UnexpectedCloseBracket`].
//!
//! With the canonical rendering of a formula, the non-blank items line up
//! one-to-one with the displayed subformulas in in-order position, which is
//! what the truth evaluator relies on.
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::expr::pretty::{Style, TextRun, bracket_style, plain_text};
use crate::language::{Language, OperatorSet};
use crate::symbol::Brackets;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Layout constraints of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Minimum width in characters.
    pub min_width: usize,
    pub alignment: Alignment,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            min_width: 2,
            alignment: Alignment::Center,
        }
    }
}

/// One column of a truth-table header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableHeadItem {
    pub runs: Vec<TextRun>,
    pub layout: ColumnLayout,
    /// The column holds no truth value.
    pub blank_column: bool,
    /// Visual separator; always blank as well.
    pub divider_column: bool,
}

impl TableHeadItem {
    /// A column that holds truth values.
    pub fn value(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            layout: ColumnLayout::default(),
            blank_column: false,
            divider_column: false,
        }
    }

    /// A column without truth values (e.g. a stray bracket).
    pub fn blank(runs: Vec<TextRun>) -> Self {
        Self {
            blank_column: true,
            ..Self::value(runs)
        }
    }

    pub fn divider() -> Self {
        Self {
            runs: Vec::new(),
            layout: ColumnLayout {
                min_width: 1,
                alignment: Alignment::Center,
            },
            blank_column: true,
            divider_column: true,
        }
    }

    pub fn text(&self) -> String {
        plain_text(&self.runs)
    }

    #[inline]
    pub fn holds_values(&self) -> bool {
        !self.blank_column
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Open,
    Close,
    Operator,
    Relation,
}

struct HeadScanner<'a> {
    text: &'a str,
    chars: Vec<char>,
    operators: &'a OperatorSet,
    brackets: &'a [Brackets],
    pos: usize,
    /// Open brackets not closed yet, over the whole text.
    depth: usize,
    items: Vec<TableHeadItem>,
}

impl<'a> HeadScanner<'a> {
    fn new(text: &'a str, operators: &'a OperatorSet, brackets: &'a [Brackets]) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            operators,
            brackets,
            pos: 0,
            depth: 0,
            items: Vec::new(),
        }
    }

    fn class(&self, c: char) -> CharClass {
        if c.is_whitespace() {
            CharClass::Space
        } else if self.brackets.iter().any(|b| b.open == c) {
            CharClass::Open
        } else if self.brackets.iter().any(|b| b.close == c) {
            CharClass::Close
        } else if self.operators.contains(c) {
            CharClass::Operator
        } else {
            CharClass::Relation
        }
    }

    fn peek(&self) -> Option<(char, CharClass)> {
        self.chars.get(self.pos).map(|&c| (c, self.class(c)))
    }

    /// Class of the first non-blank character after the cursor.
    fn next_solid(&self) -> Option<CharClass> {
        self.chars[self.pos..]
            .iter()
            .map(|&c| self.class(c))
            .find(|k| *k != CharClass::Space)
    }

    fn unexpected_close(&self) -> LayoutError {
        LayoutError::UnexpectedCloseBracket {
            text: self.text.to_string(),
            position: self.pos,
        }
    }

    fn open(&mut self, c: char, cur: &mut Vec<TextRun>) {
        push_char(cur, c, bracket_style(self.depth));
        self.depth += 1;
        self.pos += 1;
    }

    fn close(&mut self, c: char, cur: &mut Vec<TextRun>) -> Result<(), LayoutError> {
        if self.depth == 0 {
            return Err(self.unexpected_close());
        }
        self.depth -= 1;
        push_char(cur, c, bracket_style(self.depth));
        self.pos += 1;
        Ok(())
    }

    fn run(mut self) -> Result<Vec<TableHeadItem>, LayoutError> {
        while let Some((c, class)) = self.peek() {
            match class {
                CharClass::Space => self.pos += 1,
                CharClass::Operator => {
                    let mut cur = Vec::new();
                    if self.operators.is_binary(c) {
                        push_char(&mut cur, ' ', Style::Plain);
                        push_char(&mut cur, c, Style::Operator);
                        push_char(&mut cur, ' ', Style::Plain);
                    } else {
                        push_char(&mut cur, c, Style::Operator);
                    }
                    self.pos += 1;
                    self.items.push(TableHeadItem::value(cur));
                }
                CharClass::Close => {
                    let mut cur = Vec::new();
                    self.close(c, &mut cur)?;
                    self.items.push(TableHeadItem::blank(cur));
                }
                CharClass::Open => self.open_run()?,
                CharClass::Relation => self.relation_run(Vec::new())?,
            }
        }
        Ok(self.items)
    }

    fn open_run(&mut self) -> Result<(), LayoutError> {
        let mut cur = Vec::new();
        while let Some((c, class)) = self.peek() {
            match class {
                CharClass::Open => self.open(c, &mut cur),
                CharClass::Space if !matches!(self.next_solid(), None | Some(CharClass::Close)) => {
                    push_char(&mut cur, c, Style::Plain);
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if let Some((c, CharClass::Operator)) = self.peek() {
            push_char(&mut cur, c, Style::Operator);
            self.pos += 1;
            self.items.push(TableHeadItem::value(cur));
            return Ok(());
        }
        self.relation_run(cur)
    }

    fn relation_run(&mut self, mut cur: Vec<TextRun>) -> Result<(), LayoutError> {
        // brackets opened inside this run
        let mut local = 0usize;
        // a quantifier glyph was seen; unary operators in its scope stay here
        let mut scoped = false;
        while let Some((c, class)) = self.peek() {
            match class {
                CharClass::Relation => {
                    scoped |= self.operators.is_binder(c);
                    push_char(&mut cur, c, Style::Plain);
                    self.pos += 1;
                }
                CharClass::Open => {
                    local += 1;
                    self.open(c, &mut cur);
                }
                CharClass::Close if local > 0 => {
                    local -= 1;
                    self.close(c, &mut cur)?;
                }
                CharClass::Close => {
                    while let Some((c, CharClass::Close)) = self.peek() {
                        self.close(c, &mut cur)?;
                    }
                    // `(a + b) = c` goes on past the closing bracket
                    match self.peek() {
                        Some((_, CharClass::Relation | CharClass::Open)) => continue,
                        Some((_, CharClass::Space))
                            if matches!(
                                self.next_solid(),
                                Some(CharClass::Relation | CharClass::Open)
                            ) =>
                        {
                            continue;
                        }
                        Some((c, CharClass::Operator)) if scoped && self.operators.is_unary(c) => {
                            continue;
                        }
                        _ => break,
                    }
                }
                CharClass::Operator if local > 0 || (scoped && self.operators.is_unary(c)) => {
                    push_char(&mut cur, c, Style::Operator);
                    self.pos += 1;
                }
                CharClass::Space
                    if local > 0
                        || matches!(
                            self.next_solid(),
                            Some(CharClass::Relation | CharClass::Open)
                        ) =>
                {
                    push_char(&mut cur, c, Style::Plain);
                    self.pos += 1;
                }
                CharClass::Operator | CharClass::Space => break,
            }
        }
        if !cur.is_empty() {
            self.items.push(TableHeadItem::value(cur));
        }
        Ok(())
    }
}

fn push_char(runs: &mut Vec<TextRun>, c: char, style: Style) {
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push(c),
        _ => runs.push(TextRun::new(c.to_string(), style)),
    }
}

/// Segment `text` into header items.
///
/// ```
/// use hylogic::head::head_items;
/// use hylogic::language::OperatorSet;
/// use hylogic::symbol::Brackets;
///
/// let ops = OperatorSet::new(['~'], ['∧', '→']);
/// let items = head_items("(P∧Q)", &ops, &[Brackets::ROUND]).unwrap();
/// let texts: Vec<_> = items.iter().map(|i| i.text()).collect();
/// assert_eq!(texts, ["(P", " ∧ ", "Q)"]);
/// assert!(head_items("P)", &ops, &[Brackets::ROUND]).is_err());
/// ```
pub fn head_items(
    text: &str,
    operators: &OperatorSet,
    brackets: &[Brackets],
) -> Result<Vec<TableHeadItem>, LayoutError> {
    let items = HeadScanner::new(text, operators, brackets).run()?;
    log::trace!("`{text}` segmented into {} head item(s)", items.len());
    Ok(items)
}

/// [`head_items`] with the operators and brackets of `language`.
pub fn language_head_items(
    language: &Language,
    text: &str,
) -> Result<Vec<TableHeadItem>, LayoutError> {
    head_items(text, &language.operator_set(), &language.brackets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(s: &str) -> Vec<String> {
        language_head_items(&Language::predicate(), s)
            .unwrap()
            .iter()
            .map(TableHeadItem::text)
            .collect()
    }

    #[test]
    fn operator_prefix_after_open_bracket() {
        assert_eq!(texts("((~P ∧ Q) → R)"), ["((~", "P", " ∧ ", "Q)", " → ", "R)"]);
    }

    #[test]
    fn nested_groups_stay_in_one_item() {
        assert_eq!(texts("∀x(Fx → Gx)"), ["∀x(Fx → Gx)"]);
        assert_eq!(texts("(∀x < a)Fx"), ["(∀x < a)Fx"]);
        assert_eq!(texts("a ≠ f(b, c)"), ["a ≠ f(b, c)"]);
    }

    #[test]
    fn quantifier_scope_keeps_unary_operators() {
        assert_eq!(texts("∀x~Fx → ~Ga"), ["∀x~Fx", " → ", "~", "Ga"]);
        assert_eq!(texts("(∀x: Fx)~Gx"), ["(∀x: Fx)~Gx"]);
    }

    #[test]
    fn deep_nesting_cycles_bracket_colors() {
        let text = format!("{}P{}", "(".repeat(300), ")".repeat(300));
        let items = head_items(&text, &OperatorSet::new(['~'], ['∧']), &[Brackets::ROUND]).unwrap();
        assert_eq!(items.len(), 1);
        let styles: Vec<Style> = items[0].runs.iter().map(|r| r.style).collect();
        assert_eq!(styles[0], Style::Bracket(0));
        assert!(styles.iter().all(|s| matches!(s, Style::Bracket(d) if *d < 6) || *s == Style::Plain));
    }

    #[test]
    fn close_position_is_reported() {
        let err = language_head_items(&Language::sentential(), "(P))").unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnexpectedCloseBracket {
                text: "(P))".to_string(),
                position: 3
            }
        );
    }
}
