//! Human-readable reports for the engine's errors.
//!
//! A [`Diagnostic`] is a short title plus styled fragments. Expressions keep
//! their own styling inside the fragments, so a caller can show them in a
//! modal alert or print them to a terminal with [`Diagnostic::write_to`].
use std::fmt;
use std::io::{self, Write};

use termcolor::{ColorSpec, WriteColor};

use crate::error::{
    ConfigError, Error, LayoutError, MatchError, ParseError, SetupError, ValidationError,
};
use crate::expr::pretty::{Rendering, Style, TextRun, plain_text, write_runs};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub title: String,
    pub fragments: Vec<TextRun>,
}

impl Diagnostic {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fragments: Vec::new(),
        }
    }

    /// Append unstyled text.
    pub fn text(mut self, s: impl Into<String>) -> Self {
        self.fragments.push(TextRun::plain(s));
        self
    }

    /// Append the styled rendering of an expression.
    pub fn expr(mut self, rendering: &Rendering) -> Self {
        self.fragments.extend(rendering.runs.iter().cloned());
        self
    }

    fn code(mut self, s: impl Into<String>) -> Self {
        self.fragments.push(TextRun::new(s, Style::Term));
        self
    }

    /// Body without styling.
    pub fn message(&self) -> String {
        plain_text(&self.fragments)
    }

    pub fn write_to<W: WriteColor + Write>(&self, out: &mut W) -> io::Result<()> {
        let mut title = ColorSpec::new();
        title.set_bold(true);
        out.set_color(&title)?;
        write!(out, "{}", self.title)?;
        out.reset()?;
        write!(out, ": ")?;
        write_runs(&self.fragments, out)?;
        writeln!(out)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message())
    }
}

fn columns_list(columns: &[usize]) -> String {
    columns
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&ParseError> for Diagnostic {
    fn from(e: &ParseError) -> Self {
        Diagnostic::new("Not a well-formed expression")
            .code(e.text.clone())
            .text(format!(": {}", e.messages.join("; ")))
    }
}

impl From<&SetupError> for Diagnostic {
    fn from(e: &SetupError) -> Self {
        let d = Diagnostic::new("Invalid truth table");
        match e {
            SetupError::NoBasicFormula => d.text("declare at least one basic formula"),
            SetupError::EmptyBasicFormula { position } => {
                d.text(format!("basic formula #{position} is empty"))
            }
            SetupError::MalformedOperand {
                role,
                position,
                text,
                reason,
            } => d
                .text(format!("{role} #{position} "))
                .code(text.clone())
                .text(format!(" is not a sentence: {reason}")),
            SetupError::SetupOrderViolation { previous, next } => d
                .text("basic formulas must be in alphanumeric order, but ")
                .expr(previous)
                .text(" is listed before ")
                .expr(next),
            SetupError::RowCountMismatch {
                declared,
                expected,
                basic_count,
            } => d.text(format!(
                "{basic_count} basic formula(s) need {expected} rows, not {declared}"
            )),
            SetupError::RowLimitExceeded { rows, limit } => {
                d.text(format!("{rows} rows are more than the limit of {limit}"))
            }
            SetupError::UndeclaredBasicDependency {
                formula,
                subformula,
                column,
            } => d
                .expr(subformula)
                .text(" in ")
                .expr(formula)
                .text(format!(" (column {column}) is not a declared basic formula")),
            SetupError::LayoutMismatch {
                formula,
                columns,
                head_items,
            } => d.expr(formula).text(format!(
                " needs {columns} column(s) but its header has {head_items}"
            )),
            SetupError::Layout(e) => Diagnostic::from(e),
        }
    }
}

impl From<&MatchError> for Diagnostic {
    fn from(e: &MatchError) -> Self {
        let d = Diagnostic::new("Does not match");
        match e {
            MatchError::VariableConflict {
                variable,
                existing,
                attempted,
            } => d
                .expr(variable)
                .text(" is already ")
                .expr(existing)
                .text(" and cannot also be ")
                .expr(attempted),
            MatchError::UnresolvedDependency {
                pattern,
                dependency,
            } => d
                .expr(pattern)
                .text(" cannot be matched before ")
                .code(dependency.to_string())
                .text(" is known"),
            MatchError::ShapeMismatch { pattern, concrete } => d
                .expr(concrete)
                .text(" does not have the form ")
                .expr(pattern),
            MatchError::KindMismatch {
                variable,
                family,
                found,
            } => d
                .code(variable.to_string())
                .text(format!(" stands for a {family}, not for "))
                .expr(found),
        }
    }
}

impl From<&LayoutError> for Diagnostic {
    fn from(e: &LayoutError) -> Self {
        match e {
            LayoutError::UnexpectedCloseBracket { text, position } => {
                Diagnostic::new("Unbalanced brackets")
                    .text(format!("unexpected close bracket at position {position} in "))
                    .code(text.clone())
            }
        }
    }
}

impl From<&ValidationError> for Diagnostic {
    fn from(e: &ValidationError) -> Self {
        let d = Diagnostic::new("Table not correct");
        match e {
            ValidationError::TableShape {
                columns,
                rows,
                expected_columns,
                expected_rows,
            } => d.text(format!(
                "the table has {columns} column(s) of {rows} row(s), \
                 {expected_columns} column(s) of {expected_rows} row(s) are needed"
            )),
            ValidationError::ColumnValueMismatch { columns } => d.text(format!(
                "column(s) {} contain wrong values",
                columns_list(columns)
            )),
            ValidationError::HighlightPolicyViolation {
                missing,
                unexpected,
            } => {
                let mut d = d.text("highlight exactly the main-formula columns");
                if !missing.is_empty() {
                    d = d.text(format!("; not highlighted: {}", columns_list(missing)));
                }
                if !unexpected.is_empty() {
                    d = d.text(format!("; wrongly highlighted: {}", columns_list(unexpected)));
                }
                d
            }
        }
    }
}

impl From<&ConfigError> for Diagnostic {
    fn from(e: &ConfigError) -> Self {
        Diagnostic::new("Configuration error").text(e.to_string())
    }
}

impl From<&Error> for Diagnostic {
    fn from(e: &Error) -> Self {
        match e {
            Error::Parse(e) => e.into(),
            Error::Setup(e) => e.into(),
            Error::Match(e) => e.into(),
            Error::Layout(e) => e.into(),
            Error::Validation(e) => e.into(),
            Error::Config(e) => e.into(),
        }
    }
}
