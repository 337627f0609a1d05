use strum::{Display, EnumIs, EnumTryAs};
use thiserror::Error;

use crate::expr::pretty::Rendering;
use crate::session::MetaFamily;
use crate::symbol::Symbol;

/// Formula text that is not a well-formed expression of its language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("cannot parse `{text}`: {}", .messages.join("; "))]
pub struct ParseError {
    pub text: String,
    pub messages: Vec<String>,
}

/// Which list of a truth-table setup an operand belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OperandRole {
    #[strum(to_string = "basic formula")]
    Basic,
    #[strum(to_string = "main formula")]
    Main,
}

/// Problems with a truth-table setup. Evaluation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum SetupError {
    #[error("no basic formula was declared")]
    NoBasicFormula,

    /// A declared basic formula is blank. Positions start at 1.
    #[error("basic formula #{position} is empty")]
    EmptyBasicFormula { position: usize },

    /// Operand text does not parse to exactly one sentence.
    #[error("{role} #{position} `{text}` is not a sentence: {reason}")]
    MalformedOperand {
        role: OperandRole,
        position: usize,
        text: String,
        reason: String,
    },

    /// Basic formulas must be listed in strict ascending order of their text.
    #[error("basic formulas must be in ascending order, but `{previous}` comes before `{next}`")]
    SetupOrderViolation { previous: Rendering, next: Rendering },

    /// The declared row count is not positive or is not 2^n.
    #[error("{basic_count} basic formula(s) need {expected} rows, but {declared} were declared")]
    RowCountMismatch {
        declared: usize,
        expected: usize,
        basic_count: usize,
    },

    /// The table would have more rows than the configured limit.
    #[error("a table with {rows} rows exceeds the limit of {limit} rows")]
    RowLimitExceeded { rows: usize, limit: usize },

    /// A main formula bottoms out on a basic subformula that was not declared.
    #[error("`{subformula}` in main formula `{formula}` (column {column}) is not a declared basic formula")]
    UndeclaredBasicDependency {
        formula: Rendering,
        subformula: Rendering,
        column: usize,
    },

    /// The value columns of a main formula do not line up with its header.
    #[error("`{formula}` has {columns} value column(s) but its header has {head_items}")]
    LayoutMismatch {
        formula: Rendering,
        columns: usize,
        head_items: usize,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Failures of one matching attempt. The session stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum MatchError {
    /// A metavariable is already bound to a different expression.
    #[error("`{variable}` is already matched to `{existing}` and cannot also match `{attempted}`")]
    VariableConflict {
        variable: Rendering,
        existing: Rendering,
        attempted: Rendering,
    },

    /// A schematic expression mentions metavariables that are not bound yet.
    #[error("`{pattern}` cannot be matched before `{dependency}` is resolved")]
    UnresolvedDependency { pattern: Rendering, dependency: Symbol },

    /// Pattern and concrete expression differ outside any metavariable.
    #[error("`{concrete}` does not have the shape of `{pattern}`")]
    ShapeMismatch { pattern: Rendering, concrete: Rendering },

    /// A metavariable was offered an expression of the wrong kind.
    #[error("`{variable}` ranges over {family} expressions and cannot match `{found}`")]
    KindMismatch {
        variable: Symbol,
        family: MetaFamily,
        found: Rendering,
    },
}

/// Failures while segmenting header text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum LayoutError {
    #[error("unexpected close bracket at position {position} in `{text}`")]
    UnexpectedCloseBracket { text: String, position: usize },
}

/// A user-entered table disagrees with the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum ValidationError {
    /// The table does not have the dimensions of the key.
    #[error("expected {expected_columns} columns of {expected_rows} rows, got {columns} columns of {rows} rows")]
    TableShape {
        columns: usize,
        rows: usize,
        expected_columns: usize,
        expected_rows: usize,
    },

    /// Columns holding at least one wrong value. Cells are not reported.
    #[error("column(s) {columns:?} contain wrong values")]
    ColumnValueMismatch { columns: Vec<usize> },

    /// Exactly the main-formula columns must be highlighted.
    #[error("highlighting is wrong: missing {missing:?}, unexpected {unexpected:?}")]
    HighlightPolicyViolation {
        missing: Vec<usize>,
        unexpected: Vec<usize>,
    },
}

#[derive(Debug, EnumIs, Error)]
pub enum ConfigError {
    #[error("cannot read configuration `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown object language `{0}`")]
    UnknownLanguage(String),

    #[error("language `{language}`: glyph `{glyph}` is used both as {first} and as {second}")]
    OverlappingGlyph {
        language: String,
        glyph: char,
        first: &'static str,
        second: &'static str,
    },

    #[error("language `{language}`: glyph `{glyph}` ({class}) is reserved")]
    ReservedGlyph {
        language: String,
        glyph: char,
        class: &'static str,
    },
}

#[derive(Debug, EnumIs, EnumTryAs, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
