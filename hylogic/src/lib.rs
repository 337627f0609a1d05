//! Hylogic: a symbolic formula engine for logic exercises.
//!
//! The crate reads formula text of a configurable object language, builds a
//! typed expression tree, matches worked formulas against schematic patterns
//! and evaluates truth tables whose user-entered values it then checks.
//!
//! Pipeline
//!  - [`parser::FormulaParser`] turns text into [`expr::Expr`] trees (formulas
//!    and terms). Equality is structural; presentation details such as bracket
//!    shapes or substitution notation never take part in it.
//!  - [`session::MatchSession`] binds metavariables while walking a pattern
//!    against a concrete expression and instantiates patterns from the
//!    bindings. Each session owns its bindings.
//!  - [`head`] segments formula text into truth-table header items.
//!  - [`truth::TruthTableSetup`] checks a table setup and computes the key,
//!    [`validate::validate_table`] compares a user table with it.
//!  - Every error converts into a [`diagnostic::Diagnostic`] for display.
//!
//! Example
//! ```
//! use hylogic::prelude::*;
//!
//! let lang = Language::sentential();
//! let parser = FormulaParser::new(&lang);
//!
//! // (α → β) matched against a concrete conditional
//! let pattern = parser.parse_formula("(α → β)").unwrap();
//! let worked = parser.parse_formula("(~P → (Q ∧ R))").unwrap();
//! let mut session = MatchSession::new();
//! session.match_formula(&pattern, &worked).unwrap();
//! let alpha = session.instance(MetaFamily::Formula, &Symbol::new("α", SymbolClass::FormulaMeta));
//! assert_eq!(session.get_match(&alpha).unwrap().to_string(), "~P");
//!
//! // truth table of the worked formula
//! let table = TruthTableSetup::new(&lang)
//!     .basic(["P", "Q", "R"])
//!     .main(["(~P → (Q ∧ R))"])
//!     .build()
//!     .unwrap();
//! assert_eq!(table.rows(), 8);
//! let user = UserTable::from_table(&table);
//! assert!(validate_table(&table, &user, &ValidatorOptions::default()).is_ok());
//! ```

/// Engine configuration loaded from TOML.
pub mod config;
/// Human-readable reports for every error of the crate.
pub mod diagnostic;
/// Error types, one enum per error class.
pub mod error;
/// Expression tree: formulas, terms, operators and rendering.
pub mod expr;
/// Segmentation of formula text into truth-table header items.
pub mod head;
/// Object languages and their registry.
pub mod language;
/// Parser for formula and term text.
pub mod parser;
/// Metavariable bindings and pattern matching.
pub mod session;
/// Symbols and presentation-only wrappers.
pub mod symbol;
/// Truth-table evaluation.
pub mod truth;
/// Checking user-entered truth tables.
pub mod validate;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - Languages, configuration and the parser
    //! - Expression types with the `Expression` and `PrettyExpr` traits
    //! - Matching sessions
    //! - Truth tables, validation and diagnostics
    pub use crate::config::EngineConfig;
    pub use crate::diagnostic::Diagnostic;
    pub use crate::error::{
        ConfigError, Error, LayoutError, MatchError, ParseError, SetupError, ValidationError,
    };
    pub use crate::expr::{
        BinaryConnective, Expr, ExprRef, Expression, Formula, FormulaKind, Quantifier, Term,
        TermKind, pretty::PrettyExpr, variant::ExprType,
    };
    pub use crate::head::{TableHeadItem, head_items, language_head_items};
    pub use crate::language::{Language, Languages, OperatorSet};
    pub use crate::parser::FormulaParser;
    pub use crate::session::{MatchSession, MetaFamily, MetaVariable};
    pub use crate::symbol::{Brackets, Symbol, SymbolClass};
    pub use crate::truth::{TruthKey, TruthTable, TruthTableSetup, TruthValue};
    pub use crate::validate::{AttemptOutcome, Attempts, UserTable, ValidatorOptions, validate_table};
}
