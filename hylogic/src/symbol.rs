//! Atomic lexical units of an object language.
//!
//! Role
//! - A [`Symbol`] is the display text of a sentence letter, relation, term
//!   symbol, operator glyph or metavariable, tagged with the [`SymbolClass`]
//!   the lexer assigned to it.
//! - Equality and hashing only look at the text: the same glyph used as a
//!   sentence letter and as a relation symbol compares equal, the enclosing
//!   expression node is what tells them apart.
//!
//! Symbols are immutable and cheap to clone (the text is reference counted).
//! [`Symbol::fresh`] produces a copy that does not share storage with the
//! original, which is what pattern instantiation uses to build trees that are
//! independent from the parsed schema.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIs};

/// Lexical class of a [`Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Display)]
pub enum SymbolClass {
    /// Uppercase letter used without arguments.
    SentenceLetter,
    /// Uppercase letter followed by terms.
    Relation,
    /// Relation written between two terms (`=`, `<`, ...).
    InfixRelation,
    Constant,
    Variable,
    Function,
    /// Function written between two terms (`+`, `×`, ...).
    InfixFunction,
    Connective,
    Quantifier,
    /// Separator of a restricted quantifier (`:`).
    Divider,
    FormulaMeta,
    TermMeta,
    /// Metavariable ranging over object-language variables only.
    VariableMeta,
    AnyMeta,
}

/// A single symbol of an object language.
#[derive(Clone)]
pub struct Symbol {
    text: Arc<str>,
    class: SymbolClass,
}

impl Symbol {
    /// Create a symbol from its display text.
    pub fn new(text: impl Into<Arc<str>>, class: SymbolClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }

    /// Display text of the symbol.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lexical class assigned when the symbol was created.
    #[inline]
    pub fn class(&self) -> SymbolClass {
        self.class
    }

    /// Same symbol re-tagged with another class.
    pub fn with_class(&self, class: SymbolClass) -> Self {
        Self {
            text: self.text.clone(),
            class,
        }
    }

    /// Copy of this symbol backed by its own storage.
    pub fn fresh(&self) -> Self {
        Self {
            text: Arc::from(&*self.text),
            class: self.class,
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.class, &*self.text)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A matching pair of bracket characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Brackets {
    pub open: char,
    pub close: char,
}

impl Brackets {
    /// `(` and `)`, used whenever a compound has to be bracketed and carries no pair of its own.
    pub const ROUND: Brackets = Brackets::new('(', ')');
    pub const SQUARE: Brackets = Brackets::new('[', ']');
    pub const CURLY: Brackets = Brackets::new('{', '}');

    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

impl Default for Brackets {
    fn default() -> Self {
        Self::ROUND
    }
}

/// Wrapper for presentation-only data carried by expression nodes.
///
/// Always compares equal and hashes to nothing, so nodes can derive
/// `PartialEq`/`Hash` while brackets, negated-display flags and transform
/// layout stay out of structural equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout<T>(pub T);

impl<T> PartialEq for Layout<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for Layout<T> {}

impl<T> Hash for Layout<T> {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl<T> std::ops::Deref for Layout<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}
