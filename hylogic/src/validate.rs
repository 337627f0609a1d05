//! Comparison of a user-entered truth table with the computed key.
//!
//! Values are checked column by column, case-insensitively. A wrong column
//! is reported as a whole, never the offending cells. Highlighting must mark
//! exactly the columns holding the value of a whole main formula.
use either::Either;
use strum::EnumIs;

use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::truth::{TruthTable, TruthValue};

/// What the user typed into the table, indexed `[column][row]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTable {
    pub values: Vec<Vec<String>>,
    pub highlighted: Vec<bool>,
}

impl UserTable {
    pub fn new(values: Vec<Vec<String>>, highlighted: Vec<bool>) -> Self {
        Self { values, highlighted }
    }

    /// The table a user would enter by copying the key exactly.
    pub fn from_table(table: &TruthTable) -> Self {
        let key = table.key();
        let values = (0..key.column_count())
            .map(|c| match key.column(c) {
                Some(vs) => vs.iter().map(|v| v.as_str().to_string()).collect(),
                None => vec![String::new(); key.rows()],
            })
            .collect();
        Self {
            values,
            highlighted: table.highlight().to_vec(),
        }
    }

    fn is_highlighted(&self, column: usize) -> bool {
        self.highlighted.get(column).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Do not check the values of the basic-formula columns.
    pub skip_basic_columns: bool,
}

impl From<&EngineConfig> for ValidatorOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            skip_basic_columns: config.skip_basic_columns,
        }
    }
}

/// Check `user` against the key of `table`; the first failing check is reported.
pub fn validate_table(
    table: &TruthTable,
    user: &UserTable,
    options: &ValidatorOptions,
) -> Result<(), ValidationError> {
    let key = table.key();
    let rows = user.values.first().map_or(0, Vec::len);
    let ragged = user.values.iter().any(|c| c.len() != key.rows());
    if user.values.len() != key.column_count() || ragged {
        return Err(ValidationError::TableShape {
            columns: user.values.len(),
            rows,
            expected_columns: key.column_count(),
            expected_rows: key.rows(),
        });
    }

    let checked = if options.skip_basic_columns {
        Either::Left((0..key.column_count()).filter(|&c| !table.basic_columns()[c]))
    } else {
        Either::Right(0..key.column_count())
    };
    let columns: Vec<usize> = checked
        .filter(|&c| match key.column(c) {
            Some(expected) => expected
                .iter()
                .zip(&user.values[c])
                .any(|(v, cell)| TruthValue::parse(cell) != Some(*v)),
            None => false,
        })
        .collect();
    if !columns.is_empty() {
        log::debug!("{} column(s) disagree with the key", columns.len());
        return Err(ValidationError::ColumnValueMismatch { columns });
    }

    let highlight = table.highlight();
    let missing: Vec<usize> = (0..highlight.len())
        .filter(|&c| highlight[c] && !user.is_highlighted(c))
        .collect();
    let unexpected: Vec<usize> = (0..highlight.len())
        .filter(|&c| !highlight[c] && user.is_highlighted(c))
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(ValidationError::HighlightPolicyViolation {
            missing,
            unexpected,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum AttemptOutcome {
    Passed,
    Retry { remaining: usize },
    Exhausted,
}

/// Bounded number of validation attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempts {
    used: usize,
    max: usize,
}

impl Attempts {
    pub fn new(max: usize) -> Self {
        Self { used: 0, max }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_attempts as usize)
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.used)
    }

    /// Count one validation result. Once exhausted every further result is
    /// `Exhausted`, passing or not.
    pub fn record(&mut self, result: &Result<(), ValidationError>) -> AttemptOutcome {
        if self.remaining() == 0 {
            return AttemptOutcome::Exhausted;
        }
        self.used += 1;
        match result {
            Ok(()) => AttemptOutcome::Passed,
            Err(_) if self.remaining() == 0 => {
                log::warn!("validation attempts exhausted after {} tries", self.used);
                AttemptOutcome::Exhausted
            }
            Err(_) => AttemptOutcome::Retry {
                remaining: self.remaining(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_run_out() {
        let failed = Err(ValidationError::ColumnValueMismatch { columns: vec![0] });
        let mut attempts = Attempts::new(2);
        assert_eq!(attempts.record(&failed), AttemptOutcome::Retry { remaining: 1 });
        assert_eq!(attempts.record(&failed), AttemptOutcome::Exhausted);
        assert_eq!(attempts.record(&Ok(())), AttemptOutcome::Exhausted);
        assert_eq!(attempts.used(), 2);
    }

    #[test]
    fn pass_on_first_try() {
        let mut attempts = Attempts::new(3);
        assert!(attempts.record(&Ok(())).is_passed());
        assert_eq!(attempts.remaining(), 2);
    }
}
