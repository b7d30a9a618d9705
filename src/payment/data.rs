//! Payment records and cadence derivation

use crate::calendar::MonthDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment frequency class, derived from the trailing token of a program label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    Monthly,
    Annual,
    /// Program label missing or carrying an unrecognized trailing token
    Unknown,
}

impl Cadence {
    /// Derive cadence from a program label such as `"Membership:Monthly"`
    ///
    /// The label is split on the last `:`; a label with no delimiter is
    /// matched whole.
    pub fn from_label(label: &str) -> Self {
        let token = label.rsplit(':').next().unwrap_or(label);
        match token {
            "Monthly" => Cadence::Monthly,
            "Annual" => Cadence::Annual,
            _ => Cadence::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Monthly => "Monthly",
            Cadence::Annual => "Annual",
            Cadence::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single payment record
///
/// `payee` and `amount` are opaque metadata carried through from the source
/// data; the engine only reads `date` and `program`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub date: MonthDate,
    pub entity: String,
    pub payee: String,
    /// Program label whose trailing token encodes the cadence; `None` when
    /// the source row had no label
    pub program: Option<String>,
    pub amount: String,
}

impl Payment {
    pub fn new(
        date: MonthDate,
        entity: impl Into<String>,
        program: Option<&str>,
    ) -> Self {
        Self {
            date,
            entity: entity.into(),
            payee: String::new(),
            program: program.map(str::to_string),
            amount: String::new(),
        }
    }
}

/// Derive a supporter's cadence from their payment history
///
/// Scans backward for the most recent payment carrying a program label, so a
/// supporter who switched programs is classified by their latest labeled
/// payment. Re-derived per query, never cached on the supporter.
pub fn cadence_of(payments: &[Payment]) -> Cadence {
    payments
        .iter()
        .rev()
        .find_map(|p| p.program.as_deref())
        .map(Cadence::from_label)
        .unwrap_or(Cadence::Unknown)
}
