//! In-memory payment store backing the status engine
//!
//! The engine consumes an ordered slice of one supporter's payments; this
//! store is the query collaborator that produces those slices from a flat
//! payment file.

use super::{loader, Cadence, Payment};
use crate::calendar::MonthDate;
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;

/// All loaded payments, sorted by date
///
/// Sorting is stable: payments sharing a date keep their input-file order,
/// which pins down tie-breaking for same-day payments (the engine's "last
/// payment" is then the later row in the file).
#[derive(Debug, Clone, Default)]
pub struct PaymentStore {
    payments: Vec<Payment>,
}

impl PaymentStore {
    pub fn new(mut payments: Vec<Payment>) -> Self {
        payments.sort_by_key(|p| p.date);
        Self { payments }
    }

    /// Load the store from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(loader::load_payments(path)?))
    }

    /// Load the store from any reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(loader::load_payments_from_reader(reader)?))
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Date of the earliest payment on record
    pub fn earliest_date(&self) -> Option<MonthDate> {
        self.payments.first().map(|p| p.date)
    }

    /// Distinct entities with at least one payment whose program label ends
    /// with `:<cadence>`, in order of first (earliest) qualifying payment
    ///
    /// An empty cadence list selects nothing. The match is on the literal
    /// `:`-suffixed label, so a bare `"Monthly"` program does not qualify.
    pub fn entities(&self, cadences: &[Cadence]) -> Vec<String> {
        let suffixes: Vec<String> = cadences
            .iter()
            .map(|c| format!(":{}", c.as_str()))
            .collect();

        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for payment in &self.payments {
            let matches = match payment.program.as_deref() {
                Some(program) => suffixes.iter().any(|s| program.ends_with(s.as_str())),
                None => false,
            };
            if matches && seen.insert(payment.entity.clone()) {
                entities.push(payment.entity.clone());
            }
        }
        entities
    }

    /// Distinct entities across all payments, labeled or not
    pub fn all_entities(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for payment in &self.payments {
            if seen.insert(payment.entity.clone()) {
                entities.push(payment.entity.clone());
            }
        }
        entities
    }

    /// One supporter's payments with date <= `as_of`, ascending by date
    pub fn payments_as_of(&self, entity: &str, as_of: MonthDate) -> Vec<Payment> {
        self.payments
            .iter()
            .filter(|p| p.entity == entity && p.date <= as_of)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> MonthDate {
        MonthDate::new(y, m, day)
    }

    fn sample_store() -> PaymentStore {
        PaymentStore::new(vec![
            Payment::new(d(2024, 3, 10), "alice", Some("Membership:Monthly")),
            Payment::new(d(2024, 1, 10), "alice", Some("Membership:Monthly")),
            Payment::new(d(2023, 6, 1), "bob", Some("Gift:Annual")),
            Payment::new(d(2024, 2, 20), "carol", None),
        ])
    }

    #[test]
    fn test_payments_sorted_and_cut_off() {
        let store = sample_store();
        assert_eq!(store.len(), 4);
        assert_eq!(store.earliest_date(), Some(d(2023, 6, 1)));

        let all = store.payments_as_of("alice", d(2024, 12, 31));
        assert_eq!(all.len(), 2);
        assert!(all[0].date < all[1].date);

        let early = store.payments_as_of("alice", d(2024, 1, 31));
        assert_eq!(early.len(), 1);
        assert_eq!(early[0].date, d(2024, 1, 10));
    }

    #[test]
    fn test_same_day_payments_keep_input_order() {
        let store = PaymentStore::new(vec![
            Payment::new(d(2024, 1, 10), "alice", Some("Membership:Annual")),
            Payment::new(d(2024, 1, 10), "alice", Some("Membership:Monthly")),
        ]);
        let payments = store.payments_as_of("alice", d(2024, 1, 31));
        // Stable sort: the Annual row stays first, so the "last payment"
        // (and derived cadence) comes from the later file row
        assert_eq!(payments[0].program.as_deref(), Some("Membership:Annual"));
        assert_eq!(payments[1].program.as_deref(), Some("Membership:Monthly"));
    }

    #[test]
    fn test_entity_filtering() {
        let store = sample_store();

        assert_eq!(store.entities(&[Cadence::Monthly]), vec!["alice"]);
        assert_eq!(store.entities(&[Cadence::Annual]), vec!["bob"]);
        assert_eq!(
            store.entities(&[Cadence::Annual, Cadence::Monthly]),
            vec!["bob", "alice"]
        );
        assert!(store.entities(&[]).is_empty());

        let mut all = store.all_entities();
        all.sort();
        assert_eq!(all, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_bare_label_does_not_match_suffix_filter() {
        let store = PaymentStore::new(vec![Payment::new(d(2024, 1, 1), "dave", Some("Monthly"))]);
        assert!(store.entities(&[Cadence::Monthly]).is_empty());
    }
}
