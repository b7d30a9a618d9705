//! Payment records, cadence derivation, and the CSV-backed payment store

mod data;
pub mod loader;
mod store;

pub use data::{cadence_of, Cadence, Payment};
pub use store::PaymentStore;
