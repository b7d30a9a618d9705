//! Load payment records from CSV

use super::Payment;
use crate::calendar::MonthDate;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row: `date,entity,payee,program,amount`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: String,
    entity: String,
    #[serde(default)]
    payee: String,
    #[serde(default)]
    program: String,
    #[serde(default)]
    amount: String,
}

impl CsvRow {
    fn to_payment(self) -> Result<Payment, Box<dyn Error>> {
        let date = MonthDate::parse_date(&self.date)?;
        // An empty program cell means the payment carries no cadence label
        let program = if self.program.is_empty() {
            None
        } else {
            Some(self.program)
        };

        Ok(Payment {
            date,
            entity: self.entity,
            payee: self.payee,
            program,
            amount: self.amount,
        })
    }
}

/// Load all payments from a CSV file
pub fn load_payments<P: AsRef<Path>>(path: P) -> Result<Vec<Payment>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut payments = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        payments.push(row.to_payment()?);
    }

    Ok(payments)
}

/// Load payments from any reader (e.g., string buffer, network stream)
pub fn load_payments_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<Payment>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut payments = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        payments.push(row.to_payment()?);
    }

    Ok(payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::Cadence;

    #[test]
    fn test_load_from_reader() {
        let csv = "\
date,entity,payee,program,amount
2024-01-10,alice,Main Fund,Membership:Monthly,25.00
2024-02-15,bob,Main Fund,,100.00
";
        let payments = load_payments_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(payments.len(), 2);

        assert_eq!(payments[0].entity, "alice");
        assert_eq!(payments[0].date, MonthDate::new(2024, 1, 10));
        assert_eq!(payments[0].program.as_deref(), Some("Membership:Monthly"));
        assert_eq!(
            Cadence::from_label(payments[0].program.as_deref().unwrap()),
            Cadence::Monthly
        );

        // Empty program cell becomes None
        assert_eq!(payments[1].program, None);
        assert_eq!(payments[1].amount, "100.00");
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let csv = "\
date,entity,payee,program,amount
2024-13-40,alice,Main Fund,Membership:Monthly,25.00
";
        assert!(load_payments_from_reader(csv.as_bytes()).is_err());
    }
}
