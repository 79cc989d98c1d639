use crate::domain::transaction::Transaction;
use crate::error::Result;
use std::io::Write;

/// Writes a settlement report as CSV
/// (`id,user_id,destination_number,total_price,status,serial_number`).
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_report(&mut self, transactions: &[Transaction]) -> Result<()> {
        self.writer.write_record([
            "id",
            "user_id",
            "destination_number",
            "total_price",
            "status",
            "serial_number",
        ])?;

        for tx in transactions {
            self.writer.write_record([
                tx.id.to_string(),
                tx.user_id.to_string(),
                tx.destination_number.clone(),
                tx.total_price.to_string(),
                tx.status.to_string(),
                tx.serial_number.clone().unwrap_or_default(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
