use crate::domain::product::Product;
use crate::error::{OrderError, Result};
use std::io::Read;

/// Reads the product catalog from a CSV source
/// (`id,name,price,stock,category`).
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Product>`,
/// trimming whitespace and tolerating missing trailing fields.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes products.
    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(OrderError::from))
    }
}
