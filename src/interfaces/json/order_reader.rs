use crate::domain::transaction::OrderRequest;
use crate::error::{OrderError, Result};
use std::io::Read;

/// Reads order requests from a stream of JSON values, one object per line.
pub struct OrderReader<R: Read> {
    source: R,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and deserializes order requests.
    pub fn requests(self) -> impl Iterator<Item = Result<OrderRequest>> {
        serde_json::Deserializer::from_reader(self.source)
            .into_iter::<OrderRequest>()
            .map(|result| result.map_err(OrderError::from))
    }
}
