//! Core traits for row export and inspection.
//!
//! Defines the [`RowSink`] and [`RowSource`] traits that row format adapters
//! implement.

use crate::Result;
use crate::models::FinalDream;

/// Sink for exported rows.
///
/// # Lifecycle
///
/// 1. Create sink with output destination
/// 2. Call `write()` for each dream
/// 3. Call `finalize()` to complete the export
pub trait RowSink {
    /// Writes a single dream as one row.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or I/O fails.
    fn write(&mut self, dream: &FinalDream) -> Result<()>;

    /// Flushes buffered rows.
    ///
    /// This method consumes the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O fails.
    fn finalize(self: Box<Self>) -> Result<()>;
}

/// Source of previously exported rows.
pub trait RowSource {
    /// Reads the next row.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be parsed or I/O fails.
    fn next(&mut self) -> Result<Option<FinalDream>>;
}

/// Collects rows in memory.
impl RowSink for Vec<FinalDream> {
    fn write(&mut self, dream: &FinalDream) -> Result<()> {
        self.push(dream.clone());
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<FinalDream> = Vec::new();
        sink.write(&FinalDream {
            title: "a".to_string(),
            ..Default::default()
        })
        .unwrap();
        sink.write(&FinalDream::default()).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].title, "a");
    }
}
