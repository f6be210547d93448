use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::harness::ResultRow;

/// Column names of the result file. Time columns carry nanoseconds despite
/// the `_us` suffix; the names are kept for existing plotting scripts.
pub const CSV_HEADER: &str = "size,linear_us,bst_us,rbt_us,hash_us,multimap_us,collisions";

/// Destination for one result row per measured size.
pub trait ResultSink {
    fn accept(&mut self, row: &ResultRow) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ResultSink for Vec<ResultRow> {
    fn accept(&mut self, row: &ResultRow) -> Result<()> {
        self.push(*row);
        Ok(())
    }
}

pub struct CsvSink<W: Write> {
    out: W,
}

impl CsvSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create result file {}", path.display()))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps `out` and writes the header line immediately.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{CSV_HEADER}").context("failed to write result header")?;
        Ok(Self { out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn accept(&mut self, row: &ResultRow) -> Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{},{},{}",
            row.size,
            row.linear_ns,
            row.bst_ns,
            row.rbt_ns,
            row.hash_ns,
            row.map_ns,
            row.collisions
        )
        .with_context(|| format!("failed to write result row for size {}", row.size))
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush result file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows_in_column_order() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.accept(&ResultRow {
            size: 100,
            linear_ns: 1,
            bst_ns: 2,
            rbt_ns: 3,
            hash_ns: 4,
            map_ns: 5,
            collisions: 6,
        })
        .unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "size,linear_us,bst_us,rbt_us,hash_us,multimap_us,collisions\n100,1,2,3,4,5,6\n"
        );
    }

    #[test]
    fn header_only_when_no_rows() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.into_inner(), format!("{CSV_HEADER}\n").into_bytes());
    }
}
