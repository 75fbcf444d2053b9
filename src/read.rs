use csv::{Reader, StringRecordsIntoIter};
use tracing::debug;

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::{
    amount::{parse_amount, Amount},
    error::{Error, Result},
};

/// The column holding the values to total.
pub const AMOUNT_COLUMN: &str = "amount";

/// The raw text of one row's `amount` cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawAmount {
    /// Empty if the cell is blank or the row stops short of the column.
    pub text: String,
    /// Line number in the file, counting the header as line 1.
    pub line: usize,
}

/// Iterator over the `amount` cells of one CSV file, created by
/// [`read_amounts`]. The file is closed when this is dropped.
pub struct AmountRows {
    path: PathBuf,
    column: usize,
    records: std::iter::Enumerate<StringRecordsIntoIter<File>>,
}

/// Opens the CSV file at `path` and checks its header for an `amount`
/// column.
///
/// Other columns are ignored. Rows may have fewer fields than the header.
///
/// # Errors
///
/// Returns [`Error::Csv`] if the file cannot be opened or its header read,
/// and [`Error::MissingColumn`] if the header has no `amount` column. The
/// iterator yields [`Error::Csv`] for any row that is not valid CSV.
pub fn read_amounts(path: impl AsRef<Path>) -> Result<AmountRows> {
    let path = path.as_ref();
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let column = amount_column(&mut rdr)
        .map_err(csv_err)?
        .ok_or_else(|| Error::MissingColumn(path.to_path_buf()))?;
    Ok(AmountRows {
        path: path.to_path_buf(),
        column,
        records: rdr.into_records().enumerate(),
    })
}

fn amount_column(rdr: &mut Reader<File>) -> csv::Result<Option<usize>> {
    Ok(rdr.headers()?.iter().position(|h| h == AMOUNT_COLUMN))
}

impl Iterator for AmountRows {
    type Item = Result<RawAmount>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, record) = self.records.next()?;
        // The header is line 1.
        let line = index + 2;
        Some(
            record
                .map(|record| RawAmount {
                    text: record.get(self.column).unwrap_or_default().to_string(),
                    line,
                })
                .map_err(|source| Error::Csv {
                    path: self.path.clone(),
                    source,
                }),
        )
    }
}

/// The sum of one file's amounts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileTotal {
    pub path: PathBuf,
    pub total: Amount,
}

/// Adds up every amount in the CSV file at `path`.
///
/// A file with a header and no rows totals zero.
///
/// # Errors
///
/// Returns any error from [`read_amounts`], and fails on the first row
/// whose amount is blank ([`Error::MissingValue`]) or malformed
/// ([`Error::InvalidAmount`]).
pub fn total_file(path: impl AsRef<Path>) -> Result<FileTotal> {
    let path = path.as_ref();
    let mut total = Amount::ZERO;
    for raw in read_amounts(path)? {
        let raw = raw?;
        let amount = parse_amount(&raw.text, path, raw.line)?;
        total = total
            .checked_add(amount)
            .ok_or_else(|| Error::Overflow(path.to_path_buf()))?;
    }
    debug!(path = %path.display(), subtotal = %total.value(), "summed file");
    Ok(FileTotal {
        path: path.to_path_buf(),
        total,
    })
}
