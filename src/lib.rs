#![doc = include_str!("../README.md")]
use tracing::info;

use std::path::{Path, PathBuf};

mod amount;
mod error;
mod locate;
mod pattern;
mod read;

pub use amount::{format_currency, parse_amount, quantize, Amount, ParseAmountError};
pub use error::{Error, Result};
pub use locate::{find_files, Files};
pub use pattern::Pattern;
pub use read::{read_amounts, total_file, AmountRows, FileTotal, RawAmount, AMOUNT_COLUMN};

/// The default glob pattern for selecting files.
pub const DEFAULT_PATTERN: &str = "*.csv";

/// The result of totalling a data directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Totals {
    /// The exact sum of every amount in every matched file.
    pub total: Amount,
    /// How many files were summed.
    pub files: usize,
}

/// Sums the `amount` column of every file under `root` matching `pattern`.
///
/// Files are found recursively (see [`Pattern`] for the matching rules) and
/// read in sorted path order. Each file is subtotalled with [`total_file`],
/// then the subtotals are added together.
///
/// # Errors
///
/// Returns [`Error::NoMatchingFiles`] if nothing under `root` matches, and
/// otherwise the first error from compiling `pattern`, from [`find_files`],
/// or from [`total_file`] for any file. No partial total is ever returned.
pub fn calculate_total(root: impl AsRef<Path>, pattern: &str) -> Result<Totals> {
    let root = root.as_ref();
    let pattern = Pattern::new(pattern)?;
    let paths: Vec<PathBuf> = find_files(root, &pattern)?.collect::<Result<_>>()?;
    if paths.is_empty() {
        return Err(Error::NoMatchingFiles {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
        });
    }

    let mut total = Amount::ZERO;
    for path in &paths {
        let subtotal = total_file(path)?;
        total = total
            .checked_add(subtotal.total)
            .ok_or_else(|| Error::Overflow(path.clone()))?;
    }
    info!(
        root = %root.display(),
        %pattern,
        files = paths.len(),
        total = %total.value(),
        "totalled files"
    );
    Ok(Totals {
        total,
        files: paths.len(),
    })
}
