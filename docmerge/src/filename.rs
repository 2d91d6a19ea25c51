//! Filename indexing for numbered input documents.
//!
//! Input files are named `<name><digits>.<ext>`, e.g. `intro1.docx` or
//! `appendix10.docx`. The trailing digit run of the base name supplies the
//! merge order, so `intro2.docx` sorts before `appendix10.docx` (2 < 10)
//! even though lexicographic order would say otherwise.
//!
//! Eligibility requires both a matching extension (case-insensitive) and a
//! non-empty trailing digit run. A name with digits only in the middle
//! (`3report.docx`) is not eligible. The base name ends at the first dot,
//! so `a.b2.docx` has base name `a` and is not eligible either.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Error extracting an ordering index from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The base name has no trailing decimal digits.
    NoTrailingDigits,
    /// The trailing digit run does not fit in the index type.
    IndexOverflow(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NoTrailingDigits => write!(f, "Base name has no trailing digits"),
            ParseError::IndexOverflow(s) => write!(f, "Index out of range: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// A candidate file paired with its parsed ordering index.
///
/// Created once per directory scan; ordering is ascending by `index`, with
/// ties left in enumeration order by a stable sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    /// Full path to the input file.
    pub path: PathBuf,
    /// Ordering key parsed from the trailing digits of the base name.
    pub index: u64,
}

impl IndexedFile {
    /// Create a new indexed file.
    pub fn new(path: impl Into<PathBuf>, index: u64) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }
}

/// Maximal run of decimal digits at the end of a base name.
fn trailing_digits_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)$").unwrap())
}

/// Check whether a path is an eligible merge input.
///
/// Eligibility requires:
/// - the extension matches `extension` (case-insensitive), and
/// - the base name (extension stripped) ends in at least one decimal digit
///   whose maximal trailing run parses as a non-negative integer.
pub fn is_eligible(path: &Path, extension: &str) -> bool {
    let extension_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));

    extension_matches && extract_index(path).is_ok()
}

/// Extract the ordering index from the trailing digits of a base name.
///
/// The base name is everything before the first dot of the filename. The
/// index is the maximal suffix of the base name consisting only of decimal
/// digits, parsed as a non-negative integer. Leading zeros are numeric:
/// `file007.docx` yields 7.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docmerge::filename::extract_index;
///
/// assert_eq!(extract_index(Path::new("intro1.docx")).unwrap(), 1);
/// assert_eq!(extract_index(Path::new("appendix10.docx")).unwrap(), 10);
/// assert_eq!(extract_index(Path::new("file007.docx")).unwrap(), 7);
/// ```
pub fn extract_index(path: &Path) -> Result<u64, ParseError> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or(ParseError::NoTrailingDigits)?;

    let base = match name.split_once('.') {
        Some((base, _)) => base,
        None => name,
    };

    let digits = trailing_digits_pattern()
        .captures(base)
        .and_then(|c| c.get(1))
        .ok_or(ParseError::NoTrailingDigits)?
        .as_str();

    digits
        .parse::<u64>()
        .map_err(|_| ParseError::IndexOverflow(digits.to_string()))
}
