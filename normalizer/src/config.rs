//! Run configuration.
//!
//! The CLI flags end up here and are handed to the pipeline explicitly,
//! so the expansion code never reads process-wide state.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Separator between HS codes in the `--filter` flag.
pub const FILTER_SEPARATOR: char = ',';

/// Allow-list of HS codes.
///
/// An inactive filter lets every row through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HsFilter {
    codes: Option<BTreeSet<String>>,
}

impl HsFilter {
    /// Filter that accepts every HS code.
    pub fn all() -> Self {
        Self { codes: None }
    }

    /// Parse a comma-separated list of HS codes.
    ///
    /// An empty string disables filtering. Tokens are kept verbatim,
    /// so `"0101, 0102"` allows `" 0102"` and not `"0102"`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::all();
        }
        let codes: BTreeSet<String> = raw
            .split(FILTER_SEPARATOR)
            .map(str::to_string)
            .collect();
        Self { codes: Some(codes) }
    }

    /// Whether rows are being restricted at all.
    pub fn is_active(&self) -> bool {
        self.codes.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Check an (already unquoted) HS code against the allow-list.
    pub fn allows(&self, hs: &str) -> bool {
        match &self.codes {
            Some(codes) if !codes.is_empty() => codes.contains(hs),
            _ => true,
        }
    }

    /// Codes in the allow-list, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().flatten().map(String::as_str)
    }
}

/// Everything a run needs besides the input paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// HS code allow-list.
    pub filter: HsFilter,
    /// Output file; `None` writes to stdout.
    pub out: Option<PathBuf>,
}

impl NormalizeConfig {
    /// Build a config from raw flag values. Empty strings mean "not set".
    pub fn from_flags(filter: &str, out: &str) -> Self {
        Self {
            filter: HsFilter::parse(filter),
            out: (!out.is_empty()).then(|| PathBuf::from(out)),
        }
    }
}
