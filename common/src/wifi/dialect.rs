//! # Scan Dump Dialects
//!
//! A scan dump's shape depends on the tool that produced it. The tokenizer
//! needs to know which one it is looking at; there is no reliable way to
//! sniff it from the text itself.

use std::fmt;
use std::str::FromStr;

/// The command-line tool whose output format a dump follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `iw <iface> scan` output: one `BSS <bssid>` header per access point,
    /// `key: value` lines below it, HT/VHT operation sub-sections.
    IwScan,
    /// `iwlist <iface> scan` output: `Cell NN - Address:` headers, heavily
    /// indented fields, Ubiquiti `Extra:` annotations on some firmwares.
    Iwlist,
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iw" | "iw-scan" => Ok(Dialect::IwScan),
            "iwlist" => Ok(Dialect::Iwlist),
            _ => Err(format!("unknown dialect: {s} (expected 'iw' or 'iwlist')")),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::IwScan => write!(f, "iw"),
            Dialect::Iwlist => write!(f, "iwlist"),
        }
    }
}
