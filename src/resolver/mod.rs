//! Remote address name table
//!
//! Decoded frames carry a 24 bit remote address; a small text table maps
//! known addresses to readable names. One entry per line:
//!
//! ```text
//! 1a2b3c Living room left
//! 04d2e1 Kitchen
//! ```
//!
//! Exactly six hex digits, whitespace, then the name (trailing
//! whitespace trimmed). Anything else is skipped. The table is strictly
//! optional: a missing file just means no annotations.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace};

/// Default table location, relative to the working directory
pub const DEFAULT_REMOTES_FILE: &str = "remotes.txt";

/// Lookup table from remote address to display name
#[derive(Debug, Clone, Default)]
pub struct RemoteTable {
    entries: HashMap<u32, String>,
}

impl RemoteTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse table text; malformed lines are skipped
    ///
    /// When an address appears more than once the last definition wins.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            match parse_line(line) {
                Some((address, name)) => {
                    entries.insert(address, name.to_string());
                }
                None => {
                    if !line.trim().is_empty() {
                        trace!("skipping malformed table line: {:?}", line);
                    }
                }
            }
        }
        Self { entries }
    }

    /// Load a table file; a missing or unreadable file yields an empty
    /// table, not an error
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::parse(&text);
                debug!("loaded {} remote names from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                debug!("no remote table at {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Name for an address, if the table knows it
    pub fn resolve(&self, address: u32) -> Option<&str> {
        self.entries.get(&address).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One table line: six hex digits at the start, whitespace, then a name
fn parse_line(line: &str) -> Option<(u32, &str)> {
    if line.len() < 7 || !line.is_char_boundary(6) {
        return None;
    }
    let (digits, rest) = line.split_at(6);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let name = rest.trim();
    if name.is_empty() {
        return None;
    }
    let address = u32::from_str_radix(digits, 16).ok()?;
    Some((address, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_basic() {
        assert_eq!(parse_line("1a2b3c Living room"), Some((0x1a2b3c, "Living room")));
        assert_eq!(parse_line("ABCDEF\tKitchen"), Some((0xabcdef, "Kitchen")));
    }

    #[test]
    fn test_parse_line_trims_trailing_whitespace() {
        assert_eq!(parse_line("00000f Attic   "), Some((0xf, "Attic")));
        assert_eq!(parse_line("00000f Attic\r"), Some((0xf, "Attic")));
    }

    #[test]
    fn test_parse_line_rejects_bad_shapes() {
        // too short
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("1a2b3c"), None);
        // not hex
        assert_eq!(parse_line("1a2b3g name"), None);
        // no separator after the digits
        assert_eq!(parse_line("1a2b3c4 name"), None);
        // leading whitespace
        assert_eq!(parse_line(" 1a2b3 name"), None);
        // name missing
        assert_eq!(parse_line("1a2b3c    "), None);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let table = RemoteTable::parse(
            "1a2b3c Living room\n\
             # comment-ish garbage\n\
             \n\
             xyzxyz broken\n\
             04d2e1 Kitchen\n",
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(0x1a2b3c), Some("Living room"));
        assert_eq!(table.resolve(0x04d2e1), Some("Kitchen"));
    }

    #[test]
    fn test_last_definition_wins() {
        let table = RemoteTable::parse("1a2b3c First\n1a2b3c Second\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(0x1a2b3c), Some("Second"));
    }

    #[test]
    fn test_resolve_unknown_address() {
        let table = RemoteTable::parse("1a2b3c Living room\n");
        assert_eq!(table.resolve(0xffffff), None);
    }

    #[test]
    fn test_load_missing_file_gives_empty_table() {
        let table = RemoteTable::load("/nonexistent/path/remotes.txt");
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(RemoteTable::parse("").is_empty());
    }
}
