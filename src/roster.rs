//! Roster input.
//!
//! The tracked-player set comes from a JSON file maintained by hand:
//! an array of `{"license": "...", "nickname": "..."}` records. Importing it
//! replaces the whole roster (see `GolfDb::replace_roster`) — a destructive
//! load, not a merge.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse roster file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One tracked player in the roster file.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub license: String,
    pub nickname: String,
}

/// Load and parse a roster file.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, RosterError> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<RosterEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_a_roster_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"license": "12345", "nickname": "Ana"}},
                {{"license": "67890", "nickname": "Luis"}}]"#
        )
        .unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].license, "12345");
        assert_eq!(roster[1].nickname, "Luis");
    }

    #[test]
    fn missing_fields_are_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"license": "12345"}}]"#).unwrap();
        assert!(matches!(
            load_roster(file.path()),
            Err(RosterError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = Path::new("/nonexistent/players.json");
        assert!(matches!(load_roster(path), Err(RosterError::Io(_))));
    }
}
