//! Token universe: one contract address per line.

use crate::error::FeedError;
use std::path::Path;

/// Parse a universe file body. Blank lines are skipped.
pub fn parse_universe(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the universe. A missing or empty file is a configuration error.
pub fn load_universe(path: impl AsRef<Path>) -> Result<Vec<String>, FeedError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| FeedError::Config(format!("universe {}: {}", path.display(), e)))?;

    let addresses = parse_universe(&content);
    if addresses.is_empty() {
        return Err(FeedError::Config(format!(
            "universe {} is empty",
            path.display()
        )));
    }
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_universe() {
        let addresses = parse_universe("0xaaa\n\n  0xbbb  \r\n\t\n0xccc");
        assert_eq!(addresses, vec!["0xaaa", "0xbbb", "0xccc"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_universe("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn test_empty_file() {
        let path = std::env::temp_dir().join(format!("dumper-universe-{}.txt", std::process::id()));
        std::fs::write(&path, "\n  \n").unwrap();
        let err = load_universe(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, FeedError::Config(_)));
    }
}
