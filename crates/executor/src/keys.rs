// This file is part of Wrapline.
//
// Wrapline is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Wrapline is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Wrapline.
// If not, see https://www.gnu.org/licenses/.

//! Line-delimited private key files

use std::{fs, path::Path};

use anyhow::Context;
use secrecy::SecretString;

/// Length of a raw hex private key without `0x` prefix
pub const PRIVATE_KEY_HEX_LEN: usize = 64;

/// Extract private keys from the contents of a key file
///
/// Lines are trimmed and only those exactly [`PRIVATE_KEY_HEX_LEN`] characters
/// long are kept, in file order. Everything else is silently dropped.
pub fn parse_private_keys(contents: &str) -> Vec<SecretString> {
    contents
        .split('\n')
        .map(str::trim)
        .filter(|line| line.len() == PRIVATE_KEY_HEX_LEN)
        .map(|line| SecretString::from(line.to_string()))
        .collect()
}

/// Read and filter the private keys stored at `path`
pub fn read_private_keys(path: &Path) -> anyhow::Result<Vec<SecretString>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read private keys from {}", path.display()))?;
    Ok(parse_private_keys(&contents))
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn exposed(keys: &[SecretString]) -> Vec<&str> {
        keys.iter().map(|k| k.expose_secret()).collect()
    }

    #[test]
    fn test_keeps_only_64_char_lines_in_order() {
        let a = "a".repeat(64);
        let b = "b".repeat(64);
        let contents = format!("{a}\n0123456789\n{b}\n{}\n", "c".repeat(66));
        let keys = parse_private_keys(&contents);
        assert_eq!(exposed(&keys), vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn test_trims_whitespace_and_crlf() {
        let a = "a".repeat(64);
        let contents = format!("  {a}\t\r\n\r\n");
        let keys = parse_private_keys(&contents);
        assert_eq!(exposed(&keys), vec![a.as_str()]);
    }

    #[test]
    fn test_prefixed_key_is_dropped() {
        // 66 characters with the prefix
        let contents = format!("0x{}", "a".repeat(64));
        assert!(parse_private_keys(&contents).is_empty());
    }

    #[test]
    fn test_empty_contents() {
        assert!(parse_private_keys("").is_empty());
        assert!(parse_private_keys("\n\n   \n").is_empty());
    }

    #[test]
    fn test_read_private_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priv.txt");
        let a = "a".repeat(64);
        fs::write(&path, format!("{a}\nshort\n")).unwrap();

        let keys = read_private_keys(&path).unwrap();
        assert_eq!(exposed(&keys), vec![a.as_str()]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_private_keys(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read private keys"));
    }
}
