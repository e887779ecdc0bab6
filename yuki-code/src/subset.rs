//! Character subset definitions
//!
//! A subset file is plain UTF-8 text. Every character on every line is part
//! of the subset, except on lines starting with `#`, which are comments.

use std::{collections::BTreeSet, fs, path::Path};

use crate::error::Error;

/// Parse the contents of a subset file.
///
/// The result is sorted by code point and free of duplicates.
pub fn parse_subset(text: &str) -> Vec<char> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::chars)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Read and parse a subset file.
pub fn load_subset(path: impl AsRef<Path>) -> Result<Vec<char>, Error> {
    read_text(path.as_ref()).map(|text| parse_subset(&text))
}

pub(crate) fn read_text(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sorted_and_deduplicated() {
        let subset = parse_subset("cba\nabc\nzz\n");
        assert_eq!(subset, vec!['a', 'b', 'c', 'z']);
    }

    #[test]
    fn comments_are_ignored() {
        let subset = parse_subset("# only in a comment: Q\nab\n#xyz\n");
        assert_eq!(subset, vec!['a', 'b']);
    }

    #[test]
    fn hash_counts_when_not_leading() {
        let subset = parse_subset("a#\n");
        assert_eq!(subset, vec!['#', 'a']);
    }

    #[test]
    fn spaces_are_characters() {
        let subset = parse_subset(" !\n");
        assert_eq!(subset, vec![' ', '!']);
    }

    #[test]
    fn crlf_line_endings() {
        let subset = parse_subset("ab\r\n#c\r\n");
        assert_eq!(subset, vec!['a', 'b']);
    }

    #[test]
    fn empty() {
        assert!(parse_subset("").is_empty());
        assert!(parse_subset("# nothing\n").is_empty());
    }

    #[test]
    fn multibyte() {
        let subset = parse_subset("あいう\nアイウ\n漢\n");
        assert_eq!(subset, vec!['あ', 'い', 'う', 'ア', 'イ', 'ウ', '漢']);
        assert!(subset.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# ascii").unwrap();
        writeln!(file, "ba").unwrap();
        assert_eq!(load_subset(file.path()).unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_subset(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, Error::ResourceUnavailable { .. }));
    }
}
