//! Command and response encoding

use std::collections::{BTreeMap, BTreeSet};

use frame_fs::fold_name;

use crate::{RemoteError, Result};

/// Files reported by the remote side.
///
/// Lookups go by case-folded basename. The spelling the remote reported is
/// kept, since the serving filesystem may be case-sensitive and `del` must
/// name the file exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteInventory {
    files: BTreeMap<String, BTreeSet<String>>,
}

impl RemoteInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name as the remote reported it.
    pub fn insert(&mut self, reported: impl Into<String>) {
        let reported = reported.into();
        self.files
            .entry(fold_name(&reported))
            .or_default()
            .insert(reported);
    }

    /// Whether any remote file folds to `folded`.
    pub fn contains(&self, folded: &str) -> bool {
        self.files.contains_key(folded)
    }

    /// Number of distinct case-folded names.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Case-folded names, sorted.
    pub fn folded_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Remote spellings of `folded`, sorted.
    pub fn reported_names(&self, folded: &str) -> impl Iterator<Item = &str> {
        self.files
            .get(folded)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Every remote spelling, in case-folded order.
    pub fn reported(&self) -> impl Iterator<Item = &str> {
        self.files.values().flatten().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RemoteInventory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for name in iter {
            inventory.insert(name);
        }
        inventory
    }
}

/// Field separator on the wire.
pub const SEPARATOR: char = '\t';

/// A single request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List regular files in the serving directory.
    List,
    /// Delete the named files from the serving directory.
    Delete(Vec<String>),
    /// Anything else; answered with an empty line.
    Unknown(String),
}

impl Command {
    /// Parse one request line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "list" {
            return Self::List;
        }
        if let Some(rest) = line.strip_prefix("del\t") {
            let names = rest
                .split(SEPARATOR)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            return Self::Delete(names);
        }
        Self::Unknown(line.to_string())
    }

    /// Encode as a request line, without the terminating newline.
    pub fn encode(&self) -> String {
        match self {
            Self::List => "list".to_string(),
            Self::Delete(names) => {
                let mut line = String::from("del");
                for name in names {
                    line.push(SEPARATOR);
                    line.push_str(name);
                }
                line
            }
            Self::Unknown(line) => line.clone(),
        }
    }

    /// Short name for logs and errors.
    pub fn verb(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Delete(_) => "del",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Encode the response to `list`.
pub fn encode_list_response<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\t")
}

/// Parse the response to `list`.
pub fn parse_list_response(response: &str) -> RemoteInventory {
    response
        .trim()
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parse the response to `del`: a non-negative decimal count.
pub fn parse_delete_response(response: &str) -> Result<usize> {
    response
        .trim()
        .parse::<usize>()
        .map_err(|_| RemoteError::Malformed {
            command: "del".to_string(),
            response: response.trim().to_string(),
        })
}

/// Whether `name` is a plain basename that may be deleted.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && !name.contains("..") && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parse_list() {
        assert_eq!(Command::parse("list"), Command::List);
        assert_eq!(Command::parse("list\r\n"), Command::List);
    }

    #[test]
    fn parse_delete() {
        assert_eq!(
            Command::parse("del\tp.jpg\tz.jpg\n"),
            Command::Delete(vec!["p.jpg".to_string(), "z.jpg".to_string()])
        );
    }

    #[test]
    fn bare_del_is_unknown() {
        assert_eq!(Command::parse("del"), Command::Unknown("del".to_string()));
        assert_eq!(Command::parse("del\t"), Command::Unknown("del".to_string()));
    }

    #[test]
    fn other_lines_are_unknown() {
        assert_eq!(Command::parse("LIST"), Command::Unknown("LIST".to_string()));
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }

    #[test]
    fn encode_delete() {
        let cmd = Command::Delete(vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        assert_eq!(cmd.encode(), "del\ta.jpg\tb.jpg");
        assert_eq!(Command::parse(&cmd.encode()), cmd);
    }

    #[test]
    fn list_response_is_trimmed_and_looked_up_folded() {
        let names = parse_list_response("P.JPG\tq.jpg \n");
        assert_eq!(names.folded_names().collect::<Vec<_>>(), vec!["p.jpg", "q.jpg"]);
        assert!(names.contains("p.jpg"));
        assert!(!names.contains("P.JPG"));
    }

    #[test]
    fn list_response_keeps_reported_spelling() {
        let names = parse_list_response("Stale.JPG\tstale.jpg\tq.jpg");
        assert_eq!(names.len(), 2);
        assert_eq!(
            names.reported_names("stale.jpg").collect::<Vec<_>>(),
            vec!["Stale.JPG", "stale.jpg"]
        );
        assert_eq!(
            names.reported().collect::<Vec<_>>(),
            vec!["q.jpg", "Stale.JPG", "stale.jpg"]
        );
        assert!(names.reported_names("missing.jpg").next().is_none());
    }

    #[test]
    fn empty_list_response_is_empty_inventory() {
        assert!(parse_list_response("\n").is_empty());
        assert!(parse_list_response("").is_empty());
    }

    #[test]
    fn delete_response_must_be_a_count() {
        assert_eq!(parse_delete_response("3\n").unwrap(), 3);
        assert!(parse_delete_response("-1").is_err());
        assert!(parse_delete_response("").is_err());
        assert!(parse_delete_response("ok").is_err());
    }

    #[rstest]
    #[case("a.jpg", true)]
    #[case("a..b.jpg", false)]
    #[case("a.b.jpg", true)]
    #[case("../a.jpg", false)]
    #[case("sub/a.jpg", false)]
    #[case("sub\\a.jpg", false)]
    #[case("..", false)]
    #[case(".", false)]
    #[case("", false)]
    fn plain_names(#[case] name: &str, #[case] plain: bool) {
        assert_eq!(is_plain_name(name), plain);
    }
}
