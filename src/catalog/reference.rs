use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref REFERENCE_RE: Regex =
        Regex::new(r"^(.+)\(UID:(\d+)\)$").expect("Invalid Regex, this should be fixed at runtime.");
}

/// An attribution extracted from a decorated free-text cell.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub id: String,
}

/// Parse a `<name>(UID:<digits>)` attribution string.
///
/// No match (including empty input) yields `None`; most attribution
/// cells are plain text, so absence is the normal outcome.
pub fn parse_reference(text: &str) -> Option<Reference> {
    let caps = REFERENCE_RE.captures(text)?;
    Some(Reference {
        name: caps[1].to_owned(),
        id: caps[2].to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decorated_attribution() {
        assert_eq!(
            parse_reference("Alice(UID:123)"),
            Some(Reference {
                name: "Alice".to_owned(),
                id: "123".to_owned(),
            })
        );
    }

    #[test]
    fn name_may_contain_parentheses() {
        assert_eq!(
            parse_reference("Bob (the one)(UID:456789)"),
            Some(Reference {
                name: "Bob (the one)".to_owned(),
                id: "456789".to_owned(),
            })
        );
    }

    #[test]
    fn absent_for_plain_text() {
        assert_eq!(parse_reference("no-uid"), None);
        assert_eq!(parse_reference(""), None);
        assert_eq!(parse_reference("(UID:123)"), None);
        assert_eq!(parse_reference("Alice(UID:)"), None);
        assert_eq!(parse_reference("Alice(UID:123) "), None);
    }
}
