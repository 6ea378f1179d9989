// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Tag, TagSet};

/// Result of scanning a raw search string for tag directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub text: String,
    pub tags: TagSet,
}

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:is|tag|in):([a-z0-9_-]+)\b").expect("directive pattern")
    })
}

/// Splits a raw search string into plain text and tag directives.
///
/// Tokens of the form `is:<tag>`, `tag:<tag>` or `in:<tag>` (case-insensitive,
/// word-bounded) whose identifier names a known tag are collected and
/// stripped together with their surrounding whitespace; unrecognized tokens
/// stay in the text untouched. Parsing the returned text again yields the
/// same text and no further tags.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let mut tags = TagSet::new();
    let text = directive_pattern().replace_all(raw, |caps: &regex::Captures<'_>| {
        match caps[1].to_lowercase().parse::<Tag>() {
            Ok(tag) => {
                tags.insert(tag);
                String::new()
            }
            // Not a configured tag: keep the token in the text.
            Err(_) => caps[0].to_owned(),
        }
    });
    // Collapsing whitespace runs removes the gap a stripped token leaves
    // behind, so the remaining text works as a substring needle.
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    ParsedQuery { text, tags }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::model::{Tag, TagSet};

    use super::parse_query;

    fn tags(list: &[Tag]) -> TagSet {
        list.iter().copied().collect()
    }

    #[test]
    fn extracts_tags_and_plain_text() {
        let parsed = parse_query("is:wip foo is:easy");
        assert_eq!(parsed.text, "foo");
        assert_eq!(parsed.tags, tags(&[Tag::Wip, Tag::Easy]));
    }

    #[rstest]
    #[case("tag:conflict maps", &[Tag::Conflict], "maps")]
    #[case("in:link", &[Tag::Link], "")]
    #[case("IS:WIP shouty", &[Tag::Wip], "shouty")]
    #[case("is:unlabeled", &[Tag::Unlabeled], "")]
    fn directive_prefixes_and_case(
        #[case] raw: &str,
        #[case] expected_tags: &[Tag],
        #[case] expected_text: &str,
    ) {
        let parsed = parse_query(raw);
        assert_eq!(parsed.tags, tags(expected_tags));
        assert_eq!(parsed.text, expected_text);
    }

    #[test]
    fn embedded_directives_leave_single_spaced_text() {
        let parsed = parse_query("foo is:wip bar");
        assert_eq!(parsed.text, "foo bar");
        assert_eq!(parsed.tags, tags(&[Tag::Wip]));
    }

    #[test]
    fn unknown_directives_stay_in_the_text() {
        let parsed = parse_query("is:urgent maps");
        assert!(parsed.tags.is_empty());
        assert_eq!(parsed.text, "is:urgent maps");
    }

    #[test]
    fn directives_inside_words_are_not_tokens() {
        let parsed = parse_query("thisis:wip");
        assert!(parsed.tags.is_empty());
        assert_eq!(parsed.text, "thisis:wip");
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_query("is:wip  maps  is:easy");
        let second = parse_query(&first.text);
        assert_eq!(second.text, first.text);
        assert!(second.tags.is_empty());
    }

    #[test]
    fn empty_input_parses_to_empty() {
        let parsed = parse_query("   ");
        assert_eq!(parsed.text, "");
        assert!(parsed.tags.is_empty());
    }
}
