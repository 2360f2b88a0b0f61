//! Lenient extraction over SRD markdown.
//!
//! Every helper here returns `Option` and never fails: a pattern that does
//! not match simply yields `None`, and the record parsers substitute a
//! default.

use regex::Regex;
use std::sync::LazyLock;

/// Heading marker introducing one creature entry.
pub const CREATURE_HEADING: &str = "## ";

/// Heading marker introducing one spell entry.
pub const SPELL_HEADING: &str = "#### ";

/// First line consisting solely of `*...*`.
static ITALIC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*(.+?)\*$").expect("valid italic line pattern"));

/// First line consisting solely of `*...*` with no inner asterisks.
static PLAIN_ITALIC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*([^*]+)\*$").expect("valid italic line pattern"));

/// Normalize line endings so `$` anchors behave on CRLF sources.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Split a document into entry chunks at every line starting with `marker`.
///
/// Text before the first marker is discarded. Each chunk excludes the marker
/// itself, so its first line is the entry's display name.
pub fn split_entries<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.starts_with(marker) {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start + marker.len()..end]
        })
        .collect()
}

/// The first line of a chunk.
pub fn first_line(chunk: &str) -> &str {
    chunk.lines().next().unwrap_or("")
}

/// Rebuild an entry's verbatim text from its heading marker and chunk.
pub fn entry_text(marker: &str, chunk: &str) -> String {
    format!("{}{}", marker, chunk.trim())
}

/// Contents of the first fully italicized line (`*Large Aberration, ...*`).
pub fn italic_line(chunk: &str) -> Option<&str> {
    ITALIC_LINE_RE
        .captures(chunk)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Like [`italic_line`], but the line may not contain inner asterisks.
pub fn plain_italic_line(chunk: &str) -> Option<&str> {
    PLAIN_ITALIC_LINE_RE
        .captures(chunk)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build the pattern for a `**Label:** value` field.
///
/// The bold markers are optional but the colon is not. The label must start a
/// line or follow a bold marker so prose mentioning the word does not match.
pub(crate) fn labeled_field_regex(label: &str, value: &str) -> Regex {
    let pattern = format!(
        r"(?m)(?:^|\*\*){}(?::\*\*|\*\*:|:)[ \t]*{}",
        regex::escape(label),
        value
    );
    Regex::new(&pattern).expect("valid labeled field pattern")
}

/// First capture group of `re` in `chunk`, trimmed.
pub(crate) fn capture<'a>(re: &Regex, chunk: &'a str) -> Option<&'a str> {
    re.captures(chunk)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Case-insensitive equality using full Unicode lowercasing, the same folding
/// the name index and keyword search use.
pub fn eq_folded(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Split a parenthetical list (`Sorcerer, Wizard`) into trimmed items.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entries_discards_preamble() {
        let text = "# Monsters\nintro\n## Aboleth\nbody\n### Actions\nmore\n## Wight\nbody2\n";
        let chunks = split_entries(text, CREATURE_HEADING);
        assert_eq!(chunks.len(), 2);
        assert_eq!(first_line(chunks[0]), "Aboleth");
        assert!(chunks[0].contains("### Actions"));
        assert_eq!(first_line(chunks[1]), "Wight");
    }

    #[test]
    fn test_split_entries_without_marker() {
        assert!(split_entries("no headings here", SPELL_HEADING).is_empty());
        assert!(split_entries("", CREATURE_HEADING).is_empty());
    }

    #[test]
    fn test_deeper_headings_do_not_split() {
        let text = "#### Fireball\n*Level 3 Evocation (Wizard)*\n##### Higher levels\n";
        let chunks = split_entries(text, SPELL_HEADING);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("##### Higher levels"));
    }

    #[test]
    fn test_entry_text() {
        assert_eq!(entry_text("## ", "Wolf\n\nbody\n\n"), "## Wolf\n\nbody");
    }

    #[test]
    fn test_italic_line() {
        let chunk = "Goblin\n\n**Armor Class:** 15\n*Small Fey (Goblinoid), Chaotic Neutral*\n";
        assert_eq!(italic_line(chunk), Some("Small Fey (Goblinoid), Chaotic Neutral"));
        assert_eq!(italic_line("Nothing\nplain text\n"), None);
    }

    #[test]
    fn test_labeled_field_variants() {
        let re = labeled_field_regex("Armor Class", r"(\d+)");
        assert_eq!(capture(&re, "**Armor Class:** 17"), Some("17"));
        assert_eq!(capture(&re, "Armor Class: 12 (leather)"), Some("12"));
        assert_eq!(capture(&re, "its Armor Class: 3"), None);

        let range = labeled_field_regex("Range", r"(.+)");
        assert_eq!(capture(&range, "**Ranged Spell Attack** +5"), None);
        assert_eq!(capture(&range, "**Range**: Self"), Some("Self"));
    }

    #[test]
    fn test_eq_folded() {
        assert!(eq_folded("Undead", "UNDEAD"));
        assert!(eq_folded("Éther", "éther"));
        assert!(eq_folded("ÉVOCATION", "évocation"));
        assert!(!eq_folded("Fey", "Fiend"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" Sorcerer,Wizard , "), vec!["Sorcerer", "Wizard"]);
        assert!(split_list("").is_empty());
    }
}
