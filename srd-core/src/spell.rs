//! Spell descriptions parsed from the spells chapter.

use crate::markdown::{self, SPELL_HEADING};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `Evocation Cantrip (Sorcerer, Wizard)`
static CANTRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+Cantrip\s*\(([^)]+)\)").expect("valid cantrip pattern")
});

/// `Level 3 Evocation (Sorcerer, Wizard)`
static LEVELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Level\s+(\d+)\s+(\w+)\s*\(([^)]+)\)").expect("valid leveled spell pattern")
});

static CASTING_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| markdown::labeled_field_regex("Casting Time", r"(.+)"));

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| markdown::labeled_field_regex("Range", r"(.+)"));

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| markdown::labeled_field_regex("Duration", r"(.+)"));

/// A spell field whose pattern can fail to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellField {
    /// Level, school and classes all come from the italic spell line.
    SpellLine,
    CastingTime,
    Range,
    Duration,
}

/// One spell description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    pub school: String,
    pub classes: Vec<String>,
    pub casting_time: String,
    pub range: String,
    pub duration: String,
    pub requires_concentration: bool,
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted: Vec<SpellField>,
}

impl Spell {
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    /// Whether `class` may cast this spell (case-insensitive).
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| markdown::eq_folded(c, class))
    }

    /// Lowercased text searched by keyword queries.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.school,
            self.classes.join(" "),
            self.full_text
        )
        .to_lowercase()
    }
}

/// Parse every `#### ` entry in the spells chapter.
pub fn parse_spells(text: &str) -> Vec<Spell> {
    markdown::split_entries(text, SPELL_HEADING)
        .into_iter()
        .filter_map(|chunk| {
            let spell = parse_spell(chunk);
            if spell.is_none() {
                tracing::debug!("skipping spell entry without a name");
            }
            spell
        })
        .collect()
}

/// Parse a single spell chunk (the text after its `#### ` marker).
pub fn parse_spell(chunk: &str) -> Option<Spell> {
    let name = markdown::first_line(chunk).replace("**", "");
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut defaulted = Vec::new();

    let (level, school, classes) = match markdown::plain_italic_line(chunk).and_then(spell_line) {
        Some(parsed) => parsed,
        None => {
            defaulted.push(SpellField::SpellLine);
            (0, String::new(), Vec::new())
        }
    };

    let mut text_field = |re: &Regex, field: SpellField| match markdown::capture(re, chunk) {
        Some(value) => value.to_string(),
        None => {
            defaulted.push(field);
            String::new()
        }
    };
    let casting_time = text_field(&*CASTING_TIME_RE, SpellField::CastingTime);
    let range = text_field(&*RANGE_RE, SpellField::Range);
    let duration = text_field(&*DURATION_RE, SpellField::Duration);

    let requires_concentration = duration.to_lowercase().contains("concentration");

    if !defaulted.is_empty() {
        tracing::debug!(spell = name, fields = ?defaulted, "spell fields fell back to defaults");
    }

    Some(Spell {
        name: name.to_string(),
        level,
        school,
        classes,
        casting_time,
        range,
        duration,
        requires_concentration,
        full_text: markdown::entry_text(SPELL_HEADING, chunk),
        defaulted,
    })
}

/// Level, school and classes from a cantrip or leveled spell line.
fn spell_line(line: &str) -> Option<(u8, String, Vec<String>)> {
    let line = line.trim();
    if let Some(caps) = CANTRIP_RE.captures(line) {
        return Some((0, caps[1].to_string(), markdown::split_list(&caps[2])));
    }
    let caps = LEVELED_RE.captures(line)?;
    let level = caps[1].parse().ok()?;
    Some((level, caps[2].to_string(), markdown::split_list(&caps[3])))
}
