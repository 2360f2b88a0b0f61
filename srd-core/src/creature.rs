//! Creature stat blocks parsed from the monster and animal chapters.

use crate::markdown::{self, CREATURE_HEADING};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// `Size Type (Tag, Tag), Alignment`
static TYPE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+(\w+)(?:\s*\(([^)]+)\))?,\s*(.+)$").expect("valid type line pattern")
});

static ARMOR_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| markdown::labeled_field_regex("Armor Class", r"(\d+)"));

static HIT_POINTS_RE: LazyLock<Regex> =
    LazyLock::new(|| markdown::labeled_field_regex("Hit Points", r"(\d+)"));

static SPEED_RE: LazyLock<Regex> =
    LazyLock::new(|| markdown::labeled_field_regex("Speed", r"(.+)"));

/// `CR 10 (XP 5,900, or 7,200 in lair)` / `CR 2 (XP 450; PB +2)`, usually
/// with a bold `**CR**` label and no colon.
static CHALLENGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|\*\*)CR(?:\*\*)?:?(?:\*\*)?[ \t]*([\d/]+)[ \t]*\(XP[ \t]*([\d,]+)")
        .expect("valid challenge rating pattern")
});

/// Which chapter a creature came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureSource {
    Monster,
    Animal,
}

impl CreatureSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatureSource::Monster => "monster",
            CreatureSource::Animal => "animal",
        }
    }
}

impl fmt::Display for CreatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stat-block field whose pattern can fail to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureField {
    /// Size, type, tags and alignment all come from the italic type line.
    TypeLine,
    ArmorClass,
    HitPoints,
    Speed,
    /// Challenge rating, its label and experience points.
    ChallengeRating,
}

/// One monster or animal stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub creature_type: String,
    /// Parenthetical qualifiers next to the type, e.g. `Goblinoid`.
    pub tags: Vec<String>,
    pub alignment: String,
    pub armor_class: u32,
    pub hit_points: u32,
    /// Numeric CR used for filtering and ordering (`1/4` is `0.25`).
    pub challenge_rating: f64,
    /// CR as printed in the stat block.
    pub challenge_rating_label: String,
    pub experience_points: u32,
    pub speed: String,
    pub source: CreatureSource,
    /// The complete markdown section, heading included.
    pub full_text: String,
    /// Fields that did not match and hold their defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted: Vec<CreatureField>,
}

impl Creature {
    /// `"{size} {type}"`, with tags appended in parentheses when present.
    pub fn type_description(&self) -> String {
        let base = format!("{} {}", self.size, self.creature_type);
        if self.tags.is_empty() {
            base
        } else {
            format!("{} ({})", base, self.tags.join(", "))
        }
    }

    /// Whether `name` is this creature's type or one of its tags.
    pub fn has_type(&self, name: &str) -> bool {
        markdown::eq_folded(&self.creature_type, name)
            || self.tags.iter().any(|tag| markdown::eq_folded(tag, name))
    }

    /// Lowercased text searched by keyword queries.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.name,
            self.creature_type,
            self.tags.join(" "),
            self.alignment,
            self.full_text
        )
        .to_lowercase()
    }
}

/// Parse every `## ` entry in a creature chapter.
///
/// Entries with an empty name are skipped; every other entry produces a
/// record, with unmatched fields left at their defaults.
pub fn parse_creatures(text: &str, source: CreatureSource) -> Vec<Creature> {
    markdown::split_entries(text, CREATURE_HEADING)
        .into_iter()
        .filter_map(|chunk| {
            let creature = parse_creature(chunk, source);
            if creature.is_none() {
                tracing::debug!(%source, "skipping creature entry without a name");
            }
            creature
        })
        .collect()
}

/// Parse a single creature chunk (the text after its `## ` marker).
pub fn parse_creature(chunk: &str, source: CreatureSource) -> Option<Creature> {
    let name = markdown::first_line(chunk).trim();
    if name.is_empty() {
        return None;
    }

    let mut defaulted = Vec::new();

    let (size, creature_type, tags, alignment) = match markdown::italic_line(chunk)
        .and_then(|line| TYPE_LINE_RE.captures(line.trim()))
    {
        Some(caps) => (
            caps[1].to_string(),
            caps[2].to_string(),
            caps.get(3)
                .map(|tags| markdown::split_list(tags.as_str()))
                .unwrap_or_default(),
            caps[4].trim().to_string(),
        ),
        None => {
            defaulted.push(CreatureField::TypeLine);
            (String::new(), String::new(), Vec::new(), String::new())
        }
    };

    let armor_class =
        number_field(&ARMOR_CLASS_RE, chunk, CreatureField::ArmorClass, &mut defaulted);
    let hit_points =
        number_field(&HIT_POINTS_RE, chunk, CreatureField::HitPoints, &mut defaulted);

    let speed = match markdown::capture(&SPEED_RE, chunk) {
        Some(speed) => speed.to_string(),
        None => {
            defaulted.push(CreatureField::Speed);
            String::new()
        }
    };

    let (challenge_rating_label, experience_points) = match CHALLENGE_RE.captures(chunk) {
        Some(caps) => (caps[1].to_string(), parse_experience(&caps[2])),
        None => {
            defaulted.push(CreatureField::ChallengeRating);
            ("0".to_string(), 0)
        }
    };
    let challenge_rating = parse_challenge_rating(&challenge_rating_label);

    if !defaulted.is_empty() {
        tracing::debug!(creature = name, fields = ?defaulted, "creature fields fell back to defaults");
    }

    Some(Creature {
        name: name.to_string(),
        size,
        creature_type,
        tags,
        alignment,
        armor_class,
        hit_points,
        challenge_rating,
        challenge_rating_label,
        experience_points,
        speed,
        source,
        full_text: markdown::entry_text(CREATURE_HEADING, chunk),
        defaulted,
    })
}

fn number_field(
    re: &Regex,
    chunk: &str,
    field: CreatureField,
    defaulted: &mut Vec<CreatureField>,
) -> u32 {
    match markdown::capture(re, chunk).and_then(|value| value.parse().ok()) {
        Some(value) => value,
        None => {
            defaulted.push(field);
            0
        }
    }
}

/// `5,900` -> 5900; anything unparsable is 0.
fn parse_experience(text: &str) -> u32 {
    text.replace(',', "").parse().unwrap_or(0)
}

/// Convert a printed CR into its numeric value.
///
/// `1/8`, `1/4` and `1/2` become 0.125, 0.25 and 0.5. Any other `n/d` with a
/// non-zero denominator is divided out; anything unparsable is 0.
pub fn parse_challenge_rating(label: &str) -> f64 {
    parse_fraction(label).unwrap_or(0.0)
}

/// Strictly parse a decimal or `n/d` fraction.
pub fn parse_fraction(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().ok()?;
            let denominator: f64 = denominator.trim().parse().ok()?;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        None => text.parse::<f64>().ok().filter(|value| value.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABOLETH: &str = "Aboleth

*Large Aberration, Lawful Evil*

**Armor Class:** 17
**Hit Points:** 150 (20d10 + 40)
**Speed:** 10 ft., Swim 40 ft.

**CR** 10 (XP 5,900, or 7,200 in lair; PB +4)
";

    #[test]
    fn test_parse_aboleth() {
        let aboleth = parse_creature(ABOLETH, CreatureSource::Monster).expect("named entry");
        assert_eq!(aboleth.name, "Aboleth");
        assert_eq!(aboleth.size, "Large");
        assert_eq!(aboleth.creature_type, "Aberration");
        assert!(aboleth.tags.is_empty());
        assert_eq!(aboleth.alignment, "Lawful Evil");
        assert_eq!(aboleth.armor_class, 17);
        assert_eq!(aboleth.hit_points, 150);
        assert_eq!(aboleth.speed, "10 ft., Swim 40 ft.");
        assert_eq!(aboleth.challenge_rating, 10.0);
        assert_eq!(aboleth.challenge_rating_label, "10");
        assert_eq!(aboleth.experience_points, 5900);
        assert!(aboleth.full_text.starts_with("## Aboleth"));
        assert!(aboleth.defaulted.is_empty());
    }

    #[test]
    fn test_fractional_cr() {
        let chunk = "Wolf\n*Medium Beast, Unaligned*\n**CR** 1/4 (XP 50; PB +2)\n";
        let wolf = parse_creature(chunk, CreatureSource::Animal).expect("named entry");
        assert_eq!(wolf.challenge_rating, 0.25);
        assert_eq!(wolf.challenge_rating_label, "1/4");
        assert_eq!(wolf.experience_points, 50);
        assert_eq!(wolf.source, CreatureSource::Animal);
    }

    #[test]
    fn test_tags_and_description() {
        let chunk = "Goblin Warrior\n*Small Fey (Goblinoid), Chaotic Neutral*\n";
        let goblin = parse_creature(chunk, CreatureSource::Monster).expect("named entry");
        assert_eq!(goblin.creature_type, "Fey");
        assert_eq!(goblin.tags, vec!["Goblinoid"]);
        assert_eq!(goblin.type_description(), "Small Fey (Goblinoid)");
        assert!(goblin.has_type("goblinoid"));
        assert!(goblin.has_type("FEY"));
        assert!(!goblin.has_type("Humanoid"));
    }

    #[test]
    fn test_non_ascii_type_matches_any_case() {
        let chunk = "Élan\n*Medium Éther (Ångel), Neutral*\n";
        let elan = parse_creature(chunk, CreatureSource::Monster).expect("named entry");
        assert_eq!(elan.size, "Medium");
        assert_eq!(elan.creature_type, "Éther");
        assert!(elan.has_type("éther"));
        assert!(elan.has_type("ÉTHER"));
        assert!(elan.has_type("ångel"));
    }

    #[test]
    fn test_missing_fields_default() {
        let statue = parse_creature("Mystery Statue\n\nIt just stands there.\n", CreatureSource::Monster)
            .expect("named entry");
        assert_eq!(statue.size, "");
        assert_eq!(statue.armor_class, 0);
        assert_eq!(statue.hit_points, 0);
        assert_eq!(statue.challenge_rating, 0.0);
        assert_eq!(statue.challenge_rating_label, "0");
        assert_eq!(statue.experience_points, 0);
        assert_eq!(
            statue.defaulted,
            vec![
                CreatureField::TypeLine,
                CreatureField::ArmorClass,
                CreatureField::HitPoints,
                CreatureField::Speed,
                CreatureField::ChallengeRating,
            ]
        );
    }

    #[test]
    fn test_unnamed_entry_skipped() {
        let creatures = parse_creatures("## \nbody\n## Wolf\nbody\n", CreatureSource::Animal);
        assert_eq!(creatures.len(), 1);
        assert_eq!(creatures[0].name, "Wolf");
    }

    #[test]
    fn test_parse_challenge_rating() {
        assert_eq!(parse_challenge_rating("1/8"), 0.125);
        assert_eq!(parse_challenge_rating("1/4"), 0.25);
        assert_eq!(parse_challenge_rating("1/2"), 0.5);
        assert_eq!(parse_challenge_rating("3/4"), 0.75);
        assert_eq!(parse_challenge_rating("17"), 17.0);
        assert_eq!(parse_challenge_rating("1/0"), 0.0);
        assert_eq!(parse_challenge_rating("?"), 0.0);
        assert_eq!(parse_challenge_rating(""), 0.0);
    }

    #[test]
    fn test_full_text_reparses_identically() {
        let aboleth = parse_creature(ABOLETH, CreatureSource::Monster).expect("named entry");
        let reparsed = parse_creatures(&aboleth.full_text, CreatureSource::Monster);
        assert_eq!(reparsed, vec![aboleth]);
    }
}
