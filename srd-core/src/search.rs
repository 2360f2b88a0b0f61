//! Filtered search and exact lookup over an [`SrdCorpus`].
//!
//! Lookup is two-phase. Search is the cheap discovery step: it returns at
//! most [`MAX_RESULTS`] compact summaries with no stat block text. Exact
//! lookup by name then returns one record's full markdown.
//!
//! The filter types double as the argument types of the `searchCreatures`
//! and `searchSpells` tools, so their doc comments are what the model reads.

use crate::corpus::SrdCorpus;
use crate::creature::{parse_fraction, Creature};
use crate::error::SrdError;
use crate::markdown::eq_folded;
use crate::spell::Spell;
use serde::{Deserialize, Serialize};
use srd_macros::Tool;

/// Upper bound on the number of summaries a search returns.
pub const MAX_RESULTS: usize = 20;

// ============================================================================
// Filters
// ============================================================================

/// Search for monsters and animals by name, type, CR range, or keywords. Returns a summary list of up to 20 matching creatures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tool)]
#[tool(name = "searchCreatures")]
#[serde(default)]
pub struct CreatureFilter {
    /// Search keywords, matched against name, type, abilities, and full stat block text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Minimum Challenge Rating (use 0.125 for CR 1/8, 0.25 for CR 1/4, 0.5 for CR 1/2).
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub cr_min: Option<f64>,
    /// Maximum Challenge Rating.
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub cr_max: Option<f64>,
    /// Creature type filter: Aberration, Beast, Celestial, Construct, Dragon, Elemental, Fey, Fiend, Giant, Humanoid, Monstrosity, Ooze, Plant, or Undead. Also matches tags such as Goblinoid.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub creature_type: Option<String>,
    /// Size filter: Tiny, Small, Medium, Large, Huge, or Gargantuan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Source chapter filter: monster or animal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Search for spells by name, level, school, class, or keywords. Returns a summary list of up to 20 matching spells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tool)]
#[tool(name = "searchSpells")]
#[serde(default)]
pub struct SpellFilter {
    /// Search keywords, matched against name, school, and full spell text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Minimum spell level (0 for cantrips).
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub level_min: Option<f64>,
    /// Maximum spell level (9 max).
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub level_max: Option<f64>,
    /// Spell school: Abjuration, Conjuration, Divination, Enchantment, Evocation, Illusion, Necromancy, or Transmutation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    /// Class filter: Bard, Cleric, Druid, Paladin, Ranger, Sorcerer, Warlock, or Wizard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Filter by whether the spell requires concentration.
    #[serde(deserialize_with = "lenient::boolean", skip_serializing_if = "Option::is_none")]
    pub concentration: Option<bool>,
}

impl CreatureFilter {
    /// Build a filter from form fields or command-line flags.
    ///
    /// Keys are `query`, `type`, `size`, `source`, `cr_min` and `cr_max`
    /// (dashes accepted in place of underscores). Empty values and unknown
    /// keys are ignored. CR bounds accept fractions such as `1/4`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SrdError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref().replace('-', "_").as_str() {
                "query" => filter.query = Some(value.to_string()),
                "type" => filter.creature_type = Some(value.to_string()),
                "size" => filter.size = Some(value.to_string()),
                "source" => filter.source = Some(value.to_string()),
                "cr_min" => filter.cr_min = Some(parse_bound("cr_min", value)?),
                "cr_max" => filter.cr_max = Some(parse_bound("cr_max", value)?),
                _ => {}
            }
        }
        Ok(filter)
    }

    /// Whether `creature` satisfies every present constraint.
    pub fn matches(&self, creature: &Creature) -> bool {
        if let Some(creature_type) = present(&self.creature_type) {
            if !creature.has_type(creature_type) {
                return false;
            }
        }
        if let Some(size) = present(&self.size) {
            if !eq_folded(&creature.size, size) {
                return false;
            }
        }
        if let Some(source) = present(&self.source) {
            if !eq_folded(creature.source.as_str(), source) {
                return false;
            }
        }
        if let Some(min) = self.cr_min {
            if creature.challenge_rating < min {
                return false;
            }
        }
        if let Some(max) = self.cr_max {
            if creature.challenge_rating > max {
                return false;
            }
        }
        match present(&self.query) {
            Some(query) => contains_all_terms(&creature.search_text(), query),
            None => true,
        }
    }
}

impl SpellFilter {
    /// Build a filter from form fields or command-line flags.
    ///
    /// Keys are `query`, `school`, `class_name` (or `class`),
    /// `concentration`, `level_min` and `level_max`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SrdError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref().replace('-', "_").as_str() {
                "query" => filter.query = Some(value.to_string()),
                "school" => filter.school = Some(value.to_string()),
                "class" | "class_name" => filter.class_name = Some(value.to_string()),
                "level_min" => filter.level_min = Some(parse_bound("level_min", value)?),
                "level_max" => filter.level_max = Some(parse_bound("level_max", value)?),
                "concentration" => {
                    filter.concentration = Some(
                        parse_flag(value)
                            .ok_or_else(|| SrdError::invalid_filter("concentration", value))?,
                    )
                }
                _ => {}
            }
        }
        Ok(filter)
    }

    /// Whether `spell` satisfies every present constraint.
    pub fn matches(&self, spell: &Spell) -> bool {
        if let Some(school) = present(&self.school) {
            if !eq_folded(&spell.school, school) {
                return false;
            }
        }
        if let Some(class) = present(&self.class_name) {
            if !spell.has_class(class) {
                return false;
            }
        }
        if let Some(concentration) = self.concentration {
            if spell.requires_concentration != concentration {
                return false;
            }
        }
        let level = f64::from(spell.level);
        if let Some(min) = self.level_min {
            if level < min {
                return false;
            }
        }
        if let Some(max) = self.level_max {
            if level > max {
                return false;
            }
        }
        match present(&self.query) {
            Some(query) => contains_all_terms(&spell.search_text(), query),
            None => true,
        }
    }
}

/// A string filter that is set and non-empty.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Every whitespace-separated, lowercased term of `query` occurs in `haystack`.
///
/// `haystack` must already be lowercase.
pub fn contains_all_terms(haystack: &str, query: &str) -> bool {
    query
        .to_lowercase()
        .split_whitespace()
        .all(|term| haystack.contains(term))
}

fn parse_bound(field: &'static str, value: &str) -> Result<f64, SrdError> {
    parse_fraction(value).ok_or_else(|| SrdError::invalid_filter(field, value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Deserializers that accept what a language model tends to send: numbers as
/// numbers or numeric strings, booleans as booleans or `"true"`/`"false"`.
mod lenient {
    use super::{parse_flag, parse_fraction};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| D::Error::custom("number out of range")),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_fraction(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected a number, got {s:?}"))),
            other => Err(D::Error::custom(format!("expected a number, got {other}"))),
        }
    }

    pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_flag(s.trim())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected a boolean, got {s:?}"))),
            other => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
        }
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// Compact search row for a creature. Full text requires a follow-up lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSummary {
    pub name: String,
    /// CR as printed, e.g. `1/4`.
    #[serde(rename = "cr")]
    pub challenge_rating: String,
    /// `"{size} {type} (tags)"`.
    #[serde(rename = "type")]
    pub description: String,
    pub size: String,
    #[serde(rename = "hp")]
    pub hit_points: u32,
    #[serde(rename = "ac")]
    pub armor_class: u32,
    pub speed: String,
    #[serde(rename = "xp")]
    pub experience_points: u32,
}

impl From<&Creature> for CreatureSummary {
    fn from(creature: &Creature) -> Self {
        Self {
            name: creature.name.clone(),
            challenge_rating: creature.challenge_rating_label.clone(),
            description: creature.type_description(),
            size: creature.size.clone(),
            hit_points: creature.hit_points,
            armor_class: creature.armor_class,
            speed: creature.speed.clone(),
            experience_points: creature.experience_points,
        }
    }
}

/// Compact search row for a spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSummary {
    pub name: String,
    pub level: u8,
    pub school: String,
    pub classes: Vec<String>,
    #[serde(rename = "castingTime")]
    pub casting_time: String,
    pub concentration: bool,
}

impl From<&Spell> for SpellSummary {
    fn from(spell: &Spell) -> Self {
        Self {
            name: spell.name.clone(),
            level: spell.level,
            school: spell.school.clone(),
            classes: spell.classes.clone(),
            casting_time: spell.casting_time.clone(),
            concentration: spell.requires_concentration,
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

impl SrdCorpus {
    /// Creatures matching `filter`, ascending by CR, at most [`MAX_RESULTS`].
    ///
    /// Creatures with equal CR keep corpus order.
    pub fn search_creatures(&self, filter: &CreatureFilter) -> Vec<CreatureSummary> {
        let mut matches: Vec<&Creature> = self
            .creatures()
            .iter()
            .filter(|creature| filter.matches(creature))
            .collect();
        matches.sort_by(|a, b| a.challenge_rating.total_cmp(&b.challenge_rating));

        matches
            .into_iter()
            .take(MAX_RESULTS)
            .map(CreatureSummary::from)
            .collect()
    }

    /// Full stat block for the creature named `name` (case-insensitive).
    pub fn get_creature(&self, name: &str) -> Option<&str> {
        self.creature(name).map(|creature| creature.full_text.as_str())
    }

    /// Spells matching `filter`, ascending by level, at most [`MAX_RESULTS`].
    pub fn search_spells(&self, filter: &SpellFilter) -> Vec<SpellSummary> {
        let mut matches: Vec<&Spell> = self
            .spells()
            .iter()
            .filter(|spell| filter.matches(spell))
            .collect();
        matches.sort_by_key(|spell| spell.level);

        matches
            .into_iter()
            .take(MAX_RESULTS)
            .map(SpellSummary::from)
            .collect()
    }

    /// Full description of the spell named `name` (case-insensitive).
    pub fn get_spell(&self, name: &str) -> Option<&str> {
        self.spell(name).map(|spell| spell.full_text.as_str())
    }
}
