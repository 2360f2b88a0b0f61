//! The loaded reference corpus.
//!
//! An [`SrdCorpus`] is built once, at startup, and is read-only afterwards.
//! Queries borrow it immutably, so it can be shared across threads (for
//! example behind an `Arc`) without locking.

use crate::config::SrdConfig;
use crate::creature::{parse_creatures, Creature, CreatureField, CreatureSource};
use crate::error::SrdError;
use crate::markdown::normalize_newlines;
use crate::spell::{parse_spells, Spell, SpellField};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Parsed creatures and spells plus their case-insensitive name indexes.
#[derive(Debug, Clone, Default)]
pub struct SrdCorpus {
    creatures: Vec<Creature>,
    spells: Vec<Spell>,
    creatures_by_name: HashMap<String, usize>,
    spells_by_name: HashMap<String, usize>,
}

impl SrdCorpus {
    /// Build a corpus from already-parsed records.
    ///
    /// Collection order is preserved; it is the tie-break order for search.
    /// If two records share a name, lookup returns the later one.
    pub fn from_records(creatures: Vec<Creature>, spells: Vec<Spell>) -> Self {
        let creatures_by_name = creatures
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.to_lowercase(), i))
            .collect();
        let spells_by_name = spells
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.to_lowercase(), i))
            .collect();

        Self {
            creatures,
            spells,
            creatures_by_name,
            spells_by_name,
        }
    }

    /// Parse a corpus from in-memory markdown.
    ///
    /// Monsters come before animals in the creature collection.
    pub fn from_markdown(monsters: &str, animals: &str, spells: &str) -> Self {
        let mut creatures = parse_creatures(&normalize_newlines(monsters), CreatureSource::Monster);
        creatures.extend(parse_creatures(
            &normalize_newlines(animals),
            CreatureSource::Animal,
        ));
        let spells = parse_spells(&normalize_newlines(spells));

        Self::from_records(creatures, spells)
    }

    /// Load and parse the corpus files named by `config`.
    ///
    /// Never fails. A file that cannot be read is logged and contributes no
    /// records, so a missing spells chapter leaves creature search working.
    pub async fn load(config: &SrdConfig) -> Self {
        let (monsters, animals, spells) = tokio::join!(
            read_source(config.monsters_path()),
            read_source(config.animals_path()),
            read_source(config.spells_path()),
        );

        let corpus = Self::from_markdown(
            &or_empty(monsters),
            &or_empty(animals),
            &or_empty(spells),
        );

        tracing::info!(
            creatures = corpus.creatures.len(),
            spells = corpus.spells.len(),
            dir = %config.srd_dir.display(),
            "loaded SRD corpus"
        );
        corpus
    }

    /// All creatures, monsters first, in corpus order.
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    /// All spells in corpus order.
    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    /// Look up a creature record by name (case-insensitive).
    pub fn creature(&self, name: &str) -> Option<&Creature> {
        self.creatures_by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.creatures[i])
    }

    /// Look up a spell record by name (case-insensitive).
    pub fn spell(&self, name: &str) -> Option<&Spell> {
        self.spells_by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.spells[i])
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty() && self.spells.is_empty()
    }

    /// Report every record whose fields fell back to defaults.
    pub fn audit(&self) -> CorpusAudit {
        let creatures = self
            .creatures
            .iter()
            .filter(|c| !c.defaulted.is_empty())
            .map(|c| AuditEntry {
                name: c.name.clone(),
                fields: c.defaulted.clone(),
            })
            .collect();
        let spells = self
            .spells
            .iter()
            .filter(|s| !s.defaulted.is_empty())
            .map(|s| AuditEntry {
                name: s.name.clone(),
                fields: s.defaulted.clone(),
            })
            .collect();

        CorpusAudit { creatures, spells }
    }
}

/// Records with defaulted fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusAudit {
    pub creatures: Vec<AuditEntry<CreatureField>>,
    pub spells: Vec<AuditEntry<SpellField>>,
}

/// One record and the fields that fell back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry<F> {
    pub name: String,
    pub fields: Vec<F>,
}

impl CorpusAudit {
    pub fn is_clean(&self) -> bool {
        self.creatures.is_empty() && self.spells.is_empty()
    }

    /// Spells whose spell line matched neither the cantrip nor the leveled
    /// form, and so report level 0 without being known cantrips.
    pub fn unclassified_spells(&self) -> impl Iterator<Item = &str> {
        self.spells
            .iter()
            .filter(|entry| entry.fields.contains(&SpellField::SpellLine))
            .map(|entry| entry.name.as_str())
    }
}

/// Read one corpus source file.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected, so one bad
/// byte costs at most the entry it appears in.
pub async fn read_source(path: impl AsRef<Path>) -> Result<String, SrdError> {
    let path = path.as_ref();
    let bytes = fs::read(path).await.map_err(|err| SrdError::io(path, err))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                valid_up_to = err.utf8_error().valid_up_to(),
                "SRD source is not valid UTF-8, decoding lossily"
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

fn or_empty(source: Result<String, SrdError>) -> String {
    source.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "SRD source unavailable, continuing without it");
        String::new()
    })
}
