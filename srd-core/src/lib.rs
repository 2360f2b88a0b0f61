//! D&D 5e SRD reference data: parser, search, and lookup tools.
//!
//! This crate provides:
//! - Lenient parsing of the SRD monster, animal, and spell chapters
//! - Filtered search returning compact summaries, capped at 20 results
//! - Case-insensitive exact lookup of a full stat block or spell text
//! - Tool declarations and a dispatcher for tool-calling language models
//!
//! # Quick Start
//!
//! ```ignore
//! use srd_core::{CreatureFilter, SrdConfig, SrdCorpus};
//!
//! #[tokio::main]
//! async fn main() {
//!     let corpus = SrdCorpus::load(&SrdConfig::from_env()).await;
//!
//!     let filter = CreatureFilter {
//!         creature_type: Some("Undead".to_string()),
//!         cr_max: Some(3.0),
//!         ..Default::default()
//!     };
//!     for summary in corpus.search_creatures(&filter) {
//!         println!("{} (CR {})", summary.name, summary.challenge_rating);
//!     }
//!
//!     if let Some(stat_block) = corpus.get_creature("wight") {
//!         println!("{stat_block}");
//!     }
//! }
//! ```

// Lets `#[derive(Tool)]` refer to `srd_core::ToolDefinition` from inside this crate.
extern crate self as srd_core;

pub mod config;
pub mod corpus;
pub mod creature;
pub mod error;
pub mod markdown;
pub mod rules_context;
pub mod search;
pub mod spell;
pub mod testing;
pub mod tools;

// Re-export for convenience
pub use srd_macros::Tool;

// Primary public API
pub use config::SrdConfig;
pub use corpus::{AuditEntry, CorpusAudit, SrdCorpus};
pub use creature::{Creature, CreatureField, CreatureSource};
pub use error::SrdError;
pub use rules_context::{RulesContext, RulesDocument};
pub use search::{CreatureFilter, CreatureSummary, SpellFilter, SpellSummary, MAX_RESULTS};
pub use spell::{Spell, SpellField};
pub use tools::{GetCreature, GetSpell, SrdTools, ToolDefinition, ToolOutcome};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// Look up a magic item by name
    #[derive(Tool, Deserialize)]
    #[tool(name = "getMagicItem")]
    struct GetMagicItem {
        /// Exact item name like "Bag of Holding"
        name: String,
        /// Optional rarity hint
        rarity: Option<String>,
        /// Minimum attunement slots
        #[serde(rename = "minSlots")]
        min_slots: Option<u8>,
    }

    /// Count matching entries
    #[derive(Tool, Deserialize)]
    struct CountEntries {
        query: String,
    }

    #[test]
    fn test_tool_derive() {
        assert_eq!(GetMagicItem::tool_name(), "getMagicItem");
        assert_eq!(GetMagicItem::tool_description(), "Look up a magic item by name");
        assert_eq!(CountEntries::tool_name(), "count_entries");
    }

    #[test]
    fn test_tool_schema() {
        let schema = GetMagicItem::input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["properties"]["rarity"]["type"], "string");
        assert_eq!(schema["properties"]["minSlots"]["type"], "integer");
        assert!(schema["properties"].get("min_slots").is_none());

        // name is required, the Option fields are not
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "name"));
        assert!(!required.iter().any(|v| v == "rarity"));
        assert!(!required.iter().any(|v| v == "minSlots"));
    }

    #[test]
    fn test_tool_as_tool() {
        let tool = GetMagicItem::as_tool();
        assert_eq!(tool.name, "getMagicItem");
        assert!(!tool.description.is_empty());
    }
}
