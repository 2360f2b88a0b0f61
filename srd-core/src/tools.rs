//! SRD lookup tools for a tool-calling language model.
//!
//! The model discovers entries with `searchCreatures`/`searchSpells` and then
//! pulls one full entry with `getCreature`/`getSpell`. [`SrdTools::execute`]
//! turns a tool call into a JSON-ready [`ToolOutcome`]; it never fails, so
//! every call produces something the model can read.

use crate::corpus::SrdCorpus;
use crate::search::{CreatureFilter, CreatureSummary, SpellFilter, SpellSummary};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use srd_macros::Tool;

/// A tool declaration: name, description and JSON input schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Get the full stat block for a specific creature by exact name. Use after searching to get complete details.
#[derive(Debug, Clone, Deserialize, Tool)]
#[tool(name = "getCreature")]
pub struct GetCreature {
    /// Exact creature name, e.g. 'Aboleth', 'Goblin Warrior', 'Wolf'.
    pub name: String,
}

/// Get the full description of a specific spell by exact name.
#[derive(Debug, Clone, Deserialize, Tool)]
#[tool(name = "getSpell")]
pub struct GetSpell {
    /// Exact spell name, e.g. 'Fireball', 'Cure Wounds', 'Shield'.
    pub name: String,
}

/// The JSON-shaped result of one tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    Creatures { results: Vec<CreatureSummary> },
    Spells { results: Vec<SpellSummary> },
    StatBlock {
        #[serde(rename = "statBlock")]
        stat_block: String,
    },
    Spell { spell: String },
    Error { error: String },
}

impl ToolOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        ToolOutcome::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error { .. })
    }

    /// The outcome as a JSON object.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            let mut object = Map::new();
            object.insert("error".to_string(), Value::String(err.to_string()));
            Value::Object(object)
        })
    }
}

/// The SRD tool set.
pub struct SrdTools;

impl SrdTools {
    /// All tool declarations.
    pub fn all() -> Vec<ToolDefinition> {
        vec![
            CreatureFilter::as_tool(),
            GetCreature::as_tool(),
            SpellFilter::as_tool(),
            GetSpell::as_tool(),
        ]
    }

    /// Whether `name` is one of the SRD tools.
    pub fn is_srd_tool(name: &str) -> bool {
        Self::all().iter().any(|tool| tool.name == name)
    }

    /// Run one tool call against `corpus`.
    ///
    /// `input` is whatever the model sent; `null` counts as no arguments.
    pub fn execute(corpus: &SrdCorpus, name: &str, input: &Value) -> ToolOutcome {
        tracing::debug!(tool = name, input = %input, "executing SRD tool");

        match name {
            "searchCreatures" => match parse_args::<CreatureFilter>(name, input) {
                Ok(filter) => ToolOutcome::Creatures {
                    results: corpus.search_creatures(&filter),
                },
                Err(outcome) => outcome,
            },
            "getCreature" => match parse_args::<GetCreature>(name, input) {
                Ok(args) => match corpus.get_creature(&args.name) {
                    Some(text) => ToolOutcome::StatBlock {
                        stat_block: text.to_string(),
                    },
                    None => {
                        ToolOutcome::error(format!("Creature \"{}\" not found in the SRD.", args.name))
                    }
                },
                Err(outcome) => outcome,
            },
            "searchSpells" => match parse_args::<SpellFilter>(name, input) {
                Ok(filter) => ToolOutcome::Spells {
                    results: corpus.search_spells(&filter),
                },
                Err(outcome) => outcome,
            },
            "getSpell" => match parse_args::<GetSpell>(name, input) {
                Ok(args) => match corpus.get_spell(&args.name) {
                    Some(text) => ToolOutcome::Spell {
                        spell: text.to_string(),
                    },
                    None => ToolOutcome::error(format!("Spell \"{}\" not found in the SRD.", args.name)),
                },
                Err(outcome) => outcome,
            },
            _ => {
                tracing::warn!(tool = name, "unknown tool requested");
                ToolOutcome::error(format!("Unknown tool: {name}"))
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, input: &Value) -> Result<T, ToolOutcome> {
    let input = match input {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(input).map_err(|err| {
        tracing::debug!(tool, error = %err, "rejected tool arguments");
        ToolOutcome::error(format!("Invalid arguments for {tool}: {err}"))
    })
}
