//! Integration tests for the two-phase tool protocol: search, then look up.
//!
//! Run with: `cargo test -p srd-core --test tool_dispatch`

use serde_json::{json, Value};
use srd_core::testing::{bulk_monsters, sample_corpus};
use srd_core::{SrdCorpus, SrdTools, ToolOutcome, MAX_RESULTS};

fn result_names(outcome: &ToolOutcome) -> Vec<String> {
    outcome.to_value()["results"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_search_then_lookup_creature() {
    let corpus = sample_corpus();

    let search = SrdTools::execute(&corpus, "searchCreatures", &json!({"query": "life drain"}));
    let names = result_names(&search);
    assert_eq!(names, vec!["Wight"]);

    let lookup = SrdTools::execute(&corpus, "getCreature", &json!({"name": names[0]}));
    let stat_block = lookup.to_value()["statBlock"]
        .as_str()
        .expect("stat block returned")
        .to_string();
    assert!(stat_block.starts_with("## Wight"));
    assert!(stat_block.contains("Life Drain"));
}

#[test]
fn test_search_then_lookup_spell() {
    let corpus = sample_corpus();

    let search = SrdTools::execute(
        &corpus,
        "searchSpells",
        &json!({"school": "Evocation", "level_min": 1, "class_name": "wizard"}),
    );
    assert_eq!(result_names(&search), vec!["Fireball"]);

    let lookup = SrdTools::execute(&corpus, "getSpell", &json!({"name": "fireball"}));
    assert!(lookup.to_value()["spell"]
        .as_str()
        .is_some_and(|text| text.contains("20-foot-radius Sphere")));
}

#[test]
fn test_summaries_omit_full_text() {
    let corpus = sample_corpus();
    for tool in ["searchCreatures", "searchSpells"] {
        let value = SrdTools::execute(&corpus, tool, &json!({})).to_value();
        let rows = value["results"].as_array().expect("results array");
        assert!(!rows.is_empty());
        for row in rows {
            let keys: Vec<_> = row.as_object().expect("row object").keys().collect();
            assert!(!keys.iter().any(|k| k.as_str() == "fullText" || k.as_str() == "full_text"));
        }
    }
}

#[test]
fn test_search_results_capped() {
    let corpus = SrdCorpus::from_markdown(&bulk_monsters(50), "", "");
    let outcome = SrdTools::execute(&corpus, "searchCreatures", &Value::Null);
    assert_eq!(result_names(&outcome).len(), MAX_RESULTS);
}

#[test]
fn test_model_style_arguments() {
    let corpus = sample_corpus();

    // Models often send numbers as strings and blanks for unused filters.
    let outcome = SrdTools::execute(
        &corpus,
        "searchCreatures",
        &json!({"cr_min": "1/8", "cr_max": "0.25", "type": "", "size": "small"}),
    );
    assert_eq!(result_names(&outcome), vec!["Giant Rat", "Goblin Warrior"]);

    let outcome = SrdTools::execute(&corpus, "searchSpells", &json!({"concentration": "true"}));
    assert_eq!(result_names(&outcome), vec!["Bless", "Hold Person"]);
}

#[test]
fn test_error_outcomes_are_distinct_from_results() {
    let corpus = sample_corpus();

    let missing = SrdTools::execute(&corpus, "getCreature", &json!({"name": "Beholder"}));
    assert_eq!(
        missing.to_value(),
        json!({"error": "Creature \"Beholder\" not found in the SRD."})
    );

    let empty = SrdTools::execute(&corpus, "searchCreatures", &json!({"query": "beholder"}));
    assert!(!empty.is_error());
    assert_eq!(empty.to_value(), json!({"results": []}));

    let unknown = SrdTools::execute(&corpus, "castSpell", &json!({}));
    assert_eq!(unknown.to_value(), json!({"error": "Unknown tool: castSpell"}));
}
