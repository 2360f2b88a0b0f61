//! Command-line parsing.
//!
//! Search flags are collected as key/value pairs and handed to the same
//! `from_pairs` constructors a form handler would use.

use serde_json::Value;
use srd_core::{CreatureFilter, SpellFilter, SrdError, SrdTools};
use std::path::PathBuf;
use thiserror::Error;

/// Flags accepted by `creatures`.
const CREATURE_FLAGS: &[&str] = &["query", "type", "size", "source", "cr-min", "cr-max"];

/// Flags accepted by `spells`.
const SPELL_FLAGS: &[&str] = &[
    "query",
    "school",
    "class",
    "concentration",
    "level-min",
    "level-max",
];

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Srd(#[from] SrdError),
}

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    /// `--srd-dir` override.
    pub srd_dir: Option<PathBuf>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Creatures(CreatureFilter),
    Creature(String),
    Spells(SpellFilter),
    Spell(String),
    Tools,
    Tool { name: String, input: Value },
    Audit,
    Rules,
}

/// Parse `args` (including the program name at index 0).
pub fn parse_args(args: &[String]) -> Result<Cli, CliError> {
    let mut srd_dir = None;
    let mut rest = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                return Ok(Cli {
                    srd_dir,
                    command: Command::Help,
                })
            }
            "--srd-dir" => {
                let dir = args
                    .get(i + 1)
                    .ok_or_else(|| CliError::Usage("--srd-dir needs a directory".to_string()))?;
                srd_dir = Some(PathBuf::from(dir));
                i += 1;
            }
            other => rest.push(other.to_string()),
        }
        i += 1;
    }

    let Some((name, operands)) = rest.split_first() else {
        return Ok(Cli {
            srd_dir,
            command: Command::Help,
        });
    };

    let command = match name.as_str() {
        "creatures" => Command::Creatures(CreatureFilter::from_pairs(parse_flags(
            operands,
            CREATURE_FLAGS,
        )?)?),
        "creature" => Command::Creature(join_name(operands, "creature")?),
        "spells" => Command::Spells(SpellFilter::from_pairs(parse_flags(operands, SPELL_FLAGS)?)?),
        "spell" => Command::Spell(join_name(operands, "spell")?),
        "tools" => Command::Tools,
        "tool" => parse_tool(operands)?,
        "audit" => Command::Audit,
        "rules" => Command::Rules,
        other => return Err(CliError::Usage(format!("unknown command: {other}"))),
    };

    Ok(Cli { srd_dir, command })
}

/// `--flag value` pairs, restricted to `allowed`.
fn parse_flags(operands: &[String], allowed: &[&str]) -> Result<Vec<(String, String)>, CliError> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i < operands.len() {
        let flag = operands[i]
            .strip_prefix("--")
            .filter(|flag| allowed.contains(flag))
            .ok_or_else(|| CliError::Usage(format!("unexpected argument: {}", operands[i])))?;
        let value = operands
            .get(i + 1)
            .ok_or_else(|| CliError::Usage(format!("--{flag} needs a value")))?;
        pairs.push((flag.to_string(), value.clone()));
        i += 2;
    }
    Ok(pairs)
}

/// Multi-word names may be given unquoted: `srd creature adult red dragon`.
fn join_name(operands: &[String], what: &str) -> Result<String, CliError> {
    let name = operands.join(" ");
    if name.trim().is_empty() {
        return Err(CliError::Usage(format!("{what} needs a name")));
    }
    Ok(name.trim().to_string())
}

fn parse_tool(operands: &[String]) -> Result<Command, CliError> {
    let (name, input) = match operands {
        [name] => (name, Value::Null),
        [name, json] => (name, serde_json::from_str(json).map_err(SrdError::from)?),
        _ => {
            return Err(CliError::Usage(
                "tool needs a name and at most one JSON argument".to_string(),
            ))
        }
    };
    if !SrdTools::is_srd_tool(name) {
        return Err(CliError::Usage(format!(
            "unknown tool: {name} (run `srd tools` to list them)"
        )));
    }
    Ok(Command::Tool {
        name: name.clone(),
        input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(line: &str) -> Vec<String> {
        std::iter::once("srd")
            .chain(line.split_whitespace())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_no_command_is_help() {
        assert_eq!(parse_args(&args("")).unwrap().command, Command::Help);
        assert_eq!(parse_args(&args("spells --help")).unwrap().command, Command::Help);
    }

    #[test]
    fn test_creatures_flags() {
        let cli = parse_args(&args("creatures --type Undead --cr-min 1/4 --cr-max 3")).unwrap();
        let Command::Creatures(filter) = cli.command else {
            panic!("Expected creatures command");
        };
        assert_eq!(filter.creature_type.as_deref(), Some("Undead"));
        assert_eq!(filter.cr_min, Some(0.25));
        assert_eq!(filter.cr_max, Some(3.0));
    }

    #[test]
    fn test_spells_flags() {
        let cli = parse_args(&args("spells --class Wizard --concentration yes --level-max 2")).unwrap();
        let Command::Spells(filter) = cli.command else {
            panic!("Expected spells command");
        };
        assert_eq!(filter.class_name.as_deref(), Some("Wizard"));
        assert_eq!(filter.concentration, Some(true));
        assert_eq!(filter.level_max, Some(2.0));
    }

    #[test]
    fn test_global_srd_dir() {
        let cli = parse_args(&args("--srd-dir /data/srd creature adult red dragon")).unwrap();
        assert_eq!(cli.srd_dir, Some(PathBuf::from("/data/srd")));
        assert_eq!(cli.command, Command::Creature("adult red dragon".to_string()));
    }

    #[test]
    fn test_tool_command() {
        let cli = parse_args(&[
            "srd".to_string(),
            "tool".to_string(),
            "getSpell".to_string(),
            r#"{"name": "Shield"}"#.to_string(),
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Tool {
                name: "getSpell".to_string(),
                input: json!({"name": "Shield"}),
            }
        );

        let cli = parse_args(&args("tool searchSpells")).unwrap();
        assert_eq!(
            cli.command,
            Command::Tool {
                name: "searchSpells".to_string(),
                input: Value::Null,
            }
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(parse_args(&args("dragons")), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args("creature")), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args("creatures --school Evocation")), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args("creatures --type")), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args("tool getSpell {oops")), Err(CliError::Srd(SrdError::Json(_)))));
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let err = parse_args(&args("tool castSpell {}")).unwrap_err();
        match err {
            CliError::Usage(message) => assert!(message.contains("castSpell"), "{message}"),
            other => panic!("Expected usage error, got {:?}", other),
        }
        assert!(parse_args(&args("tool getCreature")).is_ok());
    }

    #[test]
    fn test_invalid_filter_value() {
        let err = parse_args(&args("spells --level-min high")).unwrap_err();
        assert!(matches!(
            err,
            CliError::Srd(SrdError::InvalidFilter { field: "level_min", .. })
        ));
    }
}
