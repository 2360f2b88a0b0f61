//! D&D 5e SRD lookup from the command line.
//!
//! Searches print compact JSON summaries; `creature` and `spell` print one
//! full entry. The `tool` command runs the same dispatcher a language model
//! would call:
//!
//! ```bash
//! cargo run -p srd-cli -- creatures --type Undead --cr-max 3
//! cargo run -p srd-cli -- tool getCreature '{"name": "Wight"}'
//! ```

mod cli;

use cli::{CliError, Command};
use serde::Serialize;
use srd_core::{RulesContext, SrdConfig, SrdCorpus, SrdError, SrdTools};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srd=info,srd_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(CliError::Usage(message)) => {
            eprintln!("Error: {message}");
            eprintln!("Run `srd --help` for usage.");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };

    let mut config = SrdConfig::from_env();
    if let Some(dir) = cli.srd_dir {
        config = config.with_srd_dir(dir);
    }

    match cli.command {
        Command::Help => print_help(),
        Command::Creatures(filter) => {
            let corpus = SrdCorpus::load(&config).await;
            print_json(&corpus.search_creatures(&filter))?;
        }
        Command::Creature(name) => {
            let corpus = SrdCorpus::load(&config).await;
            match corpus.get_creature(&name) {
                Some(stat_block) => println!("{stat_block}"),
                None => not_found("Creature", &name),
            }
        }
        Command::Spells(filter) => {
            let corpus = SrdCorpus::load(&config).await;
            print_json(&corpus.search_spells(&filter))?;
        }
        Command::Spell(name) => {
            let corpus = SrdCorpus::load(&config).await;
            match corpus.get_spell(&name) {
                Some(spell) => println!("{spell}"),
                None => not_found("Spell", &name),
            }
        }
        Command::Tools => print_json(&SrdTools::all())?,
        Command::Tool { name, input } => {
            let corpus = SrdCorpus::load(&config).await;
            let outcome = SrdTools::execute(&corpus, &name, &input);
            print_json(&outcome.to_value())?;
            if outcome.is_error() {
                std::process::exit(1);
            }
        }
        Command::Audit => {
            let corpus = SrdCorpus::load(&config).await;
            let audit = corpus.audit();
            print_json(&audit)?;
            let unclassified: Vec<_> = audit.unclassified_spells().collect();
            if !unclassified.is_empty() {
                tracing::warn!(spells = ?unclassified, "spells with an unrecognized spell line");
            }
        }
        Command::Rules => {
            let context = RulesContext::load(&config).await;
            println!("{}", context.render());
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), SrdError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(kind: &str, name: &str) -> ! {
    eprintln!("{kind} \"{name}\" not found in the SRD.");
    std::process::exit(1);
}

fn print_help() {
    println!("srd - D&D 5e SRD search and lookup");
    println!();
    println!("USAGE:");
    println!("  srd [--srd-dir <DIR>] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("  creatures [FILTERS]     Search monsters and animals (max 20, by CR)");
    println!("  creature <NAME>         Print one full stat block");
    println!("  spells [FILTERS]        Search spells (max 20, by level)");
    println!("  spell <NAME>            Print one full spell description");
    println!("  tools                   Print the tool declarations as JSON");
    println!("  tool <NAME> [JSON]      Run a tool call and print its JSON outcome");
    println!("  audit                   List entries whose fields fell back to defaults");
    println!("  rules                   Print the rulebook context text");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help              Show this help message");
    println!("  --srd-dir <DIR>         SRD markdown directory (default: $SRD_DIR or ./srd)");
    println!();
    println!("CREATURE FILTERS:");
    println!("  --query <TEXT>  --type <TYPE>  --size <SIZE>  --source <monster|animal>");
    println!("  --cr-min <CR>  --cr-max <CR>   (fractions like 1/4 accepted)");
    println!();
    println!("SPELL FILTERS:");
    println!("  --query <TEXT>  --school <SCHOOL>  --class <CLASS>  --concentration <BOOL>");
    println!("  --level-min <N>  --level-max <N>");
    println!();
    println!("EXAMPLES:");
    println!("  srd creatures --type Undead --cr-max 3");
    println!("  srd creature adult red dragon");
    println!("  srd spells --class Wizard --level-max 0");
    println!("  srd tool searchSpells '{{\"school\": \"Evocation\"}}'");
}
