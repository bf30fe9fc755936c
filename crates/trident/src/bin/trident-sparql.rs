//! trident-sparql - run one SPARQL query against a Trident database
//!
//! Loads the database, prints the engine's JSON result, unloads.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use trident::{Trident, TridentError};
use trident_core::tracing_setup::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "trident-sparql")]
#[command(version, about = "Run a SPARQL query against a Trident database", long_about = None)]
struct Args {
    /// Path of the database directory
    db: PathBuf,

    /// SPARQL query text
    query: String,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, TridentError> {
    let mut trident = Trident::new()?;
    trident.load(&args.db)?;
    let json = trident.sparql(&args.query)?;
    trident.unload()?;
    trident_loader::runtime::shutdown();

    if args.pretty {
        let value: serde_json::Value = serde_json::from_str(&json)
            .map_err(|e| TridentError::MalformedResult(e.to_string()))?;
        serde_json::to_string_pretty(&value).map_err(|e| TridentError::MalformedResult(e.to_string()))
    } else {
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_positional_arguments() {
        let args = Args::try_parse_from(["trident-sparql", "/data/lubm1", "SELECT ?s WHERE { ?s ?p ?o }"])
            .unwrap();
        assert_eq!(args.db, PathBuf::from("/data/lubm1"));
        assert_eq!(args.query, "SELECT ?s WHERE { ?s ?p ?o }");
        assert!(!args.pretty);
    }

    #[test]
    fn test_pretty_flag() {
        let args = Args::try_parse_from(["trident-sparql", "--pretty", "/data/db", "ASK {}"]).unwrap();
        assert!(args.pretty);
    }

    #[test]
    fn test_query_is_required() {
        assert!(Args::try_parse_from(["trident-sparql", "/data/db"]).is_err());
    }

    #[test]
    fn test_args_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
