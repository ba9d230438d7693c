//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Alfred: a tool-routing vision assistant
#[derive(Parser, Debug)]
#[command(name = "alfred", version, about = "Alfred: image text extraction, CSV analysis and arithmetic behind an LLM planner")]
pub struct Cli {
    /// TOML config file, applied under environment variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web endpoint
    Serve(ServeArgs),
    /// Ask a single question from the terminal
    Ask(AskArgs),
}

/// Arguments for `alfred serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides ALFRED_BIND)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for `alfred ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The request, e.g. "average of column Age"
    pub query: String,

    /// Image to make available to extract_text
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// CSV file to make available to analyze_csv
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Print each tool call and result to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_bind() {
        let cli = Cli::parse_from(["alfred", "serve", "--bind", "0.0.0.0:9000"]);
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_ask_with_files() {
        let cli = Cli::parse_from([
            "alfred",
            "--config",
            "alfred.toml",
            "ask",
            "summarize data",
            "--csv",
            "data.csv",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("alfred.toml")));
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.query, "summarize data");
                assert_eq!(args.csv, Some(PathBuf::from("data.csv")));
                assert_eq!(args.image, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
