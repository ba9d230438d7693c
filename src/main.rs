//! Alfred CLI binary entry point.

use std::sync::Arc;

use alfred::agent_loop::{AgentLoop, AgentState, LoopEvent, LoopEventPayload, RunStatus};
use alfred::cli::{AskArgs, Cli, Commands};
use alfred::config::AlfredConfig;
use alfred::error::AlfredError;
use alfred::types::ModelMessage;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AlfredError> {
    let mut config = AlfredConfig::load(cli.config.as_deref())?;
    alfred::logging::init(config.log_file.as_deref())?;

    match cli.command {
        Commands::Serve(args) => {
            if let Some(bind) = args.bind {
                config.bind = bind;
            }
            alfred::server::serve(&config).await
        }
        Commands::Ask(args) => handle_ask(&config, args).await,
    }
}

async fn handle_ask(config: &AlfredConfig, args: AskArgs) -> Result<(), AlfredError> {
    let mut agent = AgentLoop::from_config(config)?;
    if args.verbose {
        agent = agent.with_event_sink(Arc::new(|event: LoopEvent| match &event.payload {
            LoopEventPayload::ToolCallStarted { call } => {
                eprintln!("> {} {}", call.name, call.arguments);
            }
            LoopEventPayload::ToolResult { result } => {
                eprintln!("< {}", result.content);
            }
            _ => {}
        }));
    }

    let mut state = AgentState::new(vec![ModelMessage::user(args.query)]);
    state.input_file = args.image;
    state.input_csv = args.csv;

    let outcome = agent.run(state).await;
    let response = outcome.response().ok_or(AlfredError::EmptyResponse)?;
    println!("{response}");

    if outcome.status == RunStatus::IterationLimit {
        std::process::exit(2);
    }
    Ok(())
}
