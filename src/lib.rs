//! Alfred: a conversational assistant that routes requests to image text
//! extraction, CSV analysis and division through an LLM planner.
//!
//! The core is [`agent_loop::AgentLoop`], which alternates a planning step
//! (one model call) with dispatch of at most one requested tool until the
//! planner answers without a tool call.
//!
//! # Quick Start
//!
//! ```no_run
//! use alfred::prelude::*;
//!
//! # async fn example() -> alfred::error::Result<()> {
//! let config = AlfredConfig::load(None)?;
//! let agent = AgentLoop::from_config(&config)?;
//! let state = AgentState::new(vec![ModelMessage::user("divide 10 by 4")]);
//! let outcome = agent.run(state).await;
//! println!("{}", outcome.response().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent_loop;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod server;
pub mod session;
pub mod table;
pub mod tools;
pub mod types;
pub mod uploads;
