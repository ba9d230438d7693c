//! Agent loop primitives (planner, dispatcher, runner, events).

pub mod dispatch;
pub mod events;
pub mod planner;
pub mod runner;
pub mod types;

pub use dispatch::Dispatcher;
pub use events::{LoopEvent, LoopEventPayload, LoopEventSink};
pub use planner::{Planner, PlannerOutput};
pub use runner::{AgentLoop, DEFAULT_MAX_ITERATIONS};
pub use types::*;
