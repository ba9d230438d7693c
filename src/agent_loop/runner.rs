//! The plan/dispatch control loop.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AlfredConfig;
use crate::error::AlfredError;
use crate::provider::{self, ModelProvider, ModelRole};
use crate::tools::{default_tools, Tool};
use crate::types::{ContentPart, ModelMessage, Usage};

use super::dispatch::Dispatcher;
use super::events::{LoopEventEmitter, LoopEventPayload, LoopEventSink};
use super::planner::Planner;
use super::types::{AgentState, LoopOutcome, LoopState, RunStatus};

/// Planner turns allowed per run unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Alternates planning and dispatch until the planner stops requesting tools.
pub struct AgentLoop {
    planner: Planner,
    dispatcher: Dispatcher,
    max_iterations: usize,
    event_sink: Option<LoopEventSink>,
}

impl AgentLoop {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            planner: Planner::new(provider, &tools),
            dispatcher: Dispatcher::new(tools),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            event_sink: None,
        }
    }

    /// Planner and vision providers from `config`, with the standard tools.
    pub fn from_config(config: &AlfredConfig) -> Result<Self, AlfredError> {
        let planner = provider::create_provider(config, ModelRole::Planner)?;
        let vision = provider::create_provider(config, ModelRole::Vision)?;
        info!(
            planner = planner.model_id(),
            vision = vision.model_id(),
            "providers ready"
        );
        Ok(Self::new(planner, default_tools(vision)).with_max_iterations(config.max_iterations))
    }

    /// Ceiling on planner turns; values below one are raised to one.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_event_sink(mut self, sink: LoopEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Run to completion. File references in `state` are passed through untouched.
    pub async fn run(&self, mut state: AgentState) -> LoopOutcome {
        let run_id = Uuid::new_v4();
        let emitter = LoopEventEmitter::new(run_id, self.event_sink.clone());
        emitter.emit(LoopEventPayload::Started);
        info!(%run_id, turns = state.messages.len(), "agent loop start");

        let mut usage = Usage::default();
        let mut iterations = 0usize;
        let mut loop_state = LoopState::Planning;

        let status = loop {
            loop_state = match loop_state {
                LoopState::Planning => {
                    if iterations >= self.max_iterations {
                        warn!(%run_id, limit = self.max_iterations, "tool loop exceeded max iterations");
                        state.messages.push(ModelMessage::system(format!(
                            "Error: tool loop exceeded {} iterations",
                            self.max_iterations
                        )));
                        emitter.emit(LoopEventPayload::IterationLimit {
                            limit: self.max_iterations,
                        });
                        break RunStatus::IterationLimit;
                    }
                    iterations += 1;

                    let output = self.planner.plan(&state).await;
                    usage.merge(&output.usage);
                    let next = match output.message.tool_calls().first() {
                        Some(call) => LoopState::Dispatching((*call).clone()),
                        None => LoopState::Done,
                    };
                    emitter.emit(LoopEventPayload::Planned {
                        iteration: iterations,
                        tool_call: match &next {
                            LoopState::Dispatching(call) => Some(call.clone()),
                            _ => None,
                        },
                    });
                    state.messages.push(output.message);
                    next
                }
                LoopState::Dispatching(call) => {
                    debug!(%run_id, tool = %call.name, call_id = %call.id, "dispatching");
                    emitter.emit(LoopEventPayload::ToolCallStarted { call: call.clone() });
                    let message = self.dispatcher.dispatch(&call).await;
                    if let Some(ContentPart::ToolResult(result)) =
                        message.content.first()
                    {
                        emitter.emit(LoopEventPayload::ToolResult {
                            result: result.clone(),
                        });
                    }
                    state.messages.push(message);
                    LoopState::Planning
                }
                LoopState::Done => {
                    emitter.emit(LoopEventPayload::Completed { iterations });
                    break RunStatus::Completed;
                }
            };
        };

        info!(%run_id, iterations, ?status, "agent loop finished");
        LoopOutcome {
            run_id,
            state,
            status,
            iterations,
            usage,
        }
    }
}

impl std::fmt::Debug for AgentLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoop")
            .field("dispatcher", &self.dispatcher)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
