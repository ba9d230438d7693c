//! Run event types.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AgentToolCall, AgentToolResult};

use super::types::RunId;

/// Concrete event payloads emitted by the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopEventPayload {
    Started,
    Planned {
        iteration: usize,
        tool_call: Option<AgentToolCall>,
    },
    ToolCallStarted {
        call: AgentToolCall,
    },
    ToolResult {
        result: AgentToolResult,
    },
    Completed {
        iterations: usize,
    },
    IterationLimit {
        limit: usize,
    },
}

/// Envelope for run events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopEvent {
    pub run_id: RunId,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: LoopEventPayload,
}

/// Callback receiving run events.
pub type LoopEventSink = Arc<dyn Fn(LoopEvent) + Send + Sync>;

pub(crate) struct LoopEventEmitter {
    run_id: RunId,
    seq: AtomicU64,
    sink: Option<LoopEventSink>,
}

impl LoopEventEmitter {
    pub(crate) fn new(run_id: RunId, sink: Option<LoopEventSink>) -> Self {
        Self {
            run_id,
            seq: AtomicU64::new(1),
            sink,
        }
    }

    pub(crate) fn emit(&self, payload: LoopEventPayload) {
        let Some(sink) = &self.sink else {
            return;
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        (sink)(LoopEvent {
            run_id: self.run_id,
            seq,
            timestamp: Utc::now(),
            payload,
        });
    }
}
