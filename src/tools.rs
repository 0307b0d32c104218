//! Tools exposed to the conversational agent.
//!
//! A [`Tool`] is either [`Tool::Confirmed`] (the user must approve each call) or
//! [`Tool::Automatic`] (runs as soon as the agent asks for it). The
//! [`ToolDispatcher`] branches on that tag. Every failure is turned into a
//! [`ToolOutcome`] so nothing escapes across the tool boundary.

mod schedule;
#[cfg(feature = "client")]
mod tweets;

pub use schedule::{schedule_tools, MemoryScheduler, Schedule, ScheduledTask, Scheduler};
#[cfg(feature = "client")]
pub use tweets::twitter_tools;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};

pub const APPROVAL_YES: &str = "Yes, confirmed.";
pub const APPROVAL_NO: &str = "No, denied.";
pub const DENIED_MESSAGE: &str = "Error: User denied access to tool execution";

/// What the agent sees: name, description and a JSON Schema for the arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        ToolSchema {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, input: Value) -> Result<String>;
}

#[derive(Clone)]
pub enum Tool {
    Confirmed {
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    },
    Automatic {
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    },
}

impl Tool {
    pub fn confirmed(schema: ToolSchema, handler: impl ToolHandler + 'static) -> Self {
        Tool::Confirmed {
            schema,
            handler: Arc::new(handler),
        }
    }

    pub fn automatic(schema: ToolSchema, handler: impl ToolHandler + 'static) -> Self {
        Tool::Automatic {
            schema,
            handler: Arc::new(handler),
        }
    }

    pub fn schema(&self) -> &ToolSchema {
        match self {
            Tool::Confirmed { schema, .. } | Tool::Automatic { schema, .. } => schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.schema().name
    }

    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Tool::Confirmed { .. })
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.requires_confirmation() {
            "Confirmed"
        } else {
            "Automatic"
        };
        f.debug_struct(kind).field("schema", self.schema()).finish()
    }
}

/// One invocation requested by the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Approved,
    Denied,
}

impl Confirmation {
    /// Map the UI's approval reply; anything but an explicit yes is a denial.
    pub fn from_reply(reply: &str) -> Self {
        if reply == APPROVAL_YES {
            Confirmation::Approved
        } else {
            Confirmation::Denied
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ToolOutcome {
    Completed { call_id: String, output: String },
    Failed { call_id: String, message: String },
    AwaitingConfirmation(ToolCall),
    Denied { call_id: String, message: String },
}

impl ToolOutcome {
    fn failed(call: &ToolCall, message: impl Into<String>) -> Self {
        ToolOutcome::Failed {
            call_id: call.id.clone(),
            message: message.into(),
        }
    }
}

/// Description of a registered tool for the agent runtime.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDefinition<'a> {
    #[serde(flatten)]
    pub schema: &'a ToolSchema,
    pub requires_confirmation: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ToolDispatcher {
    tools: BTreeMap<String, Tool>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        ToolDispatcher::default()
    }

    pub fn with_tools<I: IntoIterator<Item = Tool>>(tools: I) -> Self {
        let mut dispatcher = ToolDispatcher::new();
        for tool in tools {
            dispatcher.register(tool);
        }
        dispatcher
    }

    /// Registering a name twice replaces the earlier tool.
    pub fn register(&mut self, tool: Tool) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition<'_>> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                schema: tool.schema(),
                requires_confirmation: tool.requires_confirmation(),
            })
            .collect()
    }

    pub fn requiring_confirmation(&self) -> Vec<&str> {
        self.tools
            .values()
            .filter(|tool| tool.requires_confirmation())
            .map(Tool::name)
            .collect()
    }

    /// Run automatic tools now; park confirmed ones until [`resolve`](Self::resolve).
    pub async fn dispatch(&self, call: ToolCall) -> ToolOutcome {
        match self.tools.get(&call.name) {
            None => {
                let message = format!("Unknown tool: {}", call.name);
                ToolOutcome::failed(&call, message)
            }
            Some(Tool::Confirmed { .. }) => {
                tracing::debug!(tool = %call.name, call_id = %call.id, "awaiting confirmation");
                ToolOutcome::AwaitingConfirmation(call)
            }
            Some(Tool::Automatic { handler, .. }) => run(handler.as_ref(), call).await,
        }
    }

    /// Complete a confirmed call with the user's decision.
    pub async fn resolve(&self, call: ToolCall, decision: Confirmation) -> ToolOutcome {
        match self.tools.get(&call.name) {
            None => {
                let message = format!("Unknown tool: {}", call.name);
                ToolOutcome::failed(&call, message)
            }
            Some(Tool::Automatic { .. }) => {
                let message = format!("{} does not require confirmation", call.name);
                ToolOutcome::failed(&call, message)
            }
            Some(Tool::Confirmed { handler, .. }) => match decision {
                Confirmation::Approved => run(handler.as_ref(), call).await,
                Confirmation::Denied => {
                    tracing::debug!(tool = %call.name, call_id = %call.id, "denied by user");
                    ToolOutcome::Denied {
                        call_id: call.id,
                        message: DENIED_MESSAGE.to_string(),
                    }
                }
            },
        }
    }
}

async fn run(handler: &dyn ToolHandler, call: ToolCall) -> ToolOutcome {
    let ToolCall {
        id,
        name,
        arguments,
    } = call;
    match handler.call(arguments).await {
        Ok(output) => ToolOutcome::Completed {
            call_id: id,
            output,
        },
        Err(e) => {
            tracing::warn!(tool = %name, call_id = %id, error = %e, "tool execution failed");
            ToolOutcome::Failed {
                call_id: id,
                message: format!("Error running {}: {}", name, e),
            }
        }
    }
}

pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T> {
    // agents sometimes omit the arguments object entirely
    let input = if input.is_null() {
        Value::Object(Default::default())
    } else {
        input
    };
    serde_json::from_value(input)
        .map_err(|e| Error::InvalidParameter(format!("invalid arguments for {}: {}", tool, e)))
}

/// Every tool the agent is offered: tweet composition and timeline reads
/// plus the scheduling tools.
#[cfg(feature = "client")]
pub fn default_dispatcher(
    client: Arc<crate::twitter::TwitterClient>,
    scheduler: Arc<dyn Scheduler>,
) -> ToolDispatcher {
    ToolDispatcher::with_tools(twitter_tools(client).into_iter().chain(schedule_tools(scheduler)))
}
