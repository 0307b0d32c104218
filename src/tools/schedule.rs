use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::tools::{parse_input, Tool, ToolHandler, ToolSchema};

/// When a task should fire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Schedule {
    Scheduled {
        date: DateTime<Utc>,
    },
    Delayed {
        #[serde(rename = "delayInSeconds")]
        delay_in_seconds: u64,
    },
    Cron {
        cron: String,
    },
    NoSchedule,
}

impl Schedule {
    pub fn kind(&self) -> &'static str {
        match self {
            Schedule::Scheduled { .. } => "scheduled",
            Schedule::Delayed { .. } => "delayed",
            Schedule::Cron { .. } => "cron",
            Schedule::NoSchedule => "no-schedule",
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Scheduled { date } => write!(f, "{}", date.to_rfc3339()),
            Schedule::Delayed { delay_in_seconds } => write!(f, "{}", delay_in_seconds),
            Schedule::Cron { cron } => f.write_str(cron),
            Schedule::NoSchedule => f.write_str("none"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: String,
    pub description: String,
    pub when: Schedule,
    pub created_at: DateTime<Utc>,
}

/// Boundary to the agent runtime that owns task persistence and execution.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn schedule(&self, when: &Schedule, description: &str) -> Result<ScheduledTask>;

    async fn list(&self) -> Result<Vec<ScheduledTask>>;

    /// `Ok(false)` when no task has that id.
    async fn cancel(&self, id: &str) -> Result<bool>;
}

/// In-process scheduler; tasks live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        MemoryScheduler::default()
    }
}

#[async_trait]
impl Scheduler for MemoryScheduler {
    async fn schedule(&self, when: &Schedule, description: &str) -> Result<ScheduledTask> {
        match when {
            Schedule::NoSchedule => {
                return Err(Error::InvalidParameter("Not a valid schedule input".into()))
            }
            Schedule::Cron { cron } if cron.trim().is_empty() => {
                return Err(Error::InvalidParameter("cron expression is empty".into()))
            }
            _ => {}
        }
        let task = ScheduledTask {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            when: when.clone(),
            created_at: Utc::now(),
        };
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.clone());
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<ScheduledTask>> {
        Ok(self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn cancel(&self, id: &str) -> Result<bool> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }
}

#[derive(Deserialize)]
struct ScheduleTaskInput {
    when: Schedule,
    description: String,
}

struct ScheduleTask(Arc<dyn Scheduler>);

#[async_trait]
impl ToolHandler for ScheduleTask {
    async fn call(&self, input: Value) -> Result<String> {
        let input: ScheduleTaskInput = parse_input("scheduleTask", input)?;
        if input.when == Schedule::NoSchedule {
            return Ok("Not a valid schedule input".to_string());
        }
        let task = self.0.schedule(&input.when, &input.description).await?;
        tracing::debug!(id = %task.id, kind = task.when.kind(), "task scheduled");
        Ok(format!(
            "Task scheduled for type \"{}\" : {}",
            task.when.kind(),
            task.when
        ))
    }
}

struct GetScheduledTasks(Arc<dyn Scheduler>);

#[async_trait]
impl ToolHandler for GetScheduledTasks {
    async fn call(&self, _input: Value) -> Result<String> {
        let tasks = self.0.list().await?;
        if tasks.is_empty() {
            return Ok("No scheduled tasks found.".to_string());
        }
        Ok(tasks
            .iter()
            .map(|t| format!("{}: {} ({} {})", t.id, t.description, t.when.kind(), t.when))
            .collect::<Vec<String>>()
            .join("\n"))
    }
}

#[derive(Deserialize)]
struct CancelInput {
    #[serde(rename = "taskId")]
    task_id: String,
}

struct CancelScheduledTask(Arc<dyn Scheduler>);

#[async_trait]
impl ToolHandler for CancelScheduledTask {
    async fn call(&self, input: Value) -> Result<String> {
        let CancelInput { task_id } = parse_input("cancelScheduledTask", input)?;
        if self.0.cancel(&task_id).await? {
            Ok(format!("Task {} has been successfully canceled.", task_id))
        } else {
            Err(Error::InvalidParameter(format!(
                "no scheduled task with id {}",
                task_id
            )))
        }
    }
}

/// `scheduleTask`, `getScheduledTasks` and `cancelScheduledTask`; all automatic.
pub fn schedule_tools(scheduler: Arc<dyn Scheduler>) -> Vec<Tool> {
    vec![
        Tool::automatic(
            ToolSchema::new(
                "scheduleTask",
                "A tool to schedule a task to be executed at a later time",
                json!({
                    "type": "object",
                    "properties": {
                        "description": {"type": "string"},
                        "when": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["scheduled", "delayed", "cron", "no-schedule"]
                                },
                                "date": {"type": "string", "format": "date-time"},
                                "delayInSeconds": {"type": "integer", "minimum": 0},
                                "cron": {"type": "string"}
                            },
                            "required": ["type"]
                        }
                    },
                    "required": ["description", "when"]
                }),
            ),
            ScheduleTask(scheduler.clone()),
        ),
        Tool::automatic(
            ToolSchema::new(
                "getScheduledTasks",
                "List all tasks that have been scheduled",
                json!({"type": "object", "properties": {}}),
            ),
            GetScheduledTasks(scheduler.clone()),
        ),
        Tool::automatic(
            ToolSchema::new(
                "cancelScheduledTask",
                "Cancel a scheduled task using its ID",
                json!({
                    "type": "object",
                    "properties": {
                        "taskId": {"type": "string", "description": "The ID of the task to cancel"}
                    },
                    "required": ["taskId"]
                }),
            ),
            CancelScheduledTask(scheduler),
        ),
    ]
}
