// src/entity/task.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// A caller-supplied task record.
///
/// The store only interprets `id` and `category`; every other field is passed
/// through as-is, in its original key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task(Map<String, Value>);

impl Task {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// The `category` field, when present and a string.
    pub fn category(&self) -> Option<&str> {
        self.0.get("category").and_then(Value::as_str)
    }

    /// Key used to detect id collisions. The id's JSON text is used so that
    /// `1` and `"1"` stay distinct.
    pub fn id_key(&self) -> Option<String> {
        self.id().map(Value::to_string)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// What `append_tasks` accepts: one record or a list of records.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskPayload {
    One(Task),
    Many(Vec<Task>),
}

impl TaskPayload {
    /// Interpret an arbitrary JSON value as a payload.
    ///
    /// Objects become a single task; arrays must contain only objects.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(TaskPayload::One(Task(fields))),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(fields) => Ok(Task(fields)),
                    other => Err(StoreError::InvalidPayload(format!(
                        "element {} is {}, expected an object",
                        i,
                        kind(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(TaskPayload::Many),
            other => Err(StoreError::InvalidPayload(format!(
                "expected an object or a list of objects, got {}",
                kind(&other)
            ))),
        }
    }

    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskPayload::One(task) => vec![task],
            TaskPayload::Many(tasks) => tasks,
        }
    }
}

impl From<Task> for TaskPayload {
    fn from(task: Task) -> Self {
        TaskPayload::One(task)
    }
}

impl From<Vec<Task>> for TaskPayload {
    fn from(tasks: Vec<Task>) -> Self {
        TaskPayload::Many(tasks)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
