use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{new_id, now, serialize_timestamp, validate_name, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: TodoStatus,
    pub progress: TodoProgress,
    #[serde(alias = "createAt", serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updateAt", serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(input: CreateTodoInput) -> Self {
        let stamp = now();
        Self {
            id: new_id(),
            project_id: input.project_id,
            name: input.name,
            description: input.description.unwrap_or_default(),
            status: input.status,
            progress: input.progress,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// Applies every supplied field and advances `updated_at`.
    ///
    /// A field is replaced whenever it is present, so `Some(String::new())`
    /// clears the description.
    pub fn apply(&mut self, input: UpdateTodoInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if let Some(progress) = input.progress {
            self.progress = progress;
        }
        self.updated_at = now();
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TodoProgress {
    Low,
    Medium,
    High,
}

impl TodoProgress {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Status selector for `list_all_todos`. `All` keeps every todo.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, status: TodoStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == TodoStatus::Pending,
            Self::InProgress => status == TodoStatus::InProgress,
            Self::Completed => status == TodoStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoInput {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub progress: TodoProgress,
}

impl CreateTodoInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodoInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub progress: Option<TodoProgress>,
}

impl UpdateTodoInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}
