use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now, serialize_timestamp, validate_name, Todo, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "createAt", serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updateAt", serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: CreateProjectInput) -> Self {
        let stamp = now();
        Self {
            id: new_id(),
            name: input.name,
            description: input.description.unwrap_or_default(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// Applies every supplied field and advances `updated_at`.
    pub fn apply(&mut self, input: UpdateProjectInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        self.updated_at = now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
}

impl CreateProjectInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithTodos {
    pub project: Project,
    pub todos: Vec<Todo>,
}
