//! Key layout of the flat key-value namespace.
//!
//! These strings are the persisted contract shared with existing data and
//! must not change. Ids are used verbatim, with no normalization.

/// Global index holding every live project id.
pub const PROJECT_LIST_KEY: &str = "projectList";

/// Primary project record. The key is the bare id.
pub fn project_key(id: &str) -> String {
    id.to_string()
}

pub fn todo_key(id: &str) -> String {
    format!("todo:{}", id)
}

/// Per-project index holding the ids of the project's todos.
pub fn todo_list_key(project_id: &str) -> String {
    format!("project:{}:todoList", project_id)
}
