//! Projects and todos over a flat key-value store.
//!
//! Each entity is its own record, and membership is kept in separate index
//! records (the global project list and one todo list per project) that are
//! rewritten wholesale on every change.
//!
//! Multi-key operations run their steps in sequence with no transaction and
//! no version check. A failure between two steps leaves the indexes out of
//! step with the primary records, and two callers mutating the same project
//! concurrently can lose index updates. Neither case is detected or repaired.
//! Reads tolerate dangling index entries by skipping them.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};
use crate::keys::{project_key, todo_key, todo_list_key, PROJECT_LIST_KEY};
use crate::models::*;
use crate::store::KvStore;

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn KvStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    // ============================================================
    // Projects
    // ============================================================

    pub fn create_project(&self, input: CreateProjectInput) -> CatalogResult<Project> {
        let project = Project::new(input);
        self.write(&project_key(&project.id), &project)?;

        let mut ids = self.read_id_list(PROJECT_LIST_KEY)?;
        ids.push(project.id.clone());
        self.write(PROJECT_LIST_KEY, &ids)?;

        tracing::debug!(project_id = %project.id, "Created project");
        Ok(project)
    }

    pub fn get_project(&self, project_id: &str) -> CatalogResult<ProjectWithTodos> {
        let project = self.require_project(project_id)?;
        let todos = self.get_todos_by_project_id(project_id)?;
        Ok(ProjectWithTodos { project, todos })
    }

    /// Every project in the global index, in creation order.
    pub fn list_projects(&self) -> CatalogResult<Vec<Project>> {
        let ids = self.read_id_list(PROJECT_LIST_KEY)?;
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            match self.read::<Project>(&project_key(&id))? {
                Some(project) => projects.push(project),
                None => tracing::warn!(project_id = %id, "Skipping dangling project index entry"),
            }
        }
        Ok(projects)
    }

    pub fn update_project(
        &self,
        project_id: &str,
        input: UpdateProjectInput,
    ) -> CatalogResult<Project> {
        let mut project = self.require_project(project_id)?;
        project.apply(input);
        self.write(&project_key(project_id), &project)?;

        tracing::debug!(project_id = %project_id, "Updated project");
        Ok(project)
    }

    /// Removes the project and every todo it owns.
    ///
    /// Todo records go first, then the todo index, the project record, and
    /// finally the global index entry. An interrupted delete therefore leaves
    /// at worst a project id in the global index with nothing behind it.
    pub fn delete_project(&self, project_id: &str) -> CatalogResult<()> {
        self.require_project(project_id)?;

        let todos = self.get_todos_by_project_id(project_id)?;
        for todo in &todos {
            self.store.delete(&todo_key(&todo.id))?;
        }
        self.store.delete(&todo_list_key(project_id))?;
        self.store.delete(&project_key(project_id))?;

        let mut ids = self.read_id_list(PROJECT_LIST_KEY)?;
        ids.retain(|id| id != project_id);
        self.write(PROJECT_LIST_KEY, &ids)?;

        tracing::debug!(
            project_id = %project_id,
            todos = todos.len(),
            "Deleted project"
        );
        Ok(())
    }

    // ============================================================
    // Todos
    // ============================================================

    /// Loads the todos listed in the project's index, in index order.
    ///
    /// A missing index reads as empty, and ids without a record are skipped.
    /// The project itself is not required to exist.
    pub fn get_todos_by_project_id(&self, project_id: &str) -> CatalogResult<Vec<Todo>> {
        let ids = self.read_id_list(&todo_list_key(project_id))?;
        let mut todos = Vec::with_capacity(ids.len());
        for id in ids {
            match self.read::<Todo>(&todo_key(&id))? {
                Some(todo) => todos.push(todo),
                None => tracing::warn!(
                    project_id = %project_id,
                    todo_id = %id,
                    "Skipping dangling todo index entry"
                ),
            }
        }
        Ok(todos)
    }

    /// Creates a todo under an existing project.
    pub fn create_todo(&self, input: CreateTodoInput) -> CatalogResult<Todo> {
        self.require_project(&input.project_id)?;

        let todo = Todo::new(input);
        self.write(&todo_key(&todo.id), &todo)?;

        let list_key = todo_list_key(&todo.project_id);
        let mut ids = self.read_id_list(&list_key)?;
        ids.push(todo.id.clone());
        self.write(&list_key, &ids)?;

        tracing::debug!(project_id = %todo.project_id, todo_id = %todo.id, "Created todo");
        Ok(todo)
    }

    pub fn get_todo(&self, todo_id: &str) -> CatalogResult<Todo> {
        self.read(&todo_key(todo_id))?
            .ok_or_else(|| CatalogError::TodoNotFound(todo_id.to_string()))
    }

    /// Rewrites the todo record only; index membership never changes.
    pub fn update_todo(&self, todo_id: &str, input: UpdateTodoInput) -> CatalogResult<Todo> {
        let mut todo = self.get_todo(todo_id)?;
        todo.apply(input);
        self.write(&todo_key(todo_id), &todo)?;

        tracing::debug!(
            todo_id = %todo_id,
            status = todo.status.as_str(),
            progress = todo.progress.as_str(),
            "Updated todo"
        );
        Ok(todo)
    }

    pub fn delete_todo(&self, todo_id: &str) -> CatalogResult<()> {
        let todo = self.get_todo(todo_id)?;
        self.store.delete(&todo_key(todo_id))?;

        let list_key = todo_list_key(&todo.project_id);
        let mut ids = self.read_id_list(&list_key)?;
        ids.retain(|id| id != todo_id);
        self.write(&list_key, &ids)?;

        tracing::debug!(project_id = %todo.project_id, todo_id = %todo_id, "Deleted todo");
        Ok(())
    }

    /// Todos of an existing project, filtered in memory by status.
    pub fn list_all_todos(
        &self,
        project_id: &str,
        filter: StatusFilter,
    ) -> CatalogResult<Vec<Todo>> {
        self.require_project(project_id)?;
        let mut todos = self.get_todos_by_project_id(project_id)?;
        todos.retain(|todo| filter.matches(todo.status));
        Ok(todos)
    }

    // ============================================================
    // Record access
    // ============================================================

    fn require_project(&self, project_id: &str) -> CatalogResult<Project> {
        self.read(&project_key(project_id))?
            .ok_or_else(|| CatalogError::ProjectNotFound(project_id.to_string()))
    }

    fn read_id_list(&self, key: &str) -> CatalogResult<Vec<String>> {
        Ok(self.read::<Vec<String>>(key)?.unwrap_or_default())
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> CatalogResult<Option<T>> {
        match self.store.get(key)? {
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|source| codec_error(key, source)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CatalogResult<()> {
        let payload = serde_json::to_string(value).map_err(|source| codec_error(key, source))?;
        self.store.put(key, &payload)?;
        Ok(())
    }
}

fn codec_error(key: &str, source: serde_json::Error) -> CatalogError {
    CatalogError::Codec {
        key: key.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn catalog() -> (Catalog, MemoryStore) {
        let store = MemoryStore::new();
        (Catalog::new(Arc::new(store.clone())), store)
    }

    fn project(catalog: &Catalog, name: &str) -> Project {
        catalog
            .create_project(CreateProjectInput {
                name: name.into(),
                description: None,
            })
            .unwrap()
    }

    fn todo(catalog: &Catalog, project_id: &str, status: TodoStatus) -> Todo {
        catalog
            .create_todo(CreateTodoInput {
                project_id: project_id.to_string(),
                name: "task".into(),
                description: None,
                status,
                progress: TodoProgress::Low,
            })
            .unwrap()
    }

    #[test]
    fn create_project_writes_record_and_index() {
        let (catalog, store) = catalog();
        let p = project(&catalog, "Launch");

        let record = store.get(&p.id).unwrap().unwrap();
        let stored: Project = serde_json::from_str(&record).unwrap();
        assert_eq!(stored, p);
        assert_eq!(stored.description, "");

        let index = store.get(PROJECT_LIST_KEY).unwrap().unwrap();
        assert_eq!(index, format!(r#"["{}"]"#, p.id));
    }

    #[test]
    fn create_todo_appends_to_project_index() {
        let (catalog, store) = catalog();
        let p = project(&catalog, "Launch");
        let first = todo(&catalog, &p.id, TodoStatus::Pending);
        let second = todo(&catalog, &p.id, TodoStatus::Completed);

        let index = store.get(&format!("project:{}:todoList", p.id)).unwrap().unwrap();
        let ids: Vec<String> = serde_json::from_str(&index).unwrap();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
        assert!(store.get(&format!("todo:{}", first.id)).unwrap().is_some());
    }

    #[test]
    fn create_todo_requires_project() {
        let (catalog, store) = catalog();
        let missing = "no-such-project";
        let err = catalog
            .create_todo(CreateTodoInput {
                project_id: missing.to_string(),
                name: "orphan".into(),
                description: None,
                status: TodoStatus::Pending,
                progress: TodoProgress::Low,
            })
            .unwrap_err();

        assert!(matches!(err, CatalogError::ProjectNotFound(id) if id == missing));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn dangling_todo_ids_are_skipped() {
        let (catalog, store) = catalog();
        let p = project(&catalog, "Launch");
        let kept = todo(&catalog, &p.id, TodoStatus::Pending);
        let lost = todo(&catalog, &p.id, TodoStatus::Pending);
        store.delete(&format!("todo:{}", lost.id)).unwrap();

        let todos = catalog.get_todos_by_project_id(&p.id).unwrap();
        assert_eq!(todos, vec![kept]);
    }

    #[test]
    fn missing_todo_index_reads_as_empty() {
        let (catalog, _) = catalog();
        assert!(catalog.get_todos_by_project_id("never-created").unwrap().is_empty());
    }

    #[test]
    fn delete_project_removes_every_owned_key() {
        let (catalog, store) = catalog();
        let keep = project(&catalog, "Keep");
        let p = project(&catalog, "Drop");
        todo(&catalog, &p.id, TodoStatus::Pending);
        todo(&catalog, &p.id, TodoStatus::InProgress);

        catalog.delete_project(&p.id).unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec![keep.id.clone(), PROJECT_LIST_KEY.to_string()]
        );
        let ids: Vec<String> =
            serde_json::from_str(&store.get(PROJECT_LIST_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(ids, vec![keep.id]);
    }

    #[test]
    fn delete_project_not_found_touches_nothing() {
        let (catalog, store) = catalog();
        let p = project(&catalog, "Keep");
        let before = store.keys().unwrap();

        let err = catalog.delete_project("never-created").unwrap_err();
        assert!(err.to_string().contains("never-created"));
        assert!(err.is_not_found());
        assert_eq!(store.keys().unwrap(), before);
        assert_eq!(catalog.list_projects().unwrap(), vec![p]);
    }

    #[test]
    fn list_projects_skips_dangling_entries() {
        let (catalog, store) = catalog();
        let a = project(&catalog, "A");
        let b = project(&catalog, "B");
        store.delete(&a.id).unwrap();

        assert_eq!(catalog.list_projects().unwrap(), vec![b]);
    }

    #[test]
    fn update_project_advances_updated_at() {
        let (catalog, _) = catalog();
        let p = project(&catalog, "Draft");

        let updated = catalog
            .update_project(
                &p.id,
                UpdateProjectInput {
                    name: None,
                    description: Some("now described".into()),
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Draft");
        assert_eq!(updated.description, "now described");
        assert_eq!(updated.created_at, p.created_at);
        assert!(updated.updated_at >= p.updated_at);
        assert_eq!(catalog.get_project(&p.id).unwrap().project, updated);
    }

    #[test]
    fn todo_changes_do_not_touch_project_record() {
        let (catalog, _) = catalog();
        let p = project(&catalog, "Launch");
        let t = todo(&catalog, &p.id, TodoStatus::Pending);
        catalog
            .update_todo(
                &t.id,
                UpdateTodoInput {
                    status: Some(TodoStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(catalog.get_project(&p.id).unwrap().project, p);
    }

    #[test]
    fn malformed_record_is_a_codec_error() {
        let (catalog, store) = catalog();
        store.put("todo:corrupt", "not json").unwrap();

        let err = catalog.get_todo("corrupt").unwrap_err();
        assert!(matches!(&err, CatalogError::Codec { key, .. } if key == "todo:corrupt"));
        assert!(err.to_string().contains("todo:corrupt"));
        assert!(!err.is_not_found());
    }
}
