use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    },
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};

use plan_core::models::*;
use plan_core::{Catalog, CatalogError};

#[derive(Clone)]
pub struct McpServer {
    catalog: Catalog,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateProjectRequest {
    #[schemars(description = "Project name (1-100 characters)")]
    pub name: String,
    #[schemars(description = "Optional project description")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProjectIdRequest {
    #[schemars(description = "The project ID")]
    pub project_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateProjectRequest {
    #[schemars(description = "The project ID to update")]
    pub project_id: String,
    #[schemars(description = "New project name")]
    pub name: Option<String>,
    #[schemars(description = "New description; an empty string clears it")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTodosRequest {
    #[serde(rename = "projectId")]
    #[schemars(description = "The project ID whose todos to list")]
    pub project_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTodoRequest {
    #[serde(rename = "projectId")]
    #[schemars(description = "The project the todo belongs to")]
    pub project_id: String,
    #[schemars(description = "Todo name (1-100 characters)")]
    pub name: String,
    #[schemars(description = "Optional todo description")]
    pub description: Option<String>,
    pub status: TodoStatus,
    pub progress: TodoProgress,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoIdRequest {
    #[schemars(description = "The todo ID")]
    pub todo_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTodoRequest {
    #[schemars(description = "The todo ID to update")]
    pub todo_id: String,
    #[schemars(description = "New todo name")]
    pub name: Option<String>,
    #[schemars(description = "New description; an empty string clears it")]
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub progress: Option<TodoProgress>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListAllTodosRequest {
    #[schemars(description = "The project ID whose todos to list")]
    pub project_id: String,
    #[schemars(description = "Only return todos with this status; `all` or omitted returns every todo")]
    pub status: Option<StatusFilter>,
}

impl McpServer {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            tool_router: Self::tool_router(),
        }
    }

    fn invalid(e: ValidationError) -> McpError {
        McpError::invalid_params(e.to_string(), None)
    }

    fn json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

fn catalog_error(e: CatalogError) -> McpError {
    if e.is_not_found() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        tracing::error!("Catalog operation failed: {}", e);
        McpError::internal_error(e.to_string(), None)
    }
}

#[tool_router]
impl McpServer {
    #[tool(name = "createProject", description = "Create a new project")]
    async fn create_project(
        &self,
        params: Parameters<CreateProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let input = CreateProjectInput {
            name: req.name,
            description: req.description,
        };
        input.validate().map_err(Self::invalid)?;

        let project = self.catalog.create_project(input).map_err(catalog_error)?;
        Self::json(&project)
    }

    #[tool(name = "get_Projects", description = "Get a project by ID together with its todos")]
    async fn get_project(
        &self,
        params: Parameters<ProjectIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let project = self
            .catalog
            .get_project(&params.0.project_id)
            .map_err(catalog_error)?;
        Self::json(&project)
    }

    #[tool(name = "listProjects", description = "List all projects")]
    async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        let projects = self.catalog.list_projects().map_err(catalog_error)?;
        Self::json(&projects)
    }

    #[tool(name = "update_Project", description = "Update a project's name or description")]
    async fn update_project(
        &self,
        params: Parameters<UpdateProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let input = UpdateProjectInput {
            name: req.name,
            description: req.description,
        };
        input.validate().map_err(Self::invalid)?;

        let project = self
            .catalog
            .update_project(&req.project_id, input)
            .map_err(catalog_error)?;
        Self::json(&project)
    }

    #[tool(name = "delete_Projects", description = "Delete a project and all of its todos")]
    async fn delete_project(
        &self,
        params: Parameters<ProjectIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let project_id = params.0.project_id;
        self.catalog.delete_project(&project_id).map_err(catalog_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Project {} deleted successfully.",
            project_id
        ))]))
    }

    #[tool(name = "listTodos", description = "List all todos for a project")]
    async fn list_todos(
        &self,
        params: Parameters<ListTodosRequest>,
    ) -> Result<CallToolResult, McpError> {
        let todos = self
            .catalog
            .get_todos_by_project_id(&params.0.project_id)
            .map_err(catalog_error)?;
        Self::json(&todos)
    }

    #[tool(name = "create_Todo", description = "Create a new todo in a project")]
    async fn create_todo(
        &self,
        params: Parameters<CreateTodoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let input = CreateTodoInput {
            project_id: req.project_id,
            name: req.name,
            description: req.description,
            status: req.status,
            progress: req.progress,
        };
        input.validate().map_err(Self::invalid)?;

        let todo = self.catalog.create_todo(input).map_err(catalog_error)?;
        Self::json(&todo)
    }

    #[tool(name = "update_Todo", description = "Update a todo by ID; omitted fields are left unchanged")]
    async fn update_todo(
        &self,
        params: Parameters<UpdateTodoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let input = UpdateTodoInput {
            name: req.name,
            description: req.description,
            status: req.status,
            progress: req.progress,
        };
        input.validate().map_err(Self::invalid)?;

        let todo = self
            .catalog
            .update_todo(&req.todo_id, input)
            .map_err(catalog_error)?;
        Self::json(&todo)
    }

    #[tool(name = "delete_Todo", description = "Delete a todo by ID")]
    async fn delete_todo(
        &self,
        params: Parameters<TodoIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let todo_id = params.0.todo_id;
        self.catalog.delete_todo(&todo_id).map_err(catalog_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Todo {} deleted successfully.",
            todo_id
        ))]))
    }

    #[tool(name = "get_Todo", description = "Get a todo by ID")]
    async fn get_todo(
        &self,
        params: Parameters<TodoIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let todo = self
            .catalog
            .get_todo(&params.0.todo_id)
            .map_err(catalog_error)?;
        Self::json(&todo)
    }

    #[tool(name = "list_all_todos", description = "List a project's todos, optionally filtered by status")]
    async fn list_all_todos(
        &self,
        params: Parameters<ListAllTodosRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let todos = self
            .catalog
            .list_all_todos(&req.project_id, req.status.unwrap_or_default())
            .map_err(catalog_error)?;
        Self::json(&todos)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Project plan MCP server: manage projects and their todos".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// MCP over streamable HTTP, one server instance per session.
pub fn http_service(catalog: Catalog) -> StreamableHttpService<McpServer, LocalSessionManager> {
    StreamableHttpService::new(
        move || Ok(McpServer::new(catalog.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    )
}

pub async fn run_stdio_server(catalog: Catalog) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(catalog);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
