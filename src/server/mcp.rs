//! MCP tool server.
//!
//! Exposes the clinical search pipeline as one tool. The tool's name and
//! description come from the settings file, so the tool list is built at
//! runtime instead of with the `#[tool]` macros.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value;

use super::types::{AppState, MedicalQueryRequest};
use crate::error::SearchErrorKind;
use crate::extract::QueryInput;

/// Server name reported during the MCP handshake.
pub const SERVER_NAME: &str = "clinical-search";

/// MCP handler for the clinical search tool.
#[derive(Debug, Clone)]
pub struct ClinicalSearchServer {
    state: AppState,
    input_schema: Arc<JsonObject>,
}

impl ClinicalSearchServer {
    /// Creates a new server over shared state.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            input_schema: Arc::new(input_schema()),
        }
    }

    /// The single tool this server advertises.
    #[must_use]
    pub fn tool(&self) -> Tool {
        let meta = &self.state.config.tool;
        Tool::new(
            meta.name.clone(),
            meta.description.clone(),
            self.input_schema.clone(),
        )
    }

    /// Instructions sent to the host, built from the agent and task metadata.
    #[must_use]
    pub fn instructions(&self) -> String {
        let config = &self.state.config;
        format!(
            "{role}: {goal}. Task: {task} Expected output: {expected} Call `{tool}` with \
             {{\"query\": \"<medical question or term>\"}}.",
            role = config.agent.role.trim(),
            goal = config.agent.goal.trim().trim_end_matches('.'),
            task = config.task.description.trim(),
            expected = config.task.expected_output.trim(),
            tool = config.tool.name,
        )
    }

    /// Run the tool with raw arguments.
    ///
    /// Error-prefixed outcomes are returned as error-flagged results so the
    /// host can tell them apart from answers.
    pub async fn run_tool(&self, arguments: Option<JsonObject>) -> CallToolResult {
        let input = arguments.map_or(QueryInput::Other(Value::Null), QueryInput::Mapping);
        let output = self.state.search.clinical_search(input).await;

        if SearchErrorKind::classify(&output).is_some() {
            tracing::warn!(output = %output, "Tool call finished with an error outcome");
            CallToolResult::error(vec![Content::text(output)])
        } else {
            CallToolResult::success(vec![Content::text(output)])
        }
    }
}

fn input_schema() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(MedicalQueryRequest)) {
        Ok(Value::Object(map)) => map,
        _ => JsonObject::new(),
    }
}

impl ServerHandler for ClinicalSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(vec![self.tool()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if request.name != self.state.config.tool.name {
            return Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ));
        }

        tracing::info!(tool = %request.name, "Tool call received");
        Ok(self.run_tool(request.arguments).await)
    }
}
