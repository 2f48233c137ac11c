//! JSON command protocol for scripted and agent-driven editing.

use serde::{Deserialize, Serialize};
use shared::{ObjectPatch, ObjectSpec, ShapeKind};

use crate::error::DesignError;
use crate::harness::TestHarness;

/// A command that can be executed against the harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Add an object with default placement.
    AddObject {
        #[serde(rename = "type")]
        kind: ShapeKind,
    },
    /// Add a batch of objects in one undo step.
    AddObjects { objects: Vec<ObjectSpec> },
    /// Duplicate an object by ID.
    Duplicate { id: String },
    /// Delete an object by ID.
    Delete { id: String },
    /// Live property edit (no history entry).
    Update { id: String, patch: ObjectPatch },
    /// Property edit recorded in history.
    Commit {
        id: String,
        #[serde(default)]
        patch: ObjectPatch,
    },
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Clear the entire scene.
    Clear,
    /// Select an object by ID.
    Select { id: String },
    /// Clear selection.
    ClearSelection,
    /// Inspect the scene: list all objects.
    Inspect,
    /// Export the scene as ASCII STL.
    ExportStl,
    /// Encode the scene as a share code.
    Share,
    /// Replace the scene from a share code.
    Import { token: String },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl From<DesignError> for CommandResponse {
    fn from(e: DesignError) -> Self {
        CommandResponse::err(e.to_string())
    }
}

fn not_found(id: &str) -> CommandResponse {
    DesignError::NotFound(id.to_string()).into()
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::AddObject { kind } => match harness.add(kind) {
            Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            Err(e) => e.into(),
        },

        AgentCommand::AddObjects { objects } => match harness.app.scene.add_objects(objects) {
            Ok(ids) => CommandResponse::ok_with_data(serde_json::json!({ "ids": ids })),
            Err(e) => e.into(),
        },

        AgentCommand::Duplicate { id } => match harness.duplicate(&id) {
            Ok(Some(copy)) => CommandResponse::ok_with_data(serde_json::json!({ "id": copy })),
            Ok(None) => not_found(&id),
            Err(e) => e.into(),
        },

        AgentCommand::Delete { id } => {
            if harness.delete(&id) {
                CommandResponse::ok()
            } else {
                not_found(&id)
            }
        }

        AgentCommand::Update { id, patch } => {
            if harness.update(&id, &patch) {
                CommandResponse::ok()
            } else {
                not_found(&id)
            }
        }

        AgentCommand::Commit { id, patch } => {
            if harness.commit(&id, &patch) {
                CommandResponse::ok()
            } else {
                not_found(&id)
            }
        }

        AgentCommand::Undo => {
            let success = harness.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = harness.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        AgentCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }

        AgentCommand::Select { id } => {
            if harness.select(&id) {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": id }))
            } else {
                not_found(&id)
            }
        }

        AgentCommand::ClearSelection => {
            harness.clear_selection();
            CommandResponse::ok()
        }

        AgentCommand::Inspect => {
            let objects = &harness.app.scene.scene.objects;
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "selected": harness.selected(),
                "can_undo": harness.app.scene.can_undo(),
                "can_redo": harness.app.scene.can_redo(),
            }))
        }

        AgentCommand::ExportStl => match harness.export_stl() {
            Ok(stl) => CommandResponse::ok_with_data(serde_json::json!({ "stl": stl })),
            Err(e) => e.into(),
        },

        AgentCommand::Share => match harness.share_code() {
            Ok(token) => CommandResponse::ok_with_data(serde_json::json!({ "token": token })),
            Err(e) => e.into(),
        },

        AgentCommand::Import { token } => match harness.import_share_code(&token) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({
                "object_count": harness.object_count()
            })),
            Err(e) => e.into(),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
