//! JSON command protocol for scripting a live annotation session.

use serde::{Deserialize, Serialize};
use shared::{CuboidDescriptor, OrientationPolicy, Point3};

use crate::harness::TestHarness;
use crate::state::PickOutcome;

/// A command that drives the session the way a user would.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Turn create mode on or off
    SetCreateMode { enabled: bool },
    /// Click at window coordinates
    Click { x: f32, y: f32 },
    /// Click wherever a world point appears on screen
    ClickWorld { point: Point3 },
    /// Overwrite a stored cuboid
    ReplaceCuboid {
        index: usize,
        cuboid: CuboidDescriptor,
    },
    /// Choose how new cuboids are oriented
    SetOrientationPolicy { policy: OrientationPolicy },
    /// Return the camera to its home view
    ResetCamera,
    /// Full session snapshot
    Inspect,
    /// Short status: state and counts
    Status,
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

fn outcome_json(outcome: PickOutcome) -> serde_json::Value {
    match outcome {
        PickOutcome::Ignored => serde_json::json!({ "outcome": "ignored" }),
        PickOutcome::Missed => serde_json::json!({ "outcome": "missed" }),
        PickOutcome::Collected { count, point } => serde_json::json!({
            "outcome": "collected",
            "count": count,
            "point": point,
        }),
        PickOutcome::Completed { index } => serde_json::json!({
            "outcome": "completed",
            "index": index,
        }),
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::SetCreateMode { enabled } => {
            harness.session.set_create_mode(enabled);
            CommandResponse::ok_with_data(serde_json::json!({ "state": harness.state() }))
        }

        AgentCommand::Click { x, y } => match harness.click(x, y) {
            Ok(outcome) => CommandResponse::ok_with_data(outcome_json(outcome)),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::ClickWorld { point } => match harness.click_world(point) {
            Ok(outcome) => CommandResponse::ok_with_data(outcome_json(outcome)),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::ReplaceCuboid { index, cuboid } => {
            match harness.session.replace_cuboid(index, cuboid) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::SetOrientationPolicy { policy } => {
            harness.set_orientation_policy(policy);
            CommandResponse::ok()
        }

        AgentCommand::ResetCamera => {
            harness.session.reset_camera();
            CommandResponse::ok()
        }

        AgentCommand::Inspect => match serde_json::to_value(harness.session.snapshot()) {
            Ok(data) => CommandResponse::ok_with_data(data),
            Err(e) => CommandResponse::err(format!("Failed to serialize snapshot: {e}")),
        },

        AgentCommand::Status => CommandResponse::ok_with_data(serde_json::json!({
            "state": harness.state(),
            "picked_count": harness.picked_count(),
            "cuboid_count": harness.cuboid_count(),
            "status": harness.status_text(),
        })),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_command_serde_set_create_mode() {
        let json = r#"{"command": "set_create_mode", "enabled": true}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::SetCreateMode { enabled: true }));
    }

    #[test]
    fn test_command_serde_click_world() {
        let json = r#"{"command": "click_world", "point": [1.0, 2.0, 3.0]}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::ClickWorld { point } => assert_eq!(point, Point3::new(1.0, 2.0, 3.0)),
            _ => panic!("Expected ClickWorld"),
        }
    }

    #[test]
    fn test_command_serde_policy() {
        let json = r#"{"command": "set_orientation_policy", "policy": "three_point_frame"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            AgentCommand::SetOrientationPolicy {
                policy: OrientationPolicy::ThreePointFrame
            }
        ));
    }

    #[test]
    fn test_execute_click_while_idle_is_ignored() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "click", "x": 400, "y": 300}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["outcome"], "ignored");
    }

    #[test]
    fn test_execute_status() {
        let mut h = TestHarness::with_cloud(fixtures::corner_cloud().unwrap());
        execute_json(&mut h, r#"{"command": "set_create_mode", "enabled": true}"#).unwrap();
        execute_json(&mut h, r#"{"command": "click_world", "point": [0, 0, 0]}"#).unwrap();

        let resp = execute_json(&mut h, r#"{"command": "status"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["picked_count"], 1);
        assert_eq!(data["status"], "1 of 3 points selected");
        assert_eq!(data["state"]["state"], "collecting");
    }

    #[test]
    fn test_execute_replace_out_of_range() {
        let mut h = TestHarness::new();
        let json = r#"{"command": "replace_cuboid", "index": 0, "cuboid": {
            "center": [0, 0, 0], "size": [1, 1, 1],
            "orientation": [1, 0, 0, 0, 1, 0, 0, 0, 1],
            "color": {"r": 255, "g": 0, "b": 0}
        }}"#;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("out of range"));
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        let result = execute_json(&mut h, "not valid json");
        assert!(result.is_err());
    }
}
