//! Session gateway message types
//!
//! The wire format is a JSON envelope `{"event": "<name>", "data": {...}}`
//! in both directions. Events with no payload omit `data` entirely.

use serde::{Deserialize, Serialize};

/// Incoming events from the client
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum IncomingEvent {
    /// Scene and role negotiation
    #[serde(rename = "select_scene_role")]
    SelectSceneRole(SceneSelection),

    /// Start a practice session
    #[serde(rename = "start_session")]
    StartSession,

    /// Stop the current practice session
    #[serde(rename = "stop_session")]
    StopSession,

    /// Audio chunk from the client's microphone. The payload is opaque to the
    /// gateway; nothing is decoded or buffered.
    #[serde(rename = "audio_data")]
    AudioData(serde_json::Value),
}

/// In-flight scene/role selection payload.
///
/// Field policy is pass-through-as-absent: missing fields deserialize to
/// `None` and are echoed back as `null` rather than rejected.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SceneSelection {
    #[serde(default)]
    pub scene: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub ai_role: Option<String>,
}

/// Outgoing events to the client
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum OutgoingEvent {
    /// Sent once, immediately after the upgrade handshake is accepted
    #[serde(rename = "connection_established")]
    ConnectionEstablished {
        status: String,
        /// RFC 3339 timestamp of the acceptance
        timestamp: String,
    },

    /// Acknowledges `select_scene_role`, echoing the selection
    #[serde(rename = "scene_role_confirmed")]
    SceneRoleConfirmed {
        scene: Option<String>,
        user_role: Option<String>,
        ai_role: Option<String>,
        status: String,
    },

    /// Acknowledges `start_session` / `stop_session`
    #[serde(rename = "session_status")]
    SessionStatus { status: String, message: String },

    /// Acknowledges `audio_data`
    #[serde(rename = "audio_received")]
    AudioReceived { status: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_scene_role_deserialization() {
        let json = r#"{
            "event": "select_scene_role",
            "data": {"scene": "restaurant", "user_role": "customer", "ai_role": "waiter"}
        }"#;

        let event: IncomingEvent = serde_json::from_str(json).expect("Should deserialize");
        match event {
            IncomingEvent::SelectSceneRole(selection) => {
                assert_eq!(selection.scene.as_deref(), Some("restaurant"));
                assert_eq!(selection.user_role.as_deref(), Some("customer"));
                assert_eq!(selection.ai_role.as_deref(), Some("waiter"));
            }
            _ => panic!("Expected SelectSceneRole variant"),
        }
    }

    #[test]
    fn test_missing_fields_become_absent() {
        let json = r#"{"event": "select_scene_role", "data": {"scene": "hotel"}}"#;

        let event: IncomingEvent = serde_json::from_str(json).expect("Should deserialize");
        match event {
            IncomingEvent::SelectSceneRole(selection) => {
                assert_eq!(selection.scene.as_deref(), Some("hotel"));
                assert!(selection.user_role.is_none());
                assert!(selection.ai_role.is_none());
            }
            _ => panic!("Expected SelectSceneRole variant"),
        }
    }

    #[test]
    fn test_payloadless_events_deserialize() {
        let start: IncomingEvent =
            serde_json::from_str(r#"{"event": "start_session"}"#).expect("Should deserialize");
        assert!(matches!(start, IncomingEvent::StartSession));

        let stop: IncomingEvent =
            serde_json::from_str(r#"{"event": "stop_session"}"#).expect("Should deserialize");
        assert!(matches!(stop, IncomingEvent::StopSession));
    }

    #[test]
    fn test_audio_data_payload_is_opaque() {
        let json = r#"{"event": "audio_data", "data": {"chunk": "AAAA", "seq": 7}}"#;
        let event: IncomingEvent = serde_json::from_str(json).expect("Should deserialize");
        match event {
            IncomingEvent::AudioData(payload) => {
                assert_eq!(payload["seq"], 7);
            }
            _ => panic!("Expected AudioData variant"),
        }
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result: Result<IncomingEvent, _> =
            serde_json::from_str(r#"{"event": "warp_drive", "data": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_scene_role_confirmed_serialization() {
        let event = OutgoingEvent::SceneRoleConfirmed {
            scene: Some("restaurant".to_string()),
            user_role: Some("customer".to_string()),
            ai_role: Some("waiter".to_string()),
            status: "ready".to_string(),
        };

        let json = serde_json::to_value(&event).expect("Should serialize");
        assert_eq!(json["event"], "scene_role_confirmed");
        assert_eq!(json["data"]["scene"], "restaurant");
        assert_eq!(json["data"]["user_role"], "customer");
        assert_eq!(json["data"]["ai_role"], "waiter");
        assert_eq!(json["data"]["status"], "ready");
    }

    #[test]
    fn test_absent_fields_echo_as_null() {
        let event = OutgoingEvent::SceneRoleConfirmed {
            scene: None,
            user_role: None,
            ai_role: None,
            status: "ready".to_string(),
        };

        let json = serde_json::to_value(&event).expect("Should serialize");
        assert!(json["data"]["scene"].is_null());
        assert!(json["data"]["user_role"].is_null());
        assert!(json["data"]["ai_role"].is_null());
    }

    #[test]
    fn test_connection_established_serialization() {
        let event = OutgoingEvent::ConnectionEstablished {
            status: "connected".to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&event).expect("Should serialize");
        assert!(json.contains(r#""event":"connection_established""#));
        assert!(json.contains(r#""status":"connected""#));
    }

    #[test]
    fn test_session_status_serialization() {
        let event = OutgoingEvent::SessionStatus {
            status: "active".to_string(),
            message: "Session started".to_string(),
        };

        let json = serde_json::to_value(&event).expect("Should serialize");
        assert_eq!(json["event"], "session_status");
        assert_eq!(json["data"]["status"], "active");
    }
}
