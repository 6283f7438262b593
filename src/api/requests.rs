//! Request and response payloads for the timer service

use serde::{Deserialize, Serialize};

use crate::model::{DisplayOptions, Segment, Timer, TimerMetadata};

/// Body of `PUT /timer/{id}`
///
/// The PUT replaces the stored definition, so leaving `stop_at` out clears
/// an existing stop instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerUpdateRequest {
    pub start_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_at: Option<i64>,
    pub repeat: bool,
    pub segments: Vec<Segment>,
    pub display_options: DisplayOptions,
    pub metadata: TimerMetadata,
}

/// Body of `POST /timer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerCreationRequest {
    pub id: String,
    pub password: String,
    pub start_at: i64,
    pub repeat: bool,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerCreationResponse {
    pub timer: Timer,
    pub token: String,
}

/// Body of `POST /timer/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;

    #[test]
    fn creation_request_serializes_the_wire_fields() {
        let request = TimerCreationRequest {
            id: "abcde".to_string(),
            password: "secret".to_string(),
            start_at: 1_700_000_000_000,
            repeat: true,
            segments: vec![Segment {
                label: "A".to_string(),
                time: 15_000,
                color: None,
                count_to: 0,
                sounds: Vec::new(),
            }],
        };

        let value: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["id"], "abcde");
        assert_eq!(value["password"], "secret");
        assert_eq!(value["start_at"], 1_700_000_000_000i64);
        assert_eq!(value["repeat"], true);
        assert_eq!(value["segments"][0]["time"], 15_000);
    }

    #[test]
    fn creation_response_parses_timer_and_token() {
        let response: TimerCreationResponse = serde_json::from_str(
            r#"{
                "timer": {
                    "id": "abcde",
                    "start_at": 1700000000000,
                    "repeat": false,
                    "segments": [{"label": "A", "time": 15000}]
                },
                "token": "jwt"
            }"#,
        )
        .unwrap();

        assert_eq!(response.timer.id, "abcde");
        assert_eq!(response.timer.total_round_time(), 15_000);
        assert_eq!(response.token, "jwt");
    }

    #[test]
    fn update_request_omits_an_unset_stop_at() {
        let request = TimerUpdateRequest {
            start_at: 1_700_000_000_000,
            stop_at: None,
            repeat: false,
            segments: Vec::new(),
            display_options: Default::default(),
            metadata: Default::default(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("stop_at"));
    }
}
