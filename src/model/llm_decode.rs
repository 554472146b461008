use serde_json::{Map, Value};

use crate::engine::protocol::{EngineError, EngineResult};
use crate::model::joke_artifact::JokeArtifact;
use crate::model::joke_request::JokeRequest;

/// Keys the generator must always send. `tags` is normalized instead.
const REQUIRED_KEYS: [&str; 6] = ["joke", "scenario", "roles", "tone", "length", "ending_phrase"];

/// Decode the extracted generator payload into an artifact.
///
/// Request fields are re-stamped from `request`; the generator's echo is only
/// checked for shape. `ending_phrase` is carried as claimed and fixed later by
/// the ending enforcer.
pub fn decode_joke_payload(candidate: &str, request: &JokeRequest) -> EngineResult<JokeArtifact> {
    let value: Value =
        serde_json::from_str(candidate).map_err(|_| EngineError::contract("not parseable", candidate))?;

    let Value::Object(fields) = value else {
        return Err(EngineError::contract("not parseable", candidate));
    };

    if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !fields.contains_key(**k)) {
        return Err(EngineError::contract(format!("Missing key: {}", missing), candidate));
    }

    let joke = match fields.get("joke") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        _ => {
            return Err(EngineError::contract(
                "joke must be a non-empty string",
                candidate,
            ))
        }
    };

    match fields.get("roles") {
        Some(Value::Array(roles)) if (1..=2).contains(&roles.len()) => {}
        _ => {
            return Err(EngineError::contract(
                "roles must contain 1 or 2 entries",
                candidate,
            ))
        }
    }

    let claimed_ending = fields
        .get("ending_phrase")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(JokeArtifact::stamped(
        request,
        joke,
        claimed_ending,
        normalize_tags(&fields),
    ))
}

fn normalize_tags(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|t| t.as_str())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::joke_request::{Length, Role, Scenario, Tone};
    use serde_json::json;

    fn request() -> JokeRequest {
        JokeRequest {
            scenario: Scenario::Queue,
            roles: vec![Role::Visitor],
            tone: Tone::Dry,
            length: Length::Short,
        }
    }

    fn payload(overrides: Value) -> String {
        let mut base = json!({
            "joke": "A visitor waits. Hmm... wait, wait, that's not the way.",
            "scenario": "Queue",
            "roles": ["Visitor"],
            "tone": "Dry",
            "length": "short",
            "ending_phrase": "Hmm... wait, wait, that's not the way.",
            "tags": ["queue"]
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut base, overrides) {
            for (k, v) in extra {
                if v.is_null() {
                    base.remove(&k);
                } else {
                    base.insert(k, v);
                }
            }
        }
        base.to_string()
    }

    fn contract_message(err: EngineError) -> String {
        match err {
            EngineError::Contract { message, .. } => message,
            other => panic!("expected contract error, got {:?}", other),
        }
    }

    #[test]
    fn restamps_request_fields() {
        let raw = payload(json!({
            "scenario": "Bar",
            "roles": ["Doctor", "Boss"],
            "tone": "Dark",
            "length": "long"
        }));
        let artifact = decode_joke_payload(&raw, &request()).unwrap();
        assert_eq!(artifact.scenario, Scenario::Queue);
        assert_eq!(artifact.roles, vec![Role::Visitor]);
        assert_eq!(artifact.tone, Tone::Dry);
        assert_eq!(artifact.length, Length::Short);
        assert_eq!(artifact.tags, vec!["queue".to_string()]);
    }

    #[test]
    fn rejects_non_json_and_non_objects() {
        let err = decode_joke_payload("the model rambled", &request()).unwrap_err();
        assert_eq!(contract_message(err), "not parseable");

        let err = decode_joke_payload("[1, 2]", &request()).unwrap_err();
        match err {
            EngineError::Contract { message, raw } => {
                assert_eq!(message, "not parseable");
                assert_eq!(raw, "[1, 2]");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn names_first_missing_key() {
        let raw = payload(json!({ "tone": null, "length": null }));
        let err = decode_joke_payload(&raw, &request()).unwrap_err();
        assert_eq!(contract_message(err), "Missing key: tone");
    }

    #[test]
    fn rejects_empty_joke() {
        let raw = payload(json!({ "joke": "   " }));
        let err = decode_joke_payload(&raw, &request()).unwrap_err();
        assert_eq!(contract_message(err), "joke must be a non-empty string");
    }

    #[test]
    fn rejects_bad_role_count() {
        let raw = payload(json!({ "roles": ["Visitor", "Waiter", "Boss"] }));
        let err = decode_joke_payload(&raw, &request()).unwrap_err();
        assert_eq!(contract_message(err), "roles must contain 1 or 2 entries");
    }

    #[test]
    fn tags_default_to_empty() {
        let raw = payload(json!({ "tags": null }));
        assert!(decode_joke_payload(&raw, &request()).unwrap().tags.is_empty());

        let raw = payload(json!({ "tags": "queue" }));
        assert!(decode_joke_payload(&raw, &request()).unwrap().tags.is_empty());
    }

    #[test]
    fn non_string_ending_is_carried_as_empty_claim() {
        let raw = payload(json!({ "ending_phrase": 3 }));
        let artifact = decode_joke_payload(&raw, &request()).unwrap();
        assert_eq!(artifact.ending_phrase, "");
    }
}
