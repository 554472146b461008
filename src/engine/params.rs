use std::fmt::Display;

use serde_json::Value;

use crate::engine::protocol::{EngineError, EngineResult};
use crate::model::joke_request::{legal_values, JokeRequest, Length, Role, Scenario, Tone};

/// Validate the inbound `{ params: {...} }` body and apply defaults.
///
/// Checks run in a fixed order and the first failure wins.
pub fn validate_params(body: &Value) -> EngineResult<JokeRequest> {
    let params = body
        .get("params")
        .filter(|p| p.is_object())
        .ok_or_else(|| EngineError::Request("Missing params".into()))?;

    let scenario = required_member(params, "scenario", Scenario::parse, Scenario::ALL)?;

    let roles = match params.get("roles") {
        Some(Value::Array(items)) if (1..=2).contains(&items.len()) => items
            .iter()
            .map(parse_role)
            .collect::<EngineResult<Vec<_>>>()?,
        _ => {
            return Err(EngineError::Request(
                "roles must contain 1 or 2 entries".into(),
            ))
        }
    };

    let tone = required_member(params, "tone", Tone::parse, Tone::ALL)?;

    let length = match params.get("length") {
        None | Some(Value::Null) => Length::default(),
        Some(value) => value.as_str().and_then(Length::parse).ok_or_else(|| {
            EngineError::Request(format!(
                "Invalid length {}: expected one of {}",
                value,
                legal_values(Length::ALL)
            ))
        })?,
    };

    Ok(JokeRequest {
        scenario,
        roles,
        tone,
        length,
    })
}

/// Absent, null or empty is missing. Anything else outside `all` is invalid,
/// non-strings included.
fn required_member<T: Copy + Display>(
    params: &Value,
    field: &str,
    parse: fn(&str) -> Option<T>,
    all: &[T],
) -> EngineResult<T> {
    let invalid = |shown: String| {
        EngineError::Request(format!(
            "Invalid {} {}: expected one of {}",
            field,
            shown,
            legal_values(all)
        ))
    };

    match params.get(field) {
        None | Some(Value::Null) => Err(EngineError::Request(format!("Missing {}", field))),
        Some(Value::String(name)) if name.is_empty() => {
            Err(EngineError::Request(format!("Missing {}", field)))
        }
        Some(Value::String(name)) => parse(name).ok_or_else(|| invalid(format!("'{}'", name))),
        Some(other) => Err(invalid(other.to_string())),
    }
}

fn parse_role(value: &Value) -> EngineResult<Role> {
    value.as_str().and_then(Role::parse).ok_or_else(|| {
        EngineError::Request(format!(
            "Invalid role {}: expected one of {}",
            value,
            legal_values(Role::ALL)
        ))
    })
}
