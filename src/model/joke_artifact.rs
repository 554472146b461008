use serde::{Deserialize, Serialize};

use crate::model::joke_request::{JokeRequest, Length, Role, Scenario, Tone};

/// The payload returned to callers on success.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct JokeArtifact {
    pub joke: String,
    pub scenario: Scenario,
    pub roles: Vec<Role>,
    pub tone: Tone,
    pub length: Length,
    pub ending_phrase: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JokeArtifact {
    /// Artifact whose request fields come from `request`, never from generator output.
    pub fn stamped(request: &JokeRequest, joke: String, ending_phrase: String, tags: Vec<String>) -> Self {
        Self {
            joke,
            scenario: request.scenario,
            roles: request.roles.clone(),
            tone: request.tone,
            length: request.length,
            ending_phrase,
            tags,
        }
    }
}
