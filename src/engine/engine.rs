use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{info, warn};

use crate::engine::ending_enforcer::EndingEnforcer;
use crate::engine::llm_client::HttpTransport;
use crate::engine::output_extractor::extract_payload;
use crate::engine::params::validate_params;
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{EngineError, EngineResult};
use crate::engine::retry::{RetryPolicy, TokioSleeper, UpstreamInvoker};
use crate::model::endings::EndingCatalog;
use crate::model::joke_artifact::JokeArtifact;
use crate::model::joke_request::JokeRequest;
use crate::model::llm_decode::decode_joke_payload;
use crate::server::settings::ServiceSettings;

/// Where joke text comes from.
pub enum Generator {
    Backend(UpstreamInvoker),
    /// Skips the network and builds a synthetic joke from the request.
    Stub,
}

/// Runs one request end to end. Holds only immutable state, so a single
/// instance is shared by every concurrent request.
pub struct JokeEngine {
    generator: Generator,
    catalog: EndingCatalog,
    enforcer: EndingEnforcer,
}

impl JokeEngine {
    pub fn new(generator: Generator) -> Self {
        let catalog = EndingCatalog::default();
        Self {
            generator,
            catalog,
            enforcer: EndingEnforcer::new(catalog),
        }
    }

    pub fn from_settings(settings: &ServiceSettings) -> Self {
        if settings.stub {
            return Self::new(Generator::Stub);
        }

        let transport = HttpTransport::new(settings.api_url.clone(), settings.api_key.clone());
        let policy = RetryPolicy {
            retries: settings.retries,
            base_delay: Duration::from_millis(settings.backoff_base_ms),
            timeout: Duration::from_millis(settings.timeout_ms),
        };
        let invoker = UpstreamInvoker::new(
            Arc::new(transport),
            Arc::new(TokioSleeper),
            policy,
            settings.model.clone(),
            settings.temperature,
        );

        Self::new(Generator::Backend(invoker))
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.generator, Generator::Stub)
    }

    /// Validate a raw `{ params }` body and generate for it.
    pub async fn handle(&self, body: &Value) -> EngineResult<JokeArtifact> {
        let request = validate_params(body)?;
        self.generate(&request).await
    }

    pub async fn generate(&self, request: &JokeRequest) -> EngineResult<JokeArtifact> {
        let mut artifact = match &self.generator {
            Generator::Stub => stub_artifact(request, &self.catalog, &mut StdRng::from_entropy()),
            Generator::Backend(invoker) => {
                let prompt = PromptBuilder::build(request, &self.catalog);
                let raw = invoker.invoke(&prompt).await.map_err(|failure| {
                    warn!(%failure, "generation backend failed");
                    EngineError::Upstream(failure)
                })?;
                decode_generated(&raw, request)?
            }
        };

        self.enforcer.apply(&mut artifact, &mut StdRng::from_entropy());

        info!(
            scenario = %artifact.scenario,
            tone = %artifact.tone,
            ending = %artifact.ending_phrase,
            "joke assembled"
        );
        Ok(artifact)
    }
}

/// Contract-check the generator's reply, reporting the full raw text on failure.
fn decode_generated(raw: &str, request: &JokeRequest) -> EngineResult<JokeArtifact> {
    decode_joke_payload(extract_payload(raw), request).map_err(|err| match err {
        EngineError::Contract { message, .. } => {
            warn!(%message, "generator output broke the contract");
            EngineError::contract(message, raw)
        }
        other => other,
    })
}

fn stub_artifact<R: Rng + ?Sized>(
    request: &JokeRequest,
    catalog: &EndingCatalog,
    rng: &mut R,
) -> JokeArtifact {
    let cast = request
        .roles
        .iter()
        .map(|r| format!("a {}", r.as_str().to_lowercase()))
        .collect::<Vec<_>>()
        .join(" and ");
    let verb = if request.roles.len() == 1 { "walks" } else { "walk" };
    let ending = catalog.pick(rng);
    let joke = format!(
        "So {} {} into the {}. Nobody says where the line starts, so they just stand there politely — {}",
        cast,
        verb,
        request.scenario.as_str().to_lowercase(),
        ending
    );

    JokeArtifact::stamped(request, joke, ending.to_string(), vec!["stub".into()])
}
