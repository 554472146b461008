pub mod endings;
pub mod joke_artifact;
pub mod joke_request;
pub mod llm_decode;
pub mod tone_rules;
