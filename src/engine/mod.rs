pub mod engine;
pub mod protocol;
pub mod params;

pub mod prompt_builder;
pub mod llm_client;
pub mod retry;
pub mod output_extractor;
pub mod ending_enforcer;
