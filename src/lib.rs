//! Joke generation service: one request in, one governed joke out.
//!
//! A generative backend writes the joke; everything it returns is extracted,
//! contract-checked and repaired so that callers only ever see a joke ending
//! with exactly one catalog "realization" phrase.

pub mod engine;
pub mod model;
pub mod server;
