//! Ark - relay and client façade for a local Ollama server
//!
//! The relay exposes one HTTP endpoint that checks upstream status, runs
//! one-shot generations (buffered or streamed), and continues multi-turn
//! chats, reshaping Ollama's native JSON into a stable contract. The client
//! façade gives every caller typed access to that endpoint.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod upstream;
