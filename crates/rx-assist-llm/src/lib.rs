//! LLM wrapper for prescription question answering.
//!
//! This crate builds the pharmacist-assistant prompt around OCR text and
//! sends it to a hosted Gemini model over HTTP.

pub mod chat;
pub mod client;
pub mod prompts;

pub use chat::*;
pub use client::*;
pub use prompts::*;
