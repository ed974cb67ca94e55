//! Type definitions for the Groq API.
//!
//! Request and response types for every API surface: chat completions,
//! audio, speech, models, uploaded files and batch jobs.

pub mod audio;
pub mod batch;
pub mod chat;
pub mod common;
pub mod file;
pub mod models;
pub mod tools;
