//! Groq API SDK
//!
//! A Rust client for the Groq API covering chat completions (sync and
//! streaming), audio transcription/translation, speech synthesis, vision,
//! reasoning, model listing, file uploads and asynchronous batch jobs.
//!
//! # Features
//!
//! - **Chat Completions**: Sync and streaming, with tool use, vision content
//!   and JSON mode
//! - **Streaming**: Lazy, single-pass event streams with guaranteed
//!   connection release
//! - **Audio**: Whisper transcription/translation and PlayAI speech synthesis
//! - **Vision & Reasoning**: Image analysis and step-by-step reasoning built
//!   on chat completions
//! - **Files & Batches**: JSONL batch input validation, upload and batch
//!   lifecycle management
//! - **One error family**: Every failure is a [`GroqError`] with a
//!   machine-readable kind and code
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use groq_sdk::{GroqClient, ChatRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::builder()
//!         .api_key("gsk_your_api_key")
//!         .build()?;
//!
//!     let request = ChatRequest::new(
//!         "llama-3.3-70b-versatile",
//!         vec![Message::user("Hello, Groq!")],
//!     );
//!
//!     let response = client.chat().create(request).await?;
//!     println!("{}", response.content().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! # Streaming Example
//!
//! ```rust,no_run
//! use groq_sdk::{GroqClient, ChatRequest, Message};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::builder()
//!         .api_key("gsk_your_api_key")
//!         .build()?;
//!
//!     let request = ChatRequest::new(
//!         "llama-3.3-70b-versatile",
//!         vec![Message::user("Tell me a story")],
//!     );
//!
//!     let mut stream = client.chat().create_stream(request).await?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         if let Some(content) = chunk?
//!             .choices
//!             .first()
//!             .and_then(|c| c.delta.content.as_deref())
//!         {
//!             print!("{content}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{GroqClient, GroqClientBuilder};
pub use config::GroqConfig;
pub use errors::{ErrorKind, GroqError, GroqResult};

// Type re-exports
pub use types::audio::{
    AudioFormat, AudioResponse, SpeechRequest, Transcription, TranscriptionRequest,
    TranslationRequest,
};
pub use types::batch::{
    Batch, BatchList, BatchStatus, CreateBatchParams, ListBatchesParams, RequestCounts,
};
pub use types::chat::{
    ChatChunk, ChatRequest, ChatResponse, Choice, ChunkChoice, Content, ContentPart, Delta,
    FinishReason, ImageUrl, Message, ReasoningFormat, ResponseFormat, ResponseFormatType, Role,
    StreamOptions, Usage,
};
pub use types::file::{File, FileDeleted, FileList, FileStatus, ListFilesParams};
pub use types::models::{Model, ModelList};
pub use types::tools::{FunctionCall, FunctionDefinition, Tool, ToolCall, ToolChoice};

// Service re-exports
pub use services::{ReasoningOptions, VisionOptions};
pub use transport::ChatStream;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
