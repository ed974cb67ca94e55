//! Chat completion types.

use serde::{Deserialize, Serialize};

use super::common::GroqMetadata;
use super::tools::{Tool, ToolCall, ToolCallDelta, ToolChoice};
use crate::errors::{GroqError, GroqResult};

/// Chat completion request.
///
/// Optional fields set to `None` are omitted from the outgoing JSON entirely;
/// the backend treats absence and null differently for some of them.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model ID (required).
    pub model: String,

    /// Messages array (required, non-empty).
    pub messages: Vec<Message>,

    /// Temperature (0.0-2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Max completion tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Max completion tokens, reasoning-model spelling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,

    /// Top P sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// Frequency penalty (-2.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    /// Presence penalty (-2.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    /// Response format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// How reasoning output is presented by reasoning-capable models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_format: Option<ReasoningFormat>,

    /// Seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Tools/functions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    /// Tool choice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    /// End user ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Enable streaming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Stream options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

impl ChatRequest {
    /// Creates a new request with model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            max_completion_tokens: None,
            top_p: None,
            stop: None,
            frequency_penalty: None,
            presence_penalty: None,
            response_format: None,
            reasoning_format: None,
            seed: None,
            tools: None,
            tool_choice: None,
            user: None,
            stream: None,
            stream_options: None,
        }
    }

    /// Creates a new request builder.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::new()
    }

    /// Validates the request.
    pub fn validate(&self) -> GroqResult<()> {
        if self.model.is_empty() {
            return Err(GroqError::invalid_request("The model parameter is required"));
        }

        if self.messages.is_empty() {
            return Err(GroqError::invalid_request(
                "The messages parameter must contain at least one message",
            ));
        }

        if let Some(temp) = self.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(GroqError::invalid_request(
                    "temperature must be between 0.0 and 2.0",
                ));
            }
        }

        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(GroqError::invalid_request(
                    "top_p must be between 0.0 and 1.0",
                ));
            }
        }

        if let Some(fp) = self.frequency_penalty {
            if !(-2.0..=2.0).contains(&fp) {
                return Err(GroqError::invalid_request(
                    "frequency_penalty must be between -2.0 and 2.0",
                ));
            }
        }

        if let Some(pp) = self.presence_penalty {
            if !(-2.0..=2.0).contains(&pp) {
                return Err(GroqError::invalid_request(
                    "presence_penalty must be between -2.0 and 2.0",
                ));
            }
        }

        for (i, msg) in self.messages.iter().enumerate() {
            if let Err(e) = msg.validate() {
                return Err(GroqError::invalid_request(format!("messages[{i}]: {e}")));
            }
        }

        if let Some(ref tools) = self.tools {
            for (i, tool) in tools.iter().enumerate() {
                if let Err(e) = tool.validate() {
                    return Err(GroqError::invalid_request(format!("tools[{i}]: {e}")));
                }
            }
        }

        Ok(())
    }

    /// Resolves the documented conflict between `response_format` and
    /// `tools`: when both are present, `response_format` is dropped silently
    /// and tool use wins.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.tools.is_some() && self.response_format.take().is_some() {
            tracing::debug!("response_format dropped because tools are present");
        }
        self
    }
}

/// Chat request builder.
#[derive(Debug, Default)]
pub struct ChatRequestBuilder {
    model: Option<String>,
    messages: Vec<Message>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_completion_tokens: Option<u32>,
    top_p: Option<f32>,
    stop: Option<Vec<String>>,
    frequency_penalty: Option<f32>,
    presence_penalty: Option<f32>,
    response_format: Option<ResponseFormat>,
    reasoning_format: Option<ReasoningFormat>,
    seed: Option<i64>,
    tools: Option<Vec<Tool>>,
    tool_choice: Option<ToolChoice>,
    user: Option<String>,
    stream: Option<bool>,
    stream_options: Option<StreamOptions>,
}

impl ChatRequestBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets all messages.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Adds a message.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Adds a system message.
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Adds a user message.
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Adds an assistant message.
    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    /// Sets the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Sets the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Sets the max completion tokens (reasoning-model spelling).
    pub fn max_completion_tokens(mut self, tokens: u32) -> Self {
        self.max_completion_tokens = Some(tokens);
        self
    }

    /// Sets top_p.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets stop sequences.
    pub fn stop(mut self, sequences: Vec<String>) -> Self {
        self.stop = Some(sequences);
        self
    }

    /// Sets frequency penalty.
    pub fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Sets presence penalty.
    pub fn presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Enables JSON mode.
    pub fn json_mode(mut self) -> Self {
        self.response_format = Some(ResponseFormat {
            type_: ResponseFormatType::JsonObject,
        });
        self
    }

    /// Sets how model reasoning is presented.
    pub fn reasoning_format(mut self, format: ReasoningFormat) -> Self {
        self.reasoning_format = Some(format);
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets all tools.
    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Adds a tool.
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    /// Sets tool choice.
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Sets the user ID.
    pub fn user_id(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Enables streaming.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Includes usage in stream chunks.
    pub fn include_usage(mut self) -> Self {
        self.stream_options = Some(StreamOptions {
            include_usage: Some(true),
        });
        self
    }

    /// Builds the request.
    pub fn build(self) -> GroqResult<ChatRequest> {
        let request = ChatRequest {
            model: self.model.unwrap_or_default(),
            messages: self.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            max_completion_tokens: self.max_completion_tokens,
            top_p: self.top_p,
            stop: self.stop,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            response_format: self.response_format,
            reasoning_format: self.reasoning_format,
            seed: self.seed,
            tools: self.tools,
            tool_choice: self.tool_choice,
            user: self.user,
            stream: self.stream,
            stream_options: self.stream_options,
        };

        request.validate()?;
        Ok(request)
    }
}

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message role.
    pub role: Role,

    /// Message content.
    pub content: Content,

    /// Participant name (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool calls (for assistant messages).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Tool call ID (for tool messages).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(content.into()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(content.into()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a two-part user message: prompt text plus an image.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Text(content.into()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates an assistant message carrying tool calls.
    pub fn assistant_with_tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Text(String::new()),
            name: None,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Creates a tool result message, keyed by the originating call ID.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Content::Text(content.into()),
            name: None,
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Validates the message.
    pub fn validate(&self) -> Result<(), String> {
        if self.role == Role::Tool && self.tool_call_id.is_none() {
            return Err("tool messages require tool_call_id".to_string());
        }

        match &self.content {
            Content::Text(text) => {
                // Empty text is allowed for assistant messages carrying tool calls.
                if text.is_empty() && self.tool_calls.is_none() && self.role != Role::Assistant {
                    return Err("content cannot be empty".to_string());
                }
            }
            Content::Parts(parts) => {
                if parts.is_empty() {
                    return Err("content parts cannot be empty".to_string());
                }
            }
        }

        Ok(())
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message.
    System,
    /// User message.
    User,
    /// Assistant message.
    Assistant,
    /// Tool result message.
    Tool,
}

/// Message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Text content.
    Text(String),
    /// Multipart content.
    Parts(Vec<ContentPart>),
}

/// Content part for multimodal messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text part.
    Text {
        /// Text content.
        text: String,
    },
    /// Image URL part.
    ImageUrl {
        /// Image URL.
        image_url: ImageUrl,
    },
}

/// Image reference for vision messages.
///
/// The URL is a data URI, a remote http(s) URL, or a local file path; local
/// paths are rewritten to base64 data URIs before transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Image URL or base64 data URI.
    pub url: String,
}

/// Response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Format type.
    #[serde(rename = "type")]
    pub type_: ResponseFormatType,
}

/// Response format type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormatType {
    /// Plain text.
    Text,
    /// JSON object.
    JsonObject,
}

/// How reasoning-capable models present their reasoning channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningFormat {
    /// Reasoning separated into a dedicated response field.
    Parsed,
    /// Reasoning inlined within think tags in the content.
    Raw,
    /// Only the final answer is returned.
    Hidden,
}

/// Stream options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Include usage in final chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_usage: Option<bool>,
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response ID.
    pub id: String,

    /// Object type.
    pub object: String,

    /// Creation timestamp.
    pub created: i64,

    /// Model ID.
    pub model: String,

    /// Response choices.
    pub choices: Vec<Choice>,

    /// Token usage.
    #[serde(default)]
    pub usage: Usage,

    /// System fingerprint.
    pub system_fingerprint: Option<String>,

    /// Groq-specific metadata.
    pub x_groq: Option<GroqMetadata>,
}

impl ChatResponse {
    /// Gets the first choice content.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }

    /// Gets the parsed reasoning of the first choice, when present.
    pub fn reasoning(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.reasoning.as_deref())
    }

    /// Gets tool calls from the first choice.
    pub fn tool_calls(&self) -> Option<&Vec<ToolCall>> {
        self.choices.first().and_then(|c| c.message.tool_calls.as_ref())
    }

    /// Gets the finish reason from the first choice.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.choices.first().map(|c| c.finish_reason)
    }

    /// Builds a response from streaming chunks.
    pub fn from_chunks(chunks: Vec<ChatChunk>) -> GroqResult<Self> {
        let Some(first) = chunks.first() else {
            return Err(GroqError::chat_completion("No chunks received"));
        };
        let Some(last) = chunks.last() else {
            return Err(GroqError::chat_completion("No chunks received"));
        };

        let mut content = String::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();

        for chunk in &chunks {
            for choice in &chunk.choices {
                if let Some(c) = &choice.delta.content {
                    content.push_str(c);
                }
                if let Some(tc) = &choice.delta.tool_calls {
                    for tc_delta in tc {
                        merge_tool_call_delta(&mut tool_calls, tc_delta);
                    }
                }
            }
        }

        Ok(Self {
            id: first.id.clone(),
            object: "chat.completion".to_string(),
            created: first.created,
            model: first.model.clone(),
            choices: vec![Choice {
                index: 0,
                message: AssistantMessage {
                    role: Role::Assistant,
                    content: if content.is_empty() { None } else { Some(content) },
                    reasoning: None,
                    tool_calls: if tool_calls.is_empty() {
                        None
                    } else {
                        Some(tool_calls)
                    },
                },
                finish_reason: last
                    .choices
                    .first()
                    .and_then(|c| c.finish_reason)
                    .unwrap_or(FinishReason::Stop),
                logprobs: None,
            }],
            usage: last.usage.clone().unwrap_or_default(),
            system_fingerprint: last.system_fingerprint.clone(),
            x_groq: last.x_groq.clone(),
        })
    }
}

/// Merge a tool call delta into the accumulated tool calls.
fn merge_tool_call_delta(tool_calls: &mut Vec<ToolCall>, delta: &ToolCallDelta) {
    let index = delta.index as usize;

    while tool_calls.len() <= index {
        tool_calls.push(ToolCall {
            id: String::new(),
            type_: "function".to_string(),
            function: super::tools::FunctionCall {
                name: String::new(),
                arguments: String::new(),
            },
        });
    }

    let tool_call = &mut tool_calls[index];

    if let Some(id) = &delta.id {
        tool_call.id = id.clone();
    }
    if let Some(type_) = &delta.type_ {
        tool_call.type_ = type_.clone();
    }
    if let Some(func) = &delta.function {
        if let Some(name) = &func.name {
            tool_call.function.name = name.clone();
        }
        if let Some(args) = &func.arguments {
            tool_call.function.arguments.push_str(args);
        }
    }
}

/// Response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Choice index.
    pub index: u32,

    /// Assistant message.
    pub message: AssistantMessage,

    /// Finish reason.
    pub finish_reason: FinishReason,

    /// Log probabilities.
    pub logprobs: Option<serde_json::Value>,
}

/// Assistant message in response.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Message role.
    pub role: Role,

    /// Message content.
    pub content: Option<String>,

    /// Parsed reasoning channel (reasoning_format = parsed).
    pub reasoning: Option<String>,

    /// Tool calls.
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Finish reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Normal completion.
    Stop,
    /// Max tokens reached.
    Length,
    /// Tool calls needed.
    ToolCalls,
    /// Content filter triggered.
    ContentFilter,
}

/// Token usage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens.
    #[serde(default)]
    pub total_tokens: u32,

    /// Prompt time (Groq).
    pub prompt_time: Option<f64>,

    /// Completion time (Groq).
    pub completion_time: Option<f64>,

    /// Total time (Groq).
    pub total_time: Option<f64>,
}

/// Streaming chunk: one decoded event of a chat completion stream.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    /// Response ID.
    pub id: String,

    /// Object type.
    pub object: String,

    /// Creation timestamp.
    pub created: i64,

    /// Model ID.
    pub model: String,

    /// Chunk choices.
    pub choices: Vec<ChunkChoice>,

    /// Usage (in final chunk with include_usage).
    pub usage: Option<Usage>,

    /// System fingerprint.
    pub system_fingerprint: Option<String>,

    /// Groq metadata.
    pub x_groq: Option<GroqMetadata>,
}

/// Streaming choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    /// Choice index.
    pub index: u32,

    /// Delta content.
    pub delta: Delta,

    /// Finish reason (in final chunk).
    pub finish_reason: Option<FinishReason>,

    /// Log probabilities.
    pub logprobs: Option<serde_json::Value>,
}

/// Delta content in streaming.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delta {
    /// Role (first chunk only).
    pub role: Option<Role>,

    /// Content delta.
    pub content: Option<String>,

    /// Reasoning delta (reasoning_format = parsed).
    pub reasoning: Option<String>,

    /// Tool call deltas.
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::builder()
            .model("llama-3.3-70b-versatile")
            .system("You are a helpful assistant.")
            .user("Hello!")
            .temperature(0.7)
            .max_tokens(100)
            .build()
            .unwrap();

        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(100));
    }

    #[test]
    fn test_chat_request_validation_no_model() {
        let err = ChatRequest::builder().user("Hello").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(err.message().contains("model"));
    }

    #[test]
    fn test_chat_request_validation_no_messages() {
        let err = ChatRequest::builder().model("test-model").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(err.message().contains("messages"));
    }

    #[test]
    fn test_chat_request_validation_invalid_temperature() {
        let result = ChatRequest::builder()
            .model("test-model")
            .user("Hello")
            .temperature(3.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_response_format_dropped_when_tools_present() {
        let request = ChatRequest::builder()
            .model("test-model")
            .user("Hello")
            .json_mode()
            .tool(Tool::function(
                "get_weather",
                "Get the weather",
                serde_json::json!({"type": "object"}),
            ))
            .build()
            .unwrap()
            .normalized();

        assert!(request.response_format.is_none());
        assert!(request.tools.is_some());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_response_format_kept_without_tools() {
        let request = ChatRequest::builder()
            .model("test-model")
            .user("Hello")
            .json_mode()
            .build()
            .unwrap()
            .normalized();

        assert!(request.response_format.is_some());
    }

    #[test]
    fn test_none_fields_are_omitted_from_json() {
        let request = ChatRequest::builder()
            .model("test-model")
            .user("Hello")
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("temperature"));
        assert!(!object.contains_key("stop"));
        assert!(!object.contains_key("seed"));
        assert!(!object.contains_key("tool_choice"));
        assert!(!object.contains_key("stream"));
    }

    #[test]
    fn test_message_creation() {
        let system = Message::system("You are helpful");
        assert_eq!(system.role, Role::System);

        let user = Message::user("Hello");
        assert_eq!(user.role, Role::User);

        let assistant = Message::assistant("Hi there!");
        assert_eq!(assistant.role, Role::Assistant);

        let tool = Message::tool("call_123", "result");
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.tool_call_id, Some("call_123".to_string()));
    }

    #[test]
    fn test_message_with_image() {
        let msg = Message::user_with_image("What's in this image?", "https://example.com/img.jpg");
        assert_eq!(msg.role, Role::User);
        match msg.content {
            Content::Parts(parts) => assert_eq!(parts.len(), 2),
            Content::Text(_) => panic!("Expected Parts content"),
        }
    }

    #[test]
    fn test_message_validation_tool_without_id() {
        let msg = Message {
            role: Role::Tool,
            content: Content::Text("result".to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        };
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_chat_response_content() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1705312345,
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 5,
                "total_tokens": 15
            }
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content(), Some("Hello!"));
        assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
    }

    #[test]
    fn test_response_from_chunks_accumulates_content() {
        let chunk = |content: Option<&str>, finish: Option<&str>| -> ChatChunk {
            serde_json::from_value(serde_json::json!({
                "id": "cmpl-1",
                "object": "chat.completion.chunk",
                "created": 1,
                "model": "m",
                "choices": [{
                    "index": 0,
                    "delta": { "content": content },
                    "finish_reason": finish
                }]
            }))
            .unwrap()
        };

        let response = ChatResponse::from_chunks(vec![
            chunk(Some("Hel"), None),
            chunk(Some("lo"), None),
            chunk(None, Some("stop")),
        ])
        .unwrap();

        assert_eq!(response.content(), Some("Hello"));
        assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
    }
}
