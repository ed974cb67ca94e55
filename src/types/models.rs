//! Model types.

use serde::Deserialize;

/// Model information.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    /// Model ID.
    pub id: String,

    /// Object type (always "model").
    pub object: String,

    /// Creation timestamp.
    pub created: i64,

    /// Owner organization.
    pub owned_by: String,

    /// Whether the model is active.
    #[serde(default)]
    pub active: bool,

    /// Context window size.
    pub context_window: Option<u32>,
}

/// Model list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    /// Object type (always "list").
    pub object: String,

    /// List of models.
    pub data: Vec<Model>,
}

impl ModelList {
    /// Returns the number of models.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets a model by ID.
    pub fn get(&self, id: &str) -> Option<&Model> {
        self.data.iter().find(|m| m.id == id)
    }

    /// Returns an iterator over the models.
    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.data.iter()
    }
}

/// Well-known Groq models.
pub mod known {
    /// Llama 3.3 70B Versatile model.
    pub const LLAMA_3_3_70B_VERSATILE: &str = "llama-3.3-70b-versatile";

    /// Llama 3.1 8B Instant model.
    pub const LLAMA_3_1_8B_INSTANT: &str = "llama-3.1-8b-instant";

    /// DeepSeek R1 distill, reasoning-capable.
    pub const DEEPSEEK_R1_DISTILL_LLAMA_70B: &str = "deepseek-r1-distill-llama-70b";

    /// Whisper Large V3 model.
    pub const WHISPER_LARGE_V3: &str = "whisper-large-v3";

    /// Whisper Large V3 Turbo model.
    pub const WHISPER_LARGE_V3_TURBO: &str = "whisper-large-v3-turbo";

    /// PlayAI text-to-speech model.
    pub const PLAYAI_TTS: &str = "playai-tts";

    /// Llama 3.2 Vision 90B model.
    pub const LLAMA_3_2_90B_VISION: &str = "llama-3.2-90b-vision-preview";

    /// Llama 3.2 Vision 11B model.
    pub const LLAMA_3_2_11B_VISION: &str = "llama-3.2-11b-vision-preview";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parsing() {
        let json = r#"{
            "id": "llama-3.3-70b-versatile",
            "object": "model",
            "created": 1699999999,
            "owned_by": "groq",
            "active": true,
            "context_window": 128000
        }"#;

        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.id, "llama-3.3-70b-versatile");
        assert!(model.active);
        assert_eq!(model.context_window, Some(128_000));
    }

    #[test]
    fn test_model_list_lookup() {
        let json = r#"{
            "object": "list",
            "data": [
                { "id": "a", "object": "model", "created": 1, "owned_by": "groq" },
                { "id": "b", "object": "model", "created": 2, "owned_by": "groq" }
            ]
        }"#;

        let list: ModelList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.get("a").is_some());
        assert!(list.get("missing").is_none());
    }
}
