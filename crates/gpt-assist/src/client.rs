use crate::error::AssistError;
use crate::types::{ChatCompletion, ChatMessage, ChatRequest, ResponseFormat};
use crate::Result;

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

const WORD_SYSTEM_PROMPT: &str = "\
You are a brainstorming assistant that performs word association.
Given a word and a genre, return a single word that is:
1. Associated with the input word
2. Relevant to the specified genre
3. Useful for ideation
Reply with exactly one Japanese word and nothing else.";

const CONCEPT_SYSTEM_PROMPT: &str = "\
あなたは正確なJSON形式でのみ応答するアシスタントです。\
余分な説明や装飾は一切付けずに、配列形式で3つのコンセプトを返してください。";

fn word_prompt(word: &str, genre: &str, used: &[String]) -> String {
    format!(
        "Give one Japanese word associated with \"{word}\" in the genre \"{genre}\".\n\
         Avoid these previously used words: {}",
        used.join(", ")
    )
}

fn concept_prompt(keywords: &[String]) -> String {
    format!(
        "与えられたキーワードを基に、3つの革新的なプロジェクトコンセプトを日本語で生成してください。\n\
         各コンセプトは、核となるアイデアを1つの簡潔な文章で表現してください。\n\n\
         要件:\n\
         - 正確に3つのコンセプトを生成\n\
         - 各コンセプトは創造的でユニークであること\n\
         - 番号や接頭辞は含めない\n\n\
         キーワード: {}\n\n\
         以下の形式で厳密に返答してください:\n\
         [\"コンセプト1\", \"コンセプト2\", \"コンセプト3\"]",
        keywords.join(", ")
    )
}

// ---------------------------------------------------------------------------
// ClientOptions
// ---------------------------------------------------------------------------

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub api_key: String,
    pub word_model: String,
    pub concept_model: String,
    pub word_temperature: f32,
    pub concept_temperature: f32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            word_model: "gpt-4o".to_string(),
            concept_model: "gpt-4-turbo".to_string(),
            word_temperature: 0.7,
            concept_temperature: 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// AssistClient
// ---------------------------------------------------------------------------

/// Client for the two brainstorming assists: single-word association for the
/// mind-map step and three-concept generation for the concept step.
#[derive(Debug, Clone)]
pub struct AssistClient {
    http: reqwest::Client,
    options: ClientOptions,
}

impl AssistClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            options,
        }
    }

    /// Read the API key from `key_env` and build a client with it.
    pub fn from_env(mut options: ClientOptions, key_env: &str) -> Result<Self> {
        let api_key =
            std::env::var(key_env).map_err(|_| AssistError::MissingApiKey(key_env.to_string()))?;
        options.api_key = api_key;
        Ok(Self::new(options))
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let url = format!("{}/chat/completions", self.options.base_url);
        tracing::debug!(model = %request.model, "requesting completion");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.options.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<ChatCompletion>().await?)
    }

    /// One word associated with `word` within `genre`, avoiding everything in
    /// `used`. The model is instructed to answer with the bare word; the
    /// response is trimmed and returned as-is.
    pub async fn associate_word(&self, word: &str, genre: &str, used: &[String]) -> Result<String> {
        let request = ChatRequest {
            model: self.options.word_model.clone(),
            messages: vec![
                ChatMessage::system(WORD_SYSTEM_PROMPT),
                ChatMessage::user(word_prompt(word, genre, used)),
            ],
            temperature: self.options.word_temperature,
            response_format: None,
        };

        let completion = self.complete(&request).await?;
        let content = completion
            .first_content()
            .map(str::trim)
            .unwrap_or_default();
        if content.is_empty() {
            return Err(AssistError::EmptyCompletion);
        }
        Ok(content.to_string())
    }

    /// Exactly three short concept strings inspired by `keywords`. The model
    /// is asked for a strict JSON array; a `{"concepts": [...]}` wrapper is
    /// tolerated, anything else is rejected.
    pub async fn generate_concepts(&self, keywords: &[String]) -> Result<Vec<String>> {
        let request = ChatRequest {
            model: self.options.concept_model.clone(),
            messages: vec![
                ChatMessage::system(CONCEPT_SYSTEM_PROMPT),
                ChatMessage::user(concept_prompt(keywords)),
            ],
            temperature: self.options.concept_temperature,
            response_format: Some(ResponseFormat::json_object()),
        };

        let completion = self.complete(&request).await?;
        let content = completion.first_content().ok_or(AssistError::EmptyCompletion)?;
        parse_concepts(content)
    }
}

/// Pull exactly three strings out of the model's JSON reply.
fn parse_concepts(content: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| AssistError::MalformedConcepts(format!("not JSON: {e}")))?;

    let array = match &value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(map) => match map.get("concepts") {
            Some(serde_json::Value::Array(items)) => items.as_slice(),
            _ => {
                return Err(AssistError::MalformedConcepts(
                    "object without a 'concepts' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(AssistError::MalformedConcepts(
                "neither array nor object".to_string(),
            ))
        }
    };

    let concepts: Vec<String> = array
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .collect();

    if concepts.len() != array.len() || concepts.len() != 3 {
        return Err(AssistError::MalformedConcepts(format!(
            "expected exactly 3 strings, got {}",
            array.len()
        )));
    }
    Ok(concepts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
