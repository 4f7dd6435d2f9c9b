use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dmc_core::{Error, InferenceModel, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::heuristic;

/// Prompt input is truncated to this many characters before the chat call.
const MAX_PROMPT_CHARS: usize = 4000;

const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Chat-completion backed summarizer and entity extractor. Every call is a
/// single attempt; failures degrade to truncation or the heuristic matcher
/// rather than propagating.
pub struct OpenAiModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiModel {
    pub fn new(api_key: String, model_name: Option<String>) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Inference("API key is required".to_string()));
        }
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn chat(&self, request: ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| Error::Inference("empty completion response".to_string()))
    }

    fn truncate_prompt_input(text: &str) -> String {
        if text.chars().count() > MAX_PROMPT_CHARS {
            let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
            format!("{}...", truncated)
        } else {
            text.to_string()
        }
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for OpenAiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        if text.chars().count() < heuristic::MIN_SUMMARY_INPUT {
            return Ok(text.to_string());
        }

        let prompt = format!(
            "Please summarize the following news article concisely in 2-3 sentences \
             while preserving the key information and main points:\n\n{}",
            Self::truncate_prompt_input(text)
        );
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: Some(150),
            temperature: Some(0.5),
            response_format: None,
        };

        match self.chat(request).await {
            Ok(summary) => {
                let summary = summary.trim().to_string();
                if summary.is_empty() {
                    Ok(heuristic::truncate_summary(text))
                } else {
                    Ok(summary)
                }
            }
            Err(e) => {
                tracing::warn!("summarization failed, falling back to truncation: {}", e);
                Ok(heuristic::truncate_summary(text))
            }
        }
    }

    async fn extract_politicians(&self, text: &str) -> Result<Vec<String>> {
        if text.chars().count() < heuristic::MIN_SUMMARY_INPUT {
            return Ok(Vec::new());
        }

        let prompt = format!(
            "Please identify all politicians (current or former government officials, \
             elected representatives, etc.) mentioned in the following text. The text \
             may be in Hebrew or English. Return a JSON array containing only their \
             names, with no additional information. For example: \
             [\"יצחק הרצוג\", \"בנימין נתניהו\"] or [\"John Smith\", \"Jane Doe\"]\n\n\
             Text:\n{}",
            Self::truncate_prompt_input(text)
        );
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: None,
            temperature: Some(0.3),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        match self.chat(request).await {
            Ok(content) => Ok(parse_name_list(&content)),
            Err(e) => {
                tracing::warn!("extraction failed, falling back to heuristics: {}", e);
                Ok(heuristic::extract_names(text))
            }
        }
    }
}

/// Parses the model's reply, accepting a bare array or a `politicians`/`names`
/// wrapper object. Names below the minimum length are dropped.
fn parse_name_list(content: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("could not parse name list from completion: {}", e);
            return Vec::new();
        }
    };

    let array = match &value {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::Object(map) => map
            .get("politicians")
            .or_else(|| map.get("names"))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    array
        .into_iter()
        .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|name| name.chars().count() >= heuristic::MIN_NAME_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_requires_api_key() {
        assert!(OpenAiModel::new(String::new(), None).is_err());
        assert!(OpenAiModel::new("test-key".to_string(), None).is_ok());
    }

    #[test]
    fn test_parse_bare_array() {
        let names = parse_name_list(r#"["בנימין נתניהו", "יאיר לפיד"]"#);
        assert_eq!(names, vec!["בנימין נתניהו", "יאיר לפיד"]);
    }

    #[test]
    fn test_parse_wrapped_object() {
        let names = parse_name_list(r#"{"politicians": ["Benjamin Netanyahu"]}"#);
        assert_eq!(names, vec!["Benjamin Netanyahu"]);

        let names = parse_name_list(r#"{"names": ["Yair Lapid"]}"#);
        assert_eq!(names, vec!["Yair Lapid"]);
    }

    #[test]
    fn test_parse_drops_short_names() {
        let names = parse_name_list(r#"["ביבי", "בנימין נתניהו"]"#);
        assert_eq!(names, vec!["בנימין נתניהו"]);
    }

    #[test]
    fn test_parse_garbage_yields_empty() {
        assert!(parse_name_list("not json at all").is_empty());
        assert!(parse_name_list(r#"{"unrelated": 3}"#).is_empty());
    }

    #[tokio::test]
    async fn test_short_input_skips_api() {
        // No server is reachable in tests; a short input must not need one.
        let model = OpenAiModel::new("test-key".to_string(), None).unwrap();
        let text = "כותרת";
        assert_eq!(model.summarize(text).await.unwrap(), text);
        assert!(model.extract_politicians(text).await.unwrap().is_empty());
    }
}
