use serde::{Deserialize, Serialize};

use super::types::{TextGenerator, VisionReader};
use super::SynopsisError;

/// Hosted Gemini API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model. Must be vision-capable so the same client can serve
/// both synopsis generation and page-image transcription.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini HTTP client for hosted inference.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a new GeminiClient for one model behind one API key.
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// POST one request to generateContent and return the generated text.
    ///
    /// Every request is sent exactly once. Callers decide whether a
    /// failure is worth retrying with a fresh call.
    fn request_content(&self, parts: Vec<Part<'_>>) -> Result<String, SynopsisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SynopsisError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    SynopsisError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    SynopsisError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SynopsisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| SynopsisError::ResponseParsing(e.to_string()))?;

        extract_text(parsed)
    }
}

/// Request body for models/{model}:generateContent
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

/// Response body from models/{model}:generateContent
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Pull the generated text out of a parsed response.
///
/// Text parts of the first candidate are concatenated. A response with
/// no candidates carries a block reason when safety filtering refused
/// the prompt; without one it is simply empty.
fn extract_text(parsed: GenerateContentResponse) -> Result<String, SynopsisError> {
    if let Some(candidate) = parsed.candidates.into_iter().next() {
        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(SynopsisError::EmptyResponse);
        }
        return Ok(text);
    }

    match parsed.prompt_feedback.and_then(|f| f.block_reason) {
        Some(reason) => Err(SynopsisError::ContentBlocked { reason }),
        None => Err(SynopsisError::EmptyResponse),
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, SynopsisError> {
        self.request_content(vec![Part {
            text: Some(prompt),
            inline_data: None,
        }])
    }
}

impl VisionReader for GeminiClient {
    fn transcribe(&self, prompt: &str, image_base64: &str) -> Result<String, SynopsisError> {
        self.request_content(vec![
            Part {
                text: Some(prompt),
                inline_data: None,
            },
            Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: "image/png",
                    data: image_base64,
                }),
            },
        ])
    }
}

/// Mock text generator for testing — returns a configurable synopsis.
pub struct MockTextGenerator {
    response: String,
    block_reason: Option<String>,
}

impl MockTextGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            block_reason: None,
        }
    }

    /// A generator whose every request is refused by safety filtering.
    pub fn refusing(reason: &str) -> Self {
        Self {
            response: String::new(),
            block_reason: Some(reason.to_string()),
        }
    }
}

impl TextGenerator for MockTextGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, SynopsisError> {
        if let Some(reason) = &self.block_reason {
            return Err(SynopsisError::ContentBlocked {
                reason: reason.clone(),
            });
        }
        Ok(self.response.clone())
    }
}

/// Mock vision reader for testing — returns a configurable transcription.
pub struct MockVisionReader {
    transcription: String,
}

impl MockVisionReader {
    pub fn new(transcription: &str) -> Self {
        Self {
            transcription: transcription.to_string(),
        }
    }
}

impl VisionReader for MockVisionReader {
    fn transcribe(&self, _prompt: &str, _image_base64: &str) -> Result<String, SynopsisError> {
        Ok(self.transcription.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_generator_returns_configured_response() {
        let client = MockTextGenerator::new("# Synopsis");
        let result = client.generate("prompt").unwrap();
        assert_eq!(result, "# Synopsis");
    }

    #[test]
    fn mock_generator_refuses_with_reason() {
        let client = MockTextGenerator::refusing("SAFETY");
        let err = client.generate("prompt").unwrap_err();
        assert!(matches!(err, SynopsisError::ContentBlocked { reason } if reason == "SAFETY"));
    }

    #[test]
    fn mock_vision_reader_returns_configured_text() {
        let reader = MockVisionReader::new("page text");
        assert_eq!(reader.transcribe("prompt", "aGVsbG8=").unwrap(), "page text");
    }

    #[test]
    fn gemini_client_constructor() {
        let client = GeminiClient::new(DEFAULT_API_BASE_URL, DEFAULT_MODEL, "key", 120);
        assert_eq!(client.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.timeout_secs, 120);
    }

    #[test]
    fn gemini_client_trims_trailing_slash() {
        let client = GeminiClient::new("https://example.test/", "gemini-1.5-flash", "key", 60);
        assert_eq!(client.base_url, "https://example.test");
    }

    #[test]
    fn text_request_serializes_to_wire_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hello"),
                    inline_data: None,
                }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!(value["contents"][0]["parts"][0].get("inlineData").is_none());
    }

    #[test]
    fn image_part_serializes_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png",
                        data: "aGVsbG8=",
                    }),
                }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        let part = &value["contents"][0]["parts"][0];
        assert_eq!(part["inlineData"]["mimeType"], "image/png");
        assert_eq!(part["inlineData"]["data"], "aGVsbG8=");
    }

    #[test]
    fn response_text_parts_are_concatenated() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Hello world");
    }

    #[test]
    fn blocked_prompt_surfaces_reason() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = extract_text(parsed).unwrap_err();
        assert!(matches!(err, SynopsisError::ContentBlocked { reason } if reason == "SAFETY"));
    }

    #[test]
    fn missing_candidates_without_reason_is_empty() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(SynopsisError::EmptyResponse)
        ));
    }

    #[test]
    fn candidate_without_text_is_empty() {
        let json = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(SynopsisError::EmptyResponse)
        ));
    }
}
