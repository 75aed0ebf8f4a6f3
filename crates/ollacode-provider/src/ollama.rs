//! Ollama chat client.
//!
//! Talks to the native Ollama API: `POST /api/chat` with `stream: true`
//! returns newline-delimited JSON, `GET /api/tags` lists local models.

use crate::error::{ProviderError, ProviderResult};
use crate::message::Message;
use crate::stream::{NdjsonDecoder, TextStream};
use crate::LanguageModel;
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Client for a local (or remote) Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for `base_url`.
    ///
    /// Trailing slashes and an OpenAI-compatible `/v1` suffix are removed so
    /// requests reach the native `/api/*` routes.
    pub fn new(base_url: impl AsRef<str>) -> ProviderResult<Self> {
        let base_url = host_root(base_url.as_ref());
        Url::parse(&base_url)?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check that the server answers `GET /api/tags`.
    pub async fn validate_connection(&self) -> bool {
        match self.http.get(self.endpoint("api/tags")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, url = %self.base_url, "Ollama connection check failed");
                false
            }
        }
    }

    /// Names of the models available locally.
    pub async fn list_models(&self) -> ProviderResult<Vec<String>> {
        let response = self
            .http
            .get(self.endpoint("api/tags"))
            .send()
            .await
            .map_err(|e| ProviderError::connection(&self.base_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error(status.as_u16(), body));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether `model` is available, matching the exact name or any tag of it
    /// (`qwen2.5-coder` matches `qwen2.5-coder:7b`).
    pub async fn has_model(&self, model: &str) -> bool {
        match self.list_models().await {
            Ok(models) => models.iter().any(|name| model_matches(name, model)),
            Err(e) => {
                warn!(error = %e, model = %model, "Failed to list Ollama models");
                false
            }
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn stream_chat(&self, messages: &[Message], model: &str) -> ProviderResult<TextStream> {
        let request = ChatRequest {
            model,
            messages,
            stream: true,
        };

        info!(
            model = %model,
            message_count = messages.len(),
            "Sending Ollama chat request"
        );

        let response = self
            .http
            .post(self.endpoint("api/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::connection(&self.base_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Ollama API error");
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            };
            return Err(ProviderError::api_error(status.as_u16(), message));
        }

        let mut bytes = response.bytes_stream();

        Ok(Box::pin(try_stream! {
            let mut decoder = NdjsonDecoder::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = chunk?;
                for fragment in decoder.push(&chunk)? {
                    yield fragment;
                }
                if decoder.is_done() {
                    break;
                }
            }

            for fragment in decoder.finish()? {
                yield fragment;
            }
        }))
    }

    fn provider_id(&self) -> &str {
        "ollama"
    }
}

/// Reduce a configured URL to the Ollama host root.
fn host_root(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    match trimmed.strip_suffix("/v1") {
        Some(root) => root.trim_end_matches('/').to_string(),
        None => trimmed.to_string(),
    }
}

fn model_matches(available: &str, wanted: &str) -> bool {
    available == wanted
        || available
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ndjson(parts: &[(&str, bool)]) -> String {
        parts
            .iter()
            .map(|(content, done)| {
                format!(
                    "{}\n",
                    serde_json::json!({"message": {"role": "assistant", "content": content}, "done": done})
                )
            })
            .collect()
    }

    async fn collect(stream: TextStream) -> Vec<String> {
        stream.map(|r| r.unwrap()).collect().await
    }

    #[test]
    fn test_host_root() {
        assert_eq!(host_root("http://localhost:11434/"), "http://localhost:11434");
        assert_eq!(host_root("http://localhost:11434/v1"), "http://localhost:11434");
        assert_eq!(host_root("https://ollama.example.com/v1/"), "https://ollama.example.com");
    }

    #[test]
    fn test_new_rejects_garbage_url() {
        assert!(matches!(
            OllamaClient::new("not a url"),
            Err(ProviderError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_model_matches() {
        assert!(model_matches("qwen2.5-coder:7b", "qwen2.5-coder:7b"));
        assert!(model_matches("qwen2.5-coder:7b", "qwen2.5-coder"));
        assert!(!model_matches("qwen2.5-coder-extra:7b", "qwen2.5-coder"));
        assert!(!model_matches("llama3:8b", "qwen2.5-coder"));
    }

    #[tokio::test]
    async fn test_stream_chat_yields_fragments_until_done() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                ndjson(&[("Hello", false), (", world", false), ("", true), ("ignored", false)]),
                "application/x-ndjson",
            ))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let stream = client
            .stream_chat(&[Message::user("hi")], "qwen2.5-coder:7b")
            .await
            .unwrap();

        assert_eq!(collect(stream).await, vec!["Hello", ", world"]);
    }

    #[tokio::test]
    async fn test_stream_chat_sends_model_messages_and_stream_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(ndjson(&[("ok", true)]), "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let stream = client.stream_chat(&messages, "llama3").await.unwrap();
        collect(stream).await;

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn test_stream_chat_skips_bad_lines_and_reads_tail() {
        let server = MockServer::start().await;
        let body = format!(
            "{}garbage line\n{}",
            ndjson(&[("one", false)]),
            serde_json::json!({"message": {"content": "two"}, "done": true})
        );
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let stream = client.stream_chat(&[Message::user("hi")], "m").await.unwrap();
        assert_eq!(collect(stream).await, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_stream_chat_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let err = match client.stream_chat(&[Message::user("hi")], "missing").await {
            Ok(_) => panic!("expected an API error"),
            Err(e) => e,
        };
        assert_eq!(err.to_string(), "Ollama API error (404): model not found");
    }

    #[tokio::test]
    async fn test_stream_chat_connection_refused() {
        let client = OllamaClient::new("http://127.0.0.1:9").unwrap();
        let err = match client.stream_chat(&[Message::user("hi")], "m").await {
            Ok(_) => panic!("expected a connection error"),
            Err(e) => e,
        };
        assert!(err.is_connection());
        assert!(err
            .to_string()
            .starts_with("Failed to connect to Ollama at http://127.0.0.1:9."));
    }

    #[tokio::test]
    async fn test_validate_connection_and_has_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({"models": [{"name": "qwen2.5-coder:7b"}, {"name": "llama3:8b"}]})
                    .to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        assert!(client.validate_connection().await);
        assert!(client.has_model("qwen2.5-coder:7b").await);
        assert!(client.has_model("llama3").await);
        assert!(!client.has_model("mistral").await);
        assert_eq!(
            client.list_models().await.unwrap(),
            vec!["qwen2.5-coder:7b", "llama3:8b"]
        );
    }

    #[tokio::test]
    async fn test_validate_connection_unreachable() {
        let client = OllamaClient::new("http://127.0.0.1:9").unwrap();
        assert!(!client.validate_connection().await);
        assert!(!client.has_model("anything").await);
    }
}
