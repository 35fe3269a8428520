use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AssistantError;

/// Finite sequence of generated text chunks. Dropping it stops the transfer.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AssistantError>> + Send>>;

/// Sampling options sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    /// Cap on generated tokens.
    pub num_predict: u32,
}

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

/// The language-model service, treated as an opaque request/response capability.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run `request` to completion and return the whole text. Streaming is
    /// disabled regardless of `request.stream`.
    async fn complete(&self, request: &GenerateRequest) -> Result<String, AssistantError>;

    /// Run `request` and yield text as it is generated.
    async fn stream(&self, request: &GenerateRequest) -> Result<TextStream, AssistantError>;

    /// Names of the models the service can run.
    async fn list_models(&self) -> Result<Vec<String>, AssistantError>;
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    /// Whole-request limit for non-streaming calls.
    timeout: Duration,
}

#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// `timeout` bounds connecting and each wait for body data. Non-streaming
    /// calls are also bounded by it end to end; a streamed answer may run longer
    /// as long as data keeps arriving.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| {
                AssistantError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn generate(&self, request: &GenerateRequest) -> reqwest::RequestBuilder {
        let builder = self.client.post(self.endpoint("generate")).json(request);
        if request.stream {
            builder
        } else {
            builder.timeout(self.timeout)
        }
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, AssistantError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(AssistantError::ModelUnavailable(format!(
        "Ollama returned {}: {}",
        status,
        body.trim()
    )))
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn complete(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        let request = GenerateRequest {
            stream: false,
            ..request.clone()
        };
        let resp = check_status(self.generate(&request).send().await?).await?;
        let chunk: GenerateChunk = resp.json().await?;
        if let Some(err) = chunk.error {
            return Err(AssistantError::ModelUnavailable(err));
        }
        debug!(model = %request.model, response_len = chunk.response.len(), "Completion received");
        Ok(chunk.response)
    }

    async fn stream(&self, request: &GenerateRequest) -> Result<TextStream, AssistantError> {
        let request = GenerateRequest {
            stream: true,
            ..request.clone()
        };
        let resp = check_status(self.generate(&request).send().await?).await?;

        Ok(generate_chunks(stream_lines(resp.bytes_stream())))
    }

    async fn list_models(&self) -> Result<Vec<String>, AssistantError> {
        let resp = self
            .client
            .get(self.endpoint("tags"))
            .timeout(self.timeout)
            .send()
            .await?;
        let tags: TagsResponse = check_status(resp).await?.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Whether `model` is among the service's model names. A bare name matches
/// its `:latest` tag, the way `ollama run` resolves it.
pub fn has_model(available: &[String], model: &str) -> bool {
    let tagged = format!("{}:latest", model);
    available
        .iter()
        .any(|name| name.eq_ignore_ascii_case(model) || name.eq_ignore_ascii_case(&tagged))
}

/// Parse one NDJSON line of a streaming generate response into
/// `(text, done)`. Blank lines yield `None`.
fn parse_generate_line(line: &str) -> Result<Option<(String, bool)>, AssistantError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let chunk: GenerateChunk = serde_json::from_str(line).map_err(|e| {
        AssistantError::ModelUnavailable(format!("Failed to parse Ollama chunk: {}", e))
    })?;
    if let Some(err) = chunk.error {
        return Err(AssistantError::ModelUnavailable(err));
    }
    Ok(Some((chunk.response, chunk.done)))
}

/// Turn NDJSON generate lines into text chunks. Ends after the `done` line or
/// the first error; empty pieces are dropped.
fn generate_chunks(
    lines: impl Stream<Item = Result<String, AssistantError>> + Send + 'static,
) -> TextStream {
    let chunks = lines
        .scan(false, |finished, line| {
            let item = if *finished {
                None
            } else {
                match line.and_then(|l| parse_generate_line(&l)) {
                    Ok(Some((text, done))) => {
                        *finished = done;
                        Some(Ok(text))
                    }
                    Ok(None) => Some(Ok(String::new())),
                    Err(e) => {
                        *finished = true;
                        Some(Err(e))
                    }
                }
            };
            futures::future::ready(item)
        })
        .filter(|item| futures::future::ready(!matches!(item, Ok(text) if text.is_empty())));

    Box::pin(chunks)
}

/// Convert a byte stream into a stream of complete lines.
fn stream_lines<B>(
    byte_stream: impl Stream<Item = reqwest::Result<B>> + Send + 'static,
) -> impl Stream<Item = Result<String, AssistantError>> + Send
where
    B: AsRef<[u8]> + Send + 'static,
{
    stream::unfold(
        (Box::pin(byte_stream), Vec::<u8>::new()),
        |(mut bytes, mut buffer)| async move {
            loop {
                if let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line[..pos]).into_owned();
                    if !line.trim().is_empty() {
                        return Some((Ok(line), (bytes, buffer)));
                    }
                    continue;
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(chunk.as_ref()),
                    Some(Err(e)) => {
                        return Some((
                            Err(AssistantError::ModelUnavailable(format!(
                                "Stream read error: {}",
                                e
                            ))),
                            (bytes, buffer),
                        ));
                    }
                    None => {
                        if buffer.iter().all(u8::is_ascii_whitespace) {
                            return None;
                        }
                        let rest = String::from_utf8_lossy(&std::mem::take(&mut buffer)).into_owned();
                        return Some((Ok(rest), (bytes, buffer)));
                    }
                }
            }
        },
    )
}
