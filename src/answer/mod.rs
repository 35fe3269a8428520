pub mod prompts;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::AssistantError;
use crate::llm::{GenerateOptions, GenerateRequest, ModelClient, TextStream};

/// Model and sampling parameters shared by both stages.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationSettings {
    fn request(&self, prompt: String, stream: bool) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }
}

/// Where one answer is in its two-stage lifecycle.
enum Stage {
    /// Nothing sent yet; the next poll runs the analysis stage.
    Pending { question: String, context: String },
    /// Analysis finished; formatted answer chunks are being forwarded.
    Streaming { chunks: TextStream, emitted: usize },
    Done,
    Failed,
}

/// Drives the two generation stages for a question.
pub struct AnswerEngine {
    llm: Arc<dyn ModelClient>,
    settings: GenerationSettings,
}

impl AnswerEngine {
    pub fn new(llm: Arc<dyn ModelClient>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Answer `question` from `context` as a lazy stream of text chunks.
    ///
    /// Nothing is sent until the stream is first polled. The analysis stage runs
    /// to completion before the formatting stage starts; if it fails the stream
    /// yields a single `ModelUnavailable` error and ends. A failure while the
    /// answer is streaming is yielded after the chunks already produced, and ends
    /// the stream. Dropping the stream early stops requesting chunks.
    pub fn answer(&self, question: &str, context: &str) -> TextStream {
        let stage = Stage::Pending {
            question: question.to_string(),
            context: context.to_string(),
        };
        let state = (stage, Arc::clone(&self.llm), self.settings.clone());

        let chunks = stream::unfold(state, |(mut stage, llm, settings)| async move {
            loop {
                stage = match stage {
                    Stage::Pending { question, context } => {
                        let opened =
                            open_answer(llm.as_ref(), &settings, &question, &context).await;
                        match opened {
                            Ok(chunks) => Stage::Streaming { chunks, emitted: 0 },
                            Err(e) => return Some((Err(e), (Stage::Failed, llm, settings))),
                        }
                    }
                    Stage::Streaming {
                        mut chunks,
                        emitted,
                    } => {
                        let item = chunks.next().await;
                        match item {
                            Some(Ok(text)) => {
                                let next = Stage::Streaming {
                                    chunks,
                                    emitted: emitted + 1,
                                };
                                return Some((Ok(text), (next, llm, settings)));
                            }
                            Some(Err(e)) => {
                                warn!(emitted, "Answer stream failed: {}", e);
                                let e = unavailable(e);
                                return Some((Err(e), (Stage::Failed, llm, settings)));
                            }
                            None => {
                                info!(chunks = emitted, "Answer complete");
                                Stage::Done
                            }
                        }
                    }
                    Stage::Done | Stage::Failed => return None,
                };
            }
        });

        Box::pin(chunks.fuse())
    }
}

/// Run the analysis stage, then open the formatting stream.
async fn open_answer(
    llm: &dyn ModelClient,
    settings: &GenerationSettings,
    question: &str,
    context: &str,
) -> Result<TextStream, AssistantError> {
    let analysis_prompt = prompts::content_analysis(question, context);
    debug!(prompt_len = analysis_prompt.len(), "Stage 1: content analysis");

    let analysis = llm
        .complete(&settings.request(analysis_prompt, false))
        .await
        .map_err(|e| {
            warn!("Content analysis failed: {}", e);
            unavailable(e)
        })?;
    debug!(analysis_len = analysis.len(), "Stage 1 complete");

    let formatting_prompt = prompts::language_formatting(question, &analysis);
    debug!(prompt_len = formatting_prompt.len(), "Stage 2: language formatting");

    llm.stream(&settings.request(formatting_prompt, true))
        .await
        .map_err(unavailable)
}

/// Failures at the model boundary all surface as `ModelUnavailable`.
fn unavailable(err: AssistantError) -> AssistantError {
    match err {
        AssistantError::ModelUnavailable(_) => err,
        other => AssistantError::ModelUnavailable(other.to_string()),
    }
}
