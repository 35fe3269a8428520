use std::io::Write;

use anyhow::Result;
use futures::StreamExt;
use tracing::{error, info};

use crate::rank::relevant_context;
use crate::state::AppState;

/// Answer a question, printing the formatted answer as it streams in.
///
/// Model failures are reported to the user with setup hints; they do not end
/// the session. Only failures writing to `out` are returned.
pub async fn ask(state: &AppState, question: &str, out: &mut impl Write) -> Result<()> {
    info!(question, "Question received");

    let context = relevant_context(
        &state.index,
        question,
        state.config.top_k,
        state.config.context_size,
    );

    writeln!(out, "\nThinking...")?;
    out.flush()?;

    let mut chunks = state.engine.answer(question, &context);
    let mut started = false;

    while let Some(item) = chunks.next().await {
        match item {
            Ok(text) => {
                if !started {
                    writeln!(out, "\nAnswer:")?;
                    started = true;
                }
                write!(out, "{}", text)?;
                out.flush()?;
            }
            Err(e) => {
                error!(question, "Answer failed: {}", e);
                writeln!(out, "\nError generating response: {}", e)?;
                writeln!(
                    out,
                    "Make sure Ollama is running and the model is correctly installed (ollama pull {}).",
                    state.engine.settings().model
                )?;
                return Ok(());
            }
        }
    }

    writeln!(out, "\n")?;
    Ok(())
}
