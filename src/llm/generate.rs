use tracing::info;

use super::client::{CompletionRequest, GenerationError, TextGenerator};
use super::prompts::{
    build_dispute_prompt, build_summary_prompt, DisputeContext, DISPUTE_SYSTEM_PROMPT,
    SUMMARY_SYSTEM_PROMPT,
};

pub const SUMMARY_FALLBACK: &str = "Summary unavailable.";
pub const DISPUTE_FALLBACK: &str = "Unable to generate response.";

/// Write a short prose summary of a call
pub async fn generate_summary<G: TextGenerator>(
    generator: &G,
    transcript: &str,
) -> Result<String, GenerationError> {
    let request = CompletionRequest {
        system: SUMMARY_SYSTEM_PROMPT.to_string(),
        user: build_summary_prompt(transcript),
        max_tokens: 160,
        temperature: 0.3,
    };

    info!("Generating call summary");
    let text = generator.complete(&request).await?;
    Ok(or_fallback(text, SUMMARY_FALLBACK))
}

/// Draft the body of a dispute response letter from an analyzed call
pub async fn generate_dispute_letter<G: TextGenerator>(
    generator: &G,
    ctx: &DisputeContext<'_>,
) -> Result<String, GenerationError> {
    let request = CompletionRequest {
        system: DISPUTE_SYSTEM_PROMPT.to_string(),
        user: build_dispute_prompt(ctx),
        max_tokens: 600,
        temperature: 0.2,
    };

    info!("Generating dispute response letter");
    let text = generator.complete(&request).await?;
    Ok(or_fallback(text, DISPUTE_FALLBACK))
}

fn or_fallback(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::{CallType, MoveSize};

    /// Replays a fixed reply and records the requests it saw
    struct ScriptedGenerator {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .map_err(GenerationError::ServiceUnavailable)
        }
    }

    #[tokio::test]
    async fn test_summary_request_shape() {
        let generator = ScriptedGenerator::replying("Customer booked a two bedroom move.");

        let summary = generate_summary(&generator, "We quoted $185 per hour.").await.unwrap();

        assert_eq!(summary, "Customer booked a two bedroom move.");
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, 160);
        assert_eq!(seen[0].temperature, 0.3);
        assert!(seen[0].user.ends_with("We quoted $185 per hour."));
    }

    #[tokio::test]
    async fn test_empty_reply_uses_fallback() {
        let generator = ScriptedGenerator::replying("   ");
        let summary = generate_summary(&generator, "hello").await.unwrap();
        assert_eq!(summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_dispute_failure_propagates() {
        let generator = ScriptedGenerator::failing("timeout");
        let ctx = DisputeContext {
            rep_name: "",
            call_date: None,
            call_type: CallType::Storage,
            move_size: MoveSize::Unknown,
            notes: "",
            transcript: "",
            results: &[],
        };

        let err = generate_dispute_letter(&generator, &ctx).await.unwrap_err();

        assert!(matches!(err, GenerationError::ServiceUnavailable(ref m) if m == "timeout"));
        assert_eq!(generator.seen.lock().unwrap()[0].max_tokens, 600);
    }
}
