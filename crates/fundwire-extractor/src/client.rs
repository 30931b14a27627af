//! Core ExtractionClient implementation

use crate::conversation::Conversation;
use crate::error::ExtractorError;
use crate::parser::parse_reply;
use fundwire_domain::{ChatProvider, ExtractedFields};
use tracing::{debug, info, warn};

/// Default repair-attempt budget. Small on purpose: each repair resends the
/// full grown conversation, so the budget bounds both latency and cost.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Extracts a structured JSON payload from article text via an LLM.
///
/// Prompt-agnostic: the caller resolves the system prompt (per-user override
/// or platform default) before calling `extract`. The shape of the returned
/// object is opaque to this client: the contract is "valid JSON object",
/// not a specific schema.
pub struct ExtractionClient<P>
where
    P: ChatProvider,
{
    provider: P,
    max_retries: u32,
}

impl<P> ExtractionClient<P>
where
    P: ChatProvider + Send + Sync,
{
    /// Create a client with the default repair budget.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the repair-attempt budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Extract a JSON object from `article_text`.
    ///
    /// Issues at most `max_retries + 1` requests. Transport failures abort
    /// immediately with no repair attempt; malformed replies consume one
    /// repair attempt each.
    ///
    /// # Errors
    ///
    /// - `EmptyArticle`: text is empty or whitespace; no request is made
    /// - `Transport`: connection or HTTP failure on any request
    /// - `MalformedOutput`: repair budget exhausted without a parseable object
    pub async fn extract(
        &self,
        article_text: &str,
        system_prompt: &str,
    ) -> Result<ExtractedFields, ExtractorError> {
        if article_text.trim().is_empty() {
            return Err(ExtractorError::EmptyArticle);
        }

        let mut conversation = Conversation::seed(system_prompt, article_text);

        for attempt in 0..=self.max_retries {
            let reply = self
                .provider
                .complete(conversation.messages())
                .await
                .map_err(|e| ExtractorError::Transport(e.to_string()))?;

            debug!(attempt = attempt + 1, reply_len = reply.len(), "received LLM reply");

            match parse_reply(&reply) {
                Ok(fields) => {
                    info!(
                        attempt = attempt + 1,
                        fields = fields.len(),
                        "extraction succeeded"
                    );
                    return Ok(fields);
                }
                Err(reason) => {
                    warn!(attempt = attempt + 1, %reason, "malformed LLM reply");
                    if attempt < self.max_retries {
                        conversation.push_repair(&reply);
                    }
                }
            }
        }

        Err(ExtractorError::MalformedOutput {
            attempts: self.max_retries + 1,
        })
    }
}
