//! Per-extraction conversation history
//!
//! An append-only sequence of role-tagged turns, owned by a single
//! `extract()` call and discarded afterwards. Repair attempts grow it by
//! two turns: the model's malformed reply and a correction instruction.

use fundwire_domain::ChatMessage;

/// Correction turn sent after a malformed reply.
pub(crate) const REPAIR_INSTRUCTION: &str = "Your previous reply was not valid JSON. \
Please correct the format and return only the corrected JSON, with no additional text.";

/// Conversation state for one extraction call.
#[derive(Debug)]
pub(crate) struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Seed with the system prompt and the article text.
    pub(crate) fn seed(system_prompt: &str, article_text: &str) -> Self {
        Self {
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(article_text),
            ],
        }
    }

    /// Full history, oldest first.
    pub(crate) fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the malformed assistant reply and the correction instruction.
    pub(crate) fn push_repair(&mut self, malformed_reply: &str) {
        self.messages.push(ChatMessage::assistant(malformed_reply));
        self.messages.push(ChatMessage::user(REPAIR_INSTRUCTION));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundwire_domain::Role;

    #[test]
    fn test_seed_has_system_then_user() {
        let conversation = Conversation::seed("extract data", "article body");
        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "extract data");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "article body");
    }

    #[test]
    fn test_push_repair_appends_two_turns() {
        let mut conversation = Conversation::seed("prompt", "article");
        conversation.push_repair("Sorry, here is prose instead of JSON");

        let messages = conversation.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "Sorry, here is prose instead of JSON");
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, REPAIR_INSTRUCTION);
    }

    #[test]
    fn test_repeated_repairs_keep_growing() {
        let mut conversation = Conversation::seed("prompt", "article");
        conversation.push_repair("bad 1");
        conversation.push_repair("bad 2");
        assert_eq!(conversation.messages().len(), 6);
        // Earlier turns are preserved untouched
        assert_eq!(conversation.messages()[2].content, "bad 1");
        assert_eq!(conversation.messages()[4].content, "bad 2");
    }
}
