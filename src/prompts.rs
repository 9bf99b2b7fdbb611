//! Prompt construction for paraphrase normalization and continuations.
//!
//! Domain logic for rendering the two prompt shapes a trial needs.
//! Provider-agnostic.

use crate::gateway::Message;

/// Default instruction prefix for the style-normalizing paraphrase.
///
/// The constraint matters: the paraphraser must preserve factual content and
/// reasoning while stripping tone, phrasing, and idioms that would let a
/// participant fingerprint which backend wrote the answer.
pub const DEFAULT_PARAPHRASE_PREFIX: &str = "Paraphrase the following text to preserve factual \
content and reasoning, while removing stylistic fingerprints (tone, phrasing, idioms). Do NOT \
add or remove information. Keep structure simple and neutral. Return plain text only.";

/// Render the paraphrase request for one raw backend output.
///
/// Each raw text is paraphrased in isolation; the other backend's output
/// never appears in this prompt.
pub fn paraphrase_messages(prefix: &str, raw_text: &str) -> Vec<Message> {
    vec![Message::user(format!("{prefix}\n\n{raw_text}"))]
}

/// Render the continuation request for a follow-up against one backend.
///
/// The backend sees its own raw (pre-paraphrase) answer, so the continuation
/// is conversationally coherent with what it actually wrote, not with the
/// normalized text the participant was shown.
pub fn continuation_messages(prompt: &str, prior_answer: &str, follow_up: &str) -> Vec<Message> {
    let composite = format!(
        "You previously answered the user's prompt as below. Continue the conversation and \
answer the follow-up.\n\nOriginal prompt:\n{prompt}\n\nYour prior answer:\n{prior_answer}\n\n\
Follow-up from user:\n{follow_up}"
    );
    vec![Message::user(composite)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Role;

    #[test]
    fn paraphrase_prompt_is_prefix_then_text() {
        let messages = paraphrase_messages(DEFAULT_PARAPHRASE_PREFIX, "the raw answer");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0]
            .content
            .starts_with("Paraphrase the following text"));
        assert!(messages[0].content.ends_with("\n\nthe raw answer"));
    }

    #[test]
    fn paraphrase_prompt_respects_custom_prefix() {
        let messages = paraphrase_messages("Rewrite plainly.", "x");
        assert_eq!(messages[0].content, "Rewrite plainly.\n\nx");
    }

    #[test]
    fn continuation_prompt_carries_all_three_parts() {
        let messages = continuation_messages("Explain X", "X is a thing.", "But why?");
        let content = &messages[0].content;
        assert!(content.contains("Original prompt:\nExplain X"));
        assert!(content.contains("Your prior answer:\nX is a thing."));
        assert!(content.contains("Follow-up from user:\nBut why?"));
    }
}
