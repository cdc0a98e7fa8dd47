//! Question answering over one prescription.

use tracing::{error, info};

use crate::client::{LlmClient, LlmError, LlmResult};
use crate::prompts::make_chat_prompt;

/// One prescription's OCR text paired with the client that answers questions about it.
///
/// Each question is independent: no conversation history is kept.
pub struct ChatSession<C: LlmClient> {
    prescription: String,
    client: C,
}

impl<C: LlmClient> ChatSession<C> {
    pub fn new(prescription: impl Into<String>, client: C) -> Self {
        Self {
            prescription: prescription.into(),
            client,
        }
    }

    pub fn prescription(&self) -> &str {
        &self.prescription
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Answer one question. Blank questions are rejected without calling the client.
    pub fn ask(&self, question: &str) -> LlmResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(LlmError::EmptyQuestion);
        }

        let prompt = make_chat_prompt(&self.prescription, question)?;
        match self.client.generate(&prompt) {
            Ok(answer) => {
                info!(answer_chars = answer.len(), "Answered prescription question");
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, "Error generating response");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLlmClient;

    #[test]
    fn test_ask_returns_answer() {
        let session = ChatSession::new(
            "Paracetamol 500mg 1-0-1",
            MockLlmClient::new("Take one tablet in the morning and one at night."),
        );

        let answer = session.ask("How do I take this?").unwrap();
        assert_eq!(answer, "Take one tablet in the morning and one at night.");
        assert_eq!(session.client().calls(), 1);
    }

    #[test]
    fn test_blank_question_skips_client() {
        let session = ChatSession::new("Paracetamol 500mg", MockLlmClient::new("unused"));

        assert!(matches!(session.ask("   "), Err(LlmError::EmptyQuestion)));
        assert_eq!(session.client().calls(), 0);
    }

    #[test]
    fn test_client_failure_propagates() {
        let session = ChatSession::new("Ibuprofen 400mg", MockLlmClient::failing("quota exceeded"));

        let err = session.ask("Is this safe with food?").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_empty_prescription_still_asks() {
        let session = ChatSession::new("", MockLlmClient::new("I cannot read the prescription."));
        assert!(session.ask("What is this?").is_ok());
    }
}
