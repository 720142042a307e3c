use async_trait::async_trait;

use dizai_core::model::{Question, QuestionDraft};

use super::client::{AiClient, Part};
use crate::error::AiError;
use crate::quiz::QuestionGenerator;

const QUESTION_FORMAT: &str = r#"OUTPUT JSON EXCLUSIVAMENTE (sem markdown):
{
  "question": "A pergunta gerada",
  "options": ["Opção1", "Opção2", "Opção3"],
  "correctAnswer": "A opção correta (deve ser idêntica a uma das options)",
  "explanation": "Explicação muito breve do porquê."
}"#;

#[async_trait]
impl QuestionGenerator for AiClient {
    async fn try_generate(&self, level_context: &str) -> Result<Question, AiError> {
        let prompt = format!("{}\n\n{QUESTION_FORMAT}", level_context.trim());
        let reply = self.chat(None, vec![Part::Text(prompt)], true).await?;
        parse_question(&reply)
    }
}

pub(crate) fn parse_question(reply: &str) -> Result<Question, AiError> {
    let draft: QuestionDraft = serde_json::from_str(extract_json(reply))?;
    Ok(draft.validate()?)
}

/// Strip a surrounding markdown code fence, if the model added one.
pub(crate) fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
