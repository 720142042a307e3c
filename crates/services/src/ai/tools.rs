//! Writing check, assistant and image reading. Each operation has a fallible
//! `try_` form and an infallible form that substitutes a fixed reply.

use serde::{Deserialize, Serialize};

use super::client::{AiClient, Part};
use super::questions::extract_json;
use crate::error::AiError;

const ASSISTANT_INSTRUCTION: &str = "Você é um assistente amigável.
Respostas curtas, objetivas e sem formatação markdown (sem asteriscos).
Você não tem um nome. Não invente um nome para si mesmo. Se perguntarem seu nome, diga que não tem um, a menos que o usuário lhe dê um.";

const READ_IMAGE_PROMPT: &str = "Extraia o texto. Apenas o texto puro.";

pub const ASSISTANT_FALLBACK: &str = "Erro na busca.";
pub const ASSISTANT_EMPTY: &str = "Não entendi.";
pub const IMAGE_READ_FALLBACK: &str = "Erro ao ler imagem.";
pub const IMAGE_EMPTY: &str = "Não li nada.";

/// A corrected piece of writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingCheck {
    pub corrected: String,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub feedback: String,
}

impl WritingCheck {
    fn unavailable(text: &str) -> Self {
        Self {
            corrected: text.to_string(),
            changes: vec!["Erro na conexão.".to_string()],
            feedback: "Tente novamente.".to_string(),
        }
    }
}

impl AiClient {
    /// Correct spelling and grammar in `text`.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the request fails or the reply is not the
    /// expected JSON.
    pub async fn try_check_writing(&self, text: &str) -> Result<WritingCheck, AiError> {
        let prompt = format!(
            r#"Corrija: "{text}".
JSON ONLY:
{{
  "corrected": "Texto corrigido",
  "changes": ["Erro tal -> Correção tal"],
  "feedback": "Comentário curto."
}}"#
        );
        let reply = self.chat(None, vec![Part::Text(prompt)], true).await?;
        Ok(serde_json::from_str(extract_json(&reply))?)
    }

    pub async fn check_writing(&self, text: &str) -> WritingCheck {
        match self.try_check_writing(text).await {
            Ok(check) => check,
            Err(err) => {
                tracing::warn!(error = %err, "writing check failed");
                WritingCheck::unavailable(text)
            }
        }
    }

    /// Answer a free-form question briefly.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the request fails. An empty reply is not an error.
    pub async fn try_ask_assistant(&self, query: &str) -> Result<String, AiError> {
        let reply = self
            .chat(
                Some(ASSISTANT_INSTRUCTION),
                vec![Part::Text(query.to_string())],
                false,
            )
            .await;
        match reply {
            Ok(text) => Ok(text),
            Err(AiError::EmptyResponse) => Ok(ASSISTANT_EMPTY.to_string()),
            Err(err) => Err(err),
        }
    }

    pub async fn ask_assistant(&self, query: &str) -> String {
        self.try_ask_assistant(query).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "assistant request failed");
            ASSISTANT_FALLBACK.to_string()
        })
    }

    /// Transcribe the text in a base64-encoded JPEG.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the request fails. An empty reply is not an error.
    pub async fn try_read_image_text(&self, jpeg_base64: &str) -> Result<String, AiError> {
        let parts = vec![
            Part::Jpeg(jpeg_base64.to_string()),
            Part::Text(READ_IMAGE_PROMPT.to_string()),
        ];
        match self.chat(None, parts, false).await {
            Ok(text) => Ok(text),
            Err(AiError::EmptyResponse) => Ok(IMAGE_EMPTY.to_string()),
            Err(err) => Err(err),
        }
    }

    pub async fn read_image_text(&self, jpeg_base64: &str) -> String {
        self.try_read_image_text(jpeg_base64)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "image reading failed");
                IMAGE_READ_FALLBACK.to_string()
            })
    }
}
