//! Text-to-speech boundary and the phrases the quiz speaks.

use std::sync::Mutex;

/// Speech output. Fire-and-forget: implementations must not block, and a new
/// utterance replaces any one still playing.
pub trait Narrator: Send + Sync {
    fn say(&self, text: &str);
}

/// Narrator that drops every utterance.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn say(&self, _text: &str) {}
}

/// Narrator that keeps everything it was asked to say. Useful in tests.
#[derive(Debug, Default)]
pub struct RecordingNarrator {
    spoken: Mutex<Vec<String>>,
}

impl RecordingNarrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.spoken
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.spoken
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }
}

impl Narrator for RecordingNarrator {
    fn say(&self, text: &str) {
        if let Ok(mut guard) = self.spoken.lock() {
            guard.push(text.to_string());
        }
    }
}

pub mod phrases {
    pub const CORRECT: &str = "Muito bem!";
    pub const LEVEL_COMPLETE: &str = "Atividade concluída.";
    pub const LEVEL_UNLOCKED: &str = "Nível desbloqueado!";
    pub const PROGRESS_RESET: &str = "Progresso reiniciado.";
    pub const LEVEL_LOCKED: &str = "Bloqueado. Termine o nível anterior.";
    pub const ANALYZING_IMAGE: &str = "Analisando imagem.";
    pub const IMAGE_READ: &str = "Li o seguinte. Você pode editar o texto se quiser.";
    pub const CHECKING_WRITING: &str = "Verificando seu texto...";

    #[must_use]
    pub fn level_started(title: &str) -> String {
        format!("Iniciando {title}.")
    }

    #[must_use]
    pub fn writing_checked(feedback: &str) -> String {
        format!("Pronto. {feedback}")
    }

    #[must_use]
    pub fn incorrect(correct_answer: &str) -> String {
        format!("Não foi dessa vez. A resposta certa era {correct_answer}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_narrator_keeps_order() {
        let narrator = RecordingNarrator::new();
        narrator.say("um");
        narrator.say("dois");
        assert_eq!(narrator.spoken(), ["um", "dois"]);
        assert_eq!(narrator.last().as_deref(), Some("dois"));
    }

    #[test]
    fn incorrect_phrase_names_the_answer() {
        assert_eq!(
            phrases::incorrect("Banana"),
            "Não foi dessa vez. A resposta certa era Banana."
        );
    }

    #[test]
    fn writing_checked_prefixes_feedback() {
        assert_eq!(
            phrases::writing_checked("Faltou o acento."),
            "Pronto. Faltou o acento."
        );
    }
}
