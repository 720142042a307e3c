use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("question options cannot be blank")]
    BlankOption,

    #[error("correct answer {answer:?} is not one of the options")]
    AnswerNotInOptions { answer: String },
}

/// Unvalidated question, in the JSON shape produced by the question generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    /// Trim every field and check the answer is one of the options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, there are fewer than two
    /// options, an option is blank, or the answer does not match an option.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = self.question.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }
        let options: Vec<String> = self
            .options
            .into_iter()
            .map(|opt| opt.trim().to_string())
            .collect();
        if options.iter().any(String::is_empty) {
            return Err(QuestionError::BlankOption);
        }
        let correct_answer = self.correct_answer.trim().to_string();
        if !options.contains(&correct_answer) {
            return Err(QuestionError::AnswerNotInOptions {
                answer: correct_answer,
            });
        }

        Ok(Question {
            prompt,
            options,
            correct_answer,
            explanation: self.explanation.trim().to_string(),
        })
    }
}

/// A multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }

    /// Built-in questions used when generation is unavailable.
    #[must_use]
    pub fn fallback_bank() -> Vec<Question> {
        FALLBACK_BANK
            .iter()
            .map(|(prompt, options, answer, explanation)| Question {
                prompt: (*prompt).to_string(),
                options: options.iter().map(|opt| (*opt).to_string()).collect(),
                correct_answer: (*answer).to_string(),
                explanation: (*explanation).to_string(),
            })
            .collect()
    }
}

const FALLBACK_BANK: [(&str, [&str; 3], &str, &str); 3] = [
    (
        "O que usamos para cortar papel?",
        ["Tesoura", "Colher", "Pedra"],
        "Tesoura",
        "A tesoura corta.",
    ),
    (
        "Qual destas é uma fruta?",
        ["Mesa", "Banana", "Carro"],
        "Banana",
        "Banana é fruta.",
    ),
    (
        "Qual letra vem depois do A?",
        ["C", "B", "D"],
        "B",
        "A, B, C.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            question: " Qual letra vem antes de C? ".into(),
            options: vec!["A".into(), " B ".into(), "D".into()],
            correct_answer: "B".into(),
            explanation: "A, B, C.".into(),
        }
    }

    #[test]
    fn validate_trims_fields() {
        let question = draft().validate().unwrap();
        assert_eq!(question.prompt(), "Qual letra vem antes de C?");
        assert_eq!(question.options(), ["A", "B", "D"]);
        assert!(question.is_correct("B"));
        assert!(!question.is_correct("b"));
    }

    #[test]
    fn answer_must_be_an_option() {
        let mut draft = draft();
        draft.correct_answer = "E".into();
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::AnswerNotInOptions { answer: "E".into() }
        );
    }

    #[test]
    fn needs_two_options() {
        let mut draft = draft();
        draft.options = vec!["B".into()];
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::TooFewOptions { len: 1 }
        );
    }

    #[test]
    fn deserializes_generator_json() {
        let raw = r#"{
            "question": "Qual destas é uma fruta?",
            "options": ["Mesa", "Banana", "Carro"],
            "correctAnswer": "Banana",
            "explanation": "Banana é fruta."
        }"#;
        let draft: QuestionDraft = serde_json::from_str(raw).unwrap();
        let question = draft.validate().unwrap();
        assert_eq!(question.correct_answer(), "Banana");
    }

    #[test]
    fn fallback_bank_is_valid() {
        for question in Question::fallback_bank() {
            let redraft = QuestionDraft {
                question: question.prompt().into(),
                options: question.options().to_vec(),
                correct_answer: question.correct_answer().into(),
                explanation: question.explanation().into(),
            };
            assert_eq!(redraft.validate().unwrap(), question);
        }
    }
}
