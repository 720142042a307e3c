use thiserror::Error;

use crate::model::ids::LevelId;
use crate::model::progress::Progress;

/// Number of questions played in every level session.
pub const QUESTIONS_PER_LEVEL: u32 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level title cannot be empty")]
    EmptyTitle,

    #[error("level generation context cannot be empty")]
    EmptyContext,

    #[error("level catalog cannot be empty")]
    EmptyCatalog,

    #[error("level ids must be sequential from 1: expected {expected}, found {found}")]
    NonSequentialId { expected: LevelId, found: LevelId },
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// One stage of the literacy curriculum.
///
/// The lock state is not stored here; it is derived from [`Progress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    title: String,
    description: String,
    prompt_context: String,
}

impl Level {
    /// Creates a level.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::EmptyTitle` or `LevelError::EmptyContext` when the
    /// respective field is blank.
    pub fn new(
        id: LevelId,
        title: impl Into<String>,
        description: impl Into<String>,
        prompt_context: impl Into<String>,
    ) -> Result<Self, LevelError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(LevelError::EmptyTitle);
        }
        let prompt_context = prompt_context.into().trim().to_string();
        if prompt_context.is_empty() {
            return Err(LevelError::EmptyContext);
        }
        Ok(Self {
            id,
            title,
            description: description.into().trim().to_string(),
            prompt_context,
        })
    }

    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Short label shown under the title, e.g. "Nível 3".
    #[must_use]
    pub fn subtitle(&self) -> String {
        format!("Nível {}", self.id)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Instructions handed to the question provider for this level.
    #[must_use]
    pub fn prompt_context(&self) -> &str {
        &self.prompt_context
    }

    #[must_use]
    pub fn is_locked(&self, progress: &Progress) -> bool {
        !progress.is_unlocked(self.id)
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Fixed, ordered sequence of levels keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Builds a catalog from levels whose ids run `1..=N` in order.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::EmptyCatalog` when no level is given, or
    /// `LevelError::NonSequentialId` when ids have gaps or are out of order.
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyCatalog);
        }
        let mut expected = LevelId::FIRST;
        for level in &levels {
            if level.id != expected {
                return Err(LevelError::NonSequentialId {
                    expected,
                    found: level.id,
                });
            }
            expected = expected.next();
        }
        Ok(Self { levels })
    }

    /// The eight-stage literacy curriculum: alphabet up to short stories.
    #[must_use]
    pub fn literacy() -> Self {
        let levels = LITERACY_LEVELS
            .iter()
            .zip(1_u32..)
            .map(|((title, description, context), id)| Level {
                id: LevelId::new(id),
                title: (*title).to_string(),
                description: (*description).to_string(),
                prompt_context: context.trim().to_string(),
            })
            .collect();
        Self { levels }
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        let index = usize::try_from(id.value()).ok()?.checked_sub(1)?;
        self.levels.get(index)
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    /// Number of levels; never zero.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn last_id(&self) -> LevelId {
        LevelId::new(self.len())
    }

    #[must_use]
    pub fn is_final(&self, id: LevelId) -> bool {
        id == self.last_id()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::literacy()
    }
}

impl<'a> IntoIterator for &'a LevelCatalog {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

// (title, description, generation context)
const LITERACY_LEVELS: [(&str, &str, &str); 8] = [
    (
        "Alfabeto",
        "Sequência do Alfabeto (Anterior e Próxima).",
        r#"
GERE UMA QUESTÃO DE ALFABETO.
Lógica (siga estritamente):
1. ESCOLHA ALEATORIAMENTE um "tipo" ("proxima" ou "anterior") e uma "letra_base".
2. Se tipo="proxima": Pergunta = "Qual é a próxima letra após [LETRA]?"
3. Se tipo="anterior": Pergunta = "Qual letra vem antes de [LETRA]?"
4. Gere 3 alternativas (letras). Apenas 1 correta.

JSON fields:
   "question": "A pergunta gerada",
   "options": ["Opção1", "Opção2", "Opção3"],
   "correctAnswer": "A Opção Correta",
   "explanation": "A ordem é ... [LETRA ANTERIOR], [LETRA], [LETRA SEGUINTE]."
"#,
    ),
    (
        "Vogais",
        "Identificar vogais em palavras.",
        r#"
GERE UMA QUESTÃO DE VOGAIS.
Lógica: Escolha uma palavra simples e oculte uma vogal (ex: P _ T O).
JSON fields:
  "question": "Qual vogal completa a palavra: [PALAVRA_INCOMPLETA]?",
  "options": [Vogal Correta, Vogal Errada, Vogal Errada],
  "correctAnswer": "Vogal Correta",
  "explanation": "A palavra é [PALAVRA]."
"#,
    ),
    (
        "Fonemas",
        "Identificar sons iniciais.",
        r#"
GERE UMA QUESTÃO DE FONEMAS.
Lógica: Escolha um fonema/som inicial.
JSON fields:
  "question": "Qual destas palavras começa com o som da letra [LETRA]?",
  "options": [Palavra Correta, Palavra Errada, Palavra Errada],
  "correctAnswer": "Palavra Correta",
  "explanation": "[PALAVRA] começa com [LETRA]."
"#,
    ),
    (
        "Sílabas",
        "Contagem de sílabas.",
        r#"
GERE UMA QUESTÃO DE SÍLABAS.
Lógica: Escolha uma palavra. Conte as sílabas.
JSON fields:
  "question": "Quantas sílabas tem a palavra [PALAVRA]?",
  "options": ["Numero Correto", "Numero Errado", "Numero Errado"],
  "correctAnswer": "Numero Correto",
  "explanation": "A separação é [SE-PA-RA-ÇÃO]."
"#,
    ),
    (
        "Palavras",
        "Ortografia correta.",
        r#"
GERE UMA QUESTÃO DE ORTOGRAFIA.
Lógica: Escolha uma palavra comum que as pessoas erram.
JSON fields:
  "question": "Qual é a forma correta de escrever?",
  "options": [Escrita Correta, Escrita Errada, Escrita Errada],
  "correctAnswer": "Escrita Correta",
  "explanation": "Escreve-se [PALAVRA]."
"#,
    ),
    (
        "Frases",
        "Organização de frases.",
        r#"
GERE UMA QUESTÃO DE ORDENAR FRASES.
Lógica: Crie uma frase de 3 ou 4 palavras e embaralhe.
JSON fields:
  "question": "Qual a ordem certa das palavras: [PALAVRAS EMBARALHADAS]?",
  "options": [Frase Correta, Frase Sem Sentido 1, Frase Sem Sentido 2],
  "correctAnswer": "Frase Correta",
  "explanation": "A frase correta é: [FRASE]."
"#,
    ),
    (
        "Textos",
        "Interpretação de texto curto.",
        r#"
GERE UMA QUESTÃO DE INTERPRETAÇÃO.
Lógica: Crie um micro-texto (2 frases). Faça uma pergunta simples.
JSON fields:
  "question": "Texto: '[TEXTO]'. Pergunta: [PERGUNTA SOBRE O TEXTO]",
  "options": [Resposta Certa, Resposta Errada, Resposta Errada],
  "correctAnswer": "Resposta Certa",
  "explanation": "A resposta está no texto."
"#,
    ),
    (
        "Histórias",
        "Completar a história.",
        r#"
GERE UMA QUESTÃO DE NARRATIVA.
Lógica: Crie o início de uma história.
JSON fields:
  "question": "Continue a história: '[INICIO]...'",
  "options": [Continuação Lógica, Continuação Sem Sentido, Continuação Nada a Ver],
  "correctAnswer": "Continuação Lógica",
  "explanation": "Isso faz sentido para a história."
"#,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: u32) -> Level {
        Level::new(LevelId::new(id), format!("L{id}"), "", "ctx").unwrap()
    }

    #[test]
    fn literacy_catalog_is_sequential() {
        let catalog = LevelCatalog::literacy();
        assert_eq!(catalog.len(), 8);
        let rebuilt = LevelCatalog::new(catalog.levels().to_vec()).unwrap();
        assert_eq!(rebuilt, catalog);
        assert_eq!(catalog.get(LevelId::new(1)).unwrap().title(), "Alfabeto");
        assert_eq!(catalog.get(LevelId::new(8)).unwrap().title(), "Histórias");
        assert!(catalog.is_final(LevelId::new(8)));
        assert!(!catalog.is_final(LevelId::new(7)));
    }

    #[test]
    fn get_out_of_range_is_none() {
        let catalog = LevelCatalog::literacy();
        assert!(catalog.get(LevelId::new(0)).is_none());
        assert!(catalog.get(LevelId::new(9)).is_none());
    }

    #[test]
    fn catalog_rejects_gaps() {
        let err = LevelCatalog::new(vec![level(1), level(3)]).unwrap_err();
        assert_eq!(
            err,
            LevelError::NonSequentialId {
                expected: LevelId::new(2),
                found: LevelId::new(3),
            }
        );
        assert_eq!(LevelCatalog::new(Vec::new()).unwrap_err(), LevelError::EmptyCatalog);
    }

    #[test]
    fn level_requires_title_and_context() {
        assert_eq!(
            Level::new(LevelId::new(1), "  ", "", "ctx").unwrap_err(),
            LevelError::EmptyTitle
        );
        assert_eq!(
            Level::new(LevelId::new(1), "A", "", "").unwrap_err(),
            LevelError::EmptyContext
        );
    }

    #[test]
    fn lock_state_is_derived_from_progress() {
        let catalog = LevelCatalog::literacy();
        let progress = Progress::for_catalog(&catalog);
        assert!(!catalog.get(LevelId::new(1)).unwrap().is_locked(&progress));
        assert!(catalog.get(LevelId::new(2)).unwrap().is_locked(&progress));
        assert_eq!(catalog.get(LevelId::new(2)).unwrap().subtitle(), "Nível 2");
    }
}
