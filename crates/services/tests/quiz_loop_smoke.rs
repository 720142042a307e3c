use std::sync::Arc;

use async_trait::async_trait;
use dizai_core::model::{LevelCatalog, LevelId, Question, QuestionDraft, QuizPhase};
use dizai_core::time::fixed_clock;
use services::{
    Delivery, FallbackQuestionProvider, QuestionProvider, QuizLoopService, RecordingNarrator,
};
use storage::repository::{InMemoryRepository, ProgressRepository};

/// Serves one question per request; the answer is always "A".
struct EchoProvider;

#[async_trait]
impl QuestionProvider for EchoProvider {
    async fn generate(&self, level_context: &str) -> Question {
        QuestionDraft {
            question: format!(
                "Pergunta sobre {}",
                level_context.lines().next().unwrap_or_default()
            ),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: "A".into(),
            explanation: "É a letra A.".into(),
        }
        .validate()
        .unwrap()
    }
}

fn service(
    repo: &InMemoryRepository,
    provider: Arc<dyn QuestionProvider>,
) -> (QuizLoopService, Arc<RecordingNarrator>) {
    let narrator = Arc::new(RecordingNarrator::new());
    let service = QuizLoopService::new(
        fixed_clock(),
        Arc::new(LevelCatalog::literacy()),
        provider,
        narrator.clone(),
        Arc::new(repo.clone()),
    );
    (service, narrator)
}

#[tokio::test]
async fn full_level_unlocks_and_persists_next_level() {
    let repo = InMemoryRepository::new();
    let (loop_svc, narrator) = service(&repo, Arc::new(EchoProvider));
    let mut engine = loop_svc.open().await;
    assert_eq!(engine.max_unlocked_level(), LevelId::new(1));

    let delivery = loop_svc
        .start_level(&mut engine, LevelId::new(1))
        .await
        .unwrap();
    assert_eq!(delivery, Delivery::Applied);

    let mut phase = QuizPhase::AwaitingAnswer;
    while phase != QuizPhase::Finished {
        assert_eq!(phase, QuizPhase::AwaitingAnswer);
        engine.submit_answer("A").unwrap();
        phase = loop_svc.advance(&mut engine).await.unwrap();
    }

    let report = loop_svc.finish(&mut engine).await.unwrap();
    assert_eq!(report.score(), 5);
    assert_eq!(report.unlocked(), Some(LevelId::new(2)));
    assert_eq!(repo.load_max_unlocked_level().await.unwrap(), Some(2));
    assert!(narrator.spoken().iter().any(|s| s == "Nível desbloqueado!"));

    let reopened = loop_svc.open().await;
    assert_eq!(reopened.max_unlocked_level(), LevelId::new(2));
}

#[tokio::test]
async fn reset_persists_first_level() {
    let repo = InMemoryRepository::new();
    repo.save_max_unlocked_level(5).await.unwrap();
    let (loop_svc, _) = service(&repo, Arc::new(EchoProvider));

    let mut engine = loop_svc.open().await;
    assert_eq!(engine.max_unlocked_level(), LevelId::new(5));

    loop_svc.reset_progress(&mut engine).await;
    assert_eq!(engine.max_unlocked_level(), LevelId::new(1));
    assert_eq!(repo.load_max_unlocked_level().await.unwrap(), Some(1));
}

#[tokio::test]
async fn out_of_range_stored_progress_is_clamped() {
    let repo = InMemoryRepository::new();
    repo.save_max_unlocked_level(42).await.unwrap();
    let (loop_svc, _) = service(&repo, Arc::new(EchoProvider));
    assert_eq!(loop_svc.open().await.max_unlocked_level(), LevelId::new(8));

    repo.save_max_unlocked_level(0).await.unwrap();
    assert_eq!(loop_svc.open().await.max_unlocked_level(), LevelId::new(1));
}

#[tokio::test]
async fn locked_level_is_rejected_without_saving() {
    let repo = InMemoryRepository::new();
    let (loop_svc, _) = service(&repo, Arc::new(EchoProvider));
    let mut engine = loop_svc.open().await;

    assert!(
        loop_svc
            .start_level(&mut engine, LevelId::new(3))
            .await
            .is_err()
    );
    assert!(!engine.is_active());
    assert_eq!(repo.load_max_unlocked_level().await.unwrap(), None);
}

#[tokio::test]
async fn replaying_does_not_rewrite_progress() {
    let repo = InMemoryRepository::new();
    repo.save_max_unlocked_level(3).await.unwrap();
    let (loop_svc, _) = service(&repo, Arc::new(EchoProvider));
    let mut engine = loop_svc.open().await;

    loop_svc
        .start_level(&mut engine, LevelId::new(1))
        .await
        .unwrap();
    while engine.phase() != Some(QuizPhase::Finished) {
        engine.submit_answer("B").unwrap();
        loop_svc.advance(&mut engine).await.unwrap();
    }
    let report = loop_svc.finish(&mut engine).await.unwrap();
    assert_eq!(report.score(), 0);
    assert_eq!(report.unlocked(), None);
    assert_eq!(engine.max_unlocked_level(), LevelId::new(3));
}

#[tokio::test]
async fn late_question_for_an_abandoned_level_is_ignored() {
    let repo = InMemoryRepository::new();
    repo.save_max_unlocked_level(2).await.unwrap();
    let (loop_svc, _) = service(&repo, Arc::new(FallbackQuestionProvider::offline()));
    let mut engine = loop_svc.open().await;

    let first = engine.start_level(LevelId::new(1)).unwrap();
    let second = engine.start_level(LevelId::new(2)).unwrap();

    let late = loop_svc.fetch_question(&first).await;
    assert_eq!(engine.question_ready(late.tag, late.question), Delivery::Stale);
    assert_eq!(engine.phase(), Some(QuizPhase::Loading));

    let fresh = loop_svc.fetch_question(&second).await;
    assert_eq!(
        engine.question_ready(fresh.tag, fresh.question),
        Delivery::Applied
    );
    assert_eq!(engine.active_level().map(|l| l.id()), Some(LevelId::new(2)));
}
