//! End-to-end pipeline tests driven with in-process doubles for the
//! fetcher, generator, and store.
//!
//! These cover the status lifecycle: every document picked up in a poll
//! ends either `ready` (summary set, rows inserted) or `error`, and a
//! failure in one document never aborts the batch.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use study_worker::db::models::{NewFlashcard, NewQuizItem, StudyDocument};
use study_worker::db::store::StudyStore;
use study_worker::error::{Result, StudyError};
use study_worker::generator::parse_generation;
use study_worker::{
    ContentFetcher, DocumentProcessor, FlashcardDraft, GenerationResult, QuizDraft,
    ResultPersister, StudyGenerator, WorkerConfig, WorkerRunner,
};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreState {
    pending: Vec<StudyDocument>,
    flashcards: Vec<NewFlashcard>,
    quizzes: Vec<NewQuizItem>,
    ready: Vec<(Uuid, String)>,
    errored: Vec<Uuid>,
    /// Write-order trace: "flashcard", "quiz", "ready", "error"
    events: Vec<&'static str>,
}

#[derive(Default)]
struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    fn with_pending(docs: Vec<StudyDocument>) -> Arc<Self> {
        let store = Self::default();
        store.state.lock().unwrap().pending = docs;
        Arc::new(store)
    }
}

#[async_trait]
impl StudyStore for MemoryStore {
    async fn fetch_processing_documents(&self) -> Result<Vec<StudyDocument>> {
        Ok(self.state.lock().unwrap().pending.clone())
    }

    async fn insert_flashcard(&self, card: &NewFlashcard) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("flashcard");
        state.flashcards.push(card.clone());
        Ok(())
    }

    async fn insert_quiz_item(&self, item: &NewQuizItem) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("quiz");
        state.quizzes.push(item.clone());
        Ok(())
    }

    async fn mark_ready(&self, document_id: Uuid, summary: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("ready");
        state.ready.push((document_id, summary.to_string()));
        Ok(())
    }

    async fn mark_error(&self, document_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push("error");
        state.errored.push(document_id);
        Ok(())
    }
}

/// Serves fixed bytes for any URL
struct StaticFetcher {
    bytes: Vec<u8>,
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Simulates a non-success transport response for URLs containing "bad",
/// serves fixed bytes otherwise
struct FlakyFetcher {
    bytes: Vec<u8>,
}

#[async_trait]
impl ContentFetcher for FlakyFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.contains("bad") {
            return Err(StudyError::HttpStatus {
                url: url.to_string(),
                status: 404,
            });
        }
        Ok(self.bytes.clone())
    }
}

/// Returns a fixed generation result
struct FixedGenerator {
    result: GenerationResult,
}

#[async_trait]
impl StudyGenerator for FixedGenerator {
    async fn generate(&self, _text: &str) -> Result<GenerationResult> {
        Ok(self.result.clone())
    }
}

/// Feeds a non-JSON reply through the real parse path
struct MalformedGenerator;

#[async_trait]
impl StudyGenerator for MalformedGenerator {
    async fn generate(&self, _text: &str) -> Result<GenerationResult> {
        parse_generation("I'm sorry, I can't produce JSON today.")
    }
}

/// Never finishes within any reasonable document timeout
struct HangingGenerator;

#[async_trait]
impl StudyGenerator for HangingGenerator {
    async fn generate(&self, _text: &str) -> Result<GenerationResult> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        unreachable!("test timeout should fire first")
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn processing_doc(title: &str, file_url: &str) -> StudyDocument {
    let now = Utc::now();
    StudyDocument {
        id: Uuid::new_v4(),
        title: title.to_string(),
        file_url: file_url.to_string(),
        status: "processing".to_string(),
        summary_text: None,
        created_at: now,
        updated_at: now,
    }
}

fn sample_result(flashcards: usize, quizzes: usize) -> GenerationResult {
    GenerationResult {
        summary: "A two-line summary of the lecture notes.".to_string(),
        flashcards: (0..flashcards)
            .map(|i| FlashcardDraft {
                front: format!("Concept {}", i),
                back: format!("Definition {}", i),
            })
            .collect(),
        quizzes: (0..quizzes)
            .map(|i| QuizDraft {
                question: format!("Question {}?", i),
                options: vec![
                    "Option A".to_string(),
                    "Option B".to_string(),
                    "Option C".to_string(),
                    "Option D".to_string(),
                ],
                correct_index: i % 4,
                explanation: "Because it is correct.".to_string(),
            })
            .collect(),
    }
}

/// Build a minimal PDF with one page per entry in `page_texts`
fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn runner_with(
    store: Arc<MemoryStore>,
    fetcher: Arc<dyn ContentFetcher>,
    generator: Arc<dyn StudyGenerator>,
    config: WorkerConfig,
) -> WorkerRunner {
    let processor = DocumentProcessor::new(fetcher, generator, store.clone());
    WorkerRunner::new(store, config, processor)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_run_marks_document_ready_with_all_rows() {
    let doc = processing_doc("Biology notes", "https://files.example/bio.pdf");
    let doc_id = doc.id;
    let store = MemoryStore::with_pending(vec![doc]);

    let fetcher = Arc::new(StaticFetcher {
        bytes: pdf_with_pages(&["mitochondria", "osmosis", "photosynthesis"]),
    });
    let generator = Arc::new(FixedGenerator {
        result: sample_result(5, 3),
    });

    let runner = runner_with(store.clone(), fetcher, generator, WorkerConfig::default());
    let handled = runner.poll_once().await.unwrap();
    assert_eq!(handled, 1);

    let state = store.state.lock().unwrap();
    assert_eq!(state.flashcards.len(), 5);
    assert_eq!(state.quizzes.len(), 3);
    assert!(state.errored.is_empty());

    assert_eq!(state.ready.len(), 1);
    let (ready_id, summary) = &state.ready[0];
    assert_eq!(*ready_id, doc_id);
    assert!(!summary.is_empty());

    // Every flashcard and quiz row belongs to the processed document
    assert!(state.flashcards.iter().all(|c| c.document_id == doc_id));
    assert!(state.quizzes.iter().all(|q| q.document_id == doc_id));
}

#[tokio::test]
async fn fetch_failure_marks_document_error_without_rows() {
    let doc = processing_doc("Missing upload", "https://files.example/bad.pdf");
    let doc_id = doc.id;
    let store = MemoryStore::with_pending(vec![doc]);

    let fetcher = Arc::new(FlakyFetcher { bytes: Vec::new() });
    let generator = Arc::new(FixedGenerator {
        result: sample_result(5, 3),
    });

    let runner = runner_with(store.clone(), fetcher, generator, WorkerConfig::default());
    runner.poll_once().await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.errored, vec![doc_id]);
    assert!(state.ready.is_empty());
    assert!(state.flashcards.is_empty());
    assert!(state.quizzes.is_empty());
}

#[tokio::test]
async fn unparsable_pdf_marks_document_error() {
    let doc = processing_doc("Corrupt upload", "https://files.example/corrupt.pdf");
    let doc_id = doc.id;
    let store = MemoryStore::with_pending(vec![doc]);

    let fetcher = Arc::new(StaticFetcher {
        bytes: b"definitely not a pdf".to_vec(),
    });
    let generator = Arc::new(FixedGenerator {
        result: sample_result(1, 1),
    });

    let runner = runner_with(store.clone(), fetcher, generator, WorkerConfig::default());
    runner.poll_once().await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.errored, vec![doc_id]);
    assert!(state.flashcards.is_empty());
}

#[tokio::test]
async fn malformed_generation_marks_document_error() {
    let doc = processing_doc("Chemistry notes", "https://files.example/chem.pdf");
    let doc_id = doc.id;
    let store = MemoryStore::with_pending(vec![doc]);

    let fetcher = Arc::new(StaticFetcher {
        bytes: pdf_with_pages(&["stoichiometry"]),
    });

    let runner = runner_with(
        store.clone(),
        fetcher,
        Arc::new(MalformedGenerator),
        WorkerConfig::default(),
    );
    runner.poll_once().await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.errored, vec![doc_id]);
    assert!(state.ready.is_empty());
    assert!(state.flashcards.is_empty());
    assert!(state.quizzes.is_empty());
}

#[tokio::test]
async fn batch_continues_after_one_document_fails() {
    let bad = processing_doc("Broken link", "https://files.example/bad.pdf");
    let good = processing_doc("Physics notes", "https://files.example/physics.pdf");
    let bad_id = bad.id;
    let good_id = good.id;
    let store = MemoryStore::with_pending(vec![bad, good]);

    let fetcher = Arc::new(FlakyFetcher {
        bytes: pdf_with_pages(&["kinematics"]),
    });
    let generator = Arc::new(FixedGenerator {
        result: sample_result(2, 1),
    });

    let runner = runner_with(store.clone(), fetcher, generator, WorkerConfig::default());
    let handled = runner.poll_once().await.unwrap();
    assert_eq!(handled, 2);

    // Each document in the batch ends in a terminal state
    let state = store.state.lock().unwrap();
    assert_eq!(state.errored, vec![bad_id]);
    assert_eq!(state.ready.len(), 1);
    assert_eq!(state.ready[0].0, good_id);
    assert_eq!(state.flashcards.len(), 2);
    assert_eq!(state.quizzes.len(), 1);
}

#[tokio::test]
async fn slow_generation_times_out_and_marks_error() {
    let doc = processing_doc("Huge scan", "https://files.example/huge.pdf");
    let doc_id = doc.id;
    let store = MemoryStore::with_pending(vec![doc]);

    let fetcher = Arc::new(StaticFetcher {
        bytes: pdf_with_pages(&["thermodynamics"]),
    });
    let config = WorkerConfig::builder()
        .document_timeout(Duration::from_millis(50))
        .build();

    let runner = runner_with(store.clone(), fetcher, Arc::new(HangingGenerator), config);
    runner.poll_once().await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.errored, vec![doc_id]);
    assert!(state.ready.is_empty());
}

#[tokio::test]
async fn persister_writes_rows_then_flips_status() {
    let store = MemoryStore::with_pending(Vec::new());
    let persister = ResultPersister::new(store.clone());
    let doc_id = Uuid::new_v4();

    persister.persist(doc_id, &sample_result(3, 2)).await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.flashcards.len(), 3);
    assert_eq!(state.quizzes.len(), 2);
    assert_eq!(state.ready.len(), 1);

    // Flashcards before quizzes before the ready flip
    assert_eq!(
        state.events,
        vec!["flashcard", "flashcard", "flashcard", "quiz", "quiz", "ready"]
    );

    // Baseline mastery on every new card
    assert!(state.flashcards.iter().all(|c| c.mastery_level == 1));

    // Correct-answer index stays within the options it was generated with
    for quiz in &state.quizzes {
        assert!((quiz.correct_answer_index as usize) < quiz.options.len());
    }
}

#[tokio::test]
async fn persister_rerun_duplicates_rows() {
    // No dedup key exists: persisting the same result twice doubles the
    // rows. Current behavior, documented rather than fixed.
    let store = MemoryStore::with_pending(Vec::new());
    let persister = ResultPersister::new(store.clone());
    let doc_id = Uuid::new_v4();
    let result = sample_result(5, 3);

    persister.persist(doc_id, &result).await.unwrap();
    persister.persist(doc_id, &result).await.unwrap();

    let state = store.state.lock().unwrap();
    assert_eq!(state.flashcards.len(), 10);
    assert_eq!(state.quizzes.len(), 6);
    assert_eq!(state.ready.len(), 2);
}

#[tokio::test]
async fn empty_poll_handles_nothing() {
    let store = MemoryStore::with_pending(Vec::new());
    let fetcher = Arc::new(StaticFetcher { bytes: Vec::new() });
    let generator = Arc::new(FixedGenerator {
        result: sample_result(0, 0),
    });

    let runner = runner_with(store.clone(), fetcher, generator, WorkerConfig::default());
    let handled = runner.poll_once().await.unwrap();

    assert_eq!(handled, 0);
    let state = store.state.lock().unwrap();
    assert!(state.events.is_empty());
}
