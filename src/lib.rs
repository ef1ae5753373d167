//! Study Worker - A Rust service for generating study content from PDFs
//!
//! This service polls the documents table for uploads awaiting processing,
//! downloads each source PDF, extracts its text, asks Gemini for a summary
//! plus flashcards and quiz questions, and persists the results.
//!
//! A document moves from `processing` to `ready` on success (with its
//! summary set and flashcard/quiz rows inserted) or to `error` on any
//! failure; either way the polling loop carries on with the next document.

pub mod db;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod generator;
pub mod persister;
pub mod worker;

pub use error::{Result, StudyError};
pub use fetcher::{ContentFetcher, FetcherConfig, HttpContentFetcher};
pub use generator::{
    FlashcardDraft, GeminiClient, GenerationResult, QuizDraft, StudyGenerator,
};
pub use persister::ResultPersister;
pub use worker::{setup_signal_handler, DocumentProcessor, WorkerConfig, WorkerRunner};
