//! Database module for study-worker
//!
//! Provides PostgreSQL operations for documents, flashcards, and quizzes.

pub mod connection;
pub mod documents;
pub mod flashcards;
pub mod models;
pub mod quizzes;
pub mod store;

pub use connection::{create_pool, create_pool_from_env, DbPool};
pub use models::*;
pub use store::{PgStudyStore, StudyStore};
