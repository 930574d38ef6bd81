//! Data models for glosa-ai

pub mod chat;
pub mod language;
pub mod word_group;

pub use chat::{ChatMessage, Persona};
pub use language::Language;
pub use word_group::{AudioKey, SentenceData, SentenceKey, Vocabulary, WordGroup};
