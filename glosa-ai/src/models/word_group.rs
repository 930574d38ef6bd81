//! Word groups and their enrichment keys

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::language::Language;

/// Example sentence for one word, with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceData {
    pub example: String,
    pub translation: String,
}

/// Words plus index-aligned meanings returned by vocabulary generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub words: Vec<String>,
    pub meanings: Vec<String>,
}

impl Vocabulary {
    /// Check the shape contract: two non-empty sequences of equal length
    pub fn check_shape(&self) -> Result<(), String> {
        if self.words.is_empty() || self.meanings.is_empty() {
            return Err("vocabulary response contained no words".to_string());
        }
        if self.words.len() != self.meanings.len() {
            return Err(format!(
                "vocabulary response has {} words but {} meanings",
                self.words.len(),
                self.meanings.len()
            ));
        }
        Ok(())
    }
}

/// One completed vocabulary generation plus its lazily-filled sentences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordGroup {
    pub id: Uuid,
    pub keyword: String,
    pub language_code: String,
    pub language_name: String,
    pub words: Vec<String>,
    pub meanings: Vec<String>,
    /// word → sentence; a missing entry means "not generated yet"
    #[serde(default)]
    pub sentences: BTreeMap<String, SentenceData>,
    pub created_at: DateTime<Utc>,
}

impl WordGroup {
    /// Build a fresh group for a shape-checked vocabulary
    pub fn new(keyword: &str, language: &Language, vocabulary: Vocabulary) -> Self {
        Self {
            id: Uuid::new_v4(),
            keyword: keyword.to_string(),
            language_code: language.code.to_string(),
            language_name: language.display_name().to_string(),
            words: vocabulary.words,
            meanings: vocabulary.meanings,
            sentences: BTreeMap::new(),
            created_at: glosa_common::time::now(),
        }
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn sentence(&self, word: &str) -> Option<&SentenceData> {
        self.sentences.get(word)
    }
}

/// Key of a sentence enrichment task: (group id, word)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentenceKey {
    pub group_id: Uuid,
    pub word: String,
}

impl SentenceKey {
    pub fn new(group_id: Uuid, word: impl Into<String>) -> Self {
        Self {
            group_id,
            word: word.into(),
        }
    }
}

impl fmt::Display for SentenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.group_id, self.word)
    }
}

/// Key of an audio enrichment task
///
/// Opaque to the workflow; `for_sentence` builds the canonical
/// (group id, word, sentence text) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioKey(String);

impl AudioKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn for_sentence(group_id: Uuid, word: &str, sentence: &str) -> Self {
        Self(format!("{}-{}-{}", group_id, word, sentence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
