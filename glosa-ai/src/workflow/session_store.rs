//! Vocabulary session store
//!
//! Owns the live list of word groups, newest first.

use uuid::Uuid;

use crate::models::{SentenceData, WordGroup};

#[derive(Debug, Clone, Default)]
pub struct VocabularySessionStore {
    groups: Vec<WordGroup>,
}

impl VocabularySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with records loaded from durable storage
    ///
    /// Storage order is not trusted; the list is re-sorted by creation time.
    pub fn replace_all(&mut self, mut groups: Vec<WordGroup>) {
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.groups = groups;
    }

    pub fn prepend(&mut self, group: WordGroup) {
        self.groups.insert(0, group);
    }

    pub fn get(&self, group_id: Uuid) -> Option<&WordGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Attach a sentence to one word of the matching group
    ///
    /// Returns `false` when no group has that id.
    pub fn attach_sentence(&mut self, group_id: Uuid, word: &str, sentence: SentenceData) -> bool {
        match self.groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => {
                group.sentences.insert(word.to_string(), sentence);
                true
            }
            None => false,
        }
    }

    /// Remove every group, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.groups.len();
        self.groups.clear();
        removed
    }

    pub fn groups(&self) -> &[WordGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{language, Vocabulary};
    use chrono::{Duration, Utc};

    fn group(keyword: &str, minutes_ago: i64) -> WordGroup {
        let mut group = WordGroup::new(
            keyword,
            language::find("en").unwrap(),
            Vocabulary {
                words: vec!["apple".into(), "pear".into()],
                meanings: vec!["蘋果".into(), "梨".into()],
            },
        );
        group.created_at = Utc::now() - Duration::minutes(minutes_ago);
        group
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut store = VocabularySessionStore::new();
        store.prepend(group("first", 0));
        store.prepend(group("second", 0));

        let keywords: Vec<_> = store.groups().iter().map(|g| g.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["second", "first"]);
    }

    #[test]
    fn test_replace_all_sorts_by_created_at_descending() {
        let mut store = VocabularySessionStore::new();
        store.replace_all(vec![group("old", 30), group("new", 1), group("mid", 10)]);

        let keywords: Vec<_> = store.groups().iter().map(|g| g.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_attach_sentence_touches_only_matching_group() {
        let mut store = VocabularySessionStore::new();
        let a = group("a", 2);
        let b = group("b", 1);
        let (a_id, b_id) = (a.id, b.id);
        store.prepend(a);
        store.prepend(b);

        let sentence = SentenceData {
            example: "I like apples.".into(),
            translation: "我喜歡蘋果。".into(),
        };
        assert!(store.attach_sentence(a_id, "apple", sentence.clone()));

        assert_eq!(store.get(a_id).unwrap().sentence("apple"), Some(&sentence));
        assert!(store.get(b_id).unwrap().sentences.is_empty());
        assert!(!store.attach_sentence(Uuid::nil(), "apple", sentence));
    }

    #[test]
    fn test_clear_reports_removed_count() {
        let mut store = VocabularySessionStore::new();
        assert_eq!(store.clear(), 0);

        store.prepend(group("a", 0));
        store.prepend(group("b", 0));
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }
}
