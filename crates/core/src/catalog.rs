//! Lesson catalog with an explicit key <-> id index.

use std::collections::HashMap;
use thiserror::Error;

use crate::model::{LessonId, LessonKey};
use crate::model::{Lesson, LessonError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog key {0} is registered twice")]
    DuplicateKey(LessonKey),

    #[error("catalog key {key} does not match lesson id {lesson_id}")]
    KeyMismatch { key: LessonKey, lesson_id: LessonId },

    #[error(transparent)]
    Lesson(#[from] LessonError),
}

/// Ordered, immutable set of lessons.
///
/// Entries keep registration order; the first registered lesson is the
/// default lesson. Both lookups (by key and by id) are resolved through an
/// index built once while the catalog is assembled.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<(LessonKey, Lesson)>,
    by_key: HashMap<LessonKey, usize>,
    by_id: HashMap<LessonId, usize>,
}

impl Catalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from explicitly keyed lessons.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::KeyMismatch` when a key is not exactly
    /// `"lesson" + id` of its lesson, or `CatalogError::DuplicateKey` when a
    /// lesson id repeats.
    pub fn from_entries<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (LessonKey, Lesson)>,
    {
        let mut catalog = Self::empty();
        for (key, lesson) in entries {
            catalog.register(key, lesson)?;
        }
        Ok(catalog)
    }

    /// Builds a catalog keying each lesson by its canonical key.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateKey` when two lessons share an id.
    pub fn from_lessons<I>(lessons: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Lesson>,
    {
        Self::from_entries(
            lessons
                .into_iter()
                .map(|lesson| (LessonKey::for_lesson(lesson.id()), lesson)),
        )
    }

    fn register(&mut self, key: LessonKey, lesson: Lesson) -> Result<(), CatalogError> {
        let lesson_id = lesson.id();
        // Keys are stored exactly as `"lesson" + id`, so user records match by string.
        if key != LessonKey::for_lesson(lesson_id) {
            return Err(CatalogError::KeyMismatch { key, lesson_id });
        }
        if self.by_key.contains_key(&key) {
            return Err(CatalogError::DuplicateKey(key));
        }

        let slot = self.entries.len();
        self.by_key.insert(key.clone(), slot);
        self.by_id.insert(lesson_id, slot);
        self.entries.push((key, lesson));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&LessonKey, &Lesson)> {
        self.entries.iter().map(|(key, lesson)| (key, lesson))
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.entries.iter().map(|(_, lesson)| lesson)
    }

    #[must_use]
    pub fn get(&self, key: &LessonKey) -> Option<&Lesson> {
        self.by_key.get(key).map(|&slot| &self.entries[slot].1)
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.by_id.get(&id).map(|&slot| &self.entries[slot].1)
    }

    #[must_use]
    pub fn key_of(&self, id: LessonId) -> Option<&LessonKey> {
        self.by_id.get(&id).map(|&slot| &self.entries[slot].0)
    }

    #[must_use]
    pub fn id_of(&self, key: &LessonKey) -> Option<LessonId> {
        self.by_key.get(key).map(|&slot| self.entries[slot].1.id())
    }

    #[must_use]
    pub fn contains_key(&self, key: &LessonKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// First registered lesson, if any.
    #[must_use]
    pub fn default_lesson(&self) -> Option<&Lesson> {
        self.entries.first().map(|(_, lesson)| lesson)
    }
}
