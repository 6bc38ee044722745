use serde::ser::{Serialize, Serializer};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{LessonKey, UserId};

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user name cannot be empty")]
    EmptyName,

    #[error("proficiency must be within [0, 1], got {0}")]
    InvalidProficiency(f64),

    #[error("skill name cannot be empty")]
    EmptySkillName,
}

//
// ─── PROFICIENCY ───────────────────────────────────────────────────────────────
//

/// Mastery of a skill, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Proficiency(f64);

impl Proficiency {
    /// # Errors
    ///
    /// Returns `UserError::InvalidProficiency` for NaN or values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, UserError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(UserError::InvalidProficiency(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Serialize for Proficiency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

/// Skill name to proficiency mapping that remembers insertion order.
///
/// Iteration order is the order skills were first inserted. Re-inserting an
/// existing skill updates it in place without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillProficiency {
    entries: Vec<(String, Proficiency)>,
}

impl SkillProficiency {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(name, value)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `UserError` for an empty name or an out-of-range value.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, UserError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut skills = Self::new();
        for (name, value) in pairs {
            skills.set(name, Proficiency::new(value)?)?;
        }
        Ok(skills)
    }

    /// # Errors
    ///
    /// Returns `UserError::EmptySkillName` if `name` is blank.
    pub fn set(&mut self, name: impl Into<String>, value: Proficiency) -> Result<(), UserError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserError::EmptySkillName);
        }
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Proficiency> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Proficiency)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The weakest skill.
    ///
    /// Ties resolve to the skill inserted first: a later entry only wins when
    /// it is strictly lower.
    #[must_use]
    pub fn weakest(&self) -> Option<(&str, Proficiency)> {
        let mut lowest: Option<(&str, Proficiency)> = None;
        for (name, value) in self.iter() {
            match lowest {
                Some((_, current)) if value.value() >= current.value() => {}
                _ => lowest = Some((name, value)),
            }
        }
        lowest
    }
}

impl Serialize for SkillProficiency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, value)| (name, value.0)))
    }
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// A learner and their progress.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct User {
    id: UserId,
    name: String,
    knowledge_level: u32,
    completed_lessons: BTreeSet<LessonKey>,
    skills: SkillProficiency,
    learning_style: String,
}

impl User {
    /// # Errors
    ///
    /// Returns `UserError::EmptyName` if `name` is blank.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        knowledge_level: u32,
        skills: SkillProficiency,
        learning_style: impl Into<String>,
    ) -> Result<Self, UserError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            knowledge_level,
            completed_lessons: BTreeSet::new(),
            skills,
            learning_style: learning_style.into(),
        })
    }

    #[must_use]
    pub fn with_completed<I: IntoIterator<Item = LessonKey>>(mut self, keys: I) -> Self {
        self.completed_lessons.extend(keys);
        self
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn knowledge_level(&self) -> u32 {
        self.knowledge_level
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonKey> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn has_completed(&self, key: &LessonKey) -> bool {
        self.completed_lessons.contains(key)
    }

    #[must_use]
    pub fn skills(&self) -> &SkillProficiency {
        &self.skills
    }

    #[must_use]
    pub fn learning_style(&self) -> &str {
        &self.learning_style
    }

    /// Marks a lesson completed and raises the knowledge level by one.
    ///
    /// Repeat completions of the same lesson change nothing and return `false`.
    pub fn complete_lesson(&mut self, key: LessonKey) -> bool {
        if !self.completed_lessons.insert(key) {
            return false;
        }
        self.knowledge_level = self.knowledge_level.saturating_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proficiency_bounds() {
        assert!(Proficiency::new(0.0).is_ok());
        assert!(Proficiency::new(1.0).is_ok());
        assert!(Proficiency::new(1.01).is_err());
        assert!(Proficiency::new(-0.1).is_err());
        assert!(Proficiency::new(f64::NAN).is_err());
    }

    #[test]
    fn set_keeps_original_position() {
        let mut skills = SkillProficiency::from_pairs([("a", 0.5), ("b", 0.6)]).unwrap();
        skills.set("a", Proficiency::new(0.9).unwrap()).unwrap();
        let names: Vec<&str> = skills.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(skills.get("a").unwrap().value(), 0.9);
    }

    #[test]
    fn weakest_prefers_first_on_tie() {
        let skills =
            SkillProficiency::from_pairs([("rust", 0.4), ("go", 0.2), ("zig", 0.2)]).unwrap();
        assert_eq!(skills.weakest().map(|(name, _)| name), Some("go"));
    }

    #[test]
    fn weakest_of_empty_is_none() {
        assert!(SkillProficiency::new().weakest().is_none());
    }

    #[test]
    fn complete_lesson_is_idempotent() {
        let mut user = User::new(UserId::new(1), "Sam", 3, SkillProficiency::new(), "visual").unwrap();
        let key = LessonKey::new("lesson1");

        assert!(user.complete_lesson(key.clone()));
        assert!(!user.complete_lesson(key.clone()));
        assert_eq!(user.knowledge_level(), 4);
        assert_eq!(user.completed_lessons().len(), 1);
        assert!(user.has_completed(&key));
    }

    #[test]
    fn skills_serialize_as_ordered_map() {
        let skills = SkillProficiency::from_pairs([("python", 0.7), ("algorithms", 0.5)]).unwrap();
        let json = serde_json::to_string(&skills).unwrap();
        assert_eq!(json, r#"{"python":0.7,"algorithms":0.5}"#);
    }
}
