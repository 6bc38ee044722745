use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an identifier or lesson key from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from {:?}", self.kind, self.raw)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                    raw: s.to_string(),
                })
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a learner
    UserId
);
numeric_id!(
    /// Numeric identifier of a lesson inside the catalog
    LessonId
);
numeric_id!(
    /// Identifier of a single quiz question
    QuestionId
);

const LESSON_KEY_PREFIX: &str = "lesson";

/// String key a lesson is registered under in the catalog.
///
/// Catalog keys follow the `"lesson" + id` convention. A key built with
/// [`LessonKey::new`] is taken verbatim and only checked against its lesson
/// when the catalog is assembled.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonKey(String);

impl LessonKey {
    /// Wraps a raw catalog key without interpreting it.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The canonical key for a lesson id.
    #[must_use]
    pub fn for_lesson(id: LessonId) -> Self {
        Self(format!("{LESSON_KEY_PREFIX}{id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the lesson id encoded in a canonical key.
    ///
    /// Returns `None` when the key does not follow the `"lesson" + id` form.
    #[must_use]
    pub fn lesson_id(&self) -> Option<LessonId> {
        let digits = self.0.strip_prefix(LESSON_KEY_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u64>().ok().map(LessonId::new)
    }
}

impl fmt::Debug for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonKey({:?})", self.0)
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LessonKey {
    type Err = ParseIdError;

    /// Parses a canonical key; non-canonical strings are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = LessonKey::new(s.trim());
        match key.lesson_id() {
            Some(id) => Ok(LessonKey::for_lesson(id)),
            None => Err(ParseIdError {
                kind: "LessonKey",
                raw: s.to_string(),
            }),
        }
    }
}

impl From<LessonId> for LessonKey {
    fn from(id: LessonId) -> Self {
        Self::for_lesson(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display_and_parse() {
        let id: LessonId = "42".parse().unwrap();
        assert_eq!(id, LessonId::new(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "LessonId(42)");
    }

    #[test]
    fn question_id_rejects_garbage() {
        assert!("seven".parse::<QuestionId>().is_err());
    }

    #[test]
    fn lesson_key_for_lesson_uses_prefix() {
        assert_eq!(LessonKey::for_lesson(LessonId::new(3)).as_str(), "lesson3");
    }

    #[test]
    fn lesson_key_recovers_id() {
        assert_eq!(LessonKey::new("lesson12").lesson_id(), Some(LessonId::new(12)));
        assert_eq!(LessonKey::new("lesson").lesson_id(), None);
        assert_eq!(LessonKey::new("lesson+4").lesson_id(), None);
        assert_eq!(LessonKey::new("intro").lesson_id(), None);
    }

    #[test]
    fn lesson_key_from_str_is_canonical() {
        let key: LessonKey = "lesson004".parse().unwrap();
        assert_eq!(key.as_str(), "lesson4");
        assert!("chapter4".parse::<LessonKey>().is_err());
    }
}
