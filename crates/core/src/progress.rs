//! Dashboard statistics and the weakest-skill lesson recommendation.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::{Lesson, SkillProficiency, User};

/// `round(100 * part / whole)`, half rounding up, capped at 100.
///
/// Returns 0 when `whole` is 0.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    let rounded = (200 * part + whole) / (2 * whole);
    u8::try_from(rounded).unwrap_or(100)
}

/// Aggregate progress of a user over a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub lessons_completed: usize,
    pub total_lessons: usize,
    pub completion_percentage: u8,
    pub skills: SkillProficiency,
    pub level: u32,
}

/// Computes the dashboard progress numbers.
///
/// Only completed keys that exist in the catalog are counted, so the
/// percentage stays within `[0, 100]`.
#[must_use]
pub fn compute_progress(user: &User, catalog: &Catalog) -> ProgressSummary {
    let lessons_completed = user
        .completed_lessons()
        .iter()
        .filter(|key| catalog.contains_key(key))
        .count();
    let total_lessons = catalog.len();

    ProgressSummary {
        lessons_completed,
        total_lessons,
        completion_percentage: percentage(lessons_completed, total_lessons),
        skills: user.skills().clone(),
        level: user.knowledge_level(),
    }
}

/// Skill names use underscores; lesson topics use spaces.
#[must_use]
pub fn normalize_skill_name(skill: &str) -> String {
    skill.replace('_', " ")
}

/// Picks the lesson for the user's weakest skill.
///
/// The weakest skill is the one with the lowest proficiency, ties going to
/// the skill listed first. The first lesson in catalog order whose topic
/// contains the normalized skill name (case-insensitive) wins. Without a
/// skill or a match, the catalog's default lesson is returned; `None` only
/// for an empty catalog.
#[must_use]
pub fn recommend_lesson<'a>(user: &User, catalog: &'a Catalog) -> Option<&'a Lesson> {
    let matched = user.skills().weakest().and_then(|(skill, _)| {
        let needle = normalize_skill_name(skill);
        catalog.lessons().find(|lesson| lesson.topic_contains(&needle))
    });
    matched.or_else(|| catalog.default_lesson())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, Difficulty, LessonId, LessonKey, UserId};
    use crate::sample::{sample_catalog, sample_user};

    fn user_with(skills: &[(&str, f64)]) -> User {
        let skills = SkillProficiency::from_pairs(skills.iter().copied()).unwrap();
        User::new(UserId::new(9), "Test", 1, skills, "visual").unwrap()
    }

    fn lesson(id: u64, topic: &str) -> Lesson {
        Lesson::new(LessonId::new(id), topic, Difficulty::Beginner, ContentType::Text, Vec::new())
            .unwrap()
    }

    #[test]
    fn percentage_matches_rounding_for_small_totals() {
        for whole in 1..=50_usize {
            for part in 0..=whole {
                let expected = (100.0 * part as f64 / whole as f64).round() as u8;
                assert_eq!(percentage(part, whole), expected, "{part}/{whole}");
            }
        }
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn progress_counts_known_completions() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user()
            .unwrap()
            .with_completed([LessonKey::new("lesson1"), LessonKey::new("lesson3")]);

        let progress = compute_progress(&user, &catalog);
        assert_eq!(progress.lessons_completed, 2);
        assert_eq!(progress.total_lessons, 4);
        assert_eq!(progress.completion_percentage, 50);
        assert_eq!(progress.level, 3);
        assert_eq!(&progress.skills, user.skills());
    }

    #[test]
    fn progress_ignores_unknown_keys() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap().with_completed([
            LessonKey::new("lesson1"),
            LessonKey::new("lesson99"),
        ]);
        let progress = compute_progress(&user, &catalog);
        assert_eq!(progress.lessons_completed, 1);
        assert_eq!(progress.completion_percentage, 25);
    }

    #[test]
    fn progress_on_empty_catalog() {
        let user = sample_user().unwrap().with_completed([LessonKey::new("lesson1")]);
        let progress = compute_progress(&user, &Catalog::empty());
        assert_eq!(progress.total_lessons, 0);
        assert_eq!(progress.lessons_completed, 0);
        assert_eq!(progress.completion_percentage, 0);
    }

    #[test]
    fn sample_user_gets_web_development() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap();
        let lesson = recommend_lesson(&user, &catalog).unwrap();
        assert_eq!(lesson.topic(), "Web Development Basics");
    }

    #[test]
    fn tie_goes_to_first_skill() {
        let catalog = sample_catalog().unwrap();
        let user = user_with(&[("python", 0.9), ("algorithms", 0.1), ("data_structures", 0.1)]);
        assert_eq!(recommend_lesson(&user, &catalog).unwrap().topic(), "Algorithms: Sorting");
    }

    #[test]
    fn every_underscore_is_replaced() {
        let catalog = Catalog::from_lessons([
            lesson(1, "Intro"),
            lesson(2, "Advanced Machine Learning Ops"),
        ])
        .unwrap();
        let user = user_with(&[("machine_learning_ops", 0.1)]);
        assert_eq!(recommend_lesson(&user, &catalog).unwrap().id(), LessonId::new(2));
    }

    #[test]
    fn first_match_in_catalog_order_wins() {
        let catalog = Catalog::from_lessons([
            lesson(5, "Rust basics"),
            lesson(6, "RUST ownership"),
        ])
        .unwrap();
        let user = user_with(&[("rust", 0.0)]);
        assert_eq!(recommend_lesson(&user, &catalog).unwrap().id(), LessonId::new(5));
    }

    #[test]
    fn falls_back_to_default_lesson() {
        let catalog = sample_catalog().unwrap();
        let user = user_with(&[("cooking", 0.1), ("python", 0.5)]);
        assert_eq!(recommend_lesson(&user, &catalog).unwrap().id(), LessonId::new(1));

        let no_skills = user_with(&[]);
        assert_eq!(recommend_lesson(&no_skills, &catalog).unwrap().id(), LessonId::new(1));
    }

    #[test]
    fn empty_catalog_has_no_recommendation() {
        let user = sample_user().unwrap();
        assert!(recommend_lesson(&user, &Catalog::empty()).is_none());
    }
}
