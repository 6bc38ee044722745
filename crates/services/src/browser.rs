//! Lesson browser: search, difficulty filter and catalog-wide stats.

use serde::Serialize;

use learn_core::model::{ContentType, Difficulty, Lesson, LessonId, LessonKey, User};
use learn_core::{Catalog, percentage};

/// Browser filter. The default shows every lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonFilter {
    /// Case-insensitive topic substring; blank matches everything.
    pub search: String,
    pub difficulty: Option<Difficulty>,
}

impl LessonFilter {
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            difficulty: None,
        }
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn matches(&self, lesson: &Lesson) -> bool {
        let term = self.search.trim();
        let search_ok = term.is_empty() || lesson.topic_contains(term);
        let difficulty_ok = self.difficulty.is_none_or(|d| lesson.difficulty() == d);
        search_ok && difficulty_ok
    }
}

/// One lesson card in the browser or on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonListItem {
    pub key: LessonKey,
    pub lesson_id: LessonId,
    pub topic: String,
    pub difficulty: Difficulty,
    pub content_type: ContentType,
    pub question_count: usize,
    pub completed: bool,
}

impl LessonListItem {
    #[must_use]
    pub fn new(key: &LessonKey, lesson: &Lesson, user: &User) -> Self {
        Self {
            key: key.clone(),
            lesson_id: lesson.id(),
            topic: lesson.topic().to_string(),
            difficulty: lesson.difficulty(),
            content_type: lesson.content_type(),
            question_count: lesson.question_count(),
            completed: user.has_completed(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyStat {
    pub difficulty: Difficulty,
    pub count: usize,
}

/// Everything the lesson browser screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonBrowserView {
    pub items: Vec<LessonListItem>,
    /// Counts over the whole catalog, independent of the filter.
    pub difficulty_stats: Vec<DifficultyStat>,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub completion_percentage: u8,
}

impl LessonBrowserView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lists catalog lessons matching `filter`, in catalog order.
#[must_use]
pub fn browse(catalog: &Catalog, user: &User, filter: &LessonFilter) -> LessonBrowserView {
    let items = catalog
        .iter()
        .filter(|(_, lesson)| filter.matches(lesson))
        .map(|(key, lesson)| LessonListItem::new(key, lesson, user))
        .collect();

    let difficulty_stats = Difficulty::ALL
        .iter()
        .map(|&difficulty| DifficultyStat {
            difficulty,
            count: catalog
                .lessons()
                .filter(|lesson| lesson.difficulty() == difficulty)
                .count(),
        })
        .collect();

    let completed_lessons = catalog
        .iter()
        .filter(|(key, _)| user.has_completed(key))
        .count();

    LessonBrowserView {
        items,
        difficulty_stats,
        total_lessons: catalog.len(),
        completed_lessons,
        completion_percentage: percentage(completed_lessons, catalog.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::sample::{sample_catalog, sample_user};

    fn topics(view: &LessonBrowserView) -> Vec<&str> {
        view.items.iter().map(|item| item.topic.as_str()).collect()
    }

    #[test]
    fn default_filter_lists_everything() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap();
        let view = browse(&catalog, &user, &LessonFilter::default());
        assert_eq!(view.items.len(), 4);
        assert_eq!(view.total_lessons, 4);
        assert_eq!(view.completion_percentage, 0);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap();
        let view = browse(&catalog, &user, &LessonFilter::search("PYTHON"));
        assert_eq!(topics(&view), ["Introduction to Python"]);
    }

    #[test]
    fn search_ignores_surrounding_whitespace() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap();
        let view = browse(&catalog, &user, &LessonFilter::search("  sorting "));
        assert_eq!(topics(&view), ["Algorithms: Sorting"]);

        let blank = browse(&catalog, &user, &LessonFilter::search("   "));
        assert_eq!(blank.items.len(), 4);
    }

    #[test]
    fn difficulty_filter_combines_with_search() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap();

        let beginner = LessonFilter::default().with_difficulty(Some(Difficulty::Beginner));
        assert_eq!(
            topics(&browse(&catalog, &user, &beginner)),
            ["Introduction to Python", "Web Development Basics"]
        );

        let both = LessonFilter::search("web").with_difficulty(Some(Difficulty::Advanced));
        let view = browse(&catalog, &user, &both);
        assert!(view.is_empty());
    }

    #[test]
    fn stats_cover_whole_catalog() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap();
        let view = browse(&catalog, &user, &LessonFilter::search("nothing matches"));
        let counts: Vec<usize> = view.difficulty_stats.iter().map(|s| s.count).collect();
        assert_eq!(counts, [2, 1, 1]);
    }

    #[test]
    fn completed_flags_follow_user() {
        let catalog = sample_catalog().unwrap();
        let user = sample_user().unwrap().with_completed([LessonKey::new("lesson2")]);
        let view = browse(&catalog, &user, &LessonFilter::default());
        let completed: Vec<bool> = view.items.iter().map(|item| item.completed).collect();
        assert_eq!(completed, [false, true, false, false]);
        assert_eq!(view.completed_lessons, 1);
        assert_eq!(view.completion_percentage, 25);
    }
}
