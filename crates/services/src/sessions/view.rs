use serde::Serialize;

use learn_core::ProgressSummary;

use crate::browser::LessonListItem;

/// Presentation-agnostic dashboard data.
///
/// No pre-formatted strings: the UI decides how to render percentages and
/// proficiencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub user_name: String,
    pub learning_style: String,
    pub progress: ProgressSummary,
    pub skills_tracked: usize,
    /// `None` only when the catalog is empty.
    pub recommended: Option<LessonListItem>,
}
