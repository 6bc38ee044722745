use learn_core::QuizState;

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based number of the question on screen; `None` once completed.
    pub current_number: Option<usize>,
    pub is_complete: bool,
}

impl QuizProgress {
    #[must_use]
    pub fn new(state: &QuizState, total: usize, answered: usize) -> Self {
        let current_number = match state {
            QuizState::AwaitingAnswer { index } | QuizState::ShowingResult { index, .. } => {
                Some(index + 1)
            }
            QuizState::Completed { .. } => None,
        };
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current_number,
            is_complete: state.is_completed(),
        }
    }
}
