use reader_core::model::{MaxLevels, Unit, UserProgress, build_units};

/// Latest-value combinator joining the curriculum aggregator's two inputs.
///
/// Holds the most recent value from each named input and recomputes the
/// unit list whenever either one updates. Stays pending until both inputs
/// have produced at least one value, so consumers never see a unit list
/// derived from a half-initialized snapshot.
#[derive(Debug, Clone, Default)]
pub struct CurriculumFeed {
    max_levels: Option<MaxLevels>,
    progress: Option<UserProgress>,
}

impl CurriculumFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Both inputs have produced at least one value.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.max_levels.is_some() && self.progress.is_some()
    }

    /// Accept a new content snapshot; returns the recomputed unit list once
    /// ready.
    pub fn on_max_levels(&mut self, max_levels: MaxLevels) -> Option<Vec<Unit>> {
        self.max_levels = Some(max_levels);
        self.current()
    }

    /// Accept a new progress snapshot; returns the recomputed unit list once
    /// ready.
    pub fn on_progress(&mut self, progress: UserProgress) -> Option<Vec<Unit>> {
        self.progress = Some(progress);
        self.current()
    }

    /// Unit list derived from the latest snapshots, `None` while pending.
    #[must_use]
    pub fn current(&self) -> Option<Vec<Unit>> {
        match (&self.max_levels, &self.progress) {
            (Some(max_levels), Some(progress)) => Some(build_units(max_levels, progress)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::Subject;

    fn full_max(levels: u32) -> MaxLevels {
        Subject::UNIT_SUBJECTS
            .iter()
            .fold(MaxLevels::new(), |acc, s| acc.with(*s, levels))
    }

    #[test]
    fn pending_until_both_inputs_arrive() {
        let mut feed = CurriculumFeed::new();
        assert!(!feed.is_ready());
        assert!(feed.on_max_levels(full_max(2)).is_none());
        assert!(!feed.is_ready());

        let units = feed.on_progress(UserProgress::new()).expect("ready");
        assert!(feed.is_ready());
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn progress_update_recomputes_with_latest_content() {
        let mut feed = CurriculumFeed::new();
        feed.on_max_levels(full_max(2));
        feed.on_progress(UserProgress::new());

        let mut progress = UserProgress::new();
        progress.mark_completed(Subject::Phonetics, 1);
        let units = feed.on_progress(progress).expect("ready");

        // 1 of 8 levels completed.
        assert!((units[0].progress() - 0.125).abs() < f64::EPSILON);
    }

    #[test]
    fn content_update_wins_over_stale_snapshot() {
        let mut feed = CurriculumFeed::new();
        feed.on_progress(UserProgress::new());
        feed.on_max_levels(full_max(2));

        let units = feed.on_max_levels(full_max(4)).expect("ready");
        assert_eq!(units.len(), 2);
    }
}
