use std::time::{Duration, Instant};

/// Where a step ended up once the run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Ran; the run has not finished yet.
    Executed,
    Failed,
    /// Rolled back.
    Compensated,
    /// Rollback was attempted and failed; the step's effects remain.
    CompensationFailed,
    /// Ran, but has nothing to roll back.
    CompensationSkipped,
    /// The run succeeded and the step's effects are kept.
    Committed,
}

impl StepStatus {
    fn marker(self) -> &'static str {
        match self {
            Self::Executed | Self::Committed => "✓",
            Self::Failed => "✗",
            Self::Compensated => "↩",
            Self::CompensationFailed => "⚠",
            Self::CompensationSkipped => "·",
        }
    }
}

#[derive(Debug)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub started_at: Instant,
    /// Set when execution ends, and moved forward again by compensation.
    pub completed_at: Option<Instant>,
    /// `None` for steps exempt from rollback.
    pub compensation_description: Option<String>,
}

impl StepRecord {
    /// Time from start until the last status change.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.completed_at
            .map(|done| done.saturating_duration_since(self.started_at))
    }
}

/// Ordered record of one saga run, kept whether the run succeeds or not.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position later compensation updates refer to.
    pub(crate) fn record_start(&mut self, name: &str) -> usize {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
        self.records.len() - 1
    }

    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_success(&mut self, compensation_description: Option<String>) {
        if let Some(record) = self.records.last_mut() {
            record.completed_at = Some(Instant::now());
            record.compensation_description = compensation_description;
        }
    }

    pub(crate) fn record_compensated(&mut self, position: usize) {
        self.set_status(position, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, position: usize) {
        self.set_status(position, StepStatus::CompensationFailed);
    }

    /// Executed steps without a compensation keep their effects after a rollback.
    pub(crate) fn record_compensation_skipped(&mut self) {
        for record in &mut self.records {
            if record.status == StepStatus::Executed && record.compensation_description.is_none() {
                record.status = StepStatus::CompensationSkipped;
            }
        }
    }

    pub(crate) fn record_committed(&mut self) {
        for record in &mut self.records {
            if record.status == StepStatus::Executed {
                record.status = StepStatus::Committed;
            }
        }
    }

    fn set_status(&mut self, position: usize, status: StepStatus) {
        if let Some(record) = self.records.get_mut(position) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Steps whose execution started, including the one that failed.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    /// Names of steps with `status`, in execution order.
    #[must_use]
    pub fn steps_with_status(&self, status: StepStatus) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// One line per attempted step: marker, name, elapsed seconds, and for
    /// rolled-back steps what the rollback did.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| {
                let mut line = format!("{} {}", record.status.marker(), record.name);
                if let Some(elapsed) = record.elapsed() {
                    line.push_str(&format!(" ({:.1}s)", elapsed.as_secs_f64()));
                }
                let rolled_back = matches!(
                    record.status,
                    StepStatus::Compensated | StepStatus::CompensationFailed
                );
                if let Some(description) = record
                    .compensation_description
                    .as_ref()
                    .filter(|_| rolled_back)
                {
                    line.push_str(&format!(" [{description}]"));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_audit_log_is_empty() {
        let log = SagaAuditLog::new();
        assert!(log.records().is_empty());
        assert_eq!(log.attempted(), 0);
    }

    #[test]
    fn record_start_adds_step_with_executed_status() {
        let mut log = SagaAuditLog::new();
        let position = log.record_start("create_target_group");

        assert_eq!(position, 0);
        assert_eq!(log.records().len(), 1);
        assert_eq!(log.records()[0].name, "create_target_group");
        assert_eq!(log.records()[0].status, StepStatus::Executed);
        assert!(log.records()[0].completed_at.is_none());
    }

    #[test]
    fn record_failure_updates_last_step() {
        let mut log = SagaAuditLog::new();
        log.record_start("step_1");
        log.record_failure();

        assert_eq!(log.records()[0].status, StepStatus::Failed);
        assert!(log.records()[0].completed_at.is_some());
    }

    #[test]
    fn record_success_updates_last_step_with_description() {
        let mut log = SagaAuditLog::new();
        log.record_start("step_1");
        log.record_success(Some("delete target group".to_string()));

        assert_eq!(log.records()[0].status, StepStatus::Executed);
        assert!(log.records()[0].completed_at.is_some());
        assert_eq!(
            log.records()[0].compensation_description.as_deref(),
            Some("delete target group")
        );
    }

    #[test]
    fn compensation_status_targets_position_not_name() {
        let mut log = SagaAuditLog::new();
        log.record_start("same");
        log.record_success(Some("undo".to_string()));
        log.record_start("same");
        log.record_success(Some("undo".to_string()));
        log.record_compensated(1);

        assert_eq!(log.records()[0].status, StepStatus::Executed);
        assert_eq!(log.records()[1].status, StepStatus::Compensated);
    }

    #[test]
    fn record_compensation_failed_updates_matching_step() {
        let mut log = SagaAuditLog::new();
        log.record_start("step_1");
        log.record_success(Some("undo".to_string()));
        log.record_compensation_failed(0);

        assert_eq!(log.records()[0].status, StepStatus::CompensationFailed);
    }

    #[test]
    fn skipped_only_applies_to_steps_without_compensation() {
        let mut log = SagaAuditLog::new();
        log.record_start("compensable");
        log.record_success(Some("undo".to_string()));
        log.record_start("exempt");
        log.record_success(None);
        log.record_compensated(0);
        log.record_compensation_skipped();

        assert_eq!(log.records()[0].status, StepStatus::Compensated);
        assert_eq!(log.records()[1].status, StepStatus::CompensationSkipped);
    }

    #[test]
    fn commit_marks_every_executed_step() {
        let mut log = SagaAuditLog::new();
        log.record_start("a");
        log.record_success(Some("undo".to_string()));
        log.record_start("b");
        log.record_success(None);
        log.record_committed();

        assert_eq!(log.steps_with_status(StepStatus::Committed), vec!["a", "b"]);
    }

    #[test]
    fn summary_formats_all_steps() {
        let mut log = SagaAuditLog::new();
        log.record_start("executed_step");
        log.record_success(Some("undo".to_string()));
        log.record_start("failed_step");
        log.record_failure();

        let summary = log.summary();
        assert!(summary.contains("✓ executed_step"));
        assert!(summary.contains("✗ failed_step"));
    }

    #[test]
    fn summary_shows_compensated_and_compensation_failed() {
        let mut log = SagaAuditLog::new();
        log.record_start("compensated_step");
        log.record_success(Some("undo".to_string()));
        log.record_compensated(0);

        log.record_start("comp_failed_step");
        log.record_success(Some("undo".to_string()));
        log.record_compensation_failed(1);

        let summary = log.summary();
        assert!(summary.contains("↩ compensated_step"));
        assert!(summary.contains("⚠ comp_failed_step"));
    }

    #[test]
    fn summary_names_the_rollback_of_compensated_steps() {
        let mut log = SagaAuditLog::new();
        log.record_start("copy_secret");
        log.record_success(Some("delete copied secret".to_string()));
        log.record_start("create_log_index");
        log.record_success(None);
        log.record_compensated(0);
        log.record_compensation_skipped();

        let summary = log.summary();
        let lines: Vec<&str> = summary.lines().collect();

        assert!(lines[0].starts_with("↩ copy_secret ("));
        assert!(lines[0].ends_with("[delete copied secret]"));
        assert!(lines[1].starts_with("· create_log_index"));
        assert!(!lines[1].contains('['));
    }

    #[test]
    fn elapsed_is_unknown_until_the_step_ends() {
        let mut log = SagaAuditLog::new();
        log.record_start("build_and_push_image");
        assert!(log.records()[0].elapsed().is_none());

        log.record_success(Some("delete repository".to_string()));
        assert!(log.records()[0].elapsed().is_some());
    }
}
