use std::fmt::{Debug, Display};

use tracing::{debug, error, info, warn};

use crate::audit::SagaAuditLog;
use crate::error::{CompensationError, SagaError};
use crate::step::SagaStep;

pub(crate) type BoxedStep<State, Ctx, Err> =
    Box<dyn SagaStep<State = State, Context = Ctx, Error = Err>>;

/// A compiled saga ready for execution.
///
/// Sagas execute a fixed sequence of steps over one accumulated state. If any
/// step fails, every previously completed compensable step is compensated in
/// reverse order (LIFO). A failing compensation is recorded and the remaining
/// compensations still run.
pub struct Saga<State, Ctx, Err> {
    steps: Vec<BoxedStep<State, Ctx, Err>>,
}

impl<State, Ctx, Err> Saga<State, Ctx, Err>
where
    State: Clone + Send + 'static,
    Err: Debug + Display,
{
    pub(crate) fn from_steps(steps: Vec<BoxedStep<State, Ctx, Err>>) -> Self {
        Self { steps }
    }

    /// Number of steps in the saga.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; the builder refuses to build an empty saga.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Execute the saga, returning the final state on success.
    ///
    /// On failure, compensates all previously completed steps in reverse order.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` if a step fails and all compensations succeed.
    /// Returns `SagaError::CompensationFailed` if a step fails and some compensations also fail.
    pub fn execute(&self, ctx: &Ctx, state: State) -> Result<State, SagaError<Err>> {
        let (result, _audit_log) = self.execute_internal(ctx, state);
        result
    }

    /// Execute the saga and return both the result and an audit log.
    ///
    /// The audit log tracks all step executions and compensations.
    pub fn execute_with_audit(
        &self,
        ctx: &Ctx,
        state: State,
    ) -> (Result<State, SagaError<Err>>, SagaAuditLog) {
        self.execute_internal(ctx, state)
    }

    fn execute_internal(
        &self,
        ctx: &Ctx,
        mut state: State,
    ) -> (Result<State, SagaError<Err>>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();
        let mut compensation_stack: Vec<(usize, usize)> = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            let position = audit_log.record_start(step_name);
            info!(step = step_name, "step attempted");

            let snapshot = state.clone();

            match step.execute(ctx, state) {
                Ok(next) => {
                    state = next;
                    if step.is_compensable() {
                        audit_log.record_success(Some(step.compensation_description()));
                        compensation_stack.push((index, position));
                    } else {
                        audit_log.record_success(None);
                    }
                    info!(step = step_name, "step succeeded");
                }
                Err(error) => {
                    audit_log.record_failure();
                    error!(step = step_name, %error, "step failed, rolling back");
                    let mut rollback_state = snapshot;
                    let saga_error = self.compensate(
                        ctx,
                        &mut audit_log,
                        compensation_stack,
                        &mut rollback_state,
                        step_name,
                        error,
                    );
                    return (Err(saga_error), audit_log);
                }
            }
        }

        audit_log.record_committed();
        (Ok(state), audit_log)
    }

    fn compensate(
        &self,
        ctx: &Ctx,
        audit_log: &mut SagaAuditLog,
        mut compensation_stack: Vec<(usize, usize)>,
        state: &mut State,
        failed_step: &str,
        step_error: Err,
    ) -> SagaError<Err> {
        let mut compensation_errors = Vec::new();

        while let Some((index, position)) = compensation_stack.pop() {
            let step = &self.steps[index];
            let step_name = step.name();
            let description = step.compensation_description();
            warn!(step = step_name, compensation = %description, "compensation attempted");

            match step.compensate(ctx, state) {
                Ok(()) => {
                    audit_log.record_compensated(position);
                    info!(step = step_name, "compensation succeeded");
                }
                Err(error) => {
                    audit_log.record_compensation_failed(position);
                    error!(step = step_name, %error, "compensation failed, continuing rollback");
                    compensation_errors.push(CompensationError {
                        step: step_name.to_string(),
                        description,
                        error,
                    });
                }
            }
        }

        audit_log.record_compensation_skipped();
        for name in audit_log.steps_with_status(crate::StepStatus::CompensationSkipped) {
            debug!(step = name, "step exempt from rollback");
        }

        if compensation_errors.is_empty() {
            SagaError::StepFailed {
                step: failed_step.to_string(),
                source: step_error,
            }
        } else {
            SagaError::CompensationFailed {
                failed_step: failed_step.to_string(),
                step_error,
                compensation_errors,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::audit::StepStatus;
    use crate::builder::SagaBuilder;

    #[derive(Debug, Clone, Default)]
    struct Handles {
        created: Vec<&'static str>,
    }

    struct FakeCloud {
        deleted: RefCell<Vec<String>>,
    }

    impl FakeCloud {
        fn new() -> Self {
            Self {
                deleted: RefCell::new(Vec::new()),
            }
        }
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct CloudError(String);

    struct CreateStep {
        name: &'static str,
    }

    impl SagaStep for CreateStep {
        type State = Handles;
        type Context = FakeCloud;
        type Error = CloudError;

        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(
            &self,
            _ctx: &Self::Context,
            mut state: Self::State,
        ) -> Result<Self::State, Self::Error> {
            state.created.push(self.name);
            Ok(state)
        }

        fn compensate(
            &self,
            ctx: &Self::Context,
            state: &mut Self::State,
        ) -> Result<(), Self::Error> {
            ctx.deleted
                .borrow_mut()
                .push(format!("delete {} (have {:?})", self.name, state.created));
            state.created.retain(|c| *c != self.name);
            Ok(())
        }
    }

    struct FailingStep;

    impl SagaStep for FailingStep {
        type State = Handles;
        type Context = FakeCloud;
        type Error = CloudError;

        fn name(&self) -> &'static str {
            "failing"
        }

        fn execute(
            &self,
            _ctx: &Self::Context,
            _state: Self::State,
        ) -> Result<Self::State, Self::Error> {
            Err(CloudError("boom".to_string()))
        }
    }

    struct ExemptStep;

    impl SagaStep for ExemptStep {
        type State = Handles;
        type Context = FakeCloud;
        type Error = CloudError;

        fn name(&self) -> &'static str {
            "exempt"
        }

        fn execute(
            &self,
            _ctx: &Self::Context,
            state: Self::State,
        ) -> Result<Self::State, Self::Error> {
            Ok(state)
        }

        fn compensate(
            &self,
            ctx: &Self::Context,
            _state: &mut Self::State,
        ) -> Result<(), Self::Error> {
            ctx.deleted
                .borrow_mut()
                .push("exempt compensated".to_string());
            Ok(())
        }

        fn is_compensable(&self) -> bool {
            false
        }
    }

    struct BrokenUndoStep;

    impl SagaStep for BrokenUndoStep {
        type State = Handles;
        type Context = FakeCloud;
        type Error = CloudError;

        fn name(&self) -> &'static str {
            "broken_undo"
        }

        fn execute(
            &self,
            _ctx: &Self::Context,
            mut state: Self::State,
        ) -> Result<Self::State, Self::Error> {
            state.created.push("broken_undo");
            Ok(state)
        }

        fn compensate(
            &self,
            _ctx: &Self::Context,
            _state: &mut Self::State,
        ) -> Result<(), Self::Error> {
            Err(CloudError("still attached".to_string()))
        }
    }

    #[test]
    fn successful_saga_returns_accumulated_state() -> anyhow::Result<()> {
        let ctx = FakeCloud::new();
        let saga = SagaBuilder::new()
            .first_step(CreateStep { name: "repo" })
            .then(CreateStep { name: "secret" })
            .build();

        let state = saga.execute(&ctx, Handles::default())?;

        assert_eq!(state.created, vec!["repo", "secret"]);
        assert!(ctx.deleted.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn compensation_sees_handles_produced_by_the_step() {
        let ctx = FakeCloud::new();
        let saga = SagaBuilder::new()
            .first_step(CreateStep { name: "repo" })
            .then(CreateStep { name: "secret" })
            .then(FailingStep)
            .build();

        let result = saga.execute(&ctx, Handles::default());

        assert!(result.is_err());
        let log = ctx.deleted.borrow();
        assert_eq!(
            *log,
            vec![
                r#"delete secret (have ["repo", "secret"])"#.to_string(),
                r#"delete repo (have ["repo"])"#.to_string(),
            ]
        );
    }

    #[test]
    fn first_step_failure_requires_no_compensation() {
        let ctx = FakeCloud::new();
        let saga = SagaBuilder::new().first_step(FailingStep).build();

        let err = saga
            .execute(&ctx, Handles::default())
            .expect_err("should be an error");

        assert!(matches!(err, SagaError::StepFailed { ref step, .. } if step == "failing"));
        assert!(ctx.deleted.borrow().is_empty());
    }

    #[test]
    fn exempt_step_is_never_compensated() {
        let ctx = FakeCloud::new();
        let saga = SagaBuilder::new()
            .first_step(CreateStep { name: "repo" })
            .then(ExemptStep)
            .then(FailingStep)
            .build();

        let (result, audit_log) = saga.execute_with_audit(&ctx, Handles::default());

        assert!(result.is_err());
        let log = ctx.deleted.borrow();
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("delete repo"));

        let records = audit_log.records();
        assert_eq!(records[0].status, StepStatus::Compensated);
        assert_eq!(records[1].status, StepStatus::CompensationSkipped);
        assert_eq!(records[2].status, StepStatus::Failed);
    }

    #[test]
    fn compensation_failure_keeps_original_trigger() {
        let ctx = FakeCloud::new();
        let saga = SagaBuilder::new()
            .first_step(CreateStep { name: "repo" })
            .then(BrokenUndoStep)
            .then(FailingStep)
            .build();

        let err = saga
            .execute(&ctx, Handles::default())
            .expect_err("should be an error");

        assert_eq!(err.failed_step(), "failing");
        assert_eq!(err.trigger(), &CloudError("boom".to_string()));
        match err {
            SagaError::CompensationFailed {
                compensation_errors,
                ..
            } => {
                assert_eq!(compensation_errors.len(), 1);
                assert_eq!(compensation_errors[0].step, "broken_undo");
            }
            SagaError::StepFailed { .. } => panic!("expected CompensationFailed error"),
        }
        assert_eq!(ctx.deleted.borrow().len(), 1);
    }

    #[test]
    fn successful_run_commits_every_step() {
        let ctx = FakeCloud::new();
        let saga = SagaBuilder::new()
            .first_step(CreateStep { name: "repo" })
            .then(ExemptStep)
            .build();

        let (result, audit_log) = saga.execute_with_audit(&ctx, Handles::default());

        assert!(result.is_ok());
        assert_eq!(
            audit_log.steps_with_status(StepStatus::Committed),
            vec!["repo", "exempt"]
        );
    }
}
