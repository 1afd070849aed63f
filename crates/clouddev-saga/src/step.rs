/// A step in a saga that can be executed and compensated.
///
/// Every step of a saga works on the same accumulated state. `execute`
/// consumes the state and returns it enriched with whatever handles the step
/// produced; `compensate` receives the state as it stood after the step
/// succeeded, so the handles it needs to undo its work are available.
///
/// # Type Parameters
///
/// - `State`: Accumulator threaded through every step
/// - `Context`: Shared dependencies (injected, not passed between steps)
/// - `Error`: The error type for step failures
pub trait SagaStep: Send + Sync {
    /// Accumulated state threaded through the saga.
    type State: Clone + Send + 'static;

    /// Shared context providing dependencies.
    type Context;

    /// Error type for step failures.
    type Error;

    /// Human-readable name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Execute the step, returning the updated state.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails to complete.
    fn execute(&self, ctx: &Self::Context, state: Self::State) -> Result<Self::State, Self::Error>;

    /// Compensate (undo) the step's effects.
    ///
    /// Called during rollback when a later step fails. Implementations should
    /// clear the handles they produced once the underlying resource is gone.
    ///
    /// The default implementation is a no-op, suitable for read-only steps.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails.
    fn compensate(&self, ctx: &Self::Context, state: &mut Self::State) -> Result<(), Self::Error> {
        let _ = (ctx, state);
        Ok(())
    }

    /// Whether the step takes part in rollback.
    ///
    /// Steps returning `false` are never pushed onto the compensation stack.
    fn is_compensable(&self) -> bool {
        true
    }

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
