use std::fmt::{Debug, Display};
use std::marker::PhantomData;

use crate::saga::{BoxedStep, Saga};
use crate::step::SagaStep;

/// Marker type for a builder with no steps.
pub struct Empty;

/// Marker type for a builder with at least one step.
pub struct HasSteps;

/// Type-state builder for constructing sagas.
///
/// Every step added must share the saga's state, context and error types,
/// and a saga cannot be built without at least one step.
///
/// Steps working on a different state type are rejected at compile time:
///
/// ```compile_fail
/// use clouddev_saga::{SagaBuilder, SagaStep};
///
/// struct Counter;
/// impl SagaStep for Counter {
///     type State = i32;
///     type Context = ();
///     type Error = std::fmt::Error;
///     fn name(&self) -> &'static str { "counter" }
///     fn execute(&self, _: &(), state: i32) -> Result<i32, std::fmt::Error> {
///         Ok(state + 1)
///     }
/// }
///
/// struct Label;
/// impl SagaStep for Label {
///     type State = String;
///     type Context = ();
///     type Error = std::fmt::Error;
///     fn name(&self) -> &'static str { "label" }
///     fn execute(&self, _: &(), state: String) -> Result<String, std::fmt::Error> {
///         Ok(state)
///     }
/// }
///
/// let saga = SagaBuilder::new()
///     .first_step(Counter)
///     .then(Label)  // Compile error here!
///     .build();
/// ```
///
/// An empty saga (without calling `first_step()`) cannot be built:
///
/// ```compile_fail
/// use clouddev_saga::SagaBuilder;
///
/// let saga = SagaBuilder::<(), (), std::fmt::Error, _>::new().build();
/// ```
pub struct SagaBuilder<State, Ctx, Err, Marker> {
    steps: Vec<BoxedStep<State, Ctx, Err>>,
    _phantom: PhantomData<Marker>,
}

impl<State, Ctx, Err> SagaBuilder<State, Ctx, Err, Empty> {
    /// Create a new saga builder in the empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            _phantom: PhantomData,
        }
    }
}

impl<State, Ctx, Err> Default for SagaBuilder<State, Ctx, Err, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State, Ctx, Err> SagaBuilder<State, Ctx, Err, Empty>
where
    State: Clone + Send + 'static,
{
    /// Add the first step to the saga.
    #[must_use]
    pub fn first_step<S>(self, step: S) -> SagaBuilder<State, Ctx, Err, HasSteps>
    where
        S: SagaStep<State = State, Context = Ctx, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(step));
        SagaBuilder {
            steps,
            _phantom: PhantomData,
        }
    }
}

impl<State, Ctx, Err> SagaBuilder<State, Ctx, Err, HasSteps>
where
    State: Clone + Send + 'static,
{
    /// Add another step to the saga.
    #[must_use]
    pub fn then<S>(mut self, step: S) -> Self
    where
        S: SagaStep<State = State, Context = Ctx, Error = Err> + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Build the saga from the accumulated steps.
    #[must_use]
    pub fn build(self) -> Saga<State, Ctx, Err>
    where
        Err: Debug + Display,
    {
        Saga::from_steps(self.steps)
    }
}
