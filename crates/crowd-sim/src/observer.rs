//! Step observer trait for progress reporting and diagnostics.

use crowd_core::AgentId;

/// Callbacks invoked by [`Simulator::step_observed`][crate::Simulator::step_observed]
/// at key points in the step.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — fallback counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct FallbackCounter(usize);
///
/// impl StepObserver for FallbackCounter {
///     fn on_fallback(&mut self, _agent: AgentId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait StepObserver {
    /// Called before any per-agent work, with the time at the step's start.
    fn on_step_start(&mut self, _global_time: f32) {}

    /// Called once per agent whose constraints were mutually infeasible this
    /// step, after the compute phase and in ascending id order.
    fn on_fallback(&mut self, _agent: AgentId) {}

    /// Called after positions have been advanced, with the new global time.
    fn on_step_end(&mut self, _global_time: f32) {}
}

/// A [`StepObserver`] that does nothing.  [`Simulator::step`][crate::Simulator::step]
/// uses it internally.
pub struct NoopObserver;

impl StepObserver for NoopObserver {}
