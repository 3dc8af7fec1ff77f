// ABOUTME: Scoped progress reporting for pipeline steps, sync or async alike.
// ABOUTME: Provides ProgressSink trait, console/silent sinks, and confirm wrappers.

//! Step-by-step progress reporting.
//!
//! Every long-running pipeline step is wrapped in a "confirm" pattern: the
//! label is reported when the step starts and marked done once the work
//! settles. `confirm` covers synchronous work, `confirm_async` awaitable
//! work; both report through the same sink so the console output is uniform.

use std::future::Future;

/// Sink for step lifecycle events. Frontends implement this to surface
/// status to users.
pub trait ProgressSink {
    /// Called when a labeled step begins.
    fn step_started(&self, _label: &str) {}

    /// Called when the step's work has settled.
    fn step_done(&self, _label: &str) {}
}

/// Console sink writing busy/success markers to stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn step_started(&self, label: &str) {
        eprintln!("… {}", label);
    }

    fn step_done(&self, label: &str) {
        eprintln!("✔ {}", label);
    }
}

/// A no-op progress sink.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {}

/// Runs synchronous work between start and done reports.
pub fn confirm<T>(sink: &dyn ProgressSink, label: &str, work: impl FnOnce() -> T) -> T {
    sink.step_started(label);
    let result = work();
    sink.step_done(label);
    result
}

/// Awaits asynchronous work between start and done reports. The done report
/// is deferred until the future settles.
pub async fn confirm_async<T>(
    sink: &dyn ProgressSink,
    label: &str,
    work: impl Future<Output = T>,
) -> T {
    sink.step_started(label);
    let result = work.await;
    sink.step_done(label);
    result
}
