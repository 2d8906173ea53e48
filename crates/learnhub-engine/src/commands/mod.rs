//! Command orchestration layer.
//!
//! Every command brackets its work with the canonical `log_op_*` events and
//! returns `ExError` on failure.

pub mod catalog;
pub mod enrollment;

use std::time::Instant;

use learnhub_core::{log_op_end, log_op_error, log_op_start};
use learnhub_store::Result;

/// Run `f` between start and end/end_error log events
pub(crate) fn logged<R>(op: &'static str, f: impl FnOnce() -> Result<R>) -> Result<R> {
    log_op_start!(op);
    let start = Instant::now();

    let result = f();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = elapsed);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = elapsed);
        }
    }
    result
}
