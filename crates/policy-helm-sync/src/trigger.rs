// crates/policy-helm-sync/src/trigger.rs
// ============================================================================
// Module: Sync Trigger
// Description: Bounded-concurrency scatter/gather over sync targets.
// Purpose: Aggregate per-agent outcomes after each policy mutation.
// Dependencies: crate::notifier, crate::target, serde
// ============================================================================

//! ## Overview
//! [`SyncTrigger`] fans a re-pull signal out to every registered target and
//! gathers one outcome per target into a [`SyncReport`]. Targets are
//! processed in bounded batches of scoped threads; a failing or slow target
//! affects only its own slot (each notifier call carries its own timeout).
//! Invariants:
//! - `success_count + failed_count` equals the number of targets.
//! - Failure entries preserve target order regardless of completion order.
//! - A partial failure is a warning for callers, never an operation failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;

use serde::Serialize;

use crate::notifier::Notifier;
use crate::notifier::NotifyError;
use crate::target::SyncTarget;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default fan-out batch size.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

// ============================================================================
// SECTION: Report
// ============================================================================

/// One failed delivery in a fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFailure {
    /// Target label.
    pub target: String,
    /// Failure detail.
    pub detail: String,
}

/// Aggregate outcome of one fan-out.
///
/// # Invariants
/// - `success_count + failed_count` equals the number of notified targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Number of targets notified successfully.
    pub success_count: usize,
    /// Number of targets whose notification failed.
    pub failed_count: usize,
    /// Per-target failure details in target order.
    pub failures: Vec<TargetFailure>,
}

impl SyncReport {
    /// Returns an empty report for a fan-out with no targets.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success_count: 0,
            failed_count: 0,
            failures: Vec::new(),
        }
    }

    /// Returns true when at least one delivery failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed_count > 0
    }
}

// ============================================================================
// SECTION: Sync Trigger
// ============================================================================

/// Fan-out coordinator over a notifier.
pub struct SyncTrigger {
    /// Notifier used for every delivery.
    notifier: Arc<dyn Notifier>,
    /// Maximum targets notified concurrently.
    max_concurrency: usize,
}

impl SyncTrigger {
    /// Creates a trigger with the default batch size.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self::with_concurrency(notifier, DEFAULT_MAX_CONCURRENCY)
    }

    /// Creates a trigger with a specific batch size (clamped to >= 1).
    #[must_use]
    pub fn with_concurrency(notifier: Arc<dyn Notifier>, max_concurrency: usize) -> Self {
        Self {
            notifier,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Notifies every target and gathers per-target outcomes.
    ///
    /// Each batch runs on scoped threads; one target's failure never blocks
    /// or fails the others. No retries are performed.
    #[must_use]
    pub fn fan_out(&self, targets: &[SyncTarget]) -> SyncReport {
        if targets.is_empty() {
            return SyncReport::empty();
        }
        let mut outcomes: Vec<Result<(), NotifyError>> = Vec::with_capacity(targets.len());
        for batch in targets.chunks(self.max_concurrency) {
            let batch_outcomes = thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|target| scope.spawn(move || self.notifier.notify(target)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle.join().unwrap_or_else(|_panicked| {
                            Err(NotifyError::Delivery("notifier thread panicked".to_string()))
                        })
                    })
                    .collect::<Vec<_>>()
            });
            outcomes.extend(batch_outcomes);
        }
        let mut report = SyncReport::empty();
        for (target, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.success_count += 1,
                Err(err) => {
                    report.failed_count += 1;
                    report.failures.push(TargetFailure {
                        target: target.name.clone(),
                        detail: err.to_string(),
                    });
                }
            }
        }
        report
    }
}
