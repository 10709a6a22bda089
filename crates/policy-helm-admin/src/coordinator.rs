// crates/policy-helm-admin/src/coordinator.rs
// ============================================================================
// Module: Lifecycle Coordinator
// Description: Orchestrates multi-step policy mutations over the store seam.
// Purpose: Own the path/namespace invariant and the post-mutation fan-out.
// Dependencies: policy-helm-core, policy-helm-sync, thiserror
// ============================================================================

//! ## Overview
//! [`LifecycleCoordinator`] is the only component permitted to mutate policy
//! state. Creates and updates are single idempotent PUTs; enable/disable is
//! a two-step move (write new, delete old) with the namespace header
//! rewritten to mirror the destination folder. The move is not atomic: a
//! delete-step failure after a successful PUT is tolerated and audited, and
//! the resulting stale duplicate is detected (not repaired) at list time.
//! Invariants:
//! - Enable/disable are idempotent; repeating a transition is a no-op success.
//! - Every successful mutation triggers a sync fan-out; partial fan-out
//!   failure is a warning for callers, never an operation failure.
//! - Concurrent operations on the same id are not serialized here; callers
//!   needing strict ordering must serialize per id externally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use policy_helm_core::DeleteOutcome;
use policy_helm_core::Policy;
use policy_helm_core::PolicyId;
use policy_helm_core::PolicyStatus;
use policy_helm_core::PolicyStore;
use policy_helm_core::RawDocument;
use policy_helm_core::StoragePath;
use policy_helm_core::StoreError;
use policy_helm_core::metadata::derive_name_and_description;
use policy_helm_core::metadata::derive_scope_tags;
use policy_helm_core::model::DEFAULT_CREATED_BY;
use policy_helm_core::model::DEFAULT_VERSION;
use policy_helm_core::namespace::force_status_prefix;
use policy_helm_core::namespace::rewrite_status_prefix;
use policy_helm_sync::SyncReport;
use policy_helm_sync::SyncTarget;
use policy_helm_sync::SyncTrigger;
use thiserror::Error;

use crate::audit::AuditEvent;
use crate::audit::AuditLog;
use crate::audit::NoopAudit;

// ============================================================================
// SECTION: Lifecycle Errors
// ============================================================================

/// Errors returned by lifecycle operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling and code mapping.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Policy absent from every candidate storage path.
    #[error("policy not found: {0}")]
    NotFound(PolicyId),
    /// Submitted policy content is empty.
    #[error("policy content must not be empty")]
    InvalidContent,
    /// Request shape failed validation before any engine call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Move source missing and target not already holding the policy.
    #[error("policy {id} not found in expected state {expected}")]
    NotFoundInExpectedState {
        /// Policy identifier.
        id: PolicyId,
        /// Status folder the move expected to read from.
        expected: PolicyStatus,
    },
    /// Store-reported failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Receipts
// ============================================================================

/// Outcome of one successful mutation.
///
/// # Invariants
/// - `sync` reflects the post-mutation fan-out; failures inside it are
///   warnings, not operation failures.
#[derive(Debug, Clone)]
pub struct MutationReceipt {
    /// Mutated policy identifier.
    pub id: PolicyId,
    /// Resulting status when the operation has one.
    pub status: Option<PolicyStatus>,
    /// Aggregate fan-out outcome.
    pub sync: SyncReport,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for a lifecycle coordinator.
///
/// # Invariants
/// - `build` succeeds only when a store is configured.
#[derive(Default)]
pub struct LifecycleCoordinatorBuilder {
    /// Store seam used for every engine access.
    store: Option<Arc<dyn PolicyStore>>,
    /// Sync trigger used after successful mutations.
    trigger: Option<SyncTrigger>,
    /// Registered fan-out targets.
    targets: Vec<SyncTarget>,
    /// Audit sink.
    audit: Option<Arc<dyn AuditLog>>,
}

impl LifecycleCoordinatorBuilder {
    /// Registers the policy store.
    #[must_use]
    pub fn store(mut self, store: impl PolicyStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Registers the sync trigger and its targets.
    #[must_use]
    pub fn sync(mut self, trigger: SyncTrigger, targets: Vec<SyncTarget>) -> Self {
        self.trigger = Some(trigger);
        self.targets = targets;
        self
    }

    /// Registers the audit sink.
    #[must_use]
    pub fn audit(mut self, audit: impl AuditLog + 'static) -> Self {
        self.audit = Some(Arc::new(audit));
        self
    }

    /// Builds the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidRequest`] when no store is
    /// configured.
    pub fn build(self) -> Result<LifecycleCoordinator, LifecycleError> {
        let store = self
            .store
            .ok_or_else(|| LifecycleError::InvalidRequest("store is not configured".to_string()))?;
        Ok(LifecycleCoordinator {
            store,
            trigger: self.trigger,
            targets: self.targets,
            audit: self.audit.unwrap_or_else(|| Arc::new(NoopAudit)),
        })
    }
}

// ============================================================================
// SECTION: Coordinator
// ============================================================================

/// Orchestrator for all policy mutations and reads.
pub struct LifecycleCoordinator {
    /// Store seam used for every engine access.
    store: Arc<dyn PolicyStore>,
    /// Sync trigger used after successful mutations.
    trigger: Option<SyncTrigger>,
    /// Registered fan-out targets.
    targets: Vec<SyncTarget>,
    /// Audit sink.
    audit: Arc<dyn AuditLog>,
}

impl LifecycleCoordinator {
    /// Returns a builder for the coordinator.
    #[must_use]
    pub fn builder() -> LifecycleCoordinatorBuilder {
        LifecycleCoordinatorBuilder::default()
    }

    /// Creates a policy at the chosen status.
    ///
    /// The namespace header is forced to mirror the status folder before the
    /// document is written.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidContent`] for empty content and
    /// propagates store failures.
    pub fn create(
        &self,
        id: &PolicyId,
        content: &str,
        status: PolicyStatus,
    ) -> Result<MutationReceipt, LifecycleError> {
        self.write(id, content, status, "create")
    }

    /// Replaces a policy's content at the chosen status.
    ///
    /// PUT is idempotent, so repeating an update is safe.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidContent`] for empty content and
    /// propagates store failures.
    pub fn update(
        &self,
        id: &PolicyId,
        content: &str,
        status: PolicyStatus,
    ) -> Result<MutationReceipt, LifecycleError> {
        self.write(id, content, status, "update")
    }

    /// Moves a policy into the enabled folder.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFoundInExpectedState`] when the policy
    /// is absent from both folders and propagates store failures.
    pub fn enable(&self, id: &PolicyId) -> Result<MutationReceipt, LifecycleError> {
        self.transition(id, PolicyStatus::Enabled, "enable")
    }

    /// Moves a policy into the disabled folder.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFoundInExpectedState`] when the policy
    /// is absent from both folders and propagates store failures.
    pub fn disable(&self, id: &PolicyId) -> Result<MutationReceipt, LifecycleError> {
        self.transition(id, PolicyStatus::Disabled, "disable")
    }

    /// Deletes a policy from whichever folder currently holds it.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] when neither folder held the
    /// policy and propagates store failures.
    pub fn delete(&self, id: &PolicyId) -> Result<MutationReceipt, LifecycleError> {
        let enabled = self
            .store
            .delete(&StoragePath::new(id.clone(), PolicyStatus::Enabled).render())?;
        let disabled = self
            .store
            .delete(&StoragePath::new(id.clone(), PolicyStatus::Disabled).render())?;
        if enabled == DeleteOutcome::AlreadyAbsent && disabled == DeleteOutcome::AlreadyAbsent {
            return Err(LifecycleError::NotFound(id.clone()));
        }
        let sync = self.notify("delete");
        self.audit.record(AuditEvent::MutationApplied {
            operation: "delete".to_string(),
            id: id.to_string(),
            status: None,
        });
        Ok(MutationReceipt {
            id: id.clone(),
            status: None,
            sync,
        })
    }

    /// Lists every policy with display-ready metadata.
    ///
    /// Duplicate ids across both folders are audited as a consistency
    /// warning (a residue of interrupted moves) but still listed.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn list(&self) -> Result<Vec<Policy>, LifecycleError> {
        let documents = self.store.list()?;
        self.audit_duplicates(&documents);
        Ok(documents.iter().map(Self::to_policy).collect())
    }

    /// Fetches one policy by id.
    ///
    /// The engine has no id-keyed lookup across both status folders, so the
    /// full list is scanned for a matching trailing segment.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] when no entry matches and
    /// propagates store failures.
    pub fn get(&self, id: &PolicyId) -> Result<Policy, LifecycleError> {
        let documents = self.store.list()?;
        self.audit_duplicates(&documents);
        documents
            .iter()
            .find(|document| &StoragePath::derive_id(&document.id) == id)
            .map(Self::to_policy)
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))
    }

    /// Shared implementation of create/update.
    fn write(
        &self,
        id: &PolicyId,
        content: &str,
        status: PolicyStatus,
        operation: &str,
    ) -> Result<MutationReceipt, LifecycleError> {
        if content.trim().is_empty() {
            return Err(LifecycleError::InvalidContent);
        }
        let forced = force_status_prefix(content, id, status);
        let path = StoragePath::new(id.clone(), status);
        self.store.put(&path.render(), &forced)?;
        let sync = self.notify(operation);
        self.audit.record(AuditEvent::MutationApplied {
            operation: operation.to_string(),
            id: id.to_string(),
            status: Some(status),
        });
        Ok(MutationReceipt {
            id: id.clone(),
            status: Some(status),
            sync,
        })
    }

    /// Shared implementation of enable/disable: the two-step move.
    fn transition(
        &self,
        id: &PolicyId,
        new: PolicyStatus,
        operation: &str,
    ) -> Result<MutationReceipt, LifecycleError> {
        let old = new.toggled();
        let old_path = StoragePath::new(id.clone(), old);
        let new_path = StoragePath::new(id.clone(), new);
        let source = match self.store.get(&old_path.render()) {
            Ok(document) => document,
            Err(StoreError::NotFound) => {
                // Idempotency: already at the target folder is a no-op success.
                return match self.store.get(&new_path.render()) {
                    Ok(_already_there) => Ok(MutationReceipt {
                        id: id.clone(),
                        status: Some(new),
                        sync: SyncReport::empty(),
                    }),
                    Err(StoreError::NotFound) => Err(LifecycleError::NotFoundInExpectedState {
                        id: id.clone(),
                        expected: old,
                    }),
                    Err(err) => Err(err.into()),
                };
            }
            Err(err) => return Err(err.into()),
        };
        let rewritten = rewrite_status_prefix(&source.raw, old, new);
        self.store.put(&new_path.render(), &rewritten)?;
        if let Err(err) = self.store.delete(&old_path.render()) {
            // The policy is already enforced from its new location; a stale
            // duplicate at the old path is an accepted residual risk.
            self.audit.record(AuditEvent::MoveCleanupFailed {
                id: id.to_string(),
                stale_path: old_path.render(),
                detail: err.to_string(),
            });
        }
        let sync = self.notify(operation);
        self.audit.record(AuditEvent::MutationApplied {
            operation: operation.to_string(),
            id: id.to_string(),
            status: Some(new),
        });
        Ok(MutationReceipt {
            id: id.clone(),
            status: Some(new),
            sync,
        })
    }

    /// Fans the re-pull signal out after a successful mutation.
    fn notify(&self, operation: &str) -> SyncReport {
        let Some(trigger) = &self.trigger else {
            return SyncReport::empty();
        };
        let report = trigger.fan_out(&self.targets);
        if report.has_failures() {
            self.audit.record(AuditEvent::SyncPartialFailure {
                operation: operation.to_string(),
                failed_count: report.failed_count,
            });
        }
        report
    }

    /// Audits ids present under both status folders.
    fn audit_duplicates(&self, documents: &[RawDocument]) {
        for (index, document) in documents.iter().enumerate() {
            let id = StoragePath::derive_id(&document.id);
            let paths: Vec<String> = documents
                .iter()
                .filter(|other| StoragePath::derive_id(&other.id) == id)
                .map(|other| other.id.clone())
                .collect();
            let first = documents
                .iter()
                .position(|other| StoragePath::derive_id(&other.id) == id)
                .unwrap_or(index);
            if paths.len() > 1 && first == index {
                self.audit.record(AuditEvent::DuplicatePathsDetected {
                    id: id.to_string(),
                    paths,
                });
            }
        }
    }

    /// Builds a display-ready policy record from a stored document.
    fn to_policy(document: &RawDocument) -> Policy {
        let id = StoragePath::derive_id(&document.id);
        let status = PolicyStatus::from_path(&document.id);
        let (name, description) = derive_name_and_description(&id, &document.raw);
        let scope_tags = derive_scope_tags(&id, &document.raw);
        Policy {
            id,
            raw_source: document.raw.clone(),
            status,
            name,
            description,
            scope_tags,
            version: DEFAULT_VERSION.to_string(),
            created_at: String::new(),
            created_by: DEFAULT_CREATED_BY.to_string(),
        }
    }
}
