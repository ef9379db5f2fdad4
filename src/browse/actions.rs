//! Business logic for browse actions
//!
//! Functions here act on the projection, the selection and the injected
//! stores, and return plain data about what happened. The session decides
//! how that feeds back into its state; the CLI decides how to print it.

use super::models::{AssignOutcome, SkipReason};
use super::persistence::{LabelStore, LabelStoreError};
use super::projection::ResultProjection;
use super::selection::SelectionSet;
use crate::asset::Asset;
use crate::store::{ChangeRequest, PhotoStore, StoreError};
use futures::future::join_all;

/// Trimmed label, or `None` if nothing is left after trimming
#[must_use]
pub fn normalize_label(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Stamp the trimmed label onto every selected asset and persist once
///
/// Blank labels and empty selections are silent no-ops. The selection is not
/// modified here; clearing it is the caller's postcondition.
///
/// # Errors
///
/// Returns `LabelStoreError` if the batch write fails. The labels stay applied
/// in memory in that case.
pub fn execute_assign_label(
    projection: &mut ResultProjection,
    selection: &SelectionSet,
    input: &str,
    labels: &dyn LabelStore,
) -> Result<AssignOutcome, LabelStoreError> {
    let Some(label) = normalize_label(input) else {
        return Ok(AssignOutcome::Skipped(SkipReason::BlankLabel));
    };
    if selection.is_empty() {
        return Ok(AssignOutcome::Skipped(SkipReason::EmptySelection));
    }

    let count = projection.apply_label(selection, label);
    labels.persist(projection.assets())?;

    tracing::info!(label, count, "Assigned class label");
    Ok(AssignOutcome::Applied {
        label: label.to_string(),
        count,
    })
}

/// Set the favorite flag on several assets concurrently
///
/// Each asset gets its own change request; they are not ordered against each
/// other.
pub async fn execute_set_favorite(
    store: &dyn PhotoStore,
    assets: &[&Asset],
    value: bool,
) -> Vec<(String, Result<(), StoreError>)> {
    let requests = assets.iter().map(|asset| async move {
        let result = asset.set_favorite(store, value).await;
        (asset.identifier().to_string(), result)
    });
    join_all(requests).await
}

/// Delete several assets with one change request
///
/// Assets without a store handle fail individually; the others are submitted
/// together and share the store's outcome, except when the store reports
/// which of them it managed to delete before failing.
pub async fn execute_delete(
    store: &dyn PhotoStore,
    assets: &[&Asset],
) -> Vec<(String, Result<(), StoreError>)> {
    let mut results = Vec::with_capacity(assets.len());
    let mut handles = Vec::new();
    let mut submitted = Vec::new();

    for asset in assets {
        match asset.handle() {
            Some(handle) => {
                handles.push(handle.clone());
                submitted.push(asset.identifier().to_string());
            }
            None => results.push((
                asset.identifier().to_string(),
                Err(StoreError::Unresolved(asset.identifier().to_string())),
            )),
        }
    }

    if handles.is_empty() {
        return results;
    }

    match store.perform_change(ChangeRequest::Delete { handles }).await {
        Ok(()) => {
            tracing::debug!(count = submitted.len(), "Assets deleted");
            results.extend(submitted.into_iter().map(|id| (id, Ok(()))));
        }
        Err(StoreError::PartiallyDeleted { deleted, source }) => {
            tracing::error!(
                deleted = deleted.len(),
                count = submitted.len(),
                error = %source,
                "Delete stopped part way"
            );
            let (done, failed): (Vec<String>, Vec<String>) =
                submitted.into_iter().partition(|id| deleted.contains(id));
            results.extend(done.into_iter().map(|id| (id, Ok(()))));
            fail_all(&mut results, failed, *source);
        }
        Err(e) => {
            tracing::error!(count = submitted.len(), error = %e, "Failed to delete assets");
            fail_all(&mut results, submitted, e);
        }
    }
    results
}

fn fail_all(results: &mut Vec<(String, Result<(), StoreError>)>, ids: Vec<String>, error: StoreError) {
    let message = error.to_string();
    let mut first = Some(error);
    for id in ids {
        // The store error is not Clone; the first asset carries it, the rest a copy of its message.
        let err = first
            .take()
            .unwrap_or_else(|| StoreError::Rejected(message.clone()));
        results.push((id, Err(err)));
    }
}
