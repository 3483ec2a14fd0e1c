//! Per-entity reconciliation passes.
//!
//! All tombstone-capable entities share the directional algorithm in
//! [`merge_collections`]: upload local-only records, propagate
//! tombstones in both directions, detect remote changes, download
//! missing or updated rows. Relations and 1:1 metadata have their own
//! shapes in [`relations`] and [`versioned`].

pub mod relations;
pub mod versioned;

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use curio_core::{ids, CurioResult, SyncRecord};

/// Counters from one directional merge pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Brand-new local records created by the download pass. This is
    /// the count reported as "records synced"; uploads do not count.
    pub new_local: usize,
    /// Local-only records inserted remotely.
    pub uploaded: usize,
    /// Remote tombstones applied locally.
    pub tombstones_pulled: usize,
    /// Local tombstones pushed to a live remote row.
    pub tombstones_pushed: usize,
    /// Existing local records overwritten from a newer remote version.
    pub refreshed: usize,
    /// Invalid-id scratch records purged from the local collection.
    pub purged: usize,
}

/// Reconcile one local collection against the remote rows for the same
/// owner, converging both replicas.
///
/// `upload_guard` vetoes uploads whose remote prerequisites are missing
/// (orphans at sync time); vetoed records are skipped and logged, not
/// treated as errors. `insert_remote` uploads a local-only record;
/// `push_tombstone` propagates a local tombstone over a live remote
/// row. The caller persists `local` afterwards.
pub fn merge_collections<T, G, I, D>(
    local: &mut Vec<T>,
    remote: Vec<T>,
    mut upload_guard: G,
    mut insert_remote: I,
    mut push_tombstone: D,
) -> CurioResult<ReconcileOutcome>
where
    T: SyncRecord,
    G: FnMut(&T) -> bool,
    I: FnMut(&T) -> CurioResult<()>,
    D: FnMut(&T) -> CurioResult<()>,
{
    let mut outcome = ReconcileOutcome::default();

    // Invalid ids never sync; they are local-only scratch and get purged.
    let before = local.len();
    local.retain(|r| {
        let ok = ids::is_valid_id(r.record_id());
        if !ok {
            tracing::warn!("reconcile: purging record with invalid id {:?}", r.record_id());
        }
        ok
    });
    outcome.purged = before - local.len();

    let remote_map: HashMap<&str, &T> = remote.iter().map(|r| (r.record_id(), r)).collect();

    // Upload pass: local records the remote has never seen. A local
    // tombstone with no remote counterpart needs no propagation.
    for record in local.iter() {
        if remote_map.contains_key(record.record_id()) {
            continue;
        }
        if record.is_deleted() {
            continue;
        }
        if !upload_guard(record) {
            tracing::info!(
                "reconcile: skipping orphan upload for {}",
                record.record_id()
            );
            continue;
        }
        match insert_remote(record) {
            Ok(()) => outcome.uploaded += 1,
            Err(e) if e.is_already_applied() => outcome.uploaded += 1,
            Err(e) => return Err(e),
        }
    }

    // Tombstone passes, both directions. Tombstones are terminal: a
    // record tombstoned on either side ends tombstoned on both.
    let mut refetch: HashSet<String> = HashSet::new();
    for record in local.iter_mut() {
        let Some(remote_version) = remote_map.get(record.record_id()) else {
            continue;
        };
        match (record.is_deleted(), remote_version.is_deleted()) {
            (false, true) => {
                let at = remote_version.deleted_at().unwrap_or_else(Utc::now);
                record.mark_deleted(at);
                outcome.tombstones_pulled += 1;
            }
            (true, false) => {
                push_tombstone(record)?;
                outcome.tombstones_pushed += 1;
            }
            _ => {
                // Both live: change detection. Strictly newer remote, or
                // a divergent tracked field, forces a re-fetch.
                if !record.is_deleted() {
                    let remote_newer = match (remote_version.updated_at(), record.updated_at()) {
                        (Some(r), Some(l)) => r > l,
                        (Some(_), None) => true,
                        _ => false,
                    };
                    if remote_newer || remote_version.tracked_field() != record.tracked_field() {
                        refetch.insert(record.record_id().to_string());
                    }
                }
            }
        }
    }

    // Download pass: remote-only rows are appended, marked rows are
    // overwritten in place.
    let local_index: HashMap<String, usize> = local
        .iter()
        .enumerate()
        .map(|(i, r)| (r.record_id().to_string(), i))
        .collect();
    for remote_record in remote {
        match local_index.get(remote_record.record_id()) {
            None => {
                let mut fresh = remote_record;
                fresh.sanitize();
                local.push(fresh);
                outcome.new_local += 1;
            }
            Some(&i) if refetch.contains(remote_record.record_id()) => {
                let mut fresh = remote_record;
                fresh.sanitize();
                local[i] = fresh;
                outcome.refreshed += 1;
            }
            Some(_) => {}
        }
    }

    Ok(outcome)
}
