//! 1:1 metadata reconciliation.
//!
//! ItemMetadata and ItemTypeMetadata have no directional asymmetry:
//! both replicas mutate them freely, so the pass runs the conflict
//! resolver per id over the union of local and remote keys and writes
//! the winner through to the losing side.

use std::collections::HashMap;

use curio_core::{ids, CurioResult, Versioned};

use crate::conflict;

/// Counters from one resolver-driven pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VersionedOutcome {
    pub new_local: usize,
    pub pushed: usize,
    pub refreshed: usize,
    pub purged: usize,
}

pub fn reconcile_versioned<T, U>(
    local: &mut Vec<T>,
    remote: Vec<T>,
    mut upsert_remote: U,
) -> CurioResult<VersionedOutcome>
where
    T: Versioned,
    U: FnMut(&T) -> CurioResult<()>,
{
    let mut outcome = VersionedOutcome::default();

    let before = local.len();
    local.retain(|r| ids::is_valid_id(r.record_id()));
    outcome.purged = before - local.len();

    let remote_map: HashMap<String, T> = remote
        .into_iter()
        .map(|r| (r.record_id().to_string(), r))
        .collect();
    let local_index: HashMap<String, usize> = local
        .iter()
        .enumerate()
        .map(|(i, r)| (r.record_id().to_string(), i))
        .collect();

    // Union of keys: local order first, then remote-only keys.
    let mut keys: Vec<String> = local.iter().map(|r| r.record_id().to_string()).collect();
    let mut remote_only: Vec<&String> = remote_map
        .keys()
        .filter(|k| !local_index.contains_key(*k))
        .collect();
    remote_only.sort(); // deterministic pass order
    keys.extend(remote_only.into_iter().cloned());

    for key in keys {
        let local_version = local_index.get(&key).map(|&i| local[i].clone());
        let remote_version = remote_map.get(&key).cloned();
        let Some(resolution) = conflict::resolve(local_version, remote_version) else {
            continue;
        };

        if resolution.write_remote {
            match upsert_remote(&resolution.winner) {
                Ok(()) => outcome.pushed += 1,
                Err(e) if e.is_already_applied() => outcome.pushed += 1,
                Err(e) => return Err(e),
            }
        }
        if resolution.write_local {
            match local_index.get(&key) {
                Some(&i) => {
                    local[i] = resolution.winner;
                    outcome.refreshed += 1;
                }
                None => {
                    local.push(resolution.winner);
                    outcome.new_local += 1;
                }
            }
        }
    }

    Ok(outcome)
}
