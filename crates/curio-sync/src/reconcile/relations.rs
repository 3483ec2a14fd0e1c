//! ItemSpace relation reconciliation.
//!
//! Relations have no tombstones; presence means membership. The pass is
//! a set difference on the composite key: push local-only pairs, pull
//! remote-only pairs. A local pair whose item or space is not yet known
//! remotely is an orphan at sync time and is skipped with a log line,
//! not an error; the row stays local and retries once the parent has
//! synced.

use std::collections::HashSet;

use curio_core::{ids, CurioResult, ItemSpace};

/// Counters from one relation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelationOutcome {
    pub new_local: usize,
    pub uploaded: usize,
    pub skipped_orphans: usize,
    pub purged: usize,
}

pub fn reconcile_item_spaces<I>(
    local: &mut Vec<ItemSpace>,
    remote: Vec<ItemSpace>,
    remote_items: &HashSet<String>,
    remote_spaces: &HashSet<String>,
    mut insert_remote: I,
) -> CurioResult<RelationOutcome>
where
    I: FnMut(&ItemSpace) -> CurioResult<()>,
{
    let mut outcome = RelationOutcome::default();

    let before = local.len();
    local.retain(|r| ids::is_valid_id(&r.item_id) && ids::is_valid_id(&r.space_id));
    outcome.purged = before - local.len();

    let remote_keys: HashSet<(String, String)> = remote.iter().map(|r| r.key()).collect();
    let local_keys: HashSet<(String, String)> = local.iter().map(|r| r.key()).collect();

    for relation in local.iter() {
        if remote_keys.contains(&relation.key()) {
            continue;
        }
        if !remote_items.contains(&relation.item_id) || !remote_spaces.contains(&relation.space_id)
        {
            tracing::info!(
                "reconcile: skipping orphan relation {}:{}",
                relation.item_id,
                relation.space_id
            );
            outcome.skipped_orphans += 1;
            continue;
        }
        match insert_remote(relation) {
            Ok(()) => outcome.uploaded += 1,
            Err(e) if e.is_already_applied() => outcome.uploaded += 1,
            Err(e) => return Err(e),
        }
    }

    for relation in remote {
        if !local_keys.contains(&relation.key()) {
            local.push(relation);
            outcome.new_local += 1;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: &str = "11111111-1111-1111-1111-111111111111";
    const SPACE: &str = "22222222-2222-2222-2222-222222222222";
    const OTHER: &str = "33333333-3333-3333-3333-333333333333";

    fn known(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pushes_local_only_and_pulls_remote_only() {
        let mut local = vec![ItemSpace::new("u", ITEM, SPACE)];
        let remote = vec![ItemSpace::new("u", OTHER, SPACE)];
        let mut uploaded = Vec::new();
        let outcome = reconcile_item_spaces(
            &mut local,
            remote,
            &known(&[ITEM, OTHER]),
            &known(&[SPACE]),
            |r| {
                uploaded.push(r.key());
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(outcome.uploaded, 1);
        assert_eq!(outcome.new_local, 1);
        assert_eq!(local.len(), 2);
        assert_eq!(uploaded, vec![(ITEM.to_string(), SPACE.to_string())]);
    }

    #[test]
    fn orphan_relations_are_skipped_not_uploaded() {
        let mut local = vec![ItemSpace::new("u", ITEM, SPACE)];
        let outcome = reconcile_item_spaces(
            &mut local,
            vec![],
            &known(&[]), // item unknown remotely
            &known(&[SPACE]),
            |_| panic!("must not upload an orphan"),
        )
        .unwrap();
        assert_eq!(outcome.skipped_orphans, 1);
        assert_eq!(outcome.uploaded, 0);
        // The local row stays; a later pass may succeed once the parent
        // item has synced.
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn malformed_ids_are_purged() {
        let mut local = vec![ItemSpace::new("u", "scratch", SPACE)];
        let outcome = reconcile_item_spaces(
            &mut local,
            vec![],
            &known(&[ITEM]),
            &known(&[SPACE]),
            |_| Ok(()),
        )
        .unwrap();
        assert_eq!(outcome.purged, 1);
        assert!(local.is_empty());
    }
}
