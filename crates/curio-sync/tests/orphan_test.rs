//! Orphan cleanup against a remote whose item set is authoritative.

mod common;

use std::sync::Arc;

use common::{make_item, make_metadata, make_transcript, MockRemote, ITEM_A, ITEM_B, SPACE_A, USER};
use curio_core::{CollectionKey, CollectionStore, ItemMetadata, ItemSpace, RemoteStore, SyncRecord};
use curio_store::{load_collection, save_collection, MemoryStore};
use curio_sync::OrphanCleaner;

fn cleaner_with(remote: Arc<MockRemote>) -> (OrphanCleaner, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cleaner = OrphanCleaner::new(
        store.clone() as Arc<dyn CollectionStore>,
        remote as Arc<dyn RemoteStore>,
    );
    (cleaner, store)
}

#[test]
fn metadata_for_unknown_item_is_removed() {
    let remote = MockRemote::new();
    remote.items.lock().unwrap().push(make_item(ITEM_A, 10));
    let (cleaner, store) = cleaner_with(remote);
    save_collection(
        store.as_ref(),
        CollectionKey::ItemMetadata,
        &[make_metadata(ITEM_A, 10, "keep"), make_metadata(ITEM_B, 10, "drop")],
    )
    .unwrap();

    let report = cleaner.cleanup(USER).unwrap();
    assert_eq!(report.records_removed, 1);
    assert!(report
        .details
        .iter()
        .any(|d| d == "item_metadata: removed 1"));

    let rows: Vec<ItemMetadata> =
        load_collection(store.as_ref(), CollectionKey::ItemMetadata).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item_id, ITEM_A);
}

#[test]
fn children_of_tombstoned_items_are_kept() {
    let remote = MockRemote::new();
    let mut dead = make_item(ITEM_A, 10);
    dead.mark_deleted(common::ts(20));
    remote.items.lock().unwrap().push(dead);
    let (cleaner, store) = cleaner_with(remote);
    save_collection(
        store.as_ref(),
        CollectionKey::VideoTranscripts,
        &[make_transcript(ITEM_A, 10)],
    )
    .unwrap();

    let report = cleaner.cleanup(USER).unwrap();
    assert_eq!(report.records_removed, 0);
}

#[test]
fn relations_and_transcripts_are_filtered_too() {
    let remote = MockRemote::new();
    remote.items.lock().unwrap().push(make_item(ITEM_A, 10));
    let (cleaner, store) = cleaner_with(remote);
    save_collection(
        store.as_ref(),
        CollectionKey::ItemSpaces,
        &[
            ItemSpace::new(USER, ITEM_A, SPACE_A),
            ItemSpace::new(USER, ITEM_B, SPACE_A),
        ],
    )
    .unwrap();
    save_collection(
        store.as_ref(),
        CollectionKey::VideoTranscripts,
        &[make_transcript(ITEM_B, 10)],
    )
    .unwrap();

    let report = cleaner.cleanup(USER).unwrap();
    assert_eq!(report.records_removed, 2);
    let relations: Vec<ItemSpace> =
        load_collection(store.as_ref(), CollectionKey::ItemSpaces).unwrap();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].item_id, ITEM_A);
}

#[test]
fn empty_collections_report_all_four_passes() {
    let remote = MockRemote::new();
    let (cleaner, _store) = cleaner_with(remote);
    let report = cleaner.cleanup(USER).unwrap();
    assert_eq!(report.records_removed, 0);
    assert_eq!(report.details.len(), 4);
}
