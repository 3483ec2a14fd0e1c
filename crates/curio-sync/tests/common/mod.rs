//! Shared fixtures: an in-memory `RemoteStore` with fault injection
//! and call counting, plus record constructors.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use curio_core::{
    CurioResult, Item, ItemMetadata, ItemSpace, ItemTypeMetadata, RemoteError, RemoteStore, Space,
    VideoTranscript,
};

pub const USER: &str = "aaaaaaaa-0000-0000-0000-000000000001";
pub const ITEM_A: &str = "11111111-1111-1111-1111-111111111111";
pub const ITEM_B: &str = "22222222-2222-2222-2222-222222222222";
pub const SPACE_A: &str = "33333333-3333-3333-3333-333333333333";

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn make_item(id: &str, secs: i64) -> Item {
    let mut item = Item::new(USER, format!("item {id}"));
    item.id = id.to_string();
    item.created_at = ts(secs);
    item.updated_at = Some(ts(secs));
    item
}

pub fn make_space(id: &str, secs: i64) -> Space {
    let mut space = Space::new(USER, format!("space {id}"));
    space.id = id.to_string();
    space.created_at = ts(secs);
    space.updated_at = Some(ts(secs));
    space
}

pub fn make_metadata(item_id: &str, secs: i64, author: &str) -> ItemMetadata {
    ItemMetadata {
        item_id: item_id.to_string(),
        user_id: USER.to_string(),
        domain: Some("example.com".to_string()),
        author: Some(author.to_string()),
        username: None,
        profile_image: None,
        published_date: None,
        created_at: ts(secs),
        updated_at: Some(ts(secs)),
    }
}

pub fn make_transcript(item_id: &str, secs: i64) -> VideoTranscript {
    VideoTranscript {
        item_id: item_id.to_string(),
        user_id: USER.to_string(),
        transcript: "hello world".to_string(),
        platform: Some("youtube".to_string()),
        language: Some("en".to_string()),
        duration_seconds: Some(61),
        created_at: ts(secs),
        updated_at: Some(ts(secs)),
        is_deleted: false,
        deleted_at: None,
    }
}

/// In-memory authoritative store with fault injection.
#[derive(Default)]
pub struct MockRemote {
    pub items: Mutex<Vec<Item>>,
    pub spaces: Mutex<Vec<Space>>,
    pub relations: Mutex<Vec<ItemSpace>>,
    pub item_metadata: Mutex<Vec<ItemMetadata>>,
    pub item_type_metadata: Mutex<Vec<ItemTypeMetadata>>,
    pub transcripts: Mutex<Vec<VideoTranscript>>,
    /// What `probe()` reports.
    pub reachable: AtomicBool,
    /// When set, every write fails with a network error.
    pub fail_writes: AtomicBool,
    /// Total network calls observed (reads and writes).
    pub calls: AtomicUsize,
    /// While the flag inside is true, `fetch_spaces` blocks; lets tests
    /// hold a sync run mid-flight.
    pub hold_fetch: Arc<(Mutex<bool>, Condvar)>,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        let remote = Self {
            reachable: AtomicBool::new(true),
            ..Self::default()
        };
        Arc::new(remote)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hold_fetches(&self, hold: bool) {
        let (lock, cvar) = &*self.hold_fetch;
        *lock.lock().unwrap() = hold;
        cvar.notify_all();
    }

    fn tick(&self) -> CurioResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write_gate(&self) -> CurioResult<()> {
        self.tick()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::Network {
                reason: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn wait_if_held(&self) {
        let (lock, cvar) = &*self.hold_fetch;
        let mut held = lock.lock().unwrap();
        while *held {
            held = cvar.wait(held).unwrap();
        }
    }
}

impl RemoteStore for MockRemote {
    fn probe(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn fetch_items(&self, user_id: &str) -> CurioResult<Vec<Item>> {
        self.tick()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_item(&self, item: &Item) -> CurioResult<()> {
        self.write_gate()?;
        let mut items = self.items.lock().unwrap();
        if items.iter().any(|i| i.id == item.id) {
            return Err(RemoteError::UniqueViolation {
                table: "items".to_string(),
                id: item.id.clone(),
            }
            .into());
        }
        items.push(item.clone());
        Ok(())
    }

    fn update_item(&self, item: &Item) -> CurioResult<()> {
        self.write_gate()?;
        let mut items = self.items.lock().unwrap();
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            *existing = item.clone();
        }
        Ok(())
    }

    fn soft_delete_item(&self, id: &str, deleted_at: chrono::DateTime<Utc>) -> CurioResult<()> {
        self.write_gate()?;
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|i| i.id == id) {
            item.is_deleted = true;
            item.deleted_at = Some(deleted_at);
            item.updated_at = Some(deleted_at);
        }
        Ok(())
    }

    fn fetch_spaces(&self, user_id: &str) -> CurioResult<Vec<Space>> {
        self.wait_if_held();
        self.tick()?;
        Ok(self
            .spaces
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_space(&self, space: &Space) -> CurioResult<()> {
        self.write_gate()?;
        let mut spaces = self.spaces.lock().unwrap();
        if spaces.iter().any(|s| s.id == space.id) {
            return Err(RemoteError::UniqueViolation {
                table: "spaces".to_string(),
                id: space.id.clone(),
            }
            .into());
        }
        spaces.push(space.clone());
        Ok(())
    }

    fn update_space(&self, space: &Space) -> CurioResult<()> {
        self.write_gate()?;
        let mut spaces = self.spaces.lock().unwrap();
        if let Some(existing) = spaces.iter_mut().find(|s| s.id == space.id) {
            *existing = space.clone();
        }
        Ok(())
    }

    fn fetch_item_spaces(&self, user_id: &str) -> CurioResult<Vec<ItemSpace>> {
        self.tick()?;
        Ok(self
            .relations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_item_space(&self, relation: &ItemSpace) -> CurioResult<()> {
        self.write_gate()?;
        let mut relations = self.relations.lock().unwrap();
        if relations.iter().any(|r| r.key() == relation.key()) {
            return Err(RemoteError::UniqueViolation {
                table: "item_spaces".to_string(),
                id: format!("{}:{}", relation.item_id, relation.space_id),
            }
            .into());
        }
        relations.push(relation.clone());
        Ok(())
    }

    fn delete_item_space(&self, item_id: &str, space_id: &str) -> CurioResult<()> {
        self.write_gate()?;
        self.relations
            .lock()
            .unwrap()
            .retain(|r| !(r.item_id == item_id && r.space_id == space_id));
        Ok(())
    }

    fn fetch_item_metadata(&self, user_id: &str) -> CurioResult<Vec<ItemMetadata>> {
        self.tick()?;
        Ok(self
            .item_metadata
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    fn upsert_item_metadata(&self, meta: &ItemMetadata) -> CurioResult<()> {
        self.write_gate()?;
        let mut rows = self.item_metadata.lock().unwrap();
        match rows.iter_mut().find(|m| m.item_id == meta.item_id) {
            Some(existing) => *existing = meta.clone(),
            None => rows.push(meta.clone()),
        }
        Ok(())
    }

    fn fetch_item_type_metadata(&self, user_id: &str) -> CurioResult<Vec<ItemTypeMetadata>> {
        self.tick()?;
        Ok(self
            .item_type_metadata
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    fn upsert_item_type_metadata(&self, meta: &ItemTypeMetadata) -> CurioResult<()> {
        self.write_gate()?;
        let mut rows = self.item_type_metadata.lock().unwrap();
        match rows.iter_mut().find(|m| m.item_id == meta.item_id) {
            Some(existing) => *existing = meta.clone(),
            None => rows.push(meta.clone()),
        }
        Ok(())
    }

    fn fetch_video_transcripts(&self, user_id: &str) -> CurioResult<Vec<VideoTranscript>> {
        self.tick()?;
        Ok(self
            .transcripts
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_video_transcript(&self, transcript: &VideoTranscript) -> CurioResult<()> {
        self.write_gate()?;
        let mut rows = self.transcripts.lock().unwrap();
        if rows.iter().any(|t| t.item_id == transcript.item_id) {
            return Err(RemoteError::UniqueViolation {
                table: "video_transcripts".to_string(),
                id: transcript.item_id.clone(),
            }
            .into());
        }
        rows.push(transcript.clone());
        Ok(())
    }

    fn update_video_transcript(&self, transcript: &VideoTranscript) -> CurioResult<()> {
        self.write_gate()?;
        let mut rows = self.transcripts.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|t| t.item_id == transcript.item_id) {
            *existing = transcript.clone();
        }
        Ok(())
    }

    fn soft_delete_video_transcript(
        &self,
        item_id: &str,
        deleted_at: chrono::DateTime<Utc>,
    ) -> CurioResult<()> {
        self.write_gate()?;
        let mut rows = self.transcripts.lock().unwrap();
        if let Some(t) = rows.iter_mut().find(|t| t.item_id == item_id) {
            t.is_deleted = true;
            t.deleted_at = Some(deleted_at);
            t.updated_at = Some(deleted_at);
        }
        Ok(())
    }

    fn item_id_set(&self, user_id: &str) -> CurioResult<HashSet<String>> {
        self.tick()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .map(|i| i.id.clone())
            .collect())
    }

    fn space_id_set(&self, user_id: &str) -> CurioResult<HashSet<String>> {
        self.tick()?;
        Ok(self
            .spaces
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.id.clone())
            .collect())
    }
}
