//! Read/write contract against the durable object store.
//!
//! The engine never assumes a storage format. Atomic read-modify-write per
//! entity is provided by the coordinator's entity locks on top of these
//! single-record operations.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::model::{PlayerProfile, Quest, TodoItem};

pub trait MissionStore: Send + Sync {
    fn get_quest(&self, id: &str) -> Result<Option<Quest>, StoreError>;

    /// Insert or replace.
    fn put_quest(&self, quest: &Quest) -> Result<(), StoreError>;

    /// Returns false if nothing was stored under `id`.
    fn delete_quest(&self, id: &str) -> Result<bool, StoreError>;

    fn list_quests(&self) -> Result<Vec<Quest>, StoreError>;

    fn get_todo(&self, id: &str) -> Result<Option<TodoItem>, StoreError>;

    fn put_todo(&self, todo: &TodoItem) -> Result<(), StoreError>;

    fn delete_todo(&self, id: &str) -> Result<bool, StoreError>;

    fn list_todos(&self) -> Result<Vec<TodoItem>, StoreError>;

    /// The stored profile, or a fresh level-1 profile if none was saved yet.
    fn load_profile(&self) -> Result<PlayerProfile, StoreError>;

    fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StoreError>;

    /// Persist a completed quest together with the profile it produced.
    fn commit_completion(&self, quest: &Quest, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.put_quest(quest)?;
        self.save_profile(profile)
    }
}
