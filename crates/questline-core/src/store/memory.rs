use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::MissionStore;
use crate::error::StoreError;
use crate::model::{PlayerProfile, Quest, TodoItem};

#[derive(Debug, Default)]
struct Tables {
    quests: BTreeMap<String, Quest>,
    todos: BTreeMap<String, TodoItem>,
    profile: Option<PlayerProfile>,
}

/// Volatile store for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl MissionStore for MemoryStore {
    fn get_quest(&self, id: &str) -> Result<Option<Quest>, StoreError> {
        Ok(self.tables()?.quests.get(id).cloned())
    }

    fn put_quest(&self, quest: &Quest) -> Result<(), StoreError> {
        self.tables()?.quests.insert(quest.id.clone(), quest.clone());
        Ok(())
    }

    fn delete_quest(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tables()?.quests.remove(id).is_some())
    }

    fn list_quests(&self) -> Result<Vec<Quest>, StoreError> {
        let mut quests: Vec<Quest> = self.tables()?.quests.values().cloned().collect();
        quests.sort_by_key(|q| q.created_at);
        Ok(quests)
    }

    fn get_todo(&self, id: &str) -> Result<Option<TodoItem>, StoreError> {
        Ok(self.tables()?.todos.get(id).cloned())
    }

    fn put_todo(&self, todo: &TodoItem) -> Result<(), StoreError> {
        self.tables()?.todos.insert(todo.id.clone(), todo.clone());
        Ok(())
    }

    fn delete_todo(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tables()?.todos.remove(id).is_some())
    }

    fn list_todos(&self) -> Result<Vec<TodoItem>, StoreError> {
        let mut todos: Vec<TodoItem> = self.tables()?.todos.values().cloned().collect();
        todos.sort_by_key(|t| t.created_at);
        Ok(todos)
    }

    fn load_profile(&self) -> Result<PlayerProfile, StoreError> {
        Ok(self.tables()?.profile.clone().unwrap_or_default())
    }

    fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.tables()?.profile = Some(profile.clone());
        Ok(())
    }

    fn commit_completion(&self, quest: &Quest, profile: &PlayerProfile) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.quests.insert(quest.id.clone(), quest.clone());
        tables.profile = Some(profile.clone());
        Ok(())
    }
}
