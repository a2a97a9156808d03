//! Collaborator seams for notification delivery and permission.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::request::NotificationRequest;
use crate::error::DeliveryError;

/// The platform's pending-notification store, addressed by id.
///
/// Registering with an id that is already pending replaces it. Removal is
/// fire-and-forget: unknown ids are ignored.
pub trait NotificationCenter: Send + Sync {
    fn add(
        &self,
        request: NotificationRequest,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    fn remove_pending(&self, ids: &[String]);

    fn remove_all_pending(&self);

    fn pending_ids(&self) -> Vec<String>;
}

/// Notification permission. "Denied" is a steady state, not a failure.
pub trait Authorization: Send + Sync {
    fn is_granted(&self) -> bool;

    /// Ask the user for permission; resolves to the resulting state.
    fn request(&self) -> impl Future<Output = bool> + Send;
}

/// Authorization with a fixed answer, flipped explicitly.
#[derive(Debug)]
pub struct StaticAuthorization {
    granted: AtomicBool,
}

impl StaticAuthorization {
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }

    pub fn granted() -> Self {
        Self::new(true)
    }

    pub fn denied() -> Self {
        Self::new(false)
    }

    pub fn set(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }
}

impl Authorization for StaticAuthorization {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request(&self) -> bool {
        self.is_granted()
    }
}

/// Process-local notification center.
#[derive(Debug, Default)]
pub struct InMemoryNotificationCenter {
    pending: Mutex<BTreeMap<String, NotificationRequest>>,
    failure: Mutex<Option<DeliveryError>>,
}

impl InMemoryNotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `add` fail with `err` until cleared.
    pub fn fail_with(&self, err: Option<DeliveryError>) {
        *lock(&self.failure) = err;
    }

    pub fn get(&self, id: &str) -> Option<NotificationRequest> {
        lock(&self.pending).get(id).cloned()
    }

    pub fn pending(&self) -> Vec<NotificationRequest> {
        lock(&self.pending).values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationCenter for InMemoryNotificationCenter {
    async fn add(&self, request: NotificationRequest) -> Result<(), DeliveryError> {
        let failure = lock(&self.failure).clone();
        if let Some(err) = failure {
            return Err(err);
        }
        lock(&self.pending).insert(request.id.clone(), request);
        Ok(())
    }

    fn remove_pending(&self, ids: &[String]) {
        let mut pending = lock(&self.pending);
        for id in ids {
            pending.remove(id);
        }
    }

    fn remove_all_pending(&self) {
        lock(&self.pending).clear();
    }

    fn pending_ids(&self) -> Vec<String> {
        lock(&self.pending).keys().cloned().collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
