//! Layout store use-case service.
//!
//! # Responsibility
//! - Hold the active user and the in-memory widget collection.
//! - Repair positions on every update and debounce persisted writes.
//! - Notify subscribed listeners synchronously after each replacement.
//!
//! # Invariants
//! - The widget collection is only ever replaced whole.
//! - At most one auto-save is pending; it persists whatever is in memory
//!   for whoever is the current user when it fires.
//! - No public operation returns an error; persistence failures surface as
//!   `false` from save operations and as diagnostics.

use crate::clock::Clock;
use crate::config::LayoutConfig;
use crate::model::layout::{validate_and_fix_widget_positions, LayoutRecord};
use crate::model::widget::{default_widgets, Widget};
use crate::repo::layout_repo::{LayoutRepository, RepoError};
use crate::service::autosave::DebounceTimer;
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};

/// Handle returned by `LayoutStore::subscribe`.
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&[Widget])>;

/// Snapshot of backing store usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageInfo {
    /// Byte size of the stored layout record text.
    pub used_bytes: usize,
    pub available: bool,
}

/// In-memory layout state backed by a key-value store.
pub struct LayoutStore<S: KeyValueStore, C: Clock> {
    repo: LayoutRepository<S>,
    clock: C,
    current_user: Option<String>,
    widgets: Vec<Widget>,
    autosave: DebounceTimer,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription_id: SubscriptionId,
}

impl<S: KeyValueStore, C: Clock> LayoutStore<S, C> {
    /// Creates a store with default widgets and no active user.
    pub fn new(store: S, clock: C, config: LayoutConfig) -> Self {
        let repo = LayoutRepository::new(store, &config);
        if !repo.is_available() {
            warn!(
                "event=layout_store_init module=service status=degraded reason=storage_unavailable"
            );
        }

        Self {
            repo,
            clock,
            current_user: None,
            widgets: default_widgets(),
            autosave: DebounceTimer::new(config.autosave_delay),
            listeners: Vec::new(),
            next_subscription_id: 1,
        }
    }

    /// Current in-memory widgets.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn has_pending_save(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Switches the active user and loads their layout.
    ///
    /// A pending auto-save for the previous user is dropped. Re-selecting the
    /// current user keeps unsaved edits and the pending save.
    pub fn set_current_user(&mut self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        if self.current_user.as_deref() == Some(user_id.as_str()) {
            debug!("event=layout_user_set module=service status=unchanged");
            return;
        }
        self.cancel_pending_save("user_switch");
        let widgets = self.repo.layout_for(&user_id).into_widgets();
        info!(
            "event=layout_user_set module=service status=ok widget_count={}",
            widgets.len()
        );
        self.current_user = Some(user_id);
        self.replace_widgets(widgets);
    }

    /// Drops the active user (logout) and resets memory to defaults.
    pub fn clear_current_user(&mut self) {
        self.cancel_pending_save("user_cleared");
        self.current_user = None;
        self.replace_widgets(default_widgets());
    }

    /// Repairs positions, replaces the collection and schedules a save.
    pub fn update_widgets(&mut self, widgets: Vec<Widget>) {
        let repaired = validate_and_fix_widget_positions(&widgets);
        self.replace_widgets(repaired);

        if self.current_user.is_none() {
            debug!("event=autosave_schedule module=service status=skipped reason=no_user");
            return;
        }
        self.autosave.schedule(self.clock.now_ms());
        debug!(
            "event=autosave_schedule module=service status=ok deadline_ms={}",
            self.autosave.deadline_ms().unwrap_or_default()
        );
    }

    /// Returns `user_id`'s stored layout, or a fresh copy of the defaults.
    pub fn get_layout(&self, user_id: &str) -> Vec<Widget> {
        self.repo.layout_for(user_id).into_widgets()
    }

    /// Persists `widgets` for `user_id` immediately.
    ///
    /// Returns `false` when storage is unavailable or the write fails.
    pub fn save_layout(&self, user_id: &str, widgets: &[Widget]) -> bool {
        let record = LayoutRecord {
            user_id: user_id.to_string(),
            widgets: widgets.to_vec(),
            last_updated: self.clock.now_ms(),
            version: self.repo.storage_version().to_string(),
        };

        match self.repo.save_record(&record) {
            Ok(bytes) => {
                info!(
                    "event=layout_save module=service status=ok widget_count={} bytes={}",
                    widgets.len(),
                    bytes
                );
                true
            }
            Err(RepoError::Unavailable) => {
                warn!("event=layout_save module=service status=skipped reason=storage_unavailable");
                false
            }
            Err(err) => {
                error!(
                    "event=layout_save module=service status=error error={}",
                    err
                );
                false
            }
        }
    }

    /// Overwrites storage with the default layout and returns it.
    pub fn reset_layout(&mut self, user_id: &str) -> Vec<Widget> {
        self.cancel_pending_save("reset");
        let defaults = default_widgets();
        self.save_layout(user_id, &defaults);
        self.replace_widgets(defaults.clone());
        defaults
    }

    /// Deletes the persisted record and resets memory to defaults.
    pub fn clear_all(&mut self) {
        self.cancel_pending_save("clear_all");
        match self.repo.remove_record() {
            Ok(()) => info!("event=layout_clear module=service status=ok"),
            Err(err) => warn!(
                "event=layout_clear module=service status=skipped error={}",
                err
            ),
        }
        self.replace_widgets(default_widgets());
    }

    pub fn get_last_updated(&self, user_id: &str) -> Option<i64> {
        self.repo.last_updated_for(user_id)
    }

    pub fn get_storage_info(&self) -> StorageInfo {
        match self.repo.stored_size() {
            Ok(used_bytes) => StorageInfo {
                used_bytes,
                available: true,
            },
            Err(_) => StorageInfo {
                used_bytes: 0,
                available: false,
            },
        }
    }

    /// Services the auto-save timer; call from the host event loop.
    ///
    /// Returns `None` when nothing fired, otherwise the save result.
    pub fn tick(&mut self) -> Option<bool> {
        if !self.autosave.take_due(self.clock.now_ms()) {
            return None;
        }
        self.persist_current("timer")
    }

    /// Persists a pending auto-save right away (e.g. before shutdown).
    pub fn flush_pending_save(&mut self) -> Option<bool> {
        if !self.autosave.cancel() {
            return None;
        }
        self.persist_current("flush")
    }

    /// Registers a listener called after every in-memory replacement.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Widget]) + 'static) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn persist_current(&mut self, trigger: &'static str) -> Option<bool> {
        let user_id = match self.current_user.as_deref() {
            Some(user_id) => user_id,
            None => {
                debug!("event=autosave_fire module=service status=skipped trigger={trigger} reason=no_user");
                return None;
            }
        };
        debug!("event=autosave_fire module=service status=start trigger={trigger}");
        Some(self.save_layout(user_id, &self.widgets))
    }

    fn cancel_pending_save(&mut self, reason: &'static str) {
        if self.autosave.cancel() {
            debug!("event=autosave_cancel module=service status=ok reason={reason}");
        }
    }

    fn replace_widgets(&mut self, widgets: Vec<Widget>) {
        self.widgets = widgets;
        for (_, listener) in self.listeners.iter_mut() {
            listener(self.widgets.as_slice());
        }
    }
}
