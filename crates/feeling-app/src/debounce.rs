// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTask {
    value: String,
    due: Instant,
}

/// Keyed cancellable delayed tasks. Scheduling a key replaces whatever was
/// pending for it, so each key has at most one task waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<K: Ord> {
    delay: Duration,
    pending: BTreeMap<K, PendingTask>,
}

impl<K: Ord + Copy> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, key: K, value: impl Into<String>, now: Instant) {
        self.pending.insert(
            key,
            PendingTask {
                value: value.into(),
                due: now + self.delay,
            },
        );
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|task| task.due).min()
    }

    pub fn take_due(&mut self, now: Instant) -> Vec<(K, String)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(key, _)| *key)
            .collect();
        due.into_iter()
            .filter_map(|key| self.pending.remove(&key).map(|task| (key, task.value)))
            .collect()
    }
}

impl<K: Ord + Copy> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
