// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use feeling_app::{Backend, Completion, ManagementPage, PageCommand, PageEffect, TabKey, perform};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Drives one management page: every effect runs on its own worker thread
/// and reports back over a channel, so the page itself never blocks.
pub struct PageRuntime<T: TabKey> {
    page: ManagementPage<T>,
    backend: Arc<dyn Backend>,
    tx: Sender<Completion<T>>,
    rx: Receiver<Completion<T>>,
    outstanding: usize,
}

impl<T: TabKey> PageRuntime<T> {
    pub fn new(page: ManagementPage<T>, backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            page,
            backend,
            tx,
            rx,
            outstanding: 0,
        }
    }

    pub fn page(&self) -> &ManagementPage<T> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut ManagementPage<T> {
        &mut self.page
    }

    pub fn mount(&mut self) {
        let effects = self.page.mount();
        self.spawn(effects);
    }

    pub fn dispatch(&mut self, command: PageCommand<T>) {
        let effects = self.page.dispatch(Instant::now(), command);
        self.spawn(effects);
    }

    /// Pumps completions and debounce deadlines until the page is idle and
    /// no worker is outstanding.
    pub fn run_until_settled(&mut self, limit: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.outstanding == 0 && self.page.is_settled() {
                return Ok(());
            }

            let now = Instant::now();
            let elapsed = now.duration_since(started);
            if elapsed >= limit {
                bail!(
                    "page did not settle within {}ms ({} request(s) outstanding); raise api.timeout or check the backend",
                    limit.as_millis(),
                    self.outstanding
                );
            }
            let remaining = limit - elapsed;
            let wait = self
                .page
                .next_deadline()
                .map_or(remaining, |deadline| {
                    deadline.saturating_duration_since(now).min(remaining)
                });

            match self.rx.recv_timeout(wait) {
                Ok(completion) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                    let effects = self.page.complete(completion);
                    self.spawn(effects);
                }
                Err(RecvTimeoutError::Timeout) => {
                    let effects = self.page.advance(Instant::now());
                    self.spawn(effects);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    bail!("worker channel closed while requests were outstanding");
                }
            }
        }
    }

    fn spawn(&mut self, effects: Vec<PageEffect<T>>) {
        for effect in effects {
            let backend = Arc::clone(&self.backend);
            let sender = self.tx.clone();
            self.outstanding += 1;
            thread::spawn(move || {
                let _ = sender.send(perform(backend.as_ref(), effect));
            });
        }
    }
}
