// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use feeling_app::{
    Backend, ManagementPage, Page, PageEffect, PageRequest, PaginationMeta, Record, RecordRequest,
    Resource, Stats, TabKey, perform,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;

pub fn page_of(items: Vec<Record>) -> Page {
    let total_elements = items.len();
    Page {
        items,
        pagination: PaginationMeta {
            total_pages: usize::from(total_elements > 0),
            total_elements,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    FetchPage(PageRequest),
    FetchStats(Resource),
    Execute(RecordRequest),
}

/// Backend double that serves canned pages, records every call, and fails
/// the operations it is told to fail.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pages: Mutex<BTreeMap<(Resource, Option<String>), Page>>,
    stats: Mutex<BTreeMap<Resource, Stats>>,
    failing: Mutex<BTreeSet<String>>,
    calls: Mutex<Vec<BackendCall>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request for `resource` with `status` gets `page`.
    pub fn serve(&self, resource: Resource, status: Option<&str>, page: Page) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert((resource, status.map(str::to_owned)), page);
        }
    }

    pub fn serve_stats(&self, resource: Resource, stats: Stats) {
        if let Ok(mut all) = self.stats.lock() {
            all.insert(resource, stats);
        }
    }

    /// Fails operations named like [`RecordRequest::op`], or `fetch` and
    /// `stats`.
    pub fn fail(&self, op: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(op.to_owned());
        }
    }

    pub fn recover(&self, op: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(op);
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn fetches(&self) -> Vec<PageRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::FetchPage(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn executed(&self) -> Vec<RecordRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Execute(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, call: BackendCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check(&self, op: &str) -> Result<()> {
        let failing = self
            .failing
            .lock()
            .map(|failing| failing.contains(op))
            .unwrap_or(false);
        if failing {
            bail!("{op} failed: scripted failure");
        }
        Ok(())
    }
}

impl Backend for RecordingBackend {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        self.record(BackendCall::FetchPage(request.clone()));
        self.check("fetch")?;
        let key = (request.resource, request.status.map(str::to_owned));
        Ok(self
            .pages
            .lock()
            .ok()
            .and_then(|pages| pages.get(&key).cloned())
            .unwrap_or_default())
    }

    fn fetch_stats(&self, resource: Resource) -> Result<Stats> {
        self.record(BackendCall::FetchStats(resource));
        self.check("stats")?;
        Ok(self
            .stats
            .lock()
            .ok()
            .and_then(|stats| stats.get(&resource).cloned())
            .unwrap_or_default())
    }

    fn execute(&self, request: &RecordRequest) -> Result<()> {
        self.record(BackendCall::Execute(request.clone()));
        self.check(request.op())
    }
}

/// Runs effects against `backend` on the calling thread, feeding each
/// completion back into the page until no work remains.
pub fn run_effects<T: TabKey>(
    page: &mut ManagementPage<T>,
    backend: &dyn Backend,
    effects: Vec<PageEffect<T>>,
) {
    let mut queue: VecDeque<PageEffect<T>> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let completion = perform(backend, effect);
        queue.extend(page.complete(completion));
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendCall, RecordingBackend, page_of};
    use feeling_app::{Backend, PageRequest, Record, RecordRequest, Resource};

    #[test]
    fn recording_backend_serves_and_fails_on_demand() {
        let backend = RecordingBackend::new();
        backend.serve(
            Resource::Users,
            Some("ACTIVO"),
            page_of(vec![Record::new("1")]),
        );
        let request = PageRequest {
            resource: Resource::Users,
            status: Some("ACTIVO"),
            page: 0,
            size: Some(10),
            search: String::new(),
        };
        assert_eq!(
            backend
                .fetch_page(&request)
                .expect("served page")
                .items
                .len(),
            1
        );

        let delete = RecordRequest::Delete {
            resource: Resource::Users,
            id: "1".into(),
        };
        backend.fail("delete");
        assert!(backend.execute(&delete).is_err());
        backend.recover("delete");
        assert!(backend.execute(&delete).is_ok());

        assert_eq!(backend.calls()[0], BackendCall::FetchPage(request));
        assert_eq!(backend.executed().len(), 2);
    }
}
