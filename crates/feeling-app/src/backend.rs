// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{Completion, Page, PageEffect, PageRequest, RecordRequest, Resource, Stats};

/// The remote side of every management page. Implementations block; the
/// caller decides which thread waits.
pub trait Backend: Send + Sync {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page>;
    fn fetch_stats(&self, resource: Resource) -> Result<Stats>;
    fn execute(&self, request: &RecordRequest) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for std::sync::Arc<B> {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        (**self).fetch_page(request)
    }

    fn fetch_stats(&self, resource: Resource) -> Result<Stats> {
        (**self).fetch_stats(resource)
    }

    fn execute(&self, request: &RecordRequest) -> Result<()> {
        (**self).execute(request)
    }
}

/// Runs one effect to completion on the calling thread. Errors cross back
/// as their full context chain.
pub fn perform<T>(backend: &dyn Backend, effect: PageEffect<T>) -> Completion<T> {
    match effect {
        PageEffect::Fetch { tab, request } => Completion::Fetched {
            tab,
            result: backend
                .fetch_page(&request)
                .map_err(|error| format!("{error:#}")),
        },
        PageEffect::FetchStats(resource) => Completion::Stats(
            backend
                .fetch_stats(resource)
                .map_err(|error| format!("{error:#}")),
        ),
        PageEffect::Execute(request) => {
            let result = backend
                .execute(&request)
                .map_err(|error| format!("{error:#}"));
            Completion::Executed { request, result }
        }
    }
}
