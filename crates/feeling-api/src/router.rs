// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use feeling_app::{Backend, Page, PageRequest, RecordRequest, Resource, Stats};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Sends each resource to the remote backend unless it was marked local.
#[derive(Clone)]
pub struct Router {
    remote: Arc<dyn Backend>,
    local: Arc<dyn Backend>,
    local_resources: BTreeSet<Resource>,
}

impl Router {
    pub fn new(remote: Arc<dyn Backend>, local: Arc<dyn Backend>) -> Self {
        Self {
            remote,
            local,
            local_resources: BTreeSet::new(),
        }
    }

    pub fn route_locally(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.local_resources.extend(resources);
        self
    }

    pub fn is_local(&self, resource: Resource) -> bool {
        self.local_resources.contains(&resource)
    }

    fn target(&self, resource: Resource) -> &dyn Backend {
        if self.is_local(resource) {
            self.local.as_ref()
        } else {
            self.remote.as_ref()
        }
    }
}

impl Backend for Router {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        self.target(request.resource).fetch_page(request)
    }

    fn fetch_stats(&self, resource: Resource) -> Result<Stats> {
        self.target(resource).fetch_stats(resource)
    }

    fn execute(&self, request: &RecordRequest) -> Result<()> {
        self.target(request.resource()).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::Router;
    use feeling_app::{Backend, RecordRequest, Resource};
    use feeling_testkit::RecordingBackend;
    use std::sync::Arc;

    #[test]
    fn local_resources_skip_the_remote() {
        let remote = Arc::new(RecordingBackend::new());
        let local = Arc::new(RecordingBackend::new());
        let router = Router::new(remote.clone(), local.clone()).route_locally([Resource::Plans]);

        router.fetch_stats(Resource::Plans).expect("local stats");
        router
            .execute(&RecordRequest::Delete {
                resource: Resource::Events,
                id: "3".into(),
            })
            .expect("remote delete");

        assert_eq!(local.calls().len(), 1);
        assert_eq!(remote.executed().len(), 1);
        assert!(router.is_local(Resource::Plans));
        assert!(!router.is_local(Resource::Users));
    }
}
