// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::marker::PhantomData;

use crate::{Page, PageRequest, PaginationMeta, Record, Resource, TabKey};

/// What a tab's fetch is bound to: the page's resource, plus the status
/// for status-keyed tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchBinding {
    pub resource: Resource,
    pub status: Option<&'static str>,
    pub paged: bool,
}

impl FetchBinding {
    /// Builds the backend request from the 1-indexed UI page.
    pub fn request(&self, page: usize, rows_per_page: usize, search: &str) -> PageRequest {
        if self.paged {
            PageRequest {
                resource: self.resource,
                status: self.status,
                page: page.saturating_sub(1),
                size: Some(rows_per_page),
                search: search.to_owned(),
            }
        } else {
            PageRequest {
                resource: self.resource,
                status: self.status,
                page: 0,
                size: None,
                search: String::new(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    pub items: Vec<Record>,
    pub pagination: PaginationMeta,
}

/// Item lists owned outside the table state. Only fetch completions write
/// here.
#[derive(Debug, Clone, PartialEq)]
pub struct Collections<T: TabKey> {
    resource: Resource,
    paged: bool,
    lists: Vec<Collection>,
    tabs: PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub items: &'a [Record],
    pub pagination: PaginationMeta,
    pub fetch: Option<FetchBinding>,
}

impl Resolved<'static> {
    pub const EMPTY: Self = Resolved {
        items: &[],
        pagination: PaginationMeta {
            total_pages: 0,
            total_elements: 0,
        },
        fetch: None,
    };
}

impl<T: TabKey> Collections<T> {
    pub fn new(resource: Resource, paged: bool) -> Self {
        Self {
            resource,
            paged,
            lists: vec![Collection::default(); T::ALL.len()],
            tabs: PhantomData,
        }
    }

    pub fn get(&self, tab: T) -> &Collection {
        &self.lists[tab.position()]
    }

    pub fn store(&mut self, tab: T, page: Page) {
        let slot = &mut self.lists[tab.position()];
        slot.items = page.items;
        slot.pagination = page.pagination;
    }

    pub fn binding(&self, tab: T) -> FetchBinding {
        FetchBinding {
            resource: self.resource,
            status: tab.status(),
            paged: self.paged,
        }
    }
}

pub fn resolve<T: TabKey>(collections: &Collections<T>, tab: T) -> Resolved<'_> {
    let collection = collections.get(tab);
    Resolved {
        items: &collection.items,
        pagination: collection.pagination,
        fetch: Some(collections.binding(tab)),
    }
}

/// Raw-string variant; unknown tabs get the empty default instead of an
/// error.
pub fn resolve_label<'a, T: TabKey>(collections: &'a Collections<T>, label: &str) -> Resolved<'a> {
    match T::parse(label) {
        Some(tab) => resolve(collections, tab),
        None => Resolved::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::{Collections, resolve, resolve_label};
    use crate::{EventTab, Page, PaginationMeta, Record, Resource};

    #[test]
    fn status_tab_binds_its_status() {
        let collections = Collections::<EventTab>::new(Resource::Events, true);
        let resolved = resolve(&collections, EventTab::Cancelado);
        let binding = resolved.fetch.expect("binding for declared tab");
        let request = binding.request(3, 20, "gala");
        assert_eq!(request.resource, Resource::Events);
        assert_eq!(request.status, Some("CANCELADO"));
        assert_eq!(request.page, 2);
        assert_eq!(request.size, Some(20));
        assert_eq!(request.search, "gala");
    }

    #[test]
    fn all_tab_has_no_status() {
        let collections = Collections::<EventTab>::new(Resource::Events, true);
        let binding = collections.binding(EventTab::All);
        assert_eq!(binding.status, None);
    }

    #[test]
    fn unpaged_binding_requests_whole_collection() {
        let collections = Collections::<EventTab>::new(Resource::Plans, false);
        let request = collections.binding(EventTab::All).request(4, 10, "x");
        assert_eq!(request.page, 0);
        assert_eq!(request.size, None);
        assert!(request.search.is_empty());
    }

    #[test]
    fn unknown_label_resolves_to_empty_default() {
        let mut collections = Collections::<EventTab>::new(Resource::Events, true);
        collections.store(
            EventTab::All,
            Page {
                items: vec![Record::new("1")],
                pagination: PaginationMeta {
                    total_pages: 1,
                    total_elements: 1,
                },
            },
        );

        let resolved = resolve_label(&collections, "ARCHIVADO");
        assert!(resolved.items.is_empty());
        assert_eq!(resolved.pagination, PaginationMeta::default());
        assert!(resolved.fetch.is_none());

        let resolved = resolve_label(&collections, "all");
        assert_eq!(resolved.items.len(), 1);
        assert!(resolved.fetch.is_some());
    }

    #[test]
    fn store_only_touches_its_tab() {
        let mut collections = Collections::<EventTab>::new(Resource::Events, true);
        collections.store(
            EventTab::Pausado,
            Page {
                items: vec![Record::new("9")],
                pagination: PaginationMeta {
                    total_pages: 1,
                    total_elements: 1,
                },
            },
        );
        assert!(collections.get(EventTab::All).items.is_empty());
        assert_eq!(collections.get(EventTab::Pausado).items.len(), 1);
    }
}
