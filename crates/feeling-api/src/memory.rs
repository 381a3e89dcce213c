// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use feeling_app::{
    Backend, FieldValue, Page, PageRequest, PaginationMeta, Record, RecordAction, RecordId,
    RecordRequest, Resource, Stats, total_pages,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::AdminFaker;

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<Resource, Vec<Record>>,
    next_id: i64,
}

/// In-process resource tables that honor the same contract as the REST
/// backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(dataset: BTreeMap<Resource, Vec<Record>>) -> Result<Self> {
        let backend = Self::new();
        for (resource, records) in dataset {
            backend.insert_all(resource, records)?;
        }
        Ok(backend)
    }

    /// Seeds `rows` generated records for each of `resources`. The same
    /// seed always yields the same tables.
    pub fn demo(seed: u64, rows: usize, resources: &[Resource]) -> Result<Self> {
        let mut dataset = AdminFaker::new(seed).dataset(rows);
        dataset.retain(|resource, _| resources.contains(resource));
        log::debug!("op=seed seed={seed} rows={rows} resources={resources:?}");
        Self::with_dataset(dataset)
    }

    pub fn insert_all(&self, resource: Resource, records: Vec<Record>) -> Result<()> {
        let mut tables = self.lock()?;
        let highest = records
            .iter()
            .filter_map(|record| record.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        tables.next_id = tables.next_id.max(highest);
        tables.rows.entry(resource).or_default().extend(records);
        Ok(())
    }

    pub fn records(&self, resource: Resource) -> Vec<Record> {
        self.lock()
            .map(|tables| tables.rows.get(&resource).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow!("memory backend lock poisoned"))
    }
}

impl Backend for MemoryBackend {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let tables = self.lock()?;
        let needle = request.search.trim().to_lowercase();
        let matching: Vec<&Record> = tables
            .rows
            .get(&request.resource)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|record| match request.status {
                Some(status) => record.text("status") == status,
                None => true,
            })
            .filter(|record| needle.is_empty() || mentions(record, &needle))
            .collect();

        let total_elements = matching.len();
        let (items, total_pages) = match request.size {
            Some(size) => (
                matching
                    .into_iter()
                    .skip(request.page.saturating_mul(size))
                    .take(size)
                    .cloned()
                    .collect(),
                total_pages(total_elements, size),
            ),
            None => (
                matching.into_iter().cloned().collect(),
                usize::from(total_elements > 0),
            ),
        };
        Ok(Page {
            items,
            pagination: PaginationMeta {
                total_pages,
                total_elements,
            },
        })
    }

    fn fetch_stats(&self, resource: Resource) -> Result<Stats> {
        let tables = self.lock()?;
        let mut stats = Stats::default();
        let rows = tables.rows.get(&resource).map(Vec::as_slice).unwrap_or_default();
        stats.counts.insert("total".to_owned(), rows.len() as u64);
        for record in rows {
            let status = record.text("status");
            if !status.is_empty() {
                *stats.counts.entry(status).or_insert(0) += 1;
            }
        }
        Ok(stats)
    }

    fn execute(&self, request: &RecordRequest) -> Result<()> {
        let mut tables = self.lock()?;
        match request {
            RecordRequest::Create { resource, fields } => {
                tables.next_id += 1;
                let mut record = Record {
                    id: RecordId::from(tables.next_id),
                    fields: fields.clone(),
                };
                if record.field("status").is_null() {
                    record
                        .fields
                        .insert("status".to_owned(), initial_status(*resource).into());
                }
                tables.rows.entry(*resource).or_default().push(record);
            }
            RecordRequest::Update {
                resource,
                id,
                fields,
            } => {
                let record = find(&mut tables, *resource, id)?;
                for (name, value) in fields {
                    record.fields.insert(name.clone(), value.clone());
                }
            }
            RecordRequest::Delete { resource, id } => {
                let rows = tables.rows.entry(*resource).or_default();
                let before = rows.len();
                rows.retain(|record| &record.id != id);
                if rows.len() == before {
                    bail!("{} {id} not found", resource.singular());
                }
            }
            RecordRequest::Action {
                resource,
                id,
                action,
            } => {
                let record = find(&mut tables, *resource, id)?;
                let next = transition(*resource, &record.text("status"), *action)?;
                record
                    .fields
                    .insert("status".to_owned(), FieldValue::from(next));
            }
        }
        log::debug!(
            "op={} resource={} backend=memory",
            request.op(),
            request.resource().as_str()
        );
        Ok(())
    }
}

fn find<'a>(tables: &'a mut Tables, resource: Resource, id: &RecordId) -> Result<&'a mut Record> {
    tables
        .rows
        .get_mut(&resource)
        .and_then(|rows| rows.iter_mut().find(|record| &record.id == id))
        .ok_or_else(|| anyhow!("{} {id} not found", resource.singular()))
}

fn mentions(record: &Record, needle: &str) -> bool {
    record
        .fields
        .values()
        .any(|value| value.display().to_lowercase().contains(needle))
}

const fn initial_status(resource: Resource) -> &'static str {
    match resource {
        Resource::Events => "EN_EDICION",
        Resource::Users | Resource::Complaints => "PENDIENTE",
        Resource::Plans => "ACTIVO",
    }
}

/// Status a record moves to after a row action.
fn transition(resource: Resource, current: &str, action: RecordAction) -> Result<&'static str> {
    let next = match (resource, action) {
        (Resource::Events, RecordAction::ToggleStatus) => match current {
            "PUBLICADO" => "PAUSADO",
            _ => "PUBLICADO",
        },
        (Resource::Users, RecordAction::ToggleStatus) => match current {
            "ACTIVO" => "BLOQUEADO",
            _ => "ACTIVO",
        },
        (Resource::Plans, RecordAction::ToggleStatus) => match current {
            "ACTIVO" => "INACTIVO",
            _ => "ACTIVO",
        },
        (Resource::Users, RecordAction::Approve) => "ACTIVO",
        (Resource::Users, RecordAction::Reject) => "BLOQUEADO",
        (Resource::Complaints, RecordAction::Approve) => "RESUELTA",
        (Resource::Complaints, RecordAction::Reject) => "RECHAZADA",
        (resource, action) => bail!(
            "{} does not support {}",
            resource.as_str(),
            action.as_str()
        ),
    };
    Ok(next)
}
