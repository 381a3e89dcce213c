// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::mem;
use std::time::{Duration, Instant};

use crate::crud::{CrudState, Settled, SubmitOutcome, failure_message, success_message};
use crate::{
    Collections, ColumnSpec, DEFAULT_DEBOUNCE, Debouncer, FetchParams, FormDraft, FormKind,
    PaginationMode, Page, PageRequest, Record, RecordAction, RecordRequest, Resource, Stats,
    TabKey, TableCommand, TableDefaults, TableEvent, TablePatch, TableState, TableStore,
    ViewModel, derive_view, resolve,
};

/// Static description of one management page.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig<T: TabKey> {
    pub resource: Resource,
    pub title: &'static str,
    pub mode: PaginationMode,
    pub columns: fn(T) -> &'static [ColumnSpec],
    pub defaults: fn(T) -> TableDefaults,
    pub search_fields: &'static [&'static str],
    pub actions: &'static [RecordAction],
    pub form: FormKind,
}

impl<T: TabKey> PageConfig<T> {
    pub fn allows(&self, action: RecordAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Knobs the caller may override per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub rows_per_page: Option<usize>,
    pub debounce: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            rows_per_page: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageCommand<T> {
    SelectTab(T),
    Table(T, TableCommand),
    OpenCreate(Option<FormDraft>),
    OpenEdit(Record),
    OpenDelete(Record),
    EditField { field: String, value: String },
    Submit,
    CloseModal,
    RunAction(Record, RecordAction),
    Refresh,
}

/// Work the caller must perform and report back through [`Completion`].
#[derive(Debug, Clone, PartialEq)]
pub enum PageEffect<T> {
    Fetch { tab: T, request: PageRequest },
    FetchStats(Resource),
    Execute(RecordRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    Fetched {
        tab: T,
        result: Result<Page, String>,
    },
    Stats(Result<Stats, String>),
    Executed {
        request: RecordRequest,
        result: Result<(), String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// What the active tab was last synced against. Local pages only track the
/// tab itself.
type SyncKey<T> = (T, Option<FetchParams>);

pub struct ManagementPage<T: TabKey> {
    config: PageConfig<T>,
    active: T,
    tables: TableStore<T>,
    debouncer: Debouncer<T>,
    collections: Collections<T>,
    synced: Option<SyncKey<T>>,
    crud: CrudState,
    stats: Option<Stats>,
    notices: Vec<Notice>,
}

impl<T: TabKey> ManagementPage<T> {
    pub fn new(config: PageConfig<T>, options: PageOptions) -> Self {
        let tables = TableStore::new(|tab| {
            let mut defaults = (config.defaults)(tab);
            if let Some(rows) = options.rows_per_page.filter(|rows| *rows > 0) {
                defaults.rows_per_page = rows;
            }
            defaults
        });
        Self {
            active: T::ALL[0],
            tables,
            debouncer: Debouncer::new(options.debounce),
            collections: Collections::new(
                config.resource,
                config.mode == PaginationMode::Server,
            ),
            synced: None,
            crud: CrudState::new(config.resource, config.form),
            stats: None,
            notices: Vec::new(),
            config,
        }
    }

    pub const fn config(&self) -> &PageConfig<T> {
        &self.config
    }

    pub const fn active_tab(&self) -> T {
        self.active
    }

    pub fn table(&self, tab: T) -> &TableState {
        self.tables.get(tab)
    }

    pub fn items(&self, tab: T) -> &[Record] {
        &self.collections.get(tab).items
    }

    pub const fn crud(&self) -> &CrudState {
        &self.crud
    }

    pub const fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        mem::take(&mut self.notices)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// True once nothing is loading, nothing is debouncing, and no record
    /// operation awaits its result.
    pub fn is_settled(&self) -> bool {
        !self.tables.iter().any(|(_, state)| state.is_loading())
            && !self.debouncer.has_pending()
            && self.crud.in_flight().is_none()
    }

    /// Initial load: the first tab plus page statistics.
    pub fn mount(&mut self) -> Vec<PageEffect<T>> {
        let mut effects = self.sync();
        effects.push(PageEffect::FetchStats(self.config.resource));
        effects
    }

    pub fn dispatch(&mut self, now: Instant, command: PageCommand<T>) -> Vec<PageEffect<T>> {
        match command {
            PageCommand::SelectTab(tab) => {
                if tab == self.active {
                    return Vec::new();
                }
                self.active = tab;
                self.sync()
            }
            PageCommand::Table(tab, command) => {
                for event in self.tables.dispatch(tab, command) {
                    match event {
                        TableEvent::FilterChanged(value) => {
                            self.debouncer.schedule(tab, value, now);
                        }
                        TableEvent::Rejected(reason) => {
                            log::warn!("tab={} op=table: {reason}", tab.label());
                            self.notify(NoticeLevel::Warning, reason);
                        }
                        _ => {}
                    }
                }
                if tab == self.active {
                    self.sync()
                } else {
                    Vec::new()
                }
            }
            PageCommand::OpenCreate(seed) => {
                self.crud.open_create(seed);
                Vec::new()
            }
            PageCommand::OpenEdit(record) => {
                let opened = self.crud.open_edit(record);
                self.check_precondition(opened, "edit");
                Vec::new()
            }
            PageCommand::OpenDelete(record) => {
                let opened = self.crud.open_delete(record);
                self.check_precondition(opened, "delete");
                Vec::new()
            }
            PageCommand::EditField { field, value } => {
                self.crud.edit_field(&field, value);
                Vec::new()
            }
            PageCommand::Submit => match self.crud.submit() {
                SubmitOutcome::Request(request) => vec![PageEffect::Execute(request)],
                SubmitOutcome::Invalid => {
                    log::debug!(
                        "resource={} op=submit: {} invalid field(s)",
                        self.config.resource.as_str(),
                        self.crud.errors().len()
                    );
                    Vec::new()
                }
                SubmitOutcome::Ignored => Vec::new(),
            },
            PageCommand::CloseModal => {
                self.crud.close();
                Vec::new()
            }
            PageCommand::RunAction(record, action) => self.run_action(&record, action),
            PageCommand::Refresh => self.refresh_all(),
        }
    }

    /// Applies every debounce whose window has elapsed.
    pub fn advance(&mut self, now: Instant) -> Vec<PageEffect<T>> {
        let due = self.debouncer.take_due(now);
        if due.is_empty() {
            return Vec::new();
        }
        for (tab, value) in due {
            self.tables.merge(
                tab,
                TablePatch {
                    debounced_filter: Some(value),
                    ..TablePatch::default()
                },
            );
        }
        self.sync()
    }

    pub fn complete(&mut self, completion: Completion<T>) -> Vec<PageEffect<T>> {
        match completion {
            Completion::Fetched { tab, result } => {
                self.tables.settle_fetch(tab);
                match result {
                    Ok(page) => self.collections.store(tab, page),
                    Err(error) => log::warn!(
                        "tab={} op=fetch resource={}: {error}",
                        tab.label(),
                        self.config.resource.as_str()
                    ),
                }
                Vec::new()
            }
            Completion::Stats(result) => {
                match result {
                    Ok(stats) => self.stats = Some(stats),
                    Err(error) => log::warn!(
                        "op=stats resource={}: {error}",
                        self.config.resource.as_str()
                    ),
                }
                Vec::new()
            }
            Completion::Executed { request, result } => {
                let error = result.err();
                match self.crud.settle(&request, error.is_none()) {
                    Settled::Succeeded(request) => {
                        log::info!(
                            "resource={} op={} succeeded",
                            request.resource().as_str(),
                            request.op()
                        );
                        self.notify(NoticeLevel::Success, success_message(&request));
                        self.refresh_all()
                    }
                    Settled::Failed(request) => {
                        log::warn!(
                            "resource={} op={}: {}",
                            request.resource().as_str(),
                            request.op(),
                            error.as_deref().unwrap_or("unknown error")
                        );
                        self.notify(NoticeLevel::Error, failure_message(&request));
                        Vec::new()
                    }
                    Settled::Unexpected => {
                        log::warn!(
                            "resource={} op={}: completion without a pending request",
                            request.resource().as_str(),
                            request.op()
                        );
                        Vec::new()
                    }
                }
            }
        }
    }

    pub fn view(&self) -> ViewModel {
        self.view_of(self.active)
    }

    pub fn view_of(&self, tab: T) -> ViewModel {
        let resolved = resolve(&self.collections, tab);
        derive_view(
            tab.label(),
            resolved.items,
            resolved.pagination,
            self.tables.get(tab),
            (self.config.columns)(tab),
            self.config.mode,
            self.config.search_fields,
        )
    }

    fn sync_key(&self, tab: T) -> SyncKey<T> {
        match self.config.mode {
            PaginationMode::Server => (tab, Some(self.tables.get(tab).fetch_params())),
            PaginationMode::Local => (tab, None),
        }
    }

    /// Fetches the active tab when it or its parameters moved since the last
    /// trigger. The key is recorded even when the trigger is dropped.
    fn sync(&mut self) -> Vec<PageEffect<T>> {
        let key = self.sync_key(self.active);
        if self.synced.as_ref() == Some(&key) {
            return Vec::new();
        }
        self.synced = Some(key);
        self.trigger_fetch(self.active).into_iter().collect()
    }

    fn trigger_fetch(&mut self, tab: T) -> Option<PageEffect<T>> {
        if !self.tables.begin_fetch(tab) {
            log::debug!(
                "tab={} op=fetch: already loading, trigger dropped",
                tab.label()
            );
            return None;
        }
        let state = self.tables.get(tab);
        let request = self.collections.binding(tab).request(
            state.page,
            state.rows_per_page,
            &state.debounced_filter,
        );
        log::debug!(
            "tab={} op=fetch page={} size={:?} search={:?}",
            tab.label(),
            request.page,
            request.size,
            request.search
        );
        Some(PageEffect::Fetch { tab, request })
    }

    /// Reloads every declared tab with its own parameters, then statistics.
    fn refresh_all(&mut self) -> Vec<PageEffect<T>> {
        self.synced = Some(self.sync_key(self.active));
        let mut effects: Vec<PageEffect<T>> = T::ALL
            .iter()
            .filter_map(|tab| self.trigger_fetch(*tab))
            .collect();
        effects.push(PageEffect::FetchStats(self.config.resource));
        effects
    }

    fn run_action(&mut self, record: &Record, action: RecordAction) -> Vec<PageEffect<T>> {
        if !self.config.allows(action) {
            log::warn!(
                "resource={} op={}: action not offered on this page",
                self.config.resource.as_str(),
                action.as_str()
            );
            self.notify(NoticeLevel::Warning, "Acción no disponible en esta página");
            return Vec::new();
        }
        match self.crud.row_action(record, action) {
            Ok(Some(request)) => vec![PageEffect::Execute(request)],
            Ok(None) => Vec::new(),
            Err(error) => {
                self.check_precondition(Err(error), action.as_str());
                Vec::new()
            }
        }
    }

    fn check_precondition(&mut self, outcome: anyhow::Result<()>, op: &str) {
        if let Err(error) = outcome {
            log::error!(
                "resource={} op={op}: {error:#}",
                self.config.resource.as_str()
            );
            self.notify(
                NoticeLevel::Error,
                "El registro no tiene identificador. Recarga la página e inténtalo de nuevo.",
            );
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }
}
