// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::{ColumnId, ColumnVisibility, RecordId, SortDescriptor, TabKey};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
}

/// The tuple whose changes drive a fetch for a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub page: usize,
    pub rows_per_page: usize,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefaults {
    pub sort: SortDescriptor,
    pub rows_per_page: usize,
    pub visible_columns: ColumnVisibility,
}

impl TableDefaults {
    pub const fn sorted_by(sort: SortDescriptor) -> Self {
        Self {
            sort,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            visible_columns: ColumnVisibility::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub filter_value: String,
    pub debounced_filter: String,
    pub selected_keys: BTreeSet<RecordId>,
    pub visible_columns: ColumnVisibility,
    pub rows_per_page: usize,
    pub sort: SortDescriptor,
    pub page: usize,
    phase: FetchPhase,
}

impl TableState {
    pub fn from_defaults(defaults: &TableDefaults) -> Self {
        Self {
            filter_value: String::new(),
            debounced_filter: String::new(),
            selected_keys: BTreeSet::new(),
            visible_columns: defaults.visible_columns.clone(),
            rows_per_page: defaults.rows_per_page.max(1),
            sort: defaults.sort,
            page: 1,
            phase: FetchPhase::Idle,
        }
    }

    pub const fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            page: self.page,
            rows_per_page: self.rows_per_page,
            search: self.debounced_filter.clone(),
        }
    }
}

/// Shallow update for one tab. Unset fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePatch {
    pub filter_value: Option<String>,
    pub debounced_filter: Option<String>,
    pub selected_keys: Option<BTreeSet<RecordId>>,
    pub visible_columns: Option<ColumnVisibility>,
    pub rows_per_page: Option<usize>,
    pub sort: Option<SortDescriptor>,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    SetFilter(String),
    ClearFilter,
    SetPage(usize),
    SetRowsPerPage(usize),
    SetSort(SortDescriptor),
    ToggleSort(ColumnId),
    SetVisibleColumns(ColumnVisibility),
    SetSelection(BTreeSet<RecordId>),
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    FilterChanged(String),
    PageChanged(usize),
    RowsPerPageChanged(usize),
    SortChanged(SortDescriptor),
    ColumnsChanged,
    SelectionChanged(usize),
    Rejected(&'static str),
}

/// One independent table state per declared tab, created eagerly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStore<T: TabKey> {
    states: Vec<TableState>,
    tabs: PhantomData<T>,
}

impl<T: TabKey> TableStore<T> {
    pub fn new(defaults: impl Fn(T) -> TableDefaults) -> Self {
        Self {
            states: T::ALL
                .iter()
                .map(|tab| TableState::from_defaults(&defaults(*tab)))
                .collect(),
            tabs: PhantomData,
        }
    }

    pub fn get(&self, tab: T) -> &TableState {
        &self.states[tab.position()]
    }

    pub fn get_by_label(&self, label: &str) -> Option<&TableState> {
        T::parse(label).map(|tab| self.get(tab))
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, &TableState)> {
        T::ALL.iter().copied().zip(self.states.iter())
    }

    fn state_mut(&mut self, tab: T) -> &mut TableState {
        &mut self.states[tab.position()]
    }

    pub fn merge(&mut self, tab: T, patch: TablePatch) {
        let state = self.state_mut(tab);
        if let Some(filter_value) = patch.filter_value {
            state.filter_value = filter_value;
        }
        if let Some(debounced_filter) = patch.debounced_filter {
            state.debounced_filter = debounced_filter;
        }
        if let Some(selected_keys) = patch.selected_keys {
            state.selected_keys = selected_keys;
        }
        if let Some(visible_columns) = patch.visible_columns {
            state.visible_columns = visible_columns;
        }
        if let Some(rows_per_page) = patch.rows_per_page {
            state.rows_per_page = rows_per_page.max(1);
        }
        if let Some(sort) = patch.sort {
            state.sort = sort;
        }
        if let Some(page) = patch.page {
            state.page = page.max(1);
        }
    }

    pub fn dispatch(&mut self, tab: T, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::SetFilter(value) => {
                self.merge(
                    tab,
                    TablePatch {
                        filter_value: Some(value.clone()),
                        page: Some(1),
                        ..TablePatch::default()
                    },
                );
                vec![TableEvent::FilterChanged(value)]
            }
            TableCommand::ClearFilter => {
                self.merge(
                    tab,
                    TablePatch {
                        filter_value: Some(String::new()),
                        page: Some(1),
                        ..TablePatch::default()
                    },
                );
                vec![TableEvent::FilterChanged(String::new())]
            }
            TableCommand::SetPage(page) => {
                let page = page.max(1);
                self.merge(
                    tab,
                    TablePatch {
                        page: Some(page),
                        ..TablePatch::default()
                    },
                );
                vec![TableEvent::PageChanged(page)]
            }
            TableCommand::SetRowsPerPage(0) => {
                vec![TableEvent::Rejected("rows per page must be positive")]
            }
            TableCommand::SetRowsPerPage(rows) => {
                self.merge(
                    tab,
                    TablePatch {
                        rows_per_page: Some(rows),
                        page: Some(1),
                        ..TablePatch::default()
                    },
                );
                vec![
                    TableEvent::RowsPerPageChanged(rows),
                    TableEvent::PageChanged(1),
                ]
            }
            TableCommand::SetSort(sort) => {
                self.merge(
                    tab,
                    TablePatch {
                        sort: Some(sort),
                        ..TablePatch::default()
                    },
                );
                vec![TableEvent::SortChanged(sort)]
            }
            TableCommand::ToggleSort(column) => {
                let current = self.get(tab).sort;
                let sort = if current.column == column {
                    SortDescriptor {
                        column,
                        direction: current.direction.flip(),
                    }
                } else {
                    SortDescriptor::ascending(column)
                };
                self.dispatch(tab, TableCommand::SetSort(sort))
            }
            TableCommand::SetVisibleColumns(visibility) => {
                if matches!(&visibility, ColumnVisibility::Only(columns) if columns.is_empty()) {
                    return vec![TableEvent::Rejected("keep one column visible")];
                }
                self.merge(
                    tab,
                    TablePatch {
                        visible_columns: Some(visibility),
                        ..TablePatch::default()
                    },
                );
                vec![TableEvent::ColumnsChanged]
            }
            TableCommand::SetSelection(keys) => {
                let count = keys.len();
                self.merge(
                    tab,
                    TablePatch {
                        selected_keys: Some(keys),
                        ..TablePatch::default()
                    },
                );
                vec![TableEvent::SelectionChanged(count)]
            }
            TableCommand::ClearSelection => {
                self.dispatch(tab, TableCommand::SetSelection(BTreeSet::new()))
            }
        }
    }

    /// Moves the tab to `Loading`. Returns false, leaving the state as is,
    /// when a fetch for the tab is already in flight.
    pub fn begin_fetch(&mut self, tab: T) -> bool {
        let state = self.state_mut(tab);
        if state.phase == FetchPhase::Loading {
            return false;
        }
        state.phase = FetchPhase::Loading;
        true
    }

    pub fn settle_fetch(&mut self, tab: T) {
        self.state_mut(tab).phase = FetchPhase::Idle;
    }
}
