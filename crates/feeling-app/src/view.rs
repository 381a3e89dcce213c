// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ColumnSpec, ColumnVisibility, PaginationMeta, Record, SortDescriptor, SortDirection,
    TableState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// The backend pages, filters, and reports totals.
    Server,
    /// The client holds the whole dataset and pages it itself.
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub tab: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Record>,
    pub page: usize,
    pub rows_per_page: usize,
    pub total_pages: usize,
    pub total_elements: usize,
    pub loading: bool,
    pub filter_value: String,
    pub selected_count: usize,
}

pub fn visible_columns(declared: &[ColumnSpec], visibility: &ColumnVisibility) -> Vec<ColumnSpec> {
    declared
        .iter()
        .filter(|column| visibility.shows(column.uid))
        .copied()
        .collect()
}

/// Stable sort on one field. Records with equal keys keep their incoming
/// order.
pub fn sort_records(rows: &mut [Record], sort: &SortDescriptor) {
    rows.sort_by(|left, right| {
        let order = left.field(sort.column).cmp_value(right.field(sort.column));
        match sort.direction {
            SortDirection::Ascending => order,
            SortDirection::Descending => order.reverse(),
        }
    });
}

pub fn matches_search(record: &Record, fields: &[&str], needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| record.text(field).to_lowercase().contains(&needle))
}

pub fn total_pages(count: usize, rows_per_page: usize) -> usize {
    count.div_ceil(rows_per_page.max(1))
}

/// Builds the rows a tab renders. Sorting always applies to every record
/// held; local pages are additionally filtered and sliced here.
pub fn derive_view(
    tab: &'static str,
    items: &[Record],
    pagination: PaginationMeta,
    state: &TableState,
    declared: &[ColumnSpec],
    mode: PaginationMode,
    search_fields: &[&str],
) -> ViewModel {
    let columns = visible_columns(declared, &state.visible_columns);

    let mut rows: Vec<Record> = match mode {
        PaginationMode::Server => items.to_vec(),
        PaginationMode::Local => items
            .iter()
            .filter(|record| matches_search(record, search_fields, &state.debounced_filter))
            .cloned()
            .collect(),
    };
    sort_records(&mut rows, &state.sort);

    let (rows, total_pages, total_elements) = match mode {
        PaginationMode::Server => (rows, pagination.total_pages, pagination.total_elements),
        PaginationMode::Local => {
            let total_elements = rows.len();
            let total_pages = total_pages(total_elements, state.rows_per_page);
            let start = (state.page.max(1) - 1).saturating_mul(state.rows_per_page);
            let page_rows = rows
                .into_iter()
                .skip(start)
                .take(state.rows_per_page)
                .collect();
            (page_rows, total_pages, total_elements)
        }
    };

    ViewModel {
        tab,
        columns,
        rows,
        page: state.page,
        rows_per_page: state.rows_per_page,
        total_pages,
        total_elements,
        loading: state.is_loading(),
        filter_value: state.filter_value.clone(),
        selected_count: state.selected_keys.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{PaginationMode, derive_view, sort_records, total_pages, visible_columns};
    use crate::{
        ColumnSpec, ColumnVisibility, FieldValue, PaginationMeta, Record, SortDescriptor,
        TableDefaults, TableState,
    };
    use std::cmp::Ordering;

    const COLUMNS: [ColumnSpec; 4] = [
        ColumnSpec::sortable("name", "Nombre"),
        ColumnSpec::sortable("price", "Precio"),
        ColumnSpec::sortable("status", "Estado"),
        ColumnSpec::fixed("actions", "Acciones"),
    ];

    fn plans() -> Vec<Record> {
        vec![
            Record::new("1").with("name", "Cata de vinos").with("price", 30),
            Record::new("2").with("name", "Beach volley").with("price", 10),
            Record::new("3").with("name", "Cena a ciegas").with("price", 45),
            Record::new("4").with("name", "Beach yoga"),
            Record::new("5").with("name", "Karaoke").with("price", 10),
        ]
    }

    /// Rows whose `price` mixes integers, floats, numeric-looking text,
    /// blanks, and words, in an order fixed by `seed`.
    fn mixed_rows(seed: u64, count: usize) -> Vec<Record> {
        let mut state = seed | 1;
        (0..count)
            .map(|index| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let price = match state % 8 {
                    0 => FieldValue::Integer(9),
                    1 => FieldValue::Integer(10),
                    2 => FieldValue::text("5"),
                    3 => FieldValue::Integer((state % 1_000) as i64),
                    4 => FieldValue::Float((state % 97) as f64 / 7.0),
                    5 => FieldValue::Null,
                    6 => FieldValue::text("gratis"),
                    _ => FieldValue::Float(f64::INFINITY),
                };
                Record::new(index.to_string().as_str()).with("price", price)
            })
            .collect()
    }

    fn assert_sorted(rows: &[Record], expected: Ordering) {
        for pair in rows.windows(2) {
            let order = pair[0].field("price").cmp_value(pair[1].field("price"));
            assert_ne!(order, expected.reverse(), "{:?} before {:?}", pair[0], pair[1]);
        }
    }

    fn state(sort: SortDescriptor) -> TableState {
        TableState::from_defaults(&TableDefaults::sorted_by(sort))
    }

    #[test]
    fn column_subset_then_all_restores_declared_order() {
        let subset = ColumnVisibility::only(["status", "name"]);
        let shown: Vec<&str> = visible_columns(&COLUMNS, &subset)
            .iter()
            .map(|column| column.uid)
            .collect();
        assert_eq!(shown, vec!["name", "status"]);

        let all = visible_columns(&COLUMNS, &ColumnVisibility::All);
        assert_eq!(all, COLUMNS.to_vec());
    }

    #[test]
    fn missing_values_sort_first_ascending() {
        let mut rows = plans();
        sort_records(&mut rows, &SortDescriptor::ascending("price"));
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"4"));
        assert_eq!(ids.last(), Some(&"3"));
    }

    #[test]
    fn descending_reverses_and_equal_keys_do_not_fail() {
        let mut rows = plans();
        sort_records(&mut rows, &SortDescriptor::descending("price"));
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids[0], "3");
        assert_eq!(ids.len(), 5);
        assert!(ids[2..4].contains(&"2") && ids[2..4].contains(&"5"));
    }

    #[test]
    fn mixed_kinds_in_one_column_sort_ascending() {
        for (seed, count) in [(3, 50), (11, 200), (42, 350)] {
            let mut rows = mixed_rows(seed, count);
            sort_records(&mut rows, &SortDescriptor::ascending("price"));
            assert_eq!(rows.len(), count);
            assert_sorted(&rows, Ordering::Less);
            assert!(rows[0].field("price").is_null());
        }
    }

    #[test]
    fn mixed_kinds_in_one_column_sort_descending() {
        for (seed, count) in [(5, 64), (17, 300)] {
            let mut rows = mixed_rows(seed, count);
            sort_records(&mut rows, &SortDescriptor::descending("price"));
            assert_sorted(&rows, Ordering::Greater);
            assert_eq!(rows[0].text("price"), "gratis");
        }
    }

    #[test]
    fn local_mode_filters_sorts_then_paginates() {
        let mut table = state(SortDescriptor::ascending("name"));
        table.rows_per_page = 1;
        table.page = 2;
        table.debounced_filter = "BEACH".to_owned();

        let view = derive_view(
            "all",
            &plans(),
            PaginationMeta::default(),
            &table,
            &COLUMNS,
            PaginationMode::Local,
            &["name"],
        );
        assert_eq!(view.total_elements, 2);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].text("name"), "Beach yoga");
    }

    #[test]
    fn server_mode_sorts_current_page_and_keeps_backend_totals() {
        let table = state(SortDescriptor::descending("name"));
        let meta = PaginationMeta {
            total_pages: 7,
            total_elements: 64,
        };
        let view = derive_view(
            "PUBLICADO",
            &plans(),
            meta,
            &table,
            &COLUMNS,
            PaginationMode::Server,
            &["name"],
        );
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.rows[0].text("name"), "Karaoke");
        assert_eq!(view.total_pages, 7);
        assert_eq!(view.total_elements, 64);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
