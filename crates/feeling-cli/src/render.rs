// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use feeling_app::{Notice, NoticeLevel, Stats, ViewModel};

const ACTIONS_COLUMN: &str = "actions";

/// Plain-text table for one tab. Row actions have no cell of their own; the
/// id column stands in so records can be addressed by later commands.
pub fn format_view(view: &ViewModel) -> String {
    let columns: Vec<_> = view
        .columns
        .iter()
        .filter(|column| column.uid != ACTIONS_COLUMN)
        .collect();

    let mut out = String::new();
    if view.rows.is_empty() {
        out.push_str("(no rows)\n");
    } else {
        let header: Vec<&str> = std::iter::once("ID")
            .chain(columns.iter().map(|column| column.name))
            .collect();
        out.push_str(&header.join(" | "));
        out.push('\n');
        for record in &view.rows {
            let cells: Vec<String> = std::iter::once(record.id.to_string())
                .chain(columns.iter().map(|column| record.text(column.uid)))
                .collect();
            out.push_str(&cells.join(" | "));
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "[{}] page {}/{} · {} total · {} per page",
        view.tab,
        view.page,
        view.total_pages.max(1),
        view.total_elements,
        view.rows_per_page
    ));
    if !view.filter_value.is_empty() {
        out.push_str(&format!(" · search {:?}", view.filter_value));
    }
    out.push('\n');
    out
}

pub fn format_stats(stats: &Stats) -> String {
    let mut out = format!("total: {}\n", stats.get("total"));
    for (name, count) in &stats.counts {
        if name != "total" {
            out.push_str(&format!("{name}: {count}\n"));
        }
    }
    out
}

pub fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("{tag}: {}", notice.message)
}

#[cfg(test)]
mod tests {
    use super::{format_notice, format_stats, format_view};
    use feeling_app::{ColumnSpec, Notice, NoticeLevel, Record, Stats, ViewModel};
    use std::collections::BTreeMap;

    fn view(rows: Vec<Record>) -> ViewModel {
        ViewModel {
            tab: "ACTIVO",
            columns: vec![
                ColumnSpec::sortable("name", "Nombre"),
                ColumnSpec::sortable("price", "Precio"),
                ColumnSpec::fixed("actions", "Acciones"),
            ],
            rows,
            page: 1,
            rows_per_page: 10,
            total_pages: 1,
            total_elements: 2,
            loading: false,
            filter_value: String::new(),
            selected_count: 0,
        }
    }

    #[test]
    fn rows_render_without_the_actions_column() {
        let rendered = format_view(&view(vec![
            Record::new("1").with("name", "Karaoke").with("price", 9.5),
            Record::new("2").with("name", "Picnic"),
        ]));
        assert_eq!(
            rendered,
            "ID | Nombre | Precio\n1 | Karaoke | 9.5\n2 | Picnic | \n[ACTIVO] page 1/1 · 2 total · 10 per page\n"
        );
    }

    #[test]
    fn empty_view_still_reports_paging() {
        let mut empty = view(Vec::new());
        empty.total_pages = 0;
        empty.total_elements = 0;
        empty.filter_value = "zzz".to_owned();
        let rendered = format_view(&empty);
        assert!(rendered.starts_with("(no rows)\n"));
        assert!(rendered.contains("page 1/1"));
        assert!(rendered.contains("search \"zzz\""));
    }

    #[test]
    fn stats_list_total_first() {
        let stats = Stats {
            counts: BTreeMap::from([
                ("ACTIVO".to_owned(), 3),
                ("INACTIVO".to_owned(), 1),
                ("total".to_owned(), 4),
            ]),
        };
        assert_eq!(format_stats(&stats), "total: 4\nACTIVO: 3\nINACTIVO: 1\n");
    }

    #[test]
    fn notices_carry_their_level() {
        let notice = Notice {
            level: NoticeLevel::Error,
            message: "No se pudo eliminar".to_owned(),
        };
        assert_eq!(format_notice(&notice), "error: No se pudo eliminar");
    }
}
