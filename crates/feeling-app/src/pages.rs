// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ColumnSpec, ComplaintTab, EventTab, FormKind, PageConfig, PaginationMode, PlanTab,
    RecordAction, Resource, SortDescriptor, TableDefaults, UserTab,
};

const EVENT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("title", "Título"),
    ColumnSpec::sortable("location", "Ubicación"),
    ColumnSpec::sortable("start_date", "Fecha"),
    ColumnSpec::sortable("capacity", "Capacidad"),
    ColumnSpec::sortable("price", "Precio"),
    ColumnSpec::sortable("status", "Estado"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const EVENT_STATUS_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("title", "Título"),
    ColumnSpec::sortable("location", "Ubicación"),
    ColumnSpec::sortable("start_date", "Fecha"),
    ColumnSpec::sortable("capacity", "Capacidad"),
    ColumnSpec::sortable("price", "Precio"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const USER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("name", "Nombre"),
    ColumnSpec::sortable("email", "Email"),
    ColumnSpec::sortable("age", "Edad"),
    ColumnSpec::sortable("city", "Ciudad"),
    ColumnSpec::sortable("created_at", "Registro"),
    ColumnSpec::sortable("status", "Estado"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const USER_STATUS_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("name", "Nombre"),
    ColumnSpec::sortable("email", "Email"),
    ColumnSpec::sortable("age", "Edad"),
    ColumnSpec::sortable("city", "Ciudad"),
    ColumnSpec::sortable("created_at", "Registro"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const COMPLAINT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("subject", "Asunto"),
    ColumnSpec::sortable("reporter", "Denunciante"),
    ColumnSpec::sortable("reported", "Denunciado"),
    ColumnSpec::sortable("created_at", "Fecha"),
    ColumnSpec::sortable("status", "Estado"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const COMPLAINT_STATUS_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("subject", "Asunto"),
    ColumnSpec::sortable("reporter", "Denunciante"),
    ColumnSpec::sortable("reported", "Denunciado"),
    ColumnSpec::sortable("created_at", "Fecha"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const PLAN_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("name", "Nombre"),
    ColumnSpec::sortable("category", "Categoría"),
    ColumnSpec::sortable("price", "Precio"),
    ColumnSpec::sortable("duration_minutes", "Duración"),
    ColumnSpec::sortable("max_participants", "Participantes"),
    ColumnSpec::sortable("status", "Estado"),
    ColumnSpec::fixed("actions", "Acciones"),
];

const PLAN_STATUS_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::sortable("name", "Nombre"),
    ColumnSpec::sortable("category", "Categoría"),
    ColumnSpec::sortable("price", "Precio"),
    ColumnSpec::sortable("duration_minutes", "Duración"),
    ColumnSpec::sortable("max_participants", "Participantes"),
    ColumnSpec::fixed("actions", "Acciones"),
];

pub fn events() -> PageConfig<EventTab> {
    PageConfig {
        resource: Resource::Events,
        title: "Eventos",
        mode: PaginationMode::Server,
        columns: |tab| match tab {
            EventTab::All => EVENT_COLUMNS,
            _ => EVENT_STATUS_COLUMNS,
        },
        defaults: |tab| match tab {
            EventTab::Terminado | EventTab::Cancelado => {
                TableDefaults::sorted_by(SortDescriptor::descending("start_date"))
            }
            EventTab::EnEdicion => TableDefaults::sorted_by(SortDescriptor::ascending("title")),
            _ => TableDefaults::sorted_by(SortDescriptor::ascending("start_date")),
        },
        search_fields: &["title", "location"],
        actions: &[RecordAction::ToggleStatus],
        form: FormKind::Event,
    }
}

pub fn users() -> PageConfig<UserTab> {
    PageConfig {
        resource: Resource::Users,
        title: "Usuarios",
        mode: PaginationMode::Server,
        columns: |tab| match tab {
            UserTab::All => USER_COLUMNS,
            _ => USER_STATUS_COLUMNS,
        },
        // Oldest pending sign-ups first.
        defaults: |tab| match tab {
            UserTab::Pendiente => {
                TableDefaults::sorted_by(SortDescriptor::ascending("created_at"))
            }
            _ => TableDefaults::sorted_by(SortDescriptor::ascending("name")),
        },
        search_fields: &["name", "email", "city"],
        actions: &[
            RecordAction::ToggleStatus,
            RecordAction::Approve,
            RecordAction::Reject,
        ],
        form: FormKind::User,
    }
}

pub fn complaints() -> PageConfig<ComplaintTab> {
    PageConfig {
        resource: Resource::Complaints,
        title: "Denuncias",
        mode: PaginationMode::Server,
        columns: |tab| match tab {
            ComplaintTab::All => COMPLAINT_COLUMNS,
            _ => COMPLAINT_STATUS_COLUMNS,
        },
        defaults: |tab| match tab {
            ComplaintTab::Pendiente | ComplaintTab::EnRevision => {
                TableDefaults::sorted_by(SortDescriptor::ascending("created_at"))
            }
            _ => TableDefaults::sorted_by(SortDescriptor::descending("created_at")),
        },
        search_fields: &["subject", "reporter", "reported"],
        // Approving a complaint resolves it.
        actions: &[RecordAction::Approve, RecordAction::Reject],
        form: FormKind::Complaint,
    }
}

pub fn plans() -> PageConfig<PlanTab> {
    PageConfig {
        resource: Resource::Plans,
        title: "Planes",
        mode: PaginationMode::Local,
        columns: |tab| match tab {
            PlanTab::All => PLAN_COLUMNS,
            _ => PLAN_STATUS_COLUMNS,
        },
        defaults: |tab| match tab {
            PlanTab::Inactivo => TableDefaults::sorted_by(SortDescriptor::descending("price")),
            _ => TableDefaults::sorted_by(SortDescriptor::ascending("name")),
        },
        search_fields: &["name", "category"],
        actions: &[RecordAction::ToggleStatus],
        form: FormKind::Plan,
    }
}

#[cfg(test)]
mod tests {
    use super::{complaints, events, plans, users};
    use crate::{ColumnSpec, PageConfig, RecordAction, TabKey};

    fn assert_status_column_only_on_global_tab<T: TabKey>(config: &PageConfig<T>) {
        for tab in T::ALL {
            let columns: &[ColumnSpec] = (config.columns)(*tab);
            let has_status = columns.iter().any(|column| column.uid == "status");
            assert_eq!(has_status, tab.status().is_none(), "{tab:?}");
        }
    }

    #[test]
    fn status_tabs_omit_status_column() {
        assert_status_column_only_on_global_tab(&events());
        assert_status_column_only_on_global_tab(&users());
        assert_status_column_only_on_global_tab(&complaints());
        assert_status_column_only_on_global_tab(&plans());
    }

    #[test]
    fn sort_defaults_reference_declared_columns() {
        fn check<T: TabKey>(config: &PageConfig<T>) {
            for tab in T::ALL {
                let sort = (config.defaults)(*tab).sort;
                assert!(
                    (config.columns)(*tab)
                        .iter()
                        .any(|column| column.uid == sort.column && column.sortable),
                    "{tab:?} sorts on {}",
                    sort.column
                );
            }
        }
        check(&events());
        check(&users());
        check(&complaints());
        check(&plans());
    }

    #[test]
    fn row_actions_per_page() {
        assert!(events().allows(RecordAction::ToggleStatus));
        assert!(!events().allows(RecordAction::Approve));
        assert!(users().allows(RecordAction::Reject));
        assert!(!complaints().allows(RecordAction::ToggleStatus));
        assert!(plans().allows(RecordAction::ToggleStatus));
    }
}
