// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt::Debug;
use std::hash::Hash;

pub const ALL_TAB_LABEL: &str = "all";

/// A closed set of tabs on one management page. Every declared tab owns a
/// table state for the lifetime of the page.
pub trait TabKey: Copy + Eq + Ord + Hash + Debug + Send + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Backend status bound to this tab; `None` for the global tab.
    fn status(self) -> Option<&'static str> {
        match self.label() {
            ALL_TAB_LABEL => None,
            label => Some(label),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tab| tab.label() == value)
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|tab| *tab == self)
            .unwrap_or(0)
    }
}

macro_rules! tab_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl TabKey for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }
    };
}

tab_enum!(EventTab {
    All => "all",
    Publicado => "PUBLICADO",
    EnEdicion => "EN_EDICION",
    Pausado => "PAUSADO",
    Cancelado => "CANCELADO",
    Terminado => "TERMINADO",
});

tab_enum!(UserTab {
    All => "all",
    Pendiente => "PENDIENTE",
    Activo => "ACTIVO",
    Bloqueado => "BLOQUEADO",
});

tab_enum!(ComplaintTab {
    All => "all",
    Pendiente => "PENDIENTE",
    EnRevision => "EN_REVISION",
    Resuelta => "RESUELTA",
    Rechazada => "RECHAZADA",
});

tab_enum!(PlanTab {
    All => "all",
    Activo => "ACTIVO",
    Inactivo => "INACTIVO",
});

#[cfg(test)]
mod tests {
    use super::{ComplaintTab, EventTab, PlanTab, TabKey, UserTab};

    #[test]
    fn global_tab_has_no_status() {
        assert_eq!(EventTab::All.status(), None);
        assert_eq!(EventTab::Pausado.status(), Some("PAUSADO"));
        assert_eq!(UserTab::Pendiente.status(), Some("PENDIENTE"));
    }

    #[test]
    fn parse_accepts_declared_labels_only() {
        assert_eq!(EventTab::parse("EN_EDICION"), Some(EventTab::EnEdicion));
        assert_eq!(ComplaintTab::parse("RESUELTA"), Some(ComplaintTab::Resuelta));
        assert_eq!(PlanTab::parse("archived"), None);
        assert_eq!(UserTab::parse("activo"), None);
    }

    #[test]
    fn positions_follow_declaration_order() {
        let positions: Vec<usize> = EventTab::ALL.iter().map(|tab| tab.position()).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
    }
}
