// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Seeded sample data for `--demo` runs and for resources served locally.

use feeling_app::{Record, Resource, format_date};
use std::collections::BTreeMap;
use time::{Date, Duration, Month};

const EVENT_STATUSES: [&str; 5] = ["PUBLICADO", "EN_EDICION", "PAUSADO", "CANCELADO", "TERMINADO"];
const USER_STATUSES: [&str; 3] = ["PENDIENTE", "ACTIVO", "BLOQUEADO"];
const COMPLAINT_STATUSES: [&str; 4] = ["PENDIENTE", "EN_REVISION", "RESUELTA", "RECHAZADA"];
const PLAN_STATUSES: [&str; 2] = ["ACTIVO", "INACTIVO"];

const EVENT_KINDS: [&str; 12] = [
    "Cata de vinos",
    "Speed dating",
    "Noche de karaoke",
    "Ruta en bici",
    "Clase de salsa",
    "Cena a ciegas",
    "Beach volley",
    "Escape room",
    "Taller de cerámica",
    "Concierto acústico",
    "Brunch dominical",
    "Senderismo",
];

const PLAN_CATEGORIES: [&str; 6] = [
    "Gastronomía",
    "Deporte",
    "Cultura",
    "Ocio nocturno",
    "Aire libre",
    "Talleres",
];

const FIRST_NAMES: [&str; 16] = [
    "Lucía", "Hugo", "Martina", "Mateo", "Sofía", "Leo", "Valeria", "Pablo", "Julia", "Daniel",
    "Alba", "Álvaro", "Noa", "Marcos", "Carla", "Iker",
];
const LAST_NAMES: [&str; 14] = [
    "García",
    "Rodríguez",
    "González",
    "Fernández",
    "López",
    "Martínez",
    "Sánchez",
    "Pérez",
    "Gómez",
    "Martín",
    "Jiménez",
    "Ruiz",
    "Hernández",
    "Díaz",
];

const CITIES: [&str; 10] = [
    "Madrid",
    "Barcelona",
    "Valencia",
    "Sevilla",
    "Zaragoza",
    "Málaga",
    "Bilbao",
    "Granada",
    "Alicante",
    "Valladolid",
];

const VENUES: [&str; 8] = [
    "Sala Apolo",
    "Parque del Retiro",
    "Playa de la Malvarrosa",
    "Bodega El Lagar",
    "Terraza Azul",
    "Centro Cívico Norte",
    "Mercado de San Miguel",
    "Club Náutico",
];

const COMPLAINT_SUBJECTS: [&str; 8] = [
    "Perfil falso",
    "Mensajes ofensivos",
    "Spam en el chat",
    "No se presentó al evento",
    "Fotos inapropiadas",
    "Suplantación de identidad",
    "Acoso",
    "Comportamiento agresivo",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible admin records. The same seed always yields
/// the same sequence.
#[derive(Debug, Clone)]
pub struct AdminFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl AdminFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn event(&mut self) -> Record {
        let status = self.pick(&EVENT_STATUSES);
        self.event_with_status(status)
    }

    pub fn event_with_status(&mut self, status: &str) -> Record {
        let start = self.date_within(reference_date(), 180);
        let title = format!("{} en {}", self.pick(&EVENT_KINDS), self.pick(&CITIES));
        Record::new(self.id())
            .with("title", title.as_str())
            .with("description", self.pick(&EVENT_KINDS))
            .with("location", self.pick(&VENUES))
            .with("start_date", format_date(start).as_str())
            .with("end_date", format_date(start + Duration::days(1)).as_str())
            .with("capacity", self.int_range(10, 200))
            .with("price", self.int_range(0, 60) as f64)
            .with("status", status)
    }

    pub fn user(&mut self) -> Record {
        let status = self.pick(&USER_STATUSES);
        self.user_with_status(status)
    }

    pub fn user_with_status(&mut self, status: &str) -> Record {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let id = self.id();
        let email = format!("{}.{id}@feeling.app", ascii_slug(first));
        Record::new(id)
            .with("name", format!("{first} {last}"))
            .with("email", email)
            .with("age", self.int_range(18, 60))
            .with("city", self.pick(&CITIES))
            .with(
                "created_at",
                format_date(self.date_within(reference_date() - Duration::days(365), 365))
                    .as_str(),
            )
            .with("status", status)
    }

    pub fn complaint(&mut self) -> Record {
        let status = self.pick(&COMPLAINT_STATUSES);
        self.complaint_with_status(status)
    }

    pub fn complaint_with_status(&mut self, status: &str) -> Record {
        let reporter = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
        let reported = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
        let subject = self.pick(&COMPLAINT_SUBJECTS);
        let record = Record::new(self.id())
            .with("subject", subject)
            .with(
                "description",
                format!("{subject}. Reportado por {reporter} tras una conversación."),
            )
            .with("reporter", reporter)
            .with("reported", reported)
            .with(
                "created_at",
                format_date(self.date_within(reference_date() - Duration::days(90), 90)).as_str(),
            )
            .with("status", status);
        match status {
            "RESUELTA" | "RECHAZADA" => record.with("resolution_notes", "Revisado por moderación."),
            _ => record,
        }
    }

    pub fn plan(&mut self) -> Record {
        let status = self.pick(&PLAN_STATUSES);
        self.plan_with_status(status)
    }

    pub fn plan_with_status(&mut self, status: &str) -> Record {
        let category = self.pick(&PLAN_CATEGORIES);
        Record::new(self.id())
            .with(
                "name",
                format!("{} para dos", self.pick(&EVENT_KINDS)).as_str(),
            )
            .with("category", category)
            .with("price", self.int_range(0, 80) as f64)
            .with("duration_minutes", self.int_range(1, 12) * 30)
            .with("max_participants", self.int_range(2, 12))
            .with("status", status)
    }

    pub fn record(&mut self, resource: Resource) -> Record {
        match resource {
            Resource::Events => self.event(),
            Resource::Users => self.user(),
            Resource::Complaints => self.complaint(),
            Resource::Plans => self.plan(),
        }
    }

    /// `count` records for every resource.
    pub fn dataset(&mut self, count: usize) -> BTreeMap<Resource, Vec<Record>> {
        Resource::ALL
            .iter()
            .map(|resource| {
                let records = (0..count).map(|_| self.record(*resource)).collect();
                (*resource, records)
            })
            .collect()
    }

    fn id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn date_within(&mut self, start: Date, days: i64) -> Date {
        start + Duration::days(self.int_range(0, days))
    }
}

fn reference_date() -> Date {
    Date::from_calendar_date(2026, Month::January, 15).unwrap_or(Date::MIN)
}

fn ascii_slug(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
