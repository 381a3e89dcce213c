// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use time::Date;
use time::macros::format_description;

use crate::{FieldValue, Fields, Record};

const COMPLAINT_STATUSES: [&str; 4] = ["PENDIENTE", "EN_REVISION", "RESUELTA", "RECHAZADA"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Event,
    User,
    Complaint,
    Plan,
}

impl FormKind {
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::Event => &[
                "title",
                "description",
                "location",
                "start_date",
                "end_date",
                "capacity",
                "price",
            ],
            Self::User => &["name", "email", "age", "city"],
            Self::Complaint => &["subject", "description", "status", "resolution_notes"],
            Self::Plan => &[
                "name",
                "category",
                "price",
                "duration_minutes",
                "max_participants",
            ],
        }
    }

    /// Parses and checks a draft. Every invalid field is reported at once.
    pub fn validate(self, draft: &FormDraft) -> Result<FormPayload, FieldErrors> {
        match self {
            Self::Event => EventFormInput::from_draft(draft).map(FormPayload::Event),
            Self::User => UserFormInput::from_draft(draft).map(FormPayload::User),
            Self::Complaint => ComplaintFormInput::from_draft(draft).map(FormPayload::Complaint),
            Self::Plan => PlanFormInput::from_draft(draft).map(FormPayload::Plan),
        }
    }
}

/// Raw text the user typed, per field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormDraft {
    values: BTreeMap<String, String>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_owned(), value.into());
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn from_record(kind: FormKind, record: &Record) -> Self {
        let mut draft = Self::new();
        for field in kind.field_names() {
            let value = record.field(field);
            if !value.is_null() {
                draft.set(field, value.display());
            }
        }
        draft
    }
}

pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum FormPayload {
    Event(EventFormInput),
    User(UserFormInput),
    Complaint(ComplaintFormInput),
    Plan(PlanFormInput),
}

impl FormPayload {
    pub const fn kind(&self) -> FormKind {
        match self {
            Self::Event(_) => FormKind::Event,
            Self::User(_) => FormKind::User,
            Self::Complaint(_) => FormKind::Complaint,
            Self::Plan(_) => FormKind::Plan,
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        let mut put = |name: &str, value: FieldValue| {
            fields.insert(name.to_owned(), value);
        };
        match self {
            Self::Event(event) => {
                put("title", event.title.into());
                put("description", event.description.into());
                put("location", event.location.into());
                put("start_date", format_date(event.start_date).into());
                put(
                    "end_date",
                    event
                        .end_date
                        .map(|date| FieldValue::from(format_date(date)))
                        .unwrap_or(FieldValue::Null),
                );
                put("capacity", event.capacity.into());
                put("price", event.price.into());
            }
            Self::User(user) => {
                put("name", user.name.into());
                put("email", user.email.into());
                put("age", user.age.into());
                put("city", user.city.into());
            }
            Self::Complaint(complaint) => {
                put("subject", complaint.subject.into());
                put("description", complaint.description.into());
                put("status", complaint.status.into());
                put("resolution_notes", complaint.resolution_notes.into());
            }
            Self::Plan(plan) => {
                put("name", plan.name.into());
                put("category", plan.category.into());
                put("price", plan.price.into());
                put("duration_minutes", plan.duration_minutes.into());
                put("max_participants", plan.max_participants.into());
            }
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFormInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub capacity: i64,
    pub price: f64,
}

impl EventFormInput {
    pub fn from_draft(draft: &FormDraft) -> Result<Self, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let title = reader.required_text("title", 3..=100);
        let description = reader.optional_text("description", 1000);
        let location = reader.required_text("location", 1..=150);
        let start_date = reader.required_date("start_date");
        let end_date = reader.optional_date("end_date");
        let capacity = reader.integer("capacity", 1..=10_000);
        let price = reader.non_negative_number("price");

        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            reader.reject(
                "end_date",
                "la fecha de fin debe ser igual o posterior al inicio",
            );
        }

        reader.finish(|| Self {
            title,
            description,
            location,
            start_date: start_date.unwrap_or(Date::MIN),
            end_date,
            capacity,
            price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFormInput {
    pub name: String,
    pub email: String,
    pub age: i64,
    pub city: String,
}

impl UserFormInput {
    pub fn from_draft(draft: &FormDraft) -> Result<Self, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let name = reader.required_text("name", 2..=60);
        let email = reader.required_text("email", 3..=120);
        if !email.is_empty() && !looks_like_email(&email) {
            reader.reject("email", "introduce un correo válido");
        }
        let age = reader.integer("age", 18..=99);
        let city = reader.optional_text("city", 80);

        reader.finish(|| Self {
            name,
            email,
            age,
            city,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintFormInput {
    pub subject: String,
    pub description: String,
    pub status: String,
    pub resolution_notes: String,
}

impl ComplaintFormInput {
    pub fn from_draft(draft: &FormDraft) -> Result<Self, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let subject = reader.required_text("subject", 3..=120);
        let description = reader.required_text("description", 10..=2000);
        let status = draft.get("status").trim().to_owned();
        if !COMPLAINT_STATUSES.contains(&status.as_str()) {
            reader.reject("status", "selecciona un estado válido");
        }
        let resolution_notes = reader.optional_text("resolution_notes", 2000);
        if matches!(status.as_str(), "RESUELTA" | "RECHAZADA") && resolution_notes.is_empty() {
            reader.reject(
                "resolution_notes",
                "explica la resolución antes de cerrar la denuncia",
            );
        }

        reader.finish(|| Self {
            subject,
            description,
            status,
            resolution_notes,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanFormInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub duration_minutes: i64,
    pub max_participants: i64,
}

impl PlanFormInput {
    pub fn from_draft(draft: &FormDraft) -> Result<Self, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let name = reader.required_text("name", 3..=80);
        let category = reader.required_text("category", 1..=60);
        let price = reader.non_negative_number("price");
        let duration_minutes = reader.integer("duration_minutes", 15..=720);
        let max_participants = reader.integer("max_participants", 2..=50);

        reader.finish(|| Self {
            name,
            category,
            price,
            duration_minutes,
            max_participants,
        })
    }
}

struct DraftReader<'a> {
    draft: &'a FormDraft,
    errors: FieldErrors,
}

impl<'a> DraftReader<'a> {
    fn new(draft: &'a FormDraft) -> Self {
        Self {
            draft,
            errors: FieldErrors::new(),
        }
    }

    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    fn required_text(&mut self, field: &'static str, length: RangeInclusive<usize>) -> String {
        let value = self.draft.get(field).trim().to_owned();
        let count = value.chars().count();
        if count == 0 {
            self.reject(field, "este campo es obligatorio");
        } else if !length.contains(&count) {
            self.reject(
                field,
                format!(
                    "debe tener entre {} y {} caracteres",
                    length.start(),
                    length.end()
                ),
            );
        }
        value
    }

    fn optional_text(&mut self, field: &'static str, max: usize) -> String {
        let value = self.draft.get(field).trim().to_owned();
        if value.chars().count() > max {
            self.reject(field, format!("máximo {max} caracteres"));
        }
        value
    }

    fn integer(&mut self, field: &'static str, range: RangeInclusive<i64>) -> i64 {
        let draft = self.draft;
        let raw = draft.get(field).trim();
        if raw.is_empty() {
            self.reject(field, "este campo es obligatorio");
            return 0;
        }
        match raw.parse::<i64>() {
            Ok(value) if range.contains(&value) => value,
            Ok(_) => {
                self.reject(
                    field,
                    format!("debe estar entre {} y {}", range.start(), range.end()),
                );
                0
            }
            Err(_) => {
                self.reject(field, "introduce un número entero");
                0
            }
        }
    }

    fn non_negative_number(&mut self, field: &'static str) -> f64 {
        let draft = self.draft;
        let raw = draft.get(field).trim();
        if raw.is_empty() {
            self.reject(field, "este campo es obligatorio");
            return 0.0;
        }
        match raw.replace(',', ".").parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => value,
            Ok(_) => {
                self.reject(field, "no puede ser negativo");
                0.0
            }
            Err(_) => {
                self.reject(field, "introduce un número");
                0.0
            }
        }
    }

    fn required_date(&mut self, field: &'static str) -> Option<Date> {
        if self.draft.get(field).trim().is_empty() {
            self.reject(field, "este campo es obligatorio");
            return None;
        }
        self.optional_date(field)
    }

    fn optional_date(&mut self, field: &'static str) -> Option<Date> {
        let draft = self.draft;
        let raw = draft.get(field).trim();
        if raw.is_empty() {
            return None;
        }
        match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                self.reject(field, "usa el formato AAAA-MM-DD");
                None
            }
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(build())
        } else {
            Err(self.errors)
        }
    }
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{FormDraft, FormKind, FormPayload, format_date, parse_date};
    use crate::{FieldValue, Record};

    fn event_draft() -> FormDraft {
        FormDraft::new()
            .with("title", "Fiesta en la playa")
            .with("location", "Valencia")
            .with("start_date", "2026-07-10")
            .with("end_date", "2026-07-11")
            .with("capacity", "120")
            .with("price", "15,5")
    }

    #[test]
    fn valid_event_draft_produces_fields() {
        let payload = FormKind::Event
            .validate(&event_draft())
            .expect("valid event draft");
        assert_eq!(payload.kind(), FormKind::Event);
        let fields = payload.into_fields();
        assert_eq!(
            fields.get("start_date"),
            Some(&FieldValue::text("2026-07-10"))
        );
        assert_eq!(fields.get("capacity"), Some(&FieldValue::Integer(120)));
        assert_eq!(fields.get("price"), Some(&FieldValue::Float(15.5)));
    }

    #[test]
    fn event_draft_reports_every_invalid_field() {
        let draft = event_draft()
            .with("title", "ab")
            .with("end_date", "2026-07-01")
            .with("capacity", "0")
            .with("price", "-3");
        let errors = FormKind::Event
            .validate(&draft)
            .expect_err("invalid event draft");
        let fields: Vec<&str> = errors.keys().copied().collect();
        assert_eq!(fields, vec!["capacity", "end_date", "price", "title"]);
    }

    #[test]
    fn event_start_date_is_required_and_checked() {
        let missing = event_draft().with("start_date", "");
        let errors = FormKind::Event.validate(&missing).expect_err("missing date");
        assert!(errors.contains_key("start_date"));

        let malformed = event_draft().with("start_date", "10/07/2026");
        let errors = FormKind::Event
            .validate(&malformed)
            .expect_err("malformed date");
        assert_eq!(
            errors.get("start_date").map(String::as_str),
            Some("usa el formato AAAA-MM-DD")
        );
    }

    #[test]
    fn user_email_and_age_are_checked() {
        let draft = FormDraft::new()
            .with("name", "Lucía")
            .with("email", "lucia@feeling")
            .with("age", "17");
        let errors = FormKind::User.validate(&draft).expect_err("invalid user");
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("age"));

        let draft = draft.with("email", "lucia@feeling.app").with("age", "30");
        assert!(matches!(
            FormKind::User.validate(&draft),
            Ok(FormPayload::User(_))
        ));
    }

    #[test]
    fn closing_a_complaint_requires_resolution_notes() {
        let draft = FormDraft::new()
            .with("subject", "Perfil falso")
            .with("description", "El perfil usa fotos robadas de otra persona.")
            .with("status", "RESUELTA");
        let errors = FormKind::Complaint
            .validate(&draft)
            .expect_err("missing notes");
        assert!(errors.contains_key("resolution_notes"));

        let draft = draft.with("resolution_notes", "Perfil eliminado");
        assert!(FormKind::Complaint.validate(&draft).is_ok());
    }

    #[test]
    fn plan_ranges_are_enforced() {
        let draft = FormDraft::new()
            .with("name", "Escape room")
            .with("category", "Ocio")
            .with("price", "20")
            .with("duration_minutes", "10")
            .with("max_participants", "abc");
        let errors = FormKind::Plan.validate(&draft).expect_err("invalid plan");
        assert!(errors.contains_key("duration_minutes"));
        assert_eq!(
            errors.get("max_participants").map(String::as_str),
            Some("introduce un número entero")
        );
    }

    #[test]
    fn draft_seeds_from_record_fields() {
        let record = Record::new("4")
            .with("name", "Ana")
            .with("age", 31)
            .with("unrelated", "x");
        let draft = FormDraft::from_record(FormKind::User, &record);
        assert_eq!(draft.get("name"), "Ana");
        assert_eq!(draft.get("age"), "31");
        assert_eq!(draft.get("unrelated"), "");
    }

    #[test]
    fn date_helpers_round_trip() {
        let date = parse_date("2026-02-28").expect("valid date");
        assert_eq!(format_date(date), "2026-02-28");
        assert!(parse_date("2026-02-30").is_none());
    }
}
