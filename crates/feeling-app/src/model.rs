// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Events,
    Users,
    Complaints,
    Plans,
}

impl Resource {
    pub const ALL: [Self; 4] = [Self::Events, Self::Users, Self::Complaints, Self::Plans];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Users => "users",
            Self::Complaints => "complaints",
            Self::Plans => "plans",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "events" => Some(Self::Events),
            "users" => Some(Self::Users),
            "complaints" => Some(Self::Complaints),
            "plans" => Some(Self::Plans),
            _ => None,
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            Self::Events => "evento",
            Self::Users => "usuario",
            Self::Complaints => "denuncia",
            Self::Plans => "plan",
        }
    }

    pub const fn is_feminine(self) -> bool {
        matches!(self, Self::Complaints)
    }

    pub const fn article(self) -> &'static str {
        if self.is_feminine() { "la" } else { "el" }
    }

    pub const fn contracted_article(self) -> &'static str {
        if self.is_feminine() { "de la" } else { "del" }
    }

    pub const fn gender_suffix(self) -> &'static str {
        if self.is_feminine() { "a" } else { "o" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Default ordering used by table sorting. Blank values (Null or empty
    /// text) come first, then numbers (bools included) by `f64::total_cmp`,
    /// then text by string. Every value lands in exactly one rank, so the
    /// order is total even when a column mixes kinds.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        let (left, right) = (self.sort_rank(), other.sort_rank());
        left.cmp(&right).then_with(|| match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            _ => match (self.as_number(), other.as_number()) {
                (Some(left), Some(right)) => left.total_cmp(&right),
                _ => Ordering::Equal,
            },
        })
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Text(value) if value.is_empty() => 0,
            Self::Bool(_) | Self::Integer(_) | Self::Float(_) => 1,
            Self::Text(_) => 2,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

/// An entity row as the backend returned it. Only `id` is interpreted;
/// every other field passes through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: Fields,
}

const EMPTY_FIELD: FieldValue = FieldValue::Null;

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&EMPTY_FIELD)
    }

    pub fn text(&self, name: &str) -> String {
        self.field(name).display()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total_pages: usize,
    pub total_elements: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Record>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub counts: BTreeMap<String, u64>,
}

impl Stats {
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ascending" | "asc" => Some(Self::Ascending),
            "descending" | "desc" => Some(Self::Descending),
            _ => None,
        }
    }

    pub const fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

pub type ColumnId = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortDescriptor {
    pub column: ColumnId,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub const fn ascending(column: ColumnId) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn descending(column: ColumnId) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub uid: ColumnId,
    pub name: &'static str,
    pub sortable: bool,
}

impl ColumnSpec {
    pub const fn sortable(uid: ColumnId, name: &'static str) -> Self {
        Self {
            uid,
            name,
            sortable: true,
        }
    }

    pub const fn fixed(uid: ColumnId, name: &'static str) -> Self {
        Self {
            uid,
            name,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnVisibility {
    #[default]
    All,
    Only(std::collections::BTreeSet<ColumnId>),
}

impl ColumnVisibility {
    pub fn only<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = ColumnId>,
    {
        Self::Only(columns.into_iter().collect())
    }

    pub fn shows(&self, column: ColumnId) -> bool {
        match self {
            Self::All => true,
            Self::Only(columns) => columns.contains(column),
        }
    }
}

/// Zero-indexed page request handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub resource: Resource,
    pub status: Option<&'static str>,
    pub page: usize,
    /// `None` asks for the whole collection (local-data pages).
    pub size: Option<usize>,
    pub search: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordAction {
    ToggleStatus,
    Approve,
    Reject,
}

impl RecordAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleStatus => "toggle-status",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "toggle-status" | "toggle" => Some(Self::ToggleStatus),
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordRequest {
    Create {
        resource: Resource,
        fields: Fields,
    },
    Update {
        resource: Resource,
        id: RecordId,
        fields: Fields,
    },
    Delete {
        resource: Resource,
        id: RecordId,
    },
    Action {
        resource: Resource,
        id: RecordId,
        action: RecordAction,
    },
}

impl RecordRequest {
    pub const fn resource(&self) -> Resource {
        match self {
            Self::Create { resource, .. }
            | Self::Update { resource, .. }
            | Self::Delete { resource, .. }
            | Self::Action { resource, .. } => *resource,
        }
    }

    pub const fn op(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Action { action, .. } => action.as_str(),
        }
    }

    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Self::Create { .. } => None,
            Self::Update { id, .. } | Self::Delete { id, .. } | Self::Action { id, .. } => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Record, RecordId, Resource, SortDirection};
    use std::cmp::Ordering;

    #[test]
    fn missing_field_compares_as_empty_text() {
        let record = Record::new("1").with("title", "Beach party");
        assert!(record.field("location").is_null());
        assert_eq!(
            record.field("location").cmp_value(&FieldValue::text("")),
            Ordering::Equal
        );
        assert_eq!(
            record.field("location").cmp_value(record.field("title")),
            Ordering::Less
        );
    }

    #[test]
    fn numbers_compare_numerically_across_integer_and_float() {
        assert_eq!(
            FieldValue::Integer(9).cmp_value(&FieldValue::Float(10.5)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Integer(100).cmp_value(&FieldValue::Integer(20)),
            Ordering::Greater
        );
    }

    #[test]
    fn numbers_order_before_text_whatever_the_digits() {
        let ten = FieldValue::Integer(10);
        let five = FieldValue::text("5");
        let nine = FieldValue::Integer(9);
        assert_eq!(nine.cmp_value(&ten), Ordering::Less);
        assert_eq!(ten.cmp_value(&five), Ordering::Less);
        assert_eq!(nine.cmp_value(&five), Ordering::Less);
        assert_eq!(five.cmp_value(&ten), Ordering::Greater);
    }

    #[test]
    fn float_edge_values_have_a_place() {
        let nan = FieldValue::Float(f64::NAN);
        let neg_zero = FieldValue::Float(-0.0);
        assert_eq!(nan.cmp_value(&nan), Ordering::Equal);
        assert_eq!(
            FieldValue::Integer(i64::MAX).cmp_value(&FieldValue::Float(f64::INFINITY)),
            Ordering::Less
        );
        assert_eq!(neg_zero.cmp_value(&FieldValue::Integer(0)), Ordering::Less);
        assert_eq!(FieldValue::Null.cmp_value(&nan), Ordering::Less);
    }

    #[test]
    fn blank_record_id_is_detected() {
        assert!(RecordId::new("  ").is_blank());
        assert!(!RecordId::from(42).is_blank());
    }

    #[test]
    fn resource_and_direction_parse_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(Resource::parse(resource.as_str()), Some(resource));
        }
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::Ascending.flip(), SortDirection::Descending);
    }
}
