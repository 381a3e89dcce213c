// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{FieldErrors, FormDraft, FormKind, Record, RecordAction, RecordRequest, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Request(RecordRequest),
    Invalid,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    Succeeded(RecordRequest),
    Failed(RecordRequest),
    Unexpected,
}

/// Create/edit/delete modal state for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudState {
    resource: Resource,
    form: FormKind,
    modal: Option<ModalKind>,
    selected: Option<Record>,
    draft: FormDraft,
    errors: FieldErrors,
    in_flight: Option<RecordRequest>,
}

impl CrudState {
    pub fn new(resource: Resource, form: FormKind) -> Self {
        Self {
            resource,
            form,
            modal: None,
            selected: None,
            draft: FormDraft::new(),
            errors: FieldErrors::new(),
            in_flight: None,
        }
    }

    pub const fn modal(&self) -> Option<ModalKind> {
        self.modal
    }

    pub fn selected(&self) -> Option<&Record> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn in_flight(&self) -> Option<&RecordRequest> {
        self.in_flight.as_ref()
    }

    pub fn open_create(&mut self, seed: Option<FormDraft>) {
        self.modal = Some(ModalKind::Create);
        self.selected = None;
        self.draft = seed.unwrap_or_default();
        self.errors.clear();
    }

    pub fn open_edit(&mut self, record: Record) -> Result<()> {
        self.require_id(&record, "edit")?;
        self.draft = FormDraft::from_record(self.form, &record);
        self.selected = Some(record);
        self.modal = Some(ModalKind::Edit);
        self.errors.clear();
        Ok(())
    }

    pub fn open_delete(&mut self, record: Record) -> Result<()> {
        self.require_id(&record, "delete")?;
        self.selected = Some(record);
        self.modal = Some(ModalKind::Delete);
        self.errors.clear();
        Ok(())
    }

    pub fn close(&mut self) {
        self.modal = None;
        self.selected = None;
        self.draft = FormDraft::new();
        self.errors.clear();
    }

    /// Editing a field clears its validation message.
    pub fn edit_field(&mut self, field: &str, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.remove(field);
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.in_flight.is_some() {
            return SubmitOutcome::Ignored;
        }
        let request = match (self.modal, &self.selected) {
            (None, _) => return SubmitOutcome::Ignored,
            (Some(ModalKind::Create), _) => match self.form.validate(&self.draft) {
                Ok(payload) => RecordRequest::Create {
                    resource: self.resource,
                    fields: payload.into_fields(),
                },
                Err(errors) => {
                    self.errors = errors;
                    return SubmitOutcome::Invalid;
                }
            },
            (Some(ModalKind::Edit), Some(record)) => match self.form.validate(&self.draft) {
                Ok(payload) => RecordRequest::Update {
                    resource: self.resource,
                    id: record.id.clone(),
                    fields: payload.into_fields(),
                },
                Err(errors) => {
                    self.errors = errors;
                    return SubmitOutcome::Invalid;
                }
            },
            (Some(ModalKind::Delete), Some(record)) => RecordRequest::Delete {
                resource: self.resource,
                id: record.id.clone(),
            },
            (Some(ModalKind::Edit | ModalKind::Delete), None) => return SubmitOutcome::Ignored,
        };
        self.in_flight = Some(request.clone());
        SubmitOutcome::Request(request)
    }

    /// Row-level operations that skip the modal (status toggle, approve,
    /// reject).
    pub fn row_action(
        &mut self,
        record: &Record,
        action: RecordAction,
    ) -> Result<Option<RecordRequest>> {
        self.require_id(record, action.as_str())?;
        if self.in_flight.is_some() {
            return Ok(None);
        }
        let request = RecordRequest::Action {
            resource: self.resource,
            id: record.id.clone(),
            action,
        };
        self.in_flight = Some(request.clone());
        Ok(Some(request))
    }

    /// Success closes every modal and clears the selection; failure keeps
    /// the modal, selection, and draft so the user can retry.
    pub fn settle(&mut self, request: &RecordRequest, succeeded: bool) -> Settled {
        if self.in_flight.as_ref() != Some(request) {
            return Settled::Unexpected;
        }
        self.in_flight = None;
        if succeeded {
            self.close();
            Settled::Succeeded(request.clone())
        } else {
            Settled::Failed(request.clone())
        }
    }

    fn require_id(&self, record: &Record, op: &str) -> Result<()> {
        if record.id.is_blank() {
            bail!("cannot {op} {} without an id", self.resource.singular());
        }
        Ok(())
    }
}

pub fn success_message(request: &RecordRequest) -> String {
    let resource = request.resource();
    let noun = capitalize(resource.singular());
    let done = |stem: &str| format!("{stem}{}", resource.gender_suffix());
    match request {
        RecordRequest::Create { .. } => format!("{noun} {} correctamente", done("cread")),
        RecordRequest::Update { .. } => format!("{noun} {} correctamente", done("actualizad")),
        RecordRequest::Delete { .. } => format!("{noun} {} correctamente", done("eliminad")),
        RecordRequest::Action { action, .. } => match action {
            RecordAction::ToggleStatus => format!(
                "Estado {} {} actualizado",
                resource.contracted_article(),
                resource.singular()
            ),
            RecordAction::Approve => format!("{noun} {}", done("aprobad")),
            RecordAction::Reject => format!("{noun} {}", done("rechazad")),
        },
    }
}

pub fn failure_message(request: &RecordRequest) -> String {
    let resource = request.resource();
    let target = format!("{} {}", resource.article(), resource.singular());
    let action = match request {
        RecordRequest::Create { .. } => format!("crear {target}"),
        RecordRequest::Update { .. } => format!("actualizar {target}"),
        RecordRequest::Delete { .. } => format!("eliminar {target}"),
        RecordRequest::Action { action, .. } => match action {
            RecordAction::ToggleStatus => format!(
                "cambiar el estado {} {}",
                resource.contracted_article(),
                resource.singular()
            ),
            RecordAction::Approve => format!("aprobar {target}"),
            RecordAction::Reject => format!("rechazar {target}"),
        },
    };
    format!("No se pudo {action}. Inténtalo de nuevo.")
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
