use bson::Document;
use serde::Deserialize;
use taskboard_core::{Ops, Organisation, Shift, Slots, Task};

use crate::{Error, Result};

/// Task as emitted by the listing pipeline, before conversion to the read model.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub ops: Option<Ops>,
    pub organisation: Option<Organisation>,
    #[serde(default)]
    pub shifts: Vec<ShiftDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDocument {
    pub id: String,
    pub start_date: Option<bson::DateTime>,
    pub end_date: Option<bson::DateTime>,
    #[serde(default)]
    pub slots: Slots,
    #[serde(default)]
    pub applicants: u16,
}

impl From<ShiftDocument> for Shift {
    fn from(doc: ShiftDocument) -> Self {
        Self {
            id: doc.id,
            start_date: doc.start_date.map(|d| d.to_chrono()),
            end_date: doc.end_date.map(|d| d.to_chrono()),
            slots: doc.slots,
            applicants: doc.applicants,
        }
    }
}

impl From<TaskDocument> for Task {
    fn from(doc: TaskDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            ops: doc.ops,
            organisation: doc.organisation,
            shifts: doc.shifts.into_iter().map(Shift::from).collect(),
        }
    }
}

pub fn decode_task(document: Document) -> Result<Task> {
    bson::from_document::<TaskDocument>(document)
        .map(Task::from)
        .map_err(|e| Error::DecodeFailed(e.to_string()))
}
