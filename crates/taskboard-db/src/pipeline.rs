use bson::{doc, Document};
use chrono::{DateTime, Utc};
use taskboard_core::{Pagination, PaginationConfig, ResolvedPage, SearchParams, ShiftDateField};

use crate::filter::status_stage;

pub const TASKS_COLLECTION: &str = "tasks";
pub const ORGANISATIONS_COLLECTION: &str = "orgas";
pub const USERS_COLLECTION: &str = "users";
pub const SHIFTS_COLLECTION: &str = "shifts";

pub const CANCELLED_STATUS: &str = "cancelled";

/// Stored location of a projected shift date. Shifts keep their dates as
/// strings under `time`; the projection converts them with `$toDate`.
fn stored_date_path(field: ShiftDateField) -> &'static str {
    match field {
        ShiftDateField::StartDate => "$time.startDate",
        ShiftDateField::EndDate => "$time.endDate",
    }
}

/// Fixed join-and-project stages shared by every listing.
///
/// Order matters: the "has a shift" match inspects `shifts` while it is still
/// the joined array, and must run before organisation/ops are flattened.
pub fn base_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$project": {
                "_id": 0,
                "id": "$_id",
                "name": "$alias",
                "organisationId": 1,
                "shiftIds": 1,
                "assigneeId": 1,
            }
        },
        organisation_lookup(),
        ops_lookup(),
        shifts_lookup(),
        doc! { "$match": { "shifts.0": { "$exists": true } } },
        doc! {
            "$addFields": {
                "organisation": { "$arrayElemAt": ["$organisation", 0] },
                "ops": { "$arrayElemAt": ["$ops", 0] },
            }
        },
        doc! {
            "$project": {
                "organisationId": 0,
                "shiftIds": 0,
                "assigneeId": 0,
            }
        },
    ]
}

fn organisation_lookup() -> Document {
    doc! {
        "$lookup": {
            "from": ORGANISATIONS_COLLECTION,
            "localField": "organisationId",
            "foreignField": "_id",
            "pipeline": [
                {
                    "$project": {
                        "_id": 0,
                        "name": 1,
                        "address": 1,
                        "pictureUrl": "$logoUrl",
                    }
                }
            ],
            "as": "organisation",
        }
    }
}

fn ops_lookup() -> Document {
    doc! {
        "$lookup": {
            "from": USERS_COLLECTION,
            "localField": "assigneeId",
            "foreignField": "_id",
            "pipeline": [
                {
                    "$project": {
                        "_id": 0,
                        "firstname": "$profile.FirstName",
                        "lastname": "$profile.LastName",
                    }
                }
            ],
            "as": "ops",
        }
    }
}

fn shifts_lookup() -> Document {
    let mut projection = doc! { "_id": 0, "id": "$_id" };
    for field in ShiftDateField::ALL {
        projection.insert(field.path(), doc! { "$toDate": stored_date_path(field) });
    }
    projection.insert("slots", 1);
    projection.insert("applicants", 1);

    doc! {
        "$lookup": {
            "from": SHIFTS_COLLECTION,
            "localField": "shiftIds",
            "foreignField": "_id",
            "pipeline": [
                { "$match": { "status": { "$ne": CANCELLED_STATUS } } },
                {
                    "$addFields": {
                        "applicants": { "$size": "$availableSiderIds" },
                        "slots.filled": { "$size": "$hiredSiderIds" },
                        "slots.total": "$slots",
                    }
                },
                { "$project": projection },
            ],
            "as": "shifts",
        }
    }
}

pub fn pagination_stages(page: &ResolvedPage) -> [Document; 2] {
    let skip = i64::try_from(page.skip).unwrap_or(i64::MAX);
    [
        doc! { "$skip": skip },
        doc! { "$limit": i64::from(page.limit) },
    ]
}

/// A listing ready to run: the full pipeline plus the window it applies.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub pipeline: Vec<Document>,
    pub pagination: Pagination,
}

impl TaskQuery {
    pub fn compile(params: &SearchParams, config: &PaginationConfig, now: DateTime<Utc>) -> Self {
        let mut pipeline = base_pipeline();

        if let Some(filter) = params.status {
            pipeline.push(status_stage(filter, now));
        }

        let page = config.resolve(params.limit, params.page);
        pipeline.extend(pagination_stages(&page));

        Self {
            pipeline,
            pagination: page.pagination,
        }
    }
}
