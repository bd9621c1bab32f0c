use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use taskboard_core::{Comparator, StatusFilter};

fn operator(comparator: Comparator) -> &'static str {
    match comparator {
        Comparator::GreaterOrEqual => "$gte",
        Comparator::LessOrEqual => "$lte",
    }
}

/// `$match` stage keeping tasks whose every shift satisfies the status'
/// date predicate relative to `now`.
pub fn status_stage(filter: StatusFilter, now: DateTime<Utc>) -> Document {
    let predicate = filter.predicate();

    let mut comparison = Document::new();
    comparison.insert(
        operator(predicate.comparator),
        vec![
            Bson::String(format!("$$shift.{}", predicate.field.path())),
            Bson::DateTime(bson::DateTime::from_chrono(now)),
        ],
    );

    doc! {
        "$match": {
            "$expr": {
                "$allElementsTrue": [
                    {
                        "$map": {
                            "input": "$shifts",
                            "as": "shift",
                            "in": { "$and": [comparison] },
                        }
                    }
                ]
            }
        }
    }
}
