// ABOUTME: Conversion between typed models and stored BSON documents
// ABOUTME: Stores declared date fields as BSON dates and normalizes ids and nulls on read

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use mongodb::bson::{self, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{AppError, Result};

pub fn datetime(dt: DateTime<Utc>) -> Bson {
    Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis()))
}

/// Serializes a model into a document, storing `date_fields` as BSON dates.
pub fn to_document<T: Serialize>(value: &T, date_fields: &[&str]) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| {
                let is_date = date_fields.contains(&key.as_str());
                let bson = json_to_bson(value, is_date);
                (key, bson)
            })
            .collect()),
        other => Err(AppError::Serialization(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Like `to_document`, but drops null fields so they never overwrite stored values.
pub fn to_set_document<T: Serialize>(value: &T, date_fields: &[&str]) -> Result<Document> {
    let mut document = to_document(value, date_fields)?;
    let nulls: Vec<String> = document
        .iter()
        .filter(|(_, v)| matches!(v, Bson::Null))
        .map(|(k, _)| k.clone())
        .collect();
    for key in nulls {
        document.remove(&key);
    }
    Ok(document)
}

/// Deserializes a stored document into a model.
///
/// Null fields are dropped so that defaults apply, dates become RFC 3339 strings
/// and a document without an `id` falls back to the hex of its `_id`.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    let mut map = Map::new();
    let mut object_id = None;
    for (key, value) in document {
        if key == "_id" {
            object_id = Some(bson_to_json(value));
            continue;
        }
        if matches!(value, Bson::Null) {
            continue;
        }
        map.insert(key, bson_to_json(value));
    }
    if !map.contains_key("id") {
        if let Some(id) = object_id {
            map.insert("id".to_string(), id);
        }
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

fn json_to_bson(value: Value, is_date: bool) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if let Some(u) = n.as_u64() {
                Bson::Int64(u.min(i64::MAX as u64) as i64)
            } else {
                Bson::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => {
            if is_date {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(&s) {
                    return datetime(parsed.with_timezone(&Utc));
                }
            }
            Bson::String(s)
        }
        Value::Array(items) => {
            Bson::Array(items.into_iter().map(|v| json_to_bson(v, false)).collect())
        }
        Value::Object(map) => Bson::Document(
            map.into_iter()
                .map(|(k, v)| (k, json_to_bson(v, false)))
                .collect(),
        ),
    }
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::Number(i.into()),
        Bson::Int64(i) => Value::Number(i.into()),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_json(v)))
                .collect(),
        ),
        Bson::DateTime(dt) => match Utc.timestamp_millis_opt(dt.timestamp_millis()).single() {
            Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => Value::Null,
        },
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        id: String,
        title: String,
        #[serde(default)]
        tags: Vec<String>,
        starts: DateTime<Utc>,
        note: Option<String>,
    }

    #[test]
    fn test_dates_are_stored_as_bson_dates() {
        let starts = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
        let sample = Sample {
            id: "a".into(),
            title: "Fair".into(),
            tags: vec![],
            starts,
            note: None,
        };
        let document = to_document(&sample, &["starts"]).unwrap();
        assert!(matches!(document.get("starts"), Some(Bson::DateTime(_))));
        assert!(matches!(document.get("note"), Some(Bson::Null)));

        let back: Sample = from_document(document).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_set_document_drops_nulls() {
        let document = to_set_document(&serde_json::json!({"a": 1, "b": null}), &[]).unwrap();
        assert_eq!(document, doc! {"a": 1_i64});
    }

    #[test]
    fn test_legacy_document_without_id_and_with_nulls() {
        let oid = ObjectId::new();
        let document = doc! {
            "_id": oid,
            "title": "Legacy",
            "tags": Bson::Null,
            "starts": bson::DateTime::from_millis(0),
            "note": Bson::Null,
        };
        let sample: Sample = from_document(document).unwrap();
        assert_eq!(sample.id, oid.to_hex());
        assert!(sample.tags.is_empty());
        assert_eq!(sample.note, None);
    }
}
