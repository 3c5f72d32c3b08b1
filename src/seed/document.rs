use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::problem::Problem;

/// Keys under which a batch may be wrapped.
const WRAPPER_KEYS: [&str; 5] = ["employees", "employee", "data", "attendance", "records"];

/// Reads a bulk-load document from disk and unwraps it into entries.
pub fn read_batch(path: &Path) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(unwrap_batch(parsed))
}

/// Arrays pass through, wrapped arrays are unwrapped, anything else is a
/// one-entry batch.
pub fn unwrap_batch(document: Value) -> Vec<Value> {
    match document {
        Value::Array(entries) => entries,
        Value::Object(mut obj) => {
            let key = WRAPPER_KEYS
                .into_iter()
                .find(|key| matches!(obj.get(*key), Some(Value::Array(_))));
            match key.and_then(|key| obj.remove(key)) {
                Some(Value::Array(entries)) => entries,
                _ => vec![Value::Object(obj)],
            }
        }
        other => vec![other],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidEntry {
    pub index: usize,
    pub item: Value,
    pub problems: Vec<Problem>,
}

impl InvalidEntry {
    pub fn describe(&self) -> String {
        self.problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Valid entries alongside the rejected ones, each keeping its batch index.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub read: usize,
    pub valid: Vec<T>,
    pub invalid: Vec<InvalidEntry>,
}

impl<T> BatchReport<T> {
    pub fn validate(
        entries: Vec<Value>,
        validate: impl Fn(&Value) -> Result<T, Vec<Problem>>,
    ) -> Self {
        let read = entries.len();
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for (index, item) in entries.into_iter().enumerate() {
            match validate(&item) {
                Ok(entry) => valid.push(entry),
                Err(problems) => invalid.push(InvalidEntry {
                    index,
                    item,
                    problems,
                }),
            }
        }

        Self {
            read,
            valid,
            invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        attendance::{AttendanceStatus, NewAttendance},
        employee::NewEmployee,
    };
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn unwraps_named_arrays() {
        for key in WRAPPER_KEYS {
            let mut doc = serde_json::Map::new();
            doc.insert(key.to_string(), json!([{ "a": 1 }, { "a": 2 }]));
            assert_eq!(unwrap_batch(Value::Object(doc)).len(), 2, "key {key}");
        }
    }

    #[test]
    fn plain_array_passes_through() {
        assert_eq!(unwrap_batch(json!([1, 2, 3])), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn single_object_becomes_one_entry() {
        let doc = json!({ "name": "A", "employees": "not-an-array" });
        assert_eq!(unwrap_batch(doc.clone()), vec![doc]);
    }

    #[test]
    fn invalid_entries_do_not_stop_the_batch() {
        let entries = unwrap_batch(json!({ "employees": [
            { "name": "A", "email": "a@b.co", "designation": "Clerk", "basicSalary": 1000 },
            { "name": "B", "email": "b@b.co" },
            "garbage",
            { "name": "C", "email": "c@b.co", "designation": "Lead", "basicSalary": "2500", "deductions": 100 }
        ]}));

        let report = BatchReport::validate(entries, NewEmployee::from_value);
        assert_eq!(report.read, 4);
        assert_eq!(report.valid.len(), 2);
        assert_eq!(report.valid[1].basic_salary, 2500.0);

        let indexes: Vec<_> = report.invalid.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert_eq!(report.invalid[0].describe(), "missing designation, missing basicSalary");
        assert_eq!(report.invalid[1].describe(), "not-an-object");
        assert_eq!(report.invalid[1].item, json!("garbage"));
    }

    #[test]
    fn attendance_batch_requires_status() {
        let entries = vec![
            json!({ "employee": "E1", "date": "2024-01-03", "status": "Absent" }),
            json!({ "employee": "E2", "date": "2024-01-03" }),
        ];
        let report = BatchReport::validate(entries, |v| NewAttendance::from_value(v, None));
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.valid[0].status, AttendanceStatus::Absent);
        assert_eq!(report.invalid[0].describe(), "missing status");
    }

    #[test]
    fn reads_document_from_disk() {
        let path = std::env::temp_dir().join(format!("hr-seed-{}.json", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"records": [{{"employee": "E1"}}]}}"#).unwrap();
        drop(file);

        let entries = read_batch(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(entries, vec![json!({ "employee": "E1" })]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_batch(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
