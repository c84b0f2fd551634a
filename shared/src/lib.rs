use serde::{Deserialize, Serialize};

/// A single patient entry as exchanged over the REST API and kept in storage.
///
/// Field names follow the wire format: `{ "patientId", "name", "age", "address" }`.
/// Missing fields deserialize to their defaults so that validation, not the
/// JSON decoder, decides what a request is allowed to omit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Store-assigned identifier; `None` until the record has been persisted
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub address: String,
}

impl PatientRecord {
    /// Build a record that has not been persisted yet.
    pub fn new(name: impl Into<String>, age: i32, address: impl Into<String>) -> Self {
        Self {
            patient_id: None,
            name: name.into(),
            age,
            address: address.into(),
        }
    }

    /// Same record carrying the given identifier.
    pub fn with_id(mut self, patient_id: i64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_id() {
        let record = PatientRecord::new("Joan Arc", 31, "New York USA").with_id(3);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["patientId"], 3);
        assert_eq!(json["name"], "Joan Arc");
        assert_eq!(json["age"], 31);
        assert_eq!(json["address"], "New York USA");
    }

    #[test]
    fn unpersisted_record_serializes_null_id() {
        let record = PatientRecord::new("John Arc", 47, "New York USA");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["patientId"].is_null());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let record: PatientRecord = serde_json::from_str(r#"{"age":40}"#).unwrap();
        assert_eq!(record.patient_id, None);
        assert_eq!(record.name, "");
        assert_eq!(record.age, 40);
        assert_eq!(record.address, "");
    }

    #[test]
    fn explicit_null_id_is_accepted() {
        let record: PatientRecord =
            serde_json::from_str(r#"{"patientId":null,"name":"Sherlock Holmes","age":40,"address":"221B Baker Street"}"#)
                .unwrap();
        assert_eq!(record.patient_id, None);
        assert_eq!(record.name, "Sherlock Holmes");
    }
}
