use serde::{Deserialize, Serialize};

/// Store acknowledgment of a single insert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    /// The `_id` of the new document, ObjectIds rendered as hex.
    pub inserted_id: String,
}

/// Store acknowledgment of a single-document update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateAck {
    /// An acknowledged update that touched nothing.
    pub fn unmatched() -> Self {
        UpdateAck {
            acknowledged: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_acks_use_driver_field_names() {
        let insert = InsertAck {
            acknowledged: true,
            inserted_id: "65a1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&insert).unwrap(),
            json!({"acknowledged": true, "insertedId": "65a1"})
        );

        assert_eq!(
            serde_json::to_value(UpdateAck::unmatched()).unwrap(),
            json!({
                "acknowledged": true,
                "matchedCount": 0,
                "modifiedCount": 0,
                "upsertedCount": 0,
                "upsertedId": null
            })
        );
    }
}
