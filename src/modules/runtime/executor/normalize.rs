//! Response normalization
//!
//! Turns the remote service's response envelope into a uniform result
//! table. A query-level error in the envelope always surfaces as an error;
//! zero rows always surface as an explicit empty table.

use magicchat_core::{MagicChatError, QueryTable};

/// Fail when the envelope carries a query-level error.
///
/// The service reports malformed queries and unknown fields through an
/// `errors` array while still answering 200; the error payload is carried
/// through verbatim so callers can distinguish it from an empty result.
pub fn check_errors(envelope: &serde_json::Value) -> Result<(), MagicChatError> {
    match envelope.get("errors") {
        None => Ok(()),
        Some(serde_json::Value::Null) => Ok(()),
        Some(serde_json::Value::Array(errors)) if errors.is_empty() => Ok(()),
        Some(errors) => Err(MagicChatError::Query(errors.to_string())),
    }
}

/// Flatten the envelope into a result table.
///
/// Extracts the first (only) named collection under `data.Get`. An absent
/// or null collection and a zero-row collection both normalize to the
/// explicit empty table; any other shape is a normalization error.
pub fn to_table(envelope: &serde_json::Value) -> Result<QueryTable, MagicChatError> {
    check_errors(envelope)?;

    let get = envelope
        .get("data")
        .and_then(|data| data.get("Get"))
        .ok_or_else(|| {
            MagicChatError::Normalization("Response envelope is missing data.Get".to_string())
        })?;

    let collections = get.as_object().ok_or_else(|| {
        MagicChatError::Normalization(format!("data.Get is not an object: {}", get))
    })?;

    let Some((_, objects)) = collections.iter().next() else {
        return Ok(QueryTable::empty());
    };

    match objects {
        serde_json::Value::Null => Ok(QueryTable::empty()),
        serde_json::Value::Array(rows) if rows.is_empty() => Ok(QueryTable::empty()),
        serde_json::Value::Array(rows) => QueryTable::from_objects(rows),
        other => Err(MagicChatError::Normalization(format!(
            "Result collection is not an array: {}",
            other
        ))),
    }
}

/// Lift the grouped generative text out of the envelope, if present.
///
/// The service attaches the grouped result to the first object's
/// `_additional.generate` block; a generation-level error is logged and
/// treated as "no recommendation" rather than failing the search.
pub fn extract_grouped_generation(envelope: &serde_json::Value) -> Option<String> {
    let get = envelope.get("data")?.get("Get")?.as_object()?;
    let (_, objects) = get.iter().next()?;
    let generate = objects.as_array()?.first()?.get("_additional")?.get("generate")?;

    if let Some(error) = generate.get("error").and_then(|e| e.as_str()) {
        tracing::warn!("Generative module reported an error: {}", error);
        return None;
    }

    generate
        .get("groupedResult")
        .and_then(|r| r.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicchat_types::PropertyValue;
    use serde_json::json;

    #[test]
    fn test_errors_array_surfaces_as_query_error() {
        let envelope = json!({
            "errors": [{"message": "Cannot query field \"titlez\" on type \"TVShow\""}]
        });
        let err = to_table(&envelope).unwrap_err();
        match err {
            MagicChatError::Query(payload) => assert!(payload.contains("titlez")),
            other => panic!("expected Query error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_beats_partial_data() {
        // An envelope with both data and errors must never yield rows
        let envelope = json!({
            "data": {"Get": {"TVShow": [{"title": "Doug"}]}},
            "errors": [{"message": "partial failure"}]
        });
        assert!(to_table(&envelope).is_err());
    }

    #[test]
    fn test_rows_flatten_with_meta_columns() {
        let envelope = json!({
            "data": {"Get": {"TVShow": [
                {"title": "Rugrats", "_additional": {"id": "a-1", "score": 0.91}},
                {"title": "Doug", "_additional": {"id": "a-2", "score": 0.40}}
            ]}}
        });
        let table = to_table(&envelope).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), &["title", "_additional.id", "_additional.score"]);
        assert_eq!(
            table.get(0, "title"),
            Some(&PropertyValue::Text("Rugrats".to_string()))
        );
    }

    #[test]
    fn test_empty_collection_is_explicit_empty_table() {
        let envelope = json!({"data": {"Get": {"TVShow": []}}});
        let table = to_table(&envelope).unwrap();
        assert!(table.is_empty());

        let envelope = json!({"data": {"Get": {"TVShow": null}}});
        assert!(to_table(&envelope).unwrap().is_empty());

        let envelope = json!({"data": {"Get": {}}});
        assert!(to_table(&envelope).unwrap().is_empty());
    }

    #[test]
    fn test_missing_envelope_is_a_normalization_error() {
        let envelope = json!({"unexpected": true});
        assert!(matches!(
            to_table(&envelope).unwrap_err(),
            MagicChatError::Normalization(_)
        ));

        let envelope = json!({"data": {"Get": "not an object"}});
        assert!(matches!(
            to_table(&envelope).unwrap_err(),
            MagicChatError::Normalization(_)
        ));
    }

    #[test]
    fn test_extract_grouped_generation() {
        let envelope = json!({
            "data": {"Get": {"MovieDemo": [
                {"title": "Casablanca", "_additional": {
                    "generate": {"groupedResult": "Watch Casablanca tonight.", "error": null}
                }}
            ]}}
        });
        assert_eq!(
            extract_grouped_generation(&envelope).as_deref(),
            Some("Watch Casablanca tonight.")
        );
    }

    #[test]
    fn test_generation_error_yields_none() {
        let envelope = json!({
            "data": {"Get": {"MovieDemo": [
                {"title": "Casablanca", "_additional": {
                    "generate": {"groupedResult": null, "error": "provider key missing"}
                }}
            ]}}
        });
        assert_eq!(extract_grouped_generation(&envelope), None);
    }

    #[test]
    fn test_no_generation_block_yields_none() {
        let envelope = json!({"data": {"Get": {"MovieDemo": [{"title": "Casablanca"}]}}});
        assert_eq!(extract_grouped_generation(&envelope), None);
    }
}
