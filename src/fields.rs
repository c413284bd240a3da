//! Codec between the logical list/dict form of a movie field and the
//! JSON text persisted in its column. Empty stored text decodes to an
//! empty value rather than an error.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::warn;

pub fn decode_list<T: DeserializeOwned>(stored: &str) -> Vec<T> {
    if stored.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(stored) {
        Ok(list) => list,
        Err(err) => {
            warn!(error = %err, "undecodable list field, treating as empty");
            Vec::new()
        },
    }
}

pub fn decode_dict(stored: &str) -> Map<String, Value> {
    if stored.is_empty() {
        return Map::new();
    }
    match serde_json::from_str(stored) {
        Ok(map) => map,
        Err(err) => {
            warn!(error = %err, "undecodable dict field, treating as empty");
            Map::new()
        },
    }
}

/// Appends `additions` to whatever the column already holds. Setting a
/// field twice accumulates, it does not replace.
pub fn encode_list<T>(current: &str, additions: &[T]) -> serde_json::Result<String>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let mut list: Vec<T> = decode_list(current);
    list.extend(additions.iter().cloned());
    serde_json::to_string(&list)
}

/// Merges `additions` into the stored mapping; additions win on key
/// collision.
pub fn encode_dict(current: &str, additions: &Map<String, Value>) -> serde_json::Result<String> {
    let mut map = decode_dict(current);
    for (key, value) in additions {
        map.insert(key.clone(), value.clone());
    }
    serde_json::to_string(&map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_stored_text_decodes_to_empty() {
        assert!(decode_list::<String>("").is_empty());
        assert!(decode_dict("").is_empty());
    }

    #[test]
    fn undecodable_stored_text_degrades_to_empty() {
        assert!(decode_list::<String>("not json").is_empty());
        assert!(decode_dict("[1, 2]").is_empty());
    }

    #[test]
    fn list_round_trips_contents_and_order() {
        let actors = vec!["송강호".to_string(), "이선균".to_string()];
        let stored = encode_list("", &actors).unwrap();
        assert_eq!(decode_list::<String>(&stored), actors);
    }

    #[test]
    fn nested_list_round_trips() {
        let vod = vec![vec!["netflix".to_string(), "https://example.com/1".to_string()]];
        let stored = encode_list("", &vod).unwrap();
        assert_eq!(decode_list::<Vec<String>>(&stored), vod);
    }

    #[test]
    fn encoding_appends_to_current_value() {
        let stored = encode_list("", &["드라마".to_string()]).unwrap();
        let stored = encode_list(&stored, &["로맨스".to_string()]).unwrap();
        assert_eq!(decode_list::<String>(&stored), vec!["드라마", "로맨스"]);
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let stored = encode_list("", &["액션".to_string()]).unwrap();
        assert_eq!(stored, r#"["액션"]"#);
    }

    #[test]
    fn dict_merge_prefers_additions() {
        let mut first = Map::new();
        first.insert("plotText".to_string(), json!("old plot"));
        first.insert("source".to_string(), json!("kofic"));
        let stored = encode_dict("", &first).unwrap();

        let mut second = Map::new();
        second.insert("plotText".to_string(), json!("new plot"));
        let stored = encode_dict(&stored, &second).unwrap();

        let decoded = decode_dict(&stored);
        assert_eq!(decoded.get("plotText"), Some(&json!("new plot")));
        assert_eq!(decoded.get("source"), Some(&json!("kofic")));
    }
}
