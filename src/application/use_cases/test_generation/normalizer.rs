use serde_json::{json, Value};

use crate::domain::error::UpstreamFailure;
use crate::domain::llm_config::ProviderResult;
use crate::domain::test_case::Section;
use crate::infrastructure::response::{clean_llm_response, trailing_json_object};

type Extractor = fn(&Value) -> Option<String>;

/// Known provider response shapes, strongest first.
const TEXT_EXTRACTORS: &[(&str, Extractor)] = &[
    ("output", direct_output),
    ("text", direct_text),
    ("choices[0].message.content", chat_message_content),
    ("choices[0].text", completion_text),
    ("candidates[0].content", candidate_content),
    ("candidates[0].output", candidate_output),
    ("predictions[0].content", prediction_content),
    ("generated_text", generated_text),
    ("rawText", raw_text),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ProviderAbsent,
    NoExtractableText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Direct,
    Cleaned,
    TrailingObject,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalization {
    Upstream(UpstreamFailure),
    /// Payload already uses the section keys.
    PassThrough(Value),
    Parsed {
        value: Value,
        field: &'static str,
        strategy: ParseStrategy,
    },
    /// Candidate text that could not be parsed, kept verbatim.
    Raw { text: String, field: &'static str },
    Fallback(FallbackReason),
}

pub fn normalize(result: &ProviderResult) -> Normalization {
    let payload = match result {
        ProviderResult::Error(failure) => return Normalization::Upstream(failure.clone()),
        ProviderResult::Absent => return Normalization::Fallback(FallbackReason::ProviderAbsent),
        ProviderResult::Success(payload) => payload,
    };

    if has_recognized_section(payload) {
        return Normalization::PassThrough(payload.clone());
    }

    let Some((field, text)) = extract_candidate_text(payload) else {
        return Normalization::Fallback(FallbackReason::NoExtractableText);
    };

    match parse_candidate(&text) {
        Some((value, strategy)) => Normalization::Parsed {
            value,
            field,
            strategy,
        },
        None => Normalization::Raw { text, field },
    }
}

pub fn has_recognized_section(payload: &Value) -> bool {
    let Some(object) = payload.as_object() else {
        return false;
    };
    Section::ALL
        .iter()
        .any(|section| object.get(section.key()).is_some_and(is_truthy))
}

/// First non-null text found by [`TEXT_EXTRACTORS`], with the field it came from.
pub fn extract_candidate_text(payload: &Value) -> Option<(&'static str, String)> {
    TEXT_EXTRACTORS
        .iter()
        .find_map(|(field, extract)| extract(payload).map(|text| (*field, text)))
}

pub fn parse_candidate(text: &str) -> Option<(Value, ParseStrategy)> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some((value, ParseStrategy::Direct));
    }

    let cleaned = clean_llm_response(text);
    if cleaned != text {
        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Some((value, ParseStrategy::Cleaned));
        }
    }

    let trailing = trailing_json_object(text).or_else(|| trailing_json_object(&cleaned));
    trailing.map(|value| (value, ParseStrategy::TrailingObject))
}

/// Body returned for candidate text that is not JSON.
pub fn raw_body(text: &str) -> Value {
    json!({ "raw": text })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn first<'a>(payload: &'a Value, list: &str) -> Option<&'a Value> {
    payload.get(list)?.get(0)
}

fn direct_output(payload: &Value) -> Option<String> {
    text_of(payload.get("output"))
}

fn direct_text(payload: &Value) -> Option<String> {
    text_of(payload.get("text"))
}

fn chat_message_content(payload: &Value) -> Option<String> {
    text_of(first(payload, "choices")?.get("message")?.get("content"))
}

fn completion_text(payload: &Value) -> Option<String> {
    text_of(first(payload, "choices")?.get("text"))
}

/// Plain string content, or the concatenated `parts[].text` of a
/// generateContent-style candidate.
fn candidate_content(payload: &Value) -> Option<String> {
    let content = first(payload, "candidates")?.get("content")?;
    if let Some(parts) = content.get("parts").and_then(Value::as_array) {
        let joined: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();
        if !joined.is_empty() {
            return Some(joined);
        }
    }
    text_of(Some(content))
}

fn candidate_output(payload: &Value) -> Option<String> {
    text_of(first(payload, "candidates")?.get("output"))
}

fn prediction_content(payload: &Value) -> Option<String> {
    text_of(first(payload, "predictions")?.get("content"))
}

fn generated_text(payload: &Value) -> Option<String> {
    text_of(payload.get("generated_text"))
}

fn raw_text(payload: &Value) -> Option<String> {
    text_of(payload.get("rawText"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(value: Value) -> ProviderResult {
        ProviderResult::Success(value)
    }

    #[test]
    fn test_error_payload_is_never_masked() {
        let failure = UpstreamFailure {
            status: Some(500),
            status_text: "Internal Server Error".to_string(),
            message: "API error (500)".to_string(),
            body: None,
        };
        match normalize(&ProviderResult::Error(failure)) {
            Normalization::Upstream(f) => assert_eq!(f.status, Some(500)),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_falls_back() {
        assert_eq!(
            normalize(&ProviderResult::Absent),
            Normalization::Fallback(FallbackReason::ProviderAbsent)
        );
    }

    #[test]
    fn test_schema_payload_passes_through_unchanged() {
        let payload = json!({
            "positive": [{ "title": "From provider" }],
            "extra": { "model": "x" }
        });
        assert_eq!(
            normalize(&success(payload.clone())),
            Normalization::PassThrough(payload)
        );
    }

    #[test]
    fn test_empty_sections_do_not_pass_through() {
        let payload = json!({ "positive": [], "negative": null, "text": "{\"edge\": [1]}" });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, field, .. } => {
                assert_eq!(field, "text");
                assert_eq!(value, json!({ "edge": [1] }));
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_extractor_priority_order() {
        let payload = json!({
            "generated_text": "later",
            "choices": [{ "message": { "content": "chat" } }],
            "text": "direct"
        });
        assert_eq!(
            extract_candidate_text(&payload),
            Some(("text", "direct".to_string()))
        );

        let payload = json!({ "choices": [{ "text": "completion" }], "rawText": "raw" });
        assert_eq!(
            extract_candidate_text(&payload),
            Some(("choices[0].text", "completion".to_string()))
        );
    }

    #[test]
    fn test_null_fields_are_skipped() {
        let payload = json!({ "output": null, "predictions": [{ "content": "pred" }] });
        assert_eq!(
            extract_candidate_text(&payload),
            Some(("predictions[0].content", "pred".to_string()))
        );
    }

    #[test]
    fn test_generate_content_parts_are_joined() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"api\": " }, { "text": "[{\"title\": \"x\"}]}" }] } }]
        });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, field, strategy } => {
                assert_eq!(field, "candidates[0].content");
                assert_eq!(strategy, ParseStrategy::Direct);
                assert_eq!(value["api"][0]["title"], json!("x"));
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_json_text_round_trips() {
        let document = json!({
            "positive": [{ "title": "a", "steps": ["1"] }],
            "negative": [], "edge": [], "setup": [], "security": [],
            "api": [], "stress": [], "recommendations": []
        });
        let payload = json!({ "output": serde_json::to_string(&document).unwrap() });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, .. } => assert_eq!(value, document),
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_code_fenced_json_is_cleaned() {
        let payload = json!({ "text": "```json\n{\"setup\": [{\"title\": \"seed db\"}]}\n```" });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, strategy, .. } => {
                assert_eq!(strategy, ParseStrategy::Cleaned);
                assert_eq!(value["setup"][0]["title"], json!("seed db"));
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_object_after_prose() {
        let payload = json!({ "rawText": "Sure! Here is the result:\n{\"stress\": []}" });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, strategy, field } => {
                assert_eq!(field, "rawText");
                assert_eq!(strategy, ParseStrategy::TrailingObject);
                assert_eq!(value, json!({ "stress": [] }));
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_object_after_braced_prose() {
        let payload = json!({
            "text": "Use {placeholders} for inputs. Result:\n{\"positive\": [{\"title\": \"a\"}]}"
        });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, strategy, field } => {
                assert_eq!(field, "text");
                assert_eq!(strategy, ParseStrategy::TrailingObject);
                assert_eq!(value, json!({ "positive": [{ "title": "a" }] }));
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_text_is_kept_raw() {
        let payload = json!({ "generated_text": "I cannot produce JSON today." });
        assert_eq!(
            normalize(&success(payload)),
            Normalization::Raw {
                text: "I cannot produce JSON today.".to_string(),
                field: "generated_text",
            }
        );
        assert_eq!(raw_body("x"), json!({ "raw": "x" }));
    }

    #[test]
    fn test_payload_without_text_falls_back() {
        let payload = json!({ "id": "resp_1", "usage": { "tokens": 10 } });
        assert_eq!(
            normalize(&success(payload)),
            Normalization::Fallback(FallbackReason::NoExtractableText)
        );
    }

    #[test]
    fn test_non_string_output_is_serialized() {
        let payload = json!({ "output": { "edge": [{ "title": "boundary" }] } });
        match normalize(&success(payload)) {
            Normalization::Parsed { value, .. } => {
                assert_eq!(value, json!({ "edge": [{ "title": "boundary" }] }))
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!([{}])));
        assert!(is_truthy(&json!("see notes")));
    }
}
