use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static INTERNAL_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<internal>[\s\S]*?</internal>").unwrap());

/// Removes reasoning artifacts and markdown code fences some models wrap
/// around their JSON answers.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.to_string();

    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = INTERNAL_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    strip_code_fence(&cleaned)
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

/// The JSON object that closes `text` (trailing whitespace allowed). Each `{`
/// is tried from the right, so braces in preceding prose are skipped.
pub fn trailing_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim_end();
    if !trimmed.ends_with('}') {
        return None;
    }
    trimmed
        .char_indices()
        .rev()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| {
            serde_json::from_str::<Value>(&trimmed[start..])
                .ok()
                .filter(Value::is_object)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>{\"positive\": []}";
        assert_eq!(clean_llm_response(input), "{\"positive\": []}");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think />{}";
        assert_eq!(clean_llm_response(input), "{}");
    }

    #[test]
    fn test_clean_reasoning_and_internal_tags() {
        let input = "<reasoning>why</reasoning><internal>debug</internal>{\"edge\": []}";
        assert_eq!(clean_llm_response(input), "{\"edge\": []}");
    }

    #[test]
    fn test_strips_json_code_fence() {
        let input = "```json\n{\"api\": []}\n```";
        assert_eq!(clean_llm_response(input), "{\"api\": []}");
    }

    #[test]
    fn test_strips_bare_code_fence() {
        let input = "```\n{\"api\": []}\n```";
        assert_eq!(clean_llm_response(input), "{\"api\": []}");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "No JSON here, just prose.";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_trailing_object_after_prose() {
        let input = "Here are your cases:\n{\"positive\": [{\"title\": \"a\"}]}\n";
        assert_eq!(
            trailing_json_object(input),
            Some(json!({ "positive": [{ "title": "a" }] }))
        );
    }

    #[test]
    fn test_trailing_object_skips_braces_in_prose() {
        let input = "Use {placeholders} for inputs. Result:\n{\"positive\": [{\"title\": \"a\"}]}";
        assert_eq!(
            trailing_json_object(input),
            Some(json!({ "positive": [{ "title": "a" }] }))
        );
    }

    #[test]
    fn test_trailing_object_ignores_unbalanced_tail() {
        assert_eq!(trailing_json_object("oops {\"a\": 1}}"), None);
    }

    #[test]
    fn test_trailing_object_requires_closing_brace_at_end() {
        assert_eq!(trailing_json_object("{\"a\": 1} and then more words"), None);
        assert_eq!(trailing_json_object("no braces"), None);
    }
}
