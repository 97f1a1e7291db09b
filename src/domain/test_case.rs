use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// One unit of generated test guidance.
///
/// Deserialization goes through [`TestCaseRecord`] so that a partial object
/// still yields a complete case, with `priority` falling back to `severity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TestCaseRecord")]
pub struct TestCase {
    pub title: String,
    pub steps: Vec<String>,
    pub inputs: Map<String, Value>,
    pub expected: String,
    pub severity: Severity,
    pub notes: String,
    pub preconditions: Vec<String>,
    pub postconditions: Vec<String>,
    pub api_sample: Option<Value>,
    pub automation: Option<Value>,
    pub priority: Severity,
    pub estimated_minutes: Option<f64>,
    pub tags: Vec<String>,
}

impl TestCase {
    /// Positional constructor covering the six legacy fields; the extended
    /// metadata starts empty and `priority` mirrors `severity`.
    pub fn new(
        title: impl Into<String>,
        steps: Vec<String>,
        inputs: Map<String, Value>,
        expected: impl Into<String>,
        severity: Severity,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            steps,
            inputs,
            expected: expected.into(),
            severity,
            notes: notes.into(),
            preconditions: Vec::new(),
            postconditions: Vec::new(),
            api_sample: None,
            automation: None,
            priority: severity,
            estimated_minutes: None,
            tags: Vec::new(),
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new(), Map::new(), "", Severity::default(), "")
    }
}

impl Default for TestCase {
    fn default() -> Self {
        Self::titled("")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestCaseRecord {
    title: String,
    steps: Vec<String>,
    inputs: Map<String, Value>,
    expected: String,
    severity: Severity,
    notes: String,
    preconditions: Vec<String>,
    postconditions: Vec<String>,
    api_sample: Option<Value>,
    automation: Option<Value>,
    priority: Option<Severity>,
    estimated_minutes: Option<f64>,
    tags: Vec<String>,
}

impl Default for TestCaseRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            steps: Vec::new(),
            inputs: Map::new(),
            expected: String::new(),
            severity: Severity::default(),
            notes: String::new(),
            preconditions: Vec::new(),
            postconditions: Vec::new(),
            api_sample: None,
            automation: None,
            priority: None,
            estimated_minutes: None,
            tags: Vec::new(),
        }
    }
}

impl From<TestCaseRecord> for TestCase {
    fn from(record: TestCaseRecord) -> Self {
        Self {
            priority: record.priority.unwrap_or(record.severity),
            title: record.title,
            steps: record.steps,
            inputs: record.inputs,
            expected: record.expected,
            severity: record.severity,
            notes: record.notes,
            preconditions: record.preconditions,
            postconditions: record.postconditions,
            api_sample: record.api_sample,
            automation: record.automation,
            estimated_minutes: record.estimated_minutes,
            tags: record.tags,
        }
    }
}

/// The eight fixed categories of a [`TestCaseDocument`], in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Positive,
    Negative,
    Edge,
    Setup,
    Security,
    Api,
    Stress,
    Recommendations,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Positive,
        Section::Negative,
        Section::Edge,
        Section::Setup,
        Section::Security,
        Section::Api,
        Section::Stress,
        Section::Recommendations,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::Positive => "positive",
            Section::Negative => "negative",
            Section::Edge => "edge",
            Section::Setup => "setup",
            Section::Security => "security",
            Section::Api => "api",
            Section::Stress => "stress",
            Section::Recommendations => "recommendations",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCaseDocument {
    pub positive: Vec<TestCase>,
    pub negative: Vec<TestCase>,
    pub edge: Vec<TestCase>,
    pub setup: Vec<TestCase>,
    pub security: Vec<TestCase>,
    pub api: Vec<TestCase>,
    pub stress: Vec<TestCase>,
    pub recommendations: Vec<TestCase>,
}

impl TestCaseDocument {
    pub fn section(&self, section: Section) -> &[TestCase] {
        match section {
            Section::Positive => &self.positive,
            Section::Negative => &self.negative,
            Section::Edge => &self.edge,
            Section::Setup => &self.setup,
            Section::Security => &self.security,
            Section::Api => &self.api,
            Section::Stress => &self.stress,
            Section::Recommendations => &self.recommendations,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<TestCase> {
        match section {
            Section::Positive => &mut self.positive,
            Section::Negative => &mut self.negative,
            Section::Edge => &mut self.edge,
            Section::Setup => &mut self.setup,
            Section::Security => &mut self.security,
            Section::Api => &mut self.api,
            Section::Stress => &mut self.stress,
            Section::Recommendations => &mut self.recommendations,
        }
    }

    pub fn push(&mut self, section: Section, case: TestCase) {
        self.section_mut(section).push(case);
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL
            .iter()
            .all(|section| self.section(*section).is_empty())
    }

    pub fn len(&self) -> usize {
        Section::ALL
            .iter()
            .map(|section| self.section(*section).len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_json_yields_complete_case() {
        let case: TestCase = serde_json::from_value(json!({
            "title": "Login works",
            "severity": "High"
        }))
        .unwrap();
        assert_eq!(case.title, "Login works");
        assert!(case.steps.is_empty());
        assert_eq!(case.expected, "");
        assert_eq!(case.priority, Severity::High);
        assert!(case.api_sample.is_none());
    }

    #[test]
    fn test_explicit_priority_is_kept() {
        let case: TestCase = serde_json::from_value(json!({
            "title": "t",
            "severity": "Low",
            "priority": "Critical"
        }))
        .unwrap();
        assert_eq!(case.severity, Severity::Low);
        assert_eq!(case.priority, Severity::Critical);
    }

    #[test]
    fn test_case_serializes_camel_case_keys() {
        let mut case = TestCase::titled("Upload avatar");
        case.estimated_minutes = Some(5.0);
        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["estimatedMinutes"], json!(5.0));
        assert_eq!(value["priority"], json!("Medium"));
        assert!(value.get("apiSample").is_some());
    }

    #[test]
    fn test_document_always_has_eight_keys() {
        let value = serde_json::to_value(TestCaseDocument::default()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        let expected: Vec<&str> = Section::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_document_push_and_len() {
        let mut doc = TestCaseDocument::default();
        assert!(doc.is_empty());
        doc.push(Section::Stress, TestCase::titled("burst"));
        doc.push(Section::Stress, TestCase::titled("soak"));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.stress[1].title, "soak");
    }
}
