use super::bundles::{
    Domain, BASELINE_RECOMMENDATION, DOMAIN_BUNDLES, GENERIC_NEGATIVE, GENERIC_POSITIVE,
};
use crate::domain::test_case::{Section, TestCaseDocument};

/// Domains whose keywords appear in `text`, in bundle order.
pub fn matched_domains(text: &str) -> Vec<Domain> {
    let lowered = text.to_lowercase();
    DOMAIN_BUNDLES
        .iter()
        .filter(|bundle| bundle.matches(&lowered))
        .map(|bundle| bundle.domain)
        .collect()
}

/// Builds a document purely from keywords in `text`. Deterministic and
/// infallible; `recommendations` always ends with the baseline entry.
pub fn generate_fallback(text: &str) -> TestCaseDocument {
    let lowered = text.to_lowercase();
    let mut document = TestCaseDocument::default();

    for bundle in DOMAIN_BUNDLES.iter().filter(|bundle| bundle.matches(&lowered)) {
        for (section, templates) in bundle.sections {
            let target = document.section_mut(*section);
            target.extend(templates.iter().map(|template| template.to_case()));
        }
    }

    if document.is_empty() {
        document.push(Section::Positive, GENERIC_POSITIVE.to_case());
        document.push(Section::Negative, GENERIC_NEGATIVE.to_case());
    }
    document.push(Section::Recommendations, BASELINE_RECOMMENDATION.to_case());

    document
}
