use crate::domain::test_case::Section;

pub(crate) fn build_system_prompt() -> String {
    let keys: Vec<&str> = Section::ALL.iter().map(|section| section.key()).collect();
    format!(
        "You are a senior QA engineer. Turn the product description into test cases. Return JSON with arrays: {}. Each item: {{title, steps, inputs, expected, severity, notes, preconditions, postconditions, apiSample, automation, priority, estimatedMinutes, tags}}. severity and priority are one of Low, Medium, High, Critical. Return only JSON.",
        keys.join(", ")
    )
}

pub(crate) fn build_user_prompt(text: &str, context: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        body.push_str(&format!("Context: {}\n\n", context));
    }
    body.push_str("Description:\n");
    body.push_str(text.trim());
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_every_section() {
        let prompt = build_system_prompt();
        for section in Section::ALL {
            assert!(prompt.contains(section.key()), "missing {}", section.key());
        }
        assert!(prompt.ends_with("Return only JSON."));
    }

    #[test]
    fn test_user_prompt_skips_blank_context() {
        assert_eq!(build_user_prompt(" login ", Some("  ")), "Description:\nlogin\n");
        let with_context = build_user_prompt("login", Some("mobile app"));
        assert!(with_context.starts_with("Context: mobile app\n\n"));
    }
}
