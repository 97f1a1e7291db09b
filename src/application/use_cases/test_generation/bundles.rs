//! Pre-authored test cases used when no provider answer is available.
//!
//! Each keyword domain owns a fixed table of `(section, cases)` rows. The
//! tables are plain data; [`super::fallback`] decides which ones apply.

use serde_json::{Map, Value};

use crate::domain::test_case::{Section, Severity, TestCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Authentication,
    Registration,
    FileUpload,
    Payment,
    Search,
    Admin,
}

#[derive(Debug)]
pub struct CaseTemplate {
    pub title: &'static str,
    pub steps: &'static [&'static str],
    pub inputs: &'static [(&'static str, &'static str)],
    pub expected: &'static str,
    pub severity: Severity,
    pub notes: &'static str,
    pub preconditions: &'static [&'static str],
    pub postconditions: &'static [&'static str],
    pub api_sample: Option<&'static str>,
    pub automation: Option<&'static str>,
    pub estimated_minutes: Option<u32>,
    pub tags: &'static [&'static str],
}

const fn case(
    title: &'static str,
    steps: &'static [&'static str],
    inputs: &'static [(&'static str, &'static str)],
    expected: &'static str,
    severity: Severity,
    notes: &'static str,
) -> CaseTemplate {
    CaseTemplate {
        title,
        steps,
        inputs,
        expected,
        severity,
        notes,
        preconditions: &[],
        postconditions: &[],
        api_sample: None,
        automation: None,
        estimated_minutes: None,
        tags: &[],
    }
}

impl CaseTemplate {
    pub fn to_case(&self) -> TestCase {
        let inputs: Map<String, Value> = self
            .inputs
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        let mut case = TestCase::new(
            self.title,
            to_strings(self.steps),
            inputs,
            self.expected,
            self.severity,
            self.notes,
        );
        case.preconditions = to_strings(self.preconditions);
        case.postconditions = to_strings(self.postconditions);
        case.api_sample = self.api_sample.map(|s| Value::String(s.to_string()));
        case.automation = self.automation.map(|s| Value::String(s.to_string()));
        case.estimated_minutes = self.estimated_minutes.map(f64::from);
        case.tags = to_strings(self.tags);
        case
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub struct DomainBundle {
    pub domain: Domain,
    pub keywords: &'static [&'static str],
    pub sections: &'static [(Section, &'static [CaseTemplate])],
}

impl DomainBundle {
    /// `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Evaluation order is the output order.
pub static DOMAIN_BUNDLES: [DomainBundle; 6] = [
    DomainBundle {
        domain: Domain::Authentication,
        keywords: &["login", "sign in", "authentication"],
        sections: &[
            (Section::Positive, AUTH_POSITIVE),
            (Section::Negative, AUTH_NEGATIVE),
            (Section::Edge, AUTH_EDGE),
            (Section::Security, AUTH_SECURITY),
            (Section::Stress, AUTH_STRESS),
        ],
    },
    DomainBundle {
        domain: Domain::Registration,
        keywords: &["register", "sign up", "registration", "email verification"],
        sections: &[
            (Section::Positive, REGISTRATION_POSITIVE),
            (Section::Negative, REGISTRATION_NEGATIVE),
            (Section::Edge, REGISTRATION_EDGE),
            (Section::Security, REGISTRATION_SECURITY),
            (Section::Api, REGISTRATION_API),
            (Section::Stress, REGISTRATION_STRESS),
        ],
    },
    DomainBundle {
        domain: Domain::FileUpload,
        keywords: &["upload", "file"],
        sections: &[
            (Section::Positive, UPLOAD_POSITIVE),
            (Section::Negative, UPLOAD_NEGATIVE),
            (Section::Security, UPLOAD_SECURITY),
        ],
    },
    DomainBundle {
        domain: Domain::Payment,
        keywords: &["pay", "payment", "checkout"],
        sections: &[
            (Section::Positive, PAYMENT_POSITIVE),
            (Section::Negative, PAYMENT_NEGATIVE),
            (Section::Api, PAYMENT_API),
        ],
    },
    DomainBundle {
        domain: Domain::Search,
        keywords: &["search", "find"],
        sections: &[
            (Section::Positive, SEARCH_POSITIVE),
            (Section::Edge, SEARCH_EDGE),
        ],
    },
    DomainBundle {
        domain: Domain::Admin,
        keywords: &["admin", "role management", "admin panel"],
        sections: &[
            (Section::Positive, ADMIN_POSITIVE),
            (Section::Negative, ADMIN_NEGATIVE),
            (Section::Edge, ADMIN_EDGE),
            (Section::Security, ADMIN_SECURITY),
            (Section::Api, ADMIN_API),
        ],
    },
];

pub static GENERIC_POSITIVE: CaseTemplate = CaseTemplate {
    tags: &["generic"],
    ..case(
        "Happy path from spec",
        &[
            "Read the main flow described in the document",
            "Execute the flow with valid, typical data",
            "Verify every documented outcome",
        ],
        &[],
        "The system behaves exactly as the document describes",
        Severity::High,
        "Generic case: no known feature keyword was found in the input.",
    )
};

pub static GENERIC_NEGATIVE: CaseTemplate = CaseTemplate {
    tags: &["generic"],
    ..case(
        "Validation errors",
        &[
            "Submit each form or request with required fields missing",
            "Submit values with the wrong type or format",
            "Check the error shown for each field",
        ],
        &[],
        "Invalid input is rejected with clear, field-level error messages",
        Severity::Medium,
        "Generic case: no known feature keyword was found in the input.",
    )
};

pub static BASELINE_RECOMMENDATION: CaseTemplate = CaseTemplate {
    tags: &["baseline", "operations"],
    ..case(
        "Add monitoring, rate-limiting and input validation",
        &[
            "Add request metrics and error alerts for every endpoint",
            "Apply rate limits to authentication and write endpoints",
            "Validate and sanitize all external input on the server",
        ],
        &[],
        "Failures are observable, abuse is throttled and bad input never reaches storage",
        Severity::Medium,
        "Baseline recommendation added to every generated document.",
    )
};

const AUTH_POSITIVE: &[CaseTemplate] = &[
    CaseTemplate {
        preconditions: &["A verified account exists for user@example.com"],
        postconditions: &["A session cookie is issued"],
        automation: Some("Playwright: fill #email and #password, click Sign in, expect URL /dashboard"),
        estimated_minutes: Some(5),
        tags: &["auth", "smoke"],
        ..case(
            "Login with valid credentials",
            &[
                "Open the login page",
                "Enter the registered email and the correct password",
                "Click Sign in",
            ],
            &[("email", "user@example.com"), ("password", "CorrectHorse1!")],
            "User lands on the dashboard and a session is created",
            Severity::High,
            "Core entry point; run on every build.",
        )
    },
    CaseTemplate {
        tags: &["auth"],
        ..case(
            "Login with remember me",
            &[
                "Open the login page",
                "Enter valid credentials and tick Remember me",
                "Sign in, close the browser and reopen the site",
            ],
            &[("email", "user@example.com"), ("remember", "true")],
            "User is still signed in after reopening the browser",
            Severity::Medium,
            "",
        )
    },
];

const AUTH_NEGATIVE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["auth"],
        ..case(
            "Login with wrong password",
            &["Open the login page", "Enter a registered email with a wrong password", "Submit"],
            &[("email", "user@example.com"), ("password", "wrong-password")],
            "A generic 'invalid email or password' error is shown and no session is created",
            Severity::High,
            "The message must not reveal whether the email exists.",
        )
    },
    CaseTemplate {
        tags: &["auth"],
        ..case(
            "Login with unregistered email",
            &["Open the login page", "Enter an email that has no account", "Submit"],
            &[("email", "nobody@example.com"), ("password", "Whatever1!")],
            "The same generic error as for a wrong password is shown",
            Severity::Medium,
            "",
        )
    },
    CaseTemplate {
        tags: &["auth", "validation"],
        ..case(
            "Login with empty fields",
            &["Open the login page", "Leave email and password empty", "Submit"],
            &[("email", ""), ("password", "")],
            "Both fields are flagged as required and no request is sent",
            Severity::Medium,
            "",
        )
    },
];

const AUTH_EDGE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["auth"],
        ..case(
            "Email with surrounding whitespace and mixed case",
            &["Enter ' User@Example.COM ' as the email", "Enter the correct password", "Submit"],
            &[("email", " User@Example.COM "), ("password", "CorrectHorse1!")],
            "Email is trimmed and matched case-insensitively; login succeeds",
            Severity::Low,
            "",
        )
    },
    CaseTemplate {
        tags: &["auth"],
        ..case(
            "Password at maximum allowed length",
            &["Set a password at the maximum allowed length", "Log in with it"],
            &[("password", "<max-length string>")],
            "Login succeeds and the password is not silently truncated",
            Severity::Low,
            "",
        )
    },
];

const AUTH_SECURITY: &[CaseTemplate] = &[
    CaseTemplate {
        postconditions: &["Account is temporarily locked", "A security event is logged"],
        tags: &["auth", "security", "brute-force"],
        ..case(
            "Lockout after repeated failed logins",
            &[
                "Submit a wrong password 5 times in a row for the same account",
                "Submit the correct password",
            ],
            &[("email", "user@example.com"), ("attempts", "5")],
            "Further attempts are blocked for the lockout window even with the right password",
            Severity::Critical,
            "",
        )
    },
    CaseTemplate {
        tags: &["auth", "security", "injection"],
        ..case(
            "SQL injection in login fields",
            &["Enter ' OR '1'='1 as email and password", "Submit"],
            &[("email", "' OR '1'='1"), ("password", "' OR '1'='1")],
            "Login fails with the normal error; no database error is exposed",
            Severity::Critical,
            "",
        )
    },
    CaseTemplate {
        tags: &["auth", "security", "session"],
        ..case(
            "Session cookie flags",
            &["Log in with valid credentials", "Inspect the session cookie"],
            &[],
            "Cookie is HttpOnly, Secure and SameSite; session id rotates after login",
            Severity::High,
            "",
        )
    },
];

const AUTH_STRESS: &[CaseTemplate] = &[CaseTemplate {
    estimated_minutes: Some(30),
    tags: &["auth", "performance"],
    ..case(
        "Concurrent logins",
        &["Simulate 500 users logging in within one minute", "Measure latency and error rate"],
        &[("users", "500"), ("window", "60s")],
        "p95 latency stays under 1s and no request fails with a server error",
        Severity::High,
        "",
    )
}];

const REGISTRATION_POSITIVE: &[CaseTemplate] = &[
    CaseTemplate {
        postconditions: &["Account exists in pending state", "Verification email is queued"],
        tags: &["registration", "smoke"],
        ..case(
            "Register with valid details",
            &[
                "Open the sign-up page",
                "Fill name, email and a strong password",
                "Accept the terms and submit",
            ],
            &[
                ("name", "Jane Doe"),
                ("email", "jane.doe@example.com"),
                ("password", "S3cure-Passw0rd"),
            ],
            "A confirmation screen asks the user to check their inbox",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        preconditions: &["A pending account exists with an unused verification email"],
        tags: &["registration", "email"],
        ..case(
            "Email verification link activates the account",
            &["Open the verification email", "Click the verification link", "Log in"],
            &[("email", "jane.doe@example.com")],
            "Account becomes active and login succeeds",
            Severity::High,
            "",
        )
    },
];

const REGISTRATION_NEGATIVE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["registration"],
        ..case(
            "Register with an email already in use",
            &["Open the sign-up page", "Use the email of an existing account", "Submit"],
            &[("email", "user@example.com")],
            "Registration is refused with a neutral message; no second account is created",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        tags: &["registration", "validation"],
        ..case(
            "Weak password is rejected",
            &["Fill the sign-up form with the password '12345'", "Submit"],
            &[("password", "12345")],
            "Password rules are shown and the form is not submitted",
            Severity::Medium,
            "",
        )
    },
    CaseTemplate {
        tags: &["registration", "email"],
        ..case(
            "Expired verification link",
            &["Wait until the verification link expires", "Click the link"],
            &[("tokenAge", "25h")],
            "An expiry message is shown with an option to resend the email",
            Severity::Medium,
            "",
        )
    },
];

const REGISTRATION_EDGE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["registration"],
        ..case(
            "Email with plus addressing and subdomain",
            &["Register with jane+qa@mail.example.co.uk", "Complete verification"],
            &[("email", "jane+qa@mail.example.co.uk")],
            "Registration and verification succeed",
            Severity::Low,
            "",
        )
    },
    CaseTemplate {
        tags: &["registration", "email"],
        ..case(
            "Resend verification several times",
            &["Request the verification email three times", "Click the link from the first email"],
            &[],
            "Only the latest link is valid, or all are valid; behaviour matches the documented rule",
            Severity::Low,
            "",
        )
    },
];

const REGISTRATION_SECURITY: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["registration", "security", "enumeration"],
        ..case(
            "Account enumeration through registration errors",
            &["Register with an existing and a new email", "Compare responses and timing"],
            &[],
            "Responses do not reveal which emails are already registered",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        tags: &["registration", "security", "token"],
        ..case(
            "Verification token cannot be reused or guessed",
            &[
                "Verify an account with its token",
                "Reuse the same token",
                "Try a modified token",
            ],
            &[],
            "Used and modified tokens are rejected; tokens have enough entropy",
            Severity::Critical,
            "",
        )
    },
];

const REGISTRATION_API: &[CaseTemplate] = &[
    CaseTemplate {
        api_sample: Some(
            r#"POST /api/users {"name":"Jane Doe","email":"jane.doe@example.com","password":"S3cure-Passw0rd"} -> 201 {"id":"...","status":"pending"}"#,
        ),
        tags: &["registration", "api"],
        ..case(
            "POST /api/users creates a pending user",
            &["Send a valid registration payload", "Check the status code and body"],
            &[("method", "POST"), ("path", "/api/users")],
            "201 Created with the new user id and status 'pending'; password is never returned",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        api_sample: Some(r#"POST /api/users {"email":"not-an-email"} -> 400 {"errors":{...}}"#),
        tags: &["registration", "api", "validation"],
        ..case(
            "POST /api/users rejects an invalid payload",
            &["Send a payload with a malformed email and no password"],
            &[("method", "POST"), ("path", "/api/users")],
            "400 Bad Request with per-field validation errors",
            Severity::Medium,
            "",
        )
    },
];

const REGISTRATION_STRESS: &[CaseTemplate] = &[CaseTemplate {
    estimated_minutes: Some(30),
    tags: &["registration", "performance"],
    ..case(
        "Registration burst",
        &["Create 200 accounts within one minute", "Monitor the email queue"],
        &[("accounts", "200")],
        "All accounts are created and verification emails are delivered without loss",
        Severity::Medium,
        "",
    )
}];

const UPLOAD_POSITIVE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["upload", "smoke"],
        ..case(
            "Upload a supported image",
            &["Choose a 500 KB PNG file", "Submit the upload form"],
            &[("file", "avatar.png"), ("size", "500KB")],
            "Upload succeeds and the returned URL serves the same image",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        tags: &["upload"],
        ..case(
            "Replace an existing file",
            &["Upload a file", "Upload a different file for the same item"],
            &[],
            "The newer file is shown; the older one is removed or versioned as documented",
            Severity::Medium,
            "",
        )
    },
];

const UPLOAD_NEGATIVE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["upload", "validation"],
        ..case(
            "Reject unsupported file type",
            &["Choose a .exe file", "Submit the upload form"],
            &[("file", "setup.exe")],
            "Upload is refused with a message listing allowed types",
            Severity::Medium,
            "",
        )
    },
    CaseTemplate {
        tags: &["upload", "validation"],
        ..case(
            "Reject file over the size limit",
            &["Choose a file larger than the configured limit", "Submit"],
            &[("size", "limit + 1 byte")],
            "Upload is refused with a size error and nothing is stored",
            Severity::Medium,
            "",
        )
    },
];

const UPLOAD_SECURITY: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["upload", "security", "path-traversal"],
        ..case(
            "File name path traversal is neutralized",
            &["Upload a file named ../../etc/passwd.png"],
            &[("file", "../../etc/passwd.png")],
            "The stored name is sanitized and the file stays inside the upload directory",
            Severity::Critical,
            "",
        )
    },
    CaseTemplate {
        tags: &["upload", "security"],
        ..case(
            "Executable disguised as an image",
            &["Rename a script to image.png", "Upload it and open the returned URL"],
            &[("file", "image.png (actually a script)")],
            "Content is validated or served with a safe content type; it never executes",
            Severity::Critical,
            "",
        )
    },
];

const PAYMENT_POSITIVE: &[CaseTemplate] = &[CaseTemplate {
    preconditions: &["Cart contains at least one item", "Payment provider is in test mode"],
    postconditions: &["Order is marked paid", "Receipt email is sent"],
    tags: &["payment", "smoke"],
    ..case(
        "Checkout with a valid card",
        &["Add an item to the cart", "Proceed to checkout", "Pay with test card 4242 4242 4242 4242"],
        &[("card", "4242424242424242"), ("expiry", "12/30"), ("cvc", "123")],
        "Payment succeeds and the order confirmation page is shown",
        Severity::Critical,
        "",
    )
}];

const PAYMENT_NEGATIVE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["payment"],
        ..case(
            "Declined card",
            &["Proceed to checkout", "Pay with a card the provider declines"],
            &[("card", "4000000000000002")],
            "A decline message is shown, the order stays unpaid and the cart is kept",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        tags: &["payment", "validation"],
        ..case(
            "Expired card",
            &["Enter a card with an expiry date in the past", "Submit payment"],
            &[("expiry", "01/20")],
            "The expiry field is flagged and no charge is attempted",
            Severity::Medium,
            "",
        )
    },
];

const PAYMENT_API: &[CaseTemplate] = &[
    CaseTemplate {
        api_sample: Some(r#"POST /api/payments {"orderId":"ord_123","amount":4999,"currency":"USD"} -> 201"#),
        tags: &["payment", "api"],
        ..case(
            "Create a payment for an order",
            &["Send a payment request for an existing order", "Check the stored amount"],
            &[("method", "POST"), ("path", "/api/payments")],
            "201 Created; amount and currency match the order total",
            Severity::High,
            "",
        )
    },
    CaseTemplate {
        tags: &["payment", "api", "idempotency"],
        ..case(
            "Payment webhook is idempotent",
            &["Deliver the same 'payment succeeded' webhook twice"],
            &[("event", "payment.succeeded")],
            "The order is marked paid once and only one receipt is sent",
            Severity::High,
            "",
        )
    },
];

const SEARCH_POSITIVE: &[CaseTemplate] = &[CaseTemplate {
    tags: &["search"],
    ..case(
        "Search by exact keyword",
        &["Enter a keyword that matches a known item", "Submit the search"],
        &[("query", "invoice")],
        "Matching items are listed with the most relevant first",
        Severity::Medium,
        "",
    )
}];

const SEARCH_EDGE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["search"],
        ..case(
            "Empty query",
            &["Submit the search with an empty box"],
            &[("query", "")],
            "A prompt to enter a term is shown, or a documented default list",
            Severity::Low,
            "",
        )
    },
    CaseTemplate {
        tags: &["search"],
        ..case(
            "Special characters in the query",
            &["Search for %_*\"<>' characters"],
            &[("query", "%_*\"<>'")],
            "No error page; characters are treated literally",
            Severity::Medium,
            "",
        )
    },
    CaseTemplate {
        tags: &["search"],
        ..case(
            "Query with no results",
            &["Search for a random string that matches nothing"],
            &[("query", "zzqxv-no-match")],
            "An empty-state message is shown",
            Severity::Low,
            "",
        )
    },
];

const ADMIN_POSITIVE: &[CaseTemplate] = &[CaseTemplate {
    preconditions: &["Signed in as an administrator"],
    postconditions: &["The change is recorded in the audit log"],
    tags: &["admin", "roles"],
    ..case(
        "Admin assigns a role to a user",
        &["Open the admin panel", "Select a user", "Assign the 'editor' role and save"],
        &[("user", "jane.doe@example.com"), ("role", "editor")],
        "The user gains editor permissions on their next request",
        Severity::High,
        "",
    )
}];

const ADMIN_NEGATIVE: &[CaseTemplate] = &[CaseTemplate {
    tags: &["admin", "authorization"],
    ..case(
        "Non-admin cannot open the admin panel",
        &["Sign in as a regular user", "Navigate directly to the admin panel URL"],
        &[("role", "user")],
        "Access is denied (403 or redirect) and no admin data is rendered",
        Severity::Critical,
        "",
    )
}];

const ADMIN_EDGE: &[CaseTemplate] = &[
    CaseTemplate {
        tags: &["admin", "roles"],
        ..case(
            "Admin removes their own admin role",
            &["Open your own user in the admin panel", "Remove the admin role"],
            &[],
            "The action is blocked, or requires confirmation when another admin remains",
            Severity::Medium,
            "",
        )
    },
    CaseTemplate {
        tags: &["admin", "roles"],
        ..case(
            "Role change while the user is signed in",
            &["Demote a user who has an active session", "Have that user perform an admin action"],
            &[],
            "The new role applies without waiting for the session to expire",
            Severity::Medium,
            "",
        )
    },
];

const ADMIN_SECURITY: &[CaseTemplate] = &[CaseTemplate {
    tags: &["admin", "security", "privilege-escalation"],
    ..case(
        "Privilege escalation by request tampering",
        &[
            "As a regular user, capture a profile update request",
            "Add a role=admin field and replay it",
        ],
        &[("role", "admin")],
        "The role field is ignored or rejected; the user stays non-admin",
        Severity::Critical,
        "",
    )
}];

const ADMIN_API: &[CaseTemplate] = &[CaseTemplate {
    api_sample: Some(r#"PATCH /api/users/{id}/role {"role":"editor"} with admin token -> 200, user token -> 403"#),
    tags: &["admin", "api"],
    ..case(
        "Role endpoint requires an admin token",
        &["Call the role endpoint with an admin token", "Repeat with a regular user token"],
        &[("method", "PATCH"), ("path", "/api/users/{id}/role")],
        "200 for the admin token, 403 for the user token",
        Severity::High,
        "",
    )
}];

#[cfg(test)]
mod tests {
    use super::*;

    fn sections_of(domain: Domain) -> Vec<Section> {
        DOMAIN_BUNDLES
            .iter()
            .find(|bundle| bundle.domain == domain)
            .map(|bundle| bundle.sections.iter().map(|(section, _)| *section).collect())
            .unwrap()
    }

    #[test]
    fn test_bundle_order_is_fixed() {
        let order: Vec<Domain> = DOMAIN_BUNDLES.iter().map(|b| b.domain).collect();
        assert_eq!(
            order,
            vec![
                Domain::Authentication,
                Domain::Registration,
                Domain::FileUpload,
                Domain::Payment,
                Domain::Search,
                Domain::Admin,
            ]
        );
    }

    #[test]
    fn test_authentication_sections() {
        assert_eq!(
            sections_of(Domain::Authentication),
            vec![Section::Positive, Section::Negative, Section::Edge, Section::Security, Section::Stress]
        );
    }

    #[test]
    fn test_registration_sections() {
        assert_eq!(
            sections_of(Domain::Registration),
            vec![
                Section::Positive,
                Section::Negative,
                Section::Edge,
                Section::Security,
                Section::Api,
                Section::Stress,
            ]
        );
    }

    #[test]
    fn test_upload_payment_search_admin_sections() {
        assert_eq!(
            sections_of(Domain::FileUpload),
            vec![Section::Positive, Section::Negative, Section::Security]
        );
        assert_eq!(
            sections_of(Domain::Payment),
            vec![Section::Positive, Section::Negative, Section::Api]
        );
        assert_eq!(sections_of(Domain::Search), vec![Section::Positive, Section::Edge]);
        assert_eq!(
            sections_of(Domain::Admin),
            vec![Section::Positive, Section::Negative, Section::Edge, Section::Security, Section::Api]
        );
    }

    #[test]
    fn test_no_bundle_writes_setup_or_recommendations() {
        for bundle in DOMAIN_BUNDLES.iter() {
            for (section, _) in bundle.sections {
                assert_ne!(*section, Section::Setup);
                assert_ne!(*section, Section::Recommendations);
            }
        }
    }

    #[test]
    fn test_every_template_is_complete() {
        let all = DOMAIN_BUNDLES
            .iter()
            .flat_map(|bundle| bundle.sections.iter())
            .flat_map(|(_, cases)| cases.iter())
            .chain([&GENERIC_POSITIVE, &GENERIC_NEGATIVE, &BASELINE_RECOMMENDATION]);
        for template in all {
            let case = template.to_case();
            assert!(!case.title.is_empty());
            assert!(!case.steps.is_empty(), "{} has no steps", case.title);
            assert!(!case.expected.is_empty(), "{} has no expectation", case.title);
            assert_eq!(case.priority, case.severity);
        }
    }

    #[test]
    fn test_to_case_keeps_input_order() {
        let case = REGISTRATION_POSITIVE[0].to_case();
        let keys: Vec<&str> = case.inputs.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_keyword_match_is_substring() {
        let payment = &DOMAIN_BUNDLES[3];
        assert!(payment.matches("go to checkout"));
        assert!(payment.matches("repayment schedule"));
        assert!(!payment.matches("lorem ipsum"));
    }
}
