//! AI-integration safety checklist. Five heuristic checks over the full
//! concatenated project text; intentionally coarse pattern matching, not
//! code analysis, so false positives and negatives are expected.

use crate::models::{CheckOutcome, ModelSafetyReport, SafetyCheckResult};
use regex::Regex;
use std::sync::LazyLock;

pub struct SafetyCheck {
    pub name: &'static str,
    pub run: fn(&str) -> CheckOutcome,
}

static SAFETY_CHECKS: [SafetyCheck; 5] = [
    SafetyCheck {
        name: "BAA Coverage",
        run: check_baa_coverage,
    },
    SafetyCheck {
        name: "PHI in Prompts",
        run: check_phi_in_prompts,
    },
    SafetyCheck {
        name: "Response Logging",
        run: check_response_logging,
    },
    SafetyCheck {
        name: "Model Context Limits",
        run: check_context_limits,
    },
    SafetyCheck {
        name: "Error Handling",
        run: check_error_handling,
    },
];

pub fn all_safety_checks() -> Vec<&'static SafetyCheck> {
    SAFETY_CHECKS.iter().collect()
}

/// Run the full checklist over concatenated project code.
pub fn run_safety_checks(code: &str) -> Vec<SafetyCheckResult> {
    all_safety_checks()
        .iter()
        .map(|check| {
            let outcome = (check.run)(code);
            SafetyCheckResult {
                name: check.name.to_string(),
                passed: outcome.passed,
                details: outcome.details,
            }
        })
        .collect()
}

/// Percentage of passed checks, rounded to the nearest integer.
pub fn safety_score(checks: &[SafetyCheckResult]) -> u8 {
    if checks.is_empty() {
        return 0;
    }
    let passed = checks.iter().filter(|c| c.passed).count();
    ((passed as f64 / checks.len() as f64) * 100.0).round() as u8
}

/// Checklist results wrapped in the project-level report shape.
pub fn grade_project(code: &str) -> ModelSafetyReport {
    let checks = run_safety_checks(code);
    let score = safety_score(&checks);
    ModelSafetyReport {
        model_name: "Project AI Integration".to_string(),
        provider: "Various".to_string(),
        safety_score: score,
        checks,
    }
}

const BAA_PROVIDERS: [&str; 4] = ["openai", "anthropic", "google", "azure"];

fn check_baa_coverage(code: &str) -> CheckOutcome {
    let lowered = code.to_lowercase();
    let used: Vec<&str> = BAA_PROVIDERS
        .iter()
        .copied()
        .filter(|p| lowered.contains(p))
        .collect();
    let passed = used.is_empty() || code.contains("BAA") || code.contains("HIPAA");
    let details = if used.is_empty() {
        "No external AI providers detected.".to_string()
    } else {
        format!(
            "Detected AI providers: {}. Ensure BAA is in place.",
            used.join(", ")
        )
    };
    CheckOutcome { passed, details }
}

static RE_PROMPT_PATIENT: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)prompt.*patient"));
static RE_MESSAGES_SSN: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)messages.*name.*ssn"));
static RE_CONTENT_DIAGNOSIS: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)content.*diagnosis"));

fn check_phi_in_prompts(code: &str) -> CheckOutcome {
    let suspicious = RE_PROMPT_PATIENT.is_match(code)
        || RE_MESSAGES_SSN.is_match(code)
        || RE_CONTENT_DIAGNOSIS.is_match(code);
    CheckOutcome {
        passed: !suspicious,
        details: if suspicious {
            "Detected potential PHI being sent to AI models. De-identify data before sending."
                .to_string()
        } else {
            "No obvious PHI in AI prompts detected.".to_string()
        },
    }
}

static RE_CONSOLE_LOG_RESPONSE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)console\.log.*response"));
static RE_LOGGER_AI_RESPONSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)logger.*ai.*response"));
static RE_FS_WRITE_RESPONSE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)fs\.write.*response"));

fn check_response_logging(code: &str) -> CheckOutcome {
    let unsafe_logging = RE_CONSOLE_LOG_RESPONSE.is_match(code)
        || RE_LOGGER_AI_RESPONSE.is_match(code)
        || RE_FS_WRITE_RESPONSE.is_match(code);
    CheckOutcome {
        passed: !unsafe_logging,
        details: if unsafe_logging {
            "AI responses may contain PHI. Ensure logging is compliant.".to_string()
        } else {
            "No unsafe AI response logging detected.".to_string()
        },
    }
}

static RE_MAX_TOKENS: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)max_tokens|maxtokens|max_length"));

fn check_context_limits(code: &str) -> CheckOutcome {
    let has_limit = RE_MAX_TOKENS.is_match(code);
    CheckOutcome {
        passed: has_limit,
        details: if has_limit {
            "Token limits configured for AI models.".to_string()
        } else {
            "Consider setting max_tokens to limit response size and costs.".to_string()
        },
    }
}

static RE_TRY_CATCH: LazyLock<Regex> = LazyLock::new(|| re(r"(?s)try\s*\{.*?catch"));
static RE_CATCH_CALL: LazyLock<Regex> = LazyLock::new(|| re(r"\.catch\s*\("));

fn check_error_handling(code: &str) -> CheckOutcome {
    let passed = RE_TRY_CATCH.is_match(code) || RE_CATCH_CALL.is_match(code);
    CheckOutcome {
        passed,
        details: if passed {
            "Error handling present for AI calls.".to_string()
        } else {
            "Add error handling for AI API calls to prevent PHI leakage in error messages."
                .to_string()
        },
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in safety pattern must compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baa_passes_without_providers() {
        let outcome = check_baa_coverage("const x = 1;");
        assert!(outcome.passed);
        assert_eq!(outcome.details, "No external AI providers detected.");
    }

    #[test]
    fn test_baa_fails_on_uncovered_provider() {
        let outcome = check_baa_coverage("import OpenAI from 'openai';");
        assert!(!outcome.passed);
        assert!(outcome.details.contains("openai"));
    }

    #[test]
    fn test_baa_passes_when_covered() {
        let outcome = check_baa_coverage("// openai usage is under our BAA");
        assert!(outcome.passed);
    }

    #[test]
    fn test_phi_in_prompts() {
        assert!(!check_phi_in_prompts("const prompt = `Summarize patient chart`;").passed);
        assert!(check_phi_in_prompts("const prompt = 'Summarize this document';").passed);
    }

    #[test]
    fn test_response_logging() {
        assert!(!check_response_logging("console.log(aiResponse)").passed);
        assert!(check_response_logging("console.log('starting up')").passed);
    }

    #[test]
    fn test_error_handling_variants() {
        assert!(check_error_handling("try {\n  call();\n} catch (e) {}").passed);
        assert!(check_error_handling("call().catch(handle)").passed);
        assert!(!check_error_handling("call();").passed);
    }

    #[test]
    fn test_score_rounding() {
        let mut checks = run_safety_checks("");
        assert_eq!(checks.len(), 5);
        // 3 of 5 pass on empty input (limits and error handling fail).
        assert_eq!(safety_score(&checks), 60);

        checks.iter_mut().for_each(|c| c.passed = true);
        assert_eq!(safety_score(&checks), 100);

        checks.iter_mut().for_each(|c| c.passed = false);
        assert_eq!(safety_score(&checks), 0);
    }

    #[test]
    fn test_trigger_free_text_scores_sixty() {
        // No provider names, no prompt patterns, no logging patterns,
        // no token limit, no try/catch: the three absence-passing checks
        // hold and the two presence-requiring checks fail.
        let report = grade_project("function add(a, b) { return a + b; }");
        assert_eq!(report.safety_score, 60);
        let passed: Vec<bool> = report.checks.iter().map(|c| c.passed).collect();
        assert_eq!(passed, [true, true, true, false, false]);
    }
}
