use std::sync::LazyLock;

use regex::Regex;
use crate::models::finding::{Finding, FindingSet, Severity, SmugglingClass};

static CL_TE_MARKER: LazyLock<Regex> = LazyLock::new(|| marker_regex(SmugglingClass::ClTe));
static TE_CL_MARKER: LazyLock<Regex> = LazyLock::new(|| marker_regex(SmugglingClass::TeCl));

/// `[+] Potential CL.TE Vulnerability Found (mutation)`. The phrase is
/// matched case-insensitively; the mutation token is ASCII word characters.
fn marker_regex(class: SmugglingClass) -> Regex {
    let pattern = format!(
        r"\[([+!])\] (?i:potential {} vulnerability found) \(([0-9A-Za-z_]+)\)",
        regex::escape(class.keyword())
    );
    Regex::new(&pattern).expect("marker pattern is valid")
}

fn marker(class: SmugglingClass) -> &'static Regex {
    match class {
        SmugglingClass::ClTe => &CL_TE_MARKER,
        SmugglingClass::TeCl => &TE_CL_MARKER,
    }
}

/// Collect every finding marker in already-sanitized scanner output.
///
/// Each class is scanned independently, left to right. Text without markers
/// yields an empty set.
pub fn extract_findings(text: &str) -> FindingSet {
    let mut findings = FindingSet::default();

    for class in [SmugglingClass::ClTe, SmugglingClass::TeCl] {
        for caps in marker(class).captures_iter(text) {
            let severity = caps[1].chars().next().and_then(Severity::from_marker);
            if let Some(severity) = severity {
                findings.push(class, Finding { mutation: caps[2].to_string(), severity });
            }
        }
    }

    findings
}
