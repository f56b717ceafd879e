use serde::{Deserialize, Serialize};

/// Severity of a potential smuggling finding, taken from the marker symbol
/// the scanner prints in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// `[+]` marker.
    High,
    /// `[!]` marker.
    Medium,
}

impl Severity {
    /// Map a marker symbol to its severity. Only `+` and `!` are markers.
    pub fn from_marker(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Severity::High),
            '!' => Some(Severity::Medium),
            _ => None,
        }
    }
}

/// Which desync the scanner reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmugglingClass {
    /// Front end honors Content-Length, back end honors Transfer-Encoding.
    ClTe,
    /// Front end honors Transfer-Encoding, back end honors Content-Length.
    TeCl,
}

impl SmugglingClass {
    /// Keyword as it appears in scanner output.
    pub fn keyword(&self) -> &'static str {
        match self {
            SmugglingClass::ClTe => "CL.TE",
            SmugglingClass::TeCl => "TE.CL",
        }
    }
}

/// A single potential vulnerability reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Mutation (request variant) that triggered the desync, e.g. `nameprefix1`.
    pub mutation: String,
    pub severity: Severity,
}

/// Findings grouped by class, each list in order of appearance. Repeated
/// marker lines produce repeated entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSet {
    pub cl_te: Vec<Finding>,
    pub te_cl: Vec<Finding>,
}

impl FindingSet {
    pub fn push(&mut self, class: SmugglingClass, finding: Finding) {
        match class {
            SmugglingClass::ClTe => self.cl_te.push(finding),
            SmugglingClass::TeCl => self.te_cl.push(finding),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cl_te.is_empty() && self.te_cl.is_empty()
    }
}
