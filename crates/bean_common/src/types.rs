//! Core catalog types - pests, controls and the closed enumerations they carry
//!
//! Severity and risk level are ordered by an explicit ordinal table
//! (Low < Moderate < High), never by their names.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

// ============================================================================
// Enumerations
// ============================================================================

/// How much damage a pest does to the crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    /// Position in the Low < Moderate < High ordering
    pub fn ordinal(self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Moderate => 1,
            Severity::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk a control poses to beneficial insects, people and the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Position in the Low < Moderate < High ordering
    pub fn ordinal(self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }

    /// Edge label used in the relationship graph, e.g. `controls_low`
    pub fn relationship_label(self) -> String {
        format!("controls_{}", self.as_str().to_lowercase())
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of control method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Chemical,
    Biological,
    Botanical,
    Cultural,
}

impl ControlType {
    pub const ALL: [ControlType; 4] = [
        ControlType::Chemical,
        ControlType::Biological,
        ControlType::Botanical,
        ControlType::Cultural,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ControlType::Chemical => "Chemical",
            ControlType::Biological => "Biological",
            ControlType::Botanical => "Botanical",
            ControlType::Cultural => "Cultural",
        }
    }

    /// Parse a user-supplied control type name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A pest and the symptoms it produces
///
/// Equality and hashing use `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pest {
    /// Stable unique key (e.g. "aphid")
    pub id: String,
    /// Display name
    pub name: String,
    pub severity: Severity,
    /// Canonical snake_case symptom ids, never empty
    pub symptoms: Vec<String>,
    pub description: String,
}

impl Pest {
    pub fn new(
        id: &str,
        name: &str,
        severity: Severity,
        symptoms: &[&str],
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            severity,
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            description: description.to_string(),
        }
    }

    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    /// Symptoms in display form, in catalog order
    pub fn symptom_labels(&self) -> Vec<String> {
        self.symptoms.iter().map(|s| symptom_label(s)).collect()
    }
}

impl PartialEq for Pest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pest {}

impl Hash for Pest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A pesticide or cultural practice that suppresses pests
///
/// `target_pests` is kept exactly as declared, including ids that do not
/// resolve to a known pest. Equality and hashing use `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub name: String,
    pub control_type: ControlType,
    /// Declared target pest ids
    pub target_pests: Vec<String>,
    /// Minimum days between application and safe harvest
    pub pre_harvest_interval: u32,
    pub risk_level: RiskLevel,
    pub description: String,
}

impl Control {
    pub fn new(
        id: &str,
        name: &str,
        control_type: ControlType,
        target_pests: &[&str],
        pre_harvest_interval: u32,
        risk_level: RiskLevel,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            control_type,
            target_pests: target_pests.iter().map(|s| s.to_string()).collect(),
            pre_harvest_interval,
            risk_level,
            description: description.to_string(),
        }
    }

    /// Whether this control declares the pest as a target
    pub fn declares_target(&self, pest_id: &str) -> bool {
        self.target_pests.iter().any(|p| p == pest_id)
    }
}

impl PartialEq for Control {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Control {}

impl Hash for Control {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// Symptom ids
// ============================================================================

/// Display form of a symptom id: separators become spaces, each word title-cased
///
/// `"holes_in_leaves"` -> `"Holes In Leaves"`
pub fn symptom_label(symptom: &str) -> String {
    symptom
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Canonical snake_case form of user input ("Holes in leaves" -> "holes_in_leaves")
pub fn canonical_symptom(input: &str) -> String {
    input
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether a symptom id is already in canonical form
pub fn is_canonical_symptom(symptom: &str) -> bool {
    !symptom.is_empty() && canonical_symptom(symptom) == symptom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_order_is_ordinal_not_lexical() {
        // "High" < "Low" < "Moderate" alphabetically
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
        let mut levels = vec![RiskLevel::High, RiskLevel::Low, RiskLevel::Moderate];
        levels.sort();
        assert_eq!(levels, vec![RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High]);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Low < Severity::High);
        assert_eq!(Severity::Moderate.ordinal(), 1);
    }

    #[test]
    fn test_relationship_label() {
        assert_eq!(RiskLevel::Low.relationship_label(), "controls_low");
        assert_eq!(RiskLevel::Moderate.relationship_label(), "controls_moderate");
        assert_eq!(RiskLevel::High.relationship_label(), "controls_high");
    }

    #[test]
    fn test_symptom_label() {
        assert_eq!(symptom_label("holes_in_leaves"), "Holes In Leaves");
        assert_eq!(symptom_label("sooty_mold"), "Sooty Mold");
        assert_eq!(symptom_label("defoliation"), "Defoliation");
    }

    #[test]
    fn test_canonical_symptom() {
        assert_eq!(canonical_symptom("Holes In Leaves"), "holes_in_leaves");
        assert_eq!(canonical_symptom("  leaf-curling "), "leaf_curling");
        assert_eq!(canonical_symptom("sticky_leaves"), "sticky_leaves");
        assert!(is_canonical_symptom("sticky_leaves"));
        assert!(!is_canonical_symptom("Sticky Leaves"));
        assert!(!is_canonical_symptom(""));
    }

    #[test]
    fn test_control_type_parse() {
        assert_eq!(ControlType::parse("botanical"), Some(ControlType::Botanical));
        assert_eq!(ControlType::parse(" Cultural "), Some(ControlType::Cultural));
        assert_eq!(ControlType::parse("magic"), None);
    }

    #[test]
    fn test_entity_equality_uses_id() {
        let a = Pest::new("aphid", "Aphid", Severity::High, &["leaf_curling"], "x");
        let b = Pest::new("aphid", "Different", Severity::Low, &["other"], "y");
        assert_eq!(a, b);
    }
}
