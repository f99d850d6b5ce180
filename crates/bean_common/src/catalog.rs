//! Fixed bean pest catalog
//!
//! The catalog is a literal dataset compiled into the binary. It is validated
//! once when an entity store is built from it; a violation is a programming
//! error, not a user-facing one.

use crate::types::{is_canonical_symptom, Control, ControlType, Pest, RiskLevel, Severity};
use std::collections::HashSet;

/// Raw pest and control definitions, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub pests: Vec<Pest>,
    pub controls: Vec<Control>,
}

impl Catalog {
    pub fn new(pests: Vec<Pest>, controls: Vec<Control>) -> Self {
        Self { pests, controls }
    }

    /// Check the catalog invariants, returning every violation found
    pub fn validate(&self) -> Vec<CatalogViolation> {
        let mut violations = Vec::new();

        let mut seen_pests = HashSet::new();
        for pest in &self.pests {
            if pest.id.is_empty() {
                violations.push(CatalogViolation::EmptyId { kind: "pest" });
            }
            if !seen_pests.insert(pest.id.as_str()) {
                violations.push(CatalogViolation::DuplicatePest(pest.id.clone()));
            }
            if pest.symptoms.is_empty() {
                violations.push(CatalogViolation::NoSymptoms(pest.id.clone()));
            }

            let mut seen_symptoms = HashSet::new();
            for symptom in &pest.symptoms {
                if !is_canonical_symptom(symptom) {
                    violations.push(CatalogViolation::NonCanonicalSymptom {
                        pest: pest.id.clone(),
                        symptom: symptom.clone(),
                    });
                }
                if !seen_symptoms.insert(symptom.as_str()) {
                    violations.push(CatalogViolation::DuplicateSymptom {
                        pest: pest.id.clone(),
                        symptom: symptom.clone(),
                    });
                }
            }
        }

        let mut seen_controls = HashSet::new();
        for control in &self.controls {
            if control.id.is_empty() {
                violations.push(CatalogViolation::EmptyId { kind: "control" });
            }
            if !seen_controls.insert(control.id.as_str()) {
                violations.push(CatalogViolation::DuplicateControl(control.id.clone()));
            }
        }

        violations
    }
}

/// A broken catalog invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogViolation {
    #[error("{kind} with empty id")]
    EmptyId { kind: &'static str },

    #[error("duplicate pest id '{0}'")]
    DuplicatePest(String),

    #[error("duplicate control id '{0}'")]
    DuplicateControl(String),

    #[error("pest '{0}' has no symptoms")]
    NoSymptoms(String),

    #[error("pest '{pest}' lists symptom '{symptom}' more than once")]
    DuplicateSymptom { pest: String, symptom: String },

    #[error("pest '{pest}' has non-canonical symptom id '{symptom}'")]
    NonCanonicalSymptom { pest: String, symptom: String },
}

// ============================================================================
// Bean catalog
// ============================================================================

/// The shipped bean pest catalog
pub fn bean_catalog() -> Catalog {
    Catalog::new(bean_pests(), bean_controls())
}

fn bean_pests() -> Vec<Pest> {
    vec![
        Pest::new(
            "aphid",
            "Aphid",
            Severity::High,
            &["leaf_curling", "sticky_leaves", "stunted_growth", "honeydew_presence"],
            "Small sap-sucking insects that cause leaf curling and transmit viruses.",
        ),
        Pest::new(
            "whitefly",
            "Whitefly",
            Severity::High,
            &["yellowing_leaves", "sticky_leaves", "sooty_mold", "stunted_growth"],
            "Tiny white insects that feed on plant sap and excrete honeydew.",
        ),
        Pest::new(
            "spider_mite",
            "Spider Mite",
            Severity::Moderate,
            &["yellow_speckling", "fine_webbing", "leaf_drop"],
            "Tiny arachnids that cause yellow stippling on leaves.",
        ),
        Pest::new(
            "bean_beetle",
            "Bean Beetle",
            Severity::Moderate,
            &["holes_in_leaves", "skeletonized_leaves", "defoliation"],
            "Small beetles that feed on bean leaves and pods.",
        ),
        Pest::new(
            "thrips",
            "Thrips",
            Severity::Moderate,
            &["silvery_streaks", "distorted_growth", "black_feces"],
            "Tiny insects that scrape plant cells and suck the contents.",
        ),
    ]
}

fn bean_controls() -> Vec<Control> {
    vec![
        Control::new(
            "neem_oil",
            "Neem Oil",
            ControlType::Botanical,
            &["aphid", "whitefly", "spider_mite", "thrips"],
            0,
            RiskLevel::Low,
            "Natural oil that disrupts insect growth and repels pests. \
             Safe for beneficial insects when used as directed.",
        ),
        Control::new(
            "pyrethrin",
            "Pyrethrin",
            ControlType::Botanical,
            &["bean_beetle", "aphid", "thrips"],
            1,
            RiskLevel::Moderate,
            "Natural insecticide derived from chrysanthemum flowers. \
             Fast-acting but can harm beneficial insects.",
        ),
        Control::new(
            "spinosad",
            "Spinosad",
            ControlType::Biological,
            &["thrips", "bean_beetle", "aphid", "whitefly", "spider_mite"],
            1,
            RiskLevel::Low,
            "Naturally occurring substance toxic to many insects. Derived from soil bacteria.",
        ),
        Control::new(
            "insecticidal_soap",
            "Insecticidal Soap",
            ControlType::Chemical,
            &["aphid", "whitefly", "spider_mite"],
            0,
            RiskLevel::Low,
            "Contact insecticide that works by breaking down the insect's outer shell.",
        ),
        Control::new(
            "crop_rotation",
            "Crop Rotation",
            ControlType::Cultural,
            &["aphid", "whitefly", "spider_mite", "thrips", "bean_beetle"],
            0,
            RiskLevel::Low,
            "Practice of growing different crops in sequence to disrupt pest life cycles.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bean_catalog_is_valid() {
        let catalog = bean_catalog();
        assert_eq!(catalog.validate(), vec![]);
        assert_eq!(catalog.pests.len(), 5);
        assert_eq!(catalog.controls.len(), 5);
    }

    #[test]
    fn test_bean_catalog_targets_resolve() {
        let catalog = bean_catalog();
        let pest_ids: HashSet<&str> = catalog.pests.iter().map(|p| p.id.as_str()).collect();
        for control in &catalog.controls {
            for target in &control.target_pests {
                assert!(pest_ids.contains(target.as_str()), "{} -> {}", control.id, target);
            }
        }
    }

    #[test]
    fn test_validate_reports_violations() {
        let catalog = Catalog::new(
            vec![
                Pest::new("mite", "Mite", Severity::Low, &[], "no symptoms"),
                Pest::new("mite", "Mite again", Severity::Low, &["Leaf Drop", "x", "x"], ""),
            ],
            vec![Control::new("", "Nameless", ControlType::Cultural, &[], 0, RiskLevel::Low, "")],
        );

        let violations = catalog.validate();
        assert!(violations.contains(&CatalogViolation::NoSymptoms("mite".to_string())));
        assert!(violations.contains(&CatalogViolation::DuplicatePest("mite".to_string())));
        assert!(violations.contains(&CatalogViolation::NonCanonicalSymptom {
            pest: "mite".to_string(),
            symptom: "Leaf Drop".to_string(),
        }));
        assert!(violations.contains(&CatalogViolation::DuplicateSymptom {
            pest: "mite".to_string(),
            symptom: "x".to_string(),
        }));
        assert!(violations.contains(&CatalogViolation::EmptyId { kind: "control" }));
    }
}
