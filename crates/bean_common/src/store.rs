//! Entity Store - immutable pest and control definitions
//!
//! Built once from a [`Catalog`]; read-only afterwards. Iteration follows
//! catalog declaration order.

use crate::catalog::Catalog;
use crate::error::KbError;
use crate::types::{Control, Pest};
use std::collections::HashMap;

/// Pest and control records keyed by id
#[derive(Debug)]
pub struct EntityStore {
    pests: Vec<Pest>,
    controls: Vec<Control>,
    /// Pest id -> position in `pests`
    pests_by_id: HashMap<String, usize>,
    /// Control id -> position in `controls`
    controls_by_id: HashMap<String, usize>,
}

impl EntityStore {
    /// Build the store, panicking if the catalog breaks an invariant
    pub fn new(catalog: Catalog) -> Self {
        let violations = catalog.validate();
        assert!(
            violations.is_empty(),
            "invalid pest catalog: {}",
            violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        );

        let pests_by_id = catalog
            .pests
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let controls_by_id = catalog
            .controls
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Self {
            pests: catalog.pests,
            controls: catalog.controls,
            pests_by_id,
            controls_by_id,
        }
    }

    pub fn get_pest(&self, id: &str) -> Result<&Pest, KbError> {
        self.pests_by_id
            .get(id)
            .map(|&i| &self.pests[i])
            .ok_or_else(|| KbError::PestNotFound(id.to_string()))
    }

    pub fn get_control(&self, id: &str) -> Result<&Control, KbError> {
        self.controls_by_id
            .get(id)
            .map(|&i| &self.controls[i])
            .ok_or_else(|| KbError::ControlNotFound(id.to_string()))
    }

    pub fn contains_pest(&self, id: &str) -> bool {
        self.pests_by_id.contains_key(id)
    }

    pub fn contains_control(&self, id: &str) -> bool {
        self.controls_by_id.contains_key(id)
    }

    pub fn all_pests(&self) -> &[Pest] {
        &self.pests
    }

    pub fn all_controls(&self) -> &[Control] {
        &self.controls
    }

    /// Catalog position of a control, used to keep result ordering stable
    pub(crate) fn control_position(&self, id: &str) -> Option<usize> {
        self.controls_by_id.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::bean_catalog;
    use crate::types::{ControlType, RiskLevel, Severity};

    #[test]
    fn test_lookup() {
        let store = EntityStore::new(bean_catalog());
        assert_eq!(store.get_pest("aphid").unwrap().name, "Aphid");
        assert_eq!(store.get_control("neem_oil").unwrap().name, "Neem Oil");
        assert!(store.contains_pest("thrips"));
        assert!(!store.contains_control("thrips"));
    }

    #[test]
    fn test_not_found() {
        let store = EntityStore::new(bean_catalog());
        assert_eq!(
            store.get_pest("locust").unwrap_err(),
            KbError::PestNotFound("locust".to_string())
        );
        assert!(store.get_control("ddt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_declaration_order() {
        let store = EntityStore::new(bean_catalog());
        let ids: Vec<&str> = store.all_pests().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["aphid", "whitefly", "spider_mite", "bean_beetle", "thrips"]);
        assert_eq!(store.control_position("crop_rotation"), Some(4));
    }

    #[test]
    #[should_panic(expected = "has no symptoms")]
    fn test_empty_symptoms_is_fatal() {
        let catalog = Catalog::new(
            vec![Pest::new("ghost", "Ghost", Severity::Low, &[], "invisible")],
            vec![Control::new(
                "hope",
                "Hope",
                ControlType::Cultural,
                &["ghost"],
                0,
                RiskLevel::Low,
                "",
            )],
        );
        EntityStore::new(catalog);
    }
}
