//! Symptom Index - inverted index from symptom id to the pests showing it
//!
//! No symptom is pre-registered. A symptom nobody lists simply has an empty
//! bucket.

use crate::error::KbError;
use crate::store::EntityStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Symptom id -> pest ids, in pest declaration order
#[derive(Debug)]
pub struct SymptomIndex {
    store: Arc<EntityStore>,
    buckets: HashMap<String, Vec<String>>,
}

impl SymptomIndex {
    /// Walk every pest once, appending its id to each of its symptoms' buckets
    pub fn build(store: Arc<EntityStore>) -> Self {
        let mut buckets: HashMap<String, Vec<String>> = HashMap::new();
        for pest in store.all_pests() {
            for symptom in &pest.symptoms {
                buckets
                    .entry(symptom.clone())
                    .or_default()
                    .push(pest.id.clone());
            }
        }

        debug!(
            symptoms = buckets.len(),
            pests = store.all_pests().len(),
            "Built symptom index"
        );

        Self { store, buckets }
    }

    /// Symptoms of a pest, straight from the entity store
    pub fn symptoms_of(&self, pest_id: &str) -> Result<&[String], KbError> {
        self.store.get_pest(pest_id).map(|p| p.symptoms.as_slice())
    }

    /// Pests exhibiting a symptom; empty for unknown symptoms
    pub fn pests_with_symptom(&self, symptom: &str) -> &[String] {
        self.buckets
            .get(symptom)
            .map(|b| b.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_symptom(&self, symptom: &str) -> bool {
        self.buckets.contains_key(symptom)
    }

    /// Every symptom any pest lists, sorted
    pub fn all_symptoms(&self) -> Vec<&str> {
        let mut symptoms: Vec<&str> = self.buckets.keys().map(|s| s.as_str()).collect();
        symptoms.sort_unstable();
        symptoms
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
