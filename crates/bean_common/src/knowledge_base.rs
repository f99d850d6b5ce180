//! Knowledge Base - the engine's outward-facing API
//!
//! Owns the entity store and the two structures derived from it. Everything
//! is built once in [`KnowledgeBase::new`] and never mutated, so a single
//! instance can be shared by reference (or `Arc`) across any number of
//! concurrent readers.

use crate::catalog::{bean_catalog, Catalog};
use crate::diagnosis::{Diagnosis, DiagnosisEngine};
use crate::error::KbError;
use crate::relationship_graph::RelationshipGraph;
use crate::store::EntityStore;
use crate::symptom_index::SymptomIndex;
use crate::types::{canonical_symptom, symptom_label, Control, ControlType, Pest, Severity};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Entry for a symptom picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomOption {
    /// Canonical snake_case id
    pub id: String,
    /// Title-cased display label
    pub label: String,
}

/// A diagnosis joined with the pest details a report needs
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub pest_id: String,
    pub display_name: String,
    pub confidence_percent: f64,
    pub severity: Severity,
    pub description: String,
    /// Pest symptoms in display form
    pub symptom_list: Vec<String>,
    /// Observed symptoms the pest exhibits, canonical form
    pub matched_symptoms: Vec<String>,
}

/// Controls of one type, lowest risk first
#[derive(Debug, Clone, Serialize)]
pub struct ControlGroup<'a> {
    pub control_type: ControlType,
    pub controls: Vec<&'a Control>,
}

#[derive(Debug)]
pub struct KnowledgeBase {
    store: Arc<EntityStore>,
    index: SymptomIndex,
    graph: RelationshipGraph,
}

impl KnowledgeBase {
    /// Knowledge base over the shipped bean catalog
    pub fn new() -> Self {
        Self::from_catalog(bean_catalog())
    }

    /// Build from any catalog; panics if the catalog breaks an invariant
    pub fn from_catalog(catalog: Catalog) -> Self {
        let store = Arc::new(EntityStore::new(catalog));
        let index = SymptomIndex::build(Arc::clone(&store));
        let graph = RelationshipGraph::build(Arc::clone(&store));

        debug!(
            pests = store.all_pests().len(),
            controls = store.all_controls().len(),
            symptoms = index.len(),
            edges = graph.edge_count(),
            "Knowledge base ready"
        );

        Self { store, index, graph }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn symptom_index(&self) -> &SymptomIndex {
        &self.index
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn engine(&self) -> DiagnosisEngine<'_> {
        DiagnosisEngine::new(&self.index)
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn get_pest(&self, id: &str) -> Result<&Pest, KbError> {
        self.store.get_pest(id)
    }

    pub fn get_control(&self, id: &str) -> Result<&Control, KbError> {
        self.store.get_control(id)
    }

    pub fn find_pest(&self, id: &str) -> Option<&Pest> {
        self.store.get_pest(id).ok()
    }

    pub fn find_control(&self, id: &str) -> Option<&Control> {
        self.store.get_control(id).ok()
    }

    /// Resolve user input (canonical id or display label) to a known symptom id
    pub fn resolve_symptom(&self, input: &str) -> Option<String> {
        let canonical = canonical_symptom(input);
        self.index.contains_symptom(&canonical).then_some(canonical)
    }

    // ------------------------------------------------------------------------
    // External interface
    // ------------------------------------------------------------------------

    /// All known symptoms, sorted by id, with display labels
    pub fn list_symptoms(&self) -> Vec<SymptomOption> {
        self.index
            .all_symptoms()
            .into_iter()
            .map(|id| SymptomOption {
                id: id.to_string(),
                label: symptom_label(id),
            })
            .collect()
    }

    /// Full ranking for a symptom set, joined with pest details
    pub fn diagnose<I, S>(&self, symptoms: I) -> Vec<DiagnosisReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reports(self.engine().diagnose(symptoms))
    }

    /// As [`diagnose`](Self::diagnose), but unknown symptoms are an error
    pub fn diagnose_strict<I, S>(&self, symptoms: I) -> Result<Vec<DiagnosisReport>, KbError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.reports(self.engine().diagnose_strict(symptoms)?))
    }

    fn reports(&self, ranked: Vec<Diagnosis>) -> Vec<DiagnosisReport> {
        ranked
            .into_iter()
            .filter_map(|d| {
                let pest = self.store.get_pest(&d.pest_id).ok()?;
                Some(DiagnosisReport {
                    pest_id: d.pest_id,
                    display_name: pest.name.clone(),
                    confidence_percent: d.confidence,
                    severity: pest.severity,
                    description: pest.description.clone(),
                    symptom_list: pest.symptom_labels(),
                    matched_symptoms: d.matched_symptoms,
                })
            })
            .collect()
    }

    /// Every pest, in catalog order
    pub fn list_pests(&self) -> &[Pest] {
        self.store.all_pests()
    }

    /// Every control, in catalog order
    pub fn list_controls(&self) -> &[Control] {
        self.store.all_controls()
    }

    /// Controls the relationship graph links to a pest
    pub fn controls_for_pest(&self, pest_id: &str) -> Result<Vec<&Control>, KbError> {
        self.graph.controls_for(pest_id)
    }

    /// Pests the relationship graph links to a control
    pub fn targets_of(&self, control_id: &str) -> Result<Vec<&Pest>, KbError> {
        self.graph.targets_of(control_id)
    }

    /// Controls grouped by type in order of first appearance, each group
    /// sorted by risk level ascending (stable within a level)
    pub fn list_controls_by_type(&self) -> Vec<ControlGroup<'_>> {
        let mut groups: Vec<ControlGroup<'_>> = Vec::new();
        for control in self.store.all_controls() {
            match groups
                .iter_mut()
                .find(|g| g.control_type == control.control_type)
            {
                Some(group) => group.controls.push(control),
                None => groups.push(ControlGroup {
                    control_type: control.control_type,
                    controls: vec![control],
                }),
            }
        }

        for group in &mut groups {
            group.controls.sort_by_key(|c| c.risk_level.ordinal());
        }
        groups
    }

    /// Controls of one type, lowest risk first
    pub fn controls_of_type(&self, control_type: ControlType) -> Vec<&Control> {
        self.list_controls_by_type()
            .into_iter()
            .find(|g| g.control_type == control_type)
            .map(|g| g.controls)
            .unwrap_or_default()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}
