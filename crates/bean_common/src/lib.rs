//! Bean Common - knowledge base and diagnosis engine for the bean pest advisor
//!
//! Pests, controls and their symptoms form a fixed catalog. From it we derive
//! a symptom index (symptom -> pests) and a relationship graph
//! (control <-> pest). The diagnosis engine ranks pests for a set of observed
//! symptoms using the symptom index.

pub mod catalog;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod knowledge_base;
pub mod relationship_graph;
pub mod store;
pub mod symptom_index;
pub mod types;

pub use catalog::{bean_catalog, Catalog, CatalogViolation};
pub use config::{AdvisorConfig, ColorMode, DiagnosisConfig, OutputConfig};
pub use diagnosis::{Diagnosis, DiagnosisEngine};
pub use error::KbError;
pub use knowledge_base::{ControlGroup, DiagnosisReport, KnowledgeBase, SymptomOption};
pub use relationship_graph::{NodeKind, RelationshipEdge, RelationshipGraph};
pub use store::EntityStore;
pub use symptom_index::SymptomIndex;
pub use types::*;
