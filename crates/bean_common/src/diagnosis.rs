//! Diagnosis Engine - ranks pests against a set of observed symptoms
//!
//! For every pest sharing at least one observed symptom:
//!
//! ```text
//! confidence = min(100, (hits / observed) * (hits / pest_symptoms) * 100)
//! ```
//!
//! The first factor is how much of the observation the pest explains, the
//! second how much of the pest's profile was observed. Pests with no hits are
//! left out. The engine never truncates; callers slice the top-K themselves.

use crate::error::KbError;
use crate::symptom_index::SymptomIndex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One ranked hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub pest_id: String,
    /// 0-100
    pub confidence: f64,
    /// Observed symptoms this pest exhibits, in observation order
    pub matched_symptoms: Vec<String>,
}

/// Stateless scorer over a borrowed symptom index
#[derive(Debug, Clone, Copy)]
pub struct DiagnosisEngine<'a> {
    index: &'a SymptomIndex,
}

impl<'a> DiagnosisEngine<'a> {
    pub fn new(index: &'a SymptomIndex) -> Self {
        Self { index }
    }

    /// Rank pests by confidence, ignoring symptoms the index does not know
    ///
    /// Duplicate symptoms in the input count once. Unknown symptoms still
    /// count towards the observation size. An empty input yields an empty
    /// ranking.
    pub fn diagnose<I, S>(&self, observed: I) -> Vec<Diagnosis>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let observed = dedup(observed);
        if observed.is_empty() {
            return Vec::new();
        }

        // Pest ids in order of first hit, with the symptoms that hit them
        let mut order: Vec<&str> = Vec::new();
        let mut hits: HashMap<&str, Vec<&str>> = HashMap::new();
        for symptom in &observed {
            for pest_id in self.index.pests_with_symptom(symptom) {
                let entry = hits.entry(pest_id.as_str()).or_insert_with(|| {
                    order.push(pest_id.as_str());
                    Vec::new()
                });
                entry.push(symptom.as_str());
            }
        }

        let observed_count = observed.len() as f64;
        let mut ranked: Vec<Diagnosis> = order
            .into_iter()
            .filter_map(|pest_id| {
                let matched = hits.remove(pest_id)?;
                let total = self.index.symptoms_of(pest_id).ok()?.len();
                let count = matched.len() as f64;
                Some(Diagnosis {
                    pest_id: pest_id.to_string(),
                    confidence: confidence(count, observed_count, total as f64),
                    matched_symptoms: matched.into_iter().map(str::to_string).collect(),
                })
            })
            .collect();

        // Stable: ties keep first-hit order
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            observed = observed.len(),
            candidates = ranked.len(),
            top = ranked.first().map(|d| d.pest_id.as_str()).unwrap_or("-"),
            "Diagnosis complete"
        );

        ranked
    }

    /// Like [`diagnose`](Self::diagnose) but rejects the first unknown symptom
    pub fn diagnose_strict<I, S>(&self, observed: I) -> Result<Vec<Diagnosis>, KbError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let observed = dedup(observed);
        if let Some(unknown) = observed.iter().find(|s| !self.index.contains_symptom(s)) {
            return Err(KbError::UnknownSymptom(unknown.clone()));
        }
        Ok(self.diagnose(observed))
    }
}

/// Product of the two coverage ratios as a percentage, capped at 100
fn confidence(hits: f64, observed: f64, pest_symptoms: f64) -> f64 {
    ((hits / observed) * (hits / pest_symptoms) * 100.0).min(100.0)
}

fn dedup<I, S>(observed: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    observed
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
