//! Knowledge base properties
//!
//! Checks the catalog, symptom index, relationship graph and diagnosis engine
//! against each other over the shipped bean catalog.

use bean_common::{Catalog, Control, ControlType, KnowledgeBase, Pest, RiskLevel, Severity};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn confidence_of(kb: &KnowledgeBase, symptoms: &[&str], pest_id: &str) -> f64 {
    kb.engine()
        .diagnose(symptoms.iter().copied())
        .into_iter()
        .find(|d| d.pest_id == pest_id)
        .map(|d| d.confidence)
        .unwrap_or(0.0)
}

#[test]
fn every_pest_has_symptoms() {
    let kb = KnowledgeBase::new();
    for pest in kb.list_pests() {
        assert!(!pest.symptoms.is_empty(), "{} has no symptoms", pest.id);
    }
}

#[test]
fn symptom_index_matches_entity_store() {
    let kb = KnowledgeBase::new();
    let index = kb.symptom_index();

    for symptom in index.all_symptoms() {
        let pests = index.pests_with_symptom(symptom);
        assert!(!pests.is_empty(), "empty bucket for {}", symptom);
        for pest_id in pests {
            let pest = kb.get_pest(pest_id).unwrap();
            assert!(pest.has_symptom(symptom), "{} does not list {}", pest_id, symptom);
        }
    }

    // And the other way round: every listed symptom is indexed
    for pest in kb.list_pests() {
        for symptom in &pest.symptoms {
            assert!(index.pests_with_symptom(symptom).contains(&pest.id));
        }
    }
}

#[test]
fn graph_never_invents_targets() {
    let kb = KnowledgeBase::new();
    for control in kb.list_controls() {
        for pest in kb.targets_of(&control.id).unwrap() {
            assert!(
                control.declares_target(&pest.id),
                "{} linked to undeclared {}",
                control.id,
                pest.id
            );
        }
    }
}

#[test]
fn dangling_targets_are_dropped_from_graph_only() {
    // Input: a control that declares a pest the catalog does not define
    let catalog = Catalog::new(
        vec![
            Pest::new("aphid", "Aphid", Severity::High, &["leaf_curling"], ""),
            Pest::new("thrips", "Thrips", Severity::Moderate, &["silvery_streaks"], ""),
        ],
        vec![Control::new(
            "neem_oil",
            "Neem Oil",
            ControlType::Botanical,
            &["aphid", "cutworm", "thrips"],
            0,
            RiskLevel::Low,
            "",
        )],
    );
    let kb = KnowledgeBase::from_catalog(catalog);

    let control = kb.get_control("neem_oil").unwrap();
    assert_eq!(control.target_pests, vec!["aphid", "cutworm", "thrips"]);

    let linked: Vec<&str> = kb
        .targets_of("neem_oil")
        .unwrap()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(linked, vec!["aphid", "thrips"]);
    assert_eq!(kb.graph().edge_count(), 2);
    assert_eq!(kb.graph().relationship_label("neem_oil", "cutworm"), None);
}

#[test]
fn empty_and_unknown_queries_are_empty() {
    let kb = KnowledgeBase::new();
    assert!(kb.diagnose(Vec::<&str>::new()).is_empty());
    assert!(kb.diagnose(["nonexistent_symptom"]).is_empty());
}

#[test]
fn aphid_ranks_above_whitefly() {
    let kb = KnowledgeBase::new();
    let reports = kb.diagnose(["leaf_curling", "sticky_leaves", "stunted_growth"]);

    assert_eq!(reports[0].pest_id, "aphid");
    assert!((reports[0].confidence_percent - 75.0).abs() < 1e-9);
    assert_eq!(reports[1].pest_id, "whitefly");
    assert!((reports[1].confidence_percent - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn holes_in_leaves_is_bean_beetle() {
    let kb = KnowledgeBase::new();
    let reports = kb.diagnose(["holes_in_leaves"]);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].display_name, "Bean Beetle");
    assert!((reports[0].confidence_percent - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn aphid_controls_include_all_five() {
    let kb = KnowledgeBase::new();
    let names: HashSet<&str> = kb
        .controls_for_pest("aphid")
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();

    for expected in ["Neem Oil", "Pyrethrin", "Spinosad", "Insecticidal Soap", "Crop Rotation"] {
        assert!(names.contains(expected), "missing {}", expected);
    }
    assert_eq!(names.len(), 5);
}

#[test]
fn adding_a_pest_symptom_never_lowers_its_confidence() {
    let kb = KnowledgeBase::new();
    let all = kb.symptom_index().all_symptoms();

    for pest in kb.list_pests() {
        // Every one- and two-symptom starting query
        let mut bases: Vec<Vec<&str>> = all.iter().map(|s| vec![*s]).collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                bases.push(vec![*a, *b]);
            }
        }

        for base in bases {
            let before = confidence_of(&kb, &base, &pest.id);
            for symptom in &pest.symptoms {
                if base.contains(&symptom.as_str()) {
                    continue;
                }
                let mut extended = base.clone();
                extended.push(symptom);
                let after = confidence_of(&kb, &extended, &pest.id);
                assert!(
                    after >= before,
                    "{}: {:?} -> {:?} dropped {} -> {}",
                    pest.id,
                    base,
                    extended,
                    before,
                    after
                );
            }
        }
    }
}

#[test]
fn confidence_stays_in_range_and_sorted() {
    let kb = KnowledgeBase::new();
    let all = kb.symptom_index().all_symptoms();

    // Growing prefixes of the symptom list, plus an unknown symptom
    for n in 1..=all.len() {
        let mut query: Vec<&str> = all[..n].to_vec();
        query.push("purple_spots");

        let ranked = kb.engine().diagnose(query);
        for d in &ranked {
            assert!((0.0..=100.0).contains(&d.confidence), "{:?}", d);
            assert!(d.confidence > 0.0, "zero-match pest listed: {:?}", d);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }
}

#[test]
fn diagnosis_is_deterministic() {
    let kb = KnowledgeBase::new();
    let query = ["sticky_leaves", "leaf_drop", "defoliation", "sooty_mold"];
    let first = kb.engine().diagnose(query);
    for _ in 0..10 {
        assert_eq!(kb.engine().diagnose(query), first);
    }
}

#[test]
fn shared_across_threads_without_locking() {
    let kb = Arc::new(KnowledgeBase::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let kb = Arc::clone(&kb);
            thread::spawn(move || kb.engine().diagnose(["holes_in_leaves", "fine_webbing"]))
        })
        .collect();

    let expected = kb.engine().diagnose(["holes_in_leaves", "fine_webbing"]);
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
