//! Relationship Graph - undirected control <-> pest graph
//!
//! One node per pest and per control. A control is linked to each declared
//! target that exists in the entity store, with an edge labelled
//! `controls_<risk>`. Declared targets that name no known pest are left out
//! of the graph but stay in the control's own `target_pests`, so the two
//! views may differ.

use crate::error::KbError;
use crate::store::EntityStore;
use crate::types::{Control, Pest};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a graph node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Pest,
    Control,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Pest => write!(f, "pest"),
            NodeKind::Control => write!(f, "control"),
        }
    }
}

/// Node payload
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
}

/// A control -> pest edge as seen from outside the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipEdge<'a> {
    pub control_id: &'a str,
    pub pest_id: &'a str,
    pub label: &'a str,
}

pub struct RelationshipGraph {
    store: Arc<EntityStore>,
    graph: UnGraph<GraphNode, String>,
    /// Pest and control ids live in separate namespaces
    pest_nodes: HashMap<String, NodeIndex>,
    control_nodes: HashMap<String, NodeIndex>,
}

impl RelationshipGraph {
    pub fn build(store: Arc<EntityStore>) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut pest_nodes = HashMap::new();
        let mut control_nodes = HashMap::new();

        for pest in store.all_pests() {
            let idx = graph.add_node(GraphNode {
                id: pest.id.clone(),
                kind: NodeKind::Pest,
            });
            pest_nodes.insert(pest.id.clone(), idx);
        }

        for control in store.all_controls() {
            let idx = graph.add_node(GraphNode {
                id: control.id.clone(),
                kind: NodeKind::Control,
            });
            control_nodes.insert(control.id.clone(), idx);
        }

        let mut dropped = 0usize;
        for control in store.all_controls() {
            let control_idx = control_nodes[&control.id];
            let label = control.risk_level.relationship_label();

            for target in &control.target_pests {
                // Unknown targets are filtered out here, not rejected
                match pest_nodes.get(target) {
                    Some(&pest_idx) => {
                        graph.update_edge(control_idx, pest_idx, label.clone());
                    }
                    None => {
                        dropped += 1;
                        warn!(
                            control = %control.id,
                            target = %target,
                            "Control targets unknown pest, edge skipped"
                        );
                    }
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped,
            "Built relationship graph"
        );

        Self {
            store,
            graph,
            pest_nodes,
            control_nodes,
        }
    }

    /// Controls linked to a pest, in control declaration order
    pub fn controls_for(&self, pest_id: &str) -> Result<Vec<&Control>, KbError> {
        let idx = self
            .pest_nodes
            .get(pest_id)
            .ok_or_else(|| KbError::PestNotFound(pest_id.to_string()))?;

        let mut controls: Vec<&Control> = self
            .graph
            .neighbors(*idx)
            .filter_map(|n| self.store.get_control(&self.graph[n].id).ok())
            .collect();
        controls.sort_by_key(|c| self.store.control_position(&c.id));
        Ok(controls)
    }

    /// Pests a control is linked to, in the control's declared order
    pub fn targets_of(&self, control_id: &str) -> Result<Vec<&Pest>, KbError> {
        let control = self.store.get_control(control_id)?;
        let idx = self.control_nodes[control_id];

        let mut targets = Vec::new();
        for target in &control.target_pests {
            let Some(&pest_idx) = self.pest_nodes.get(target) else {
                continue;
            };
            if self.graph.contains_edge(idx, pest_idx)
                && !targets.iter().any(|p: &&Pest| &p.id == target)
            {
                targets.push(self.store.get_pest(target)?);
            }
        }
        Ok(targets)
    }

    /// Edge label between a control and a pest, if they are linked
    pub fn relationship_label(&self, control_id: &str, pest_id: &str) -> Option<&str> {
        let control_idx = self.control_nodes.get(control_id)?;
        let pest_idx = self.pest_nodes.get(pest_id)?;
        self.graph
            .find_edge(*control_idx, *pest_idx)
            .map(|e| self.graph[e].as_str())
    }

    /// Kind of the node with this id; pests win if an id is used for both
    pub fn node_kind(&self, id: &str) -> Option<NodeKind> {
        if self.pest_nodes.contains_key(id) {
            Some(NodeKind::Pest)
        } else if self.control_nodes.contains_key(id) {
            Some(NodeKind::Control)
        } else {
            None
        }
    }

    /// All edges, grouped by control in declaration order
    pub fn edges(&self) -> Vec<RelationshipEdge<'_>> {
        let mut edges = Vec::with_capacity(self.graph.edge_count());
        for control in self.store.all_controls() {
            if let Ok(targets) = self.targets_of(&control.id) {
                for pest in targets {
                    if let Some(label) = self.relationship_label(&control.id, &pest.id) {
                        edges.push(RelationshipEdge {
                            control_id: &control.id,
                            pest_id: &pest.id,
                            label,
                        });
                    }
                }
            }
        }
        edges
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl std::fmt::Debug for RelationshipGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}
