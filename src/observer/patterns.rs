//! Pattern mining over a reality model
//!
//! All analysis is read-only and ordered deterministically: ties always fall
//! back to the order in which nodes or interaction types were first perceived.

use std::collections::{BTreeMap, VecDeque};

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::types::{EntityId, GroupId};
use crate::entity::keys;
use crate::observer::reality_model::RealityModel;

/// Number of entries in ranked patterns unless configured otherwise
pub const DEFAULT_TOP_K: usize = 3;

/// What an observer has noticed about its world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    pub num_perceived_entities: usize,
    /// Directed edges; every perceived binary interaction counts twice
    pub num_perceived_relationships: usize,
    /// (interaction type, edge count), most frequent first
    pub most_frequent_interactions: Vec<(String, usize)>,
    /// (entity, degree centrality), most central first
    pub highly_connected_entities: Vec<(EntityId, f64)>,
    pub num_perceived_clusters: usize,
    /// Groups with more than one perceived member
    pub perceived_groups: BTreeMap<GroupId, usize>,
}

impl RealityModel {
    /// Mine the model, keeping `top_k` entries for ranked patterns
    pub fn find_patterns(&self, top_k: usize) -> PatternReport {
        let highly_connected_entities = if self.node_count() > 1 {
            let mut ranked = degree_centrality(self);
            // Stable sort keeps first-perceived order among equals
            ranked.sort_by_key(|&(_, c)| std::cmp::Reverse(OrderedFloat(c)));
            ranked.truncate(top_k);
            ranked
        } else {
            Vec::new()
        };

        let mut most_frequent_interactions = interaction_type_counts(self);
        most_frequent_interactions.sort_by(|a, b| b.1.cmp(&a.1));
        most_frequent_interactions.truncate(top_k);

        PatternReport {
            num_perceived_entities: self.node_count(),
            num_perceived_relationships: self.edge_count(),
            most_frequent_interactions,
            highly_connected_entities,
            num_perceived_clusters: weakly_connected_components(self).len(),
            perceived_groups: perceived_groups(self),
        }
    }
}

/// Edge count per interaction type, in first-encountered order
pub fn interaction_type_counts(model: &RealityModel) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: AHashMap<&str, usize> = AHashMap::new();

    for edge in model.edges() {
        match index.get(edge.interaction_type.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(edge.interaction_type.as_str(), counts.len());
                counts.push((edge.interaction_type.clone(), 1));
            }
        }
    }

    counts
}

/// Degree (in + out, parallel edges included) divided by `n - 1`, for every
/// node in first-perceived order. Empty for graphs with fewer than two nodes.
pub fn degree_centrality(model: &RealityModel) -> Vec<(EntityId, f64)> {
    let n = model.node_count();
    if n < 2 {
        return Vec::new();
    }

    let mut degree: AHashMap<EntityId, usize> = AHashMap::new();
    for edge in model.edges() {
        *degree.entry(edge.from).or_insert(0) += 1;
        *degree.entry(edge.to).or_insert(0) += 1;
    }

    let scale = 1.0 / (n - 1) as f64;
    model
        .nodes()
        .map(|(id, _)| (id, degree.get(&id).copied().unwrap_or(0) as f64 * scale))
        .collect()
}

/// Components of the graph with edge direction ignored. Isolated nodes form
/// their own component.
pub fn weakly_connected_components(model: &RealityModel) -> Vec<Vec<EntityId>> {
    let mut adj: AHashMap<EntityId, Vec<EntityId>> = AHashMap::new();
    for edge in model.edges() {
        adj.entry(edge.from).or_default().push(edge.to);
        adj.entry(edge.to).or_default().push(edge.from);
    }

    let mut visited = AHashSet::new();
    let mut components = Vec::new();
    for (start, _) in model.nodes() {
        if !visited.insert(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            component.push(node);
            if let Some(neighbors) = adj.get(&node) {
                for &n in neighbors {
                    if visited.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        components.push(component);
    }
    components
}

/// Perceived members per group, restricted to groups of two or more
pub fn perceived_groups(model: &RealityModel) -> BTreeMap<GroupId, usize> {
    let mut groups: BTreeMap<GroupId, usize> = BTreeMap::new();
    for (_, node) in model.nodes() {
        if let Some(group) = node.properties.get(keys::GROUP_ID).and_then(|v| v.as_str()) {
            *groups.entry(GroupId::from(group)).or_insert(0) += 1;
        }
    }
    groups.retain(|_, count| *count > 1);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntitySnapshot, Metadata, Value};
    use crate::interaction::Interaction;

    fn perceive(model: &mut RealityModel, observer: &Entity, other: &Entity, kind: &str) {
        let interaction = Interaction::between(observer.id(), other.id(), kind, Metadata::new());
        let snaps: Vec<EntitySnapshot> = vec![observer.snapshot(), other.snapshot()];
        model.perceive(observer.id(), &interaction, &snaps);
    }

    fn grouped(group: &str) -> Entity {
        let mut e = Entity::new();
        e.properties_mut().insert(keys::GROUP_ID.into(), Value::from(group));
        e
    }

    #[test]
    fn test_empty_model() {
        let report = RealityModel::new().find_patterns(DEFAULT_TOP_K);
        assert_eq!(report.num_perceived_entities, 0);
        assert_eq!(report.num_perceived_relationships, 0);
        assert!(report.most_frequent_interactions.is_empty());
        assert!(report.highly_connected_entities.is_empty());
        assert_eq!(report.num_perceived_clusters, 0);
        assert!(report.perceived_groups.is_empty());
    }

    #[test]
    fn test_star_graph_patterns() {
        let observer = Entity::observer();
        let e1 = grouped("group1");
        let e2 = grouped("group1");
        let e3 = grouped("group2");
        let e4 = grouped("group2");

        let mut model = RealityModel::new();
        perceive(&mut model, &observer, &e1, "type_A");
        perceive(&mut model, &observer, &e1, "type_A");
        perceive(&mut model, &observer, &e2, "type_B");
        perceive(&mut model, &observer, &e3, "type_A");
        perceive(&mut model, &observer, &e4, "type_B");
        perceive(&mut model, &observer, &e2, "type_B");

        let report = model.find_patterns(DEFAULT_TOP_K);

        assert_eq!(report.num_perceived_entities, 5);
        assert_eq!(report.num_perceived_relationships, 12);
        assert_eq!(
            report.most_frequent_interactions,
            vec![("type_A".to_string(), 6), ("type_B".to_string(), 6)]
        );
        assert_eq!(report.num_perceived_clusters, 1);
        assert_eq!(report.perceived_groups.get(&GroupId::from("group1")), Some(&2));
        assert_eq!(report.perceived_groups.get(&GroupId::from("group2")), Some(&2));

        // The observer is the hub: 12 edge endpoints over 4 other nodes
        let (hub, centrality) = report.highly_connected_entities[0];
        assert_eq!(hub, observer.id());
        assert!((centrality - 3.0).abs() < 1e-9);
        assert_eq!(report.highly_connected_entities.len(), 3);
    }

    #[test]
    fn test_singleton_groups_not_reported() {
        let observer = Entity::observer();
        let lonely = grouped("solo");
        let mut model = RealityModel::new();
        perceive(&mut model, &observer, &lonely, "x");

        assert!(model.find_patterns(DEFAULT_TOP_K).perceived_groups.is_empty());
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let observer = Entity::observer();
        let a = Entity::new();
        let mut model = RealityModel::new();
        for kind in ["z", "y", "x", "w"] {
            perceive(&mut model, &observer, &a, kind);
        }

        let report = model.find_patterns(DEFAULT_TOP_K);
        let kinds: Vec<_> = report
            .most_frequent_interactions
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(kinds, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_clusters_count_disconnected_nodes() {
        let observer = Entity::observer();
        let a = Entity::new();
        let b = Entity::new();
        let mut model = RealityModel::new();
        perceive(&mut model, &observer, &a, "x");

        // Three-way interaction adds b without linking it
        let huddle = Interaction::new(vec![observer.id(), a.id(), b.id()], "huddle", Metadata::new()).unwrap();
        model.perceive(
            observer.id(),
            &huddle,
            &[observer.snapshot(), a.snapshot(), b.snapshot()],
        );

        let components = weakly_connected_components(&model);
        assert_eq!(components.len(), 2);
        assert_eq!(components[1], vec![b.id()]);
    }

    #[test]
    fn test_degree_centrality_normalized() {
        let observer = Entity::observer();
        let a = Entity::new();
        let mut model = RealityModel::new();
        perceive(&mut model, &observer, &a, "x");

        let centrality = degree_centrality(&model);
        assert_eq!(centrality.len(), 2);
        assert!(centrality.iter().all(|&(_, c)| (c - 2.0).abs() < 1e-9));
    }
}
