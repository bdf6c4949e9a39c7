//! Observer perception and pattern sensing
//!
//! An observer is an [`Entity`](crate::entity::Entity) carrying a
//! [`RealityModel`]: the graph of everything it has taken part in, mined on
//! demand by [`RealityModel::find_patterns`].

pub mod patterns;
pub mod reality_model;

pub use patterns::{
    degree_centrality, interaction_type_counts, perceived_groups, weakly_connected_components,
    PatternReport, DEFAULT_TOP_K,
};
pub use reality_model::{PerceivedEdge, PerceivedNode, RealityModel};
