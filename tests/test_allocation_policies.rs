mod common;

use common::{create_network, create_node};
use fog_orchestration_sim::domain::fog_system_model::allocation::allocation_policy_type::AllocationPolicyType;
use fog_orchestration_sim::domain::fog_system_model::fog_network::FogNetwork;
use fog_orchestration_sim::domain::fog_system_model::topology::Position;
use fog_orchestration_sim::domain::fog_system_model::utils::id::{ClientId, NodeId};

/// Three nodes on a line, the client closest to the last one.
/// A: 100 blocks, no cache. B: 50 blocks, caches type 0. C: 25 blocks, caches types 0 and 1.
fn create_line_network() -> FogNetwork {
    let mut network = create_network(vec![
        create_node(0, 0.0, 0.0, 1000.0, 20.0, vec![false, false, false]),
        create_node(1, 20.0, 0.0, 1000.0, 10.0, vec![true, false, false]),
        create_node(2, 40.0, 0.0, 1000.0, 5.0, vec![true, true, false]),
    ]);
    network.upsert_client(ClientId::new(0), Position::new(35.0, 0.0));
    network
}

fn choose(network: &mut FogNetwork, policy: &str, content_type: usize) -> Option<NodeId> {
    let policy = policy.parse::<AllocationPolicyType>().unwrap().get_instance();
    let client = ClientId::new(0);
    let session = network.create_session(client, 5.0, content_type).unwrap();
    let candidates = network.feasible_nodes(client).unwrap();

    let chosen = policy.choose(network, network.session(session).unwrap(), &candidates).unwrap();
    network.discard_session(session).unwrap();
    chosen
}

#[test]
fn test_signal_aware_picks_nearest() {
    let mut network = create_line_network();
    assert_eq!(choose(&mut network, "signal_aware", 0), Some(NodeId::new(2)));
}

#[test]
fn test_capacity_aware_picks_most_spare_blocks() {
    let mut network = create_line_network();
    assert_eq!(choose(&mut network, "capacity_aware", 0), Some(NodeId::new(0)));
}

#[test]
fn test_content_aware_prefers_unique_cache() {
    let mut network = create_line_network();

    // only C caches type 1
    assert_eq!(choose(&mut network, "content_aware", 1), Some(NodeId::new(2)));
    // B and C cache type 0, C has the better signal
    assert_eq!(choose(&mut network, "content_aware", 0), Some(NodeId::new(2)));
    // nobody caches type 2, fall back to the signal over all candidates
    assert_eq!(choose(&mut network, "content_aware", 2), Some(NodeId::new(2)));
}

#[test]
fn test_content_aware_unique_cache_beats_signal() {
    let mut network = create_network(vec![
        create_node(0, 0.0, 0.0, 1000.0, 20.0, vec![true]),
        create_node(1, 40.0, 0.0, 1000.0, 20.0, vec![false]),
    ]);
    network.upsert_client(ClientId::new(0), Position::new(35.0, 0.0));

    assert_eq!(choose(&mut network, "content_aware", 0), Some(NodeId::new(0)), "Caching node wins despite weaker signal");
    assert_eq!(choose(&mut network, "signal_aware", 0), Some(NodeId::new(1)));
}

#[test]
fn test_ties_keep_first_candidate() {
    let mut network = create_network(vec![
        create_node(0, 0.0, 0.0, 1000.0, 10.0, vec![false]),
        create_node(1, 10.0, 0.0, 1000.0, 10.0, vec![false]),
    ]);
    network.upsert_client(ClientId::new(0), Position::new(5.0, 0.0));

    assert_eq!(choose(&mut network, "signal_aware", 0), Some(NodeId::new(0)));
    assert_eq!(choose(&mut network, "capacity_aware", 0), Some(NodeId::new(0)));
}

#[test]
fn test_no_candidates_means_no_node() {
    let mut network = create_network(vec![create_node(0, 0.0, 0.0, 1.0, 10.0, vec![false])]);
    network.upsert_client(ClientId::new(0), Position::new(35.0, 0.0));

    assert_eq!(choose(&mut network, "signal_aware", 0), None);
    assert!("nearest".parse::<AllocationPolicyType>().is_err());
}
