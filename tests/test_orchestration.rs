mod common;

use common::{StaticMobility, create_config, create_network, create_node};
use fog_orchestration_sim::domain::fog_system_model::fog_network::{Admission, FogNetwork};
use fog_orchestration_sim::domain::fog_system_model::orchestration::decision_strategy::{Assignment, DecisionStrategy, PairProblem, Side};
use fog_orchestration_sim::domain::fog_system_model::orchestration::learned_policy::{CheapestSide, PolicyDecision};
use fog_orchestration_sim::domain::fog_system_model::orchestration::working_set::WorkingSet;
use fog_orchestration_sim::domain::fog_system_model::topology::Position;
use fog_orchestration_sim::domain::fog_system_model::utils::id::{ClientId, NodeId};
use fog_orchestration_sim::domain::simulator::simulator::Simulation;

const A: NodeId = NodeId::new(0);
const B: NodeId = NodeId::new(1);
const C: NodeId = NodeId::new(2);

/// A and B cover each other's clients, C and D are far away with tiny coverage.
/// Five clients sit between A and B. Admitted to A one after another, each takes 20 blocks
/// under the interference of the ones before it, so A ends up full.
fn create_imbalanced_network() -> FogNetwork {
    let mut network = create_network(vec![
        create_node(0, 0.0, 0.0, 1000.0, 20.0, vec![false]),
        create_node(1, 10.0, 0.0, 1000.0, 20.0, vec![false]),
        create_node(2, 5000.0, 5000.0, 1.0, 20.0, vec![false]),
        create_node(3, -5000.0, 5000.0, 1.0, 20.0, vec![false]),
    ]);

    for (id, rate) in [125.0, 24.5, 20.9, 18.8, 17.3].into_iter().enumerate() {
        let client = ClientId::new(id as u64);
        network.upsert_client(client, Position::new(5.0, 0.0));
        let session = network.create_session(client, rate, 0).unwrap();
        let admission = network.add_service(A, session, false).unwrap();
        assert_eq!(admission, Admission::Admitted { blocks: 20 }, "Client {} should take 20 blocks on A", id);
    }
    assert_eq!(network.node(A).unwrap().level(), 0);

    network
}

fn total_allocated(network: &FogNetwork) -> i64 {
    network.nodes().iter().map(|n| n.allocated()).sum()
}

fn assert_blocks_accounted(network: &FogNetwork) {
    let held: i64 = network.sessions().filter(|s| network.node_of(s.id).is_some()).map(|s| s.blocks).sum();
    assert_eq!(total_allocated(network), held, "Allocated blocks must match what the sessions hold");
    network.check_invariants().unwrap();
}

#[test]
fn test_working_set_candidates() {
    let network = create_imbalanced_network();
    let working_set = WorkingSet::build(&network).unwrap();

    assert_eq!(working_set.candidates(A, B).len(), 5);
    assert!(working_set.candidates(A, C).is_empty(), "C covers nobody");
    assert!(working_set.x(A, ClientId::new(0)));
    assert!(!working_set.x(B, ClientId::new(0)));

    let problems = working_set.pair_problems();
    assert_eq!(problems.len(), 1, "Only the A/B pair has candidates");

    let problem = &problems[0];
    assert_eq!(problem.blocks_i, vec![20; 5], "The serving node costs what the sessions hold");
    assert_eq!(problem.blocks_j, vec![20, 4, 3, 3, 2], "B is interference free and therefore cheaper");
    assert_eq!(problem.capacity_i, 100, "Spare level plus the candidates' blocks is A's full capacity");
    assert_eq!(problem.capacity_j, 100);
    assert!(problem.evaluate(&problem.identity()).is_some(), "Staying put is always feasible");
}

#[test]
fn test_cycle_moves_sessions_from_loaded_node() {
    let network = create_imbalanced_network();
    let served_a_before = network.node(A).unwrap().services_served();

    let mut sim = Simulation::from_parts(create_config("heuristic"), network, Box::new(StaticMobility::default()), None).unwrap();
    let report = sim.orchestrate_now().unwrap().expect("Orchestration is enabled");

    let network = sim.network();
    let node_a = network.node(A).unwrap();
    let node_b = network.node(B).unwrap();

    assert_eq!(report.pairs_selected, 1);
    assert_eq!(report.expected_savings, 16 + 17 + 17 + 18);
    assert_eq!(report.migrations, 4, "Report: {:?}", report);
    assert_eq!(report.migrations_skipped, 0);
    assert_eq!(node_a.allocated(), 20, "Only the client without a cheaper option stays on A");
    assert_eq!(node_b.allocated(), 4 + 17 + 18 + 18, "Later arrivals pay for the interference at B");
    assert!(total_allocated(network) < 100, "Every executed migration lowers the total");

    assert_eq!(network.sessions().count(), 5, "Migration keeps every session");
    assert_eq!(network.served_sessions().len(), 5);
    for session in network.sessions() {
        let node = network.node_of(session.id).expect("Session must remain served");
        assert_eq!(network.client(session.client).unwrap().allotted_node, Some(node));
    }

    assert_eq!(node_a.services_served(), served_a_before, "Migrations do not count as served services");
    assert_eq!(node_b.incoming_services(), 0, "Migrations do not count as incoming services");
    assert_blocks_accounted(network);
}

#[test]
fn test_second_cycle_does_not_undo_the_first() {
    let network = create_imbalanced_network();
    let mut sim = Simulation::from_parts(create_config("heuristic"), network, Box::new(StaticMobility::default()), None).unwrap();

    let first = sim.orchestrate_now().unwrap().unwrap();
    let total_after_first = total_allocated(sim.network());
    assert_eq!(first.migrations, 4);

    let second = sim.orchestrate_now().unwrap().unwrap();
    let total_after_second = total_allocated(sim.network());
    assert!(
        total_after_second <= total_after_first - second.migrations as i64,
        "Each migration saves at least one block: {} -> {} with {} migrations",
        total_after_first,
        total_after_second,
        second.migrations
    );
    assert!(second.migrations < first.migrations, "The second cycle only refines the first");
    assert!(sim.network().node(A).unwrap().level() > 0, "A must not be refilled");
    assert!(sim.network().node(B).unwrap().allocated() > 0, "B keeps sessions from the first cycle");
    assert_blocks_accounted(sim.network());

    let mut settled = false;
    for _ in 0..10 {
        let before = total_allocated(sim.network());
        let report = sim.orchestrate_now().unwrap().unwrap();
        assert!(total_allocated(sim.network()) <= before - report.migrations as i64);
        if report.migrations == 0 {
            settled = true;
            break;
        }
    }
    assert!(settled, "Cycles on a static network must reach a fixed point");
    assert_blocks_accounted(sim.network());
}

#[test]
fn test_swap_frees_the_fuller_node_first() {
    // A carries 15 blocks, B only 6
    let mut network = create_network(vec![create_node(0, 0.0, 0.0, 2000.0, 3.0, vec![false]), create_node(1, 1000.0, 0.0, 2000.0, 1.4, vec![false])]);

    // each client sits 990 m from its node and 10 m from the other one
    let near_b = ClientId::new(0);
    network.upsert_client(near_b, Position::new(990.0, 0.0));
    let session = network.create_session(near_b, 12.9, 0).unwrap();
    assert_eq!(network.add_service(A, session, false).unwrap(), Admission::Admitted { blocks: 6 });

    let near_a = ClientId::new(1);
    network.upsert_client(near_a, Position::new(10.0, 0.0));
    let session = network.create_session(near_a, 12.9, 0).unwrap();
    assert_eq!(network.add_service(B, session, false).unwrap(), Admission::Admitted { blocks: 6 });
    assert_eq!(network.node(B).unwrap().level(), 0);

    let strategy: Box<dyn DecisionStrategy> = Box::new(SwapAll);
    let mut sim = Simulation::from_parts(create_config("learned"), network, Box::new(StaticMobility::default()), Some(strategy)).unwrap();
    let report = sim.orchestrate_now().unwrap().unwrap();

    assert_eq!(report.expected_savings, 8);
    assert_eq!(report.migrations, 2, "Report: {:?}", report);
    assert_eq!(report.migrations_skipped, 0);

    let network = sim.network();
    assert_eq!(network.client(near_b).unwrap().allotted_node, Some(B));
    assert_eq!(network.client(near_a).unwrap().allotted_node, Some(A));
    assert_eq!(network.node(A).unwrap().allocated(), 2);
    assert_eq!(network.node(B).unwrap().allocated(), 2);
    assert_blocks_accounted(network);
}

/// Sends every candidate to the other node of its pair.
#[derive(Debug)]
struct SwapAll;

impl DecisionStrategy for SwapAll {
    fn decide(&mut self, problem: &PairProblem) -> Assignment {
        problem
            .current
            .iter()
            .map(|side| match side {
                Side::I => Some(Side::J),
                Side::J => Some(Side::I),
            })
            .collect()
    }
}

#[test]
fn test_learned_policy_drives_same_pipeline() {
    let network = create_imbalanced_network();
    let load_a_before = network.node(A).unwrap().allocated();
    let strategy: Box<dyn DecisionStrategy> = Box::new(PolicyDecision::new(CheapestSide));

    let mut sim = Simulation::from_parts(create_config("learned"), network, Box::new(StaticMobility::default()), Some(strategy)).unwrap();
    let report = sim.orchestrate_now().unwrap().unwrap();

    assert!(report.migrations >= 1);
    assert!(sim.network().node(A).unwrap().allocated() < load_a_before);
    sim.network().check_invariants().unwrap();
}

#[test]
fn test_disabled_orchestration_does_nothing() {
    let network = create_imbalanced_network();
    let mut sim = Simulation::from_parts(create_config("none"), network, Box::new(StaticMobility::default()), None).unwrap();

    assert!(sim.orchestrate_now().unwrap().is_none());
    assert_eq!(sim.network().node(B).unwrap().allocated(), 0);
}
