//! End-to-end runs of the substrate through its public API.

use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use tubule_core::{
    Operation, Pipeline, Substrate, SubstrateConfig, junction::JunctionOptions,
    tubule::TubuleOptions,
};

fn substrate_400() -> Substrate {
    Substrate::new(SubstrateConfig::new(400.0, 400.0)).unwrap()
}

#[test]
fn strands_shorten_under_pure_contraction() {
    let mut s = substrate_400();
    let rejected = s.add_functions(["moveJunction", "updateTubule", "contractTubule"]);
    assert!(rejected.is_empty());

    // Bottom ends pinned to the floor; top ends free to be pulled down.
    let b0 = s.add_junction(Vec2::new(120.0, 0.0), JunctionOptions::anchored());
    let b1 = s.add_junction(Vec2::new(310.0, 0.0), JunctionOptions::anchored());
    let t0 = s.add_junction(Vec2::new(95.0, 400.0), JunctionOptions::default());
    let t1 = s.add_junction(Vec2::new(340.0, 400.0), JunctionOptions::default());
    let left = s.add_tubule(b0, t0, TubuleOptions::default()).unwrap();
    let right = s.add_tubule(b1, t1, TubuleOptions::default()).unwrap();

    let initial = [s.tubule(left).unwrap().norm, s.tubule(right).unwrap().norm];

    for _ in 0..1000 {
        s.tick();
    }

    assert!(s.tubule(left).unwrap().norm < initial[0]);
    assert!(s.tubule(right).unwrap().norm < initial[1]);
    // Anchors did not move.
    assert_eq!(s.junction(b0).unwrap().pos, Vec2::new(120.0, 0.0));
    assert_eq!(s.junction(b1).unwrap().pos, Vec2::new(310.0, 0.0));
}

#[test]
fn fully_anchored_strands_do_not_move() {
    let mut s = substrate_400();
    s.add_functions(["moveJunction", "updateTubule", "contractTubule"]);
    let [left, right] = s.seed_strands([120.0, 310.0], [95.0, 340.0]).unwrap();
    let initial = [s.tubule(left).unwrap().norm, s.tubule(right).unwrap().norm];

    for _ in 0..100 {
        s.tick();
    }

    assert_eq!(s.tubule(left).unwrap().norm, initial[0]);
    assert_eq!(s.tubule(right).unwrap().norm, initial[1]);
}

#[test]
fn junction_past_right_edge_wraps_within_two_ticks() {
    let mut s = substrate_400();
    s.add_functions(["wrapSubstrate", "moveJunction"]);
    let a = s.add_junction(Vec2::new(395.0, 40.0), JunctionOptions::default());
    let b = s.add_junction(Vec2::new(402.0, 50.0), JunctionOptions::default());
    let t = s.add_tubule(a, b, TubuleOptions::default()).unwrap();

    // Move runs first and has nothing to wrap; the wrap pass flags it.
    s.tick();
    assert_eq!(s.tubule(t).unwrap().crossover, 1);
    assert_eq!(s.junction(b).unwrap().cross, 1);

    s.tick();
    let jb = s.junction(b).unwrap();
    assert!((0.0..400.0).contains(&jb.pos.x));
    assert_eq!(jb.pos, Vec2::new(2.0, 50.0));
    assert_eq!(jb.cross, 0);
    assert_eq!(s.tubule(t).unwrap().crossover, 1);
}

#[test]
fn split_target_boundary_is_deterministic() {
    let mut s = substrate_400();
    let a = s.add_junction(Vec2::new(50.0, 0.0), JunctionOptions::anchored());
    let b = s.add_junction(Vec2::new(50.0, 100.0), JunctionOptions::anchored());
    let c = s.add_junction(Vec2::new(250.0, 0.0), JunctionOptions::anchored());
    let d = s.add_junction(Vec2::new(250.0, 100.0), JunctionOptions::anchored());
    let first = s.add_tubule(a, b, TubuleOptions::default()).unwrap();
    let second = s.add_tubule(c, d, TubuleOptions::default()).unwrap();

    assert_eq!(s.select_split_target(99.0).map(|(t, _)| t), Some(first));
    assert_eq!(s.select_split_target(100.0).map(|(t, _)| t), Some(first));
    assert_eq!(s.select_split_target(100.5).map(|(t, _)| t), Some(second));
    assert_eq!(s.select_split_target(199.9).map(|(t, _)| t), Some(second));

    let out = s.split_at(100.0, 1.0).unwrap();
    assert_eq!(out.target, first);
    assert_eq!(s.junction(out.branch).unwrap().pos, Vec2::new(50.0, 100.0));
}

#[test]
fn growing_tip_fuses_into_crossing_strand() {
    let mut s = substrate_400();
    s.add_functions(["moveJunction", "mergeTubule", "updateTubule", "growTubule"]);

    let w = s.add_junction(Vec2::new(100.0, 50.0), JunctionOptions::anchored());
    let e = s.add_junction(Vec2::new(300.0, 50.0), JunctionOptions::anchored());
    let strand = s.add_tubule(w, e, TubuleOptions::default()).unwrap();

    let root = s.add_junction(Vec2::new(200.0, 0.0), JunctionOptions::anchored());
    let tip = s.add_junction(Vec2::new(200.0, 40.0), JunctionOptions::growing());
    s.add_tubule(root, tip, TubuleOptions::default()).unwrap();

    let mut merged = false;
    for _ in 0..100 {
        s.tick();
        if s.tubule(strand).unwrap().pending_removal {
            merged = true;
            break;
        }
    }
    assert!(merged, "tip never reached the strand");

    let j = s.junction(tip).unwrap();
    assert!(!j.growing);
    assert_eq!(
        j.adjacent.iter().copied().collect::<Vec<_>>(),
        vec![w, e, root]
    );
    assert!(!s.junction(w).unwrap().is_adjacent(e));
    assert!(s.is_adjacency_symmetric());

    let report = s.sweep_pending();
    assert_eq!(report.tubules, vec![strand]);
    assert_eq!(s.tubule_count(), 3);
}

#[test]
fn long_growth_run_keeps_invariants() {
    let mut s = substrate_400();
    *s.pipeline_mut() = Pipeline::default_growth();
    let mut rng = StdRng::seed_from_u64(42);
    s.init_substrate(&mut rng).unwrap();

    for frame in 0..1500 {
        let split = frame % 100 == 0;
        s.step_frame(split, &mut rng);

        for (_, t) in s.tubules() {
            assert!((-1..=1).contains(&t.crossover));
        }
        for (_, j) in s.junctions() {
            assert!((-1..=1).contains(&j.cross));
            assert!(j.pos.is_finite());
            // Growth runs after the clamp, so a tip may overshoot by one step.
            assert!((-1.0..=401.0).contains(&j.pos.y));
        }
    }

    s.sweep_pending();
    assert!(s.is_adjacency_symmetric());
    // 15 splits, each a net +2 tubules once swept; merges only add more.
    assert!(s.tubule_count() >= 2 + 2 * 15);

    s.run(Operation::UpdateTubule);
    let width = s.width();
    for (_, t) in s.tubules() {
        let p1 = s.junction(t.j1).unwrap().pos;
        let p2 = s.junction(t.j2).unwrap().pos;
        let mut expected = p2 - p1;
        expected.x += f32::from(t.crossover) * width;
        assert_eq!(t.vector, expected);
    }
}

#[test]
fn default_flow_drifts_junctions_downward() {
    let mut cfg = SubstrateConfig::new(400.0, 400.0);
    cfg.flowing = true;
    let mut s = Substrate::new(cfg).unwrap();
    s.add_functions(["moveJunction"]);
    let j = s.add_junction(Vec2::new(50.0, 200.0), JunctionOptions::default());

    for _ in 0..100_000 {
        s.tick();
    }

    // 1e5 ticks at the default 1e-7 per tick.
    let pos = s.junction(j).unwrap().pos;
    assert_eq!(pos.x, 50.0);
    assert!((pos.y - 199.99).abs() < 1e-4, "y = {}", pos.y);
}

#[test]
fn unknown_operations_are_reported_and_skipped() {
    let mut s = substrate_400();
    let rejected = s.add_functions(["moveJunction", "teleportJunction", "updateTubule"]);
    assert_eq!(rejected, vec!["teleportJunction".to_string()]);
    assert_eq!(s.pipeline().junction_ops(), &[Operation::MoveJunction]);
    assert_eq!(s.pipeline().tubule_ops(), &[Operation::UpdateTubule]);
}

#[test]
fn config_from_json_builds_a_substrate() {
    let cfg = SubstrateConfig::from_json(
        r#"{"width": 300, "height": 200, "wrap_x": false, "hookes": 0.001}"#,
    )
    .unwrap();
    let s = Substrate::new(cfg).unwrap();
    assert_eq!(s.width(), 300.0);
    assert_eq!(s.height(), 200.0);
    assert!(!s.config().wrap_x);
    assert_eq!(s.config().hookes, 0.001);
}
