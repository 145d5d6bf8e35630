//! Integration tests for u-strippack.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use u_strippack::packing::{place, prepare, Placement, PlacementPolicy, Rectangle};
use u_strippack::vns::{vnd, Candidate, Method, MoveSet, SearchSpace, VnsConfig, VnsRunner};
use u_strippack::{Error, StripPacker};

fn shelves() -> Vec<Rectangle> {
    vec![
        Rectangle::new("1", 8, 4),
        Rectangle::new("2", 6, 4),
        Rectangle::new("3", 4, 4),
        Rectangle::new("4", 2, 4),
    ]
}

/// A fixed, irregular instance of 24 rectangles for a strip of width 20.
fn mixed() -> Vec<Rectangle> {
    (0..24u32)
        .map(|i| {
            let w = 1 + (i * 7) % 9;
            let h = 1 + (i * 5) % 7;
            Rectangle::new(format!("r{i}"), w, h)
        })
        .collect()
}

fn assert_valid(placements: &[Placement], strip_width: u32) {
    for p in placements {
        assert!(p.x >= 0 && p.y >= 0, "{p:?} starts outside the strip");
        assert!(p.right() <= i64::from(strip_width), "{p:?} crosses the strip edge");
    }
    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_two_shelves_reach_area_bound() {
        let config = VnsConfig::for_items(4).with_method(Method::Vnd);
        let result = StripPacker::new(10, config).solve(&shelves()).unwrap();

        assert!(result.complete);
        // 80 units of area on a width-10 strip cannot be shorter than 8.
        assert_eq!(result.cost, 8);
        assert_eq!(result.placements.len(), 4);
        assert_valid(&result.placements, 10);
    }

    #[test]
    fn test_too_wide_rectangle_is_turned() {
        let prepared = prepare(&[Rectangle::new("wide", 15, 4)], 10);
        assert!(prepared.oversized.is_empty());

        let config = VnsConfig::for_items(1).with_method(Method::Vnd);
        let result = StripPacker::new(10, config)
            .solve(&prepared.rectangles)
            .unwrap();
        assert_eq!(result.cost, 15);
        assert_eq!((result.placements[0].width, result.placements[0].height), (4, 15));
    }

    #[test]
    fn test_oversized_rectangle_becomes_placeholder() {
        let raw = vec![
            Rectangle::new("big", 20, 20),
            Rectangle::new("a", 5, 2),
            Rectangle::new("b", 5, 2),
        ];
        let prepared = prepare(&raw, 10);
        assert_eq!(prepared.oversized, vec![0]);
        assert_eq!(prepared.rectangles.len(), 3);

        let config = VnsConfig::for_items(3).with_method(Method::Vnd);
        let result = StripPacker::new(10, config)
            .solve(&prepared.rectangles)
            .unwrap();
        assert!(result.complete);
        assert_eq!(result.placements.len(), 2);
        assert_eq!(result.cost, 2);
    }

    #[test]
    fn test_unplaceable_start_is_reported_incomplete() {
        let config = VnsConfig::default().with_method(Method::Vnd).with_k_max(2);
        let result = StripPacker::new(10, config)
            .solve(&[Rectangle::new("wide", 15, 15)])
            .unwrap();
        assert!(!result.complete);
    }

    #[test]
    fn test_search_never_adopts_aborted_layout() {
        // Without rotation the wide rectangle cannot be placed; that layout
        // aborts early and reports a lower, meaningless cost.
        let rects = vec![
            Rectangle::new("wide", 15, 4),
            Rectangle::new("a", 3, 3),
            Rectangle::new("b", 2, 5),
        ];
        let policy = PlacementPolicy::default().with_check_rotation(true);
        let aborted = place(&rects, 10, &policy.with_check_rotation(false));
        assert!(!aborted.is_complete());

        for moves in [MoveSet::Policy, MoveSet::Combined] {
            for method in Method::ALL {
                let config = VnsConfig::for_items(rects.len())
                    .with_method(method)
                    .with_moves(moves)
                    .with_policy(policy)
                    .with_alpha(50.0)
                    .with_time_limit_ms(10)
                    .with_seed(2);
                let result = StripPacker::new(10, config).solve(&rects).unwrap();

                assert!(result.complete, "{method} with {moves:?}");
                assert_eq!(result.placements.len(), 3, "{method} with {moves:?}");
                assert!(result.cost >= 15, "{method} with {moves:?}: {}", result.cost);
                assert_valid(&result.placements, 10);
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let packer = StripPacker::new(10, VnsConfig::default());
        assert_eq!(packer.solve(&[]).unwrap_err(), Error::EmptyInstance);

        let packer = StripPacker::new(0, VnsConfig::default());
        assert_eq!(packer.solve(&shelves()).unwrap_err(), Error::InvalidStripWidth);
    }
}

mod driver_tests {
    use super::*;

    fn candidate(rects: Vec<Rectangle>, width: u32) -> Candidate {
        Candidate::new(rects, PlacementPolicy::default(), SearchSpace::new(width))
    }

    #[test]
    fn test_vnd_k_max_one_is_a_single_sweep() {
        let config = VnsConfig::default().with_method(Method::Vnd).with_k_max(1);
        let result = VnsRunner::run(candidate(shelves(), 10), &config).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.evaluations, 4, "one neighbour per position");
        assert_eq!(result.cost_history.len(), 1);
    }

    #[test]
    fn test_rvns_zero_budget_runs_one_sweep() {
        let config = VnsConfig::for_items(4)
            .with_method(Method::Rvns)
            .with_time_limit_ms(0)
            .with_seed(3);
        let result = VnsRunner::run(candidate(shelves(), 10), &config).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.cost_history.len(), 1);
    }

    #[test]
    fn test_every_method_never_worsens_start() {
        let start = candidate(mixed(), 20);
        let initial = start.cost();
        for method in Method::ALL {
            let config = VnsConfig::for_items(24)
                .with_method(method)
                .with_time_limit_ms(30)
                .with_seed(11);
            let result = VnsRunner::run(start.clone(), &config).unwrap();

            assert!(result.best.is_complete(), "{method}");
            assert!(result.best_cost <= initial, "{method}: {} > {initial}", result.best_cost);
            assert_valid(result.best.placements(), 20);
            assert_eq!(result.best.placements().len(), 24);
        }
    }

    #[test]
    fn test_single_sweep_is_reproducible() {
        for method in [Method::Rvns, Method::Bvns, Method::Gvns, Method::Svns] {
            let config = VnsConfig::for_items(24)
                .with_method(method)
                .with_time_limit_ms(0)
                .with_seed(99);
            let a = VnsRunner::run(candidate(mixed(), 20), &config).unwrap();
            let b = VnsRunner::run(candidate(mixed(), 20), &config).unwrap();

            assert_eq!(a.best_cost, b.best_cost, "{method}");
            assert_eq!(a.best.order(), b.best.order(), "{method}");
            assert_eq!(a.evaluations, b.evaluations, "{method}");
        }
    }

    #[test]
    fn test_vnd_is_deterministic_across_evaluation_modes() {
        let sequential = Candidate::new(
            mixed(),
            PlacementPolicy::default(),
            SearchSpace::new(20).with_parallel(false),
        );
        let parallel = Candidate::new(
            mixed(),
            PlacementPolicy::default(),
            SearchSpace::new(20).with_parallel(true),
        );

        let a = vnd(sequential, 12);
        let b = vnd(parallel, 12);
        assert_eq!(a.cost(), b.cost());
        assert_eq!(a.order(), b.order());
    }

    #[test]
    fn test_policy_moves_keep_the_order() {
        let space = SearchSpace::new(20).with_moves(MoveSet::Policy);
        let start = Candidate::new(mixed(), PlacementPolicy::default(), space);
        let best = vnd(start.clone(), 7);

        assert_eq!(best.order(), start.order());
        assert!(best.cost() <= start.cost());
        assert_eq!(
            best.cost(),
            place(best.order(), 20, best.policy()).cost(),
            "cost is the placer's"
        );
    }

    #[test]
    fn test_cancelled_run_stops_after_one_sweep() {
        let cancel = Arc::new(AtomicBool::new(true));
        let config = VnsConfig::for_items(24)
            .with_method(Method::Bvns)
            .with_time_limit_ms(60_000);
        let result = StripPacker::new(20, config)
            .solve_with_cancel(&mixed(), Some(cancel))
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.iterations, 1);
    }
}

mod solver_tests {
    use super::*;

    #[test]
    fn test_prepared_instance_end_to_end() {
        let prepared = prepare(&mixed(), 20);
        let config = VnsConfig::for_items(24)
            .with_method(Method::Gvns)
            .with_moves(MoveSet::Combined)
            .with_time_limit_ms(50)
            .with_seed(5);
        let result = StripPacker::new(20, config)
            .solve(&prepared.rectangles)
            .unwrap();

        assert!(result.complete);
        assert_valid(&result.placements, 20);
        let item_area: u64 = mixed().iter().map(Rectangle::area).sum();
        assert_eq!(result.item_area(), item_area);
        assert!(result.area() >= item_area);
        assert!(result.utilization() > 0.0 && result.utilization() <= 1.0);
        assert!(result.cost <= result.initial_cost);
        assert_eq!(result.cost_history.len(), result.iterations);
    }

    #[test]
    fn test_compare_picks_lowest_cost() {
        let config = VnsConfig::for_items(24).with_time_limit_ms(10).with_seed(8);
        let comparison = StripPacker::new(20, config)
            .compare(&prepare(&mixed(), 20).rectangles)
            .unwrap();

        assert_eq!(comparison.runs.len(), Method::ALL.len());
        let best = comparison.best().unwrap();
        for run in &comparison.runs {
            assert!(best.cost <= run.cost, "{} beat {}", run.method, best.method);
        }
    }
}
