//! Property-based tests for ranking invariants.
//!
//! Uses `proptest` to verify that arbitrary candidate pools and benchmark
//! bands maintain the ordering contract: bounded result size, unique asset
//! ids, score-then-distance-then-id ordering, determinism, and score
//! consistency with the standalone scorer.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rusqlite::{Connection, params};

use crate::catalog::asset::AssetType;
use crate::catalog::filters::SegmentFilter;
use crate::catalog::metrics::{IMAGE_METRICS, MetricSpec};
use crate::core::config::SelectionConfig;
use crate::ranking::ranker::{RankOutcome, Ranker};
use crate::ranking::scorer::score_asset;
use crate::ranking::thresholds::ThresholdMap;
use crate::store::schema::apply_schema;

// ──────────────────── strategies ────────────────────

#[derive(Debug, Clone)]
struct Bands {
    benefit_lower: f64,
    cd_min: f64,
    cd_max: f64,
}

fn arb_bands() -> impl Strategy<Value = Bands> {
    (0.3f64..0.7, 0.05f64..0.45, 0.55f64..0.95).prop_map(|(benefit_lower, cd_min, cd_max)| Bands {
        benefit_lower,
        cd_min,
        cd_max,
    })
}

fn arb_asset_values() -> impl Strategy<Value = [f64; 6]> {
    [
        0.0f64..1.0,
        0.0f64..1.0,
        0.0f64..1.0,
        0.0f64..1.0,
        0.0f64..1.0,
        0.0f64..1.0,
    ]
}

fn arb_pool() -> impl Strategy<Value = BTreeMap<String, [f64; 6]>> {
    prop::collection::btree_map("[a-z]{1,6}", arb_asset_values(), 1..25)
}

// ──────────────────── fixture plumbing ────────────────────

fn seeded_connection(pool: &BTreeMap<String, [f64; 6]>, bands: &Bands) -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    apply_schema(&conn).expect("apply schema");

    for (asset_id, values) in pool {
        for (spec, value) in IMAGE_METRICS.iter().zip(values) {
            conn.execute(
                "INSERT INTO image_metrics (
                    asset_id, path_bucket, industry_category, industry_subcategory,
                    usecase_category, usecase_subcategory, platform, device, context,
                    metric, value, time
                ) VALUES (?1,?2,'all','all','all','all','all','all','all',?3,?4,'total')",
                params![
                    asset_id,
                    format!("gs://media/{asset_id}.png"),
                    spec.name,
                    value
                ],
            )
            .expect("insert metric");
        }
    }

    for spec in IMAGE_METRICS {
        let (high_lower, low_upper) = if spec.name == "cognitive_demand" {
            (bands.cd_max, bands.cd_min)
        } else {
            (bands.benefit_lower, bands.benefit_lower / 2.0)
        };
        conn.execute(
            "INSERT INTO image_benchmarks (
                industry_category, industry_subcategory, usecase_category,
                usecase_subcategory, platform, device, context,
                metric, type, lower, upper, time
            ) VALUES ('all','all','all','all','all','all','all',?1,'high',?2,1.0,'total')",
            params![spec.name, high_lower],
        )
        .expect("insert high band");
        conn.execute(
            "INSERT INTO image_benchmarks (
                industry_category, industry_subcategory, usecase_category,
                usecase_subcategory, platform, device, context,
                metric, type, lower, upper, time
            ) VALUES ('all','all','all','all','all','all','all',?1,'low',0.0,?2,'total')",
            params![spec.name, low_upper],
        )
        .expect("insert low band");
    }

    conn
}

fn expected_thresholds(bands: &Bands, specs: &[MetricSpec]) -> ThresholdMap {
    let mut map = ThresholdMap::default();
    for spec in specs {
        if spec.name == "cognitive_demand" {
            map.insert(spec.max_key(), bands.cd_max);
            map.insert(spec.min_key(), bands.cd_min);
        } else {
            map.insert(spec.name, bands.benefit_lower);
        }
    }
    map
}

fn rank_pool(pool: &BTreeMap<String, [f64; 6]>, bands: &Bands) -> RankOutcome {
    let conn = seeded_connection(pool, bands);
    let ranker = Ranker::new(&conn, &SelectionConfig::default());
    ranker
        .rank(AssetType::Image, &SegmentFilter::any())
        .expect("rank never hard-fails on a fully seeded pool")
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn result_is_bounded_and_ids_are_unique(pool in arb_pool(), bands in arb_bands()) {
        let outcome = rank_pool(&pool, &bands);
        let assets = outcome.assets();

        prop_assert!(assets.len() <= 10);
        prop_assert!(assets.len() <= pool.len());

        let mut seen = std::collections::HashSet::new();
        for asset in assets {
            prop_assert!(seen.insert(&asset.asset_id), "duplicate {}", asset.asset_id);
        }
    }

    #[test]
    fn ordering_is_score_then_distance_then_id(pool in arb_pool(), bands in arb_bands()) {
        let outcome = rank_pool(&pool, &bands);
        let assets = outcome.assets();

        for pair in assets.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.score >= b.score, "score order broken: {a:?} before {b:?}");
            if a.score == b.score {
                prop_assert!(
                    a.distance_to_best <= b.distance_to_best,
                    "distance order broken: {a:?} before {b:?}"
                );
                if (a.distance_to_best - b.distance_to_best).abs() < f64::EPSILON {
                    prop_assert!(a.asset_id < b.asset_id, "id order broken");
                }
            }
        }
    }

    #[test]
    fn ranking_is_deterministic(pool in arb_pool(), bands in arb_bands()) {
        let first = rank_pool(&pool, &bands);
        let second = rank_pool(&pool, &bands);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn scores_agree_with_the_standalone_scorer(pool in arb_pool(), bands in arb_bands()) {
        let outcome = rank_pool(&pool, &bands);
        let thresholds = expected_thresholds(&bands, IMAGE_METRICS);

        for asset in outcome.assets() {
            let values: BTreeMap<String, f64> = IMAGE_METRICS
                .iter()
                .zip(&pool[&asset.asset_id])
                .map(|(spec, value)| (spec.name.to_string(), *value))
                .collect();
            let breakdown = score_asset(&asset.asset_id, &values, &thresholds, IMAGE_METRICS)
                .expect("all keys present");
            prop_assert_eq!(breakdown.score, asset.score);
            prop_assert_eq!(breakdown.which_metrics, asset.which_metrics.clone());
        }
    }
}
