// ==========================================
// 模拟引擎场景测试
// ==========================================
// 测试目标: 纯引擎计算（不落库）
// 覆盖: 单司机/疲劳/无司机/未知线路 + 多司机分配全流程 + 结果不变量
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use chrono::Duration;
use fleet_logistics_sim::config::SimulationParameters;
use fleet_logistics_sim::domain::{FleetSnapshot, SimulationInput, TrafficLevel};
use fleet_logistics_sim::engine::{EngineError, SimulationEngine};
use fleet_logistics_sim::logging;
use test_helpers::{at, driver, order, plan_date, route};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// 3 名司机、3 条线路、6 个订单（与 seed_sample_fleet 一致）
fn sample_snapshot() -> FleetSnapshot {
    FleetSnapshot::new(
        vec![driver("D1", 0.0), driver("D2", 4.0), driver("D3", 9.0)],
        vec![
            route("R1", 10.0, TrafficLevel::Low, 30.0),
            route("R2", 25.0, TrafficLevel::Medium, 60.0),
            route("R3", 12.0, TrafficLevel::High, 45.0),
        ],
        vec![
            order("O1", 1500.0, "R1", at(10, 0)),
            order("O2", 800.0, "R2", at(10, 30)),
            order("O3", 2200.0, "R3", at(9, 50)),
            order("O4", 450.0, "R1", at(11, 0)),
            order("O5", 3000.0, "R2", at(9, 30)),
            order("O6", 1200.0, "R3", at(12, 0)),
        ],
    )
}

// ==========================================
// 基础场景
// ==========================================

#[test]
fn test_fresh_driver_delivers_high_value_order_on_time() {
    logging::init_test();

    let snapshot = FleetSnapshot::new(
        vec![driver("D1", 0.0)],
        vec![route("R1", 10.0, TrafficLevel::Low, 30.0)],
        vec![order("O1", 1500.0, "R1", at(23, 59))],
    );

    let outcome = SimulationEngine::default()
        .run(&snapshot, &SimulationInput::new(1, "09:00", 8.0))
        .unwrap();

    let r = &outcome.order_results[0];
    assert!(!r.is_late);
    assert_close(r.fuel_cost, 50.0);
    assert_close(r.bonus, 150.0);
    assert_close(r.penalty, 0.0);
    assert_close(r.net_contribution, 1600.0);
    assert_eq!(outcome.summary.on_time_deliveries, 1);
    assert_close(outcome.summary.efficiency_score, 100.0);
}

#[test]
fn test_fatigued_driver_is_slower_and_misses_deadline() {
    logging::init_test();

    let snapshot = FleetSnapshot::new(
        vec![driver("D1", 9.0)],
        vec![route("R1", 10.0, TrafficLevel::Low, 30.0)],
        vec![order("O1", 1500.0, "R1", at(9, 35))],
    );

    let outcome = SimulationEngine::default()
        .run(&snapshot, &SimulationInput::new(1, "09:00", 12.0))
        .unwrap();

    let r = &outcome.order_results[0];
    assert_close(r.traversal_minutes.unwrap(), 30.0 / 0.7);
    assert!(r.completion_time.unwrap() > at(9, 42));
    assert!(r.is_late);
    assert_close(r.bonus, 0.0);
    assert_close(r.penalty, 150.0);
    assert_close(r.net_contribution, 1500.0 - 150.0 - 50.0);
}

#[test]
fn test_deadline_equal_to_completion_counts_as_on_time() {
    let snapshot = FleetSnapshot::new(
        vec![driver("D1", 0.0)],
        vec![route("R1", 10.0, TrafficLevel::Low, 30.0)],
        vec![order("O1", 500.0, "R1", at(9, 30))],
    );

    let outcome = SimulationEngine::default()
        .run(&snapshot, &SimulationInput::new(1, "09:00", 8.0))
        .unwrap();

    assert_eq!(outcome.order_results[0].completion_time, Some(at(9, 30)));
    assert!(!outcome.order_results[0].is_late);
}

#[test]
fn test_zero_available_drivers_marks_every_order_late() {
    let snapshot = sample_snapshot();

    let outcome = SimulationEngine::default()
        .run(&snapshot, &SimulationInput::new(0, "09:00", 8.0))
        .unwrap();

    assert_eq!(outcome.summary.total_deliveries, 6);
    assert_eq!(outcome.summary.on_time_deliveries, 0);
    assert_close(outcome.summary.efficiency_score, 0.0);
    for r in &outcome.order_results {
        assert!(!r.is_assigned());
        assert!(r.is_late);
        assert!(r.fuel_cost > 0.0);
        assert_close(r.bonus, 0.0);
    }
}

#[test]
fn test_unknown_route_is_reference_error() {
    let mut snapshot = sample_snapshot();
    snapshot.orders.push(order("O9", 900.0, "R404", at(15, 0)));

    let err = SimulationEngine::default()
        .run(&snapshot, &SimulationInput::new(2, "09:00", 8.0))
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::UnknownRoute {
            order_id: "O9".to_string(),
            route_id: "R404".to_string(),
        }
    );
    assert_eq!(err.kind(), "ReferenceError");
}

// ==========================================
// 多司机分配全流程
// ==========================================

#[test]
fn test_sample_fleet_full_walkthrough() {
    logging::init_test();

    let outcome = SimulationEngine::default()
        .run(&sample_snapshot(), &SimulationInput::new(3, "09:00", 8.0))
        .unwrap();

    assert_eq!(outcome.plan_date, Some(plan_date()));

    // 处理顺序: 按截止时间
    let ids: Vec<&str> = outcome.order_results.iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(ids, vec!["O5", "O3", "O1", "O2", "O4", "O6"]);

    // D3 当班 9h 超过上限 8h, 不参与分配
    let drivers: Vec<Option<&str>> = outcome
        .order_results
        .iter()
        .map(|r| r.assigned_driver_id.as_deref())
        .collect();
    assert_eq!(
        drivers,
        vec![Some("D1"), Some("D2"), Some("D2"), Some("D1"), Some("D2"), Some("D2")]
    );

    let completions: Vec<_> = outcome.order_results.iter().map(|r| r.completion_time.unwrap()).collect();
    assert_eq!(
        completions,
        vec![at(10, 0), at(9, 45), at(10, 15), at(11, 0), at(10, 45), at(11, 30)]
    );

    let late: Vec<bool> = outcome.order_results.iter().map(|r| r.is_late).collect();
    assert_eq!(late, vec![true, false, true, true, false, false]);

    let summary = &outcome.summary;
    assert_eq!(summary.total_deliveries, 6);
    assert_eq!(summary.on_time_deliveries, 3);
    assert_close(summary.efficiency_score, 50.0);
    assert_close(summary.fuel_cost, 518.0);
    assert_close(summary.bonuses, 340.0);
    assert_close(summary.penalties, 530.0);
    assert_close(summary.total_profit, 8442.0);

    let fuel: Vec<(&str, f64)> = summary
        .fuel_cost_breakdown
        .iter()
        .map(|p| (p.label.as_str(), p.value))
        .collect();
    assert_eq!(fuel, vec![("Low", 100.0), ("Medium", 250.0), ("High", 168.0)]);
}

#[test]
fn test_daily_hour_cap_leaves_remaining_orders_unassigned() {
    let outcome = SimulationEngine::default()
        .run(&sample_snapshot(), &SimulationInput::new(1, "09:00", 1.0))
        .unwrap();

    // 仅 60 分钟可用: 第一单 (R2, 60min) 恰好用尽
    let assigned: Vec<&str> = outcome
        .order_results
        .iter()
        .filter(|r| r.is_assigned())
        .map(|r| r.order_id.as_str())
        .collect();
    assert_eq!(assigned, vec!["O5"]);
    assert_eq!(outcome.summary.on_time_deliveries, 0);
}

#[test]
fn test_explicit_plan_date_shifts_completion_times() {
    let next_day = plan_date() + Duration::days(1);
    let outcome = SimulationEngine::default()
        .run(
            &sample_snapshot(),
            &SimulationInput::new(3, "09:00", 8.0).with_plan_date(next_day),
        )
        .unwrap();

    // 次日发车,全部晚于当日截止时间
    assert_eq!(outcome.plan_date, Some(next_day));
    assert_eq!(outcome.summary.on_time_deliveries, 0);
}

#[test]
fn test_custom_parameters_change_financials() {
    let params = SimulationParameters {
        late_penalty_rate: 0.5,
        bonus_rate: 0.2,
        ..SimulationParameters::default()
    };

    let outcome = SimulationEngine::new(params)
        .run(&sample_snapshot(), &SimulationInput::new(3, "09:00", 8.0))
        .unwrap();

    assert_close(outcome.summary.penalties, 0.5 * (3000.0 + 1500.0 + 800.0));
    assert_close(outcome.summary.bonuses, 0.2 * (2200.0 + 1200.0));
}

#[test]
fn test_invalid_parameters_rejected() {
    let params = SimulationParameters {
        fatigued_speed_factor: 0.0,
        ..SimulationParameters::default()
    };
    let err = SimulationEngine::new(params)
        .run(&sample_snapshot(), &SimulationInput::new(1, "09:00", 8.0))
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
}

// ==========================================
// 结果不变量
// ==========================================

fn input_grid() -> Vec<SimulationInput> {
    let mut inputs = Vec::new();
    for drivers in 0..=3 {
        for start in ["06:00", "09:00", "9:45", "22:30"] {
            for hours in [1.0, 4.5, 8.0, 24.0] {
                inputs.push(SimulationInput::new(drivers, start, hours));
            }
        }
    }
    inputs
}

#[test]
fn test_outcome_invariants_hold_across_inputs() {
    let snapshot = sample_snapshot();
    let engine = SimulationEngine::default();

    for input in input_grid() {
        let outcome = engine.run(&snapshot, &input).unwrap();
        let summary = &outcome.summary;

        // 每个订单恰好一条结果
        assert_eq!(outcome.order_results.len(), snapshot.orders.len());
        assert_eq!(summary.total_deliveries, snapshot.orders.len());
        assert!(summary.on_time_deliveries <= summary.total_deliveries);
        assert!((0.0..=100.0).contains(&summary.efficiency_score));

        let net_sum: f64 = outcome.order_results.iter().map(|r| r.net_contribution).sum();
        assert_close(summary.total_profit, net_sum);

        let breakdown_sum: f64 = summary.fuel_cost_breakdown.iter().map(|p| p.value).sum();
        assert_close(breakdown_sum, summary.fuel_cost);

        let delivery_sum: f64 = summary.delivery_breakdown.iter().map(|p| p.value).sum();
        assert_close(delivery_sum, summary.total_deliveries as f64);

        for r in &outcome.order_results {
            // 奖励与罚金互斥
            assert!(r.bonus == 0.0 || r.penalty == 0.0, "{:?}", r);
            assert_eq!(r.penalty > 0.0, r.is_late);
            // 未分配必迟到
            if !r.is_assigned() {
                assert!(r.is_late);
                assert!(r.completion_time.is_none());
            }
        }
    }
}

#[test]
fn test_fuel_cost_depends_only_on_route() {
    let snapshot = sample_snapshot();
    let engine = SimulationEngine::default();
    let baseline = engine
        .run(&snapshot, &SimulationInput::new(3, "09:00", 8.0))
        .unwrap();

    for input in input_grid() {
        let outcome = engine.run(&snapshot, &input).unwrap();
        for (a, b) in outcome.order_results.iter().zip(&baseline.order_results) {
            assert_eq!(a.order_id, b.order_id);
            assert_close(a.fuel_cost, b.fuel_cost);
        }
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let snapshot = sample_snapshot();
    let engine = SimulationEngine::default();
    let input = SimulationInput::new(2, "08:15", 6.0);

    let first = engine.run(&snapshot, &input).unwrap();
    let second = engine.run(&snapshot, &input).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_snapshot_order_does_not_change_outcome() {
    let snapshot = sample_snapshot();
    let mut shuffled = snapshot.clone();
    shuffled.drivers.reverse();
    shuffled.routes.reverse();
    shuffled.orders.reverse();

    let engine = SimulationEngine::default();
    let input = SimulationInput::new(3, "09:00", 8.0);

    assert_eq!(
        engine.run(&snapshot, &input).unwrap(),
        engine.run(&shuffled, &input).unwrap()
    );
}
