// ==========================================
// FleetApi 集成测试
// ==========================================
// 测试目标: 司机 / 线路 / 订单 增删改查 + 展示视图 + 汇总
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use fleet_logistics_sim::api::ApiError;
use fleet_logistics_sim::config::config_keys;
use fleet_logistics_sim::domain::{FatigueStatus, OrderPriority, RouteEfficiency, TrafficLevel};
use fleet_logistics_sim::logging;
use test_helpers::{at, create_test_state, driver, order, route, seed_sample_fleet};

// ==========================================
// 司机
// ==========================================

#[tokio::test]
async fn test_driver_crud() {
    logging::init_test();

    let (_tmp, state) = create_test_state().unwrap();
    let api = &state.fleet_api;

    let created = api.create_driver(driver("D1", 2.0)).unwrap();
    assert_eq!(api.get_driver("D1").unwrap(), created);

    let mut changed = created.clone();
    changed.current_shift_hours = 7.5;
    api.update_driver(changed.clone()).unwrap();
    assert_eq!(api.get_driver("D1").unwrap().current_shift_hours, 7.5);

    api.delete_driver("D1").unwrap();
    assert_eq!(api.get_driver("D1").unwrap_err().code(), "NOT_FOUND");
    assert_eq!(api.delete_driver("D1").unwrap_err().code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_driver_id_generated_when_blank() {
    let (_tmp, state) = create_test_state().unwrap();

    let created = state.fleet_api.create_driver(driver("  ", 0.0)).unwrap();
    assert!(!created.driver_id.trim().is_empty());
    assert_eq!(state.fleet_api.list_drivers().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_driver_id_rejected() {
    let (_tmp, state) = create_test_state().unwrap();

    state.fleet_api.create_driver(driver("D1", 0.0)).unwrap();
    let err = state.fleet_api.create_driver(driver("D1", 1.0)).unwrap_err();
    assert!(matches!(err, ApiError::DuplicateId(_)), "{:?}", err);
}

#[tokio::test]
async fn test_driver_validation() {
    let (_tmp, state) = create_test_state().unwrap();

    let mut bad = driver("D1", -1.0);
    bad.past_7_day_work_hours = 200.0;
    let err = state.fleet_api.create_driver(bad).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(state.fleet_api.list_drivers().unwrap().is_empty());
}

#[tokio::test]
async fn test_driver_views_and_summary() {
    let (_tmp, state) = create_test_state().unwrap();
    seed_sample_fleet(&state).unwrap();
    state.fleet_api.create_driver(driver("D4", 7.0)).unwrap();

    let views = state.fleet_api.list_driver_views().await.unwrap();
    let statuses: Vec<(&str, FatigueStatus)> = views
        .iter()
        .map(|v| (v.driver.driver_id.as_str(), v.fatigue_status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("D1", FatigueStatus::Fresh),
            ("D2", FatigueStatus::Fresh),
            ("D3", FatigueStatus::Fatigued),
            ("D4", FatigueStatus::Tired),
        ]
    );

    let summary = state.fleet_api.driver_summary().await.unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.fatigued, 1);
    assert_eq!(summary.fit, 3);
    assert!((summary.average_shift_hours - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_fatigue_threshold_override_reflected_in_views() {
    let (_tmp, state) = create_test_state().unwrap();
    seed_sample_fleet(&state).unwrap();

    state
        .config_manager
        .set_global_config_value(config_keys::FATIGUE_THRESHOLD_HOURS, "3")
        .unwrap();

    let summary = state.fleet_api.driver_summary().await.unwrap();
    assert_eq!(summary.fatigued, 2);
}

// ==========================================
// 线路
// ==========================================

#[tokio::test]
async fn test_route_crud_and_views() {
    let (_tmp, state) = create_test_state().unwrap();
    let api = &state.fleet_api;

    api.create_route(route("R1", 10.0, TrafficLevel::Low, 15.0)).unwrap();
    api.create_route(route("R2", 12.0, TrafficLevel::High, 45.0)).unwrap();

    let mut r1 = api.get_route("R1").unwrap();
    r1.traffic_level = TrafficLevel::Medium;
    api.update_route(r1).unwrap();
    assert_eq!(api.get_route("R1").unwrap().traffic_level, TrafficLevel::Medium);

    let views = api.list_route_views().await.unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].route.route_id, "R1");
    assert_eq!(views[0].efficiency, RouteEfficiency::Excellent);
    assert!((views[0].estimated_fuel_cost - 50.0).abs() < 1e-9);
    assert_eq!(views[1].efficiency, RouteEfficiency::Average);
    assert!((views[1].minutes_per_km - 3.75).abs() < 1e-9);
    assert!((views[1].estimated_fuel_cost - 84.0).abs() < 1e-9);

    api.delete_route("R2").unwrap();
    assert_eq!(api.list_routes().unwrap().len(), 1);
}

#[tokio::test]
async fn test_route_validation_and_update_missing() {
    let (_tmp, state) = create_test_state().unwrap();

    let err = state
        .fleet_api
        .create_route(route("R1", 0.0, TrafficLevel::Low, 30.0))
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let err = state
        .fleet_api
        .update_route(route("R9", 5.0, TrafficLevel::Low, 10.0))
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_referenced_route_cannot_be_deleted() {
    let (_tmp, state) = create_test_state().unwrap();
    seed_sample_fleet(&state).unwrap();

    let err = state.fleet_api.delete_route("R1").unwrap_err();
    assert_eq!(err.code(), "BUSINESS_RULE_VIOLATION");
    assert!(state.fleet_api.get_route("R1").is_ok());

    // 删除全部引用订单后可删除
    state.fleet_api.delete_order("O1").unwrap();
    state.fleet_api.delete_order("O4").unwrap();
    state.fleet_api.delete_route("R1").unwrap();
}

// ==========================================
// 订单
// ==========================================

#[tokio::test]
async fn test_order_crud() {
    let (_tmp, state) = create_test_state().unwrap();
    let api = &state.fleet_api;

    api.create_route(route("R1", 10.0, TrafficLevel::Low, 30.0)).unwrap();
    api.create_route(route("R2", 20.0, TrafficLevel::Low, 50.0)).unwrap();
    let created = api.create_order(order(" O1 ", 900.0, "R1", at(12, 0))).unwrap();
    assert_eq!(created.order_id, "O1");

    let mut moved = api.get_order("O1").unwrap();
    moved.assigned_route = "R2".to_string();
    moved.delivery_timestamp = at(14, 30);
    api.update_order(moved.clone()).unwrap();
    assert_eq!(api.get_order("O1").unwrap(), moved);

    api.delete_order("O1").unwrap();
    assert!(api.list_orders().unwrap().is_empty());
}

#[tokio::test]
async fn test_order_with_unknown_route_is_reference_error() {
    let (_tmp, state) = create_test_state().unwrap();

    let err = state
        .fleet_api
        .create_order(order("O1", 900.0, "R404", at(12, 0)))
        .unwrap_err();
    match err {
        ApiError::ReferenceError { order_id, route_id } => {
            assert_eq!(order_id, "O1");
            assert_eq!(route_id, "R404");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_order_views_and_summary() {
    let (_tmp, state) = create_test_state().unwrap();
    seed_sample_fleet(&state).unwrap();

    let views = state.fleet_api.list_order_views().unwrap();
    let o3 = views.iter().find(|v| v.order.order_id == "O3").unwrap();
    assert_eq!(o3.priority, OrderPriority::High);
    let o4 = views.iter().find(|v| v.order.order_id == "O4").unwrap();
    assert_eq!(o4.priority, OrderPriority::Low);

    let summary = state.fleet_api.order_summary().await.unwrap();
    assert_eq!(summary.total, 6);
    assert!((summary.total_value - 9150.0).abs() < 1e-9);
    assert_eq!(summary.high_value_orders, 4);
    assert!((summary.average_value - 1525.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_view_serializes_flat_camel_case() {
    let (_tmp, state) = create_test_state().unwrap();
    seed_sample_fleet(&state).unwrap();

    let views = state.fleet_api.list_driver_views().await.unwrap();
    let json = serde_json::to_value(&views[2]).unwrap();
    assert_eq!(json["driverId"], "D3");
    assert_eq!(json["fatigueStatus"], "FATIGUED");
}
