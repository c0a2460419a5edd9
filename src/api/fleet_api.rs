// ==========================================
// 车队物流排班模拟系统 - 车队管理 API
// ==========================================
// 职责: 司机 / 线路 / 订单的增删改查 + 展示分级 + 汇总
// 约束: 订单必须引用已存在的线路; 被引用的线路不可删除
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::EntityValidator;
use crate::config::{SimulationConfigReader, SimulationParameters};
use crate::domain::fleet::{Driver, DriverSummary, Order, OrderSummary, Route};
use crate::domain::types::{FatigueStatus, OrderPriority, RouteEfficiency};
use crate::engine::{CostModel, FatigueModel};
use crate::repository::{DriverRepository, OrderRepository, RouteRepository};

// ==========================================
// 展示视图
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverView {
    #[serde(flatten)]
    pub driver: Driver,
    pub fatigue_status: FatigueStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    #[serde(flatten)]
    pub route: Route,
    pub efficiency: RouteEfficiency,
    pub minutes_per_km: f64,
    pub estimated_fuel_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub priority: OrderPriority,
}

// ==========================================
// FleetApi - 车队管理 API
// ==========================================
pub struct FleetApi {
    driver_repo: Arc<DriverRepository>,
    route_repo: Arc<RouteRepository>,
    order_repo: Arc<OrderRepository>,
    config: Arc<dyn SimulationConfigReader>,
}

impl FleetApi {
    pub fn new(
        driver_repo: Arc<DriverRepository>,
        route_repo: Arc<RouteRepository>,
        order_repo: Arc<OrderRepository>,
        config: Arc<dyn SimulationConfigReader>,
    ) -> Self {
        Self {
            driver_repo,
            route_repo,
            order_repo,
            config,
        }
    }

    async fn load_params(&self) -> ApiResult<SimulationParameters> {
        self.config
            .load_simulation_parameters()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    // ==========================================
    // 司机
    // ==========================================

    /// 新增司机（driver_id 为空时自动生成）
    pub fn create_driver(&self, mut driver: Driver) -> ApiResult<Driver> {
        EntityValidator::validate_driver(&driver)?;
        if driver.driver_id.trim().is_empty() {
            driver.driver_id = Uuid::new_v4().to_string();
        }
        driver.name = driver.name.trim().to_string();

        self.driver_repo.insert(&driver)?;
        info!(driver_id = %driver.driver_id, "司机已新增");
        Ok(driver)
    }

    pub fn update_driver(&self, driver: Driver) -> ApiResult<Driver> {
        EntityValidator::validate_driver(&driver)?;
        self.driver_repo.update(&driver)?;
        Ok(driver)
    }

    pub fn delete_driver(&self, driver_id: &str) -> ApiResult<()> {
        self.driver_repo.delete(driver_id)?;
        info!(driver_id = %driver_id, "司机已删除");
        Ok(())
    }

    pub fn get_driver(&self, driver_id: &str) -> ApiResult<Driver> {
        self.driver_repo
            .find_by_id(driver_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Driver(id={})不存在", driver_id)))
    }

    pub fn list_drivers(&self) -> ApiResult<Vec<Driver>> {
        Ok(self.driver_repo.list_all()?)
    }

    /// 司机列表（带疲劳状态）
    pub async fn list_driver_views(&self) -> ApiResult<Vec<DriverView>> {
        let fatigue = FatigueModel::from_parameters(&self.load_params().await?);
        let views = self
            .driver_repo
            .list_all()?
            .into_iter()
            .map(|driver| DriverView {
                fatigue_status: fatigue.status(&driver),
                driver,
            })
            .collect();
        Ok(views)
    }

    pub async fn driver_summary(&self) -> ApiResult<DriverSummary> {
        let fatigue = FatigueModel::from_parameters(&self.load_params().await?);
        let drivers = self.driver_repo.list_all()?;

        let total = drivers.len();
        let fatigued = drivers.iter().filter(|d| fatigue.is_fatigued(d)).count();
        let average_shift_hours = if total == 0 {
            0.0
        } else {
            drivers.iter().map(|d| d.current_shift_hours).sum::<f64>() / total as f64
        };

        Ok(DriverSummary {
            total,
            fit: total - fatigued,
            fatigued,
            average_shift_hours,
        })
    }

    // ==========================================
    // 线路
    // ==========================================

    pub fn create_route(&self, mut route: Route) -> ApiResult<Route> {
        route.route_id = route.route_id.trim().to_string();
        EntityValidator::validate_route(&route)?;
        self.route_repo.insert(&route)?;
        info!(route_id = %route.route_id, "线路已新增");
        Ok(route)
    }

    pub fn update_route(&self, route: Route) -> ApiResult<Route> {
        EntityValidator::validate_route(&route)?;
        self.route_repo.update(&route)?;
        Ok(route)
    }

    /// 删除线路（仍被订单引用时返回 BusinessRuleViolation）
    pub fn delete_route(&self, route_id: &str) -> ApiResult<()> {
        self.route_repo.delete(route_id)?;
        info!(route_id = %route_id, "线路已删除");
        Ok(())
    }

    pub fn get_route(&self, route_id: &str) -> ApiResult<Route> {
        self.route_repo
            .find_by_id(route_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Route(id={})不存在", route_id)))
    }

    pub fn list_routes(&self) -> ApiResult<Vec<Route>> {
        Ok(self.route_repo.list_all()?)
    }

    /// 线路列表（带效率分级与燃油估算）
    pub async fn list_route_views(&self) -> ApiResult<Vec<RouteView>> {
        let cost = CostModel::from_parameters(&self.load_params().await?);
        let views = self
            .route_repo
            .list_all()?
            .into_iter()
            .map(|route| RouteView {
                efficiency: route.efficiency(),
                minutes_per_km: route.minutes_per_km(),
                estimated_fuel_cost: cost.fuel_cost(&route),
                route,
            })
            .collect();
        Ok(views)
    }

    // ==========================================
    // 订单
    // ==========================================

    pub fn create_order(&self, mut order: Order) -> ApiResult<Order> {
        order.order_id = order.order_id.trim().to_string();
        EntityValidator::validate_order(&order)?;
        self.ensure_route_exists(&order)?;
        self.order_repo.insert(&order)?;
        info!(order_id = %order.order_id, route_id = %order.assigned_route, "订单已新增");
        Ok(order)
    }

    pub fn update_order(&self, order: Order) -> ApiResult<Order> {
        EntityValidator::validate_order(&order)?;
        self.ensure_route_exists(&order)?;
        self.order_repo.update(&order)?;
        Ok(order)
    }

    pub fn delete_order(&self, order_id: &str) -> ApiResult<()> {
        self.order_repo.delete(order_id)?;
        Ok(())
    }

    pub fn get_order(&self, order_id: &str) -> ApiResult<Order> {
        self.order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Order(id={})不存在", order_id)))
    }

    pub fn list_orders(&self) -> ApiResult<Vec<Order>> {
        Ok(self.order_repo.list_all()?)
    }

    pub fn list_order_views(&self) -> ApiResult<Vec<OrderView>> {
        let views = self
            .order_repo
            .list_all()?
            .into_iter()
            .map(|order| OrderView {
                priority: order.priority(),
                order,
            })
            .collect();
        Ok(views)
    }

    pub async fn order_summary(&self) -> ApiResult<OrderSummary> {
        let params = self.load_params().await?;
        let orders = self.order_repo.list_all()?;

        let total = orders.len();
        let total_value: f64 = orders.iter().map(|o| o.value_rs).sum();
        let high_value_orders = orders
            .iter()
            .filter(|o| o.value_rs > params.bonus_value_threshold)
            .count();
        let average_value = if total == 0 { 0.0 } else { total_value / total as f64 };

        Ok(OrderSummary {
            total,
            total_value,
            high_value_orders,
            average_value,
        })
    }

    fn ensure_route_exists(&self, order: &Order) -> ApiResult<()> {
        if !self.route_repo.exists(&order.assigned_route)? {
            return Err(ApiError::ReferenceError {
                order_id: order.order_id.clone(),
                route_id: order.assigned_route.clone(),
            });
        }
        Ok(())
    }
}
