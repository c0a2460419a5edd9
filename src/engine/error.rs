// ==========================================
// 车队物流排班模拟系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 任何错误都在写入历史之前中止整次运行
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
///
/// 无法分配的订单不是错误（属于正常结果：记为迟到并计罚金）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 输入或快照不满足引擎不变量
    #[error("输入校验失败: {0}")]
    Validation(String),

    /// 订单引用了快照中不存在的线路
    #[error("unknown route: order_id={order_id}, route_id={route_id}")]
    UnknownRoute { order_id: String, route_id: String },
}

impl EngineError {
    /// 错误种类（对外稳定）
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "ValidationError",
            EngineError::UnknownRoute { .. } => "ReferenceError",
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
