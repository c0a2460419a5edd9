// ==========================================
// 车队物流排班模拟系统 - 导入层
// ==========================================
// 职责: 样例数据(CSV)导入,整体替换司机/线路/订单
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod fleet_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, RawRecord};
pub use fleet_importer::{FleetCsvImporter, ImportSummary, DRIVERS_FILE, ORDERS_FILE, ROUTES_FILE};
