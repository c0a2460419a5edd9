// ==========================================
// 车队物流排班模拟系统 - CSV 文件解析
// ==========================================
// 职责: CSV -> 按表头索引的原始记录 (去首尾空白, 跳过空行)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 单行原始记录
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub row: usize, // 文件物理行号
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// 读取字段（缺失视为空串）
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(|s| s.as_str()).unwrap_or("")
    }
}

pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 文件
    ///
    /// # 参数
    /// - path: 文件路径
    /// - required_columns: 必需列（缺失则报 MissingColumn）
    pub fn parse_to_raw_records(path: &Path, required_columns: &[&str]) -> ImportResult<Vec<RawRecord>> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(ext.to_string_lossy().to_string()));
            }
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        for column in required_columns {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn {
                    file: path.display().to_string(),
                    column: column.to_string(),
                });
            }
        }

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            let mut fields = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord { row, fields });
        }

        Ok(records)
    }
}
