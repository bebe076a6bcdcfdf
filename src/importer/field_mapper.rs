// ==========================================
// 产线监控驾驶舱 - 字段映射器
// ==========================================
// 职责: 原始行 -> ProductionRecord，含类型转换与别名列
// ==========================================

use crate::domain::station::ProductionRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{NaiveDate, NaiveDateTime};

/// 支持的时间格式（依次尝试）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

pub struct FieldMapper;

impl FieldMapper {
    /// 必需列（任一别名存在即可）
    pub const REQUIRED_COLUMNS: &'static [&'static str] =
        &["station_id", "shift", "recorded_at", "cycle_time_s"];

    /// 列名别名
    fn aliases(key: &str) -> &'static [&'static str] {
        match key {
            "station_id" => &["station_id", "station"],
            "shift" => &["shift"],
            "recorded_at" => &["recorded_at", "timestamp"],
            "cycle_time_s" => &["cycle_time_s", "cycle_time"],
            "units_produced" => &["units_produced", "units"],
            "defect_count" => &["defect_count", "defects"],
            "downtime_minutes" => &["downtime_minutes", "downtime"],
            _ => &[],
        }
    }

    /// 表头是否包含该列（任一别名）
    pub fn has_column<'a>(headers: impl IntoIterator<Item = &'a String>, key: &str) -> bool {
        let aliases = Self::aliases(key);
        headers.into_iter().any(|h| aliases.contains(&h.as_str()))
    }

    /// 映射单行
    pub fn map_row(&self, row: &RawRow) -> ImportResult<ProductionRecord> {
        let n = row.row_number;

        let station_id = self.require_string(row, "station_id")?;
        let shift = self.require_string(row, "shift")?;
        let recorded_at = self.parse_datetime(row, "recorded_at")?;

        let cycle_time = self.parse_f64(row, "cycle_time_s")?.unwrap_or(f64::NAN);
        if !(cycle_time.is_finite() && cycle_time > 0.0) {
            return Err(ImportError::ValueRangeError {
                row: n,
                field: "cycle_time_s".to_string(),
                value: cycle_time,
            });
        }

        let units_produced = self.parse_i64(row, "units_produced")?.unwrap_or(0);
        let defect_count = self.parse_i64(row, "defect_count")?.unwrap_or(0);
        if units_produced < 0 || defect_count < 0 {
            return Err(ImportError::ValueRangeError {
                row: n,
                field: "units_produced/defect_count".to_string(),
                value: units_produced.min(defect_count) as f64,
            });
        }

        let downtime_minutes = self.parse_f64(row, "downtime_minutes")?.unwrap_or(0.0);
        if !(downtime_minutes.is_finite() && downtime_minutes >= 0.0) {
            return Err(ImportError::ValueRangeError {
                row: n,
                field: "downtime_minutes".to_string(),
                value: downtime_minutes,
            });
        }

        Ok(ProductionRecord {
            station_id,
            shift,
            recorded_at,
            cycle_time,
            units_produced,
            defect_count,
            downtime_minutes,
        })
    }

    fn get<'a>(&self, row: &'a RawRow, key: &str) -> Option<&'a str> {
        Self::aliases(key)
            .iter()
            .filter_map(|alias| row.fields.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    fn require_string(&self, row: &RawRow, key: &str) -> ImportResult<String> {
        self.get(row, key)
            .map(str::to_string)
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row.row_number,
                field: key.to_string(),
                message: "必填字段为空".to_string(),
            })
    }

    fn parse_f64(&self, row: &RawRow, key: &str) -> ImportResult<Option<f64>> {
        match self.get(row, key) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: key.to_string(),
                    message: format!("无法解析为数值 '{}': {}", v, e),
                }),
        }
    }

    fn parse_i64(&self, row: &RawRow, key: &str) -> ImportResult<Option<i64>> {
        match self.get(row, key) {
            None => Ok(None),
            Some(v) => v
                .parse::<i64>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: key.to_string(),
                    message: format!("无法解析为整数 '{}': {}", v, e),
                }),
        }
    }

    fn parse_datetime(&self, row: &RawRow, key: &str) -> ImportResult<NaiveDateTime> {
        let value = self.require_string(row, key)?;

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&value, fmt) {
                return Ok(dt);
            }
        }
        // 仅日期时取当日零点
        if let Some(dt) = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt);
        }

        Err(ImportError::DateFormatError {
            row: row.row_number,
            field: key.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        RawRow {
            row_number: 2,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_map_row_with_aliases_and_defaults() {
        let row = raw(&[
            ("station", "ST003"),
            ("shift", "Night"),
            ("timestamp", "2026-03-09T22:15:00"),
            ("cycle_time", "112.5"),
            ("units", "30"),
        ]);
        let record = FieldMapper.map_row(&row).unwrap();

        assert_eq!(record.station_id, "ST003");
        assert_eq!(record.cycle_time, 112.5);
        assert_eq!(record.units_produced, 30);
        assert_eq!(record.defect_count, 0);
        assert_eq!(record.downtime_minutes, 0.0);
        assert_eq!(record.recorded_at.format("%H:%M").to_string(), "22:15");
    }

    #[test]
    fn test_map_row_errors() {
        let base = [
            ("station_id", "ST001"),
            ("shift", "Morning"),
            ("recorded_at", "2026-03-09 08:00:00"),
        ];

        let mut fields = base.to_vec();
        fields.push(("cycle_time_s", "0"));
        let err = FieldMapper.map_row(&raw(&fields)).unwrap_err();
        assert!(matches!(err, ImportError::ValueRangeError { .. }));

        let mut fields = base.to_vec();
        fields.push(("cycle_time_s", "fast"));
        let err = FieldMapper.map_row(&raw(&fields)).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { .. }));

        let fields = [
            ("station_id", "ST001"),
            ("shift", "Morning"),
            ("recorded_at", "09/03/2026"),
            ("cycle_time_s", "90"),
        ];
        let err = FieldMapper.map_row(&raw(&fields)).unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { .. }));
        assert!(err.is_row_error());
    }
}
