// ==========================================
// 律所案件管理系统 - 案件领域模型
// ==========================================
// 案件编号格式: <年份>/<序号> (序号按年递增,左补零至4位)
// ==========================================

use crate::domain::types::CaseStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// CaseFile - 案件卷宗
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub case_id: String,                     // 案件ID (uuid)
    pub registration_no: String,             // 登记编号 (YEAR/NNNN, 年内唯一)
    pub plaintiff: String,                   // 当事人/委托人
    pub subject: String,                     // 案由
    pub assigned_lawyer_id: Option<String>,  // 承办律师ID (创建事务内必定落值)
    pub status: CaseStatus,                  // 状态 (OPEN/CLOSED)
    pub created_at: NaiveDateTime,           // 创建时间 (登记编号按此字段的年份统计)
}

impl CaseFile {
    /// 判断是否进行中
    pub fn is_open(&self) -> bool {
        self.status == CaseStatus::Open
    }
}

/// 生成登记编号
///
/// # 参数
/// - `year`: 登记年份
/// - `seq`: 年内序号 (从1开始)
///
/// # 返回
/// 形如 `2025/0042` 的编号
pub fn format_registration_no(year: i32, seq: i64) -> String {
    format!("{}/{:04}", year, seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_no_padding() {
        assert_eq!(format_registration_no(2025, 1), "2025/0001");
        assert_eq!(format_registration_no(2025, 42), "2025/0042");
        assert_eq!(format_registration_no(2026, 12345), "2026/12345");
    }
}
