// ==========================================
// 律所案件管理系统 - 律师领域模型
// ==========================================
// 不变式: leave_return_date 当且仅当 status = ON_LEAVE 时存在
//         (自动复岗在转回 ACTIVE 时必须清空该字段)
// ==========================================

use crate::domain::types::LawyerStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Lawyer - 律师
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lawyer {
    pub lawyer_id: String,                    // 律师ID (uuid)
    pub name: String,                         // 姓名
    pub status: LawyerStatus,                 // 状态 (ACTIVE/ON_LEAVE)
    pub leave_return_date: Option<NaiveDate>, // 休假返回日期 (仅休假时有值)
    pub assigned_files_count: i64,            // 累计分配案件数 (只增不减)
    pub missed_assignments_count: i64,        // 错过分配次数 (预留字段,调度器不使用)
    pub roster_seq: i64,                      // 名册序号 (单调递增,决定轮转顺序)
    pub created_at: NaiveDateTime,            // 创建时间
}

impl Lawyer {
    /// 判断是否在岗
    pub fn is_active(&self) -> bool {
        self.status == LawyerStatus::Active
    }

    /// 判断是否休假
    pub fn is_on_leave(&self) -> bool {
        self.status == LawyerStatus::OnLeave
    }
}
