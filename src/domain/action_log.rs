// ==========================================
// 律所案件管理系统 - 操作日志领域模型
// ==========================================
// 红线: 所有写入必须记录
// 用途: 审计追踪,分配决策可解释性
// ==========================================

use crate::domain::types::AssignmentPhase;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,                // 日志ID (uuid)
    pub action_type: String,              // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,         // 操作时间戳
    pub actor: String,                    // 操作人 (自动流程为 "system")
    pub case_id: Option<String>,          // 关联案件 (可选)
    pub lawyer_id: Option<String>,        // 关联律师 (可选)
    pub phase: Option<AssignmentPhase>,   // 分配阶段 (仅 ASSIGN 类型有值)
    pub payload_json: Option<JsonValue>,  // 操作参数/决策快照 (JSON)
    pub detail: Option<String>,           // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Assign,          // 新案件分配 (携带阶段标签)
    ConfigUpdate,    // 配置更新
    SetLeave,        // 人工设置休假
    Reactivate,      // 人工复岗
    AutoReactivate,  // 到期自动复岗 (调度前置步骤)
    CloseCase,       // 结案
    DeleteCase,      // 删除案件 (外部协作方操作)
}

impl ActionType {
    /// 数据库存储格式
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::Assign => "ASSIGN",
            ActionType::ConfigUpdate => "CONFIG_UPDATE",
            ActionType::SetLeave => "SET_LEAVE",
            ActionType::Reactivate => "REACTIVATE",
            ActionType::AutoReactivate => "AUTO_REACTIVATE",
            ActionType::CloseCase => "CLOSE_CASE",
            ActionType::DeleteCase => "DELETE_CASE",
        }
    }
}
