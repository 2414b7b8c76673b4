// ==========================================
// 律所案件管理系统 - 领域类型定义
// ==========================================
// 依据: 案件分配规则 - 两阶段分配策略
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 律师状态 (Lawyer Status)
// ==========================================
// 红线: 只有人工操作才能把律师置为休假,
//       自动流程只允许 ON_LEAVE -> ACTIVE 方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LawyerStatus {
    Active,  // 在岗,可接收新案件
    OnLeave, // 休假,不参与分配
}

impl LawyerStatus {
    /// 数据库存储格式
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LawyerStatus::Active => "ACTIVE",
            LawyerStatus::OnLeave => "ON_LEAVE",
        }
    }

    /// 从数据库字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(LawyerStatus::Active),
            "ON_LEAVE" => Some(LawyerStatus::OnLeave),
            _ => None,
        }
    }
}

impl fmt::Display for LawyerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 案件状态 (Case Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Open,   // 进行中
    Closed, // 已结案
}

impl CaseStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "OPEN",
            CaseStatus::Closed => "CLOSED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(CaseStatus::Open),
            "CLOSED" => Some(CaseStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 分配阶段 (Assignment Phase)
// ==========================================
// 用途: 每次分配决策打上阶段标签,写入操作日志 (可解释性)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentPhase {
    CatchUp,  // 补差阶段: 选择低于平均案件量最多的律师
    Rotation, // 轮转阶段: 按名册顺序轮流
    Fallback, // 兜底阶段: 防御性路径,取首个在岗律师
}

impl AssignmentPhase {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentPhase::CatchUp => "CATCH_UP",
            AssignmentPhase::Rotation => "ROTATION",
            AssignmentPhase::Fallback => "FALLBACK",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "CATCH_UP" => Some(AssignmentPhase::CatchUp),
            "ROTATION" => Some(AssignmentPhase::Rotation),
            "FALLBACK" => Some(AssignmentPhase::Fallback),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
