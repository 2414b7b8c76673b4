// ==========================================
// 律所案件管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有决策必须输出 reason
// ==========================================

pub mod assignment;
pub mod leave_reactivation;

// 重导出核心引擎
pub use assignment::{AssignmentDecision, AssignmentScheduler, ScheduleError};
pub use leave_reactivation::LeaveReactivationEngine;
