// ==========================================
// 律所案件管理系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含数据访问与业务流程
// ==========================================

pub mod action_log;
pub mod case_file;
pub mod lawyer;
pub mod scheduler_state;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use case_file::{format_registration_no, CaseFile};
pub use lawyer::Lawyer;
pub use scheduler_state::{SchedulerState, DEFAULT_CATCHUP_BURST_LIMIT};
pub use types::{AssignmentPhase, CaseStatus, LawyerStatus};
