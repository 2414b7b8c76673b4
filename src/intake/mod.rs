// ==========================================
// 律所案件管理系统 - 智能立案层
// ==========================================
// 职责: 对接外部文书分析服务,驱动自动立案
// ==========================================

pub mod intake_analyzer_trait;
pub mod intake_service;

// 重导出核心类型
pub use intake_analyzer_trait::{CaseIntakeAnalyzer, ExtractedCaseFields, IntakeError};
pub use intake_service::IntakeService;
