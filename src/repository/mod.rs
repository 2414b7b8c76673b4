// ==========================================
// 律所案件管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 事务约定: 跨仓储的原子操作使用各仓储的 *_tx 关联函数,
//           在同一个 rusqlite 事务/连接上执行
// ==========================================

pub mod action_log_repo;
pub mod case_file_repo;
pub mod error;
pub mod lawyer_repo;
pub mod scheduler_state_repo;

// 重导出核心类型
pub use action_log_repo::ActionLogRepository;
pub use case_file_repo::CaseFileRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use lawyer_repo::LawyerRepository;
pub use scheduler_state_repo::SchedulerStateRepository;
