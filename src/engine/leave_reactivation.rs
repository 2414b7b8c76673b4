// ==========================================
// 律所案件管理系统 - 休假到期自动复岗引擎
// ==========================================
// 职责: 在每次分配决策之前同步执行,把返回日期已到的休假律师置回在岗
// 红线: 只允许 ON_LEAVE -> ACTIVE 方向,反向转换仅限人工操作
// 触发: 由分配流程即时调用,不走定时器
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::repository::lawyer_repo::LawyerRepository;
use chrono::NaiveDate;
use rusqlite::Connection;

// ==========================================
// LeaveReactivationEngine - 自动复岗引擎
// ==========================================
pub struct LeaveReactivationEngine {
    // 无状态引擎
}

impl LeaveReactivationEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 执行到期复岗（事务内变体）
    ///
    /// 与分配决策共用同一事务: 复岗写入先于调度器读取名册发生,
    /// 保证调度器不会因过期状态漏掉一名应在岗的律师。
    ///
    /// # 参数
    /// - `conn`: 分配事务所在连接
    /// - `today`: 今天的日历日期 (仅比较日期,不含时分秒)
    ///
    /// # 返回
    /// - Ok(Vec<String>): 本次被复岗的律师ID列表 (可为空)
    pub fn run_tx(&self, conn: &Connection, today: NaiveDate) -> RepositoryResult<Vec<String>> {
        let reactivated = LawyerRepository::reactivate_due_tx(conn, today)?;

        for lawyer_id in &reactivated {
            tracing::info!(%lawyer_id, %today, "休假到期,自动复岗");
        }

        Ok(reactivated)
    }
}
