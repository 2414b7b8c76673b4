// ==========================================
// 律所案件管理系统 - 调度器状态仓储
// ==========================================
// scheduler_state 为单行表 (state_id 固定为 1)
// catchup_burst_limit 不在此表,存于 config_kv (运营配置面)
// ==========================================

use crate::domain::scheduler_state::SchedulerState;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// SchedulerStateRepository - 调度器状态仓储
// ==========================================
pub struct SchedulerStateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SchedulerStateRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取调度器状态
    ///
    /// # 参数
    /// - `catchup_burst_limit`: 从配置面读出的连续补差上限,
    ///   与两个轮转计数器合并为完整的 SchedulerState 记录
    pub fn load(&self, catchup_burst_limit: i64) -> RepositoryResult<SchedulerState> {
        let conn = self.get_conn()?;
        Self::load_tx(&conn, catchup_burst_limit)
    }

    // ==========================================
    // 事务内操作 (供分配事务在同一连接上调用)
    // ==========================================

    /// 读取调度器状态（事务内变体）
    ///
    /// 记录不存在时返回初始状态 (last_assignment_index = -1)，不隐式插入。
    pub fn load_tx(conn: &Connection, catchup_burst_limit: i64) -> RepositoryResult<SchedulerState> {
        let row: Option<(i64, i64)> = conn
            .query_row(
                "SELECT last_assignment_index, catchup_sequence_count \
                 FROM scheduler_state WHERE state_id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let state = match row {
            Some((last_assignment_index, catchup_sequence_count)) => SchedulerState {
                last_assignment_index,
                catchup_burst_limit,
                catchup_sequence_count,
            },
            None => SchedulerState::initial(catchup_burst_limit),
        };
        Ok(state)
    }

    /// 保存调度器状态（事务内变体）
    ///
    /// 只持久化两个轮转计数器; catchup_burst_limit 归配置面管理。
    pub fn save_tx(conn: &Connection, state: &SchedulerState) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO scheduler_state (state_id, last_assignment_index, catchup_sequence_count, updated_at)
            VALUES (1, ?1, ?2, datetime('now'))
            ON CONFLICT(state_id) DO UPDATE SET
                last_assignment_index = excluded.last_assignment_index,
                catchup_sequence_count = excluded.catchup_sequence_count,
                updated_at = excluded.updated_at
            "#,
            params![state.last_assignment_index, state.catchup_sequence_count],
        )?;
        Ok(())
    }
}
