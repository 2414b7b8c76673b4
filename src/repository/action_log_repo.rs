// ==========================================
// 律所案件管理系统 - 操作日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::types::AssignmentPhase;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const LOG_COLUMNS: &str =
    "action_id, action_type, action_ts, actor, case_id, lawyer_id, phase, payload_json, detail";

/// 行映射: action_log 表 -> ActionLog 实体
fn map_log_row(row: &Row<'_>) -> rusqlite::Result<ActionLog> {
    Ok(ActionLog {
        action_id: row.get(0)?,
        action_type: row.get(1)?,
        action_ts: NaiveDateTime::parse_from_str(&row.get::<_, String>(2)?, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| {
                NaiveDate::from_ymd_opt(1970, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
        actor: row.get(3)?,
        case_id: row.get(4)?,
        lawyer_id: row.get(5)?,
        phase: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| AssignmentPhase::from_db_str(&s)),
        payload_json: row
            .get::<_, Option<String>>(7)?
            .and_then(|s| serde_json::from_str(&s).ok()),
        detail: row.get(8)?,
    })
}

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
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

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入,返回action_id
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        Self::insert_tx(&conn, log)
    }

    /// 插入操作日志（事务内变体）
    pub fn insert_tx(conn: &Connection, log: &ActionLog) -> RepositoryResult<String> {
        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_type, action_ts, actor,
                case_id, lawyer_id, phase, payload_json, detail
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                log.action_id,
                log.action_type,
                log.action_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                log.actor,
                log.case_id,
                log.lawyer_id,
                log.phase.map(|p| p.to_db_str().to_string()),
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.detail,
            ],
        )?;

        Ok(log.action_id.clone())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询最近的操作日志
    pub fn list_recent(&self, limit: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM action_log ORDER BY action_ts DESC, action_id DESC LIMIT ?1",
            LOG_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![limit], map_log_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// 按案件查询操作日志
    pub fn list_by_case(&self, case_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM action_log WHERE case_id = ?1 ORDER BY action_ts ASC",
            LOG_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![case_id], map_log_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// 按律师查询操作日志
    pub fn list_by_lawyer(&self, lawyer_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM action_log WHERE lawyer_id = ?1 ORDER BY action_ts ASC",
            LOG_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![lawyer_id], map_log_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}
