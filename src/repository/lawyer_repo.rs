// ==========================================
// 律所案件管理系统 - 律师名册仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 轮转顺序: 名册按 roster_seq 升序读取 (单调递增,新律师只追加在末尾)
// ==========================================

use crate::domain::lawyer::Lawyer;
use crate::domain::types::LawyerStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const LAWYER_COLUMNS: &str = "lawyer_id, name, status, leave_return_date, \
     assigned_files_count, missed_assignments_count, roster_seq, created_at";

/// 行映射: lawyer 表 -> Lawyer 实体
fn map_lawyer_row(row: &Row<'_>) -> rusqlite::Result<Lawyer> {
    Ok(Lawyer {
        lawyer_id: row.get(0)?,
        name: row.get(1)?,
        status: LawyerStatus::from_db_str(&row.get::<_, String>(2)?)
            .unwrap_or(LawyerStatus::Active),
        leave_return_date: row
            .get::<_, Option<String>>(3)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        assigned_files_count: row.get(4)?,
        missed_assignments_count: row.get(5)?,
        roster_seq: row.get(6)?,
        created_at: NaiveDateTime::parse_from_str(&row.get::<_, String>(7)?, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| {
                NaiveDate::from_ymd_opt(1970, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
    })
}

// ==========================================
// LawyerRepository - 律师名册仓储
// ==========================================
pub struct LawyerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LawyerRepository {
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

    /// 创建律师（追加到名册末尾）
    ///
    /// roster_seq 取当前最大值 +1，在同一事务内计算，
    /// 保证名册顺序只追加、不重排。
    ///
    /// # 参数
    /// - `lawyer_id`: 律师ID
    /// - `name`: 姓名
    /// - `created_at`: 创建时间
    pub fn create(
        &self,
        lawyer_id: &str,
        name: &str,
        created_at: NaiveDateTime,
    ) -> RepositoryResult<Lawyer> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let next_seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(roster_seq), 0) + 1 FROM lawyer",
            [],
            |row| row.get(0),
        )?;

        tx.execute(
            r#"
            INSERT INTO lawyer (
                lawyer_id, name, status, leave_return_date,
                assigned_files_count, missed_assignments_count, roster_seq, created_at
            ) VALUES (?1, ?2, 'ACTIVE', NULL, 0, 0, ?3, ?4)
            "#,
            params![
                lawyer_id,
                name,
                next_seq,
                created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(Lawyer {
            lawyer_id: lawyer_id.to_string(),
            name: name.to_string(),
            status: LawyerStatus::Active,
            leave_return_date: None,
            assigned_files_count: 0,
            missed_assignments_count: 0,
            roster_seq: next_seq,
            created_at,
        })
    }

    /// 更新律师状态与休假返回日期
    ///
    /// 不变式: status = ON_LEAVE 时 leave_return_date 必须有值,
    ///         status = ACTIVE 时必须为 NULL。由 API 层保证,此处只做写入。
    pub fn update_status(
        &self,
        lawyer_id: &str,
        status: LawyerStatus,
        leave_return_date: Option<NaiveDate>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE lawyer SET status = ?1, leave_return_date = ?2 WHERE lawyer_id = ?3",
            params![
                status.to_db_str(),
                leave_return_date.map(|d| d.format("%Y-%m-%d").to_string()),
                lawyer_id,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Lawyer".to_string(),
                id: lawyer_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 读取完整名册（含休假律师，按 roster_seq 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Lawyer>> {
        let conn = self.get_conn()?;
        Self::list_all_tx(&conn)
    }

    /// 按ID查询
    pub fn find_by_id(&self, lawyer_id: &str) -> RepositoryResult<Option<Lawyer>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, lawyer_id)
    }

    // ==========================================
    // 事务内操作 (供分配事务在同一连接上调用)
    // ==========================================

    /// 读取完整名册（事务内变体）
    pub fn list_all_tx(conn: &Connection) -> RepositoryResult<Vec<Lawyer>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lawyer ORDER BY roster_seq ASC",
            LAWYER_COLUMNS
        ))?;

        let lawyers = stmt
            .query_map([], map_lawyer_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lawyers)
    }

    /// 按ID查询（事务内变体）
    pub fn find_by_id_tx(conn: &Connection, lawyer_id: &str) -> RepositoryResult<Option<Lawyer>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lawyer WHERE lawyer_id = ?1",
            LAWYER_COLUMNS
        ))?;

        let result = stmt.query_row(params![lawyer_id], map_lawyer_row);
        match result {
            Ok(lawyer) => Ok(Some(lawyer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 累加律师的分配案件数（事务内变体）
    ///
    /// # 返回
    /// - Ok(()): 成功
    /// - Err(NotFound): 律师不存在
    pub fn increment_assigned_count_tx(conn: &Connection, lawyer_id: &str) -> RepositoryResult<()> {
        let rows = conn.execute(
            "UPDATE lawyer SET assigned_files_count = assigned_files_count + 1 WHERE lawyer_id = ?1",
            params![lawyer_id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Lawyer".to_string(),
                id: lawyer_id.to_string(),
            });
        }
        Ok(())
    }

    /// 到期自动复岗（事务内变体）
    ///
    /// 把所有 leave_return_date <= today 的休假律师置回 ACTIVE 并清空返回日期。
    /// 日期为 ISO 文本格式,直接按字符串比较。
    ///
    /// # 返回
    /// - Ok(Vec<String>): 被复岗的律师ID列表（名册顺序）
    pub fn reactivate_due_tx(conn: &Connection, today: NaiveDate) -> RepositoryResult<Vec<String>> {
        let today_str = today.format("%Y-%m-%d").to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT lawyer_id FROM lawyer
            WHERE status = 'ON_LEAVE'
              AND leave_return_date IS NOT NULL
              AND leave_return_date <= ?1
            ORDER BY roster_seq ASC
            "#,
        )?;
        let due: Vec<String> = stmt
            .query_map(params![today_str], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        if due.is_empty() {
            return Ok(due);
        }

        conn.execute(
            r#"
            UPDATE lawyer
            SET status = 'ACTIVE', leave_return_date = NULL
            WHERE status = 'ON_LEAVE'
              AND leave_return_date IS NOT NULL
              AND leave_return_date <= ?1
            "#,
            params![today_str],
        )?;

        Ok(due)
    }
}
