// ==========================================
// 律所案件管理系统 - 案件卷宗仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 登记编号的年内计数必须与插入发生在同一事务内 (防止并发重号)
// ==========================================

use crate::domain::case_file::CaseFile;
use crate::domain::types::CaseStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const CASE_COLUMNS: &str =
    "case_id, registration_no, plaintiff, subject, assigned_lawyer_id, status, created_at";

/// 行映射: case_file 表 -> CaseFile 实体
fn map_case_row(row: &Row<'_>) -> rusqlite::Result<CaseFile> {
    Ok(CaseFile {
        case_id: row.get(0)?,
        registration_no: row.get(1)?,
        plaintiff: row.get(2)?,
        subject: row.get(3)?,
        assigned_lawyer_id: row.get(4)?,
        status: CaseStatus::from_db_str(&row.get::<_, String>(5)?).unwrap_or(CaseStatus::Open),
        created_at: NaiveDateTime::parse_from_str(&row.get::<_, String>(6)?, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| {
                NaiveDate::from_ymd_opt(1970, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
    })
}

// ==========================================
// CaseFileRepository - 案件卷宗仓储
// ==========================================
pub struct CaseFileRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CaseFileRepository {
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
    // 查询操作
    // ==========================================

    /// 按ID查询
    pub fn find_by_id(&self, case_id: &str) -> RepositoryResult<Option<CaseFile>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM case_file WHERE case_id = ?1",
            CASE_COLUMNS
        ))?;

        let result = stmt.query_row(params![case_id], map_case_row);
        match result {
            Ok(case) => Ok(Some(case)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询案件列表（创建时间倒序）
    pub fn list_all(&self) -> RepositoryResult<Vec<CaseFile>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM case_file ORDER BY created_at DESC, registration_no DESC",
            CASE_COLUMNS
        ))?;

        let cases = stmt
            .query_map([], map_case_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cases)
    }

    /// 查询某律师承办的案件
    pub fn list_by_lawyer(&self, lawyer_id: &str) -> RepositoryResult<Vec<CaseFile>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM case_file WHERE assigned_lawyer_id = ?1 ORDER BY created_at DESC",
            CASE_COLUMNS
        ))?;

        let cases = stmt
            .query_map(params![lawyer_id], map_case_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cases)
    }

    /// 统计某年创建的案件数
    pub fn count_by_year(&self, year: i32) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Self::count_by_year_tx(&conn, year)
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 更新案件状态
    pub fn update_status(&self, case_id: &str, status: CaseStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE case_file SET status = ?1 WHERE case_id = ?2",
            params![status.to_db_str(), case_id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "CaseFile".to_string(),
                id: case_id.to_string(),
            });
        }
        Ok(())
    }

    /// 硬删除案件（外部协作方操作）
    pub fn delete(&self, case_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM case_file WHERE case_id = ?1", params![case_id])?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "CaseFile".to_string(),
                id: case_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 事务内操作 (供分配事务在同一连接上调用)
    // ==========================================

    /// 统计某年创建的案件数（事务内变体）
    ///
    /// 登记编号序号 = 本计数 + 1，必须与 insert 同事务执行。
    pub fn count_by_year_tx(conn: &Connection, year: i32) -> RepositoryResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM case_file WHERE CAST(strftime('%Y', created_at) AS INTEGER) = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 插入案件（事务内变体）
    pub fn insert_tx(conn: &Connection, case: &CaseFile) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO case_file (
                case_id, registration_no, plaintiff, subject,
                assigned_lawyer_id, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                case.case_id,
                case.registration_no,
                case.plaintiff,
                case.subject,
                case.assigned_lawyer_id,
                case.status.to_db_str(),
                case.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }
}
