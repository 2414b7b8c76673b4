// ==========================================
// 律所案件管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::domain::scheduler_state::DEFAULT_CATCHUP_BURST_LIMIT;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 连续补差上限的配置键 (global scope)
pub const KEY_CATCHUP_BURST_LIMIT: &str = "scheduler/catchup_burst_limit";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(Self::get_config_value_tx(&conn, key)?)
    }

    /// 从 config_kv 表读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（scope_id='global'，存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取连续补差上限
    ///
    /// 校验与降级由调度器负责: 此处只负责取值,
    /// 解析失败时记录告警并返回默认值。
    pub fn get_catchup_burst_limit(&self) -> Result<i64, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(Self::catchup_burst_limit_tx(&conn))
    }

    // ==========================================
    // 事务内操作 (供分配事务在同一连接上调用)
    // ==========================================

    /// 读取配置值（事务内变体）
    pub fn get_config_value_tx(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
    }

    /// 读取连续补差上限（事务内变体）
    ///
    /// 每次分配事务都重新读取,配置变更在下一次调度调用生效。
    pub fn catchup_burst_limit_tx(conn: &Connection) -> i64 {
        match Self::get_config_value_tx(conn, KEY_CATCHUP_BURST_LIMIT) {
            Ok(Some(raw)) => match raw.trim().parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!(
                        key = KEY_CATCHUP_BURST_LIMIT,
                        value = %raw,
                        "配置值无法解析为整数,使用默认值 {}",
                        DEFAULT_CATCHUP_BURST_LIMIT
                    );
                    DEFAULT_CATCHUP_BURST_LIMIT
                }
            },
            Ok(None) => DEFAULT_CATCHUP_BURST_LIMIT,
            Err(e) => {
                tracing::warn!(
                    key = KEY_CATCHUP_BURST_LIMIT,
                    error = %e,
                    "读取配置失败,使用默认值 {}",
                    DEFAULT_CATCHUP_BURST_LIMIT
                );
                DEFAULT_CATCHUP_BURST_LIMIT
            }
        }
    }
}
