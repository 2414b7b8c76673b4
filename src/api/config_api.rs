// ==========================================
// 律所案件管理系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新 (运营配置面)
// 调度相关配置的变更在下一次分配调用时生效
// ==========================================

use crate::clock::Clock;
use crate::config::config_manager::{ConfigManager, KEY_CATCHUP_BURST_LIMIT};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::action_log_repo::ActionLogRepository;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

// ==========================================
// ConfigItem - 配置项 DTO
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigItem {
    pub scope_id: String,
    pub key: String,
    pub value: String,
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    conn: Arc<Mutex<Connection>>,
    config_manager: Arc<ConfigManager>,
    action_log_repo: Arc<ActionLogRepository>,
    clock: Arc<dyn Clock>,
}

impl ConfigApi {
    /// 创建新的ConfigApi实例
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        config_manager: Arc<ConfigManager>,
        action_log_repo: Arc<ActionLogRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            conn,
            config_manager,
            action_log_repo,
            clock,
        }
    }

    /// 查询所有配置
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseError(format!("锁获取失败: {}", e)))?;

        let mut stmt = conn
            .prepare("SELECT scope_id, key, value FROM config_kv ORDER BY scope_id, key")
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let configs = stmt
            .query_map([], |row| {
                Ok(ConfigItem {
                    scope_id: row.get(0)?,
                    key: row.get(1)?,
                    value: row.get(2)?,
                })
            })
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(configs)
    }

    /// 读取连续补差上限
    pub fn get_catchup_burst_limit(&self) -> ApiResult<i64> {
        self.config_manager
            .get_catchup_burst_limit()
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// 更新连续补差上限
    ///
    /// # 参数
    /// - `value`: 必须为正整数 (非正数拒绝写入)
    /// - `actor`: 操作人
    pub fn set_catchup_burst_limit(&self, value: i64, actor: &str) -> ApiResult<()> {
        if value <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "catchup_burst_limit 必须为正整数,收到 {}",
                value
            )));
        }

        let previous = self.get_catchup_burst_limit()?;
        self.config_manager
            .set_config_value(KEY_CATCHUP_BURST_LIMIT, &value.to_string())
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        self.action_log_repo.insert(&ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: ActionType::ConfigUpdate.to_db_str().to_string(),
            action_ts: self.clock.now(),
            actor: actor.to_string(),
            case_id: None,
            lawyer_id: None,
            phase: None,
            payload_json: Some(json!({
                "key": KEY_CATCHUP_BURST_LIMIT,
                "previous": previous,
                "value": value,
            })),
            detail: Some(format!(
                "更新连续补差上限: {} -> {} (下一次分配生效)",
                previous, value
            )),
        })?;

        tracing::info!(previous, value, actor, "更新连续补差上限");
        Ok(())
    }
}
