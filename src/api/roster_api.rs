// ==========================================
// 律所案件管理系统 - 律师名册 API
// ==========================================
// 职责: 名册查询、新增律师、休假管理 (人工操作面)
// 红线: 自动流程只做 ON_LEAVE -> ACTIVE; 置休假必须走这里的人工接口
// ==========================================

use crate::clock::Clock;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::lawyer::Lawyer;
use crate::domain::types::LawyerStatus;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::lawyer_repo::LawyerRepository;
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

// ==========================================
// RosterApi - 律师名册 API
// ==========================================
pub struct RosterApi {
    lawyer_repo: Arc<LawyerRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    clock: Arc<dyn Clock>,
}

impl RosterApi {
    /// 创建新的RosterApi实例
    pub fn new(
        lawyer_repo: Arc<LawyerRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lawyer_repo,
            action_log_repo,
            clock,
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询完整名册 (含休假律师,按名册顺序)
    pub fn list_lawyers(&self) -> ApiResult<Vec<Lawyer>> {
        Ok(self.lawyer_repo.list_all()?)
    }

    /// 按ID查询律师
    pub fn get_lawyer(&self, lawyer_id: &str) -> ApiResult<Lawyer> {
        self.lawyer_repo
            .find_by_id(lawyer_id)?
            .ok_or_else(|| ApiError::NotFound(format!("律师{}不存在", lawyer_id)))
    }

    // ==========================================
    // 名册维护
    // ==========================================

    /// 新增律师 (追加到名册末尾,初始在岗、计数为0)
    pub fn create_lawyer(&self, name: &str, actor: &str) -> ApiResult<Lawyer> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("律师姓名不能为空".to_string()));
        }

        let lawyer_id = Uuid::new_v4().to_string();
        let lawyer = self
            .lawyer_repo
            .create(&lawyer_id, name.trim(), self.clock.now())?;

        tracing::info!(%lawyer_id, name = %lawyer.name, roster_seq = lawyer.roster_seq, actor, "新增律师");
        Ok(lawyer)
    }

    /// 人工设置休假
    ///
    /// 不变式维护: 置 ON_LEAVE 的同时必须写入返回日期。
    /// 已休假的律师允许调整返回日期。
    pub fn set_on_leave(
        &self,
        lawyer_id: &str,
        return_date: NaiveDate,
        actor: &str,
    ) -> ApiResult<()> {
        let lawyer = self.get_lawyer(lawyer_id)?;

        self.lawyer_repo
            .update_status(lawyer_id, LawyerStatus::OnLeave, Some(return_date))?;

        self.action_log_repo.insert(&ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: ActionType::SetLeave.to_db_str().to_string(),
            action_ts: self.clock.now(),
            actor: actor.to_string(),
            case_id: None,
            lawyer_id: Some(lawyer_id.to_string()),
            phase: None,
            payload_json: Some(json!({
                "return_date": return_date.format("%Y-%m-%d").to_string(),
                "previous_status": lawyer.status.to_db_str(),
            })),
            detail: Some(format!(
                "设置休假: {} 至 {}",
                lawyer.name,
                return_date.format("%Y-%m-%d")
            )),
        })?;

        Ok(())
    }

    /// 人工复岗 (提前销假)
    pub fn reactivate(&self, lawyer_id: &str, actor: &str) -> ApiResult<()> {
        let lawyer = self.get_lawyer(lawyer_id)?;
        if lawyer.status == LawyerStatus::Active {
            return Err(ApiError::InvalidStateTransition {
                from: LawyerStatus::Active.to_string(),
                to: LawyerStatus::Active.to_string(),
            });
        }

        self.lawyer_repo
            .update_status(lawyer_id, LawyerStatus::Active, None)?;

        self.action_log_repo.insert(&ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: ActionType::Reactivate.to_db_str().to_string(),
            action_ts: self.clock.now(),
            actor: actor.to_string(),
            case_id: None,
            lawyer_id: Some(lawyer_id.to_string()),
            phase: None,
            payload_json: None,
            detail: Some(format!("人工复岗: {}", lawyer.name)),
        })?;

        Ok(())
    }
}
