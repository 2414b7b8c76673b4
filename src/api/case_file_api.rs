// ==========================================
// 律所案件管理系统 - 案件登记 API
// ==========================================
// 职责: 新案件登记 (编号生成 + 自动分配)、案件查询、结案、删除
// ==========================================
// 原子性约定 (核心不变式):
//   读名册/状态 -> 到期复岗 -> 分配决策 -> 计数累加 ->
//   生成登记编号 -> 插入案件 -> 落盘调度状态
// 整个序列持有连接互斥锁并在单个 SQLite 事务内执行:
// 要么全部提交,要么全部回滚,不存在半完成的分配。
// 提交失败时调用方重试整个建案请求,而不是只重试写入。
// ==========================================

use crate::clock::Clock;
use crate::config::config_manager::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::case_file::{format_registration_no, CaseFile};
use crate::domain::types::CaseStatus;
use crate::engine::assignment::AssignmentScheduler;
use crate::engine::leave_reactivation::LeaveReactivationEngine;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::case_file_repo::CaseFileRepository;
use crate::repository::lawyer_repo::LawyerRepository;
use crate::repository::scheduler_state_repo::SchedulerStateRepository;
use chrono::Datelike;
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

// ==========================================
// CaseFileApi - 案件登记 API
// ==========================================
pub struct CaseFileApi {
    conn: Arc<Mutex<Connection>>,
    case_file_repo: Arc<CaseFileRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    scheduler: AssignmentScheduler,
    reactivation: LeaveReactivationEngine,
    clock: Arc<dyn Clock>,
}

impl CaseFileApi {
    /// 创建新的CaseFileApi实例
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        case_file_repo: Arc<CaseFileRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            conn,
            case_file_repo,
            action_log_repo,
            scheduler: AssignmentScheduler::new(),
            reactivation: LeaveReactivationEngine::new(),
            clock,
        }
    }

    // ==========================================
    // 新案件登记 (核心流程)
    // ==========================================

    /// 登记新案件并自动分配承办律师
    ///
    /// # 参数
    /// - `plaintiff`: 当事人/委托人
    /// - `subject`: 案由
    /// - `actor`: 操作人 (写入审计日志)
    ///
    /// # 返回
    /// - Ok(CaseFile): 已提交的案件记录 (含登记编号与承办律师)
    /// - Err(NoActiveLawyers): 无在岗律师,未创建案件,计数不变
    /// - Err(DatabaseTransactionError): 持久化失败,整个决策已回滚,可重试
    pub fn create_case_file(
        &self,
        plaintiff: &str,
        subject: &str,
        actor: &str,
    ) -> ApiResult<CaseFile> {
        // 参数验证
        if plaintiff.trim().is_empty() {
            return Err(ApiError::InvalidInput("当事人不能为空".to_string()));
        }
        if subject.trim().is_empty() {
            return Err(ApiError::InvalidInput("案由不能为空".to_string()));
        }

        let today = self.clock.today();
        let now = self.clock.now();

        // 互斥锁覆盖整个"读-决策-写"序列
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseError(format!("锁获取失败: {}", e)))?;
        let tx = conn
            .transaction()
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?;

        // 1. 到期复岗 (先于调度器读取名册)
        let reactivated = self.reactivation.run_tx(&tx, today)?;

        // 2. 读取名册与调度状态
        let roster = LawyerRepository::list_all_tx(&tx)?;
        let burst_limit = ConfigManager::catchup_burst_limit_tx(&tx);
        let mut state = SchedulerStateRepository::load_tx(&tx, burst_limit)?;

        // 3. 分配决策 (出错即回滚,无部分结果)
        let decision = self.scheduler.select_lawyer(&roster, &mut state)?;

        // 4. 承办律师计数累加
        LawyerRepository::increment_assigned_count_tx(&tx, &decision.lawyer_id)?;

        // 5. 生成登记编号 (年内计数与插入同事务,并发下不重号)
        let year = now.year();
        let seq = CaseFileRepository::count_by_year_tx(&tx, year)? + 1;
        let registration_no = format_registration_no(year, seq);

        // 6. 插入案件
        let case = CaseFile {
            case_id: Uuid::new_v4().to_string(),
            registration_no,
            plaintiff: plaintiff.trim().to_string(),
            subject: subject.trim().to_string(),
            assigned_lawyer_id: Some(decision.lawyer_id.clone()),
            status: CaseStatus::Open,
            created_at: now,
        };
        CaseFileRepository::insert_tx(&tx, &case)?;

        // 7. 审计日志: 自动复岗 + 分配决策 (带阶段标签)
        if !reactivated.is_empty() {
            ActionLogRepository::insert_tx(
                &tx,
                &ActionLog {
                    action_id: Uuid::new_v4().to_string(),
                    action_type: ActionType::AutoReactivate.to_db_str().to_string(),
                    action_ts: now,
                    actor: "system".to_string(),
                    case_id: None,
                    lawyer_id: None,
                    phase: None,
                    payload_json: Some(json!({ "lawyer_ids": reactivated })),
                    detail: Some(format!("休假到期自动复岗 {} 人", reactivated.len())),
                },
            )?;
        }

        ActionLogRepository::insert_tx(
            &tx,
            &ActionLog {
                action_id: Uuid::new_v4().to_string(),
                action_type: ActionType::Assign.to_db_str().to_string(),
                action_ts: now,
                actor: actor.to_string(),
                case_id: Some(case.case_id.clone()),
                lawyer_id: Some(decision.lawyer_id.clone()),
                phase: Some(decision.phase),
                payload_json: Some(json!({
                    "registration_no": case.registration_no,
                    "target_average": decision.target_average,
                    "active_count": decision.active_count,
                    "rotation_index": decision.rotation_index,
                    "catchup_sequence_count": state.catchup_sequence_count,
                    "catchup_burst_limit": state.catchup_burst_limit,
                })),
                detail: Some(decision.reason.clone()),
            },
        )?;

        // 8. 落盘调度状态并提交
        SchedulerStateRepository::save_tx(&tx, &state)?;
        tx.commit()
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(
            case_id = %case.case_id,
            registration_no = %case.registration_no,
            lawyer_id = %decision.lawyer_id,
            phase = %decision.phase,
            "新案件登记完成"
        );

        Ok(case)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按ID查询案件
    pub fn get_case_file(&self, case_id: &str) -> ApiResult<CaseFile> {
        self.case_file_repo
            .find_by_id(case_id)?
            .ok_or_else(|| ApiError::NotFound(format!("案件{}不存在", case_id)))
    }

    /// 查询案件列表 (创建时间倒序)
    pub fn list_case_files(&self) -> ApiResult<Vec<CaseFile>> {
        Ok(self.case_file_repo.list_all()?)
    }

    /// 查询某律师承办的案件
    pub fn list_case_files_by_lawyer(&self, lawyer_id: &str) -> ApiResult<Vec<CaseFile>> {
        Ok(self.case_file_repo.list_by_lawyer(lawyer_id)?)
    }

    /// 统计某年登记的案件数
    pub fn count_case_files_by_year(&self, year: i32) -> ApiResult<i64> {
        Ok(self.case_file_repo.count_by_year(year)?)
    }

    // ==========================================
    // 状态操作
    // ==========================================

    /// 结案
    pub fn close_case_file(&self, case_id: &str, actor: &str) -> ApiResult<()> {
        let case = self.get_case_file(case_id)?;
        if case.status == CaseStatus::Closed {
            return Err(ApiError::InvalidStateTransition {
                from: CaseStatus::Closed.to_string(),
                to: CaseStatus::Closed.to_string(),
            });
        }

        self.case_file_repo.update_status(case_id, CaseStatus::Closed)?;

        self.action_log_repo.insert(&ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: ActionType::CloseCase.to_db_str().to_string(),
            action_ts: self.clock.now(),
            actor: actor.to_string(),
            case_id: Some(case_id.to_string()),
            lawyer_id: case.assigned_lawyer_id.clone(),
            phase: None,
            payload_json: None,
            detail: Some(format!("结案: {}", case.registration_no)),
        })?;

        Ok(())
    }

    /// 硬删除案件 (外部协作方操作)
    pub fn delete_case_file(&self, case_id: &str, actor: &str) -> ApiResult<()> {
        let case = self.get_case_file(case_id)?;
        self.case_file_repo.delete(case_id)?;

        self.action_log_repo.insert(&ActionLog {
            action_id: Uuid::new_v4().to_string(),
            action_type: ActionType::DeleteCase.to_db_str().to_string(),
            action_ts: self.clock.now(),
            actor: actor.to_string(),
            case_id: Some(case_id.to_string()),
            lawyer_id: case.assigned_lawyer_id.clone(),
            phase: None,
            payload_json: None,
            detail: Some(format!("删除案件: {}", case.registration_no)),
        })?;

        Ok(())
    }
}
