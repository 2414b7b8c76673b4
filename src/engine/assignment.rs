// ==========================================
// 律所案件管理系统 - 案件分配调度引擎
// ==========================================
// 职责: 为新案件选定一名承办律师
// 红线: Engine 不拼 SQL, 所有决策必须输出 reason
// ==========================================
// 两阶段策略 (每次分配按此顺序评估):
// - 阶段A 补差: 在岗律师中找低于平均案件量的,按差额降序取首位,
//   受连续补差上限 (catchup_burst_limit) 约束
// - 阶段B 轮转: 连续补差计数归零,从 last_assignment_index+1 起
//   沿名册环形查找首个在岗律师
// 补差上限把"连续补差"的长度封顶,保证轮转节奏不被长期饥饿
// ==========================================

use crate::domain::lawyer::Lawyer;
use crate::domain::scheduler_state::SchedulerState;
use crate::domain::types::AssignmentPhase;
use thiserror::Error;

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// 名册中没有任何在岗律师,本次分配请求失败 (不产生部分结果)
    #[error("没有可分配的在岗律师")]
    NoActiveLawyers,
}

// ==========================================
// AssignmentDecision - 分配决策
// ==========================================
/// 单次分配决策的完整输出,携带阶段标签与解释文本,
/// 由调用方写入操作日志 (可解释性)
#[derive(Debug, Clone)]
pub struct AssignmentDecision {
    pub lawyer_id: String,            // 选中的律师ID
    pub phase: AssignmentPhase,       // 决策阶段
    pub reason: String,               // 决策解释 (面向审计日志)
    pub target_average: f64,          // 本次计算的在岗平均案件量
    pub active_count: usize,          // 在岗律师数
    pub rotation_index: Option<i64>,  // 轮转命中的名册位置 (仅阶段B有值)
}

// ==========================================
// AssignmentScheduler - 分配调度器
// ==========================================
pub struct AssignmentScheduler {
    // 无状态引擎: 调度状态由调用方显式传入并持久化
}

impl AssignmentScheduler {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 为新案件选定承办律师
    ///
    /// # 参数
    /// - `roster`: 完整名册 (含休假律师,轮转需要全量位置),按 roster_seq 升序
    /// - `state`: 调度器持久化状态,本函数就地更新
    ///   (catchup_sequence_count / last_assignment_index),由调用方落库
    ///
    /// # 返回
    /// - Ok(AssignmentDecision): 恰好一名律师 + 阶段标签 + 解释
    /// - Err(NoActiveLawyers): 在岗子集为空,致命错误
    ///
    /// # 平均值
    /// targetAverage 每次调用重新计算 (不缓存),
    /// 对名册状态变化和上一次分配立即敏感。
    pub fn select_lawyer(
        &self,
        roster: &[Lawyer],
        state: &mut SchedulerState,
    ) -> Result<AssignmentDecision, ScheduleError> {
        let active: Vec<&Lawyer> = roster.iter().filter(|l| l.is_active()).collect();
        if active.is_empty() {
            return Err(ScheduleError::NoActiveLawyers);
        }

        let total: i64 = active.iter().map(|l| l.assigned_files_count).sum();
        let target_average = total as f64 / active.len() as f64;

        // ==========================================
        // 阶段A: 补差 (deficit correction)
        // ==========================================
        if state.catchup_burst_limit <= 0 {
            // 配置错误: 不崩溃,记录后跳过补差,直接走轮转
            tracing::warn!(
                catchup_burst_limit = state.catchup_burst_limit,
                "catchup_burst_limit 非正数,跳过补差阶段,降级为纯轮转"
            );
        } else if state.catchup_sequence_count < state.catchup_burst_limit {
            // deficit > 0 才算落后 (严格低于平均)
            let mut deficits: Vec<(&Lawyer, f64)> = active
                .iter()
                .map(|l| (*l, target_average - l.assigned_files_count as f64))
                .filter(|(_, d)| *d > 0.0)
                .collect();

            // 按差额降序;sort_by 是稳定排序,差额相同时保持名册顺序
            deficits.sort_by(|a, b| b.1.total_cmp(&a.1));

            if let Some((lawyer, deficit)) = deficits.first() {
                state.catchup_sequence_count += 1;

                let reason = format!(
                    "补差分配: {} 落后平均 {:.2} 件 (平均 {:.2}, 当前 {}), 连续补差 {}/{}",
                    lawyer.name,
                    deficit,
                    target_average,
                    lawyer.assigned_files_count,
                    state.catchup_sequence_count,
                    state.catchup_burst_limit,
                );
                tracing::debug!(
                    lawyer_id = %lawyer.lawyer_id,
                    phase = %AssignmentPhase::CatchUp,
                    %reason,
                    "分配决策"
                );

                return Ok(AssignmentDecision {
                    lawyer_id: lawyer.lawyer_id.clone(),
                    phase: AssignmentPhase::CatchUp,
                    reason,
                    target_average,
                    active_count: active.len(),
                    rotation_index: None,
                });
            }
        }

        // ==========================================
        // 阶段B: 轮转 (round-robin)
        // ==========================================
        // 每次轮转命中都把连续补差计数清零,
        // 无论是 "无落后者" 还是 "补差额度用尽" 进入本阶段
        state.catchup_sequence_count = 0;

        let len = roster.len() as i64;
        let start = (state.last_assignment_index + 1).rem_euclid(len);

        // 最多环形走两圈 (防御: 在岗前置检查已通过,理论上一圈内必命中)
        for step in 0..(2 * len) {
            let pos = (start + step).rem_euclid(len);
            let candidate = &roster[pos as usize];
            if candidate.is_active() {
                state.last_assignment_index = pos;

                let reason = format!(
                    "轮转分配: 名册位置 {} ({}), 平均 {:.2}",
                    pos, candidate.name, target_average,
                );
                tracing::debug!(
                    lawyer_id = %candidate.lawyer_id,
                    phase = %AssignmentPhase::Rotation,
                    %reason,
                    "分配决策"
                );

                return Ok(AssignmentDecision {
                    lawyer_id: candidate.lawyer_id.clone(),
                    phase: AssignmentPhase::Rotation,
                    reason,
                    target_average,
                    active_count: active.len(),
                    rotation_index: Some(pos),
                });
            }
        }

        // ==========================================
        // 兜底: 两圈未命中 (不应到达), 取首个在岗律师
        // ==========================================
        let first_active = active[0];
        tracing::warn!(
            lawyer_id = %first_active.lawyer_id,
            "轮转两圈未命中在岗律师,触发兜底路径"
        );

        Ok(AssignmentDecision {
            lawyer_id: first_active.lawyer_id.clone(),
            phase: AssignmentPhase::Fallback,
            reason: format!("兜底分配: 取名册中首个在岗律师 {}", first_active.name),
            target_average,
            active_count: active.len(),
            rotation_index: None,
        })
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduler_state::SchedulerState;
    use crate::domain::types::LawyerStatus;
    use chrono::NaiveDate;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    /// 创建测试用律师
    fn make_lawyer(id: &str, status: LawyerStatus, assigned: i64, seq: i64) -> Lawyer {
        Lawyer {
            lawyer_id: id.to_string(),
            name: format!("律师{}", id),
            status,
            leave_return_date: None,
            assigned_files_count: assigned,
            missed_assignments_count: 0,
            roster_seq: seq,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn roster_3_equal() -> Vec<Lawyer> {
        vec![
            make_lawyer("A", LawyerStatus::Active, 0, 1),
            make_lawyer("B", LawyerStatus::Active, 0, 2),
            make_lawyer("C", LawyerStatus::Active, 0, 3),
        ]
    }

    // ==========================================
    // 测试1: 种子场景 - 首次分配走轮转,命中名册位置0
    // ==========================================
    #[test]
    fn test_first_assignment_is_rotation_pick_at_index_zero() {
        let roster = roster_3_equal();
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        // 平均=0,无人严格低于平均 (deficit > 0 不成立) -> 阶段B
        let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
        assert_eq!(decision.lawyer_id, "A");
        assert_eq!(decision.phase, AssignmentPhase::Rotation);
        assert_eq!(state.last_assignment_index, 0);
        assert_eq!(state.catchup_sequence_count, 0);
    }

    // ==========================================
    // 测试2: 落后者通过补差优先追平
    // ==========================================
    #[test]
    fn test_catchup_picks_largest_deficit() {
        let roster = vec![
            make_lawyer("A", LawyerStatus::Active, 5, 1),
            make_lawyer("B", LawyerStatus::Active, 1, 2),
            make_lawyer("C", LawyerStatus::Active, 3, 3),
        ];
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        // 平均=3, B 差额2, 最大 -> 补差命中 B
        let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
        assert_eq!(decision.lawyer_id, "B");
        assert_eq!(decision.phase, AssignmentPhase::CatchUp);
        assert_eq!(state.catchup_sequence_count, 1);
        // 补差不推进轮转指针
        assert_eq!(state.last_assignment_index, -1);
    }

    // ==========================================
    // 测试3: 补差上限 - 连续补差不超过 burst_limit,之后强制轮转一次
    // ==========================================
    #[test]
    fn test_burst_limit_forces_rotation_tick() {
        // B 远远落后,每次计算差额都为正
        let mut roster = vec![
            make_lawyer("A", LawyerStatus::Active, 10, 1),
            make_lawyer("B", LawyerStatus::Active, 0, 2),
            make_lawyer("C", LawyerStatus::Active, 10, 3),
        ];
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();
        let mut consecutive_catchup = 0;
        let mut max_consecutive = 0;

        for _ in 0..30 {
            let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
            if decision.phase == AssignmentPhase::CatchUp {
                consecutive_catchup += 1;
                max_consecutive = max_consecutive.max(consecutive_catchup);
            } else {
                consecutive_catchup = 0;
            }
            // 模拟登记处落库: 计数 +1
            let idx = roster
                .iter()
                .position(|l| l.lawyer_id == decision.lawyer_id)
                .unwrap();
            roster[idx].assigned_files_count += 1;
        }

        assert!(
            max_consecutive <= 2,
            "连续补差 {} 次,超过上限 2",
            max_consecutive
        );
    }

    // ==========================================
    // 测试4: 轮转跳过休假律师
    // ==========================================
    #[test]
    fn test_rotation_skips_on_leave() {
        let roster = vec![
            make_lawyer("A", LawyerStatus::OnLeave, 0, 1),
            make_lawyer("B", LawyerStatus::Active, 0, 2),
            make_lawyer("C", LawyerStatus::OnLeave, 0, 3),
        ];
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
        assert_eq!(decision.lawyer_id, "B");
        assert_eq!(decision.phase, AssignmentPhase::Rotation);
        assert_eq!(state.last_assignment_index, 1);
    }

    // ==========================================
    // 测试5: 单人在岗 - 每次都命中该律师
    // ==========================================
    #[test]
    fn test_single_active_always_selected() {
        let mut roster = vec![
            make_lawyer("A", LawyerStatus::OnLeave, 3, 1),
            make_lawyer("B", LawyerStatus::OnLeave, 7, 2),
            make_lawyer("C", LawyerStatus::Active, 0, 3),
            make_lawyer("D", LawyerStatus::OnLeave, 2, 4),
            make_lawyer("E", LawyerStatus::OnLeave, 5, 5),
        ];
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        for _ in 0..10 {
            let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
            assert_eq!(decision.lawyer_id, "C");
            roster[2].assigned_files_count += 1;
        }
    }

    // ==========================================
    // 测试6: 无在岗律师 - NoActiveLawyers
    // ==========================================
    #[test]
    fn test_no_active_lawyers_is_fatal() {
        let roster = vec![
            make_lawyer("A", LawyerStatus::OnLeave, 0, 1),
            make_lawyer("B", LawyerStatus::OnLeave, 0, 2),
        ];
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        let result = scheduler.select_lawyer(&roster, &mut state);
        assert!(matches!(result, Err(ScheduleError::NoActiveLawyers)));
        // 失败时状态不变
        assert_eq!(state, SchedulerState::initial(2));
    }

    #[test]
    fn test_empty_roster_is_fatal() {
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();
        let result = scheduler.select_lawyer(&[], &mut state);
        assert!(matches!(result, Err(ScheduleError::NoActiveLawyers)));
    }

    // ==========================================
    // 测试7: 非法配置 - burst_limit <= 0 降级为纯轮转,不崩溃
    // ==========================================
    #[test]
    fn test_nonpositive_burst_limit_degrades_to_rotation() {
        let roster = vec![
            make_lawyer("A", LawyerStatus::Active, 10, 1),
            make_lawyer("B", LawyerStatus::Active, 0, 2),
        ];
        let mut state = SchedulerState::initial(0);
        let scheduler = AssignmentScheduler::new();

        // B 明显落后,但补差被禁用 -> 轮转从位置0开始命中 A
        let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
        assert_eq!(decision.lawyer_id, "A");
        assert_eq!(decision.phase, AssignmentPhase::Rotation);
    }

    // ==========================================
    // 测试8: 差额并列时取名册顺序靠前者 (稳定排序)
    // ==========================================
    #[test]
    fn test_deficit_tie_keeps_roster_order() {
        let roster = vec![
            make_lawyer("A", LawyerStatus::Active, 4, 1),
            make_lawyer("B", LawyerStatus::Active, 1, 2),
            make_lawyer("C", LawyerStatus::Active, 1, 3),
        ];
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        // B/C 差额相同 (平均2,各差1) -> 稳定排序保持名册顺序,命中 B
        let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
        assert_eq!(decision.lawyer_id, "B");
        assert_eq!(decision.phase, AssignmentPhase::CatchUp);
    }

    // ==========================================
    // 测试9: 轮转指针越界时回绕 (名册缩减后仍然安全)
    // ==========================================
    #[test]
    fn test_rotation_index_wraps_after_roster_shrink() {
        let roster = vec![
            make_lawyer("A", LawyerStatus::Active, 1, 1),
            make_lawyer("B", LawyerStatus::Active, 1, 2),
        ];
        let mut state = SchedulerState {
            last_assignment_index: 7, // 指向早已不存在的位置
            catchup_burst_limit: 2,
            catchup_sequence_count: 0,
        };
        let scheduler = AssignmentScheduler::new();

        let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
        assert_eq!(decision.phase, AssignmentPhase::Rotation);
        assert!(decision.rotation_index.unwrap() < 2);
    }

    // ==========================================
    // 测试10: 公平性收敛 - 1000次分配后最大差距有界
    // ==========================================
    #[test]
    fn test_fairness_spread_stays_bounded() {
        let mut roster = roster_3_equal();
        let mut state = SchedulerState::initial(2);
        let scheduler = AssignmentScheduler::new();

        for _ in 0..1000 {
            let decision = scheduler.select_lawyer(&roster, &mut state).unwrap();
            let idx = roster
                .iter()
                .position(|l| l.lawyer_id == decision.lawyer_id)
                .unwrap();
            roster[idx].assigned_files_count += 1;

            let max = roster.iter().map(|l| l.assigned_files_count).max().unwrap();
            let min = roster.iter().map(|l| l.assigned_files_count).min().unwrap();
            assert!(
                max - min <= 2,
                "案件量差距 {} 超出补差上限的约束范围",
                max - min
            );
        }

        let total: i64 = roster.iter().map(|l| l.assigned_files_count).sum();
        assert_eq!(total, 1000);
    }
}
