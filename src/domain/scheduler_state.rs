// ==========================================
// 律所案件管理系统 - 调度器状态
// ==========================================
// 红线: 调度状态必须是显式传入调度函数的持久化记录,
//       禁止进程内静态变量 (可测试性 + 重启正确性)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SchedulerState - 调度器持久化状态 (全局单例记录)
// ==========================================
// 组成:
// - last_assignment_index / catchup_sequence_count 存于 scheduler_state 表
// - catchup_burst_limit 存于 config_kv (运营可配置),每次调度前重新读取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub last_assignment_index: i64,  // 上次轮转命中的名册位置 (初始 -1)
    pub catchup_burst_limit: i64,    // 连续补差上限 (正整数,默认 2)
    pub catchup_sequence_count: i64, // 当前连续补差次数 (轮转命中后归零)
}

impl SchedulerState {
    /// 初始状态 (尚未发生任何分配)
    pub fn initial(catchup_burst_limit: i64) -> Self {
        Self {
            last_assignment_index: -1,
            catchup_burst_limit,
            catchup_sequence_count: 0,
        }
    }
}

/// `catchup_burst_limit` 的出厂默认值
pub const DEFAULT_CATCHUP_BURST_LIMIT: i64 = 2;
