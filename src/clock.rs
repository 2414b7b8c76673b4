// ==========================================
// 律所案件管理系统 - 日历时钟
// ==========================================
// 职责: 向 API 层提供 "今天" 的日历日期与当前时间戳
// 约定: 日期一律使用 ISO `YYYY-MM-DD` 文本格式存储,直接按字符串比较
// ==========================================

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// 日历时钟接口
///
/// 自动复岗与登记编号都依赖 "今天" 的判定,
/// 通过该接口注入以便测试控制日期推进。
pub trait Clock: Send + Sync {
    /// 今天的日历日期 (不含时分秒)
    fn today(&self) -> NaiveDate;

    /// 当前时间戳
    fn now(&self) -> NaiveDateTime;
}

// ==========================================
// SystemClock - 本地系统时钟
// ==========================================
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// ==========================================
// FixedClock - 固定时钟 (测试用)
// ==========================================
// 测试通过 set() 推进日期,模拟休假到期等场景
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// 以指定时间戳创建固定时钟
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// 以某天的零点创建固定时钟
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(0, 0, 0).unwrap())
    }

    /// 重设当前时间
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    /// 重设为某天的零点
    pub fn set_date(&self, date: NaiveDate) {
        self.set(date.and_hms_opt(0, 0, 0).unwrap());
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.lock().unwrap().date()
    }

    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}
