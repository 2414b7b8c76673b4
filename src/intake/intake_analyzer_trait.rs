// ==========================================
// 律所案件管理系统 - 智能立案分析 Trait
// ==========================================
// 职责: 定义文书分析接口（不包含实现）
// 边界: AI 文本分析是外部协作方,本系统只消费其结构化输出,
//       不做提示词工程、不做 OCR、不做文件格式解析
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// ExtractedCaseFields - 文书抽取结果
// ==========================================
/// 分析服务从来文文本中抽取出的结构化立案字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCaseFields {
    pub plaintiff: String,       // 当事人/委托人
    pub subject: String,         // 案由
    pub summary: Option<String>, // 摘要 (可选,存入案件备注)
}

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("文书分析失败: {0}")]
    AnalysisFailed(String),

    #[error("抽取结果缺少必要字段: {0}")]
    MissingField(&'static str),
}

// ==========================================
// CaseIntakeAnalyzer Trait
// ==========================================
// 用途: 立案文书分析主接口
// 实现者: 外部 AI 服务适配器 (生产) / 脚本化 Mock (测试)
#[async_trait]
pub trait CaseIntakeAnalyzer: Send + Sync {
    /// 分析来文文本,抽取立案字段
    ///
    /// # 参数
    /// - `raw_text`: 来文全文 (上游已完成文件解析/OCR)
    ///
    /// # 返回
    /// - Ok(ExtractedCaseFields): 结构化立案字段
    /// - Err(IntakeError): 分析失败或字段缺失
    async fn analyze(&self, raw_text: &str) -> Result<ExtractedCaseFields, IntakeError>;
}
