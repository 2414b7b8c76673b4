// ==========================================
// 律所案件管理系统 - 智能立案服务
// ==========================================
// 职责: 调用文书分析接口,把抽取字段送入案件登记流程
// ==========================================

use crate::api::case_file_api::CaseFileApi;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::case_file::CaseFile;
use crate::intake::intake_analyzer_trait::CaseIntakeAnalyzer;
use std::sync::Arc;

// ==========================================
// IntakeService - 智能立案服务
// ==========================================
pub struct IntakeService {
    analyzer: Arc<dyn CaseIntakeAnalyzer>,
    case_file_api: Arc<CaseFileApi>,
}

impl IntakeService {
    /// 创建新的IntakeService实例
    pub fn new(analyzer: Arc<dyn CaseIntakeAnalyzer>, case_file_api: Arc<CaseFileApi>) -> Self {
        Self {
            analyzer,
            case_file_api,
        }
    }

    /// 从来文文本立案
    ///
    /// 分析 -> 校验抽取字段 -> 登记新案件 (自动分配承办律师)。
    /// 分析失败不触碰任何持久化状态。
    ///
    /// # 参数
    /// - `raw_text`: 来文全文
    /// - `actor`: 操作人
    pub async fn intake_from_text(&self, raw_text: &str, actor: &str) -> ApiResult<CaseFile> {
        if raw_text.trim().is_empty() {
            return Err(ApiError::InvalidInput("来文文本不能为空".to_string()));
        }

        let fields = self
            .analyzer
            .analyze(raw_text)
            .await
            .map_err(|e| ApiError::BusinessRuleViolation(e.to_string()))?;

        tracing::info!(
            plaintiff = %fields.plaintiff,
            subject = %fields.subject,
            "文书分析完成,进入案件登记"
        );

        self.case_file_api
            .create_case_file(&fields.plaintiff, &fields.subject, actor)
    }
}
