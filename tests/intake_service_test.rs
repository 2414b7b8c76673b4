// ==========================================
// 智能立案服务测试
// ==========================================
// 职责: 验证 文书分析 -> 案件登记 的对接 (脚本化 Mock 分析器)
// ==========================================


#[cfg(test)]
mod intake_service_test {
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use lawfirm_cms::api::ApiError;
    use lawfirm_cms::intake::{CaseIntakeAnalyzer, ExtractedCaseFields, IntakeError, IntakeService};
    use std::sync::Arc;

    use crate::test_helpers::{seed_lawyers, setup_test_app};

    // ==========================================
    // 脚本化 Mock 分析器
    // ==========================================

    /// 固定返回预设字段的分析器
    struct ScriptedAnalyzer {
        plaintiff: String,
        subject: String,
    }

    #[async_trait]
    impl CaseIntakeAnalyzer for ScriptedAnalyzer {
        async fn analyze(&self, _raw_text: &str) -> Result<ExtractedCaseFields, IntakeError> {
            Ok(ExtractedCaseFields {
                plaintiff: self.plaintiff.clone(),
                subject: self.subject.clone(),
                summary: Some("自动摘要".to_string()),
            })
        }
    }

    /// 始终失败的分析器
    struct FailingAnalyzer;

    #[async_trait]
    impl CaseIntakeAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _raw_text: &str) -> Result<ExtractedCaseFields, IntakeError> {
            Err(IntakeError::AnalysisFailed("上游服务不可用".to_string()))
        }
    }

    // ==========================================
    // 测试1: 分析成功 -> 登记并自动分配
    // ==========================================
    #[tokio::test]
    async fn test_intake_creates_assigned_case() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (_tmp, _clock, app) = setup_test_app(today).unwrap();
        let ids = seed_lawyers(&app, &["张律师"]).unwrap();

        let service = IntakeService::new(
            Arc::new(ScriptedAnalyzer {
                plaintiff: "庚公司".to_string(),
                subject: "买卖合同纠纷".to_string(),
            }),
            app.case_file_api.clone(),
        );

        let case = service
            .intake_from_text("兹有庚公司诉...", "intake")
            .await
            .unwrap();
        assert_eq!(case.plaintiff, "庚公司");
        assert_eq!(case.subject, "买卖合同纠纷");
        assert_eq!(case.assigned_lawyer_id.as_deref(), Some(ids[0].as_str()));
        assert_eq!(case.registration_no, "2025/0001");
    }

    // ==========================================
    // 测试2: 分析失败 -> 不触碰持久化状态
    // ==========================================
    #[tokio::test]
    async fn test_intake_failure_leaves_no_trace() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (_tmp, _clock, app) = setup_test_app(today).unwrap();
        seed_lawyers(&app, &["张律师"]).unwrap();

        let service = IntakeService::new(Arc::new(FailingAnalyzer), app.case_file_api.clone());

        let result = service.intake_from_text("来文全文", "intake").await;
        assert!(matches!(result, Err(ApiError::BusinessRuleViolation(_))));
        assert!(app.case_file_api.list_case_files().unwrap().is_empty());
    }

    // ==========================================
    // 测试3: 空文本直接拒绝
    // ==========================================
    #[tokio::test]
    async fn test_empty_text_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (_tmp, _clock, app) = setup_test_app(today).unwrap();

        let service = IntakeService::new(Arc::new(FailingAnalyzer), app.case_file_api.clone());
        let result = service.intake_from_text("   ", "intake").await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }
}
