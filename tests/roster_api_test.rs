// ==========================================
// 律师名册 API 测试
// ==========================================
// 职责: 验证名册追加顺序、休假状态不变式与人工操作校验
// ==========================================


#[cfg(test)]
mod roster_api_test {
    use chrono::NaiveDate;
    use lawfirm_cms::api::ApiError;
    use lawfirm_cms::domain::types::LawyerStatus;

    use crate::test_helpers::{seed_lawyers, setup_test_app};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ==========================================
    // 测试1: 名册只追加 - roster_seq 单调递增,列表按名册顺序
    // ==========================================
    #[test]
    fn test_roster_seq_is_append_only() {
        let (_tmp, _clock, app) = setup_test_app(day(2025, 6, 1)).unwrap();
        seed_lawyers(&app, &["甲", "乙", "丙"]).unwrap();

        let lawyers = app.roster_api.list_lawyers().unwrap();
        let seqs: Vec<i64> = lawyers.iter().map(|l| l.roster_seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);

        // 新增律师追加在末尾,不重排既有顺序
        app.roster_api.create_lawyer("丁", "admin").unwrap();
        let lawyers = app.roster_api.list_lawyers().unwrap();
        assert_eq!(lawyers.len(), 4);
        assert_eq!(lawyers[3].roster_seq, 4);
        assert_eq!(lawyers[3].name, "丁");
    }

    // ==========================================
    // 测试2: 休假状态不变式 - 返回日期与状态同生同灭
    // ==========================================
    #[test]
    fn test_leave_invariant_maintained() {
        let (_tmp, _clock, app) = setup_test_app(day(2025, 6, 1)).unwrap();
        let ids = seed_lawyers(&app, &["甲"]).unwrap();

        app.roster_api
            .set_on_leave(&ids[0], day(2025, 7, 1), "admin")
            .unwrap();
        let lawyer = app.roster_api.get_lawyer(&ids[0]).unwrap();
        assert_eq!(lawyer.status, LawyerStatus::OnLeave);
        assert_eq!(lawyer.leave_return_date, Some(day(2025, 7, 1)));

        // 已休假可调整返回日期
        app.roster_api
            .set_on_leave(&ids[0], day(2025, 8, 1), "admin")
            .unwrap();
        let lawyer = app.roster_api.get_lawyer(&ids[0]).unwrap();
        assert_eq!(lawyer.leave_return_date, Some(day(2025, 8, 1)));

        // 人工复岗清空返回日期
        app.roster_api.reactivate(&ids[0], "admin").unwrap();
        let lawyer = app.roster_api.get_lawyer(&ids[0]).unwrap();
        assert_eq!(lawyer.status, LawyerStatus::Active);
        assert_eq!(lawyer.leave_return_date, None);
    }

    // ==========================================
    // 测试3: 人工操作校验
    // ==========================================
    #[test]
    fn test_manual_operation_validation() {
        let (_tmp, _clock, app) = setup_test_app(day(2025, 6, 1)).unwrap();
        let ids = seed_lawyers(&app, &["甲"]).unwrap();

        // 在岗律师不能再复岗
        let result = app.roster_api.reactivate(&ids[0], "admin");
        assert!(matches!(
            result,
            Err(ApiError::InvalidStateTransition { .. })
        ));

        // 空姓名拒绝
        let result = app.roster_api.create_lawyer("  ", "admin");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        // 不存在的律师
        let result = app.roster_api.set_on_leave("no-such-id", day(2025, 7, 1), "admin");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
