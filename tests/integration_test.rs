use forms_admin::models::{parse_form_fixture, FormState};
use forms_admin::orchestrator::{App, Command};
use forms_admin::workflow::{RawPagePosition, CONFLICT_MESSAGE};
use forms_admin::{
    AppError, ChangeOrderService, Config, FormId, FormRepository, MemoryStore, PageId,
    PageRepository, ReorderCtx, ReorderFlow, ReorderOutcome, ReorderRequest,
};
use tokio_test::assert_ok;

const FORM: &str = r#"
[form]
id = 1
name = "申请钓鱼许可证"
state = "live"
question_section_completed = true
declaration_section_completed = true
what_happens_next_markdown = "我们会通过邮件通知你"
privacy_policy_url = "https://example.gov.uk/privacy"
support_email = "fishing@example.gov.uk"

[[pages]]
id = 101
question_text = "你的全名是？"
answer_type = "name"
[pages.answer_settings]
input_type = "full_name"

[[pages]]
id = 102
question_text = "你的邮箱是？"
answer_type = "email"

[[pages]]
id = 103
question_text = "你想在哪里钓鱼？"
answer_type = "selection"
[pages.answer_settings]
only_one_option = true
selection_options = [{ name = "河流" }, { name = "湖泊" }]

[[pages]]
id = 104
question_text = "你的出生日期是？"
answer_type = "date"
[pages.answer_settings]
input_type = "date_of_birth"

[[pages]]
id = 105
question_text = "还有什么要告诉我们的吗？"
answer_type = "text"
[pages.answer_settings]
input_type = "long_text"
"#;

async fn seeded_store() -> MemoryStore {
    let _ = tracing_subscriber::fmt::try_init();

    let store = MemoryStore::new();
    let fixture = parse_form_fixture(FORM).expect("解析表单失败");
    store.seed(vec![fixture]).await.expect("初始化存储失败");
    store
}

async fn order_of(store: &MemoryStore) -> Vec<u64> {
    store
        .list_pages(FormId(1))
        .await
        .unwrap()
        .iter()
        .map(|p| p.id.0)
        .collect()
}

fn raw(page_id: u64, new_position: &str) -> RawPagePosition {
    RawPagePosition {
        page_id: PageId(page_id),
        new_position: new_position.to_string(),
    }
}

#[tokio::test]
async fn test_reorder_with_duplicate_positions() {
    let store = seeded_store().await;
    let flow = ReorderFlow::new(&store);

    let outcome = flow
        .run(
            &ReorderCtx::new(FormId(1), 1),
            ReorderRequest::Positions(vec![
                raw(101, "3"),
                raw(102, "3"),
                raw(103, "4"),
                raw(104, ""),
                raw(105, ""),
            ]),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, ReorderOutcome::Reordered { .. }));
    assert_eq!(order_of(&store).await, vec![104, 105, 101, 102, 103]);

    let pages = store.list_pages(FormId(1)).await.unwrap();
    let positions: Vec<u32> = pages.iter().map(|p| p.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5]);

    // 修改问题后已发布的表单进入草稿状态
    let form = store.get_form(FormId(1)).await.unwrap();
    assert_eq!(form.state, FormState::LiveWithDraft);
    assert!(!form.question_section_completed);
}

#[tokio::test]
async fn test_stale_page_list_is_rejected_without_writes() {
    let store = seeded_store().await;
    let service = ChangeOrderService::new(&store);
    let writes_before = store.position_writes().await;

    let result = service
        .apply_order(
            FormId(1),
            &[PageId(105), PageId(104), PageId(103), PageId(102)],
        )
        .await;

    assert!(matches!(result, Err(ref e) if e.is_inconsistent_page_set()));
    assert_eq!(store.position_writes().await, writes_before);
    assert_eq!(order_of(&store).await, vec![101, 102, 103, 104, 105]);
    assert_eq!(
        store.get_form(FormId(1)).await.unwrap().state,
        FormState::Live
    );
}

#[tokio::test]
async fn test_conflict_outcome_returns_fresh_pages() {
    let store = seeded_store().await;
    store.delete_page(PageId(103)).await.unwrap();

    let outcome = ReorderFlow::new(&store)
        .run(
            &ReorderCtx::new(FormId(1), 1),
            ReorderRequest::Order(vec![
                PageId(105),
                PageId(104),
                PageId(103),
                PageId(102),
                PageId(101),
            ]),
        )
        .await
        .unwrap();

    match outcome {
        ReorderOutcome::Conflict { message, pages } => {
            assert_eq!(message, CONFLICT_MESSAGE);
            assert_eq!(pages.len(), 4);
        }
        other => panic!("应该返回冲突: {:?}", other),
    }
}

#[tokio::test]
async fn test_app_make_live_writes_document() {
    let store = seeded_store().await;
    let dir = std::env::temp_dir().join(format!("forms-admin-docs-{}", std::process::id()));
    let config = Config {
        form_document_dir: dir.to_string_lossy().to_string(),
        ..Config::default()
    };
    let app = App::with_store(config, store);

    let args: Vec<String> = ["order", "1", "105,101,102,103,104"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_ok!(app.run(Command::parse(&args).unwrap()).await);

    // 排序后问题部分需要重新确认，不能直接上线
    let err = app.make_live(FormId(1)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::Transition(_))
    ));

    let mut form = app.store().get_form(FormId(1)).await.unwrap();
    form.question_section_completed = true;
    app.store().update_form(&form).await.unwrap();

    let path = app.make_live(FormId(1)).await.unwrap();
    let json = tokio::fs::read_to_string(&path).await.unwrap();
    let document: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(document["start_page"], 105);
    assert_eq!(document["pages"][0]["next_page"], 101);
    assert_eq!(document["pages"][4]["next_page"], serde_json::Value::Null);
    assert_eq!(
        app.store().get_form(FormId(1)).await.unwrap().state,
        FormState::Live
    );

    assert_ok!(app.run(Command::Archive(FormId(1))).await);
    assert_eq!(
        app.store().get_form(FormId(1)).await.unwrap().state,
        FormState::Archived
    );

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
