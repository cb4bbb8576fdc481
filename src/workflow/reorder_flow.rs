//! 排序流程 - 流程层
//!
//! 核心职责：处理"一次排序请求"
//!
//! 流程顺序：
//! 1. 整理用户输入（位置转为整数）
//! 2. 计算新顺序并写入
//! 3. 页面集合已变化时返回冲突结果，附带重新加载的页面列表

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::infrastructure::{FormRepository, PageRepository};
use crate::models::{Page, PageId};
use crate::services::{
    parse_requested_position, positions_from_order, ChangeOrderService, MoveDirection,
    PagePosition,
};
use crate::workflow::reorder_ctx::ReorderCtx;

/// 页面集合变化时展示给用户的提示
pub const CONFLICT_MESSAGE: &str = "Something changed while you were reordering. Please try again.";

/// 用户提交的页面位置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPagePosition {
    pub page_id: PageId,
    /// 原样保留用户输入，可能为空
    #[serde(default)]
    pub new_position: String,
}

/// 排序请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderRequest {
    /// 拖拽排序后的完整 ID 列表
    Order(Vec<PageId>),
    /// 当前顺序的页面及用户填写的位置
    Positions(Vec<RawPagePosition>),
    /// 上移或下移一个页面
    Move {
        page_id: PageId,
        direction: MoveDirection,
    },
}

/// 排序结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// 已写入新顺序
    Reordered { order: Vec<PageId> },
    /// 无需修改
    Unchanged,
    /// 页面集合已变化，需要用户重新操作
    Conflict { message: String, pages: Vec<Page> },
}

/// 排序流程
///
/// - 编排一次排序请求
/// - 决定冲突时返回给用户的内容
/// - 不直接写存储，只依赖业务能力（services）
pub struct ReorderFlow<'a, S> {
    store: &'a S,
    service: ChangeOrderService<'a, S>,
}

impl<'a, S> ReorderFlow<'a, S>
where
    S: FormRepository + PageRepository,
{
    /// 创建新的排序流程
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            service: ChangeOrderService::new(store),
        }
    }

    pub async fn run(&self, ctx: &ReorderCtx, request: ReorderRequest) -> AppResult<ReorderOutcome> {
        info!("{} 🔀 开始处理排序请求", ctx);

        let result = match request {
            ReorderRequest::Order(order) => self
                .service
                .reorder(ctx.form_id, &positions_from_order(&order))
                .await
                .map(|order| ReorderOutcome::Reordered { order }),
            ReorderRequest::Positions(raw) => {
                let pages = coerce_positions(&raw);
                self.service
                    .reorder(ctx.form_id, &pages)
                    .await
                    .map(|order| ReorderOutcome::Reordered { order })
            }
            ReorderRequest::Move { page_id, direction } => {
                match self.service.move_page(ctx.form_id, page_id, direction).await {
                    Ok(true) => self.current_order(ctx).await,
                    Ok(false) => Ok(ReorderOutcome::Unchanged),
                    Err(e) => Err(e),
                }
            }
        };

        match result {
            Ok(outcome) => {
                info!("{} ✓ 排序请求完成", ctx);
                Ok(outcome)
            }
            Err(e) if e.is_inconsistent_page_set() => {
                warn!("{} ⚠️ 页面已变化, 需要重新排序: {}", ctx, e);
                let pages = self.store.list_pages(ctx.form_id).await?;
                Ok(ReorderOutcome::Conflict {
                    message: CONFLICT_MESSAGE.to_string(),
                    pages,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn current_order(&self, ctx: &ReorderCtx) -> AppResult<ReorderOutcome> {
        let order = self
            .store
            .list_pages(ctx.form_id)
            .await?
            .iter()
            .map(|p| p.id)
            .collect();
        Ok(ReorderOutcome::Reordered { order })
    }
}

/// 把用户输入的位置转为整数
fn coerce_positions(raw: &[RawPagePosition]) -> Vec<PagePosition> {
    raw.iter()
        .map(|p| PagePosition::new(p.page_id, parse_requested_position(&p.new_position)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::recording_store::RecordingStore;
    use crate::infrastructure::MemoryStore;
    use crate::models::{AnswerSettings, Form, FormId, NewPage};
    use chrono::Utc;

    async fn store_with_pages(count: usize) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_form(Form::new(FormId(1), "流程测试", Utc::now()))
            .await
            .unwrap();
        for i in 0..count {
            store
                .create_page(
                    FormId(1),
                    NewPage::new(format!("问题 {}", i + 1), AnswerSettings::Number),
                )
                .await
                .unwrap();
        }
        store
    }

    fn raw(page_id: u64, new_position: &str) -> RawPagePosition {
        RawPagePosition {
            page_id: PageId(page_id),
            new_position: new_position.to_string(),
        }
    }

    #[tokio::test]
    async fn test_positions_are_coerced() {
        let store = store_with_pages(3).await;
        let flow = ReorderFlow::new(&store);
        let ctx = ReorderCtx::new(FormId(1), 1);

        let outcome = flow
            .run(
                &ctx,
                ReorderRequest::Positions(vec![raw(1, " 3.0 "), raw(2, ""), raw(3, "oops")]),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReorderOutcome::Reordered {
                order: vec![PageId(2), PageId(3), PageId(1)]
            }
        );
    }

    #[tokio::test]
    async fn test_stale_order_becomes_conflict() {
        let store = store_with_pages(2).await;
        let flow = ReorderFlow::new(&store);
        let ctx = ReorderCtx::new(FormId(1), 1);

        // 用户打开排序界面后，有人新增了一个页面
        store
            .create_page(FormId(1), NewPage::new("新问题", AnswerSettings::Email))
            .await
            .unwrap();

        let outcome = flow
            .run(&ctx, ReorderRequest::Order(vec![PageId(2), PageId(1)]))
            .await
            .unwrap();

        match outcome {
            ReorderOutcome::Conflict { message, pages } => {
                assert_eq!(message, "Something changed while you were reordering. Please try again.");
                let ids: Vec<u64> = pages.iter().map(|p| p.id.0).collect();
                assert_eq!(ids, vec![1, 2, 3]);
            }
            other => panic!("应该返回冲突: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_page_deleted_before_write_becomes_conflict() {
        let store = RecordingStore::deleting_before_write(store_with_pages(3).await, PageId(2));
        let flow = ReorderFlow::new(&store);
        let ctx = ReorderCtx::new(FormId(1), 1);

        let outcome = flow
            .run(
                &ctx,
                ReorderRequest::Order(vec![PageId(3), PageId(2), PageId(1)]),
            )
            .await
            .unwrap();

        match outcome {
            ReorderOutcome::Conflict { message, pages } => {
                assert_eq!(message, CONFLICT_MESSAGE);
                let positions: Vec<(u64, u32)> =
                    pages.iter().map(|p| (p.id.0, p.position)).collect();
                assert_eq!(positions, vec![(1, 1), (3, 2)]);
            }
            other => panic!("应该返回冲突: {:?}", other),
        }
        assert_eq!(store.hook_calls(), 0);
    }

    #[tokio::test]
    async fn test_move_request() {
        let store = store_with_pages(3).await;
        let flow = ReorderFlow::new(&store);
        let ctx = ReorderCtx::new(FormId(1), 1);

        let outcome = flow
            .run(
                &ctx,
                ReorderRequest::Move {
                    page_id: PageId(1),
                    direction: MoveDirection::Down,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReorderOutcome::Reordered {
                order: vec![PageId(2), PageId(1), PageId(3)]
            }
        );

        let outcome = flow
            .run(
                &ctx,
                ReorderRequest::Move {
                    page_id: PageId(3),
                    direction: MoveDirection::Down,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, ReorderOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let store = store_with_pages(1).await;
        let flow = ReorderFlow::new(&store);
        let ctx = ReorderCtx::new(FormId(42), 1);

        let result = flow
            .run(&ctx, ReorderRequest::Order(vec![PageId(1)]))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_position_deserialize() {
        let parsed: Vec<RawPagePosition> = serde_json::from_str(
            r#"[{ "page_id": 5, "new_position": "2" }, { "page_id": 6 }]"#,
        )
        .unwrap();
        assert_eq!(parsed, vec![raw(5, "2"), raw(6, "")]);
    }
}
