//! 页面排序服务 - 业务能力层
//!
//! 把排序结果写回存储，只处理单个表单

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{AppResult, RepositoryError};
use crate::infrastructure::{FormRepository, PageRepository};
use crate::models::{FormId, PageId};
use crate::services::page_order::{resolve_page_order, PagePosition};

/// 上移或下移一位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Some(MoveDirection::Up),
            "down" => Some(MoveDirection::Down),
            _ => None,
        }
    }
}

/// 页面排序服务
///
/// 职责：
/// - 把顺序转换为 1..=N 的位置
/// - 交给存储一次性写入，页面集合的校验在存储的写锁内完成
/// - 写入完成后通知表单问题已修改
pub struct ChangeOrderService<'a, S> {
    store: &'a S,
}

impl<'a, S> ChangeOrderService<'a, S>
where
    S: FormRepository + PageRepository,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 按目标位置重新排序
    ///
    /// # 参数
    /// - `form_id`: 表单ID
    /// - `pages`: 当前顺序的页面及目标位置
    ///
    /// # 返回
    /// 返回写入后的顺序
    pub async fn reorder(&self, form_id: FormId, pages: &[PagePosition]) -> AppResult<Vec<PageId>> {
        let order = resolve_page_order(pages);
        debug!("表单 {} 计算出的新顺序: {:?}", form_id, order);
        self.apply_order(form_id, &order).await?;
        Ok(order)
    }

    /// 写入完整的页面顺序
    ///
    /// 顺序必须恰好包含表单当前的全部页面，否则返回
    /// [`ReorderError::InconsistentPageSet`](crate::error::ReorderError::InconsistentPageSet) 且不做任何写入。
    /// 位置写入与表单更新在存储的同一次写锁内完成
    pub async fn apply_order(&self, form_id: FormId, order: &[PageId]) -> AppResult<()> {
        let positions: Vec<(PageId, u32)> = order
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, (index + 1) as u32))
            .collect();

        let now = Utc::now();
        let result = self
            .store
            .reorder_pages(form_id, &positions, |form| form.save_question_changes(now))
            .await;

        match result {
            Ok(form) => {
                info!(
                    "✓ 表单 {} 的 {} 个页面已重新排序 ({})",
                    form_id,
                    order.len(),
                    form.state
                );
                Ok(())
            }
            Err(e) if e.is_inconsistent_page_set() => {
                warn!("⚠️ 放弃排序: {}", e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// 把页面上移或下移一位
    ///
    /// 已经在最前或最后时不做任何修改
    ///
    /// # 返回
    /// 返回是否发生了移动
    pub async fn move_page(
        &self,
        form_id: FormId,
        page_id: PageId,
        direction: MoveDirection,
    ) -> AppResult<bool> {
        let page = self.store.get_page(page_id).await?;
        if page.form_id != form_id {
            return Err(RepositoryError::PageNotInForm { form_id, page_id }.into());
        }

        let mut order: Vec<PageId> = self
            .store
            .list_pages(form_id)
            .await?
            .iter()
            .map(|p| p.id)
            .collect();
        let Some(index) = order.iter().position(|id| *id == page_id) else {
            return Err(RepositoryError::PageNotInForm { form_id, page_id }.into());
        };

        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < order.len() => index + 1,
            _ => {
                debug!("页面 {} 已在边界, 无需移动", page_id);
                return Ok(false);
            }
        };

        order.swap(index, target);
        self.apply_order(form_id, &order).await?;
        Ok(true)
    }
}
