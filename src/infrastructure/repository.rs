//! 存储接口 - 基础设施层
//!
//! 只描述"能读写哪些记录"，返回普通数据结构，不包含业务流程

use crate::error::AppResult;
use crate::models::{Form, FormId, NewPage, Page, PageId};

/// 表单存储
#[allow(async_fn_in_trait)]
pub trait FormRepository {
    async fn get_form(&self, id: FormId) -> AppResult<Form>;

    async fn list_forms(&self) -> AppResult<Vec<Form>>;

    /// 新建表单，ID 已存在时报错
    async fn create_form(&self, form: Form) -> AppResult<Form>;

    async fn update_form(&self, form: &Form) -> AppResult<()>;

    /// 删除表单及其全部页面
    async fn delete_form(&self, id: FormId) -> AppResult<()>;
}

/// 页面存储
///
/// 单条写入会维护同一表单内位置的连续性
#[allow(async_fn_in_trait)]
pub trait PageRepository {
    async fn get_page(&self, id: PageId) -> AppResult<Page>;

    /// 按位置升序列出表单的所有页面
    async fn list_pages(&self, form_id: FormId) -> AppResult<Vec<Page>>;

    /// 在表单末尾新建页面
    async fn create_page(&self, form_id: FormId, page: NewPage) -> AppResult<Page>;

    /// 更新页面；位置变化时其余页面依次让位
    async fn update_page(&self, page: &Page) -> AppResult<()>;

    /// 删除页面，后面的页面依次前移
    async fn delete_page(&self, id: PageId) -> AppResult<()>;

    /// 批量写入位置
    ///
    /// 在一次写锁内完成，不触发逐条的让位处理。`positions` 必须恰好覆盖表单的
    /// 全部页面（否则返回 [`ReorderError::InconsistentPageSet`]），且位置是
    /// `1..=N` 的排列；任一校验失败都不做任何写入
    ///
    /// [`ReorderError::InconsistentPageSet`]: crate::error::ReorderError::InconsistentPageSet
    async fn update_positions(&self, form_id: FormId, positions: &[(PageId, u32)]) -> AppResult<()>;

    /// 批量写入位置并更新表单
    ///
    /// 校验同 [`PageRepository::update_positions`]。全部位置写入后对表单调用
    /// `after_write` 恰好一次，然后保存表单；整个过程持有同一把写锁。
    /// `after_write` 返回错误时位置回滚，表单不变
    ///
    /// # 返回
    /// 返回保存后的表单
    async fn reorder_pages<F>(
        &self,
        form_id: FormId,
        positions: &[(PageId, u32)],
        after_write: F,
    ) -> AppResult<Form>
    where
        F: FnOnce(&mut Form) -> AppResult<()>;
}
