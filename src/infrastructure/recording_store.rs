//! 记录写入调用的存储包装，测试用
//!
//! 读操作直接转发；写操作按调用顺序记录名称。`after_write` 回调被调用时记为
//! `after_write`，用来检查表单更新的次数和时机。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::AppResult;
use crate::infrastructure::memory_store::MemoryStore;
use crate::infrastructure::repository::{FormRepository, PageRepository};
use crate::models::{Form, FormId, NewPage, Page, PageId};

pub struct RecordingStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<&'static str>>,
    hook_calls: AtomicUsize,
    delete_before_write: Mutex<Option<PageId>>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            hook_calls: AtomicUsize::new(0),
            delete_before_write: Mutex::new(None),
        }
    }

    /// 下一次批量写入之前先删除指定页面，模拟并发的删除请求
    pub fn deleting_before_write(inner: MemoryStore, page_id: PageId) -> Self {
        let store = Self::new(inner);
        *store.delete_before_write.lock().unwrap() = Some(page_id);
        store
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn hook_calls(&self) -> usize {
        self.hook_calls.load(Ordering::SeqCst)
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

impl FormRepository for RecordingStore {
    async fn get_form(&self, id: FormId) -> AppResult<Form> {
        self.inner.get_form(id).await
    }

    async fn list_forms(&self) -> AppResult<Vec<Form>> {
        self.inner.list_forms().await
    }

    async fn create_form(&self, form: Form) -> AppResult<Form> {
        self.record("create_form");
        self.inner.create_form(form).await
    }

    async fn update_form(&self, form: &Form) -> AppResult<()> {
        self.record("update_form");
        self.inner.update_form(form).await
    }

    async fn delete_form(&self, id: FormId) -> AppResult<()> {
        self.record("delete_form");
        self.inner.delete_form(id).await
    }
}

impl PageRepository for RecordingStore {
    async fn get_page(&self, id: PageId) -> AppResult<Page> {
        self.inner.get_page(id).await
    }

    async fn list_pages(&self, form_id: FormId) -> AppResult<Vec<Page>> {
        self.inner.list_pages(form_id).await
    }

    async fn create_page(&self, form_id: FormId, page: NewPage) -> AppResult<Page> {
        self.record("create_page");
        self.inner.create_page(form_id, page).await
    }

    async fn update_page(&self, page: &Page) -> AppResult<()> {
        self.record("update_page");
        self.inner.update_page(page).await
    }

    async fn delete_page(&self, id: PageId) -> AppResult<()> {
        self.record("delete_page");
        self.inner.delete_page(id).await
    }

    async fn update_positions(&self, form_id: FormId, positions: &[(PageId, u32)]) -> AppResult<()> {
        self.record("update_positions");
        self.inner.update_positions(form_id, positions).await
    }

    async fn reorder_pages<F>(
        &self,
        form_id: FormId,
        positions: &[(PageId, u32)],
        after_write: F,
    ) -> AppResult<Form>
    where
        F: FnOnce(&mut Form) -> AppResult<()>,
    {
        let pending = self.delete_before_write.lock().unwrap().take();
        if let Some(page_id) = pending {
            self.inner.delete_page(page_id).await?;
        }

        self.record("reorder_pages");
        self.inner
            .reorder_pages(form_id, positions, |form| {
                self.hook_calls.fetch_add(1, Ordering::SeqCst);
                self.record("after_write");
                after_write(form)
            })
            .await
    }
}
