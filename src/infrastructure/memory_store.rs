//! 内存存储 - 基础设施层
//!
//! 同时实现 [`FormRepository`] 和 [`PageRepository`]。所有状态放在一把读写锁后面，
//! 一次写锁内完成的修改对读者来说是原子的。

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppResult, ReorderError, RepositoryError};
use crate::infrastructure::repository::{FormRepository, PageRepository};
use crate::models::{Form, FormFixture, FormId, NewPage, Page, PageId};

#[derive(Debug, Default)]
struct StoreState {
    forms: BTreeMap<FormId, Form>,
    pages: BTreeMap<PageId, Page>,
    next_page_id: u64,
    position_writes: usize,
}

impl StoreState {
    /// 表单内的页面 ID，按位置排序
    fn ordered_page_ids(&self, form_id: FormId) -> Vec<PageId> {
        let mut pages: Vec<&Page> = self
            .pages
            .values()
            .filter(|p| p.form_id == form_id)
            .collect();
        pages.sort_by_key(|p| (p.position, p.id));
        pages.into_iter().map(|p| p.id).collect()
    }

    /// 按给定顺序重写位置
    fn write_positions(&mut self, order: &[PageId]) {
        for (index, id) in order.iter().enumerate() {
            let position = (index + 1) as u32;
            if let Some(page) = self.pages.get_mut(id) {
                if page.position != position {
                    page.position = position;
                    self.position_writes += 1;
                }
            }
        }
    }

    /// 校验批量位置：页面集合与表单一致，位置是 1..=N 的排列
    fn check_batch(&self, form_id: FormId, positions: &[(PageId, u32)]) -> AppResult<()> {
        self.require_form(form_id)?;

        let known: BTreeSet<PageId> = self.ordered_page_ids(form_id).into_iter().collect();
        let requested: BTreeSet<PageId> = positions.iter().map(|(id, _)| *id).collect();
        if known != requested || requested.len() != positions.len() {
            return Err(ReorderError::InconsistentPageSet {
                form_id,
                missing: known.difference(&requested).copied().collect(),
                unexpected: requested.difference(&known).copied().collect(),
            }
            .into());
        }

        let count = positions.len();
        let slots: BTreeSet<u32> = positions.iter().map(|(_, position)| *position).collect();
        if slots.len() != count || slots.iter().any(|p| *p == 0 || *p as usize > count) {
            return Err(RepositoryError::InvalidPositions { form_id, count }.into());
        }

        Ok(())
    }

    /// 写入已校验的位置，返回写入前的位置
    fn write_batch(&mut self, positions: &[(PageId, u32)]) -> Vec<(PageId, u32)> {
        let mut previous = Vec::with_capacity(positions.len());
        for (page_id, position) in positions {
            if let Some(page) = self.pages.get_mut(page_id) {
                previous.push((*page_id, page.position));
                page.position = *position;
            }
        }
        self.position_writes += positions.len();
        previous
    }

    fn require_form(&self, id: FormId) -> Result<(), RepositoryError> {
        if self.forms.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::FormNotFound(id))
        }
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用加载好的表单数据初始化
    pub async fn seed(&self, fixtures: Vec<FormFixture>) -> AppResult<()> {
        let mut state = self.state.write().await;

        for fixture in fixtures {
            let form_id = fixture.form.id;
            if state.forms.contains_key(&form_id) {
                return Err(RepositoryError::DuplicateId(form_id.0).into());
            }
            state.forms.insert(form_id, fixture.form);

            for mut page in fixture.pages {
                if state.pages.contains_key(&page.id) {
                    return Err(RepositoryError::DuplicateId(page.id.0).into());
                }
                page.form_id = form_id;
                state.next_page_id = state.next_page_id.max(page.id.0);
                state.pages.insert(page.id, page);
            }

            let order = state.ordered_page_ids(form_id);
            state.write_positions(&order);
        }

        state.position_writes = 0;
        Ok(())
    }

    /// 累计写入位置的次数
    pub async fn position_writes(&self) -> usize {
        self.state.read().await.position_writes
    }
}

impl FormRepository for MemoryStore {
    async fn get_form(&self, id: FormId) -> AppResult<Form> {
        let state = self.state.read().await;
        state
            .forms
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::FormNotFound(id).into())
    }

    async fn list_forms(&self) -> AppResult<Vec<Form>> {
        let state = self.state.read().await;
        Ok(state.forms.values().cloned().collect())
    }

    async fn create_form(&self, form: Form) -> AppResult<Form> {
        let mut state = self.state.write().await;
        if state.forms.contains_key(&form.id) {
            return Err(RepositoryError::DuplicateId(form.id.0).into());
        }
        state.forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn update_form(&self, form: &Form) -> AppResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .forms
            .get_mut(&form.id)
            .ok_or(RepositoryError::FormNotFound(form.id))?;
        *slot = form.clone();
        Ok(())
    }

    async fn delete_form(&self, id: FormId) -> AppResult<()> {
        let mut state = self.state.write().await;
        state
            .forms
            .remove(&id)
            .ok_or(RepositoryError::FormNotFound(id))?;
        state.pages.retain(|_, p| p.form_id != id);
        Ok(())
    }
}

impl PageRepository for MemoryStore {
    async fn get_page(&self, id: PageId) -> AppResult<Page> {
        let state = self.state.read().await;
        state
            .pages
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::PageNotFound(id).into())
    }

    async fn list_pages(&self, form_id: FormId) -> AppResult<Vec<Page>> {
        let state = self.state.read().await;
        state.require_form(form_id)?;
        Ok(state
            .ordered_page_ids(form_id)
            .iter()
            .filter_map(|id| state.pages.get(id).cloned())
            .collect())
    }

    async fn create_page(&self, form_id: FormId, page: NewPage) -> AppResult<Page> {
        let mut state = self.state.write().await;
        state.require_form(form_id)?;

        state.next_page_id += 1;
        let id = PageId(state.next_page_id);
        let position = state.ordered_page_ids(form_id).len() as u32 + 1;

        let page = Page {
            id,
            form_id,
            position,
            question_text: page.question_text,
            hint_text: page.hint_text,
            is_optional: page.is_optional,
            answer_settings: page.answer_settings,
        };
        state.pages.insert(id, page.clone());
        state.position_writes += 1;

        Ok(page)
    }

    async fn update_page(&self, page: &Page) -> AppResult<()> {
        let mut state = self.state.write().await;
        let current = state
            .pages
            .get(&page.id)
            .ok_or(RepositoryError::PageNotFound(page.id))?;
        if current.form_id != page.form_id {
            return Err(RepositoryError::PageNotInForm {
                form_id: page.form_id,
                page_id: page.id,
            }
            .into());
        }
        let position_changed = current.position != page.position;

        let mut updated = page.clone();
        updated.position = current.position;
        state.pages.insert(page.id, updated);

        if position_changed {
            // 先移出，再插入到目标位置，其余页面依次让位
            let mut order = state.ordered_page_ids(page.form_id);
            order.retain(|id| *id != page.id);
            let index = (page.position.max(1) as usize - 1).min(order.len());
            order.insert(index, page.id);
            debug!("页面 {} 移动到位置 {}, 重排 {} 个页面", page.id, index + 1, order.len());
            state.write_positions(&order);
        }

        Ok(())
    }

    async fn delete_page(&self, id: PageId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let page = state
            .pages
            .remove(&id)
            .ok_or(RepositoryError::PageNotFound(id))?;
        let order = state.ordered_page_ids(page.form_id);
        state.write_positions(&order);
        Ok(())
    }

    async fn update_positions(&self, form_id: FormId, positions: &[(PageId, u32)]) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.check_batch(form_id, positions)?;

        state.write_batch(positions);
        debug!("表单 {} 批量写入 {} 个位置", form_id, positions.len());

        Ok(())
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
        let mut state = self.state.write().await;
        state.check_batch(form_id, positions)?;
        let mut form = state
            .forms
            .get(&form_id)
            .cloned()
            .ok_or(RepositoryError::FormNotFound(form_id))?;

        let writes_before = state.position_writes;
        let previous = state.write_batch(positions);

        if let Err(e) = after_write(&mut form) {
            state.write_batch(&previous);
            state.position_writes = writes_before;
            debug!("表单 {} 更新失败, 回滚 {} 个位置", form_id, previous.len());
            return Err(e);
        }

        state.forms.insert(form_id, form.clone());
        debug!("表单 {} 批量写入 {} 个位置并更新表单", form_id, positions.len());

        Ok(form)
    }
}
