use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppResult, TransitionError};
use crate::models::form_document::FormDocument;
use crate::models::form_state::{
    transition, FormEvent, FormState, LiveReadiness, TaskSection, TransitionGuards,
};
use crate::models::ids::FormId;
use crate::models::page::Page;

/// 表单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub name: String,
    #[serde(default)]
    pub state: FormState,
    #[serde(default)]
    pub question_section_completed: bool,
    #[serde(default)]
    pub declaration_section_completed: bool,
    #[serde(default)]
    pub what_happens_next_markdown: Option<String>,
    #[serde(default)]
    pub privacy_policy_url: Option<String>,
    #[serde(default)]
    pub support_email: Option<String>,
    #[serde(default)]
    pub support_phone: Option<String>,
    #[serde(default)]
    pub support_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub first_made_live_at: Option<DateTime<Utc>>,
}

impl Form {
    /// 创建草稿状态的新表单
    pub fn new(id: FormId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            state: FormState::Draft,
            question_section_completed: false,
            declaration_section_completed: false,
            what_happens_next_markdown: None,
            privacy_policy_url: None,
            support_email: None,
            support_phone: None,
            support_url: None,
            created_at: now,
            updated_at: now,
            first_made_live_at: None,
        }
    }

    /// 检查上线前的各项任务
    ///
    /// # 参数
    /// - `page_count`: 表单当前的页面数量
    pub fn live_readiness(&self, page_count: usize) -> LiveReadiness {
        let mut missing = Vec::new();

        if page_count == 0 {
            missing.push(TaskSection::Pages);
        }
        if !self.question_section_completed {
            missing.push(TaskSection::QuestionSection);
        }
        if !self.declaration_section_completed {
            missing.push(TaskSection::DeclarationSection);
        }
        if is_blank(&self.what_happens_next_markdown) {
            missing.push(TaskSection::WhatHappensNext);
        }
        if is_blank(&self.privacy_policy_url) {
            missing.push(TaskSection::PrivacyPolicy);
        }
        if is_blank(&self.support_email)
            && is_blank(&self.support_phone)
            && is_blank(&self.support_url)
        {
            missing.push(TaskSection::ContactDetails);
        }

        LiveReadiness { missing }
    }

    /// 对表单应用一个事件
    pub fn fire(&mut self, event: FormEvent, guards: &TransitionGuards) -> AppResult<FormState> {
        let from = self.state;
        self.state = transition(from, event, guards)?;
        debug!("表单 {} 状态: {} --{}--> {}", self.id, from, event, self.state);
        Ok(self.state)
    }

    /// 问题被修改后的统一处理
    ///
    /// 问题部分需要重新确认；已发布或已归档的表单转为带草稿的状态
    pub fn save_question_changes(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.save_draft(now)?;
        self.question_section_completed = false;
        Ok(())
    }

    /// 保存草稿
    ///
    /// 已删除的表单不能再修改
    pub fn save_draft(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        let guards = TransitionGuards::default();
        match self.state {
            FormState::Live => {
                self.fire(FormEvent::CreateDraftFromLiveForm, &guards)?;
            }
            FormState::Archived => {
                self.fire(FormEvent::CreateDraftFromArchivedForm, &guards)?;
            }
            FormState::Deleted => {
                return Err(TransitionError::NotPermitted {
                    from: self.state,
                    event: FormEvent::CreateDraftFromLiveForm,
                }
                .into());
            }
            FormState::Draft | FormState::LiveWithDraft | FormState::ArchivedWithDraft => {}
        }
        self.updated_at = now;
        Ok(())
    }

    /// 发布表单
    ///
    /// # 参数
    /// - `pages`: 表单的全部页面
    /// - `now`: 发布时间
    ///
    /// # 返回
    /// 返回发布后的表单快照
    pub fn make_live(&mut self, pages: &[Page], now: DateTime<Utc>) -> AppResult<FormDocument> {
        let guards = TransitionGuards::new(self.live_readiness(pages.len()));
        self.fire(FormEvent::MakeLive, &guards)?;

        if self.first_made_live_at.is_none() {
            self.first_made_live_at = Some(now);
        }
        self.updated_at = now;

        info!("✓ 表单 {} 已上线 ({} 个页面)", self.id, pages.len());
        Ok(FormDocument::build(self, pages, now))
    }

    /// 归档已上线的表单
    pub fn archive(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.fire(FormEvent::ArchiveLiveForm, &TransitionGuards::default())?;
        self.updated_at = now;
        Ok(())
    }

    /// 删除草稿表单
    pub fn delete(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.fire(FormEvent::DeleteForm, &TransitionGuards::default())?;
        self.updated_at = now;
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
