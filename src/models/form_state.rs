//! 表单生命周期
//!
//! 状态、事件与纯函数 [`transition`]。守卫条件以数据形式传入，
//! 状态流转本身不读取任何表单字段。
//!
//! ```text
//! Draft ──make_live──▶ Live ──create_draft──▶ LiveWithDraft
//!   │                   │  ▲                       │
//! delete             archive└──────make_live───────┤
//!   ▼                   ▼                       archive
//! Deleted           Archived ──create_draft──▶ ArchivedWithDraft
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransitionError;

/// 表单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    #[default]
    Draft,
    Deleted,
    Live,
    LiveWithDraft,
    Archived,
    ArchivedWithDraft,
}

/// 状态事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormEvent {
    DeleteForm,
    MakeLive,
    CreateDraftFromLiveForm,
    CreateDraftFromArchivedForm,
    ArchiveLiveForm,
}

/// 上线前必须完成的任务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskSection {
    /// 至少一个页面
    Pages,
    /// 问题部分已标记完成
    QuestionSection,
    /// 声明部分已标记完成
    DeclarationSection,
    /// 提交后说明
    WhatHappensNext,
    /// 隐私政策链接
    PrivacyPolicy,
    /// 至少一种联系方式
    ContactDetails,
}

/// 上线检查结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveReadiness {
    pub missing: Vec<TaskSection>,
}

impl LiveReadiness {
    /// 全部完成
    pub fn ready() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 状态流转的守卫条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionGuards {
    pub live_readiness: LiveReadiness,
}

impl TransitionGuards {
    pub fn new(live_readiness: LiveReadiness) -> Self {
        Self { live_readiness }
    }
}

impl FormState {
    pub fn as_str(self) -> &'static str {
        match self {
            FormState::Draft => "draft",
            FormState::Deleted => "deleted",
            FormState::Live => "live",
            FormState::LiveWithDraft => "live_with_draft",
            FormState::Archived => "archived",
            FormState::ArchivedWithDraft => "archived_with_draft",
        }
    }

    /// 是否存在已发布的版本
    pub fn has_live_version(self) -> bool {
        matches!(self, FormState::Live | FormState::LiveWithDraft)
    }

    /// 是否有未发布的修改
    pub fn has_draft(self) -> bool {
        matches!(
            self,
            FormState::Draft | FormState::LiveWithDraft | FormState::ArchivedWithDraft
        )
    }
}

impl FormEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            FormEvent::DeleteForm => "delete_form",
            FormEvent::MakeLive => "make_live",
            FormEvent::CreateDraftFromLiveForm => "create_draft_from_live_form",
            FormEvent::CreateDraftFromArchivedForm => "create_draft_from_archived_form",
            FormEvent::ArchiveLiveForm => "archive_live_form",
        }
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FormEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 计算事件作用后的状态
///
/// # 参数
/// - `state`: 当前状态
/// - `event`: 事件
/// - `guards`: 守卫条件
///
/// # 返回
/// 返回新状态；不允许的事件或守卫未通过时返回错误
pub fn transition(
    state: FormState,
    event: FormEvent,
    guards: &TransitionGuards,
) -> Result<FormState, TransitionError> {
    use FormEvent::*;
    use FormState::*;

    let next = match (event, state) {
        (DeleteForm, Draft) => Deleted,
        (MakeLive, Draft | LiveWithDraft | Archived | ArchivedWithDraft) => {
            if !guards.live_readiness.is_ready() {
                return Err(TransitionError::NotReadyForLive {
                    missing: guards.live_readiness.missing.clone(),
                });
            }
            Live
        }
        (CreateDraftFromLiveForm, Live) => LiveWithDraft,
        (CreateDraftFromArchivedForm, Archived) => ArchivedWithDraft,
        (ArchiveLiveForm, Live) => Archived,
        (ArchiveLiveForm, LiveWithDraft) => ArchivedWithDraft,
        (event, from) => return Err(TransitionError::NotPermitted { from, event }),
    };

    Ok(next)
}
