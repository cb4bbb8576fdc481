//! 表单快照
//!
//! 发布时生成的只读副本，包含表单信息和按位置排好序的页面，用于渲染与预览

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::form::Form;
use crate::models::ids::{FormId, PageId};
use crate::models::page::Page;

/// 表单快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDocument {
    pub form_id: FormId,
    pub name: String,
    pub made_live_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_happens_next_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
    pub support: SupportDetails,
    pub start_page: Option<PageId>,
    pub pages: Vec<DocumentPage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 快照中的页面，带有下一页的链接
///
/// 位置按快照内顺序重新编号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPage {
    pub next_page: Option<PageId>,
    #[serde(flatten)]
    pub page: Page,
}

impl FormDocument {
    /// 根据表单和页面生成快照
    ///
    /// 页面按 `position` 排序后依次链接
    pub fn build(form: &Form, pages: &[Page], made_live_at: DateTime<Utc>) -> Self {
        let mut ordered: Vec<&Page> = pages.iter().collect();
        ordered.sort_by_key(|p| p.position);

        let pages: Vec<DocumentPage> = ordered
            .iter()
            .enumerate()
            .map(|(index, page)| DocumentPage {
                next_page: ordered.get(index + 1).map(|next| next.id),
                page: Page {
                    position: (index + 1) as u32,
                    ..(*page).clone()
                },
            })
            .collect();

        Self {
            form_id: form.id,
            name: form.name.clone(),
            made_live_at,
            what_happens_next_markdown: form.what_happens_next_markdown.clone(),
            privacy_policy_url: form.privacy_policy_url.clone(),
            support: SupportDetails {
                email: form.support_email.clone(),
                phone: form.support_phone.clone(),
                url: form.support_url.clone(),
            },
            start_page: pages.first().map(|p| p.page.id),
            pages,
        }
    }

    /// 序列化为格式化的 JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
