use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AnswerSettingsError;
use crate::models::answer_settings::AnswerSettings;
use crate::models::ids::{FormId, PageId};

/// 表单中的一个页面（一道问题）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRecord", into = "PageRecord")]
pub struct Page {
    pub id: PageId,
    pub form_id: FormId,
    /// 从 1 开始的位置
    pub position: u32,
    pub question_text: String,
    pub hint_text: Option<String>,
    pub is_optional: bool,
    pub answer_settings: AnswerSettings,
}

/// 页面的原始存储结构
///
/// `answer_type` 与 `answer_settings` 分开存放，转换为 [`Page`] 时才解析设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: PageId,
    #[serde(default)]
    pub form_id: FormId,
    #[serde(default)]
    pub position: u32,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_text: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    pub answer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_settings: Option<JsonValue>,
}

impl TryFrom<PageRecord> for Page {
    type Error = AnswerSettingsError;

    fn try_from(record: PageRecord) -> Result<Self, Self::Error> {
        let answer_settings = AnswerSettings::resolve(&record.answer_type, record.answer_settings)?;
        Ok(Self {
            id: record.id,
            form_id: record.form_id,
            position: record.position,
            question_text: record.question_text,
            hint_text: record.hint_text,
            is_optional: record.is_optional,
            answer_settings,
        })
    }
}

impl From<Page> for PageRecord {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            form_id: page.form_id,
            position: page.position,
            question_text: page.question_text,
            hint_text: page.hint_text,
            is_optional: page.is_optional,
            answer_type: page.answer_settings.answer_type().to_string(),
            answer_settings: page.answer_settings.to_value(),
        }
    }
}

/// 新建页面所需的字段，ID 和位置由存储层分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub question_text: String,
    pub hint_text: Option<String>,
    pub is_optional: bool,
    pub answer_settings: AnswerSettings,
}

impl NewPage {
    pub fn new(question_text: impl Into<String>, answer_settings: AnswerSettings) -> Self {
        Self {
            question_text: question_text.into(),
            hint_text: None,
            is_optional: false,
            answer_settings,
        }
    }
}
