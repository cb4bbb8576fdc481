//! 答案设置
//!
//! 每种答案类型各自的设置结构。原始的 `answer_settings` 只在这里解析一次，
//! 之后业务代码只接触强类型的 [`AnswerSettings`]。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use crate::error::AnswerSettingsError;

/// 单选/多选题最少选项数
pub const MIN_SELECTION_OPTIONS: usize = 2;

/// 按答案类型区分的设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSettings {
    Address(AddressSettings),
    Date(DateSettings),
    Email,
    Name(NameSettings),
    NationalInsuranceNumber,
    Number,
    OrganisationName,
    PhoneNumber,
    Selection(SelectionSettings),
    Text(TextSettings),
}

/// 地址题设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSettings {
    #[serde(default)]
    pub uk_address: bool,
    #[serde(default)]
    pub international_address: bool,
}

/// 日期题设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSettings {
    pub input_type: DateInputType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateInputType {
    DateOfBirth,
    OtherDate,
}

/// 姓名题设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSettings {
    pub input_type: NameInputType,
    #[serde(default)]
    pub title_needed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameInputType {
    FullName,
    FirstAndLastName,
    FirstMiddleAndLastName,
}

/// 选择题设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(default)]
    pub only_one_option: bool,
    pub selection_options: Vec<SelectionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub name: String,
}

/// 文本题设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSettings {
    pub input_type: TextInputType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputType {
    SingleLine,
    LongText,
}

impl AnswerSettings {
    /// 从答案类型和原始设置解析
    ///
    /// # 参数
    /// - `answer_type`: 答案类型，如 `selection`
    /// - `settings`: 原始设置，不需要设置的类型会忽略它
    ///
    /// # 返回
    /// 返回校验通过的设置
    pub fn resolve(
        answer_type: &str,
        settings: Option<JsonValue>,
    ) -> Result<Self, AnswerSettingsError> {
        let settings = settings.filter(|v| !v.is_null());

        let resolved = match answer_type {
            "address" => AnswerSettings::Address(parse_settings("address", settings)?),
            "date" => AnswerSettings::Date(parse_settings("date", settings)?),
            "email" => AnswerSettings::Email,
            "name" => AnswerSettings::Name(parse_settings("name", settings)?),
            "national_insurance_number" => AnswerSettings::NationalInsuranceNumber,
            "number" => AnswerSettings::Number,
            "organisation_name" => AnswerSettings::OrganisationName,
            "phone_number" => AnswerSettings::PhoneNumber,
            "selection" => AnswerSettings::Selection(parse_settings("selection", settings)?),
            "text" => AnswerSettings::Text(parse_settings("text", settings)?),
            other => return Err(AnswerSettingsError::UnknownAnswerType(other.to_string())),
        };

        resolved.validate()?;
        Ok(resolved)
    }

    /// 答案类型名称
    pub fn answer_type(&self) -> &'static str {
        match self {
            AnswerSettings::Address(_) => "address",
            AnswerSettings::Date(_) => "date",
            AnswerSettings::Email => "email",
            AnswerSettings::Name(_) => "name",
            AnswerSettings::NationalInsuranceNumber => "national_insurance_number",
            AnswerSettings::Number => "number",
            AnswerSettings::OrganisationName => "organisation_name",
            AnswerSettings::PhoneNumber => "phone_number",
            AnswerSettings::Selection(_) => "selection",
            AnswerSettings::Text(_) => "text",
        }
    }

    /// 转回原始设置，无设置的类型返回 `None`
    pub fn to_value(&self) -> Option<JsonValue> {
        match self {
            AnswerSettings::Address(s) => serde_json::to_value(s).ok(),
            AnswerSettings::Date(s) => serde_json::to_value(s).ok(),
            AnswerSettings::Name(s) => serde_json::to_value(s).ok(),
            AnswerSettings::Selection(s) => serde_json::to_value(s).ok(),
            AnswerSettings::Text(s) => serde_json::to_value(s).ok(),
            AnswerSettings::Email
            | AnswerSettings::NationalInsuranceNumber
            | AnswerSettings::Number
            | AnswerSettings::OrganisationName
            | AnswerSettings::PhoneNumber => None,
        }
    }

    fn validate(&self) -> Result<(), AnswerSettingsError> {
        match self {
            AnswerSettings::Address(s) if !s.uk_address && !s.international_address => {
                Err(AnswerSettingsError::NoAddressKind)
            }
            AnswerSettings::Selection(s) => validate_selection(s),
            _ => Ok(()),
        }
    }
}

fn parse_settings<T: DeserializeOwned>(
    answer_type: &'static str,
    settings: Option<JsonValue>,
) -> Result<T, AnswerSettingsError> {
    let value = settings.ok_or(AnswerSettingsError::MissingSettings(answer_type))?;
    serde_json::from_value(value).map_err(|e| AnswerSettingsError::Malformed {
        answer_type,
        message: e.to_string(),
    })
}

fn validate_selection(settings: &SelectionSettings) -> Result<(), AnswerSettingsError> {
    let options = &settings.selection_options;
    if options.len() < MIN_SELECTION_OPTIONS {
        return Err(AnswerSettingsError::TooFewOptions {
            min: MIN_SELECTION_OPTIONS,
            actual: options.len(),
        });
    }

    let mut seen = HashSet::new();
    for (index, option) in options.iter().enumerate() {
        let name = option.name.trim();
        if name.is_empty() {
            return Err(AnswerSettingsError::BlankOption(index + 1));
        }
        if !seen.insert(name) {
            return Err(AnswerSettingsError::DuplicateOption(name.to_string()));
        }
    }

    Ok(())
}
