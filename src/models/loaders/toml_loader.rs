use crate::models::form::Form;
use crate::models::page::Page;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 一个表单及其页面，对应一个 TOML 文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFixture {
    pub form: Form,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl FormFixture {
    /// 补全页面的 `form_id`，并把位置整理为从 1 开始的连续值
    ///
    /// 有页面未填写位置时按文件中的顺序编号
    fn normalize(mut self) -> Self {
        if self.pages.iter().all(|p| p.position > 0) {
            self.pages.sort_by_key(|p| p.position);
        }
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.form_id = self.form.id;
            page.position = (index + 1) as u32;
        }
        self
    }
}

/// 解析 TOML 文本
pub fn parse_form_fixture(content: &str) -> Result<FormFixture> {
    let fixture: FormFixture = toml::from_str(content).context("无法解析表单TOML")?;
    Ok(fixture.normalize())
}

/// 从 TOML 文件加载单个表单
pub async fn load_form_fixture(toml_file_path: &Path) -> Result<FormFixture> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    parse_form_fixture(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))
}

/// 从文件夹中加载所有表单
///
/// 无法解析的文件只记录警告并跳过
pub async fn load_all_fixtures(folder_path: &str) -> Result<Vec<FormFixture>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    // read_dir 的顺序不固定
    paths.sort();

    let mut fixtures = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_form_fixture(&path).await {
            Ok(fixture) => {
                tracing::info!(
                    "成功加载表单 {} ({} 个页面)",
                    fixture.form.id,
                    fixture.pages.len()
                );
                fixtures.push(fixture);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer_settings::AnswerSettings;
    use crate::models::form_state::FormState;
    use crate::models::ids::{FormId, PageId};

    const FIXTURE: &str = r#"
[form]
id = 7
name = "申请钓鱼许可证"
state = "live"
privacy_policy_url = "https://example.gov.uk/privacy"

[[pages]]
id = 702
position = 2
question_text = "你想在哪里钓鱼？"
answer_type = "selection"

[pages.answer_settings]
only_one_option = true
selection_options = [{ name = "河流" }, { name = "湖泊" }]

[[pages]]
id = 701
position = 1
question_text = "你的邮箱是？"
answer_type = "email"
"#;

    #[test]
    fn test_parse_form_fixture() {
        let fixture = parse_form_fixture(FIXTURE).unwrap();

        assert_eq!(fixture.form.id, FormId(7));
        assert_eq!(fixture.form.state, FormState::Live);
        let ids: Vec<PageId> = fixture.pages.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PageId(701), PageId(702)]);
        assert!(fixture.pages.iter().all(|p| p.form_id == FormId(7)));
        assert!(matches!(
            fixture.pages[1].answer_settings,
            AnswerSettings::Selection(_)
        ));
    }

    #[test]
    fn test_missing_positions_follow_file_order() {
        let content = r#"
[form]
id = 1
name = "无位置"

[[pages]]
id = 12
question_text = "第一题"
answer_type = "number"

[[pages]]
id = 11
position = 1
question_text = "第二题"
answer_type = "number"
"#;
        let fixture = parse_form_fixture(content).unwrap();
        let order: Vec<(u64, u32)> = fixture.pages.iter().map(|p| (p.id.0, p.position)).collect();
        assert_eq!(order, vec![(12, 1), (11, 2)]);
    }

    #[test]
    fn test_invalid_answer_settings_fail_to_parse() {
        let content = r#"
[form]
id = 1
name = "坏数据"

[[pages]]
id = 1
question_text = "选一个"
answer_type = "selection"

[pages.answer_settings]
selection_options = [{ name = "唯一" }]
"#;
        assert!(parse_form_fixture(content).is_err());
    }

    #[tokio::test]
    async fn test_load_all_fixtures_skips_broken_files() {
        let dir = std::env::temp_dir().join(format!("forms-admin-fixtures-{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("a.toml"), FIXTURE).await.unwrap();
        fs::write(dir.join("b.toml"), "not = [valid").await.unwrap();
        fs::write(dir.join("c.txt"), "ignored").await.unwrap();

        let fixtures = load_all_fixtures(dir.to_str().unwrap()).await.unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].form.id, FormId(7));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_all_fixtures_missing_folder() {
        assert!(load_all_fixtures("/definitely/not/here").await.is_err());
    }
}
