//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载配置目录下的所有表单到存储
//! 2. **命令分发**：把命令交给对应的流程或模型
//! 3. **结果输出**：记录结果，发布时写出表单快照

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{FormRepository, MemoryStore, PageRepository};
use crate::models::{load_all_fixtures, FormDocument, FormId};
use crate::orchestrator::command::Command;
use crate::utils::logging::{log_form_summary, log_forms_loaded, log_startup};
use crate::workflow::{ReorderCtx, ReorderFlow, ReorderOutcome, ReorderRequest};

/// 应用主结构
pub struct App {
    config: Config,
    store: MemoryStore,
    requests: AtomicUsize,
}

impl App {
    /// 初始化应用
    ///
    /// 表单目录不存在时以空存储启动
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let store = MemoryStore::new();
        if Path::new(&config.fixtures_folder).exists() {
            let fixtures = load_all_fixtures(&config.fixtures_folder).await?;
            let page_count = fixtures.iter().map(|f| f.pages.len()).sum();
            log_forms_loaded(fixtures.len(), page_count);
            store.seed(fixtures).await?;
        } else {
            warn!("⚠️ 表单目录不存在: {}", config.fixtures_folder);
        }

        Ok(Self::with_store(config, store))
    }

    /// 使用已有的存储创建应用
    pub fn with_store(config: Config, store: MemoryStore) -> Self {
        Self {
            config,
            store,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// 执行一条命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::List => {
                let forms = self.store.list_forms().await?;
                if forms.is_empty() {
                    warn!("⚠️ 没有任何表单");
                }
                for form in forms {
                    info!("#{} {} ({})", form.id, form.name, form.state);
                }
            }
            Command::Show(form_id) => self.show(form_id).await?,
            Command::Reorder { form_id, positions } => {
                self.reorder(form_id, ReorderRequest::Positions(positions))
                    .await?
            }
            Command::Order { form_id, order } => {
                self.reorder(form_id, ReorderRequest::Order(order)).await?
            }
            Command::Move {
                form_id,
                page_id,
                direction,
            } => {
                self.reorder(form_id, ReorderRequest::Move { page_id, direction })
                    .await?
            }
            Command::MakeLive(form_id) => {
                let path = self.make_live(form_id).await?;
                info!("📄 表单快照已保存至: {}", path.display());
            }
            Command::Archive(form_id) => {
                let mut form = self.store.get_form(form_id).await?;
                form.archive(Utc::now())?;
                self.store.update_form(&form).await?;
                info!("✓ 表单 {} 已归档", form_id);
            }
        }

        Ok(())
    }

    async fn show(&self, form_id: FormId) -> Result<()> {
        let form = self.store.get_form(form_id).await?;
        let pages = self.store.list_pages(form_id).await?;
        log_form_summary(&form, &pages);
        Ok(())
    }

    async fn reorder(&self, form_id: FormId, request: ReorderRequest) -> Result<()> {
        let index = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        let ctx = ReorderCtx::new(form_id, index);

        match ReorderFlow::new(&self.store).run(&ctx, request).await? {
            ReorderOutcome::Reordered { .. } => self.show(form_id).await?,
            ReorderOutcome::Unchanged => info!("{} 顺序未变化", ctx),
            ReorderOutcome::Conflict { message, pages } => {
                warn!("{} {}", ctx, message);
                let form = self.store.get_form(form_id).await?;
                log_form_summary(&form, &pages);
            }
        }

        Ok(())
    }

    /// 发布表单并写出快照
    ///
    /// # 返回
    /// 返回快照文件路径
    pub async fn make_live(&self, form_id: FormId) -> Result<PathBuf> {
        let mut form = self.store.get_form(form_id).await?;
        let pages = self.store.list_pages(form_id).await?;

        let document = form.make_live(&pages, Utc::now())?;
        self.store.update_form(&form).await?;

        self.write_document(&document).await
    }

    async fn write_document(&self, document: &FormDocument) -> Result<PathBuf> {
        let dir = PathBuf::from(&self.config.form_document_dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("无法创建目录: {}", dir.display()))?;

        let path = dir.join(format!("form-{}.json", document.form_id));
        let json = document.to_json_pretty()?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("无法写入文件: {}", path.display()))?;

        Ok(path)
    }
}
