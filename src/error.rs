use thiserror::Error;

use crate::models::form_state::{FormEvent, FormState, TaskSection};
use crate::models::{FormId, PageId};

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 存储层错误
    #[error("存储错误: {0}")]
    Repository(#[from] RepositoryError),
    /// 页面排序错误
    #[error("排序错误: {0}")]
    Reorder(#[from] ReorderError),
    /// 表单状态流转错误
    #[error("状态错误: {0}")]
    Transition(#[from] TransitionError),
    /// 答案设置错误
    #[error("答案设置错误: {0}")]
    AnswerSettings(#[from] AnswerSettingsError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 存储层错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// 表单不存在
    #[error("表单 {0} 不存在")]
    FormNotFound(FormId),
    /// 页面不存在
    #[error("页面 {0} 不存在")]
    PageNotFound(PageId),
    /// 页面不属于该表单
    #[error("页面 {page_id} 不属于表单 {form_id}")]
    PageNotInForm { form_id: FormId, page_id: PageId },
    /// 主键冲突
    #[error("记录 {0} 已存在")]
    DuplicateId(u64),
    /// 批量位置不是 1..=N 的排列
    #[error("表单 {form_id} 的位置必须是 1 到 {count} 且互不重复")]
    InvalidPositions { form_id: FormId, count: usize },
}

/// 页面排序错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    /// 排序结果与表单当前页面集合不一致
    ///
    /// 通常是页面在打开排序界面之后被新增或删除
    #[error(
        "表单 {form_id} 的页面集合已变化: 缺少 {missing:?}, 多出 {unexpected:?}"
    )]
    InconsistentPageSet {
        form_id: FormId,
        missing: Vec<PageId>,
        unexpected: Vec<PageId>,
    },
}

/// 表单状态流转错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// 当前状态不允许该事件
    #[error("状态 {from} 不允许事件 {event}")]
    NotPermitted { from: FormState, event: FormEvent },
    /// 尚未满足上线条件
    #[error("表单尚未准备好上线, 未完成: {missing:?}")]
    NotReadyForLive { missing: Vec<TaskSection> },
}

/// 答案设置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerSettingsError {
    /// 未知的答案类型
    #[error("未知的答案类型: {0}")]
    UnknownAnswerType(String),
    /// 该答案类型需要设置
    #[error("答案类型 {0} 缺少 answer_settings")]
    MissingSettings(&'static str),
    /// 设置结构不合法
    #[error("答案类型 {answer_type} 的设置无法解析: {message}")]
    Malformed {
        answer_type: &'static str,
        message: String,
    },
    /// 地址类型至少需要一种地址
    #[error("地址问题至少需要允许英国地址或国际地址之一")]
    NoAddressKind,
    /// 选项数量不足
    #[error("选项数量不足: 至少 {min} 个, 实际 {actual} 个")]
    TooFewOptions { min: usize, actual: usize },
    /// 选项为空
    #[error("第 {0} 个选项为空")]
    BlankOption(usize),
    /// 选项重复
    #[error("选项重复: {0}")]
    DuplicateOption(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 命令行参数无效
    #[error("无效的命令行参数: {0}")]
    InvalidArgument(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建命令行参数错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidArgument(message.into()))
    }

    /// 是否为页面集合不一致错误
    pub fn is_inconsistent_page_set(&self) -> bool {
        matches!(
            self,
            AppError::Reorder(ReorderError::InconsistentPageSet { .. })
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::Json(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
