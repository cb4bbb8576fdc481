//! 命令行参数解析

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AppError, AppResult};
use crate::models::{FormId, PageId};
use crate::services::MoveDirection;
use crate::workflow::RawPagePosition;

pub const USAGE: &str = "\
用法:
  forms-admin list
  forms-admin show <表单ID>
  forms-admin reorder <表单ID> <页面ID>=<位置> ...
  forms-admin order <表单ID> <页面ID>,<页面ID>,...
  forms-admin move <表单ID> <页面ID> up|down
  forms-admin make-live <表单ID>
  forms-admin archive <表单ID>";

/// 命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(FormId),
    Reorder {
        form_id: FormId,
        positions: Vec<RawPagePosition>,
    },
    Order {
        form_id: FormId,
        order: Vec<PageId>,
    },
    Move {
        form_id: FormId,
        page_id: PageId,
        direction: MoveDirection,
    },
    MakeLive(FormId),
    Archive(FormId),
}

impl Command {
    /// 解析命令行参数（不含程序名）
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| AppError::invalid_argument("缺少命令"))?;

        let command = match (name.as_str(), rest) {
            ("list", []) => Command::List,
            ("show", [form]) => Command::Show(parse_form_id(form)?),
            ("reorder", [form, pairs @ ..]) if !pairs.is_empty() => Command::Reorder {
                form_id: parse_form_id(form)?,
                positions: pairs
                    .iter()
                    .map(|pair| parse_position_pair(pair))
                    .collect::<AppResult<_>>()?,
            },
            ("order", [form, ids]) => Command::Order {
                form_id: parse_form_id(form)?,
                order: ids
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(parse_page_id)
                    .collect::<AppResult<_>>()?,
            },
            ("move", [form, page, direction]) => Command::Move {
                form_id: parse_form_id(form)?,
                page_id: parse_page_id(page)?,
                direction: MoveDirection::parse(direction).ok_or_else(|| {
                    AppError::invalid_argument(format!("无效的方向: {}", direction))
                })?,
            },
            ("make-live", [form]) => Command::MakeLive(parse_form_id(form)?),
            ("archive", [form]) => Command::Archive(parse_form_id(form)?),
            _ => {
                return Err(AppError::invalid_argument(format!(
                    "无法识别的命令: {}",
                    args.join(" ")
                )))
            }
        };

        Ok(command)
    }
}

fn parse_id(kind: &str, raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_argument(format!("无效的{}ID: {}", kind, raw)))
}

fn parse_form_id(raw: &str) -> AppResult<FormId> {
    parse_id("表单", raw).map(FormId)
}

fn parse_page_id(raw: &str) -> AppResult<PageId> {
    parse_id("页面", raw).map(PageId)
}

fn position_pair_regex() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| Regex::new(r"^\s*(\d+)\s*=(.*)$").expect("位置参数正则表达式无效"))
}

/// 解析 `页面ID=位置`，位置可以为空
fn parse_position_pair(raw: &str) -> AppResult<RawPagePosition> {
    let caps = position_pair_regex()
        .captures(raw)
        .ok_or_else(|| AppError::invalid_argument(format!("无效的位置参数: {}", raw)))?;

    Ok(RawPagePosition {
        page_id: parse_page_id(&caps[1])?,
        new_position: caps[2].to_string(),
    })
}
