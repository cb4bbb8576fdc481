//! 页面排序
//!
//! 给定当前顺序的页面列表（部分页面带有目标位置），计算唯一的新顺序。
//! 纯函数，不访问存储。

use regex::Regex;
use std::collections::VecDeque;
use std::sync::OnceLock;

use crate::models::PageId;

/// 页面及其目标位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    pub page_id: PageId,
    /// 目标位置，`None` 表示保持相对顺序
    pub requested_position: Option<i64>,
}

impl PagePosition {
    pub fn new(page_id: PageId, requested_position: Option<i64>) -> Self {
        Self {
            page_id,
            requested_position,
        }
    }

    pub fn unpositioned(page_id: PageId) -> Self {
        Self::new(page_id, None)
    }
}

/// 计算新的页面顺序
///
/// 1. 带目标位置的页面按目标位置稳定排序，其余页面保持原顺序
/// 2. 依次填充位置 `p = 1..=N`：
///    - 排序队首的目标位置 `<= p` 时放入该页面
///    - 否则放入未指定位置的队首页面
///    - 未指定位置的页面用完后，按排序继续放入剩余页面
///
/// 目标位置重复时原列表中靠前的页面优先；超出 N 的目标位置排到最后。
///
/// # 参数
/// - `pages`: 当前顺序的页面
///
/// # 返回
/// 返回新的顺序，第 `i` 个元素位于位置 `i + 1`
pub fn resolve_page_order(pages: &[PagePosition]) -> Vec<PageId> {
    let mut positioned: Vec<(i64, PageId)> = pages
        .iter()
        .filter_map(|p| p.requested_position.map(|pos| (pos, p.page_id)))
        .collect();
    // sort_by_key 是稳定排序
    positioned.sort_by_key(|(pos, _)| *pos);

    let mut positioned: VecDeque<(i64, PageId)> = positioned.into();
    let mut unpositioned: VecDeque<PageId> = pages
        .iter()
        .filter(|p| p.requested_position.is_none())
        .map(|p| p.page_id)
        .collect();

    let mut order = Vec::with_capacity(pages.len());
    for p in 1..=pages.len() as i64 {
        let head_is_due = positioned
            .front()
            .is_some_and(|(requested, _)| *requested <= p);

        let next = if head_is_due {
            positioned.pop_front().map(|(_, id)| id)
        } else {
            unpositioned
                .pop_front()
                .or_else(|| positioned.pop_front().map(|(_, id)| id))
        };

        if let Some(id) = next {
            order.push(id);
        }
    }

    order
}

/// 把拖拽排序得到的 ID 列表转为目标位置 `1..=N`
pub fn positions_from_order(order: &[PageId]) -> Vec<PagePosition> {
    order
        .iter()
        .enumerate()
        .map(|(index, id)| PagePosition::new(*id, Some(index as i64 + 1)))
        .collect()
}

/// 解析用户提交的目标位置
///
/// 空白返回 `None`；否则取开头的整数部分（`"2.7"` 得到 2），
/// 开头没有数字的输入视为空白。超出范围的值取极值。
pub fn parse_requested_position(raw: &str) -> Option<i64> {
    static LEADING_INTEGER: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_INTEGER
        .get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("位置正则表达式无效"));

    let digits = re.captures(raw)?.get(1)?.as_str();
    let saturated = if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    };
    Some(digits.parse().unwrap_or(saturated))
}
