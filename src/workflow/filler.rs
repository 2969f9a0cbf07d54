//! 填写流程 - 流程层
//!
//! 核心职责：按实际跳转顺序遍历可达页面，为每个题目取值、设置并校验
//!
//! 流程顺序：
//! 1. 从第一页开始，按文档顺序处理每个可填写题目
//! 2. 向 `FillStrategy` 取值（或保留已有答案），设置后立即校验
//! 3. 根据当前答案计算下一页，直到提交
//!
//! 所有题目的错误都会被收集，而不是在第一个错误处停止

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ElementError, ElementErrorKind, FillError};
use crate::models::element::Element;
use crate::models::page::{Page, PageTarget};
use crate::models::value::Value;

/// 为题目提供答案的策略
///
/// 闭包 `FnMut(&Element, usize, usize) -> Value` 自动实现该 trait
pub trait FillStrategy {
    /// 返回题目的答案
    ///
    /// # 参数
    /// - `element`: 当前题目
    /// - `page_index`: 页面索引
    /// - `element_index`: 题目在页面中的索引
    fn value_for(&mut self, element: &Element, page_index: usize, element_index: usize) -> Value;
}

impl<F> FillStrategy for F
where
    F: FnMut(&Element, usize, usize) -> Value,
{
    fn value_for(&mut self, element: &Element, page_index: usize, element_index: usize) -> Value {
        self(element, page_index, element_index)
    }
}

/// 所有题目都使用 `Value::Default`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl FillStrategy for DefaultStrategy {
    fn value_for(&mut self, _element: &Element, _page_index: usize, _element_index: usize) -> Value {
        Value::Default
    }
}

/// 填写选项
#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions {
    /// 非必填题目的 `Value::Default` 也生成默认值
    pub fill_optional: bool,
}

fn element_error(
    page_index: usize,
    element_index: usize,
    element: &Element,
    kind: ElementErrorKind,
) -> ElementError {
    ElementError {
        page_index,
        element_index,
        element_id: element.id,
        name: element.name.clone().unwrap_or_default(),
        kind,
    }
}

/// 遍历可达页面并填写
///
/// `strategy` 为 `None` 时只校验已有答案（`Form::validate`）。
/// 成功时返回经过的页面索引。
pub fn fill_pages<S>(
    pages: &mut [Page],
    mut strategy: Option<&mut S>,
    options: FillOptions,
) -> Result<Vec<usize>, FillError>
where
    S: FillStrategy + ?Sized,
{
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut errors = Vec::new();
    let mut current = 0;

    while let Some(page) = pages.get_mut(current) {
        if !visited.insert(current) {
            return Err(FillError::InfiniteLoop {
                page: current,
                errors,
            });
        }
        path.push(current);

        for (element_index, element) in page.elements.iter_mut().enumerate() {
            if !element.is_input() {
                continue;
            }

            if let Some(strategy) = strategy.as_deref_mut() {
                let value = strategy.value_for(element, current, element_index);
                if let Err(kind) = element.fill_value(value, options.fill_optional) {
                    errors.push(element_error(current, element_index, element, kind));
                    continue;
                }
            }

            if let Err(kind) = element.validate() {
                errors.push(element_error(current, element_index, element, kind));
            }
        }

        match page.next_target() {
            PageTarget::Submit => break,
            PageTarget::Page(next) => {
                debug!("第 {} 页 → 第 {} 页", current + 1, next + 1);
                current = next;
            }
        }
    }

    if errors.is_empty() {
        Ok(path)
    } else {
        Err(FillError::Invalid(errors))
    }
}

/// 不修改答案，仅根据当前答案计算可达页面
pub fn reachable_pages(pages: &[Page]) -> Vec<usize> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut current = 0;

    while let Some(page) = pages.get(current) {
        if !visited.insert(current) {
            break;
        }
        path.push(current);
        match page.next_target() {
            PageTarget::Submit => break,
            PageTarget::Page(next) => current = next,
        }
    }
    path
}
