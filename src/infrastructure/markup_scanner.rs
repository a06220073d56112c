//! 标记扫描器 - 基础设施层
//!
//! 按深度匹配开闭标签，建立一棵只记录元素边界的轻量树。
//! 只回答"某个元素从哪里开始、到哪里结束、父子关系如何"，
//! 不解码实体，不理解文本内容。
//!
//! 处理的情况：
//! - 注释 `<!-- -->`、`<!DOCTYPE>`、`<?xml ?>` 整段跳过
//! - 自闭合标签和 void 元素（`br`、`img` 等）没有闭标签
//! - 属性值中的 `>`（引号内）
//! - `script` / `style` / `textarea` 内部不扫描标签
//! - 多余的闭标签被忽略；匹配到更外层的闭标签时，中间未闭合的元素保持未闭合

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^<(/?)([A-Za-z][A-Za-z0-9:_-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
            .expect("标签正则是常量")
    })
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("属性正则是常量")
    })
}

/// 一个元素的边界
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// 小写标签名
    pub name: String,
    /// 开标签的字节范围
    pub open: Range<usize>,
    /// 闭标签的字节范围；void / 自闭合元素为空范围，未闭合为 `None`
    pub close: Option<Range<usize>>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Element {
    pub fn is_closed(&self) -> bool {
        self.close.is_some()
    }

    /// 整个元素（开标签到闭标签）的范围
    pub fn span(&self) -> Option<Range<usize>> {
        self.close.as_ref().map(|c| self.open.start..c.end)
    }

    /// 开闭标签之间内容的范围
    pub fn inner(&self) -> Option<Range<usize>> {
        self.close.as_ref().map(|c| self.open.end..c.start)
    }
}

/// 元素树，元素按开标签出现顺序存放
#[derive(Debug)]
pub struct MarkupTree<'a> {
    source: &'a str,
    elements: Vec<Element>,
}

impl<'a> MarkupTree<'a> {
    /// 扫描整段文本
    pub fn parse(source: &'a str) -> Self {
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut pos = 0;

        while let Some(offset) = source[pos..].find('<') {
            let start = pos + offset;
            let rest = &source[start..];

            if let Some(body) = rest.strip_prefix("<!--") {
                pos = match body.find("-->") {
                    Some(end) => start + 4 + end + 3,
                    None => source.len(),
                };
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                pos = match rest.find('>') {
                    Some(end) => start + end + 1,
                    None => source.len(),
                };
                continue;
            }

            let Some(caps) = tag_pattern().captures(rest) else {
                // 单独的 '<'，当作普通文本
                pos = start + 1;
                continue;
            };

            let end = start + caps[0].len();
            let is_closing = !caps[1].is_empty();
            let name = caps[2].to_ascii_lowercase();
            let self_closing = !caps[4].is_empty();

            if is_closing {
                if let Some(depth) = stack.iter().rposition(|&i| elements[i].name == name) {
                    let index = stack[depth];
                    elements[index].close = Some(start..end);
                    stack.truncate(depth);
                }
                pos = end;
                continue;
            }

            let parent = stack.last().copied();
            let index = elements.len();
            let is_void = self_closing || VOID_ELEMENTS.contains(&name.as_str());
            let is_raw_text = RAW_TEXT_ELEMENTS.contains(&name.as_str());
            let close_needle = format!("</{}", name);

            elements.push(Element {
                name,
                open: start..end,
                close: None,
                parent,
                children: Vec::new(),
            });
            if let Some(p) = parent {
                elements[p].children.push(index);
            }

            if is_void {
                elements[index].close = Some(end..end);
                pos = end;
            } else if is_raw_text {
                // 只做 ASCII 小写，字节偏移不变
                let lowered = source[end..].to_ascii_lowercase();
                match lowered.find(&close_needle) {
                    Some(off) => {
                        let close_start = end + off;
                        let close_end = source[close_start..]
                            .find('>')
                            .map(|e| close_start + e + 1)
                            .unwrap_or(source.len());
                        elements[index].close = Some(close_start..close_end);
                        pos = close_end;
                    }
                    None => pos = source.len(),
                }
            } else {
                stack.push(index);
                pos = end;
            }
        }

        Self { source, elements }
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// 顶层元素（没有父元素）的索引
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent.is_none())
            .map(|(i, _)| i)
    }

    /// 元素开标签的原文
    pub fn open_tag(&self, index: usize) -> &'a str {
        &self.source[self.elements[index].open.clone()]
    }

    /// 读取开标签上的属性值（不解码实体）
    pub fn attribute(&self, index: usize, name: &str) -> Option<&'a str> {
        let tag = self.open_tag(index);
        attribute_pattern().captures_iter(tag).find_map(|caps| {
            if !caps[1].eq_ignore_ascii_case(name) {
                return None;
            }
            caps.get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str())
        })
    }

    /// `class` 属性中是否包含指定类名
    pub fn has_class(&self, index: usize, class: &str) -> bool {
        self.attribute(index, "class")
            .map(|value| value.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// 文档顺序中第一个满足条件的已闭合元素
    pub fn find_first<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(usize) -> bool,
    {
        (0..self.elements.len()).find(|&i| self.elements[i].is_closed() && predicate(i))
    }

    /// `root` 之内满足条件的最外层已闭合元素（命中后不再向下查找）
    pub fn outermost_within<F>(&self, root: usize, predicate: F) -> Vec<usize>
    where
        F: Fn(usize) -> bool,
    {
        let mut found = Vec::new();
        let mut pending: Vec<usize> = self.elements[root].children.iter().rev().copied().collect();

        while let Some(index) = pending.pop() {
            if self.elements[index].is_closed() && predicate(index) {
                found.push(index);
                continue;
            }
            pending.extend(self.elements[index].children.iter().rev().copied());
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_divs_match_by_depth() {
        let src = r#"<div id="a"><div class="b"><div>x</div></div></div><p>tail</p>"#;
        let tree = MarkupTree::parse(src);
        let a = tree.find_first(|i| tree.attribute(i, "id") == Some("a")).unwrap();
        let span = tree.get(a).unwrap().span().unwrap();
        assert_eq!(&src[span], r#"<div id="a"><div class="b"><div>x</div></div></div>"#);
    }

    #[test]
    fn test_whitespace_between_closers_does_not_matter() {
        let src = "<main><div id=\"quiz\">\n  <div>\n\n   </div>\n\t\n</div>\n</main>";
        let tree = MarkupTree::parse(src);
        let quiz = tree.find_first(|i| tree.attribute(i, "id") == Some("quiz")).unwrap();
        let span = tree.get(quiz).unwrap().span().unwrap();
        assert!(src[span].ends_with("</div>\n\t\n</div>"));
    }

    #[test]
    fn test_comments_and_scripts_are_opaque() {
        let src = r#"<div id="x"><!-- </div> --><script>if (a < b) { s = "</div>"; }</script></div>"#;
        let tree = MarkupTree::parse(src);
        let x = tree.find_first(|i| tree.attribute(i, "id") == Some("x")).unwrap();
        assert_eq!(tree.get(x).unwrap().span().unwrap(), 0..src.len());
        assert_eq!(tree.get(x).unwrap().children.len(), 1);
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let src = r#"<div><br><img src="a.png"/><input type="checkbox"></div>"#;
        let tree = MarkupTree::parse(src);
        let root = tree.roots().next().unwrap();
        assert_eq!(tree.get(root).unwrap().children.len(), 3);
        assert_eq!(tree.get(root).unwrap().span().unwrap(), 0..src.len());
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let src = r#"<div data-x="a > b" class="quiz-option">t</div>"#;
        let tree = MarkupTree::parse(src);
        assert!(tree.has_class(0, "quiz-option"));
        assert_eq!(tree.attribute(0, "data-x"), Some("a > b"));
        assert_eq!(tree.get(0).unwrap().inner().unwrap(), (src.len() - 7)..(src.len() - 6));
    }

    #[test]
    fn test_stray_closer_ignored_and_unclosed_reported() {
        let src = "</span><div><p>open<div class=\"q\">in</div></div>";
        let tree = MarkupTree::parse(src);
        let p = tree.find_first(|i| tree.get(i).map(|e| e.name == "p") == Some(true));
        // <p> 从未闭合，不会被 find_first 返回
        assert!(p.is_none());
        let outer = tree.roots().next().unwrap();
        assert!(tree.get(outer).unwrap().is_closed());
    }

    #[test]
    fn test_outermost_within_skips_nested_matches() {
        let src = r#"<div id="r"><div class="q"><div class="q">in</div></div><section><div class="q">2</div></section></div>"#;
        let tree = MarkupTree::parse(src);
        let root = tree.find_first(|i| tree.attribute(i, "id") == Some("r")).unwrap();
        let found = tree.outermost_within(root, |i| tree.has_class(i, "q"));
        assert_eq!(found.len(), 2);
        let first = tree.get(found[0]).unwrap().span().unwrap();
        assert!(src[first].starts_with(r#"<div class="q"><div class="q">"#));
    }

    #[test]
    fn test_lone_less_than_is_text() {
        let src = "<div>a < b and 3<4</div>";
        let tree = MarkupTree::parse(src);
        assert!(tree.get(1).is_none());
        assert_eq!(tree.get(0).unwrap().span().unwrap(), 0..src.len());
    }
}
