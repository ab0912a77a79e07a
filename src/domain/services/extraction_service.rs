use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::config::selector_rules::{ExtractionStrategy, FieldRule, SelectorRuleSet};
use crate::domain::models::person::{
    CohabitantCandidate, CompanyCandidate, ProfileCandidate, VehicleCandidate,
};

/// 列表项抽取结果
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// 条目名称，缺失时为"N/A"
    pub name: String,
    /// 包含标记词的文本片段
    pub marked: Option<String>,
}

/// 档案抽取器
///
/// 按选择器规则集从档案页HTML中抽取结构化候选数据。
/// 每个字段独立抽取，单个字段失败只记录日志，不影响其他字段。
#[derive(Debug, Clone)]
pub struct ProfileExtractor {
    rules: Arc<SelectorRuleSet>,
}

impl ProfileExtractor {
    /// 创建新的档案抽取器
    pub fn new(rules: Arc<SelectorRuleSet>) -> Self {
        Self { rules }
    }

    /// 从档案页HTML抽取候选数据
    ///
    /// # 参数
    ///
    /// * `html` - 档案页的完整HTML
    ///
    /// # 返回值
    ///
    /// 返回抽取候选，未命中的字段为空
    pub fn extract(&self, html: &str) -> ProfileCandidate {
        let doc = Html::parse_document(html);
        ProfileCandidate {
            full_name: self.scalar(&doc, "full_name"),
            age: self.scalar(&doc, "age"),
            city: self.scalar(&doc, "city"),
            address: self.scalar(&doc, "address"),
            phone_number: self.scalar(&doc, "phone_number"),
            birthday: self.scalar(&doc, "birthday"),
            national_id: self.scalar(&doc, "national_id"),
            marital_status: self.scalar(&doc, "marital_status"),
            cohabitants: self.cohabitants(&doc),
            vehicles: self.vehicles(&doc),
            companies: self.companies(&doc),
        }
    }

    fn rule(&self, field: &str) -> Option<&FieldRule> {
        let rule = self.rules.get(field);
        if rule.is_none() {
            warn!("No selector rule configured for field '{}'", field);
        }
        rule
    }

    fn scalar(&self, doc: &Html, field: &str) -> Option<String> {
        let rule = self.rule(field)?;
        let value = extract_scalar(doc, rule);
        if value.is_none() {
            warn!("Field '{}' not found in profile document", field);
        }
        value
    }

    fn cohabitants(&self, doc: &Html) -> Vec<CohabitantCandidate> {
        let Some(rule) = self.rule("cohabitants") else {
            return Vec::new();
        };
        extract_list_items(doc, rule)
            .into_iter()
            .map(|item| CohabitantCandidate {
                name: item.name,
                age: item.marked,
            })
            .collect()
    }

    fn vehicles(&self, doc: &Html) -> Vec<VehicleCandidate> {
        let Some(rule) = self.rule("vehicles") else {
            return Vec::new();
        };
        extract_json_items(doc, rule)
            .into_iter()
            .map(|obj| VehicleCandidate {
                make_model: string_value(obj.get("display")).unwrap_or_default(),
                model_year: string_value(obj.get("model_year")),
                owner: string_value(obj.get("owner")),
                registration: string_value(obj.get("registration")),
            })
            .collect()
    }

    fn companies(&self, doc: &Html) -> Vec<CompanyCandidate> {
        let Some(rule) = self.rule("companies") else {
            return Vec::new();
        };
        extract_json_items(doc, rule)
            .into_iter()
            .map(|obj| CompanyCandidate {
                company_name: string_value(obj.get("name")).unwrap_or_default(),
                position_title: string_value(obj.get("position")),
                company_url: string_value(obj.get("url")),
            })
            .collect()
    }
}

/// 按规则抽取单值字段
///
/// 集合类策略在此返回None并记录日志。
pub fn extract_scalar(doc: &Html, rule: &FieldRule) -> Option<String> {
    match rule.strategy {
        ExtractionStrategy::SingleNode => doc
            .select(&rule.selector)
            .next()
            .map(text_of)
            .filter(|v| !v.is_empty()),
        ExtractionStrategy::MultiNodeFiltered => {
            let marker = rule.marker.as_deref()?.to_lowercase();
            doc.select(&rule.selector)
                .map(text_of)
                .find(|text| text.to_lowercase().contains(&marker))
                .and_then(|text| text.split_whitespace().next().map(str::to_string))
        }
        ExtractionStrategy::SiblingOfLabel => {
            let label = find_label(doc, rule)?;
            following_sibling_text(label)
        }
        ExtractionStrategy::ParentOfLabel => {
            let label = find_label(doc, rule)?;
            let parent = ElementRef::wrap(label.parent()?)?;
            let value = text_of(parent);
            (!value.is_empty()).then_some(value)
        }
        ExtractionStrategy::EmbeddedJsonBlock | ExtractionStrategy::ListAfterLabel => {
            warn!("Strategy yields a collection, not a scalar");
            None
        }
    }
}

/// 按规则抽取节点属性中内嵌的JSON对象数组
///
/// 非对象元素被忽略，解析失败返回空数组并记录日志。
pub fn extract_json_items(doc: &Html, rule: &FieldRule) -> Vec<Map<String, Value>> {
    let Some(attr) = rule.attr.as_deref() else {
        return Vec::new();
    };
    let Some(element) = doc.select(&rule.selector).next() else {
        warn!("Embedded JSON block not found in document");
        return Vec::new();
    };
    let raw = element.value().attr(attr).unwrap_or("[]");
    // The page emits the binding with single quotes
    let repaired = raw.replace('\'', "\"");
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            warn!("Embedded JSON block is not parseable: {}", e);
            Vec::new()
        }
    }
}

/// 按规则抽取标签后方列表容器中的条目
pub fn extract_list_items(doc: &Html, rule: &FieldRule) -> Vec<ListItem> {
    let (container_sel, item_sel, name_sel, item_marker) = match (
        rule.container.as_ref(),
        rule.item.as_ref(),
        rule.item_name.as_ref(),
        rule.item_marker.as_deref(),
    ) {
        (Some(c), Some(i), Some(n), Some(m)) => (c, i, n, m),
        _ => return Vec::new(),
    };
    let Some(label) = find_label(doc, rule) else {
        warn!("List label not found in document");
        return Vec::new();
    };
    let Some(container) = find_following(label, container_sel) else {
        warn!("List container not found after label");
        return Vec::new();
    };
    let marker = item_marker.to_lowercase();
    container
        .select(item_sel)
        .map(|item| {
            let name = item
                .select(name_sel)
                .next()
                .map(text_of)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            let marked = item
                .text()
                .find(|fragment| fragment.to_lowercase().contains(&marker))
                .map(|fragment| fragment.trim().to_string());
            ListItem { name, marked }
        })
        .collect()
}

/// 元素的规整文本，空白片段被剔除
fn text_of(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 查找标签节点，规则带标记词时按小写包含过滤
fn find_label<'a>(doc: &'a Html, rule: &FieldRule) -> Option<ElementRef<'a>> {
    let marker = rule.marker.as_deref().map(str::to_lowercase);
    doc.select(&rule.selector).find(|el| match &marker {
        Some(m) => text_of(*el).to_lowercase().contains(m),
        None => true,
    })
}

/// 标签之后第一个非空兄弟节点的文本
fn following_sibling_text(label: ElementRef) -> Option<String> {
    for sibling in label.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        } else if let Some(element) = ElementRef::wrap(sibling) {
            let value = text_of(element);
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// 文档顺序中标签之后第一个命中目标选择器的元素
///
/// 先扫描各级兄弟节点自身，再深入其子树。
fn find_following<'a>(start: ElementRef<'a>, target: &Selector) -> Option<ElementRef<'a>> {
    let mut node = Some(*start);
    while let Some(current) = node {
        for sibling in current.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if target.matches(&element) {
                    return Some(element);
                }
                if let Some(found) = element.select(target).next() {
                    return Some(found);
                }
            }
        }
        node = current.parent();
    }
    None
}

fn string_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
