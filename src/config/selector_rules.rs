// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

use config::{Config, ConfigError, File};
use scraper::Selector;
use serde::Deserialize;
use thiserror::Error;

/// 选择器规则错误类型
#[derive(Error, Debug)]
pub enum RulesError {
    /// 规则文件加载失败
    #[error("Failed to load selector rules: {0}")]
    Load(#[from] ConfigError),
    /// CSS选择器无法编译
    #[error("Invalid CSS selector for field '{field}': {selector}")]
    InvalidSelector { field: String, selector: String },
    /// 策略所需参数缺失
    #[error("Field '{field}' is missing required parameter '{param}'")]
    MissingParameter { field: String, param: &'static str },
}

/// 字段抽取策略
///
/// 描述从档案文档中定位一个字段值的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    /// 选择器命中的第一个节点的文本
    SingleNode,
    /// 选择器命中的多个节点中，文本包含标记词的第一个
    MultiNodeFiltered,
    /// 标签节点之后的第一个非空兄弟节点
    SiblingOfLabel,
    /// 节点属性中内嵌的JSON数组
    EmbeddedJsonBlock,
    /// 标记节点的父节点文本
    ParentOfLabel,
    /// 标签节点之后的列表容器，逐项抽取
    ListAfterLabel,
}

/// 规则文件中的原始规则条目
#[derive(Debug, Clone, Deserialize)]
pub struct RawSelectorRule {
    /// 抽取策略
    pub strategy: ExtractionStrategy,
    /// 主CSS选择器
    pub selector: String,
    /// 承载数据的属性名（embedded-json-block）
    pub attr: Option<String>,
    /// 标记词，按小写包含匹配
    pub marker: Option<String>,
    /// 列表容器选择器（list-after-label）
    pub container: Option<String>,
    /// 列表项选择器（list-after-label）
    pub item: Option<String>,
    /// 列表项名称选择器（list-after-label）
    pub item_name: Option<String>,
    /// 列表项标记词（list-after-label）
    pub item_marker: Option<String>,
}

/// 编译后的字段规则
///
/// 所有选择器已通过编译校验，可直接用于文档查询。
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub strategy: ExtractionStrategy,
    pub selector: Selector,
    pub attr: Option<String>,
    pub marker: Option<String>,
    pub container: Option<Selector>,
    pub item: Option<Selector>,
    pub item_name: Option<Selector>,
    pub item_marker: Option<String>,
}

/// 档案字段选择器规则集
///
/// 启动时从规则文件加载并整体编译，任何一条规则非法都会使加载失败。
#[derive(Debug, Clone, Default)]
pub struct SelectorRuleSet {
    rules: HashMap<String, FieldRule>,
}

impl SelectorRuleSet {
    /// 从规则文件加载并编译规则集
    ///
    /// # 参数
    ///
    /// * `path` - 规则文件路径，不含扩展名
    ///
    /// # 返回值
    ///
    /// * `Ok(SelectorRuleSet)` - 编译通过的规则集
    /// * `Err(RulesError)` - 文件缺失、选择器非法或参数缺失
    pub fn load(path: &str) -> Result<Self, RulesError> {
        let raw: HashMap<String, RawSelectorRule> = Config::builder()
            .add_source(File::with_name(path))
            .build()?
            .try_deserialize()?;
        Self::compile(raw)
    }

    /// 编译原始规则表
    ///
    /// 校验每条规则的选择器语法与策略所需参数。
    pub fn compile(raw: HashMap<String, RawSelectorRule>) -> Result<Self, RulesError> {
        let mut rules = HashMap::with_capacity(raw.len());
        for (field, rule) in raw {
            let compiled = compile_rule(&field, rule)?;
            rules.insert(field, compiled);
        }
        Ok(Self { rules })
    }

    /// 按字段名查找规则
    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    /// 规则条数
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 规则集是否为空
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile_rule(field: &str, raw: RawSelectorRule) -> Result<FieldRule, RulesError> {
    let selector = parse_selector(field, &raw.selector)?;

    match raw.strategy {
        ExtractionStrategy::MultiNodeFiltered | ExtractionStrategy::ParentOfLabel => {
            require(field, "marker", &raw.marker)?;
        }
        ExtractionStrategy::EmbeddedJsonBlock => {
            require(field, "attr", &raw.attr)?;
        }
        ExtractionStrategy::ListAfterLabel => {
            require(field, "marker", &raw.marker)?;
            require(field, "container", &raw.container)?;
            require(field, "item", &raw.item)?;
            require(field, "item_name", &raw.item_name)?;
            require(field, "item_marker", &raw.item_marker)?;
        }
        ExtractionStrategy::SingleNode | ExtractionStrategy::SiblingOfLabel => {}
    }

    let container = raw
        .container
        .as_deref()
        .map(|css| parse_selector(field, css))
        .transpose()?;
    let item = raw
        .item
        .as_deref()
        .map(|css| parse_selector(field, css))
        .transpose()?;
    let item_name = raw
        .item_name
        .as_deref()
        .map(|css| parse_selector(field, css))
        .transpose()?;

    Ok(FieldRule {
        strategy: raw.strategy,
        selector,
        attr: raw.attr,
        marker: raw.marker,
        container,
        item,
        item_name,
        item_marker: raw.item_marker,
    })
}

fn parse_selector(field: &str, css: &str) -> Result<Selector, RulesError> {
    Selector::parse(css).map_err(|_| RulesError::InvalidSelector {
        field: field.to_string(),
        selector: css.to_string(),
    })
}

fn require(
    field: &str,
    param: &'static str,
    value: &Option<String>,
) -> Result<(), RulesError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(RulesError::MissingParameter {
            field: field.to_string(),
            param,
        }),
    }
}
