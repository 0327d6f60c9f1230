//! 固定的两级商品品类目录，作为调研文档的分区键

use serde_json::{Value, json};

/// 品类目录：category -> 固定的subcategory列表，只读、硬编码、无生命周期
pub const CATEGORY_CATALOG: &[(&str, &[&str])] = &[
    ("Electronics", &["Tablets", "Laptops", "Smartwatches"]),
    ("Fitness", &["Fitness Trackers", "Gym Equipment"]),
    ("Appliances", &["Refrigerators", "Microwaves"]),
    ("Luxury Fashion", &["Apparel", "shoes"]),
];

/// 以JSON对象形式返回品类目录，供 `GET /categories` 使用
pub fn catalog_as_json() -> Value {
    let mut map = serde_json::Map::new();
    for (category, subcategories) in CATEGORY_CATALOG {
        map.insert(category.to_string(), json!(subcategories));
    }
    Value::Object(map)
}

/// 查询某个category的subcategory列表
pub fn subcategories(category: &str) -> Option<&'static [&'static str]> {
    CATEGORY_CATALOG
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, subs)| *subs)
}
