use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{menu, menu_item};

use super::double_option;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenu {
    #[validate(length(min = 3, max = 100, message = "Name must be 3 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 3, max = 100, message = "Location must be 3 to 100 characters"))]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenu {
    #[validate(length(min = 3, max = 100, message = "Name must be 3 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 100, message = "Location must be 3 to 100 characters"))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItem {
    #[validate(length(min = 1, max = 200, message = "Label must be 1 to 200 characters"))]
    pub label: String,
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
    #[serde(default)]
    pub order: i32,
    pub parent_id: Option<i64>,
    pub menu_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItem {
    #[validate(length(min = 1, max = 200, message = "Label must be 1 to 200 characters"))]
    pub label: Option<String>,
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: Option<String>,
    pub order: Option<i32>,
    /// Absent leaves the parent untouched, explicit null detaches the item
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub items: Vec<MenuItemNode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuResponse {
    pub fn from_menu(menu: menu::Model, items: Vec<menu_item::Model>) -> Self {
        Self {
            id: menu.id,
            name: menu.name,
            location: menu.location,
            items: MenuItemNode::build_tree(items),
            created_at: menu.created_at,
            updated_at: menu.updated_at,
        }
    }
}

/// Menu item with its nested children
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemNode {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub order: i32,
    pub parent_id: Option<i64>,
    pub menu_id: i64,
    pub children: Vec<MenuItemNode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemNode {
    /// Builds the nested tree from a menu's flat item list.
    ///
    /// Siblings are ordered by `order`, ties broken by id. Items whose parent
    /// is not part of the list are dropped.
    pub fn build_tree(mut items: Vec<menu_item::Model>) -> Vec<MenuItemNode> {
        items.sort_by_key(|item| (item.sort_order, item.id));
        let mut children_of: HashMap<Option<i64>, Vec<menu_item::Model>> = HashMap::new();
        for item in items {
            children_of.entry(item.parent_id).or_default().push(item);
        }
        build_level(None, &mut children_of)
    }

    fn from_item(item: menu_item::Model, children: Vec<MenuItemNode>) -> Self {
        Self {
            id: item.id,
            label: item.label,
            url: item.url,
            order: item.sort_order,
            parent_id: item.parent_id,
            menu_id: item.menu_id,
            children,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

fn build_level(
    parent: Option<i64>,
    children_of: &mut HashMap<Option<i64>, Vec<menu_item::Model>>,
) -> Vec<MenuItemNode> {
    let level = children_of.remove(&parent).unwrap_or_default();
    level
        .into_iter()
        .map(|item| {
            let children = build_level(Some(item.id), children_of);
            MenuItemNode::from_item(item, children)
        })
        .collect()
}

/// Item shape returned by the item mutation endpoints, without children
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub order: i32,
    pub parent_id: Option<i64>,
    pub menu_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<menu_item::Model> for MenuItemResponse {
    fn from(item: menu_item::Model) -> Self {
        Self {
            id: item.id,
            label: item.label,
            url: item.url,
            order: item.sort_order,
            parent_id: item.parent_id,
            menu_id: item.menu_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
