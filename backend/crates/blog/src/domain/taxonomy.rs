//! Categories and Tags
//!
//! Both are flat name lists attached to posts through a join table; one
//! [`LabelKind`] switches the table names.

use kernel::paging::{Direction, Page};

pub const NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Category,
    Tag,
}

impl LabelKind {
    pub const fn table(&self) -> &'static str {
        match self {
            LabelKind::Category => "categories",
            LabelKind::Tag => "tags",
        }
    }

    /// Post association table
    pub const fn join_table(&self) -> &'static str {
        match self {
            LabelKind::Category => "post_categories",
            LabelKind::Tag => "post_tags",
        }
    }

    /// Foreign key column in [`Self::join_table`]
    pub const fn join_column(&self) -> &'static str {
        match self {
            LabelKind::Category => "category_id",
            LabelKind::Tag => "tag_id",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            LabelKind::Category => "category",
            LabelKind::Tag => "tag",
        }
    }

    /// Request field carrying ids of this kind
    pub const fn field(&self) -> &'static str {
        match self {
            LabelKind::Category => "category_ids",
            LabelKind::Tag => "tag_ids",
        }
    }

    pub const fn plural(&self) -> &'static str {
        match self {
            LabelKind::Category => "categories",
            LabelKind::Tag => "tags",
        }
    }

    /// Maximum number attached to one post
    pub const fn cap(&self) -> usize {
        match self {
            LabelKind::Category => crate::domain::post::MAX_CATEGORIES,
            LabelKind::Tag => crate::domain::post::MAX_TAGS,
        }
    }
}

/// Category or tag with the number of posts using it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub post_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOrder {
    Id,
    Name,
    PostCount,
}

impl LabelOrder {
    pub const ALLOWED: &'static [&'static str] = &["id", "name", "post_count"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "post_count" => Some(Self::PostCount),
            _ => None,
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::PostCount => "post_count",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabelFilter {
    pub keyword: Option<String>,
    pub order_by: LabelOrder,
    pub direction: Direction,
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kind_tables() {
        assert_eq!(LabelKind::Category.table(), "categories");
        assert_eq!(LabelKind::Tag.join_table(), "post_tags");
        assert_eq!(LabelKind::Tag.join_column(), "tag_id");
        assert_eq!(LabelKind::Category.cap(), 2);
        assert_eq!(LabelKind::Tag.cap(), 3);
    }

    #[test]
    fn test_label_order() {
        assert_eq!(LabelOrder::parse("post_count"), Some(LabelOrder::PostCount));
        assert_eq!(LabelOrder::parse("create_at"), None);
    }
}
