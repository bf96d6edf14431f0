//! Paging - Capability traits shared by every list request
//!
//! Request messages only need to expose their page and sort fields; the
//! validators and the stores work on these traits instead of concrete types.

use std::fmt;

/// ページング可能なリクエスト
pub trait Paging {
    fn page_id(&self) -> i32;
    fn page_size(&self) -> i32;

    /// `LIMIT` / `OFFSET` に変換（検証済みの値を前提とする）
    fn page(&self) -> Page {
        Page::new(self.page_id(), self.page_size())
    }
}

/// ソート可能なリクエスト
pub trait Sorting {
    fn order(&self) -> &str;
    fn order_by(&self) -> &str;

    fn direction(&self) -> Direction {
        if self.order().eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }
}

/// Store に渡す LIMIT / OFFSET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(page_id: i32, page_size: i32) -> Self {
        let page_id = i64::from(page_id.max(1));
        let page_size = i64::from(page_size.max(0));
        Self {
            limit: page_size,
            offset: (page_id - 1) * page_size,
        }
    }
}

/// 並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Req {
        page_id: i32,
        page_size: i32,
        order: &'static str,
    }

    impl Paging for Req {
        fn page_id(&self) -> i32 {
            self.page_id
        }
        fn page_size(&self) -> i32 {
            self.page_size
        }
    }

    impl Sorting for Req {
        fn order(&self) -> &str {
            self.order
        }
        fn order_by(&self) -> &str {
            "id"
        }
    }

    #[test]
    fn test_page_offset() {
        let req = Req { page_id: 3, page_size: 10, order: "asc" };
        assert_eq!(req.page(), Page { limit: 10, offset: 20 });
    }

    #[test]
    fn test_direction() {
        let req = Req { page_id: 1, page_size: 5, order: "desc" };
        assert_eq!(req.direction(), Direction::Desc);
        let req = Req { page_id: 1, page_size: 5, order: "asc" };
        assert_eq!(req.direction().as_sql(), "ASC");
    }
}
