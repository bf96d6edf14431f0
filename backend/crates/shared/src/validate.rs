//! Validators - Request field checks
//!
//! Every function fails with [`ErrorKind::InvalidArgument`] and a short
//! message naming the offending field.
//!
//! [`ErrorKind::InvalidArgument`]: crate::error::kind::ErrorKind::InvalidArgument

use crate::error::app_error::{AppError, AppResult};
use crate::paging::{Paging, Sorting};

pub const EMAIL_MIN_LENGTH: usize = 3;
pub const EMAIL_MAX_LENGTH: usize = 50;
pub const PAGE_SIZE_MIN: i32 = 5;
pub const PAGE_SIZE_MAX: i32 = 50;

/// 文字数（バイト数ではない）が `min..=max` に収まるか。`max == 0` は上限なし
pub fn string(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || (max > 0 && len > max) {
        let message = if max == 0 {
            format!("{field} must contain at least {min} characters")
        } else {
            format!("{field} must contain from {min}-{max} characters")
        };
        return Err(AppError::invalid_argument(message));
    }
    Ok(())
}

/// メールアドレスの検証
///
/// ## Examples
/// ```rust
/// use kernel::validate;
///
/// assert!(validate::email("user@example.com").is_ok());
/// assert!(validate::email("\"john doe\"@[127.0.0.1]").is_ok());
/// assert!(validate::email("user@@example.com").is_err());
/// ```
pub fn email(value: &str) -> AppResult<()> {
    string("email", value, EMAIL_MIN_LENGTH, EMAIL_MAX_LENGTH)?;
    if !is_addr_spec(value) {
        return Err(AppError::invalid_argument("email is not a valid email address"));
    }
    Ok(())
}

/// 数値が `min..=max` に収まるか
pub fn number(field: &str, value: i64, min: i64, max: i64) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::invalid_argument(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

/// ID は 1 以上
pub fn id(field: &str, value: i64) -> AppResult<()> {
    if value < 1 {
        return Err(AppError::invalid_argument(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}

pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> AppResult<()> {
    if !allowed.contains(&value) {
        return Err(AppError::invalid_argument(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// `page_id >= 1` かつ `page_size` が 5..=50
pub fn page(p: &impl Paging) -> AppResult<()> {
    if p.page_id() < 1 {
        return Err(AppError::invalid_argument("page_id must be a positive integer"));
    }
    if p.page_size() < PAGE_SIZE_MIN || p.page_size() > PAGE_SIZE_MAX {
        return Err(AppError::invalid_argument(format!(
            "page_size must be between {PAGE_SIZE_MIN} and {PAGE_SIZE_MAX}"
        )));
    }
    Ok(())
}

/// ページングに加えて `order` と `order_by` を検証
pub fn page_order<P>(p: &P, allowed_order_by: &[&str]) -> AppResult<()>
where
    P: Paging + Sorting,
{
    page(p)?;
    one_of("order", p.order(), &["asc", "desc"])?;
    one_of("order_by", p.order_by(), allowed_order_by)
}

/// 全要素が 1 以上の非空リストを、最初の出現順を保って重複排除
pub fn repeated_ids(field: &str, ids: &[i64]) -> AppResult<Vec<i64>> {
    if ids.is_empty() {
        return Err(AppError::invalid_argument(format!("{field} must not be empty")));
    }
    let mut unique = Vec::with_capacity(ids.len());
    for &value in ids {
        id(field, value)?;
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    Ok(unique)
}

// ============================================================================
// RFC 5322 addr-spec
// ============================================================================

fn is_addr_spec(email: &str) -> bool {
    let Some(at) = email.rfind('@') else {
        return false;
    };
    let (local, domain) = (&email[..at], &email[at + 1..]);
    is_local_part(local) && is_domain(domain)
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

fn is_dot_atom(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) if escaped.is_ascii_graphic() || escaped == ' ' || escaped == '\t' => {}
                _ => return false,
            },
            '"' => return false,
            c if c.is_ascii_graphic() || c == ' ' || c == '\t' => {}
            _ => return false,
        }
    }
    true
}

fn is_local_part(local: &str) -> bool {
    !local.is_empty() && local.len() <= 64 && (is_dot_atom(local) || is_quoted_string(local))
}

fn is_domain(domain: &str) -> bool {
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        return !literal.is_empty()
            && literal
                .chars()
                .all(|c| c.is_ascii_graphic() && !matches!(c, '[' | ']' | '\\'));
    }
    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
