//! Categories and Tags

use auth::infra::postgres::escape_like;
use sqlx::{Postgres, QueryBuilder};

use super::{LabelRow, PgBlogRepository};
use crate::domain::repository::TaxonomyRepository;
use crate::domain::taxonomy::{Label, LabelFilter, LabelKind};
use crate::error::{BlogResult, label_taken};

/// `id, name, post_count` over the label table aliased `l`
fn label_columns(kind: LabelKind) -> String {
    format!(
        "l.id, l.name::TEXT AS name, (SELECT COUNT(*) FROM {} j WHERE j.{} = l.id) AS post_count",
        kind.join_table(),
        kind.join_column(),
    )
}

impl TaxonomyRepository for PgBlogRepository {
    async fn create(&self, kind: LabelKind, name: &str) -> BlogResult<Label> {
        let id = sqlx::query_scalar::<_, i64>(&format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id",
            kind.table()
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(label_taken(kind.name()))?;

        Ok(Label {
            id,
            name: name.to_string(),
            post_count: 0,
        })
    }

    async fn rename(&self, kind: LabelKind, id: i64, name: &str) -> BlogResult<Option<Label>> {
        let row = sqlx::query_as::<_, LabelRow>(&format!(
            r#"
            UPDATE {table} l SET name = $2
            WHERE l.id = $1
            RETURNING {columns}
            "#,
            table = kind.table(),
            columns = label_columns(kind),
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(label_taken(kind.name()))?;

        Ok(row.map(LabelRow::into_label))
    }

    async fn delete(&self, kind: LabelKind, ids: &[i64]) -> BlogResult<u64> {
        // Join rows go with the label (ON DELETE CASCADE)
        let deleted = sqlx::query(&format!("DELETE FROM {} WHERE id = ANY($1)", kind.table()))
            .bind(ids)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn list(&self, kind: LabelKind, filter: &LabelFilter) -> BlogResult<(i64, Vec<Label>)> {
        let mut count =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {} l WHERE TRUE", kind.table()));
        push_keyword(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        // post_count is a select alias, so order over a derived table
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT * FROM (SELECT {} FROM {} l WHERE TRUE",
            label_columns(kind),
            kind.table(),
        ));
        push_keyword(&mut query, filter);
        query
            .push(format!(
                ") labels ORDER BY {} {}, id ASC LIMIT ",
                filter.order_by.column(),
                filter.direction.as_sql(),
            ))
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.offset);

        let rows: Vec<LabelRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok((total, rows.into_iter().map(LabelRow::into_label).collect()))
    }
}

fn push_keyword(qb: &mut QueryBuilder<'_, Postgres>, filter: &LabelFilter) {
    if let Some(keyword) = &filter.keyword {
        qb.push(" AND l.name ILIKE ")
            .push_bind(format!("%{}%", escape_like(keyword)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_columns_count_join_rows() {
        let sql = label_columns(LabelKind::Tag);
        assert!(sql.contains("FROM post_tags j WHERE j.tag_id = l.id"));
    }
}
