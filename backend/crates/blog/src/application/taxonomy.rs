//! Category and Tag Management

use std::sync::Arc;

use kernel::paging::{Paging, Sorting};
use kernel::{AppError, validate};

use crate::domain::repository::TaxonomyRepository;
use crate::domain::taxonomy::{Label, LabelFilter, LabelKind, LabelOrder, NAME_MAX_LENGTH};
use crate::error::{BlogError, BlogResult};

/// Taxonomy use case
pub struct TaxonomyUseCase<T>
where
    T: TaxonomyRepository,
{
    taxonomy_repo: Arc<T>,
}

impl<T> TaxonomyUseCase<T>
where
    T: TaxonomyRepository,
{
    pub fn new(taxonomy_repo: Arc<T>) -> Self {
        Self { taxonomy_repo }
    }

    pub async fn create(&self, kind: LabelKind, name: &str) -> BlogResult<Label> {
        validate::string("name", name, 1, NAME_MAX_LENGTH)?;
        let label = self.taxonomy_repo.create(kind, name).await?;
        tracing::info!(kind = kind.name(), id = label.id, name = %label.name, "Label created");
        Ok(label)
    }

    pub async fn rename(&self, kind: LabelKind, id: i64, name: &str) -> BlogResult<Label> {
        validate::id(kind.field(), id)?;
        validate::string("name", name, 1, NAME_MAX_LENGTH)?;
        self.taxonomy_repo
            .rename(kind, id, name)
            .await?
            .ok_or(BlogError::LabelNotFound(kind.name()))
    }

    /// Detaches the labels from every post; missing ids are `NotFound`
    pub async fn delete(&self, kind: LabelKind, ids: &[i64]) -> BlogResult<()> {
        let ids = validate::repeated_ids(kind.field(), ids)?;
        let deleted = self.taxonomy_repo.delete(kind, &ids).await?;
        tracing::info!(kind = kind.name(), requested = ids.len(), deleted, "Labels deleted");

        if deleted < ids.len() as u64 {
            return Err(BlogError::LabelNotFound(kind.name()));
        }
        Ok(())
    }

    pub async fn list<Q>(
        &self,
        kind: LabelKind,
        page: &Q,
        keyword: &str,
    ) -> BlogResult<(i64, Vec<Label>)>
    where
        Q: Paging + Sorting,
    {
        validate::page_order(page, LabelOrder::ALLOWED)?;
        let order_by = LabelOrder::parse(page.order_by())
            .ok_or_else(|| AppError::invalid_argument("order_by is invalid"))?;

        let filter = LabelFilter {
            keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
            order_by,
            direction: page.direction(),
            page: page.page(),
        };
        self.taxonomy_repo.list(kind, &filter).await
    }
}
