//! Categories and tags

use auth::UserRole;
use blog::TaxonomyUseCase;
use blog::domain::LabelKind;
use kernel::AppResult;
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert;

impl BlogService {
    fn taxonomy(&self) -> TaxonomyUseCase<blog::PgBlogRepository> {
        TaxonomyUseCase::new(self.blog_repo.clone())
    }

    pub async fn create_category(
        &self,
        meta: &RequestMeta,
        req: pb::CreateCategoryRequest,
    ) -> AppResult<pb::CreateCategoryResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let label = self.taxonomy().create(LabelKind::Category, &req.name).await?;
        Ok(pb::CreateCategoryResponse {
            category: Some(convert::category(label)),
        })
    }

    pub async fn update_category(
        &self,
        meta: &RequestMeta,
        req: pb::UpdateCategoryRequest,
    ) -> AppResult<pb::UpdateCategoryResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let label = self
            .taxonomy()
            .rename(LabelKind::Category, req.category_id, &req.name)
            .await?;
        Ok(pb::UpdateCategoryResponse {
            category: Some(convert::category(label)),
        })
    }

    pub async fn delete_categories(
        &self,
        meta: &RequestMeta,
        req: pb::DeleteCategoriesRequest,
    ) -> AppResult<pb::Empty> {
        self.authorize(meta, UserRole::Admin).await?;
        self.taxonomy()
            .delete(LabelKind::Category, &req.category_ids)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn list_categories(
        &self,
        _meta: &RequestMeta,
        req: pb::ListCategoriesRequest,
    ) -> AppResult<pb::ListCategoriesResponse> {
        let (total, labels) = self
            .taxonomy()
            .list(LabelKind::Category, &req, &req.keyword)
            .await?;
        Ok(pb::ListCategoriesResponse {
            total,
            categories: labels.into_iter().map(convert::category).collect(),
        })
    }

    pub async fn create_tag(
        &self,
        meta: &RequestMeta,
        req: pb::CreateTagRequest,
    ) -> AppResult<pb::CreateTagResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let label = self.taxonomy().create(LabelKind::Tag, &req.name).await?;
        Ok(pb::CreateTagResponse {
            tag: Some(convert::tag(label)),
        })
    }

    pub async fn update_tag(
        &self,
        meta: &RequestMeta,
        req: pb::UpdateTagRequest,
    ) -> AppResult<pb::UpdateTagResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let label = self
            .taxonomy()
            .rename(LabelKind::Tag, req.tag_id, &req.name)
            .await?;
        Ok(pb::UpdateTagResponse {
            tag: Some(convert::tag(label)),
        })
    }

    pub async fn delete_tags(&self, meta: &RequestMeta, req: pb::DeleteTagsRequest) -> AppResult<pb::Empty> {
        self.authorize(meta, UserRole::Admin).await?;
        self.taxonomy().delete(LabelKind::Tag, &req.tag_ids).await?;
        Ok(pb::Empty {})
    }

    pub async fn list_tags(
        &self,
        _meta: &RequestMeta,
        req: pb::ListTagsRequest,
    ) -> AppResult<pb::ListTagsResponse> {
        let (total, labels) = self
            .taxonomy()
            .list(LabelKind::Tag, &req, &req.keyword)
            .await?;
        Ok(pb::ListTagsResponse {
            total,
            tags: labels.into_iter().map(convert::tag).collect(),
        })
    }
}
