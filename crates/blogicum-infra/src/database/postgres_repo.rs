//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::query::{AuthoredComment, PageWindow, PostQuery, PostSummary, Visibility};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// All repositories over one connection pool.
pub struct PostgresRepositories {
    pub users: PostgresUserRepository,
    pub categories: PostgresCategoryRepository,
    pub locations: PostgresLocationRepository,
    pub posts: PostgresPostRepository,
    pub comments: PostgresCommentRepository,
}

impl PostgresRepositories {
    pub fn new(db: DbConn) -> Self {
        Self {
            users: PostgresBaseRepository::new(db.clone()),
            categories: PostgresBaseRepository::new(db.clone()),
            locations: PostgresBaseRepository::new(db.clone()),
            posts: PostgresBaseRepository::new(db.clone()),
            comments: PostgresBaseRepository::new(db),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Translates a post filter into SQL; the publication gate joins the category.
fn filtered(query: &PostQuery) -> Select<PostEntity> {
    let mut select = PostEntity::find();
    if let Some(id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(id));
    }
    if let Some(id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(id));
    }
    if let Visibility::Published { at } = query.visibility {
        select = select
            .join(JoinType::InnerJoin, post::Relation::Category.def())
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(at))
            .filter(category::Column::IsPublished.eq(true));
    }
    select
}

impl PostgresPostRepository {
    /// Attaches authors, categories, locations and comment counts in four batched queries.
    async fn summarize(&self, posts: Vec<post::Model>) -> Result<Vec<PostSummary>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        let category_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.category_id).collect();
        let location_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.location_id).collect();

        let authors: HashMap<Uuid, String> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let categories: HashMap<Uuid, Category> = CategoryEntity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|c| (c.id, c.into()))
            .collect();

        let locations: HashMap<Uuid, Location> = LocationEntity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|l| (l.id, l.into()))
            .collect();

        let counts: HashMap<Uuid, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .collect();

        Ok(posts
            .into_iter()
            .map(|model| {
                let author_username = authors.get(&model.author_id).cloned().unwrap_or_default();
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = counts.get(&model.id).copied().unwrap_or(0).max(0) as u64;
                PostSummary {
                    post: model.into(),
                    author_username,
                    category,
                    location,
                    comment_count,
                }
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count_filtered(&self, query: &PostQuery) -> Result<u64, RepoError> {
        filtered(query).count(&self.db).await.map_err(map_db_err)
    }

    async fn list_filtered(
        &self,
        query: &PostQuery,
        window: &PageWindow,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let models = filtered(query)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .offset(window.offset())
            .limit(window.limit())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.summarize(models).await
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.summarize(vec![model]).await?.pop())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<AuthoredComment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| AuthoredComment {
                comment: Comment::from(comment),
                author_username: author.map(|u| u.username).unwrap_or_default(),
            })
            .collect())
    }

    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(comment_id)
            .filter(comment::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}
