//! PostgreSQL repository implementations.
//!
//! Delete cascades are carried by the schema's `ON DELETE CASCADE` foreign
//! keys (see `apps/migration`).

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
use quill_core::search::SearchFilter;

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            if local.chars().count() > 1 {
                format!("{first}***@{domain}")
            } else {
                format!("***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(query_err)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Post>, RepoError> {
        let pattern = filter.like_pattern();
        let like = |column: Expr| column.like(LikeExpr::new(pattern.clone()).escape('\\'));
        let result = PostEntity::find()
            .join(JoinType::LeftJoin, post::Relation::PostTag.def())
            .join(JoinType::LeftJoin, post_tag::Relation::Tag.def())
            .filter(
                Condition::any()
                    .add(like(Expr::col((PostEntity, post::Column::Title))))
                    .add(like(Expr::col((PostEntity, post::Column::Content))))
                    .add(like(Expr::col((TagEntity, tag::Column::TagName)))),
            )
            .distinct()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_untagged(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .left_join(PostTagEntity)
            .filter(post_tag::Column::PostId.is_null())
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn tags_of(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(post_tag::Column::Position)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn add_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let existing = PostTagEntity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut next = existing.iter().map(|l| l.position + 1).max().unwrap_or(0);
        let mut links = Vec::new();
        for tag_id in tag_ids {
            if existing.iter().any(|l| l.tag_id == *tag_id) {
                continue;
            }
            links.push(post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(*tag_id),
                position: Set(next),
            });
            next += 1;
        }

        if links.is_empty() {
            return Ok(());
        }

        let inserted = PostTagEntity::insert_many(links)
            .on_conflict(
                OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(repo_err(e)),
        }
    }

    async fn clear_tags(&self, post_id: Uuid) -> Result<(), RepoError> {
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

impl PostgresTagRepository {
    async fn find_by_name(&self, tag_name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::TagName.eq(tag_name))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn get_or_create(&self, tag_name: &str) -> Result<Tag, RepoError> {
        // The unique index on tag_name arbitrates concurrent creators: the
        // loser's insert is a no-op and it re-reads the winner's row.
        for attempt in 0..2 {
            if let Some(tag) = self.find_by_name(tag_name).await? {
                return Ok(tag);
            }

            let tag = Tag::new(tag_name);
            let inserted = TagEntity::insert(tag::ActiveModel::from(tag.clone()))
                .on_conflict(
                    OnConflict::column(tag::Column::TagName)
                        .do_nothing()
                        .to_owned(),
                )
                .exec(&self.db)
                .await;

            match inserted {
                Ok(_) => {
                    tracing::debug!(tag = %tag.tag_name, slug = %tag.slug, "Created tag");
                    return Ok(tag);
                }
                Err(DbErr::RecordNotInserted) => {
                    tracing::debug!(tag = %tag_name, attempt, "Tag insert conflicted, retrying");
                }
                Err(e) => return Err(repo_err(e)),
            }
        }

        self.find_by_name(tag_name).await?.ok_or_else(|| {
            RepoError::Constraint(format!("could not create tag {tag_name:?}"))
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .order_by_asc(tag::Column::TagName)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::TagName)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn masks_local_part() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("nonsense"), "***");
    }
}
