//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::PostId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Comment, Post, Vote, VoteInsert};
use crate::domain::repository::{CommentRepository, PostRepository, VoteRepository};
use crate::domain::value_objects::{SearchQuery, SortKey};
use crate::error::{BoardError, BoardResult};

/// PostgreSQL-backed board repository (posts + comments + votes)
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = r#"
    p.post_id,
    p.title,
    p.url,
    p.body,
    p.author_id,
    u.user_name AS author_name,
    p.vote_count,
    p.comment_count,
    p.created_at
"#;

// `$1` is NULL for match-all, otherwise an escaped ILIKE pattern
const MATCH_CLAUSE: &str = "($1::text IS NULL OR p.title ILIKE $1 OR p.body ILIKE $1)";

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgBoardRepository {
    async fn create(&self, post: &Post) -> BoardResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                title,
                url,
                body,
                author_id,
                vote_count,
                comment_count,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.title)
        .bind(post.url.as_deref())
        .bind(&post.body)
        .bind(post.author_id.as_uuid())
        .bind(post.vote_count)
        .bind(post.comment_count)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, post_id: &PostId) -> BoardResult<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.user_id = p.author_id WHERE p.post_id = $1"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn count_matching(&self, query: &SearchQuery) -> BoardResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM posts p WHERE {MATCH_CLAUSE}");

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(query.like_pattern())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        sort: SortKey,
        offset: i64,
        limit: i64,
    ) -> BoardResult<Vec<Post>> {
        // ORDER BY comes from a closed whitelist, never from user input
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.user_id = p.author_id \
             WHERE {MATCH_CLAUSE} ORDER BY {} LIMIT $2 OFFSET $3",
            sort.order_by_clause()
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(query.like_pattern())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgBoardRepository {
    async fn create(&self, comment: &Comment) -> BoardResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated =
            sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE post_id = $1")
                .bind(comment.post_id.as_uuid())
                .execute(&mut *tx)
                .await?;

        if updated.rows_affected() == 0 {
            return Err(BoardError::PostNotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO comments (
                comment_id,
                post_id,
                author_id,
                body,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await
        .map_err(BoardError::from_post_write)?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_for_post(&self, post_id: &PostId) -> BoardResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                c.comment_id,
                c.post_id,
                c.author_id,
                u.user_name AS author_name,
                c.body,
                c.created_at
            FROM comments c
            JOIN users u ON u.user_id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.comment_id DESC
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }
}

// ============================================================================
// Vote Repository Implementation
// ============================================================================

impl VoteRepository for PgBoardRepository {
    async fn cast(&self, vote: &Vote) -> BoardResult<VoteInsert> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO votes (user_id, post_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(vote.user_id.as_uuid())
        .bind(vote.post_id.as_uuid())
        .bind(vote.created_at)
        .execute(&mut *tx)
        .await
        .map_err(BoardError::from_post_write)?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(VoteInsert::Duplicate);
        }

        sqlx::query("UPDATE posts SET vote_count = vote_count + 1 WHERE post_id = $1")
            .bind(vote.post_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(VoteInsert::Inserted)
    }

    async fn rebuild_vote_count(&self, post_id: &PostId) -> BoardResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts
            SET vote_count = (SELECT COUNT(*) FROM votes WHERE post_id = $1)
            WHERE post_id = $1
            RETURNING vote_count
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        count.ok_or(BoardError::PostNotFound)
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    title: String,
    url: Option<String>,
    body: String,
    author_id: Uuid,
    author_name: String,
    vote_count: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: self.post_id.into(),
            title: self.title,
            url: self.url,
            body: self.body,
            author_id: self.author_id.into(),
            author_name: self.author_name,
            vote_count: self.vote_count,
            comment_count: self.comment_count,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    author_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: self.comment_id.into(),
            post_id: self.post_id.into(),
            author_id: self.author_id.into(),
            author_name: self.author_name,
            body: self.body,
            created_at: self.created_at,
        }
    }
}
