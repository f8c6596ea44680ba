use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blog_core::domain::{Author, Post, PostFields, PostQuery};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

#[derive(Default)]
struct PostTable {
    last_id: i64,
    rows: BTreeMap<i64, Post>,
}

/// In-memory post store.
///
/// Rows are keyed by id in a `BTreeMap`, so iteration is already in
/// creation order. Ids are never reused, even after deletes.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, author: Author, fields: PostFields) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let post = Post {
            id: table.last_id,
            title: fields.title,
            content: fields.content,
            author,
            created_at: Utc::now(),
        };
        table.rows.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update(&self, id: i64, fields: PostFields) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let post = table.rows.get_mut(&id).ok_or(RepoError::NotFound)?;

        post.title = fields.title;
        post.content = fields.content;

        Ok(post.clone())
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let table = self.table.read().await;
        let matching = table.rows.values().filter(|post| query.matches(post));

        let posts = match query.slice {
            Some(slice) => matching
                .skip(slice.offset as usize)
                .take(slice.limit as usize)
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(posts)
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|post| query.matches(post)).count() as u64)
    }
}
