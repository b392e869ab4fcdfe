//! Book persistence.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::{Book, NewBook};

/// Storage contract the catalog service depends on
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Store a new, available book and return it with its assigned id
    async fn create(&self, new_book: &NewBook) -> Result<Book, sqlx::Error>;

    /// Every stored book, in id order
    async fn list(&self) -> Result<Vec<Book>, sqlx::Error>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>, sqlx::Error>;

    /// Flip `is_available` in a single statement and return the updated book,
    /// or `None` when no book has this id.
    async fn toggle_availability(&self, id: i64) -> Result<Option<Book>, sqlx::Error>;
}

/// SQLite-backed repository
#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn create(&self, new_book: &NewBook) -> Result<Book, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, is_available)
            VALUES (?, ?, 1)
            RETURNING id, title, author, is_available
            "#,
        )
        .bind(&new_book.title)
        .bind(&new_book.author)
        .fetch_one(&self.pool)
        .await
    }

    async fn list(&self) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>("SELECT id, title, author, is_available FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>("SELECT id, title, author, is_available FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn toggle_availability(&self, id: i64) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET is_available = NOT is_available
            WHERE id = ?
            RETURNING id, title, author, is_available
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
