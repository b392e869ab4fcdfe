use std::sync::Arc;

use super::error::CatalogError;
use super::models::{Book, CreateBook};
use super::repository::BookRepository;

/// Book catalog operations. Holds no state of its own; the repository is the
/// only source of truth.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
        Ok(self.repo.list().await?)
    }

    /// Validate and store a new book. Nothing is written when validation fails.
    pub async fn add_book(&self, request: CreateBook) -> Result<Book, CatalogError> {
        let new_book = request.validate()?;
        let book = self.repo.create(&new_book).await?;
        tracing::info!(book_id = book.id, "book added");
        Ok(book)
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, CatalogError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Flip the availability flag of an existing book.
    pub async fn toggle_availability(&self, id: i64) -> Result<Book, CatalogError> {
        let book = self
            .repo
            .toggle_availability(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        tracing::info!(book_id = id, is_available = book.is_available, "availability toggled");
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::SqliteBookRepository;
    use crate::modules::books::test_support::migrated_pool;

    async fn service() -> CatalogService {
        let repo = SqliteBookRepository::new(migrated_pool().await);
        CatalogService::new(Arc::new(repo))
    }

    fn create(title: &str, author: &str) -> CreateBook {
        CreateBook {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        assert!(service().await.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_books_are_listed_available_with_unique_ids() {
        let service = service().await;
        let pairs = [("Dune", "Herbert"), ("Emma", "Austen"), ("Dune", "Herbert")];

        let mut issued = Vec::new();
        for (title, author) in pairs {
            let book = service.add_book(create(title, author)).await.unwrap();
            assert!(!issued.contains(&book.id));
            issued.push(book.id);
        }

        let listed = service.list_books().await.unwrap();
        assert_eq!(listed.len(), 3);
        for ((title, author), book) in pairs.iter().zip(&listed) {
            assert_eq!(book.title, *title);
            assert_eq!(book.author, *author);
            assert!(book.is_available);
        }
    }

    #[tokio::test]
    async fn toggling_twice_restores_availability() {
        let service = service().await;
        let book = service.add_book(create("Dune", "Herbert")).await.unwrap();

        let once = service.toggle_availability(book.id).await.unwrap();
        assert!(!once.is_available);
        assert_eq!(once.title, book.title);

        let twice = service.toggle_availability(book.id).await.unwrap();
        assert_eq!(twice, book);
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_not_found_and_creates_nothing() {
        let service = service().await;

        let err = service.toggle_availability(7).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(7)));
        assert!(service.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_add_persists_nothing() {
        let service = service().await;
        let missing_author = CreateBook {
            title: Some("Dune".to_string()),
            author: None,
        };

        let err = service.add_book(missing_author).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));
        assert!(service.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_book_reports_not_found() {
        let service = service().await;
        let book = service.add_book(create("Emma", "Austen")).await.unwrap();

        assert_eq!(service.get_book(book.id).await.unwrap(), book);
        assert!(matches!(
            service.get_book(book.id + 1).await.unwrap_err(),
            CatalogError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn concurrent_toggles_are_not_lost() {
        let service = service().await;
        let book = service.add_book(create("Dune", "Herbert")).await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.toggle_availability(book.id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // An even number of flips lands back on the starting value.
        assert!(service.get_book(book.id).await.unwrap().is_available);
    }
}
