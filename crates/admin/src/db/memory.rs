//! In-process store.
//!
//! Keeps all three collections behind one `RwLock`. Used by the test suites
//! in place of `PostgreSQL`; behaves like [`PgStore`](super::PgStore),
//! including insertion-ordered listings and duplicate-username conflicts.

use async_trait::async_trait;
use roya_core::{BasketId, ProductId};
use tokio::sync::RwLock;

use super::{BasketStore, ProductStore, RepositoryError, Store, UserStore};
use crate::models::{Basket, Product, User};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    products: Vec<Product>,
    baskets: Vec<Basket>,
}

/// Store that lives entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored user.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn any_user_exists(&self) -> Result<bool, RepositoryError> {
        Ok(!self.inner.read().await.users.is_empty())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn update_password_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .users
            .iter_mut()
            .find(|u| u.username == username)
            .map(|user| user.password_hash = password_hash.to_owned())
            .is_some())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.inner.read().await.products.clone())
    }

    async fn count_products(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.read().await.products.len() as u64)
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.inner.write().await.products.push(product.clone());
        Ok(())
    }

    async fn rename_product(&self, id: &ProductId, title: &str) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let mut matched = false;
        for product in inner.products.iter_mut().filter(|p| &p.id == id) {
            product.title = title.to_owned();
            matched = true;
        }
        Ok(matched)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| &p.id != id);
        Ok(inner.products.len() < before)
    }
}

#[async_trait]
impl BasketStore for MemoryStore {
    async fn list_baskets(&self) -> Result<Vec<Basket>, RepositoryError> {
        Ok(self.inner.read().await.baskets.clone())
    }

    async fn count_baskets(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.read().await.baskets.len() as u64)
    }

    async fn find_basket(&self, id: &BasketId) -> Result<Option<Basket>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.baskets.iter().find(|b| &b.id == id).cloned())
    }

    async fn insert_basket(&self, basket: &Basket) -> Result<(), RepositoryError> {
        self.inner.write().await.baskets.push(basket.clone());
        Ok(())
    }

    async fn update_basket(&self, basket: &Basket) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let mut matched = false;
        for stored in inner.baskets.iter_mut().filter(|b| b.id == basket.id) {
            stored.clone_from(basket);
            matched = true;
        }
        Ok(matched)
    }

    async fn delete_basket(&self, id: &BasketId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.baskets.len();
        inner.baskets.retain(|b| &b.id != id);
        Ok(inner.baskets.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use roya_core::LineItem;
    use rust_decimal::Decimal;

    use super::*;

    fn product(title: &str) -> Product {
        Product {
            id: ProductId::generate(),
            title: title.to_string(),
        }
    }

    fn basket(title: &str) -> Basket {
        Basket::stamped(
            BasketId::generate(),
            Some(title.to_string()),
            None,
            vec![LineItem {
                title: "Plate".to_string(),
                color: "White".to_string(),
                price: Decimal::from(300),
                count: 4,
            }],
        )
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let store = MemoryStore::new();
        assert!(!store.any_user_exists().await.unwrap_or(true));

        let user = User {
            username: "admin".to_string(),
            password_hash: "hash-1".to_string(),
            is_admin: true,
        };
        assert!(store.insert_user(&user).await.is_ok());
        assert!(store.any_user_exists().await.unwrap_or(false));

        assert!(store.update_password_hash("admin", "hash-2").await.unwrap_or(false));
        let found = store.find_user("admin").await.ok().flatten();
        assert_eq!(found.map(|u| u.password_hash), Some("hash-2".to_string()));

        assert!(!store.update_password_hash("ghost", "hash-3").await.unwrap_or(true));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let user = User {
            username: "admin".to_string(),
            password_hash: "hash".to_string(),
            is_admin: true,
        };
        assert!(store.insert_user(&user).await.is_ok());
        assert!(matches!(
            store.insert_user(&user).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_products_keep_insertion_order() {
        let store = MemoryStore::new();
        for title in ["Cup", "Bowl", "Jug"] {
            assert!(store.insert_product(&product(title)).await.is_ok());
        }

        let titles: Vec<String> = store
            .list_products()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Cup", "Bowl", "Jug"]);
        assert_eq!(store.count_products().await.unwrap_or_default(), 3);
    }

    #[tokio::test]
    async fn test_conditional_product_mutations() {
        let store = MemoryStore::new();
        let cup = product("Cup");
        assert!(store.insert_product(&cup).await.is_ok());

        assert!(store.rename_product(&cup.id, "Mug").await.unwrap_or(false));
        let renamed = store.find_product(&cup.id).await.ok().flatten();
        assert_eq!(renamed.map(|p| p.title), Some("Mug".to_string()));

        let missing = ProductId::from("0".to_string());
        assert!(!store.rename_product(&missing, "Nope").await.unwrap_or(true));
        assert!(!store.delete_product(&missing).await.unwrap_or(true));
        assert_eq!(store.count_products().await.unwrap_or_default(), 1);

        assert!(store.delete_product(&cup.id).await.unwrap_or(false));
        assert_eq!(store.count_products().await.unwrap_or_default(), 0);
    }

    #[tokio::test]
    async fn test_basket_update_overwrites_contents() {
        let store = MemoryStore::new();
        let original = basket("Birthday");
        assert!(store.insert_basket(&original).await.is_ok());

        let mut edited = basket("Anniversary");
        edited.id = original.id.clone();
        assert!(store.update_basket(&edited).await.unwrap_or(false));

        let stored = store.find_basket(&original.id).await.ok().flatten();
        assert_eq!(stored, Some(edited));
        assert_eq!(store.count_baskets().await.unwrap_or_default(), 1);
    }

    #[tokio::test]
    async fn test_basket_delete_missing_is_noop() {
        let store = MemoryStore::new();
        assert!(store.insert_basket(&basket("Picnic")).await.is_ok());

        let missing = BasketId::from("1".to_string());
        assert!(!store.delete_basket(&missing).await.unwrap_or(true));
        assert!(!store.update_basket(&basket("Ghost")).await.unwrap_or(true));
        assert_eq!(store.count_baskets().await.unwrap_or_default(), 1);
    }
}
