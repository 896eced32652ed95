//! Mock repository implementations for testing
//!
//! `MockDatabase` keeps every table in memory behind one lock and implements all
//! four repository traits, so joins (categories of an image, images of a category)
//! behave like the PostgreSQL implementations. Clones share state.

use async_trait::async_trait;
use chrono::Utc;
use imagehub_core::models::{Account, Category, Image, ImageCategory, NewImage, Role};
use imagehub_core::AppError;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::repository::{
    AccountRepository, CategoryRepository, ImageCategoryRepository, ImageRepository,
};

#[derive(Default)]
struct MockState {
    accounts: BTreeMap<i64, Account>,
    images: BTreeMap<i64, Image>,
    categories: BTreeMap<i64, Category>,
    associations: BTreeMap<(i64, i64), ImageCategory>,
    next_account_id: i64,
    next_image_id: i64,
    fail_image_deletes: bool,
    fail_association_inserts: bool,
    delete_calls: usize,
}

#[derive(Clone, Default)]
pub struct MockDatabase {
    state: Arc<Mutex<MockState>>,
}

fn injected_failure() -> AppError {
    AppError::Database(sqlx::Error::PoolClosed)
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with the default reference categories
    pub fn with_default_categories() -> Self {
        let db = Self::new();
        for (id, name) in [
            (1, "People"),
            (2, "Animals"),
            (3, "Nature"),
            (4, "Food"),
            (5, "Architecture"),
        ] {
            db.add_category(id, name);
        }
        db
    }

    pub fn add_category(&self, id: i64, name: &str) {
        self.state.lock().unwrap().categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
            },
        );
    }

    pub fn add_account(&self, email: &str, role: Role) -> Account {
        let mut state = self.state.lock().unwrap();
        state.next_account_id += 1;
        let account = Account {
            id: state.next_account_id,
            email: email.to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        };
        state.accounts.insert(account.id, account.clone());
        account
    }

    /// Insert an image row directly, bypassing the upload pipeline
    pub fn insert_image(&self, owner_id: i64, file_path: &str, thumbnail_path: &str) -> Image {
        let mut state = self.state.lock().unwrap();
        state.next_image_id += 1;
        let image = Image {
            id: state.next_image_id,
            file_name: file_path.rsplit('/').next().unwrap_or(file_path).to_string(),
            file_path: file_path.to_string(),
            thumbnail_path: thumbnail_path.to_string(),
            description: String::new(),
            upload_date: Utc::now(),
            owner_id,
        };
        state.images.insert(image.id, image.clone());
        image
    }

    pub fn image_count(&self) -> usize {
        self.state.lock().unwrap().images.len()
    }

    pub fn association_count(&self) -> usize {
        self.state.lock().unwrap().associations.len()
    }

    /// Number of delete statements issued against the image table
    pub fn image_delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    pub fn set_fail_image_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_image_deletes = fail;
    }

    pub fn set_fail_association_inserts(&self, fail: bool) {
        self.state.lock().unwrap().fail_association_inserts = fail;
    }
}

#[async_trait]
impl ImageRepository for MockDatabase {
    async fn create(&self, image: NewImage) -> Result<Image, AppError> {
        let mut state = self.state.lock().unwrap();
        // owner foreign key is only enforced once accounts have been registered
        if !state.accounts.is_empty() && !state.accounts.contains_key(&image.owner_id) {
            return Err(AppError::NotFound(format!(
                "Owner account {} not found",
                image.owner_id
            )));
        }
        state.next_image_id += 1;
        let image = Image {
            id: state.next_image_id,
            file_name: image.file_name,
            file_path: image.file_path,
            thumbnail_path: image.thumbnail_path,
            description: image.description,
            upload_date: image.upload_date,
            owner_id: image.owner_id,
        };
        state.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Image>, AppError> {
        Ok(self.state.lock().unwrap().images.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Image>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .images
            .values()
            .filter(|image| image.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Image>, AppError> {
        Ok(self.state.lock().unwrap().images.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: i64) -> Result<Option<Image>, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_image_deletes {
            return Err(injected_failure());
        }
        state.delete_calls += 1;
        let removed = state.images.remove(&id);
        state.associations.retain(|(image_id, _), _| *image_id != id);
        Ok(removed)
    }

    async fn delete_by_owner(&self, owner_id: i64) -> Result<Vec<Image>, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_image_deletes {
            return Err(injected_failure());
        }
        state.delete_calls += 1;
        let ids: Vec<i64> = state
            .images
            .values()
            .filter(|image| image.owner_id == owner_id)
            .map(|image| image.id)
            .collect();
        let removed: Vec<Image> = ids
            .iter()
            .filter_map(|id| state.images.remove(id))
            .collect();
        let removed_ids: HashSet<i64> = ids.into_iter().collect();
        state
            .associations
            .retain(|(image_id, _), _| !removed_ids.contains(image_id));
        Ok(removed)
    }
}

#[async_trait]
impl CategoryRepository for MockDatabase {
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.state.lock().unwrap().categories.get(&id).cloned())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Category>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .categories
            .values()
            .filter(|category| names.contains(&category.name))
            .cloned()
            .collect())
    }

    async fn list_for_image(&self, image_id: i64) -> Result<Vec<Category>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .associations
            .keys()
            .filter(|(id, _)| *id == image_id)
            .filter_map(|(_, category_id)| state.categories.get(category_id).cloned())
            .collect())
    }

    async fn list_images(
        &self,
        category_id: i64,
        owner_id: Option<i64>,
    ) -> Result<Vec<Image>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .associations
            .keys()
            .filter(|(_, id)| *id == category_id)
            .filter_map(|(image_id, _)| state.images.get(image_id))
            .filter(|image| owner_id.map_or(true, |owner| image.owner_id == owner))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ImageCategoryRepository for MockDatabase {
    async fn add(&self, image_id: i64, category_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_association_inserts {
            return Err(injected_failure());
        }
        if state.associations.contains_key(&(image_id, category_id)) {
            return Ok(false);
        }
        let now = Utc::now();
        state.associations.insert(
            (image_id, category_id),
            ImageCategory {
                image_id,
                category_id,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(true)
    }

    async fn remove(&self, image_id: i64, category_id: i64) -> Result<bool, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .associations
            .remove(&(image_id, category_id))
            .is_some())
    }

    async fn list_by_image(&self, image_id: i64) -> Result<Vec<ImageCategory>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .associations
            .values()
            .filter(|association| association.image_id == image_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountRepository for MockDatabase {
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.accounts.values().any(|account| account.email == email) {
            return Err(AppError::Conflict(format!(
                "An account with email {} already exists",
                email
            )));
        }
        state.next_account_id += 1;
        let account = Account {
            id: state.next_account_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        Ok(self.state.lock().unwrap().accounts.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }
}
