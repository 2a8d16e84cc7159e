//! Data store for users, customers, products and licenses
//!
//! In-memory maps behind an async RwLock, snapshotted to a JSON file after
//! every mutation. Uniqueness of usernames and customer numbers is enforced
//! here so every caller gets the same answer.

mod models;

pub use models::*;

use crate::auth::models::User;
use crate::auth::password::hash_password;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// On-disk shape of the store
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    next_id: u64,
    users: Vec<User>,
    customers: Vec<Customer>,
    products: Vec<Product>,
    licenses: Vec<License>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    users: BTreeMap<u64, User>,
    customers: BTreeMap<u64, Customer>,
    products: BTreeMap<u64, Product>,
    licenses: BTreeMap<u64, License>,
}

impl Inner {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            users: self.users.values().cloned().collect(),
            customers: self.customers.values().cloned().collect(),
            products: self.products.values().cloned().collect(),
            licenses: self.licenses.values().cloned().collect(),
        }
    }
}

impl From<Snapshot> for Inner {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            next_id: snapshot.next_id,
            users: snapshot.users.into_iter().map(|u| (u.id, u)).collect(),
            customers: snapshot.customers.into_iter().map(|c| (c.id, c)).collect(),
            products: snapshot.products.into_iter().map(|p| (p.id, p)).collect(),
            licenses: snapshot.licenses.into_iter().map(|l| (l.id, l)).collect(),
        }
    }
}

/// The application's data store
pub struct Store {
    inner: Arc<RwLock<Inner>>,
    data_file: Option<PathBuf>,
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            data_file: self.data_file.clone(),
        }
    }
}

impl Store {
    /// Open a store backed by a JSON snapshot file, loading it if present
    pub fn open(path: &Path) -> Result<Self> {
        let inner = if path.exists() {
            let content = fs::read_to_string(path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            Inner::from(snapshot)
        } else {
            Inner::default()
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
            data_file: Some(path.to_path_buf()),
        })
    }

    /// A store with no backing file, for tests and one-off CLI use
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            data_file: None,
        }
    }

    fn persist(&self, inner: &Inner) -> Result<()> {
        if let Some(path) = &self.data_file {
            let json = serde_json::to_string_pretty(&inner.snapshot())?;
            fs::write(path, json)?;
        }
        Ok(())
    }

    // Users

    pub async fn user_by_id(&self, id: u64) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// All users ordered by username
    pub async fn list_users(&self) -> Vec<User> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == new.username) {
            return Err(Error::DuplicateUsername(new.username));
        }

        let id = inner.alloc_id();
        let user = User {
            id,
            username: new.username,
            password_hash: new.password_hash,
            role: new.role,
            active: new.active,
        };
        inner.users.insert(id, user.clone());
        self.persist(&inner)?;
        Ok(user)
    }

    /// Update username, role and active flag. The password is changed only
    /// through [`Store::reset_password`].
    pub async fn update_user(
        &self,
        id: u64,
        username: String,
        role: crate::auth::UserRole,
        active: bool,
    ) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|u| u.username == username && u.id != id)
        {
            return Err(Error::DuplicateUsername(username));
        }

        let user = inner.users.get_mut(&id).ok_or(Error::UserNotFound(id))?;
        user.username = username;
        user.role = role;
        user.active = active;
        let user = user.clone();
        self.persist(&inner)?;
        Ok(user)
    }

    pub async fn reset_password(&self, id: u64, password_hash: String) -> Result<()> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(Error::UserNotFound(id))?;
        user.password_hash = password_hash;
        self.persist(&inner)?;
        Ok(())
    }

    // Customers

    pub async fn customer(&self, id: u64) -> Result<Customer> {
        self.inner
            .read()
            .await
            .customers
            .get(&id)
            .cloned()
            .ok_or(Error::CustomerNotFound(id))
    }

    /// Customers ordered by name, optionally filtered by a case-insensitive
    /// substring over name, customer number, contact name and contact email
    pub async fn list_customers(&self, q: Option<&str>) -> Vec<Customer> {
        let inner = self.inner.read().await;
        let needle = q.map(str::to_lowercase);

        let mut customers: Vec<Customer> = inner
            .customers
            .values()
            .filter(|c| match &needle {
                None => true,
                Some(needle) => {
                    contains(&c.name, needle)
                        || contains(&c.customer_number, needle)
                        || opt_contains(&c.contact_name, needle)
                        || opt_contains(&c.contact_email, needle)
                }
            })
            .cloned()
            .collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        customers
    }

    pub async fn create_customer(&self, new: NewCustomer) -> Result<Customer> {
        let mut inner = self.inner.write().await;
        if inner
            .customers
            .values()
            .any(|c| c.customer_number == new.customer_number)
        {
            return Err(Error::DuplicateCustomerNumber(new.customer_number));
        }

        let id = inner.alloc_id();
        let customer = Customer {
            id,
            customer_number: new.customer_number,
            name: new.name,
            contact_name: new.contact_name,
            contact_email: new.contact_email,
            contact_phone: new.contact_phone,
            notes: new.notes,
        };
        inner.customers.insert(id, customer.clone());
        self.persist(&inner)?;
        Ok(customer)
    }

    pub async fn update_customer(&self, id: u64, new: NewCustomer) -> Result<Customer> {
        let mut inner = self.inner.write().await;
        if inner
            .customers
            .values()
            .any(|c| c.customer_number == new.customer_number && c.id != id)
        {
            return Err(Error::DuplicateCustomerNumber(new.customer_number));
        }

        let customer = inner
            .customers
            .get_mut(&id)
            .ok_or(Error::CustomerNotFound(id))?;
        customer.customer_number = new.customer_number;
        customer.name = new.name;
        customer.contact_name = new.contact_name;
        customer.contact_email = new.contact_email;
        customer.contact_phone = new.contact_phone;
        customer.notes = new.notes;
        let customer = customer.clone();
        self.persist(&inner)?;
        Ok(customer)
    }

    /// Delete a customer and every license attached to it
    pub async fn delete_customer(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .customers
            .remove(&id)
            .ok_or(Error::CustomerNotFound(id))?;
        inner.licenses.retain(|_, l| l.customer_id != id);
        self.persist(&inner)?;
        Ok(())
    }

    // Products

    pub async fn product(&self, id: u64) -> Result<Product> {
        self.inner
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or(Error::ProductNotFound(id))
    }

    /// Products ordered by name
    pub async fn list_products(&self) -> Vec<Product> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    pub async fn create_product(&self, new: NewProduct) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let id = inner.alloc_id();
        let product = Product {
            id,
            name: new.name,
            category: new.category,
            manufacturer: new.manufacturer,
            notes: new.notes,
        };
        inner.products.insert(id, product.clone());
        self.persist(&inner)?;
        Ok(product)
    }

    pub async fn update_product(&self, id: u64, new: NewProduct) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id)
            .ok_or(Error::ProductNotFound(id))?;
        product.name = new.name;
        product.category = new.category;
        product.manufacturer = new.manufacturer;
        product.notes = new.notes;
        let product = product.clone();
        self.persist(&inner)?;
        Ok(product)
    }

    /// Delete a product and every license attached to it
    pub async fn delete_product(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .products
            .remove(&id)
            .ok_or(Error::ProductNotFound(id))?;
        inner.licenses.retain(|_, l| l.product_id != id);
        self.persist(&inner)?;
        Ok(())
    }

    // Licenses

    pub async fn license(&self, id: u64) -> Result<License> {
        self.inner
            .read()
            .await
            .licenses
            .get(&id)
            .cloned()
            .ok_or(Error::LicenseNotFound(id))
    }

    /// A license with its customer and product names resolved
    pub async fn license_view(&self, id: u64) -> Result<LicenseView> {
        let inner = self.inner.read().await;
        let license = inner
            .licenses
            .get(&id)
            .cloned()
            .ok_or(Error::LicenseNotFound(id))?;
        Ok(view_of(&inner, license))
    }

    /// Licenses matching every set field of the filter
    pub async fn list_licenses(&self, filter: &LicenseFilter, today: NaiveDate) -> Vec<LicenseView> {
        let inner = self.inner.read().await;
        let needle = filter.q.as_deref().map(str::to_lowercase);

        inner
            .licenses
            .values()
            .filter(|l| match filter.expiring {
                None => true,
                Some(Expiring::Within(days)) => l
                    .end_date
                    .map(|end| end >= today && end <= today + chrono::Duration::days(days as i64))
                    .unwrap_or(false),
                Some(Expiring::Expired) => l.end_date.map(|end| end < today).unwrap_or(false),
            })
            .filter(|l| match filter.status {
                None => true,
                Some(status) => l.status == Some(status),
            })
            .filter(|l| match filter.customer_id {
                None => true,
                Some(id) => l.customer_id == id,
            })
            .filter(|l| match filter.product_id {
                None => true,
                Some(id) => l.product_id == id,
            })
            .filter(|l| match &needle {
                None => true,
                Some(needle) => {
                    opt_contains(&l.license_key, needle)
                        || opt_contains(&l.notes, needle)
                        || inner
                            .customers
                            .get(&l.customer_id)
                            .map(|c| contains(&c.name, needle))
                            .unwrap_or(false)
                        || inner
                            .products
                            .get(&l.product_id)
                            .map(|p| contains(&p.name, needle))
                            .unwrap_or(false)
                }
            })
            .cloned()
            .map(|l| view_of(&inner, l))
            .collect()
    }

    pub async fn create_license(&self, new: NewLicense) -> Result<License> {
        let mut inner = self.inner.write().await;
        if !inner.customers.contains_key(&new.customer_id) {
            return Err(Error::CustomerNotFound(new.customer_id));
        }
        if !inner.products.contains_key(&new.product_id) {
            return Err(Error::ProductNotFound(new.product_id));
        }

        let id = inner.alloc_id();
        let license = License {
            id,
            customer_id: new.customer_id,
            product_id: new.product_id,
            license_key: new.license_key,
            seats: new.seats,
            start_date: new.start_date,
            end_date: new.end_date,
            interval: new.interval,
            price: new.price,
            status: new.status,
            notes: new.notes,
        };
        inner.licenses.insert(id, license.clone());
        self.persist(&inner)?;
        Ok(license)
    }

    pub async fn update_license(&self, id: u64, new: NewLicense) -> Result<License> {
        let mut inner = self.inner.write().await;
        if !inner.customers.contains_key(&new.customer_id) {
            return Err(Error::CustomerNotFound(new.customer_id));
        }
        if !inner.products.contains_key(&new.product_id) {
            return Err(Error::ProductNotFound(new.product_id));
        }

        let license = inner
            .licenses
            .get_mut(&id)
            .ok_or(Error::LicenseNotFound(id))?;
        license.customer_id = new.customer_id;
        license.product_id = new.product_id;
        license.license_key = new.license_key;
        license.seats = new.seats;
        license.start_date = new.start_date;
        license.end_date = new.end_date;
        license.interval = new.interval;
        license.price = new.price;
        license.status = new.status;
        license.notes = new.notes;
        let license = license.clone();
        self.persist(&inner)?;
        Ok(license)
    }

    pub async fn delete_license(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .licenses
            .remove(&id)
            .ok_or(Error::LicenseNotFound(id))?;
        self.persist(&inner)?;
        Ok(())
    }

    // Dashboard

    pub async fn dashboard_stats(&self, today: NaiveDate) -> DashboardStats {
        let inner = self.inner.read().await;

        let active = |l: &&License| l.status == Some(LicenseStatus::Active);
        let ending_within = |l: &License, days: i64| {
            l.end_date
                .map(|end| end >= today && end <= today + chrono::Duration::days(days))
                .unwrap_or(false)
        };

        DashboardStats {
            customers_count: inner.customers.len(),
            licenses_active: inner.licenses.values().filter(active).count(),
            licenses_expiring_30: inner
                .licenses
                .values()
                .filter(active)
                .filter(|l| ending_within(l, 30))
                .count(),
            licenses_expiring_90: inner
                .licenses
                .values()
                .filter(active)
                .filter(|l| ending_within(l, 90))
                .count(),
        }
    }

    // Seeding

    /// Populate empty collections with demo data and a bootstrap admin.
    /// Each collection seeds only if it is empty, so restarts add nothing.
    pub async fn seed_demo_data(&self) -> Result<()> {
        let today = chrono::Utc::now().date_naive();

        if self.inner.read().await.customers.is_empty() {
            self.create_customer(NewCustomer {
                customer_number: "K1000".to_string(),
                name: "Sample Customer Ltd".to_string(),
                contact_name: Some("Max Sample".to_string()),
                contact_email: Some("it@sample-customer.example".to_string()),
                contact_phone: Some("01234 567890".to_string()),
                notes: Some("Demo customer, created for testing.".to_string()),
            })
            .await?;
            self.create_customer(NewCustomer {
                customer_number: "K1001".to_string(),
                name: "Example Corp".to_string(),
                contact_name: Some("Erika Example".to_string()),
                contact_email: Some("admin@example-corp.example".to_string()),
                contact_phone: Some("09876 543210".to_string()),
                notes: None,
            })
            .await?;
        }

        if self.inner.read().await.products.is_empty() {
            for (name, category, manufacturer) in [
                ("ESET Endpoint Security", "Antivirus", "ESET"),
                ("Securepoint UTM", "Firewall", "Securepoint"),
                ("Monitoring Basic", "Monitoring", "Inhouse"),
            ] {
                self.create_product(NewProduct {
                    name: name.to_string(),
                    category: Some(category.to_string()),
                    manufacturer: Some(manufacturer.to_string()),
                    notes: None,
                })
                .await?;
            }
        }

        if self.inner.read().await.licenses.is_empty() {
            let customer = self.list_customers(None).await.into_iter().next();
            let product = self.list_products().await.into_iter().next();

            if let (Some(customer), Some(product)) = (customer, product) {
                self.create_license(NewLicense {
                    customer_id: customer.id,
                    product_id: product.id,
                    license_key: Some("ABC-123-XYZ".to_string()),
                    seats: Some(25),
                    start_date: Some(today - chrono::Duration::days(300)),
                    end_date: Some(today + chrono::Duration::days(60)),
                    interval: Some("yearly".to_string()),
                    price: Some("150 EUR/year".to_string()),
                    status: Some(LicenseStatus::Active),
                    notes: Some("Demo license".to_string()),
                })
                .await?;
            }
        }

        if self.inner.read().await.users.is_empty() {
            self.create_user(NewUser {
                username: "admin".to_string(),
                password_hash: hash_password("admin123")?,
                role: crate::auth::UserRole::Admin,
                active: true,
            })
            .await?;
        }

        Ok(())
    }
}

fn contains(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn opt_contains(haystack: &Option<String>, needle_lower: &str) -> bool {
    haystack
        .as_deref()
        .map(|h| contains(h, needle_lower))
        .unwrap_or(false)
}

fn view_of(inner: &Inner, license: License) -> LicenseView {
    let customer_name = inner
        .customers
        .get(&license.customer_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let product_name = inner
        .products
        .get(&license.product_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    LicenseView {
        license,
        customer_name,
        product_name,
    }
}
