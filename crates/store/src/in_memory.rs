//! In-memory store implementation.
//!
//! Intended for tests/dev. All tables live behind one `RwLock`, so every
//! repository call — including the order-with-items composite save and the
//! category set swap — is atomic and all-or-nothing.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use shopadmin_catalog::{Brand, BrandId, Category, CategoryId, Product, ProductId};
use shopadmin_core::Slug;
use shopadmin_customers::{Customer, CustomerId};
use shopadmin_orders::{Order, OrderId};

use crate::repository::{
    BrandRepository, CategoryRepository, CustomerRepository, OrderRepository, ProductRepository,
    StoreError, StoreResult,
};

#[derive(Debug, Default)]
struct State {
    brands: HashMap<BrandId, Brand>,
    products: HashMap<ProductId, Product>,
    categories: HashMap<CategoryId, Category>,
    customers: HashMap<CustomerId, Customer>,
    orders: HashMap<OrderId, Order>,
    product_categories: HashMap<ProductId, BTreeSet<CategoryId>>,
}

/// In-memory implementation of every repository trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

/// Uniqueness is enforced over live rows only: a soft-deleted record gives
/// its name/slug/sku back to the pool.
fn check_brand_uniques(state: &State, brand: &Brand) -> StoreResult<()> {
    if brand.is_deleted() {
        return Ok(());
    }
    for other in state.brands.values() {
        if other.id_typed() == brand.id_typed() || other.is_deleted() {
            continue;
        }
        if other.name() == brand.name() {
            return Err(StoreError::UniqueViolation {
                field: "name",
                value: brand.name().to_string(),
            });
        }
        if other.slug() == brand.slug() {
            return Err(StoreError::UniqueViolation {
                field: "slug",
                value: brand.slug().to_string(),
            });
        }
    }
    Ok(())
}

fn check_product_uniques(state: &State, product: &Product) -> StoreResult<()> {
    if product.is_deleted() {
        return Ok(());
    }
    for other in state.products.values() {
        if other.id_typed() == product.id_typed() || other.is_deleted() {
            continue;
        }
        if other.name() == product.name() {
            return Err(StoreError::UniqueViolation {
                field: "name",
                value: product.name().to_string(),
            });
        }
        if other.slug() == product.slug() {
            return Err(StoreError::UniqueViolation {
                field: "slug",
                value: product.slug().to_string(),
            });
        }
        if other.sku() == product.sku() {
            return Err(StoreError::UniqueViolation {
                field: "sku",
                value: product.sku().to_string(),
            });
        }
    }
    Ok(())
}

fn check_category_uniques(state: &State, category: &Category) -> StoreResult<()> {
    if category.is_deleted() {
        return Ok(());
    }
    for other in state.categories.values() {
        if other.id_typed() == category.id_typed() || other.is_deleted() {
            continue;
        }
        if other.name() == category.name() {
            return Err(StoreError::UniqueViolation {
                field: "name",
                value: category.name().to_string(),
            });
        }
        if other.slug() == category.slug() {
            return Err(StoreError::UniqueViolation {
                field: "slug",
                value: category.slug().to_string(),
            });
        }
    }
    Ok(())
}

fn check_product_refs(state: &State, product: &Product) -> StoreResult<()> {
    if let Some(brand_id) = product.brand_id() {
        if !state.brands.contains_key(&brand_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "brand {brand_id} does not exist"
            )));
        }
    }
    Ok(())
}

fn check_order_refs(state: &State, order: &Order) -> StoreResult<()> {
    if !state.customers.contains_key(&order.customer_id()) {
        return Err(StoreError::ForeignKeyViolation(format!(
            "customer {} does not exist",
            order.customer_id()
        )));
    }
    for item in order.items() {
        if !state.products.contains_key(&item.product_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "product {} does not exist",
                item.product_id
            )));
        }
    }
    Ok(())
}

impl BrandRepository for InMemoryStore {
    fn insert(&self, brand: Brand) -> StoreResult<()> {
        let mut state = self.write()?;
        check_brand_uniques(&state, &brand)?;
        state.brands.insert(brand.id_typed(), brand);
        Ok(())
    }

    fn update(&self, brand: Brand) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.brands.contains_key(&brand.id_typed()) {
            return Err(StoreError::NotFound);
        }
        check_brand_uniques(&state, &brand)?;
        state.brands.insert(brand.id_typed(), brand);
        Ok(())
    }

    fn get(&self, id: BrandId) -> Option<Brand> {
        self.read().ok()?.brands.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Brand> {
        let state = self.read().ok()?;
        state
            .brands
            .values()
            .find(|b| !b.is_deleted() && b.name() == name)
            .cloned()
    }

    fn find_by_slug(&self, slug: &Slug) -> Option<Brand> {
        let state = self.read().ok()?;
        state
            .brands
            .values()
            .find(|b| !b.is_deleted() && b.slug() == slug)
            .cloned()
    }

    fn list(&self) -> Vec<Brand> {
        let state = match self.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut brands: Vec<Brand> = state
            .brands
            .values()
            .filter(|b| !b.is_deleted())
            .cloned()
            .collect();
        brands.sort_by_key(|b| b.id_typed().0);
        brands
    }
}

impl ProductRepository for InMemoryStore {
    fn insert(&self, product: Product) -> StoreResult<()> {
        let mut state = self.write()?;
        check_product_uniques(&state, &product)?;
        check_product_refs(&state, &product)?;
        state.products.insert(product.id_typed(), product);
        Ok(())
    }

    fn update(&self, product: Product) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.products.contains_key(&product.id_typed()) {
            return Err(StoreError::NotFound);
        }
        check_product_uniques(&state, &product)?;
        check_product_refs(&state, &product)?;
        state.products.insert(product.id_typed(), product);
        Ok(())
    }

    fn get(&self, id: ProductId) -> Option<Product> {
        self.read().ok()?.products.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Product> {
        let state = self.read().ok()?;
        state
            .products
            .values()
            .find(|p| !p.is_deleted() && p.name() == name)
            .cloned()
    }

    fn find_by_slug(&self, slug: &Slug) -> Option<Product> {
        let state = self.read().ok()?;
        state
            .products
            .values()
            .find(|p| !p.is_deleted() && p.slug() == slug)
            .cloned()
    }

    fn find_by_sku(&self, sku: &str) -> Option<Product> {
        let state = self.read().ok()?;
        state
            .products
            .values()
            .find(|p| !p.is_deleted() && p.sku() == sku)
            .cloned()
    }

    fn list(&self) -> Vec<Product> {
        let state = match self.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| !p.is_deleted())
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id_typed().0);
        products
    }

    fn replace_categories(
        &self,
        product_id: ProductId,
        category_ids: Vec<CategoryId>,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.products.contains_key(&product_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "product {product_id} does not exist"
            )));
        }
        for category_id in &category_ids {
            if !state.categories.contains_key(category_id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "category {category_id} does not exist"
                )));
            }
        }
        state
            .product_categories
            .insert(product_id, category_ids.into_iter().collect());
        Ok(())
    }

    fn categories_of(&self, product_id: ProductId) -> Vec<CategoryId> {
        let state = match self.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        state
            .product_categories
            .get(&product_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl CategoryRepository for InMemoryStore {
    fn insert(&self, category: Category) -> StoreResult<()> {
        let mut state = self.write()?;
        check_category_uniques(&state, &category)?;
        state.categories.insert(category.id_typed(), category);
        Ok(())
    }

    fn update(&self, category: Category) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.categories.contains_key(&category.id_typed()) {
            return Err(StoreError::NotFound);
        }
        check_category_uniques(&state, &category)?;
        state.categories.insert(category.id_typed(), category);
        Ok(())
    }

    fn get(&self, id: CategoryId) -> Option<Category> {
        self.read().ok()?.categories.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Category> {
        let state = self.read().ok()?;
        state
            .categories
            .values()
            .find(|c| !c.is_deleted() && c.name() == name)
            .cloned()
    }

    fn find_by_slug(&self, slug: &Slug) -> Option<Category> {
        let state = self.read().ok()?;
        state
            .categories
            .values()
            .find(|c| !c.is_deleted() && c.slug() == slug)
            .cloned()
    }

    fn list(&self) -> Vec<Category> {
        let state = match self.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.id_typed().0);
        categories
    }
}

impl CustomerRepository for InMemoryStore {
    fn insert(&self, customer: Customer) -> StoreResult<()> {
        let mut state = self.write()?;
        state.customers.insert(customer.id_typed(), customer);
        Ok(())
    }

    fn update(&self, customer: Customer) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.customers.contains_key(&customer.id_typed()) {
            return Err(StoreError::NotFound);
        }
        state.customers.insert(customer.id_typed(), customer);
        Ok(())
    }

    fn get(&self, id: CustomerId) -> Option<Customer> {
        self.read().ok()?.customers.get(&id).cloned()
    }

    fn list(&self) -> Vec<Customer> {
        let state = match self.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut customers: Vec<Customer> = state.customers.values().cloned().collect();
        customers.sort_by_key(|c| c.id_typed().0);
        customers
    }
}

impl OrderRepository for InMemoryStore {
    fn insert(&self, order: Order) -> StoreResult<()> {
        let mut state = self.write()?;
        check_order_refs(&state, &order)?;
        state.orders.insert(order.id_typed(), order);
        Ok(())
    }

    fn update(&self, order: Order) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.orders.contains_key(&order.id_typed()) {
            return Err(StoreError::NotFound);
        }
        check_order_refs(&state, &order)?;
        state.orders.insert(order.id_typed(), order);
        Ok(())
    }

    fn get(&self, id: OrderId) -> Option<Order> {
        self.read().ok()?.orders.get(&id).cloned()
    }

    fn list(&self) -> Vec<Order> {
        let state = match self.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| !o.is_deleted())
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id_typed().0);
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use shopadmin_catalog::{
        CreateBrand, CreateCategory, CreateProduct, ProductType,
    };
    use shopadmin_core::RecordId;
    use shopadmin_customers::CreateCustomer;
    use shopadmin_orders::{CreateOrder, NewOrderItem, OrderStatus};

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn brand(name: &str) -> Brand {
        Brand::create(CreateBrand {
            brand_id: BrandId::new(RecordId::new()),
            name: name.to_string(),
            slug: None,
            url: None,
            description: None,
            is_visible: true,
            is_featured: false,
            published_at: None,
            primary_color: None,
            occurred_at: test_time(),
        })
        .unwrap()
    }

    fn product(name: &str, sku: &str) -> Product {
        Product::create(CreateProduct {
            product_id: ProductId::new(RecordId::new()),
            brand_id: None,
            name: name.to_string(),
            slug: None,
            sku: sku.to_string(),
            description: None,
            price: 1000,
            quantity: 10,
            kind: ProductType::Deliverable,
            is_visible: true,
            is_featured: false,
            published_at: None,
            image: None,
            occurred_at: test_time(),
        })
        .unwrap()
    }

    fn category(name: &str) -> Category {
        Category::create(CreateCategory {
            category_id: CategoryId::new(RecordId::new()),
            name: name.to_string(),
            slug: None,
            is_visible: true,
            occurred_at: test_time(),
        })
        .unwrap()
    }

    fn customer(name: &str) -> Customer {
        Customer::create(CreateCustomer {
            customer_id: CustomerId::new(RecordId::new()),
            name: name.to_string(),
            email: None,
            occurred_at: test_time(),
        })
        .unwrap()
    }

    #[test]
    fn brand_insert_and_get_round_trip() {
        let store = InMemoryStore::new();
        let b = brand("Acme Co");
        let id = b.id_typed();
        BrandRepository::insert(&store, b.clone()).unwrap();
        assert_eq!(BrandRepository::get(&store, id), Some(b));
    }

    #[test]
    fn duplicate_brand_slug_is_rejected() {
        let store = InMemoryStore::new();
        BrandRepository::insert(&store, brand("Acme Co")).unwrap();

        let err = BrandRepository::insert(&store, brand("Acme Co")).unwrap_err();
        match err {
            // Same name trips the name index before the slug index.
            StoreError::UniqueViolation { field: "name", .. } => {}
            _ => panic!("Expected UniqueViolation for duplicate name"),
        }
        assert_eq!(BrandRepository::list(&store).len(), 1);
    }

    #[test]
    fn update_ignores_own_row_in_uniqueness_scan() {
        let store = InMemoryStore::new();
        let mut b = brand("Acme Co");
        BrandRepository::insert(&store, b.clone()).unwrap();

        // Re-saving the same record under its own name/slug is fine.
        b.update(shopadmin_catalog::UpdateBrand {
            name: Some("Acme Co".to_string()),
            slug: None,
            url: Some("https://acme.example".to_string()),
            description: None,
            is_visible: None,
            is_featured: None,
            published_at: None,
            primary_color: None,
            occurred_at: test_time(),
        })
        .unwrap();
        BrandRepository::update(&store, b).unwrap();
    }

    #[test]
    fn soft_deleted_brand_releases_its_slug() {
        let store = InMemoryStore::new();
        let mut b = brand("Acme Co");
        BrandRepository::insert(&store, b.clone()).unwrap();
        b.soft_delete(test_time()).unwrap();
        BrandRepository::update(&store, b).unwrap();

        BrandRepository::insert(&store, brand("Acme Co")).unwrap();
        assert_eq!(BrandRepository::list(&store).len(), 1);
    }

    #[test]
    fn product_sku_is_unique_across_live_rows() {
        let store = InMemoryStore::new();
        ProductRepository::insert(&store, product("Widget", "SKU-001")).unwrap();

        let err = ProductRepository::insert(&store, product("Gadget", "SKU-001")).unwrap_err();
        match err {
            StoreError::UniqueViolation { field: "sku", .. } => {}
            _ => panic!("Expected UniqueViolation for duplicate SKU"),
        }
    }

    #[test]
    fn product_insert_requires_existing_brand() {
        let store = InMemoryStore::new();
        let mut cmd_product = product("Widget", "SKU-001");
        let missing = BrandId::new(RecordId::new());
        cmd_product
            .update(shopadmin_catalog::UpdateProduct {
                brand_id: Some(Some(missing)),
                name: None,
                slug: None,
                sku: None,
                description: None,
                price: None,
                quantity: None,
                kind: None,
                is_visible: None,
                is_featured: None,
                published_at: None,
                image: None,
                occurred_at: test_time(),
            })
            .unwrap();

        let err = ProductRepository::insert(&store, cmd_product).unwrap_err();
        match err {
            StoreError::ForeignKeyViolation(_) => {}
            _ => panic!("Expected ForeignKeyViolation for missing brand"),
        }
    }

    #[test]
    fn replace_categories_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let p = product("Widget", "SKU-001");
        let product_id = p.id_typed();
        ProductRepository::insert(&store, p).unwrap();

        let c = category("Tools");
        let good = c.id_typed();
        CategoryRepository::insert(&store, c).unwrap();
        store.replace_categories(product_id, vec![good]).unwrap();

        let missing = CategoryId::new(RecordId::new());
        let err = store
            .replace_categories(product_id, vec![good, missing])
            .unwrap_err();
        match err {
            StoreError::ForeignKeyViolation(_) => {}
            _ => panic!("Expected ForeignKeyViolation for missing category"),
        }
        // The previous attach survives the failed swap.
        assert_eq!(store.categories_of(product_id), vec![good]);
    }

    #[test]
    fn order_insert_requires_customer_and_products() {
        let store = InMemoryStore::new();
        let cust = customer("Jordan Miles");
        let customer_id = cust.id_typed();
        CustomerRepository::insert(&store, cust).unwrap();

        let p = product("Widget", "SKU-001");
        let product_id = p.id_typed();
        ProductRepository::insert(&store, p).unwrap();

        let order = Order::create(CreateOrder {
            order_id: OrderId::new(RecordId::new()),
            customer_id,
            status: OrderStatus::Pending,
            notes: None,
            items: vec![NewOrderItem {
                product_id,
                quantity: 2,
                unit_price: 1000,
            }],
            occurred_at: test_time(),
        })
        .unwrap();
        OrderRepository::insert(&store, order).unwrap();

        let bad = Order::create(CreateOrder {
            order_id: OrderId::new(RecordId::new()),
            customer_id,
            status: OrderStatus::Pending,
            notes: None,
            items: vec![NewOrderItem {
                product_id: ProductId::new(RecordId::new()),
                quantity: 1,
                unit_price: 100,
            }],
            occurred_at: test_time(),
        })
        .unwrap();
        let err = OrderRepository::insert(&store, bad).unwrap_err();
        match err {
            StoreError::ForeignKeyViolation(_) => {}
            _ => panic!("Expected ForeignKeyViolation for missing product"),
        }
        assert_eq!(OrderRepository::list(&store).len(), 1);
    }

    #[test]
    fn soft_deleting_product_preserves_order_item_snapshots() {
        let store = InMemoryStore::new();
        let cust = customer("Jordan Miles");
        let customer_id = cust.id_typed();
        CustomerRepository::insert(&store, cust).unwrap();

        let mut p = product("Widget", "SKU-001");
        let product_id = p.id_typed();
        ProductRepository::insert(&store, p.clone()).unwrap();

        let order = Order::create(CreateOrder {
            order_id: OrderId::new(RecordId::new()),
            customer_id,
            status: OrderStatus::Completed,
            notes: None,
            items: vec![NewOrderItem {
                product_id,
                quantity: 2,
                unit_price: 1000,
            }],
            occurred_at: test_time(),
        })
        .unwrap();
        let order_id = order.id_typed();
        OrderRepository::insert(&store, order).unwrap();

        p.soft_delete(test_time()).unwrap();
        ProductRepository::update(&store, p).unwrap();

        let stored = OrderRepository::get(&store, order_id).unwrap();
        assert_eq!(stored.items().len(), 1);
        assert_eq!(stored.items()[0].quantity, 2);
        assert_eq!(stored.items()[0].unit_price, 1000);
        assert_eq!(stored.total_price(), 2000);
    }

    #[test]
    fn lists_exclude_soft_deleted_rows() {
        let store = InMemoryStore::new();
        let mut keep = product("Widget", "SKU-001");
        ProductRepository::insert(&store, keep.clone()).unwrap();
        ProductRepository::insert(&store, product("Gadget", "SKU-002")).unwrap();

        keep.soft_delete(test_time()).unwrap();
        ProductRepository::update(&store, keep.clone()).unwrap();

        let listed = ProductRepository::list(&store);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name(), "Gadget");
        // Deleted rows are still reachable by id for history views.
        assert!(ProductRepository::get(&store, keep.id_typed()).is_some());
    }
}
