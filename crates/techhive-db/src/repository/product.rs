//! SurrealDB implementation of [`ProductRepository`].
//!
//! The vote mutation is issued as a single guarded UPDATE so the
//! count increment and voter-set insertion land together; the
//! invariant `upvote_count == voted_users.len()` holds even when two
//! voters race on the same product.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use techhive_core::error::{HiveError, HiveResult};
use techhive_core::models::product::{
    ACCEPTED_PAGE_SIZE, AcceptedPage, AcceptedQuery, CreateProduct, ModerationUpdate, Product,
    ProductStatus, SortOrder, UpdateProductDetails,
};
use techhive_core::repository::ProductRepository;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ProductRow {
    owner_email: String,
    name: String,
    image: String,
    description: String,
    external_link: Option<String>,
    tags: Vec<String>,
    status: String,
    featured: bool,
    upvote_count: u32,
    voted_users: Vec<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ProductRowWithId {
    record_id: String,
    owner_email: String,
    name: String,
    image: String,
    description: String,
    external_link: Option<String>,
    tags: Vec<String>,
    status: String,
    featured: bool,
    upvote_count: u32,
    voted_users: Vec<String>,
    created_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<ProductStatus, DbError> {
    match s {
        "Pending" => Ok(ProductStatus::Pending),
        "Accepted" => Ok(ProductStatus::Accepted),
        "Rejected" => Ok(ProductStatus::Rejected),
        other => Err(DbError::Migration(format!(
            "unknown product status: {other}"
        ))),
    }
}

fn status_to_string(s: ProductStatus) -> &'static str {
    match s {
        ProductStatus::Pending => "Pending",
        ProductStatus::Accepted => "Accepted",
        ProductStatus::Rejected => "Rejected",
    }
}

impl ProductRow {
    fn into_product(self, id: Uuid) -> Result<Product, DbError> {
        Ok(Product {
            id,
            owner_email: self.owner_email,
            name: self.name,
            image: self.image,
            description: self.description,
            external_link: self.external_link,
            tags: self.tags,
            status: parse_status(&self.status)?,
            featured: self.featured,
            upvote_count: self.upvote_count,
            voted_users: self.voted_users,
            created_at: self.created_at,
        })
    }
}

impl ProductRowWithId {
    fn try_into_product(self) -> Result<Product, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Product {
            id,
            owner_email: self.owner_email,
            name: self.name,
            image: self.image,
            description: self.description,
            external_link: self.external_link,
            tags: self.tags,
            status: parse_status(&self.status)?,
            featured: self.featured,
            upvote_count: self.upvote_count,
            voted_users: self.voted_users,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Tag filter clause shared by the accepted-listing count and page
/// queries. The case-insensitive substring test runs per tag, so a
/// search term never matches across tag boundaries.
const TAG_FILTER: &str =
    "array::any(array::map(tags, |$tag| string::contains(string::lowercase($tag), $search)))";

/// SurrealDB implementation of the Product repository.
pub struct SurrealProductRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealProductRepository<C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<C: Connection> SurrealProductRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProductRepository for SurrealProductRepository<C> {
    async fn create(&self, input: CreateProduct) -> HiveResult<Product> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('product', $id) SET \
                 owner_email = $owner_email, \
                 name = $name, \
                 image = $image, \
                 description = $description, \
                 external_link = $external_link, \
                 tags = $tags, \
                 status = 'Pending', \
                 featured = false, \
                 upvote_count = 0, \
                 voted_users = []",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_email", input.owner_email))
            .bind(("name", input.name))
            .bind(("image", input.image))
            .bind(("description", input.description))
            .bind(("external_link", input.external_link))
            .bind(("tags", input.tags))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HiveResult<Product> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('product', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn list(&self, owner: Option<&str>) -> HiveResult<Vec<Product>> {
        let products = match owner {
            Some(email) => {
                let mut result = self
                    .db
                    .query(
                        "SELECT meta::id(id) AS record_id, * FROM product \
                         WHERE owner_email = $owner \
                         ORDER BY created_at ASC",
                    )
                    .bind(("owner", email.to_string()))
                    .await
                    .map_err(DbError::from)?;
                let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
                rows.into_iter()
                    .map(|row| row.try_into_product())
                    .collect::<Result<Vec<_>, DbError>>()?
            }
            None => {
                let mut result = self
                    .db
                    .query(
                        "SELECT meta::id(id) AS record_id, * FROM product \
                         ORDER BY created_at ASC",
                    )
                    .await
                    .map_err(DbError::from)?;
                let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
                rows.into_iter()
                    .map(|row| row.try_into_product())
                    .collect::<Result<Vec<_>, DbError>>()?
            }
        };

        Ok(products)
    }

    async fn list_accepted(&self, query: AcceptedQuery) -> HiveResult<AcceptedPage> {
        let page = query.page.max(1);
        let search = query.search.filter(|s| !s.is_empty());
        let search_lower = search.as_deref().map(str::to_lowercase);

        let mut conditions = String::from("status = 'Accepted'");
        if search_lower.is_some() {
            conditions.push_str(" AND ");
            conditions.push_str(TAG_FILTER);
        }

        // Total count for the same filter, for page arithmetic.
        let count_query =
            format!("SELECT count() AS total FROM product WHERE {conditions} GROUP ALL");
        let mut count_builder = self.db.query(&count_query);
        if let Some(ref s) = search_lower {
            count_builder = count_builder.bind(("search", s.clone()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let order = match query.sort {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        let page_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM product \
             WHERE {conditions} \
             ORDER BY upvote_count {order} \
             LIMIT $limit START $start"
        );

        let mut builder = self
            .db
            .query(&page_query)
            .bind(("limit", ACCEPTED_PAGE_SIZE as u64))
            .bind(("start", (page - 1) as u64 * ACCEPTED_PAGE_SIZE as u64));
        if let Some(s) = search_lower {
            builder = builder.bind(("search", s));
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
        let products = rows
            .into_iter()
            .map(|row| row.try_into_product())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(AcceptedPage {
            products,
            total_pages: total.div_ceil(ACCEPTED_PAGE_SIZE as u64) as u32,
            current_page: page,
        })
    }

    async fn list_featured(&self) -> HiveResult<Vec<Product>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 WHERE featured = true \
                 ORDER BY created_at DESC \
                 LIMIT 4",
            )
            .await
            .map_err(DbError::from)?;
        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
        let products = rows
            .into_iter()
            .map(|row| row.try_into_product())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(products)
    }

    async fn list_trending(&self) -> HiveResult<Vec<Product>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 ORDER BY upvote_count DESC \
                 LIMIT 6",
            )
            .await
            .map_err(DbError::from)?;
        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
        let products = rows
            .into_iter()
            .map(|row| row.try_into_product())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(products)
    }

    async fn update_details(&self, id: Uuid, input: UpdateProductDetails) -> HiveResult<Product> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.image.is_some() {
            sets.push("image = $image");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.external_link.is_some() {
            sets.push("external_link = $external_link");
        }
        if input.tags.is_some() {
            sets.push("tags = $tags");
        }

        let query = if sets.is_empty() {
            "UPDATE type::record('product', $id)".to_string()
        } else {
            format!(
                "UPDATE type::record('product', $id) SET {}",
                sets.join(", ")
            )
        };

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(image) = input.image {
            builder = builder.bind(("image", image));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(external_link) = input.external_link {
            builder = builder.bind(("external_link", external_link));
        }
        if let Some(tags) = input.tags {
            builder = builder.bind(("tags", tags));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn moderate(&self, id: Uuid, input: ModerationUpdate) -> HiveResult<Product> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.featured.is_some() {
            sets.push("featured = $featured");
        }

        // A request touching neither field is a no-op write.
        let query = if sets.is_empty() {
            "UPDATE type::record('product', $id)".to_string()
        } else {
            format!(
                "UPDATE type::record('product', $id) SET {}",
                sets.join(", ")
            )
        };

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(featured) = input.featured {
            builder = builder.bind(("featured", featured));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn cast_vote(&self, id: Uuid, voter: &str) -> HiveResult<Product> {
        let product = self.get_by_id(id).await?;

        if product.owner_email == voter {
            return Err(HiveError::SelfVoteForbidden);
        }
        if product.voted_users.iter().any(|v| v == voter) {
            return Err(HiveError::DuplicateVote);
        }

        // Increment and voter insertion in one guarded statement; the
        // guard re-checks membership so a concurrent duplicate loses.
        let result = self
            .db
            .query(
                "UPDATE type::record('product', $id) SET \
                 upvote_count += 1, \
                 voted_users += $voter \
                 WHERE voted_users CONTAINSNOT $voter",
            )
            .bind(("id", id.to_string()))
            .bind(("voter", voter.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(HiveError::DuplicateVote)?;

        Ok(row.into_product(id)?)
    }

    async fn delete(&self, id: Uuid) -> HiveResult<()> {
        self.db
            .query("DELETE type::record('product', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn count_by_owner(&self, owner: &str) -> HiveResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM product \
                 WHERE owner_email = $owner GROUP ALL",
            )
            .bind(("owner", owner.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_total(&self) -> HiveResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM product GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_by_status(&self, status: ProductStatus) -> HiveResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM product \
                 WHERE status = $status GROUP ALL",
            )
            .bind(("status", status_to_string(status).to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
