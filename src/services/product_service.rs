use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, OnConflict, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CategoryProducts, PhotoUpload, ProductCount, ProductFilters, ProductForm, ProductList,
        Products as ProductsPayload, SavedProduct, SingleProduct, ValidProduct,
    },
    entity::{
        Categories, ProductPhotos, Products,
        categories::Column as CategoryCol,
        product_photos::{ActiveModel as PhotoActive, Column as PhotoCol},
        products::{ActiveModel as ProductActive, Column as ProductCol, Model as ProductModel},
    },
    error::{AppError, AppResult, OrFail},
    models::{Category, Product},
    response::{ApiResponse, Empty},
    slug::slugify,
    state::AppState,
};

pub const LATEST_LIMIT: u64 = 12;
pub const PER_PAGE: u64 = 6;
pub const RELATED_LIMIT: u64 = 3;

/// Escapes LIKE wildcards so a keyword only ever matches literally.
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Builds the WHERE clause of the storefront filter panel.
pub fn filter_condition(filters: &ProductFilters) -> Condition {
    let mut condition = Condition::all();
    if !filters.checked.is_empty() {
        condition = condition.add(ProductCol::CategoryId.is_in(filters.checked.iter().copied()));
    }
    if let Some((min, max)) = filters.price_range() {
        condition = condition
            .add(ProductCol::Price.gte(min))
            .add(ProductCol::Price.lte(max));
    }
    condition
}

fn populated(rows: Vec<(ProductModel, Option<crate::entity::categories::Model>)>) -> Vec<Product> {
    rows.into_iter()
        .map(|(product, category)| Product::from_entity(product, category))
        .collect()
}

async fn store_photo<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    photo: PhotoUpload,
) -> Result<(), sea_orm::DbErr> {
    ProductPhotos::insert(PhotoActive {
        product_id: Set(product_id),
        data: Set(photo.data),
        content_type: Set(photo.content_type),
    })
    .on_conflict(
        OnConflict::column(PhotoCol::ProductId)
            .update_columns([PhotoCol::Data, PhotoCol::ContentType])
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

async fn save_product(
    state: &AppState,
    product: ProductActive,
    photo: Option<PhotoUpload>,
    insert: bool,
) -> Result<ProductModel, sea_orm::DbErr> {
    let txn = state.db().begin().await?;
    let saved = if insert {
        product.insert(&txn).await?
    } else {
        product.update(&txn).await?
    };
    if let Some(photo) = photo {
        store_photo(&txn, saved.id, photo).await?;
    }
    txn.commit().await?;
    Ok(saved)
}

fn product_columns(valid: ValidProduct) -> (ProductActive, Option<PhotoUpload>) {
    let now = Utc::now().fixed_offset();
    let active = ProductActive {
        id: NotSet,
        slug: Set(slugify(&valid.name)),
        name: Set(valid.name),
        description: Set(valid.description),
        price: Set(valid.price),
        category_id: Set(valid.category_id),
        quantity: Set(valid.quantity),
        shipping: Set(valid.shipping),
        created_at: NotSet,
        updated_at: Set(now),
    };
    (active, valid.photo)
}

pub async fn create_product(
    state: &AppState,
    form: ProductForm,
) -> AppResult<ApiResponse<SavedProduct>> {
    let valid = form.validate()?;
    match &valid.photo {
        None => return Err(AppError::Validation("photo is Required".into())),
        Some(photo) if photo.too_large() => {
            return Err(AppError::Validation("photo should be less than 1mb".into()));
        }
        Some(_) => {}
    }

    let (mut active, photo) = product_columns(valid);
    active.id = Set(Uuid::new_v4());
    active.created_at = active.updated_at.clone();

    let saved = save_product(state, active, photo, true)
        .await
        .or_fail("Error in creating product")?;

    tracing::info!(product_id = %saved.id, slug = %saved.slug, "product created");
    Ok(ApiResponse::created(
        "Product Created Successfully",
        SavedProduct {
            products: Product::from_entity(saved, None),
        },
    ))
}

/// Same field rules as create; the photo is optional and replaced only when sent.
pub async fn update_product(
    state: &AppState,
    id: Uuid,
    form: ProductForm,
) -> AppResult<ApiResponse<SavedProduct>> {
    let valid = form.validate()?;
    if valid.photo.as_ref().is_some_and(PhotoUpload::too_large) {
        return Err(AppError::Validation(
            "Photo is required and should be less then 1mb".into(),
        ));
    }

    let (mut active, photo) = product_columns(valid);
    active.id = Set(id);

    let saved = save_product(state, active, photo, false)
        .await
        .or_fail("Error in Update product")?;

    Ok(ApiResponse::created(
        "Product Updated Successfully",
        SavedProduct {
            products: Product::from_entity(saved, None),
        },
    ))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Empty>> {
    Products::delete_by_id(id)
        .exec(state.db())
        .await
        .or_fail("Error while deleting product")?;

    Ok(ApiResponse::success("Product Deleted successfully", Empty {}))
}

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let rows = Products::find()
        .find_also_related(Categories)
        .order_by_desc(ProductCol::CreatedAt)
        .limit(LATEST_LIMIT)
        .all(state.db())
        .await
        .or_fail("Error in getting products")?;

    let products = populated(rows);
    Ok(ApiResponse::success(
        "All Products",
        ProductList {
            count_total: products.len(),
            products,
        },
    ))
}

pub async fn single_product(state: &AppState, slug: &str) -> AppResult<ApiResponse<SingleProduct>> {
    let (product, category) = Products::find()
        .filter(ProductCol::Slug.eq(slug))
        .find_also_related(Categories)
        .one(state.db())
        .await
        .or_fail("Error while getting single product")?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    Ok(ApiResponse::success(
        "Single Product Fetched",
        SingleProduct {
            product: Product::from_entity(product, category),
        },
    ))
}

/// Returns the stored photo bytes and their content type.
pub async fn product_photo(state: &AppState, id: Uuid) -> AppResult<PhotoUpload> {
    let photo = ProductPhotos::find_by_id(id)
        .one(state.db())
        .await
        .or_fail("Error while getting photo")?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;

    Ok(PhotoUpload {
        data: photo.data,
        content_type: photo.content_type,
    })
}

pub async fn filter_products(
    state: &AppState,
    filters: ProductFilters,
) -> AppResult<ApiResponse<ProductsPayload>> {
    let products = Products::find()
        .filter(filter_condition(&filters))
        .order_by_desc(ProductCol::CreatedAt)
        .all(state.db())
        .await
        .or_reject("Error While Filtering Products")?
        .into_iter()
        .map(|product| Product::from_entity(product, None))
        .collect();

    Ok(ApiResponse::success("Filtered Products", ProductsPayload { products }))
}

pub async fn product_count(state: &AppState) -> AppResult<ApiResponse<ProductCount>> {
    let total = Products::find()
        .count(state.db())
        .await
        .or_reject("Error in product count")?;

    Ok(ApiResponse::success("Product Count", ProductCount { total }))
}

/// Pages are 1-based; zero is treated as the first page.
pub async fn product_page(state: &AppState, page: u64) -> AppResult<ApiResponse<ProductsPayload>> {
    let offset = (page.max(1) - 1)
        .checked_mul(PER_PAGE)
        .ok_or_else(|| AppError::BadRequest("Error in per page ctrl".into()))?;
    let products = Products::find()
        .order_by_desc(ProductCol::CreatedAt)
        .offset(offset)
        .limit(PER_PAGE)
        .all(state.db())
        .await
        .or_reject("Error in per page ctrl")?
        .into_iter()
        .map(|product| Product::from_entity(product, None))
        .collect();

    Ok(ApiResponse::success("Products Page", ProductsPayload { products }))
}

/// Case-insensitive match on name or description, answered as a bare array.
pub async fn search_products(state: &AppState, keyword: &str) -> AppResult<Vec<Product>> {
    let pattern = like_pattern(keyword);
    let products = Products::find()
        .filter(
            Condition::any()
                .add(Expr::col(ProductCol::Name).ilike(pattern.clone()))
                .add(Expr::col(ProductCol::Description).ilike(pattern)),
        )
        .order_by_desc(ProductCol::CreatedAt)
        .all(state.db())
        .await
        .or_reject("Error In Search Product API")?
        .into_iter()
        .map(|product| Product::from_entity(product, None))
        .collect();

    Ok(products)
}

pub async fn related_products(
    state: &AppState,
    product_id: Uuid,
    category_id: Uuid,
) -> AppResult<ApiResponse<ProductsPayload>> {
    let rows = Products::find()
        .filter(ProductCol::CategoryId.eq(category_id))
        .filter(ProductCol::Id.ne(product_id))
        .find_also_related(Categories)
        .limit(RELATED_LIMIT)
        .all(state.db())
        .await
        .or_reject("Error while getting related product")?;

    Ok(ApiResponse::success(
        "Related Products",
        ProductsPayload {
            products: populated(rows),
        },
    ))
}

pub async fn products_by_category(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<CategoryProducts>> {
    const FAILED: &str = "Error While Getting products";

    let category = Categories::find()
        .filter(CategoryCol::Slug.eq(slug.to_lowercase()))
        .one(state.db())
        .await
        .or_reject(FAILED)?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let products = Products::find()
        .filter(ProductCol::CategoryId.eq(category.id))
        .order_by_desc(ProductCol::CreatedAt)
        .all(state.db())
        .await
        .or_reject(FAILED)?
        .into_iter()
        .map(|product| Product::from_entity(product, Some(category.clone())))
        .collect();

    Ok(ApiResponse::success(
        "Category Products",
        CategoryProducts {
            category: Category::from(category),
            products,
        },
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("lap"), "%lap%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn filter_condition_uses_categories_and_price_range() {
        let category = Uuid::nil();
        let filters = ProductFilters {
            checked: vec![category],
            radio: vec![Decimal::new(20, 0), Decimal::new(40, 0)],
        };
        let sql = Products::find()
            .filter(filter_condition(&filters))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""products"."category_id" IN ("#));
        assert!(sql.contains(r#""products"."price" >="#));
        assert!(sql.contains(r#""products"."price" <="#));
    }

    #[test]
    fn filter_condition_ignores_incomplete_price_range() {
        let filters = ProductFilters {
            checked: vec![],
            radio: vec![Decimal::new(20, 0)],
        };
        let sql = Products::find()
            .filter(filter_condition(&filters))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("price"));
    }
}
