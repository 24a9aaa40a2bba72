use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CategoryPayload, CategoryRequest},
    entity::{
        Categories,
        categories::{ActiveModel as CategoryActive, Column as CategoryCol},
    },
    error::{AppError, AppResult, OrFail},
    models::Category,
    response::{ApiResponse, Empty},
    slug::slugify,
    state::AppState,
};

fn required_name(payload: &CategoryRequest) -> AppResult<String> {
    payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::MissingName("Name is required".into()))
}

/// An exact-name duplicate is answered as a success and nothing is written.
pub async fn create_category(
    state: &AppState,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<CategoryPayload>> {
    const FAILED: &str = "Error in Category";
    let name = required_name(&payload)?;

    let existing = Categories::find()
        .filter(CategoryCol::Name.eq(name.as_str()))
        .one(state.db())
        .await
        .or_fail(FAILED)?;
    if existing.is_some() {
        return Ok(ApiResponse::success(
            "Category Already Exists",
            CategoryPayload { category: None },
        ));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        slug: Set(slugify(&name)),
        name: Set(name),
    }
    .insert(state.db())
    .await
    .or_fail(FAILED)?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
    Ok(ApiResponse::created(
        "new category created",
        CategoryPayload {
            category: Some(category.into()),
        },
    ))
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<CategoryPayload>> {
    let name = required_name(&payload)?;

    let category = CategoryActive {
        id: Set(id),
        slug: Set(slugify(&name)),
        name: Set(name),
    }
    .update(state.db())
    .await
    .or_fail("Error while updating category")?;

    Ok(ApiResponse::success(
        "Category Updated Successfully",
        CategoryPayload {
            category: Some(category.into()),
        },
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let category = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(state.db())
        .await
        .or_fail("Error while getting all categories")?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "All Categories List",
        CategoryList { category },
    ))
}

/// A slug that matches nothing still succeeds, with no `category` in the body.
pub async fn single_category(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<CategoryPayload>> {
    let category = Categories::find()
        .filter(CategoryCol::Slug.eq(slug.to_lowercase()))
        .one(state.db())
        .await
        .or_fail("Error While getting Single Category")?
        .map(Category::from);

    Ok(ApiResponse::success(
        "Get Single Category Successfully",
        CategoryPayload { category },
    ))
}

pub async fn delete_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Empty>> {
    Categories::delete_by_id(id)
        .exec(state.db())
        .await
        .or_fail("Error while deleting category")?;

    Ok(ApiResponse::success("Category Deleted Successfully", Empty {}))
}
