use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use shopfront_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{
        Categories, Products, Users,
        categories::{ActiveModel as CategoryActive, Column as CategoryCol},
        products::{ActiveModel as ProductActive, Column as ProductCol},
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    models::Role,
    services::auth_service::hash_password,
    slug::slugify,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Admin", "admin@example.com", "admin123", Role::Admin).await?;
    let user_id = ensure_user(&orm, "Jane", "user@example.com", "user123", Role::Customer).await?;

    let electronics = ensure_category(&orm, "Electronics").await?;
    let books = ensure_category(&orm, "Books").await?;
    ensure_category(&orm, "Clothing").await?;

    let products = [
        ("Laptop", "Thin and light laptop", Decimal::new(149_900, 2), electronics, 10, true),
        ("Smartphone", "Android phone with a big screen", Decimal::new(49_900, 2), electronics, 25, true),
        ("Wireless Earbuds", "Noise cancelling earbuds", Decimal::new(7_999, 2), electronics, 40, true),
        ("The Rust Book", "Learn Rust from the ground up", Decimal::new(3_950, 2), books, 100, false),
        ("Novel", "A page-turner", Decimal::new(1_499, 2), books, 60, false),
    ];
    for (name, description, price, category_id, quantity, shipping) in products {
        ensure_product(&orm, name, description, price, category_id, quantity, shipping).await?;
    }

    tracing::info!(%admin_id, %user_id, "seed completed");
    Ok(())
}

async fn ensure_user(
    orm: &OrmConn,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let now = Utc::now().fixed_offset();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        email: Set(email.to_owned()),
        password: Set(hash_password(password)?),
        phone: Set("555-0100".to_owned()),
        address: Set("1 Main Street".to_owned()),
        answer: Set("blue".to_owned()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(orm)
    .await?;

    tracing::info!(email, ?role, "user created");
    Ok(user.id)
}

async fn ensure_category(orm: &OrmConn, name: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = Categories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        slug: Set(slugify(name)),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}

async fn ensure_product(
    orm: &OrmConn,
    name: &str,
    description: &str,
    price: Decimal,
    category_id: Uuid,
    quantity: i32,
    shipping: bool,
) -> anyhow::Result<()> {
    let slug = slugify(name);
    let exists = Products::find()
        .filter(ProductCol::Slug.eq(slug.as_str()))
        .one(orm)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let now = Utc::now().fixed_offset();
    ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        slug: Set(slug),
        description: Set(description.to_owned()),
        price: Set(price),
        category_id: Set(category_id),
        quantity: Set(quantity),
        shipping: Set(shipping),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(orm)
    .await?;
    tracing::info!(name, "product created");
    Ok(())
}
