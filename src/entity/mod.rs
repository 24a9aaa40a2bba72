pub mod categories;
pub mod order_products;
pub mod orders;
pub mod product_photos;
pub mod products;
pub mod sea_orm_active_enums;
pub mod users;

pub use categories::Entity as Categories;
pub use order_products::Entity as OrderProducts;
pub use orders::Entity as Orders;
pub use product_photos::Entity as ProductPhotos;
pub use products::Entity as Products;
pub use users::Entity as Users;
