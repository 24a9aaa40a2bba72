pub mod auth;
pub mod categories;
pub mod orders;
pub mod payment;
pub mod products;
