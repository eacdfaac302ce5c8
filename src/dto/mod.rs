pub mod analytics;
pub mod auth;
pub mod checkout;
pub mod customers;
pub mod orders;
pub mod products;
pub mod returns;
