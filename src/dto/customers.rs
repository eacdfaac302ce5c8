use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Customer;

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<Customer>,
}
