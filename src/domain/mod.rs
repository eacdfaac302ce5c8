//! Pure storefront rules shared by the services: status machines, spec-list
//! derivation and checkout arithmetic. Nothing in here touches the database.

pub mod checkout;
pub mod order_status;
pub mod product_specs;
pub mod return_status;

pub use checkout::{allocate_shipping, generate_order_number, line_tracking_number};
pub use order_status::{OrderStatus, TransitionError};
pub use product_specs::{DisplayPlacement, ProductCategory, ProductSpecs};
pub use return_status::ReturnStatus;
