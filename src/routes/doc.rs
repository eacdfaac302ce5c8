use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{DisplayPlacement, OrderStatus, ProductCategory, ProductSpecs, ReturnStatus},
    domain::product_specs::{GeneratorSpecs, MineralSpecs},
    dto::{
        analytics::{
            CustomerAnalytics, GeographicSales, ProductSales, SalesSummary, SalesTrendPoint,
            SalesTrends, StateSales, TopCustomer,
        },
        auth::{LoginRequest, LoginResponse, LogoutResponse},
        checkout::{
            CartItem, CheckoutKind, CheckoutReceipt, CheckoutRequest, ContactInfo,
            UpdateStatusByNumberRequest, VerifyPaymentRequest, VerifyPaymentResponse,
        },
        customers::CustomerList,
        orders::{BulkUpdateRequest, BulkUpdateResult, OrderList, OrderUpdated, UpdateOrderStatusRequest},
        products::{CreateProductRequest, MineralCard, MineralList, ProductList, UpdateProductRequest},
        returns::{CreateReturnRequest, ReturnList, UpdateReturnRequest},
    },
    models::{AdminUser, Customer, Order, OrderListing, Product, ReturnListing, ReturnRequest},
    payment::PaymentVerification,
    response::{ApiResponse, Meta},
    routes::{admin, analytics, auth, checkout, health, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        checkout::create_order,
        checkout::create_payment,
        checkout::verify_payment,
        checkout::update_order_status,
        products::list_products,
        products::list_minerals,
        products::list_showcase_minerals,
        products::list_buyable_minerals,
        products::admin_list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        admin::list_orders,
        admin::update_order_status,
        admin::bulk_update_orders,
        admin::list_customers,
        admin::list_returns,
        admin::create_return,
        admin::update_return,
        analytics::sales_summary,
        analytics::sales_trends,
        analytics::geographic_sales,
        analytics::customer_analytics
    ),
    components(
        schemas(
            AdminUser,
            Product,
            ProductCategory,
            ProductSpecs,
            GeneratorSpecs,
            MineralSpecs,
            DisplayPlacement,
            Customer,
            Order,
            OrderListing,
            OrderStatus,
            ReturnRequest,
            ReturnListing,
            ReturnStatus,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            ContactInfo,
            CartItem,
            CheckoutRequest,
            CheckoutKind,
            CheckoutReceipt,
            VerifyPaymentRequest,
            VerifyPaymentResponse,
            PaymentVerification,
            UpdateStatusByNumberRequest,
            UpdateOrderStatusRequest,
            BulkUpdateRequest,
            BulkUpdateResult,
            OrderList,
            OrderUpdated,
            CustomerList,
            CreateReturnRequest,
            UpdateReturnRequest,
            ReturnList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            MineralCard,
            MineralList,
            ProductSales,
            SalesSummary,
            SalesTrendPoint,
            SalesTrends,
            StateSales,
            GeographicSales,
            TopCustomer,
            CustomerAnalytics,
            params::Pagination,
            params::SortOrder,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderList>,
            ApiResponse<CheckoutReceipt>,
            ApiResponse<SalesSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Admin session endpoints"),
        (name = "Checkout", description = "Order intake and payment endpoints"),
        (name = "Catalog", description = "Public product and mineral listings"),
        (name = "Products", description = "Admin product management"),
        (name = "Admin", description = "Order and customer administration"),
        (name = "Returns", description = "Return requests"),
        (name = "Analytics", description = "Sales reporting"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
