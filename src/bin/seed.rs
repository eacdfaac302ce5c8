use serde_json::json;
use storefront_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    category: &'static str,
    specs: &'static [&'static str],
    images: &'static [&'static str],
    stock_quantity: i32,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "5.5kVA Petrol Generator",
        description: "Key start generator for homes and small offices",
        price_cents: 45_000_000,
        category: "generator",
        specs: &["Power: 5.5kVA", "Fuel: Petrol", "Electric start", "Low noise"],
        images: &["generators/5-5kva.jpg"],
        stock_quantity: 12,
    },
    SeedProduct {
        name: "20kVA Diesel Generator",
        description: "Soundproof diesel set for commercial use",
        price_cents: 980_000_000,
        category: "generator",
        specs: &["Power: 20kVA", "Fuel: Diesel", "Soundproof canopy"],
        images: &["generators/20kva.jpg"],
        stock_quantity: 3,
    },
    SeedProduct {
        name: "Lithium Ore",
        description: "Spodumene concentrate",
        price_cents: 120_000,
        category: "mineral",
        specs: &[
            "Type: Lithium",
            "Grade: SC6",
            "Purity: 6%",
            "Unit: ton",
            "DisplayType: both",
        ],
        images: &["minerals/lithium.jpg"],
        stock_quantity: 40,
    },
    SeedProduct {
        name: "Tantalite",
        description: "Tantalum bearing ore",
        price_cents: 85_000,
        category: "mineral",
        specs: &["Type: Tantalite", "Grade: A", "Purity: 30%", "DisplayType: showcase"],
        images: &[],
        stock_quantity: 0,
    },
    SeedProduct {
        name: "Gold Dust",
        description: "Alluvial gold",
        price_cents: 6_500_000,
        category: "mineral",
        specs: &[
            "Type: Gold",
            "Purity: 92%",
            "Unit: gram",
            "Availability: limited",
            "DisplayType: for-sale",
        ],
        images: &["https://cdn.example.com/minerals/gold.jpg"],
        stock_quantity: 500,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 1).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_admin(&pool, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD).await?;
    let inserted = seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, new products: {inserted}");
    Ok(())
}

async fn ensure_admin(pool: &DbPool, username: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // Existing admins keep their password; only the role is reasserted.
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (username) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Ensured admin user {username}");
    Ok(id)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for product in PRODUCTS {
        let result = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, category, specs, images, stock_quantity)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.description)
        .bind(product.price_cents)
        .bind(product.category)
        .bind(json!(product.specs))
        .bind(json!(product.images))
        .bind(product.stock_quantity)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    println!("Seeded products");
    Ok(inserted)
}
