use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{
    app::build_app,
    config::AppConfig,
    db::{create_pool, run_migrations},
    payment::{DisabledGateway, PaymentGateway, PaystackGateway},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&pool).await?;

    let gateway: Arc<dyn PaymentGateway> = match &config.paystack_secret_key {
        Some(key) => Arc::new(PaystackGateway::new(key, &config.paystack_base_url)?),
        None => {
            tracing::warn!("PAYSTACK_SECRET_KEY not set, payment verification disabled");
            Arc::new(DisabledGateway)
        }
    };

    let state = AppState::new(pool, gateway, &config.jwt_secret);
    let app = build_app(state, &config.cors_origins);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
