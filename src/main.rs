use anyhow::Context;
use immo_search::config::{AppConfig, BackendKind};
use immo_search::geocoding::Geocoder;
use immo_search::notify::NotificationLevel;
use immo_search::search::{
    HttpSearchBackend, InMemorySearchBackend, SearchBackend, SearchFilters, SearchSession,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Immo Search");
    info!("==============");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let keyword = std::env::args().nth(1).unwrap_or_default();
    let address = std::env::var("IMMO_ADDRESS").ok();

    match config.backend {
        BackendKind::Http => {
            let backend = HttpSearchBackend::new(&config)?;
            let geocoder = Geocoder::from_config(&config, config.http_client()?)?;
            info!("Searching {}", backend.endpoint());
            run(backend, geocoder, &config, keyword, address).await
        }
        BackendKind::Memory => {
            info!("Searching the built-in demo catalogue");
            run(
                InMemorySearchBackend::demo(),
                Geocoder::offline(),
                &config,
                keyword,
                address,
            )
            .await
        }
    }
}

async fn run<B: SearchBackend>(
    backend: B,
    geocoder: Geocoder,
    config: &AppConfig,
    keyword: String,
    address: Option<String>,
) -> anyhow::Result<()> {
    let filters = SearchFilters::default()
        .with_keyword(keyword)
        .with_radius(Some(config.default_radius_m))
        .with_limit(Some(config.default_page_size));
    let mut session = SearchSession::with_filters(backend, filters);

    if let Some(address) = address {
        if let Err(err) = session.apply_geocode(&geocoder, &address).await {
            warn!("Continuing without a location: {}", err);
        }
    }

    let outcome = session.run_search().await.map(|_| ());

    for notification in session.drain_notifications() {
        match notification.level {
            NotificationLevel::Success => info!("✅ {}", notification.message),
            NotificationLevel::Error => warn!("❌ {}", notification.message),
        }
    }
    outcome.context("Search failed")?;

    let page = session.results();
    info!(
        "\nFound {} properties (page {} of {})\n",
        page.meta.total, page.meta.page, page.meta.total_pages
    );

    for (i, property) in page.items.iter().enumerate() {
        println!("{}. {} ({} FCFA)", i + 1, property.name, property.price);
        println!("   {} · {}", property.category, property.status);
        if let (Some(surface), Some(rooms)) = (property.surface, property.rooms) {
            println!("   {} pièces, {} m²", rooms, surface);
        }
        if let Some(rating) = property.rating {
            println!("   Note: {:.1} ({} avis)", rating, property.review_count);
        }
        println!("   ID: {}", property.id);
        println!();
    }

    let json = serde_json::to_string_pretty(&page.items)?;
    tokio::fs::write("search_results.json", json).await?;
    info!("💾 Saved {} properties to search_results.json", page.len());

    Ok(())
}
