// ketoan-client/examples/list_business_owners.rs
// Sign in as an admin and page through the business owner list

use std::sync::Arc;

use ketoan_client::views::BusinessOwnersView;
use ketoan_client::{AdminApi, AuthApi, ClientConfig, FetchOutcome, PageLink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <email> <password> [search]", args[0]);
        println!("  Example: {} admin@ketoan.vn secret Minh", args[0]);
        return Ok(());
    }
    let search = args.get(3).cloned().unwrap_or_default();

    let config = ClientConfig::from_env();
    let session = config.build_session_store();
    let client = Arc::new(config.build_http_client(session)?);

    let auth = AuthApi::new(client.clone());
    let me = auth.login(&args[1], &args[2]).await?;
    tracing::info!("Logged in as: {} ({})", me.user.full_name, me.user.role);

    let admin = AdminApi::from_config(client, &config);
    let owners = admin.controller(BusinessOwnersView);

    let outcome = owners.set_search_text(search).settled().await;
    let snapshot = owners.snapshot();
    if outcome != FetchOutcome::Loaded {
        match &snapshot.error {
            Some(e) => tracing::error!("Failed to load business owners: {}", e),
            None => tracing::error!("Business owner fetch ended as {:?}", outcome),
        }
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No business owners match {:?}", snapshot.query.search);
        return Ok(());
    }

    for owner in snapshot.rows() {
        println!(
            "{:<32} {:<12} {:>4} employees  {}",
            owner.business_name,
            owner.business_status.as_filter(),
            owner.employee_count,
            owner.address.one_line()
        );
    }

    if let Some(pagination) = snapshot.pagination() {
        println!(
            "Showing {}-{} of {}",
            pagination.first_item, pagination.last_item, pagination.total
        );
        if pagination.show_controls {
            let bar: Vec<String> = pagination
                .links
                .iter()
                .map(|link| match link {
                    PageLink::Page(page) if *page == pagination.current => format!("[{page}]"),
                    PageLink::Page(page) => page.to_string(),
                    PageLink::Ellipsis => "…".to_string(),
                })
                .collect();
            println!("{}", bar.join(" "));
        }
    }

    Ok(())
}
