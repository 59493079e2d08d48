//! Sign in and print every resource collection.

use anyhow::{Context, bail};
use stockroom_core::Resource;
use stockroom_dashboard::{Dashboard, DashboardConfig, ListStatus, ResourceView};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = DashboardConfig::from_env().context("invalid dashboard configuration")?;
    let dashboard = Dashboard::new(&config);

    if !dashboard.gateway.health().await {
        tracing::warn!(api_url = %config.api_url, "API health check failed");
    }

    if !dashboard.session.is_authenticated() {
        let (Some(email), Some(password)) = (&config.email, &config.password) else {
            bail!("no credential: set STOCKROOM_AUTH_TOKEN, or STOCKROOM_EMAIL and STOCKROOM_PASSWORD");
        };
        dashboard
            .auth
            .login(email, password)
            .await
            .context("sign-in failed")?;
    }

    let summary = dashboard.overview().await;
    println!(
        "{} items in {} warehouses",
        summary.items, summary.warehouses
    );

    print_collection(&dashboard.categories).await?;
    print_collection(&dashboard.items).await?;
    print_collection(&dashboard.warehouses).await?;

    Ok(())
}

async fn print_collection<R: Resource>(view: &ResourceView<R>) -> anyhow::Result<()> {
    let vm = view
        .mount()
        .await
        .with_context(|| format!("cannot open {}", view.kind()))?;

    match &vm.status {
        ListStatus::Failed(message) => println!("{}: {message}", view.kind()),
        ListStatus::Empty => println!("{}: none yet", view.kind()),
        ListStatus::Loading | ListStatus::Populated => {
            println!("{} ({})", view.kind(), vm.rows.len());
            for row in &vm.rows {
                println!("  {}  {}", row.record.id(), row.record.name());
            }
        }
    }
    Ok(())
}
