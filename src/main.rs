use anyhow::Result;
use i18n_twee_list::addon::{FixedLanguage, I18nTweeList};
use i18n_twee_list::config::Config;
use i18n_twee_list::diagnostics::TracingSink;
use i18n_twee_list::loader::{DirectoryLoader, PassageCache};
use i18n_twee_list::package::discover_packages;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_twee_list=info".parse()?)
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Selecting twee files for language {} from {}",
        config.language,
        config.mods_dir.display()
    );

    let packages = discover_packages(&config.mods_dir, &config.boot_file)?;
    info!("Found {} packages", packages.len());

    let cache = PassageCache::new();
    let mut plugin = I18nTweeList::new(Arc::new(TracingSink), FixedLanguage(config.language.clone()));
    for (descriptor, root) in packages {
        let loader = DirectoryLoader::new(descriptor.name.clone(), root, cache.clone());
        // Rejected packages are already reported by the plugin
        let _ = plugin.register_package(descriptor, Arc::new(loader));
    }

    match plugin.before_patch_mod_to_game().await {
        Ok(summary) => info!(
            "Loaded {} packages, skipped {}",
            summary.loaded.len(),
            summary.skipped.len()
        ),
        Err(e) => error!("{}", e),
    }

    for record in plugin.packages() {
        let name = record.resolver.package_name();
        info!(
            "{}: language {} ({} files cached)",
            name,
            record.resolver.resolved_language(),
            cache.files(name).await.len()
        );
    }

    Ok(())
}
