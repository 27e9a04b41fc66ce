//! Config file validation.

use std::path::Path;

use wix_headless_storefront::config::WixConfig;

use super::CliError;

/// Load the YAML config and report what it contains.
///
/// # Errors
///
/// Returns the loader's error for an invalid file.
pub fn check(path: &Path) -> Result<(), CliError> {
    let config = WixConfig::load(path)?;
    tracing::info!(
        path = %path.display(),
        site_id = %config.api_key.site_id,
        oauth = config.client_id.is_some(),
        "Config is valid"
    );
    print_site(&config);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_site(config: &WixConfig) {
    println!("Site ID: {}", config.api_key.site_id);
    match &config.client_id {
        Some(client_id) => println!("OAuth client ID: {client_id}"),
        None => println!("OAuth client ID: (not configured)"),
    }
}
