//! Configuration loading: file or testnet defaults, then `TL_*`
//! environment, then command-line overrides.

use anyhow::{Context, Result};
use shared_types::{MarketplaceConfig, Network};
use std::path::Path;

/// Resolve the effective marketplace configuration.
pub fn load_config(
    path: Option<&Path>,
    network: Option<&str>,
    rpc_url: Option<&str>,
) -> Result<MarketplaceConfig> {
    let base = match path {
        Some(path) => MarketplaceConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MarketplaceConfig::testnet_deployment(),
    };
    let mut config = base.apply_env().context("applying TL_* environment")?;

    if let Some(network) = network {
        config.network = network
            .parse::<Network>()
            .context("parsing --network")?;
    }
    if let Some(url) = rpc_url {
        config.rpc_url = Some(url.to_string());
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            network = "devnet"
            package_id = "0xpkg"
            admin_address = "0xadmin"
            escrow_admin_cap_id = "0xcap"
            "#
        )
        .unwrap();

        let config =
            load_config(Some(file.path()), Some("localnet"), Some("http://node:9000")).unwrap();
        assert_eq!(config.network, Network::Localnet);
        assert_eq!(config.rpc_endpoint(), "http://node:9000");
        assert_eq!(config.package_id.as_str(), "0xpkg");
    }

    #[test]
    fn test_bad_network_is_rejected() {
        assert!(load_config(None, Some("moonnet"), None).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/tl.toml")), None, None).is_err());
    }
}
