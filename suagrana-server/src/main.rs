#[macro_use]
extern crate tracing;

use std::error::Error;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use rand::Rng;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use suagrana_lib::auth::jwt::JWTAuth;
use suagrana_lib::cache::ReportCache;
use suagrana_lib::config::Config;

const SERVICE_NAME: &str = "suagrana-server";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    let tracing_guard = tracing::subscriber::set_default(subscriber);
    info!("tracing initialized");

    let config = match get_config_file() {
        Some(config_path) => {
            info!(?config_path, "Loading config file");
            Config::from_file(config_path)?
        }
        None => {
            info!("Config file not found, reading config from environment");
            Config::from_env()?
        }
    };

    let telemetry_layer = match &config.honeycomb_api_key {
        Some(api_key) => Some(suagrana_lib::tracing::create_opentelemetry_layer(
            SERVICE_NAME,
            api_key,
        )?),
        None => {
            warn!("No Honeycomb API key, spans are not exported");
            None
        }
    };

    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default())
        .with(telemetry_layer);
    tracing::subscriber::set_global_default(subscriber).expect("set up subscriber");
    drop(tracing_guard);

    let repos = suagrana_repo::sqlx_repo::create_repos(&config.database_url, config.max_pool_size)
        .await?;

    let secret = get_secret()?;
    let jwt_auth = JWTAuth::from_secret(secret);
    let cache = Data::new(ReportCache::new(
        Duration::from_secs(config.cache_ttl_secs),
        config.cache_max_entries,
    ));
    let allowed_origins = config.allowed_origins.clone();
    let signups_enabled = config.signups_enabled;

    let mut server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(suagrana_lib::tracing::create_middleware())
            .configure(suagrana_lib::app_config_func(
                jwt_auth.clone(),
                repos.clone(),
                cache.clone(),
                signups_enabled,
            ))
    });
    server = match config.ssl {
        None => {
            warn!("Using http");
            server.bind(&config.bind_address)?
        }
        Some(ssl_config) => {
            info!("Using https");

            let tls_config = ServerConfig::builder()
                .with_safe_defaults()
                .with_no_client_auth();

            let mut cert_file = BufReader::new(
                File::open(ssl_config.certificate_chain_file)
                    .context("Error opening certificate chain file")?,
            );
            let mut key_file = BufReader::new(
                File::open(ssl_config.private_key_file)
                    .context("Error opening private key file")?,
            );

            let cert_chain = certs(&mut cert_file)
                .context("Unable to read certificate chain file")?
                .into_iter()
                .map(Certificate)
                .collect();
            let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
                .context("Unable to read private key file")?
                .into_iter()
                .map(PrivateKey)
                .collect();

            if keys.is_empty() {
                error!("No private key found in file");
                std::process::exit(1);
            }

            let tls_config = tls_config.with_single_cert(cert_chain, keys.remove(0))?;

            server.bind_rustls(&config.bind_address, tls_config)?
        }
    };
    info!(bind_address = %config.bind_address, "Starting server");
    server.run().await?;

    Ok(())
}

fn get_config_file() -> Option<PathBuf> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Some(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}

fn get_state_dir() -> PathBuf {
    if let Ok(state_env) = std::env::var("STATE_DIRECTORY") {
        return PathBuf::from(state_env);
    }

    PathBuf::from("data")
}

/// Gets the token signing secret from the state directory, generating and saving a new one on
/// first start.
fn get_secret() -> Result<Vec<u8>, Box<dyn Error>> {
    let state_dir = get_state_dir();
    let secret_file = state_dir.join("secret");
    if secret_file.exists() {
        Ok(fs::read(secret_file)?)
    } else {
        let mut rng = rand::thread_rng();
        let mut secret: [u8; 128] = [0; 128];
        rng.fill(&mut secret);

        fs::create_dir_all(state_dir)?;
        fs::write(secret_file, secret)?;

        Ok(secret.to_vec())
    }
}
