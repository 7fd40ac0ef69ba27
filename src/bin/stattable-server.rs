/// StatTable HTTP Server
///
/// Standalone server that renders skater and goalie stat tables for
/// frontend clients.

use log::error;
use stattable::config::ServerConfig;
use stattable::server::run_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // HOST, PORT, STATS_DATA_DIR, APP_ENV, CACHE_TTL_SECS
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };

    run_server(config).await
}
