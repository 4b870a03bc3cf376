#![forbid(unsafe_code)]

use sca_agency::{Agency, AgencyConfig, VERSION, telemetry};

fn usage() -> &'static str {
    "sca_agency: Spy Cat Agency engine (SQLite-backed)\n\n\
USAGE:\n\
  sca_agency [--print-config]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
      --print-config  Print the effective config as JSON and exit\n\
\n\
ENV:\n\
  SCA_STORAGE_DIR, SCA_OPERATION_TIMEOUT_MS, SCA_BREED_REGISTRY_URL,\n\
  SCA_BREED_REGISTRY_TIMEOUT_MS, SCA_BREED_CACHE_TTL_SECS, SCA_BREED_CACHE_MAX_ENTRIES,\n\
  SCA_REDIS_URL, SCA_REDIS_PREFIX, SCA_DEFAULT_PAGE_LIMIT, SCA_MAX_PAGE_LIMIT,\n\
  SCA_POOL_SIZE, SCA_LOG_JSON, RUST_LOG\n"
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("sca_agency {VERSION}");
        return Ok(());
    }

    let config = AgencyConfig::from_env();
    if args.iter().any(|arg| arg.as_str() == "--print-config") {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    telemetry::init_tracing(config.log_json);
    config.validate()?;

    let agency = Agency::open(&config)?;
    let health = agency.health();
    println!("{}", serde_json::to_string(&health)?);
    if !health.store_ok {
        return Err("store is not healthy".into());
    }
    Ok(())
}
