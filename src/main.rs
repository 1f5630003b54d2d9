use clap::Parser;
use tracing::{debug, error};

use dosetup::util::cli::commands::dispatch;
use dosetup::util::cli::load_config::load_config;
use dosetup::util::runtimes::build_simple_runtime;
use dosetup_common::log::init_logger_main;
use dosetup_schema::conf::ds_args::DsArgs;
use dosetup_schema::helpers::easy_json::EasyJson;
use dosetup_schema::DsResult;

fn run(args: &DsArgs) -> DsResult<()> {
    let config = load_config(args)?;
    init_logger_main(config.log_level.clone());
    debug!("Loaded config: {}", config.json_or());
    debug!("Args: {:?}", args.clear_sensitive());
    let runtime = build_simple_runtime("dosetup")?;
    runtime.block_on(dispatch(args, &config))
}

fn main() {
    let args = DsArgs::parse();
    if let Err(e) = run(&args) {
        // No-op when the configured level was already applied.
        init_logger_main(args.log_level.clone().unwrap_or("INFO".to_string()));
        error!("{}", e);
        debug!("{}", e.json_or());
        std::process::exit(1);
    }
}
