use std::path::PathBuf;

use config::{Config, Environment};
use tracing::debug;

use dosetup_schema::conf::config_data::ConfigData;
use dosetup_schema::conf::ds_args::DsArgs;
use dosetup_schema::errors::{EnhanceErrorInfo, ToErrorInfo};
use dosetup_schema::{DsResult, ErrorCode, ErrorInfoContext};

pub const HOME_CONFIG_DIR: &str = ".dosetup";
pub const LOCAL_CONFIG_FILE: &str = "dosetup.toml";

/// Optional config files in increasing precedence.
pub fn standard_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(HOME_CONFIG_DIR).join("config.toml"));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
    paths
}

pub fn config_env_source() -> Environment {
    Environment::with_prefix("DOSETUP").try_parsing(true)
}

/// Defaults, then standard files, then `--config-path`, then `DOSETUP_*` env, then flags.
pub fn load_config(args: &DsArgs) -> DsResult<ConfigData> {
    let config = load_config_from(standard_config_paths(), args.config_path.as_ref(), config_env_source())?;
    Ok(apply_args(args, config))
}

pub fn load_config_from(
    optional_paths: Vec<PathBuf>,
    required_path: Option<&String>,
    env: Environment,
) -> DsResult<ConfigData> {
    let mut builder = Config::builder();
    for p in optional_paths.into_iter() {
        if p.exists() {
            debug!("Loading config from {:?}", p);
            builder = builder.add_source(config::File::from(p));
        }
    }
    if let Some(cp) = required_path {
        let p = PathBuf::from(cp);
        if !p.exists() {
            return format!("Config file {} does not exist", cp)
                .to_error_code(ErrorCode::ConfigLoadFailure);
        }
        builder = builder.add_source(config::File::from(p));
    }
    let config = builder
        .add_source(env)
        .build()
        .error_msg(ErrorCode::ConfigLoadFailure, "Failed to build config")?;
    config.try_deserialize::<ConfigData>()
        .error_msg(ErrorCode::ConfigLoadFailure, "Failed to deserialize config")
        .with_detail("path", required_path.cloned().unwrap_or_default())
}

pub fn apply_args(args: &DsArgs, config: ConfigData) -> ConfigData {
    let mut config = config;
    if let Some(l) = args.log_level.as_ref() {
        config.log_level = l.clone();
    }
    if let Some(r) = args.registry_path.as_ref() {
        config.registry_path = r.clone();
    }
    config
}
