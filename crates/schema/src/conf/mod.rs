pub mod config_data;
pub mod ds_args;
