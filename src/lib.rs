pub mod infra;
pub mod util;

pub use dosetup_schema as schema;
