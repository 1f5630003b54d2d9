use std::path::PathBuf;

use tracing::debug;
use dosetup_schema::errors::{EnhanceErrorInfo, ToErrorInfo};
use dosetup_schema::helpers::easy_json::{EasyJson, EasyJsonDeser};
use dosetup_schema::servers::ServerRecord;
use dosetup_schema::{DsResult, ErrorCode, ErrorInfoContext};

pub const CARDINALITY_MESSAGE: &str = "Too many or no items in server list.";

/// Local JSON file listing the servers created and not yet torn down.
/// Reads and writes are unlocked, concurrent invocations race.
#[derive(Clone, Debug)]
pub struct ServerRegistry {
    pub path: PathBuf,
}

impl ServerRegistry {

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing or corrupt contents read as an empty list.
    pub fn read_servers(&self) -> Vec<ServerRecord> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                debug!("Server registry {:?} unreadable, treating as empty: {}", self.path, e);
                return vec![];
            }
        };
        contents.json_from::<Vec<ServerRecord>>().unwrap_or_else(|e| {
            debug!("Server registry {:?} corrupt, treating as empty: {}", self.path, e);
            vec![]
        })
    }

    pub fn save_servers(&self, servers: &[ServerRecord]) -> DsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).error_info("Failed to create registry folder")
                .add(parent.to_string_lossy().to_string())?;
        }
        let contents = servers.json_sorted_pretty()?;
        std::fs::write(&self.path, contents).error_info("Failed to write server registry")
            .add(self.path.to_string_lossy().to_string())
    }

    pub fn append(&self, record: ServerRecord) -> DsResult<()> {
        let mut servers = self.read_servers();
        servers.push(record);
        self.save_servers(&servers)
    }

    pub fn clear(&self) -> DsResult<()> {
        self.save_servers(&[])
    }

    /// The only recorded server, refusing when the registry holds zero or several.
    pub fn single(&self) -> DsResult<ServerRecord> {
        let mut servers = self.read_servers();
        if servers.len() != 1 {
            return CARDINALITY_MESSAGE.to_error_code::<ServerRecord>(ErrorCode::RegistryCardinality)
                .with_detail("count", servers.len().to_string());
        }
        Ok(servers.remove(0))
    }
}
