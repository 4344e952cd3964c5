pub mod analysis;
pub mod project;

use breakeven_core::project::ProjectRepository;
use tracing::debug;

use crate::store::FileStore;

pub(crate) fn open_repository(
    store: &str,
) -> Result<ProjectRepository<FileStore>, Box<dyn std::error::Error>> {
    debug!(store, "opening project store");
    Ok(ProjectRepository::new(FileStore::open(store)?))
}
