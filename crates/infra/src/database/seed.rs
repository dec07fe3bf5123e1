//! Illustrative seed flags
//!
//! Invoked from bootstrap code or tests only. Runtime repository logic never
//! depends on these rows.

use flagstore_core::FlagRepository;
use flagstore_domain::{FlagStoreError, NewFlag, Result};
use tracing::{debug, info};

/// The illustrative flags for one environment
pub fn default_seed_flags(environment: &str) -> Vec<NewFlag> {
    vec![
        NewFlag::new("new-feature", true, "api", environment),
        NewFlag::new("show-feature", false, "demo", environment),
        NewFlag::new("hide-feature", false, "dark", environment),
    ]
}

/// Insert the illustrative flags, skipping any name that already exists.
///
/// Returns the number of flags inserted.
pub async fn seed_default_flags(repo: &dyn FlagRepository, environment: &str) -> Result<usize> {
    let mut inserted = 0;

    for flag in default_seed_flags(environment) {
        let name = flag.name.clone();
        match repo.create(flag).await {
            Ok(_) => inserted += 1,
            Err(FlagStoreError::DuplicateKey(_)) => debug!(flag = %name, "seed flag exists"),
            Err(err) => return Err(err),
        }
    }

    info!(environment, inserted, "seed flags loaded");
    Ok(inserted)
}
