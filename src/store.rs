use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::protocol::state::ControlState;


/// JSON file holding the last state sent to the unit.
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state.
    ///
    /// A missing or unreadable file yields the default state.
    pub async fn load(&self) -> ControlState {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "no stored state, using default");
                return ControlState::default();
            }
        };

        match serde_json::from_slice(&data) {
            Ok(state) => {
                debug!(path = %self.path.display(), ?state, "state loaded");
                state
            },
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "stored state is corrupt, using default");
                ControlState::default()
            }
        }
    }

    /// Persist `state`, replacing the file atomically.
    pub async fn save(&self, state: &ControlState) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await
                .with_context(|| format!("unable to create state directory {}", dir.display()))?;
        }

        let data = serde_json::to_vec(state)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await
            .with_context(|| format!("failed to write state to {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path).await
            .with_context(|| format!("failed to replace state file {}", self.path.display()))?;

        debug!(path = %self.path.display(), "state saved");

        Ok(())
    }
}
