//! Per-episode key resolution.
//!
//! Flow: check the store line for the episode first; when it holds a
//! candidate the key is resolved statically. Otherwise the run suspends on
//! the manual-capture gate and rereads the same line afterwards; if it is
//! still absent or unusable the episode is skipped, never the batch.

use tracing::{info, warn};

use super::{ManualCapture, ResolverError};
use crate::catalog::EpisodeDescriptor;
use crate::keystore::{Credential, KeyStore};

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Pre-supplied in the store before the run reached this episode.
    Static,
    /// Captured by the operator during this run.
    Manual,
}

/// Terminal state of key resolution for one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResolution {
    Resolved {
        credential: Credential,
        source: KeySource,
    },
    /// No usable credential, even after manual capture. Carries the store
    /// line the operator was expected to fill.
    Skipped { expected_line: u32 },
}

/// Drives key resolution against the store and the manual-capture fallback.
pub struct KeyResolver {
    store: KeyStore,
    manual: ManualCapture,
}

impl KeyResolver {
    pub fn new(store: KeyStore, manual: ManualCapture) -> Self {
        Self { store, manual }
    }

    /// Static check, run before extraction so the session can be told a
    /// credential is already known.
    pub async fn check_static(&self, episode: u32) -> Result<Option<Credential>, ResolverError> {
        Ok(self.store.credential_for_episode(episode).await?)
    }

    /// Resolve the key for an episode. `static_credential` carries the
    /// result of an earlier [`check_static`](Self::check_static) so the
    /// store is not consulted twice on the static path.
    pub async fn resolve(
        &self,
        episode: &EpisodeDescriptor,
        static_credential: Option<Credential>,
    ) -> Result<KeyResolution, ResolverError> {
        let resolution = match static_credential {
            Some(credential) => {
                info!(episode = episode.episode, "Using static credential from store");
                KeyResolution::Resolved {
                    credential,
                    source: KeySource::Static,
                }
            }
            None => {
                info!(
                    episode = episode.episode,
                    line = episode.episode,
                    "No static credential, starting manual capture"
                );
                self.manual
                    .run(&episode.url, episode.episode, self.store.path())
                    .await?;

                match self.store.credential_for_episode(episode.episode).await? {
                    Some(credential) => KeyResolution::Resolved {
                        credential,
                        source: KeySource::Manual,
                    },
                    None => {
                        warn!(
                            episode = episode.episode,
                            line = episode.episode,
                            store = %self.store.path().display(),
                            "Still no usable credential at the expected line, skipping episode"
                        );
                        KeyResolution::Skipped {
                            expected_line: episode.episode,
                        }
                    }
                }
            }
        };

        if let KeyResolution::Resolved { credential, .. } = &resolution {
            if !credential.is_well_formed() {
                warn!(
                    episode = episode.episode,
                    credential = credential.raw(),
                    "Credential does not match the KeyID:Key hex format, attempting anyway"
                );
            }
        }

        Ok(resolution)
    }
}
