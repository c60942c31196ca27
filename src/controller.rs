use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::info;

use crate::command::Command;
use crate::config::Config;
use crate::lirc::{LircTransmitter, RemoteConfig, Transmitter};
use crate::protocol::messages::encode;
use crate::protocol::state::ControlState;
use crate::store::StateStore;


/// Sole owner of the state file.
///
/// Each operation loads, updates, persists and transmits while holding the
/// store, so two operations never interleave. A failed transmission leaves
/// the new state persisted.
pub struct Controller<T> {
    store: Mutex<StateStore>,
    remote: RemoteConfig,
    transmitter: T,
}

impl Controller<LircTransmitter> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            StateStore::new(config.state_file.clone()),
            RemoteConfig::from(config),
            LircTransmitter::new(config)
        )
    }
}

impl<T: Transmitter> Controller<T> {
    pub fn new(store: StateStore, remote: RemoteConfig, transmitter: T) -> Self {
        Self {
            store: Mutex::new(store),
            remote,
            transmitter
        }
    }

    /// Last state sent to the unit
    pub async fn state(&self) -> ControlState {
        self.store.lock().await.load().await
    }

    /// Apply `commands` to the stored state and send the result.
    pub async fn update(&self, commands: &[Command]) -> Result<ControlState> {
        let store = self.store.lock().await;

        let mut state = store.load().await;
        for command in commands {
            command.apply(&mut state);
        }

        self.commit(&store, state).await
    }

    /// Replace the stored state and send it.
    pub async fn set_state(&self, state: ControlState) -> Result<ControlState> {
        let store = self.store.lock().await;

        self.commit(&store, state).await
    }

    async fn commit(&self, store: &StateStore, state: ControlState) -> Result<ControlState> {
        store.save(&state).await?;

        let frames = encode(&state)?;
        let config = self.remote.render(&frames);

        self.transmitter.transmit(&config).await
            .context("failed to transmit state")?;

        info!(
            power = state.power,
            temperature = state.temperature(),
            mode = %state.ac_mode,
            fan = %state.fan_mode,
            "state transmitted"
        );

        Ok(state)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::lirc::TransmitError;
    use crate::protocol::state::{AcMode, FanMode};

    #[derive(Default)]
    struct RecordingTransmitter {
        sent: StdMutex<Vec<String>>,
        fail: bool,
    }

    impl Transmitter for RecordingTransmitter {
        async fn transmit(&self, config: &str) -> Result<(), TransmitError> {
            if self.fail {
                return Err(TransmitError::EmptyCommand);
            }

            self.sent.lock().unwrap().push(config.to_string());
            Ok(())
        }
    }

    fn controller(dir: &tempfile::TempDir, fail: bool) -> Controller<RecordingTransmitter> {
        Controller::new(
            StateStore::new(dir.path().join("config.json")),
            RemoteConfig::default(),
            RecordingTransmitter { fail, ..Default::default() }
        )
    }

    #[tokio::test]
    async fn test_update_persists_and_transmits() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir, false);

        let state = controller.update(&[Command::Power(true), Command::Temperature(40)]).await.unwrap();
        assert!(state.power);
        assert_eq!(state.temperature(), 30);

        let state = controller.update(&[Command::TemperatureDown]).await.unwrap();
        assert_eq!(state.temperature(), 29);
        assert!(state.power);

        assert_eq!(controller.state().await, state);

        let sent = controller.transmitter.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(*sent.last().unwrap(), RemoteConfig::default().render(&encode(&state).unwrap()));
    }

    #[tokio::test]
    async fn test_set_state() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir, false);

        let state = ControlState::new(true, 22, AcMode::Cool, FanMode::Speed2);
        controller.set_state(state.clone()).await.unwrap();

        assert_eq!(controller.state().await, state);
    }

    #[tokio::test]
    async fn test_failed_transmission_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir, true);

        let result = controller.update(&[Command::Power(true)]).await;
        assert!(result.is_err());

        // the state was persisted before transmission
        assert!(controller.state().await.power);
    }

    #[tokio::test]
    async fn test_concurrent_updates_serialize() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(&dir, false);

        let up = [Command::TemperatureUp];
        let (a, b) = tokio::join!(controller.update(&up), controller.update(&up));
        a.unwrap();
        b.unwrap();

        assert_eq!(controller.state().await.temperature(), 21);
    }
}
