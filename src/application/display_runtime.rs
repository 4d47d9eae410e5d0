// Display runtime - Drives one rotation controller from a single task
use crate::application::display_shell::{DisplayShell, KeyEvent};
use crate::application::rotation::{DisplayCommand, DisplayEffect, DisplaySnapshot, RotationController};
use crate::domain::settings::SignageConfig;
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Error)]
#[error("Display runtime has stopped")]
pub struct DisplayStopped;

#[derive(Debug)]
enum RuntimeMessage {
    Command(DisplayCommand),
    Key(KeyEvent),
    Reconfigure(SignageConfig),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
struct Published {
    snapshot: DisplaySnapshot,
    navigation_until: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayView {
    #[serde(flatten)]
    pub snapshot: DisplaySnapshot,
    pub navigation_visible: bool,
}

/// Cloneable front door to the runtime task. Every mutation is queued and
/// applied by that task in order.
#[derive(Debug, Clone)]
pub struct DisplayHandle {
    tx: mpsc::Sender<RuntimeMessage>,
    published: watch::Receiver<Published>,
}

impl DisplayHandle {
    pub async fn send(&self, command: DisplayCommand) -> Result<(), DisplayStopped> {
        self.tx
            .send(RuntimeMessage::Command(command))
            .await
            .map_err(|_| DisplayStopped)
    }

    pub async fn key(&self, event: KeyEvent) -> Result<(), DisplayStopped> {
        self.tx
            .send(RuntimeMessage::Key(event))
            .await
            .map_err(|_| DisplayStopped)
    }

    pub async fn reconfigure(&self, config: SignageConfig) -> Result<(), DisplayStopped> {
        self.tx
            .send(RuntimeMessage::Reconfigure(config))
            .await
            .map_err(|_| DisplayStopped)
    }

    /// Stop the runtime and wait until it has exited. Later sends fail with
    /// `DisplayStopped`.
    pub async fn shutdown(&self) {
        if self.tx.send(RuntimeMessage::Shutdown).await.is_ok() {
            self.tx.closed().await;
        }
    }

    pub fn view(&self) -> DisplayView {
        let published = self.published.borrow().clone();
        let now = clock_now();
        DisplayView {
            snapshot: published.snapshot,
            navigation_visible: published.navigation_until.is_some_and(|t| t > now),
        }
    }

    /// Resolves after the runtime publishes a new state.
    pub async fn changed(&mut self) -> Result<(), DisplayStopped> {
        self.published.changed().await.map_err(|_| DisplayStopped)
    }
}

/// Load `config` into a fresh controller and start driving it.
pub fn spawn_display(config: SignageConfig) -> DisplayHandle {
    let now = clock_now();
    let mut controller = RotationController::new(&config.settings);
    let shell = DisplayShell::new(&config.settings);
    log_effects(&controller.load(config.active_dashboards(), now));

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let (published_tx, published) = watch::channel(publish(&controller, &shell, now));

    tokio::spawn(run(controller, shell, rx, published_tx));

    DisplayHandle { tx, published }
}

async fn run(
    mut controller: RotationController,
    mut shell: DisplayShell,
    mut rx: mpsc::Receiver<RuntimeMessage>,
    published: watch::Sender<Published>,
) {
    loop {
        let deadline = controller.next_deadline();
        let timer = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    tracing::debug!("All display handles dropped, stopping runtime");
                    break;
                };
                let now = clock_now();
                let effects = match message {
                    RuntimeMessage::Command(command) => {
                        shell.record_activity(now);
                        controller.apply(command, now)
                    }
                    RuntimeMessage::Key(event) => match shell.handle_key(&event, now) {
                        Some(command) => controller.apply(command, now),
                        None => Vec::new(),
                    },
                    RuntimeMessage::Reconfigure(config) => {
                        shell.apply_settings(&config.settings);
                        controller.reconfigure(config.active_dashboards(), &config.settings, now)
                    }
                    RuntimeMessage::Shutdown => {
                        tracing::info!("Display runtime shutting down");
                        break;
                    }
                };
                log_effects(&effects);
            }
            () = timer => {
                log_effects(&controller.poll(clock_now()));
            }
        }

        if published.send(publish(&controller, &shell, clock_now())).is_err() {
            break;
        }
    }
}

fn publish(controller: &RotationController, shell: &DisplayShell, now: Instant) -> Published {
    Published {
        snapshot: controller.snapshot(now),
        navigation_until: shell.navigation_deadline(),
    }
}

fn log_effects(effects: &[DisplayEffect]) {
    for effect in effects {
        match effect {
            DisplayEffect::Render(frame) => tracing::info!(
                "Display -> {} ({}/{}) {:?}",
                frame.name,
                frame.position + 1,
                frame.total,
                frame.reason
            ),
            DisplayEffect::ShowError(failure) => tracing::warn!(
                "Display error overlay for {}: {}",
                failure.dashboard_id,
                failure.message
            ),
            DisplayEffect::ShowEmpty => tracing::info!("Display -> no dashboards configured"),
        }
    }
}

// tokio's clock, so paused-time tests drive the runtime too
fn clock_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::display_shell::Focus;
    use crate::application::rotation::RotationPhase;
    use crate::domain::dashboard::Dashboard;
    use crate::domain::settings::DisplaySettings;
    use std::time::Duration;

    fn config(n: usize) -> SignageConfig {
        let dashboards = (0..n)
            .map(|i| Dashboard::new(format!("Dashboard {i}"), format!("/local/{i}")))
            .collect();
        SignageConfig::new(dashboards, DisplaySettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotates_on_schedule() {
        let handle = spawn_display(config(3));
        assert_eq!(handle.view().snapshot.current_index, Some(0));

        tokio::time::sleep(Duration::from_secs(95)).await;

        let view = handle.view();
        assert_eq!(view.snapshot.rotations, 3);
        assert_eq!(view.snapshot.current_index, Some(0));
        assert_eq!(view.snapshot.refreshes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_and_keys() {
        let mut handle = spawn_display(config(3));

        handle.send(DisplayCommand::Next).await.unwrap();
        handle.changed().await.unwrap();
        assert_eq!(handle.view().snapshot.current_index, Some(1));
        assert!(handle.view().navigation_visible);

        handle
            .key(KeyEvent {
                key: " ".to_string(),
                focus: Focus::Document,
            })
            .await
            .unwrap();
        handle.changed().await.unwrap();
        assert_eq!(handle.view().snapshot.phase, RotationPhase::Paused);

        handle
            .key(KeyEvent {
                key: " ".to_string(),
                focus: Focus::TextInput,
            })
            .await
            .unwrap();
        handle.changed().await.unwrap();
        assert_eq!(handle.view().snapshot.phase, RotationPhase::Paused);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(handle.view().snapshot.current_index, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_runtime() {
        let handle = spawn_display(config(2));
        let other = handle.clone();

        handle.shutdown().await;

        assert!(other.send(DisplayCommand::Next).await.is_err());
        assert!(other.reconfigure(config(1)).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconfigure_to_empty() {
        let mut handle = spawn_display(config(2));

        handle.reconfigure(config(0)).await.unwrap();
        handle.changed().await.unwrap();
        assert_eq!(handle.view().snapshot.phase, RotationPhase::Empty);
        assert_eq!(handle.view().snapshot.current_index, None);
    }
}
