//! Playback/view coordinator.
//!
//! One task owns all mutable state: the frame sequence snapshot, the
//! cursor, the persisted toggles, and the radar layer handle. Refresh
//! ticks, playback ticks, keyboard commands, and shutdown are
//! multiplexed with `select!`, so transitions never overlap. Observers
//! (the status API) read immutable snapshots published through a watch
//! channel.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{error, info, warn};

use wms_capabilities::{resolve, CapabilitiesClient, CapabilitiesDocument};

use crate::config::ViewerConfig;
use crate::keys::{help_text, KeyCommand};
use crate::layer::RadarLayerHandle;
use crate::playback::PlaybackState;
use crate::settings::LayerSettings;

/// Immutable view of the coordinator state for the status API.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub service: String,
    pub playing: bool,
    pub speed_ms: u64,
    pub current_time: Option<String>,
    pub frame_index: Option<usize>,
    pub frame_count: usize,
    pub frames: Vec<String>,
    pub settings: LayerSettings,
    pub image_url: Option<String>,
    pub last_refresh: Option<String>,
}

/// A command delivered to the coordinator, from the keyboard or the
/// status API's scrub endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    Key(KeyCommand),
    /// Direct cursor placement on a timestamp from the current sequence.
    SelectTime(String),
}

enum CommandOutcome {
    Continue,
    Quit,
}

/// Owns playback state and drives the two periodic tasks.
pub struct Coordinator {
    config: ViewerConfig,
    client: CapabilitiesClient,
    playback: PlaybackState,
    settings: LayerSettings,
    layer: RadarLayerHandle,
    last_refresh: Option<DateTime<Utc>>,
    status_tx: watch::Sender<StatusSnapshot>,
}

impl Coordinator {
    pub fn new(
        config: ViewerConfig,
        settings: LayerSettings,
    ) -> Result<(Self, watch::Receiver<StatusSnapshot>)> {
        let client = CapabilitiesClient::new(&config.capabilities_url, config.fetch_timeout)
            .context("Failed to create capabilities client")?;
        let layer = RadarLayerHandle::new(&config.wms_url, &config.layer);

        let placeholder = StatusSnapshot {
            service: "radar-viewer".to_string(),
            playing: false,
            speed_ms: 0,
            current_time: None,
            frame_index: None,
            frame_count: 0,
            frames: Vec::new(),
            settings,
            image_url: None,
            last_refresh: None,
        };
        let (status_tx, status_rx) = watch::channel(placeholder);

        let coordinator = Self {
            config,
            client,
            playback: PlaybackState::new(),
            settings,
            layer,
            last_refresh: None,
            status_tx,
        };
        coordinator.publish();
        Ok((coordinator, status_rx))
    }

    /// Run until shutdown or a quit command.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<ViewerCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        // First tick fires immediately, giving the initial fetch
        let mut refresh_tick = tokio::time::interval(self.config.refresh_interval);
        let mut speed_ms = self.playback.speed_ms();
        let mut frame_tick = frame_interval(speed_ms);

        loop {
            tokio::select! {
                _ = refresh_tick.tick() => {
                    if let Err(e) = self.refresh().await {
                        // Next scheduled attempt proceeds regardless
                        error!(error = %e, "Capabilities refresh failed");
                    }
                }
                _ = frame_tick.tick() => {
                    if self.playback.is_playing() {
                        self.playback.advance();
                        self.sync_layer();
                    }
                }
                cmd = commands.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if let CommandOutcome::Quit = self.handle_command(cmd) {
                                info!("Quit requested");
                                break;
                            }
                            if self.playback.speed_ms() != speed_ms {
                                speed_ms = self.playback.speed_ms();
                                frame_tick = frame_interval(speed_ms);
                            }
                        }
                        None => break,
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutting down coordinator");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Fetch, resolve, and swap in a fresh frame sequence.
    pub async fn refresh(&mut self) -> Result<()> {
        let xml = self
            .client
            .fetch()
            .await
            .context("Failed to fetch capabilities")?;
        let doc =
            CapabilitiesDocument::parse(&xml).context("Failed to parse capabilities XML")?;

        let frames = resolve(&doc, &self.config.layer, Utc::now());
        info!(
            layer = %self.config.layer,
            frames = frames.len(),
            "Refreshed frame sequence"
        );

        self.playback.apply_sequence(frames);
        self.last_refresh = Some(Utc::now());
        self.sync_layer();
        Ok(())
    }

    fn handle_command(&mut self, cmd: ViewerCommand) -> CommandOutcome {
        let cmd = match cmd {
            ViewerCommand::Key(key) => key,
            ViewerCommand::SelectTime(time) => {
                if self.playback.select_time(&time) {
                    self.sync_layer();
                } else {
                    warn!(time = %time, "Requested frame not in current sequence");
                }
                return CommandOutcome::Continue;
            }
        };

        match cmd {
            KeyCommand::PlayPause => {
                let playing = self.playback.toggle_play();
                info!(playing, "Playback toggled");
                self.publish();
            }
            KeyCommand::PrevFrame => {
                self.playback.step_back();
                self.sync_layer();
            }
            KeyCommand::NextFrame => {
                self.playback.step_forward();
                self.sync_layer();
            }
            KeyCommand::CycleSpeed => {
                let speed_ms = self.playback.cycle_speed();
                info!(speed_ms, "Animation speed changed");
                self.publish();
            }
            KeyCommand::Toggle(kind) => {
                let visible = self.settings.toggle(kind);
                info!(layer = kind.as_str(), visible, "Layer toggled");
                if let Err(e) = self.settings.save(&self.config.state_dir) {
                    warn!(error = %e, "Failed to persist settings");
                }
                self.publish();
            }
            KeyCommand::Help => {
                println!("{}", help_text());
            }
            KeyCommand::Quit => return CommandOutcome::Quit,
        }
        CommandOutcome::Continue
    }

    /// Push the selected timestamp into the layer handle and publish.
    fn sync_layer(&mut self) {
        self.layer
            .set_time(self.playback.current_time().map(str::to_string));
        self.publish();
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            service: "radar-viewer".to_string(),
            playing: self.playback.is_playing(),
            speed_ms: self.playback.speed_ms(),
            current_time: self.playback.current_time().map(str::to_string),
            frame_index: self.playback.cursor(),
            frame_count: self.playback.frame_count(),
            frames: self.playback.frames().to_vec(),
            settings: self.settings,
            image_url: self.layer.image_url(),
            last_refresh: self.last_refresh.map(|t| t.to_rfc3339()),
        }
    }

    fn publish(&self) {
        let _ = self.status_tx.send(self.snapshot());
    }
}

/// Playback tick whose first fire waits a full period, so swapping the
/// interval on a speed change does not advance a frame immediately.
fn frame_interval(speed_ms: u64) -> tokio::time::Interval {
    let period = Duration::from_millis(speed_ms);
    tokio::time::interval_at(tokio::time::Instant::now() + period, period)
}
