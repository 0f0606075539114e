//! MPRIS media session: the externally visible playback surface.
//!
//! Registers `org.mpris.MediaPlayer2.vivace` on the session bus so desktop
//! controllers (playerctl, media keys, applets) see playback status and
//! now-playing metadata and can drive the transport. Incoming control calls
//! are translated into `ControlCmd`s drained by the runtime event loop;
//! outgoing state is pushed into a shared slot read by the property getters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::app::PlaybackStatus;
use crate::catalog::AudioItem;

/// Transport commands arriving from the session bus.
#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    SeekBack,
    SeekForward,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackStatus,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

/// Handle used by the runtime to push state into the session.
#[derive(Clone)]
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// Handle with no bus service behind it.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
        }
    }

    /// True when the metadata is empty and the status reports Stopped.
    #[cfg(test)]
    pub(crate) fn is_cleared(&self) -> bool {
        self.state
            .lock()
            .map(|s| {
                s.playback == PlaybackStatus::Stopped
                    && s.title.is_none()
                    && s.artist.is_empty()
                    && s.url.is_none()
                    && s.length_micros.is_none()
                    && s.track_id.is_none()
            })
            .unwrap_or(false)
    }

    pub fn set_playback(&self, playback: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    /// Publish the now-playing item, or clear the metadata when `None`.
    pub fn set_now_playing(&self, item: Option<&AudioItem>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match item {
            Some(item) => {
                s.title = Some(item.title.clone());
                s.artist = item.artist.clone().into_iter().collect();
                s.url = Some(item.source.clone());
                s.length_micros = Some(item.duration.as_micros() as i64);
                s.track_id =
                    ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{}", item.id))
                        .ok()
                        .map(OwnedObjectPath::from);
            }
            None => {
                s.title = None;
                s.artist = Vec::new();
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }

    /// Teardown: empty the metadata and report Stopped, so controllers drop
    /// the session from their surfaces.
    pub fn clear(&self) {
        self.set_now_playing(None);
        self.set_playback(PlaybackStatus::Stopped);
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for a terminal application.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "vivace"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        // The transport has no skip-previous; previous rewinds instead.
        let _ = self.tx.send(ControlCmd::SeekBack);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        // Offsets are in microseconds; only the direction matters here, the
        // increments are the engine's.
        let cmd = if offset < 0 {
            ControlCmd::SeekBack
        } else {
            ControlCmd::SeekForward
        };
        let _ = self.tx.send(cmd);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
            if let Ok(owned) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), owned);
            }
        }

        if let Some(track_id) = &s.track_id {
            insert(
                &mut map,
                "mpris:trackid",
                Value::from(track_id.clone().into_inner()),
            );
        }
        if let Some(title) = &s.title {
            insert(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(url) = &s.url {
            insert(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(length) = s.length_micros {
            insert(&mut map, "mpris:length", Value::from(length));
        }

        map
    }
}

/// Spawn the session-bus service thread. Bus failures are logged and leave
/// the rest of the application untouched.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("media session: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.vivace")
                .await
            {
                log::warn!("media session: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                log::warn!("media session: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                log::warn!("media session: failed to register player iface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
