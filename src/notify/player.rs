//! Audio player backed by rodio
//!
//! The output stream is not `Send`, so it lives on a dedicated OS thread that
//! owns the device and a single sink. The async side talks to it over a
//! channel. A play request stops whatever is playing and starts the clip again
//! from the beginning, so the most recent match wins.

use std::sync::Mutex;
use std::thread;

use rodio::source::EmptyCallback;
use rodio::{OutputStream, Sink};
use tokio::sync::{mpsc, oneshot};

use crate::error::{Result, WatchError};
use crate::notify::{AudioClip, Notifier, Playback, PlaybackDone};

enum Command {
    Play(PlaybackDone),
}

/// Plays one preloaded clip on the default output device
pub struct AudioPlayer {
    commands: mpsc::UnboundedSender<Command>,
}

impl AudioPlayer {
    /// Open the default output device and start the audio thread.
    ///
    /// Fails if no output device is available; there is no fallback channel.
    pub async fn start(clip: AudioClip) -> Result<Self> {
        let (commands, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        thread::Builder::new()
            .name("slotwatch-audio".to_string())
            .spawn(move || run_audio_thread(clip, rx, ready_tx))?;

        match ready_rx.await {
            Ok(Ok(())) => Ok(Self { commands }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(WatchError::AudioDevice("audio thread exited during startup".to_string())),
        }
    }
}

impl Notifier for AudioPlayer {
    fn play(&self) -> Result<Playback> {
        let (done, playback) = Playback::pending();
        self.commands
            .send(Command::Play(done))
            .map_err(|_| WatchError::PlayerGone)?;
        Ok(playback)
    }
}

fn run_audio_thread(
    clip: AudioClip,
    mut commands: mpsc::UnboundedReceiver<Command>,
    ready: oneshot::Sender<Result<()>>,
) {
    // Both must stay alive for as long as anything is meant to be heard.
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(WatchError::AudioDevice(e.to_string())));
            return;
        }
    };
    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready.send(Err(WatchError::AudioDevice(e.to_string())));
            return;
        }
    };

    if ready.send(Ok(())).is_err() {
        return;
    }

    while let Some(command) = commands.blocking_recv() {
        match command {
            Command::Play(done) => {
                if !sink.empty() {
                    log::debug!("Restarting notification from the beginning");
                    sink.stop();
                }
                sink.append(clip.source());
                sink.append(completion_marker(done));
                sink.play();
            }
        }
    }

    log::debug!("Audio thread stopping");
}

/// Zero-length source that completes the playback once the clip before it has drained
fn completion_marker(done: PlaybackDone) -> EmptyCallback<i16> {
    let slot = Mutex::new(Some(done));
    EmptyCallback::new(Box::new(move || {
        if let Some(done) = slot.lock().ok().and_then(|mut slot| slot.take()) {
            done.complete();
        }
    }))
}
