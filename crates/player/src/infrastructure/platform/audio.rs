//! Audio output through rodio
//!
//! The output stream is not `Send`, so it lives on its own thread and clips
//! are handed over a channel. Playback is fire-and-forget: each clip gets a
//! detached sink.

use std::io::Cursor;
use std::sync::mpsc;
use std::thread;

use rodio::{Decoder, OutputStream, Sink};

use crate::ports::outbound::SoundOutput;

struct Cue {
    clip_name: String,
    bytes: Vec<u8>,
    volume: f32,
}

/// Sound output backed by the default audio device
#[derive(Clone)]
pub struct RodioSoundOutput {
    tx: mpsc::Sender<Cue>,
}

impl RodioSoundOutput {
    /// Open the default output device on a dedicated audio thread
    pub fn open() -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel::<Cue>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        thread::Builder::new()
            .name("armeria-audio".into())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                while let Ok(cue) = rx.recv() {
                    let Ok(sink) = Sink::try_new(&handle) else {
                        continue;
                    };
                    sink.set_volume(cue.volume);

                    match Decoder::new(Cursor::new(cue.bytes)) {
                        Ok(source) => {
                            sink.append(source);
                            sink.detach();
                        }
                        Err(e) => {
                            tracing::warn!(clip = %cue.clip_name, "Failed to decode sound clip: {}", e);
                        }
                    }
                }
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { tx }),
            Ok(Err(e)) => Err(anyhow::anyhow!("no audio output device: {}", e)),
            Err(_) => Err(anyhow::anyhow!("audio thread exited during startup")),
        }
    }
}

impl SoundOutput for RodioSoundOutput {
    fn play(&self, clip_name: &str, bytes: &[u8], volume: f32) {
        let cue = Cue {
            clip_name: clip_name.to_string(),
            bytes: bytes.to_vec(),
            volume,
        };
        if self.tx.send(cue).is_err() {
            tracing::debug!(clip = clip_name, "audio thread gone, dropping sound cue");
        }
    }
}
