//! # Announcer
//!
//! Delivers narration to assistive technology over a line-oriented stream.
//!
//! ```text
//! render thread ──announce()──► mpsc queue ──► writer thread ──► stderr / file
//! ```
//!
//! The queue is FIFO and has a single consumer, so announcements come out in
//! the order they were made. Each announcement is one write of one line.
//! When accessibility mode is off the announcer holds no sender at all and
//! `announce` does nothing.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::mpsc;
use std::thread::JoinHandle;

pub const ANNOUNCEMENT_MARKER: &str = "[SCREEN_READER_ANNOUNCEMENT]";

/// How an announcement line is encoded on the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementFormat {
    /// Plain marker-prefixed text.
    #[default]
    Marker,
    /// Marker-prefixed text wrapped in SGR conceal/reveal so a terminal
    /// sharing the stream does not display it.
    Concealed,
}

impl AnnouncementFormat {
    pub fn encode(self, text: &str) -> String {
        match self {
            AnnouncementFormat::Marker => format!("{ANNOUNCEMENT_MARKER} {text}\n"),
            AnnouncementFormat::Concealed => {
                format!("\x1b[8m{ANNOUNCEMENT_MARKER} {text}\x1b[28m\n")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Announcer {
    tx: Option<mpsc::Sender<String>>,
}

impl Announcer {
    /// An announcer that drops everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// An enabled announcer whose raw announcements land on the returned receiver.
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// An enabled announcer backed by a writer thread.
    ///
    /// The thread exits once every clone of the announcer has been dropped.
    pub fn spawn_writer<W>(mut writer: W, format: AnnouncementFormat) -> (Self, JoinHandle<()>)
    where
        W: Write + Send + 'static,
    {
        let (announcer, rx) = Self::channel();
        let handle = std::thread::spawn(move || {
            for text in rx {
                let line = format.encode(&text);
                if let Err(e) = writer
                    .write_all(line.as_bytes())
                    .and_then(|_| writer.flush())
                {
                    warn!("Failed to write announcement: {}", e);
                }
            }
        });
        (announcer, handle)
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn announce(&self, text: impl Into<String>) {
        let Some(tx) = &self.tx else {
            return;
        };
        let text = text.into();
        debug!("Announce: {}", text);
        if tx.send(text).is_err() {
            warn!("Failed to send announcement: writer dropped");
        }
    }
}
