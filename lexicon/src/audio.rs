use std::process::{Child, Command, Stdio};

use anyhow::Context;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

pub trait AudioPlayer {
    fn play(&mut self, src: &str) -> anyhow::Result<()>;
    fn pause(&mut self) -> anyhow::Result<()>;
}

/// The pronunciation control of the results panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioControl {
    src: Option<String>,
    state: PlaybackState,
}

impl AudioControl {
    pub fn new(src: Option<&str>) -> Self {
        Self {
            src: src.map(str::to_owned),
            state: PlaybackState::Paused,
        }
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn toggle(&mut self, player: &mut dyn AudioPlayer) {
        let Some(src) = self.src.as_deref() else {
            return;
        };
        let result = match self.state {
            PlaybackState::Playing => player.pause(),
            PlaybackState::Paused => player.play(src),
        };
        match result {
            Ok(()) => {
                self.state = match self.state {
                    PlaybackState::Playing => PlaybackState::Paused,
                    PlaybackState::Paused => PlaybackState::Playing,
                };
            }
            Err(error) => tracing::warn!(src, error = %format!("{error:#}"), "audio toggle failed"),
        }
    }

    /// Swaps in the audio of a new entry, stopping the old one if it plays.
    pub fn replace(&mut self, src: Option<&str>, player: &mut dyn AudioPlayer) {
        if self.state.is_playing() {
            if let Err(error) = player.pause() {
                tracing::warn!(error = %format!("{error:#}"), "failed to stop previous audio");
            }
        }
        *self = Self::new(src);
    }
}

/// Plays through an external command when one is configured, otherwise
/// hands the URL to the desktop opener.
#[derive(Debug, Default)]
pub struct SystemPlayer {
    command: Option<Vec<String>>,
    child: Option<Child>,
}

impl SystemPlayer {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.filter(|argv| !argv.is_empty()),
            child: None,
        }
    }

    fn stop_child(&mut self) -> anyhow::Result<()> {
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                child.kill().context("failed to stop audio player")?;
            }
            child.wait()?;
        }
        Ok(())
    }
}

impl AudioPlayer for SystemPlayer {
    fn play(&mut self, src: &str) -> anyhow::Result<()> {
        self.stop_child()?;
        match &self.command {
            Some(argv) => {
                let child = Command::new(&argv[0])
                    .args(&argv[1..])
                    .arg(src)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .with_context(|| format!("failed to spawn audio player {:?}", argv[0]))?;
                tracing::debug!(src, pid = child.id(), "audio player started");
                self.child = Some(child);
            }
            None => {
                open::that_detached(src).with_context(|| format!("failed to open {src}"))?;
                tracing::debug!(src, "audio handed to system opener");
            }
        }
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.stop_child()
    }
}

impl Drop for SystemPlayer {
    fn drop(&mut self) {
        let _ = self.stop_child();
    }
}
