//! Audio playback back-ends

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Players probed on `PATH`, in order
pub const PLAYER_CANDIDATES: [&str; 3] = ["afplay", "paplay", "aplay"];

/// A started playback
#[derive(Debug)]
pub enum Playback {
    /// External process; the alarm loop waits on it and kills it on stop
    Child(Child),
    /// Terminal bell; already done, nothing to wait on or cancel
    Bell,
}

/// Something that can make noise from an audio file
pub trait SoundPlayer: Send + Sync + fmt::Debug {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Start playing `path`. Must not block until playback finishes.
    fn play(&self, path: &Path) -> io::Result<Playback>;
}

/// Plays the file by spawning an external program with the path as last argument
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments placed before the file path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl SoundPlayer for CommandPlayer {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("player")
    }

    fn play(&self, path: &Path) -> io::Result<Playback> {
        Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map(Playback::Child)
    }
}

/// Fallback when no player exists: rings the terminal bell
#[derive(Debug, Clone, Copy, Default)]
pub struct BellPlayer;

impl SoundPlayer for BellPlayer {
    fn name(&self) -> &str {
        "bell"
    }

    fn play(&self, _path: &Path) -> io::Result<Playback> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(Playback::Bell)
    }
}

/// Locate an executable `program` on `PATH`.
///
/// Anything containing a path separator is checked as is. Files without
/// the executable bit are skipped.
pub fn find_program(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Like [`find_program`], searching `paths` instead of `PATH`
pub fn find_program_in(program: &str, paths: Option<&OsStr>) -> Option<PathBuf> {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(program, paths, cwd).ok()
}

/// Pick the player to use.
///
/// A configured program wins if it can be found; otherwise the first of
/// [`PLAYER_CANDIDATES`] on `PATH`; otherwise the bell.
pub fn detect_player(preferred: Option<&str>) -> Arc<dyn SoundPlayer> {
    detect_player_in(preferred, env::var_os("PATH").as_deref())
}

/// [`detect_player`] over an explicit search path
pub fn detect_player_in(preferred: Option<&str>, paths: Option<&OsStr>) -> Arc<dyn SoundPlayer> {
    if let Some(program) = preferred {
        match find_program_in(program, paths) {
            Some(path) => {
                info!("Using configured audio player {}", path.display());
                return Arc::new(CommandPlayer::new(path));
            }
            None => warn!(
                "Configured audio player '{}' not found, probing defaults",
                program
            ),
        }
    }

    for program in PLAYER_CANDIDATES {
        if let Some(path) = find_program_in(program, paths) {
            info!("Using audio player {}", path.display());
            return Arc::new(CommandPlayer::new(path));
        }
    }

    warn!(
        "No audio player found (tried {}), falling back to terminal bell",
        PLAYER_CANDIDATES.join(", ")
    );
    Arc::new(BellPlayer)
}
