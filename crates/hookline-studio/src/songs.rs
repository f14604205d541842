//! Song discovery from the command line or the music directory

use std::path::{Path, PathBuf};

use hookline_core::store::TrimStore;
use hookline_core::{AudioSource, Song, SongId};

/// Extensions the decoder understands
const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "mp3", "flac", "m4a", "aac", "mp4"];

fn is_audio_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

/// Expand inputs into audio files
///
/// Files are kept as given (if they look like audio); directories contribute
/// their audio files, sorted, one level deep.
pub fn discover(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for input in inputs {
        if input.is_dir() {
            match std::fs::read_dir(input) {
                Ok(entries) => {
                    let mut files: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.path())
                        .filter(|p| is_audio_file(p))
                        .collect();
                    files.sort();
                    found.extend(files);
                }
                Err(e) => log::warn!("discover: cannot read {:?}: {}", input, e),
            }
        } else if is_audio_file(input) {
            found.push(input.clone());
        } else {
            log::warn!("discover: skipping {:?} (not an audio file)", input);
        }
    }
    found
}

/// Build the song record for `path`, with any stored trim
pub fn song_from_path(path: &Path, store: &dyn TrimStore) -> Song {
    let id = SongId::new(path.to_string_lossy());
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string());
    let trim = store.load_trim(&id);
    Song::new(id, title, AudioSource::File(path.to_path_buf())).with_trim(trim)
}
