//! Decoded audio clips and the playback deck
//!
//! The deck models a single audio output: at most one key is marked
//! playing at any instant.

use base64::Engine;
use std::sync::Arc;

use crate::models::AudioKey;

/// Playable audio decoded once from the synthesized payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Arc<Vec<u8>>,
}

impl AudioClip {
    /// Decode a base64 payload; an empty payload counts as missing audio
    pub fn from_base64(payload: &str) -> Result<Self, String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| format!("invalid audio payload: {}", e))?;
        if bytes.is_empty() {
            return Err("missing audio".to_string());
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    /// Re-encode for transfer to a client player
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.bytes.as_slice())
    }
}

/// The single audio output
///
/// Only a key whose payload is in hand is ever audible. Keys still being
/// fetched are tracked by the audio cache, not here.
#[derive(Debug, Clone, Default)]
pub struct AudioDeck {
    playing: Option<AudioKey>,
}

impl AudioDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self, key: &AudioKey) -> bool {
        self.playing.as_ref() == Some(key)
    }

    /// Make `key` the only audible resource
    ///
    /// Returns the key that was stopped to make room, if any.
    pub fn play(&mut self, key: &AudioKey) -> Option<AudioKey> {
        self.playing
            .replace(key.clone())
            .filter(|previous| previous != key)
    }

    /// Playback of `key` reached its natural end
    ///
    /// Returns `false` if the key was not playing (e.g. it was preempted).
    pub fn ended(&mut self, key: &AudioKey) -> bool {
        if self.is_playing(key) {
            self.playing = None;
            return true;
        }
        false
    }

    pub fn playing(&self) -> Option<&AudioKey> {
        self.playing.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_decodes_payload() {
        let clip = AudioClip::from_base64("SUQzBAA=").unwrap();
        assert_eq!(clip.to_base64(), "SUQzBAA=");
    }

    #[test]
    fn test_clip_rejects_empty_and_garbage() {
        assert_eq!(AudioClip::from_base64("").unwrap_err(), "missing audio");
        assert!(AudioClip::from_base64("%%not base64%%").is_err());
    }

    #[test]
    fn test_play_stops_the_previous_key() {
        let (a, b) = (AudioKey::new("a"), AudioKey::new("b"));
        let mut deck = AudioDeck::new();

        assert_eq!(deck.play(&a), None);
        assert_eq!(deck.play(&b), Some(a.clone()));

        assert!(!deck.is_playing(&a));
        assert_eq!(deck.playing(), Some(&b));
    }

    #[test]
    fn test_replaying_same_key_preempts_nothing() {
        let a = AudioKey::new("a");
        let mut deck = AudioDeck::new();

        deck.play(&a);
        assert_eq!(deck.play(&a), None);
        assert!(deck.ended(&a));
        assert!(!deck.ended(&a));
        assert_eq!(deck.playing(), None);
    }
}
