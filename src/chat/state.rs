//! Session state: transcript, tracked files, undo snapshots and settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

/// A single transcript entry, serialized as `{"role": ..., "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Everything a session mutates.
///
/// Owned by the session and lent to one handler at a time. The first
/// transcript entry is always the system prompt.
#[derive(Debug, Clone)]
pub struct SessionState {
    transcript: Vec<ChatMessage>,
    system_prompt: String,
    tracked_files: Vec<String>,
    undo_snapshots: HashMap<String, Vec<u8>>,
    active_model: String,
    diff_enabled: bool,
}

impl SessionState {
    /// Creates a session seeded with exactly one system message.
    pub fn new(system_prompt: impl Into<String>, model: impl Into<String>, diff: bool) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            transcript: vec![ChatMessage::new(Role::System, system_prompt.clone())],
            system_prompt,
            tracked_files: Vec::new(),
            undo_snapshots: HashMap::new(),
            active_model: model.into(),
            diff_enabled: diff,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript
            .push(ChatMessage::new(Role::Assistant, content));
    }

    /// Replaces the whole transcript, as `/load` does.
    ///
    /// Rejects transcripts that do not start with a system message so the
    /// leading-system invariant survives a load; the current transcript is
    /// left untouched in that case.
    pub fn replace_transcript(&mut self, transcript: Vec<ChatMessage>) -> Result<(), String> {
        match transcript.first() {
            Some(first) if first.role == Role::System => {
                self.transcript = transcript;
                Ok(())
            }
            Some(first) => Err(format!(
                "transcript must start with a system message, found {}",
                first.role
            )),
            None => Err("transcript is empty".to_string()),
        }
    }

    /// Drops history, tracked files and snapshots; keeps model and diff setting.
    pub fn reset(&mut self) {
        self.transcript = vec![ChatMessage::new(Role::System, self.system_prompt.clone())];
        self.tracked_files.clear();
        self.undo_snapshots.clear();
    }

    pub fn tracked_files(&self) -> &[String] {
        &self.tracked_files
    }

    /// Duplicates are kept: tracking is a list of references, not a set.
    pub fn track_file(&mut self, path: impl Into<String>) {
        self.tracked_files.push(path.into());
    }

    /// Stores a pre-edit snapshot, replacing any earlier one for the path.
    ///
    /// Snapshots are raw bytes; files need not be UTF-8.
    pub fn capture_snapshot(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.undo_snapshots.insert(path.into(), content.into());
    }

    /// Removes and returns the snapshot for `path`.
    pub fn take_snapshot(&mut self, path: &str) -> Option<Vec<u8>> {
        self.undo_snapshots.remove(path)
    }

    pub fn active_model(&self) -> &str {
        &self.active_model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.active_model = model.into();
    }

    pub const fn diff_enabled(&self) -> bool {
        self.diff_enabled
    }

    /// Flips the diff toggle and returns the new value.
    pub const fn toggle_diff(&mut self) -> bool {
        self.diff_enabled = !self.diff_enabled;
        self.diff_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new("be helpful", "test/model", true)
    }

    #[test]
    fn test_new_seeds_single_system_message() {
        let state = state();
        assert_eq!(
            state.transcript(),
            &[ChatMessage::new(Role::System, "be helpful")]
        );
        assert_eq!(state.active_model(), "test/model");
        assert!(state.diff_enabled());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut state = state();
        state.push_user("hi");
        state.push_assistant("hello");

        let roles: Vec<Role> = state.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn test_replace_transcript_requires_leading_system() {
        let mut state = state();
        state.push_user("keep me");

        let bad = vec![ChatMessage::new(Role::User, "no system")];
        assert!(state.replace_transcript(bad).is_err());
        assert!(state.replace_transcript(Vec::new()).is_err());
        assert_eq!(state.transcript().len(), 2);

        let good = vec![
            ChatMessage::new(Role::System, "other prompt"),
            ChatMessage::new(Role::User, "loaded"),
        ];
        state.replace_transcript(good.clone()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(state.transcript(), good.as_slice());
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut state = state();
        state.push_user("hi");
        state.track_file("a.rs");
        state.capture_snapshot("a.rs", "old");
        state.set_model("other/model");

        state.reset();

        assert_eq!(state.transcript().len(), 1);
        assert_eq!(state.transcript()[0].content, "be helpful");
        assert!(state.tracked_files().is_empty());
        assert!(state.take_snapshot("a.rs").is_none());
        assert_eq!(state.active_model(), "other/model");
    }

    #[test]
    fn test_track_file_keeps_duplicates() {
        let mut state = state();
        state.track_file("a.rs");
        state.track_file("a.rs");
        assert_eq!(state.tracked_files(), &["a.rs", "a.rs"]);
    }

    #[test]
    fn test_snapshot_is_single_level() {
        let mut state = state();
        state.capture_snapshot("a.rs", "first");
        state.capture_snapshot("a.rs", b"second".to_vec());

        assert_eq!(state.take_snapshot("a.rs").as_deref(), Some(&b"second"[..]));
        assert!(state.take_snapshot("a.rs").is_none());
    }

    #[test]
    fn test_toggle_diff() {
        let mut state = state();
        assert!(!state.toggle_diff());
        assert!(state.toggle_diff());
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_string(&ChatMessage::new(Role::Assistant, "x"))
            .unwrap_or_default();
        assert_eq!(json, r#"{"role":"assistant","content":"x"}"#);
    }
}
