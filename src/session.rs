//! Editing sessions: one source file bound to its segment timeline.

use parking_lot::Mutex;
use segcut_av::Toolchain;
use segcut_timeline::{
    Command, CutSpec, EditError, Editor, EngineSettings, Segment, Timeline, DEFAULT_BASE_NAME,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no session is open")]
    NoSession,

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("command {position} rejected: {source}")]
    Script {
        position: usize,
        #[source]
        source: EditError,
    },

    #[error(transparent)]
    Media(#[from] segcut_av::Error),
}

impl SessionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoSession => "no_session",
            Self::Edit(e) | Self::Script { source: e, .. } => e.kind(),
            Self::Media(e) => e.kind(),
        }
    }

    /// Boundary value behind a rejected edit.
    pub fn offending_value(&self) -> Option<f64> {
        match self {
            Self::Edit(e) | Self::Script { source: e, .. } => e.offending_value(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Base identifier for generated names: the file stem, or `output`.
pub fn base_name_for(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string())
}

#[derive(Debug, Clone)]
pub struct Session {
    source: Option<PathBuf>,
    editor: Editor,
}

impl Session {
    /// Open `path`, probing its duration. The timeline starts empty.
    pub fn open(tools: &Toolchain, path: &Path, settings: EngineSettings) -> Result<Self> {
        let duration = segcut_av::probe_duration(tools, path)?;
        Self::with_duration(Some(path.to_path_buf()), duration, settings)
    }

    /// Open a session with a known duration, without probing.
    pub fn with_duration(
        source: Option<PathBuf>,
        duration: f64,
        settings: EngineSettings,
    ) -> Result<Self> {
        let timeline = Timeline::with_base_name(duration, base_name_for(source.as_deref()))?;
        tracing::info!(source = ?source, duration, "session opened");
        Ok(Self {
            source,
            editor: Editor::new(timeline, settings),
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn timeline(&self) -> &Timeline {
        self.editor.timeline()
    }

    pub fn settings(&self) -> &EngineSettings {
        self.editor.settings()
    }

    pub fn cut_list(&self) -> Vec<CutSpec> {
        self.timeline().cut_list()
    }

    pub fn apply(&mut self, command: &Command) -> Result<&Timeline> {
        Ok(self.editor.apply(command)?)
    }

    /// Apply all commands or none of them.
    pub fn apply_script(&mut self, commands: &[Command]) -> Result<()> {
        let mut editor = self.editor.clone();
        editor
            .apply_all(commands)
            .map_err(|(position, source)| SessionError::Script { position, source })?;
        self.editor = editor;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let timeline = self.timeline();
        let settings = self.settings();
        SessionSnapshot {
            source: self.source.clone(),
            duration: timeline.duration(),
            base_name: timeline.base_name().to_string(),
            segment_length: settings.segment_length.map(|l| l.as_secs()),
            keep_locked: settings.keep_locked,
            uncovered: timeline.uncovered(),
            segments: timeline.segments().to_vec(),
        }
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub source: Option<PathBuf>,
    pub duration: f64,
    pub base_name: String,
    pub segment_length: Option<f64>,
    pub keep_locked: bool,
    /// Seconds of the duration not covered by any segment.
    pub uncovered: f64,
    pub segments: Vec<Segment>,
}

/// Holder of the single open session.
///
/// Commands are serialized through the lock, so at most one operation is in
/// flight at a time.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any open session.
    pub fn open(&self, session: Session) -> SessionSnapshot {
        let snapshot = session.snapshot();
        let previous = self.inner.lock().replace(session);
        if previous.is_some() {
            tracing::debug!("previous session replaced");
        }
        snapshot
    }

    pub fn close(&self) -> bool {
        self.inner.lock().take().is_some()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.inner.lock().as_ref().map(Session::snapshot)
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> Result<R>) -> Result<R> {
        let mut guard = self.inner.lock();
        let session = guard.as_mut().ok_or(SessionError::NoSession)?;
        f(session)
    }

    /// Apply a batch atomically and return the new state.
    pub fn apply(&self, commands: &[Command]) -> Result<SessionSnapshot> {
        self.with_session(|session| {
            session.apply_script(commands)?;
            Ok(session.snapshot())
        })
    }
}

#[derive(Deserialize)]
struct Script {
    commands: Vec<Command>,
}

/// Parse a command script.
///
/// TOML scripts list `[[commands]]` tables; JSON scripts are either an array
/// of commands or an object with a `commands` array.
pub fn parse_script(content: &str, is_toml: bool) -> anyhow::Result<Vec<Command>> {
    if is_toml {
        let script: Script = toml::from_str(content)?;
        return Ok(script.commands);
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JsonScript {
        List(Vec<Command>),
        Wrapped(Script),
    }

    Ok(match serde_json::from_str(content)? {
        JsonScript::List(commands) => commands,
        JsonScript::Wrapped(script) => script.commands,
    })
}

/// Read a command script, choosing the format from the file extension.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<Command>> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {:?}", path))?;
    let is_toml = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    parse_script(&content, is_toml).with_context(|| format!("Failed to parse script: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use segcut_timeline::{Boundary, TimeValue};

    fn session() -> Session {
        Session::with_duration(
            Some(PathBuf::from("/music/talk.mp3")),
            125.0,
            EngineSettings::default(),
        )
        .unwrap()
    }

    fn generate(secs: f64) -> Command {
        Command::Generate {
            length: Some(TimeValue::Seconds(secs)),
            keep_locked: None,
        }
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name_for(Some(Path::new("/a/b/talk.mp3"))), "talk");
        assert_eq!(base_name_for(None), "output");
    }

    #[test]
    fn test_open_with_duration_starts_empty() {
        let s = session();
        assert!(s.timeline().is_empty());
        assert_eq!(s.timeline().base_name(), "talk");
        assert_eq!(s.source(), Some(Path::new("/music/talk.mp3")));
    }

    #[test]
    fn test_invalid_duration() {
        assert_matches!(
            Session::with_duration(None, 0.0, EngineSettings::default()),
            Err(SessionError::Edit(EditError::InvalidDuration(_)))
        );
    }

    #[test]
    fn test_script_is_atomic() {
        let mut s = session();
        s.apply(&generate(60.0)).unwrap();
        let before = s.timeline().clone();

        let err = s
            .apply_script(&[
                Command::ToggleLock { index: 0 },
                Command::Delete { index: 9 },
            ])
            .unwrap_err();
        assert_matches!(err, SessionError::Script { position: 1, .. });
        assert_eq!(err.kind(), "index_out_of_bounds");
        assert_eq!(err.offending_value(), None);
        assert_eq!(s.timeline(), &before);
    }

    #[test]
    fn test_script_error_carries_value() {
        let mut s = session();
        s.apply(&generate(60.0)).unwrap();

        let err = s
            .apply_script(&[
                Command::ToggleLock { index: 0 },
                Command::SetBoundary {
                    index: 1,
                    field: Boundary::Start,
                    value: TimeValue::Seconds(45.0),
                },
            ])
            .unwrap_err();
        assert_eq!(err.kind(), "boundary_conflict");
        assert_eq!(err.offending_value(), Some(45.0));
    }

    #[test]
    fn test_store_lifecycle() {
        let store = SessionStore::new();
        assert!(store.snapshot().is_none());
        assert_matches!(store.apply(&[generate(60.0)]), Err(SessionError::NoSession));

        store.open(session());
        let snap = store.apply(&[generate(60.0)]).unwrap();
        assert_eq!(snap.segments.len(), 3);
        assert_eq!(snap.segment_length, Some(60.0));
        assert_eq!(snap.uncovered, 0.0);

        let snap = store
            .apply(&[Command::SetBoundary {
                index: 0,
                field: Boundary::End,
                value: "00:00:40".into(),
            }])
            .unwrap();
        assert_eq!(snap.segments[1].start, 40.0);

        assert!(store.close());
        assert!(!store.close());
    }

    #[test]
    fn test_parse_json_script() {
        let commands = parse_script(
            r#"[{"op": "generate", "length": 30}, {"op": "toggle_lock", "index": 1}]"#,
            false,
        )
        .unwrap();
        assert_eq!(commands.len(), 2);

        let wrapped = parse_script(r#"{"commands": [{"op": "clear"}]}"#, false).unwrap();
        assert_eq!(wrapped, vec![Command::Clear]);
    }

    #[test]
    fn test_parse_toml_script() {
        let commands = parse_script(
            r#"
            [[commands]]
            op = "generate"
            length = "00:00:30"

            [[commands]]
            op = "shift"
            index = 1
            delta = 0.5
            unit = "minutes"
            "#,
            true,
        )
        .unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].name(), "shift");
    }
}
