use anyhow::{Context, Result};
use nfl_api::OddsSnapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Last-value odds persistence, read once at startup and rewritten on update.
pub trait OddsStore: Send {
    fn load(&self) -> Result<OddsSnapshot>;
    fn save(&self, odds: &OddsSnapshot) -> Result<()>;
}

/// JSON object on disk, replaced atomically via a sibling temp file.
#[derive(Debug, Clone)]
pub struct FileOddsStore {
    path: PathBuf,
}

impl FileOddsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "odds.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl OddsStore for FileOddsStore {
    fn load(&self) -> Result<OddsSnapshot> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(OddsSnapshot::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("invalid odds json at {}", self.path.display()))
    }

    fn save(&self, odds: &OddsSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let payload = serde_json::to_string_pretty(odds).context("serialize odds")?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, payload).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Fold freshly fetched odds into the snapshot. Returns whether anything
/// changed; existing entries are never removed.
pub fn merge_odds(current: &mut OddsSnapshot, fresh: OddsSnapshot) -> bool {
    let mut changed = false;
    for (game_id, line) in fresh {
        if current.get(&game_id) != Some(&line) {
            current.insert(game_id, line);
            changed = true;
        }
    }
    changed
}
