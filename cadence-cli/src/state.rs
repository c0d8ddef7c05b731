use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use cadence_maintenance::MemoryStore;

pub fn cadence_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cadence"))
}

pub fn ensure_cadence_home() -> Result<PathBuf> {
    let dir = cadence_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn state_path() -> Result<PathBuf> {
    Ok(ensure_cadence_home()?.join("state.json"))
}

pub fn read_state() -> Result<MemoryStore> {
    let p = state_path()?;
    if !p.exists() {
        return Ok(MemoryStore::new());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s).context("parse state.json")?)
}

pub fn write_state(store: &MemoryStore) -> Result<()> {
    let p = state_path()?;
    let json = serde_json::to_string_pretty(store)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
