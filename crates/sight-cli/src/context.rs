//! Project root discovery, config loading and lake opening.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sight_config::{PROJECT_DIR, SightConfig};
use sight_lake::SightLake;

use crate::cli::GlobalFlags;

/// Everything a gate command needs.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: SightConfig,
    pub lake: SightLake,
}

impl AppContext {
    /// Resolve the project, load its config and open its lake.
    pub fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let project_root = resolve_project_root(flags.project.as_deref())?;
        load_project_dotenv(&project_root)?;

        let config = SightConfig::load_from(&project_root).with_context(|| {
            format!(
                "failed to load sight config for {}",
                project_root.display()
            )
        })?;

        let lake_path = config.lake_path(&project_root);
        let lake = if config.lake.is_in_memory() {
            SightLake::open_in_memory(&config.lake)
        } else {
            if let Some(parent) = Path::new(&lake_path).parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create lake directory {}", parent.display())
                })?;
            }
            SightLake::open_local(&lake_path, &config.lake)
        }
        .with_context(|| format!("failed to open lake at {lake_path}"))?;
        tracing::debug!(
            project = %project_root.display(),
            lake = %lake_path,
            "context ready"
        );

        Ok(Self {
            project_root,
            config,
            lake,
        })
    }
}

/// Resolve the project root from `--project` or by walking up from the
/// current directory to the nearest `.sight` directory.
///
/// With no `.sight` directory anywhere above, the current directory is used
/// and the built-in defaults apply.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(Path::to_path_buf)
                .context("invalid --project path: '.sight' directory has no parent");
        }

        if explicit.is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    Ok(find_project_root(&start).unwrap_or(start))
}

fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

fn load_project_dotenv(root: &Path) -> anyhow::Result<()> {
    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn finds_nearest_sight_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(PROJECT_DIR)).unwrap();
        let nested = dir.path().join("uploads").join("2025");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn explicit_sight_dir_resolves_to_parent() {
        let dir = TempDir::new().unwrap();
        let sight = dir.path().join(PROJECT_DIR);

        let root = resolve_project_root(sight.to_str()).unwrap();

        assert_eq!(root, dir.path().to_path_buf());
    }

    #[test]
    fn missing_explicit_project_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        assert!(resolve_project_root(missing.to_str()).is_err());
    }
}
