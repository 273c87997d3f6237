use std::path::Path;

use crate::config::Config;
use crate::core::policy::PlaceholderPolicy;
use crate::core::root::{CanonicalRoot, Resolution, RootResolver};
use crate::error::Result;

pub struct AppContext {
    pub resolution: Resolution,
    pub config: Config,
    pub policy: PlaceholderPolicy,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let resolution = Self::find_root(cli.root.as_deref())?;
        let config = Config::load(cli.config.as_deref(), Some(resolution.root.path()))?;
        let policy = PlaceholderPolicy::from_config(&config.install)?;

        Ok(Self {
            robot_mode: cli.robot || config.robot.is_json(),
            resolution,
            config,
            policy,
            verbosity: cli.verbose,
        })
    }

    #[must_use]
    pub fn root(&self) -> &CanonicalRoot {
        &self.resolution.root
    }

    fn find_root(explicit: Option<&Path>) -> Result<Resolution> {
        let resolver = RootResolver::from_env();
        if let Some(path) = explicit {
            return resolver.explicit(path);
        }
        let cwd = std::env::current_dir()?;
        resolver.resolve_and_persist(&cwd)
    }
}
