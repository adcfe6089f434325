use crate::error::{self, Result};
use log::LevelFilter;
use serde::{Deserialize, Deserializer};
use snafu::ResultExt;
use std::str::FromStr;

/// The environment variable used to set the log level.
pub(crate) const LOG_LEVEL_ENV_VAR: &str = "DEPLOY_LOG_LEVEL";
pub(crate) const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Settings read from the function's environment, e.g. `ECS_CLUSTER` into `ecs_cluster`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Config {
    /// Cluster that runs the service.
    pub(crate) ecs_cluster: String,
    /// Service to roll onto the new revision.
    pub(crate) ecs_service: String,
    /// Task definition to base new revisions on: a family, `family:revision`, or ARN.
    pub(crate) ecs_taskdef: String,
    /// Image repository, without a tag.
    pub(crate) image_name: String,
    /// Reference ECR images by digest instead of by tag. Only the exact value `true` enables it.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub(crate) ecr_use_image_digest: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)? == "true")
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_iter(std::env::vars())
    }

    pub(crate) fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).context(error::ConfigEnvSnafu)
    }
}

/// Parses the value of `DEPLOY_LOG_LEVEL`; unset means `DEFAULT_LOG_LEVEL`.
pub(crate) fn log_level(value: Option<&str>) -> Result<LevelFilter> {
    match value {
        None => Ok(DEFAULT_LOG_LEVEL),
        Some(level) => LevelFilter::from_str(level).context(error::LogLevelSnafu { level }),
    }
}
