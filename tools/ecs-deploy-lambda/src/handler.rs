//! The function's request and response payloads.

use crate::deploy::{Deployer, Deployment};
use crate::error::{self, Result};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::ResultExt;

/// The invocation payload. `version` is kept loosely typed so that a malformed value is reported
/// in the response instead of being rejected by the runtime.
#[derive(Debug, Deserialize)]
pub(crate) struct DeployRequest {
    /// Image tag to deploy.
    #[serde(default)]
    pub(crate) version: Option<Value>,
}

impl DeployRequest {
    pub(crate) fn from_payload(payload: Value) -> Result<Self> {
        serde_json::from_value(payload).context(error::InvalidRequestSnafu)
    }

    /// Returns the requested version, which must be a string.
    pub(crate) fn version(self) -> Result<String> {
        match self.version {
            None | Some(Value::Null) => error::MissingVersionSnafu.fail(),
            Some(Value::String(version)) => Ok(version),
            Some(other) => error::InvalidVersionSnafu {
                version: other.to_string(),
            }
            .fail(),
        }
    }
}

/// Serializes as `{"status": "OK", "new_image": ..., "task_definition": ...}` or
/// `{"status": "ERROR", "message": ...}`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "status")]
pub(crate) enum DeployResponse {
    #[serde(rename = "OK")]
    Success {
        new_image: String,
        task_definition: String,
    },
    #[serde(rename = "ERROR")]
    Failure { message: String },
}

impl From<Result<Deployment>> for DeployResponse {
    fn from(result: Result<Deployment>) -> Self {
        match result {
            Ok(deployment) => DeployResponse::Success {
                new_image: deployment.new_image,
                task_definition: deployment.task_definition_arn,
            },
            Err(e) => DeployResponse::Failure {
                message: e.to_string(),
            },
        }
    }
}

/// Runs a deployment for the invocation payload. Failures are reported in the response rather
/// than returned, so every invocation completes with a payload. `deployer` holds the
/// configuration error instead if the function couldn't be configured at startup.
pub(crate) async fn handle(deployer: &Result<Deployer>, payload: Value) -> DeployResponse {
    let deployer = match deployer {
        Ok(deployer) => deployer,
        Err(e) => {
            error!("Deployment failed: {}", e);
            return DeployResponse::Failure {
                message: e.to_string(),
            };
        }
    };

    let result = match DeployRequest::from_payload(payload).and_then(DeployRequest::version) {
        Ok(version) => deployer.deploy(&version).await,
        Err(e) => Err(e),
    };
    if let Err(e) = &result {
        error!("Deployment failed: {}", e);
    }
    result.into()
}
