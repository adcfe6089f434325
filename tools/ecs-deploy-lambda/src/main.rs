#![deny(unused_imports)]

/*!
# Introduction

This is a lambda function that rolls an ECS service onto a new version of its container image.

Each invocation takes the version to deploy:

```json
{ "version": "2.3" }
```

The function describes the service's current task definition, points its first container at
`<IMAGE_NAME>:<version>`, and registers the result as a new revision. If the container logs with
the `awslogs` driver, its `awslogs-stream-prefix` is set to `<container-name>/<version>/` so each
version's logs land in their own streams. Only the fields RegisterTaskDefinition accepts are
carried over, and every other container is registered unchanged. The service is then updated to
the new revision, which starts a rolling deployment; the function doesn't wait for it.

The function returns:

```json
{ "status": "OK", "new_image": "<image>", "task_definition": "<new task definition ARN>" }
```

or, if any step fails:

```json
{ "status": "ERROR", "message": "<description of the failure>" }
```

There is no rollback. If the service update fails, the new revision is left registered.

# Configuration

Configuration is read from the environment when the function starts. If it can't be read, the
function still starts and every invocation returns the configuration error:

* `ECS_CLUSTER`: the cluster running the service.
* `ECS_SERVICE`: the service to update.
* `ECS_TASKDEF`: the task definition to base new revisions on, as a family, `family:revision`, or
  ARN.
* `IMAGE_NAME`: the image repository, without a tag.
* `ECR_USE_IMAGE_DIGEST` (optional): when `true` and `IMAGE_NAME` is an ECR repository, the tag
  is resolved through ECR and the container references the image by digest. Any other value
  references the image by tag, and ECR isn't called; a tag missing from ECR is then only noticed
  when ECS pulls the image.
* `DEPLOY_LOG_LEVEL` (optional): one of `trace`, `debug`, `info`, `warn`, `error`. Defaults to
  `info`, which is also used if the value isn't a valid level.

Region and credentials come from the function's execution environment.

# Compiling & Building

The lambda binary is named `bootstrap` for the `provided` runtimes. Build it for the function's
architecture, e.g. with `cargo lambda build --release`, and zip the `bootstrap` binary.
*/

mod aws;
mod config;
mod deploy;
mod ecr;
mod ecs;
mod error;
#[cfg(test)]
mod fake;
mod handler;
mod image;
mod task_definition;

use crate::config::{Config, DEFAULT_LOG_LEVEL, LOG_LEVEL_ENV_VAR};
use crate::deploy::Deployer;
use crate::ecr::AwsEcr;
use crate::ecs::AwsEcs;
use lambda_runtime::{service_fn, LambdaEvent};
use log::{error, info, warn};
use serde_json::Value;
use simplelog::{Config as LogConfig, SimpleLogger};
use snafu::ResultExt;
use std::{env, process};

async fn run() -> std::result::Result<(), lambda_runtime::Error> {
    let log_level = config::log_level(env::var(LOG_LEVEL_ENV_VAR).ok().as_deref());
    SimpleLogger::init(
        log_level.as_ref().map_or(DEFAULT_LOG_LEVEL, |level| *level),
        LogConfig::default(),
    )
    .context(error::LoggerSnafu)?;
    if let Err(e) = &log_level {
        warn!("{}, logging at '{}'", e, DEFAULT_LOG_LEVEL);
    }

    let sdk_config = aws::sdk_config().await;
    // A configuration error is reported by every invocation rather than failing startup.
    let deployer = Config::from_env().map(|config| {
        info!(
            "Ready to deploy '{}' to service '{}' in cluster '{}' based on task definition '{}'",
            config.image_name, config.ecs_service, config.ecs_cluster, config.ecs_taskdef
        );
        Deployer::from_parts(
            config,
            Box::new(AwsEcs::new(&sdk_config)),
            Box::new(AwsEcr::new(&sdk_config)),
        )
    });
    if let Err(e) = &deployer {
        error!("{}", e);
    }

    let deployer = &deployer;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<_, lambda_runtime::Error>(handler::handle(deployer, event.payload).await)
    }))
    .await
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}", e);
        process::exit(1);
    }
}
