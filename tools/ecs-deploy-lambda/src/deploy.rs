use crate::config::Config;
use crate::ecr::Ecr;
use crate::ecs::Ecs;
use crate::error::{self, Result};
use crate::image;
use crate::task_definition::{self, RegisterTaskDefinition};
use log::{debug, info, warn};
use snafu::OptionExt;

/// The outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Deployment {
    /// Image reference the main container now runs.
    pub(crate) new_image: String,
    /// ARN of the registered task definition revision.
    pub(crate) task_definition_arn: String,
}

/// Rolls the configured service onto a new version of its image.
pub(crate) struct Deployer {
    config: Config,
    ecs: Box<dyn Ecs>,
    ecr: Box<dyn Ecr>,
}

impl Deployer {
    pub(crate) fn from_parts(config: Config, ecs: Box<dyn Ecs>, ecr: Box<dyn Ecr>) -> Self {
        Self { config, ecs, ecr }
    }

    /// Registers a copy of the configured task definition whose first container runs `version`
    /// of the image, and points the service at it.
    ///
    /// The service update only starts a rolling deployment; it isn't awaited. If the update
    /// fails, the registered revision is left in place.
    pub(crate) async fn deploy(&self, version: &str) -> Result<Deployment> {
        info!(
            "Deploying version '{}' to service '{}' in cluster '{}'",
            version, self.config.ecs_service, self.config.ecs_cluster
        );

        let described = self
            .ecs
            .describe_task_definition(&self.config.ecs_taskdef)
            .await?;
        debug!(
            "Current task definition: {}",
            described
                .task_definition
                .task_definition_arn()
                .unwrap_or_default()
        );

        let new_image = self.image_reference(version).await?;

        let mut request = RegisterTaskDefinition::from_described(described);
        let container = request
            .main_container_mut()
            .context(error::NoContainerDefinitionsSnafu {
                task_definition: &self.config.ecs_taskdef,
            })?;
        task_definition::set_image(container, new_image.as_str());
        match task_definition::set_stream_prefix(container, version) {
            Some(prefix) => debug!("Set log stream prefix to '{}'", prefix),
            None => debug!("Container doesn't use awslogs, leaving log options alone"),
        }

        let registered = self.ecs.register_task_definition(request).await?;
        let task_definition_arn = registered.task_definition_arn.context(error::MissingSnafu {
            operation: "RegisterTaskDefinition",
            field: "taskDefinitionArn",
        })?;
        info!("Registered task definition '{}'", task_definition_arn);

        self.ecs
            .update_service(
                &self.config.ecs_cluster,
                &self.config.ecs_service,
                &task_definition_arn,
            )
            .await?;
        info!(
            "Updated service '{}' to '{}'",
            self.config.ecs_service, task_definition_arn
        );

        Ok(Deployment {
            new_image,
            task_definition_arn,
        })
    }

    /// Returns the reference for `version` of the configured image: by tag, or by digest when
    /// digest pinning is enabled and the image is in ECR.
    async fn image_reference(&self, version: &str) -> Result<String> {
        let image_name = &self.config.image_name;
        if !self.config.ecr_use_image_digest {
            return Ok(image::tagged(image_name, version));
        }

        match image::ecr_repository(image_name) {
            Some(repository) => {
                let digest = self.ecr.image_digest(repository, version).await?;
                debug!("Resolved '{}:{}' to '{}'", repository, version, digest);
                Ok(image::pinned(image_name, &digest))
            }
            None => {
                warn!(
                    "Image '{}' is not in ECR, referencing it by tag instead of digest",
                    image_name
                );
                Ok(image::tagged(image_name, version))
            }
        }
    }
}
