//! The task definition model used to register a new revision.
//!
//! A described task definition carries derived fields (revision, status, ARN, registration
//! timestamps, ...) that RegisterTaskDefinition rejects. `RegisterTaskDefinition` only has members
//! for the fields the registration API accepts, so the derived ones can't be sent back.

use aws_sdk_ecs::types::{
    Compatibility, ContainerDefinition, IpcMode, LogDriver, NetworkMode, PidMode,
    ProxyConfiguration, Tag, TaskDefinition, TaskDefinitionPlacementConstraint, Volume,
};
use std::collections::HashMap;

/// The `awslogs` option that sets the prefix of each container's log stream name.
pub(crate) const AWSLOGS_STREAM_PREFIX: &str = "awslogs-stream-prefix";

/// A task definition as returned by DescribeTaskDefinition, along with its tags, which the API
/// returns outside of the task definition itself.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DescribedTaskDefinition {
    pub(crate) task_definition: TaskDefinition,
    pub(crate) tags: Vec<Tag>,
}

/// The fields of a task definition that can be passed to RegisterTaskDefinition.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RegisterTaskDefinition {
    pub(crate) container_definitions: Option<Vec<ContainerDefinition>>,
    pub(crate) cpu: Option<String>,
    pub(crate) execution_role_arn: Option<String>,
    pub(crate) family: Option<String>,
    pub(crate) ipc_mode: Option<IpcMode>,
    pub(crate) memory: Option<String>,
    pub(crate) network_mode: Option<NetworkMode>,
    pub(crate) pid_mode: Option<PidMode>,
    pub(crate) placement_constraints: Option<Vec<TaskDefinitionPlacementConstraint>>,
    pub(crate) proxy_configuration: Option<ProxyConfiguration>,
    pub(crate) requires_compatibilities: Option<Vec<Compatibility>>,
    pub(crate) tags: Option<Vec<Tag>>,
    pub(crate) task_role_arn: Option<String>,
    pub(crate) volumes: Option<Vec<Volume>>,
}

impl RegisterTaskDefinition {
    /// Carries over the registrable fields of a described task definition; everything else is
    /// dropped.
    pub(crate) fn from_described(described: DescribedTaskDefinition) -> Self {
        let DescribedTaskDefinition {
            task_definition,
            tags,
        } = described;
        let TaskDefinition {
            container_definitions,
            cpu,
            execution_role_arn,
            family,
            ipc_mode,
            memory,
            network_mode,
            pid_mode,
            placement_constraints,
            proxy_configuration,
            requires_compatibilities,
            task_role_arn,
            volumes,
            ..
        } = task_definition;

        Self {
            container_definitions,
            cpu,
            execution_role_arn,
            family,
            ipc_mode,
            memory,
            network_mode,
            pid_mode,
            placement_constraints,
            proxy_configuration,
            requires_compatibilities,
            tags: if tags.is_empty() { None } else { Some(tags) },
            task_role_arn,
            volumes,
        }
    }

    /// The first container definition, which is the only one a deployment changes.
    pub(crate) fn main_container_mut(&mut self) -> Option<&mut ContainerDefinition> {
        self.container_definitions
            .as_mut()
            .and_then(|containers| containers.first_mut())
    }
}

/// Returns the log stream prefix for a container running the given version.
pub(crate) fn stream_prefix(container_name: &str, version: &str) -> String {
    format!("{}/{}/", container_name, version)
}

/// Points the container at a new image.
pub(crate) fn set_image<S>(container: &mut ContainerDefinition, image: S)
where
    S: Into<String>,
{
    container.image = Some(image.into());
}

/// Sets the `awslogs-stream-prefix` option if the container logs with the `awslogs` driver.
/// Returns the prefix that was set, or `None` if the container uses another log driver or has no
/// log configuration, in which case nothing is changed.
pub(crate) fn set_stream_prefix(
    container: &mut ContainerDefinition,
    version: &str,
) -> Option<String> {
    let prefix = stream_prefix(container.name.as_deref().unwrap_or_default(), version);
    let log_configuration = container.log_configuration.as_mut()?;
    if log_configuration.log_driver() != &LogDriver::Awslogs {
        return None;
    }

    log_configuration
        .options
        .get_or_insert_with(HashMap::new)
        .insert(AWSLOGS_STREAM_PREFIX.to_string(), prefix.clone());
    Some(prefix)
}
