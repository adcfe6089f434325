//! The ECS control-plane operations a deployment uses.

use crate::error::{self, Result};
use crate::task_definition::{DescribedTaskDefinition, RegisterTaskDefinition};
use async_trait::async_trait;
use aws_sdk_ecs::types::{TaskDefinition, TaskDefinitionField};
use aws_types::SdkConfig;
use log::debug;
use snafu::{OptionExt, ResultExt};

/// The ECS operations needed to roll a service onto a new task definition revision.
#[async_trait]
pub(crate) trait Ecs: Send + Sync {
    /// Describes a task definition, given as a family, `family:revision`, or ARN, including its
    /// tags.
    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<DescribedTaskDefinition>;

    /// Registers a new revision and returns it.
    async fn register_task_definition(
        &self,
        request: RegisterTaskDefinition,
    ) -> Result<TaskDefinition>;

    /// Points a service at a task definition ARN. Returns once ECS accepts the update; the
    /// rollout itself continues in the background.
    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        task_definition_arn: &str,
    ) -> Result<()>;
}

/// `Ecs` backed by the AWS SDK.
pub(crate) struct AwsEcs {
    client: aws_sdk_ecs::Client,
}

impl AwsEcs {
    pub(crate) fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(config),
        }
    }
}

#[async_trait]
impl Ecs for AwsEcs {
    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<DescribedTaskDefinition> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .include(TaskDefinitionField::Tags)
            .send()
            .await
            .context(error::DescribeTaskDefinitionSnafu { task_definition })?;

        let tags = output.tags.unwrap_or_default();
        let task_definition = output.task_definition.context(error::MissingSnafu {
            operation: "DescribeTaskDefinition",
            field: "taskDefinition",
        })?;
        debug!(
            "Described task definition '{}'",
            task_definition.task_definition_arn().unwrap_or_default()
        );

        Ok(DescribedTaskDefinition {
            task_definition,
            tags,
        })
    }

    async fn register_task_definition(
        &self,
        request: RegisterTaskDefinition,
    ) -> Result<TaskDefinition> {
        let family = request.family.clone().unwrap_or_default();
        self.client
            .register_task_definition()
            .set_container_definitions(request.container_definitions)
            .set_cpu(request.cpu)
            .set_execution_role_arn(request.execution_role_arn)
            .set_family(request.family)
            .set_ipc_mode(request.ipc_mode)
            .set_memory(request.memory)
            .set_network_mode(request.network_mode)
            .set_pid_mode(request.pid_mode)
            .set_placement_constraints(request.placement_constraints)
            .set_proxy_configuration(request.proxy_configuration)
            .set_requires_compatibilities(request.requires_compatibilities)
            .set_tags(request.tags)
            .set_task_role_arn(request.task_role_arn)
            .set_volumes(request.volumes)
            .send()
            .await
            .context(error::RegisterTaskDefinitionSnafu { family })?
            .task_definition
            .context(error::MissingSnafu {
                operation: "RegisterTaskDefinition",
                field: "taskDefinition",
            })
    }

    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        task_definition_arn: &str,
    ) -> Result<()> {
        self.client
            .update_service()
            .cluster(cluster)
            .service(service)
            .task_definition(task_definition_arn)
            .send()
            .await
            .context(error::UpdateServiceSnafu { cluster, service })?;
        Ok(())
    }
}
