//! In-memory `Ecs` and `Ecr` implementations that record the calls made against them.
use crate::ecr::Ecr;
use crate::ecs::Ecs;
use crate::error::{Error, Result};
use crate::task_definition::{DescribedTaskDefinition, RegisterTaskDefinition};
use async_trait::async_trait;
use aws_sdk_ecs::error::SdkError;
use aws_sdk_ecs::types::TaskDefinition;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub(crate) const ACCOUNT_ARN_PREFIX: &str = "arn:aws:ecs:us-west-2:123456789012";

/// Everything a `FakeEcs` was asked to do.
#[derive(Debug, Default)]
pub(crate) struct EcsCalls {
    pub(crate) described: Vec<String>,
    pub(crate) registered: Vec<RegisterTaskDefinition>,
    pub(crate) updated: Vec<(String, String, String)>,
}

/// An `Ecs` holding a single task definition family. Registering assigns increasing revision
/// numbers starting after the described revision.
#[derive(Clone, Default)]
pub(crate) struct FakeEcs {
    task_definition: Option<DescribedTaskDefinition>,
    fail_register: bool,
    fail_update: bool,
    calls: Arc<Mutex<EcsCalls>>,
}

impl FakeEcs {
    pub(crate) fn new(task_definition: DescribedTaskDefinition) -> Self {
        Self {
            task_definition: Some(task_definition),
            ..Default::default()
        }
    }

    /// An `Ecs` where no task definition exists.
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn failing_register(mut self) -> Self {
        self.fail_register = true;
        self
    }

    pub(crate) fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    /// A handle on the calls, which stays valid after the fake is boxed.
    pub(crate) fn calls(&self) -> Arc<Mutex<EcsCalls>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Ecs for FakeEcs {
    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<DescribedTaskDefinition> {
        self.calls
            .lock()
            .unwrap()
            .described
            .push(task_definition.to_string());
        self.task_definition
            .clone()
            .ok_or_else(|| Error::DescribeTaskDefinition {
                task_definition: task_definition.to_string(),
                source: SdkError::construction_failure("Unable to describe task definition."),
            })
    }

    async fn register_task_definition(
        &self,
        request: RegisterTaskDefinition,
    ) -> Result<TaskDefinition> {
        let family = request.family.clone().unwrap_or_default();
        let mut calls = self.calls.lock().unwrap();
        calls.registered.push(request);
        if self.fail_register {
            return Err(Error::RegisterTaskDefinition {
                family,
                source: SdkError::construction_failure("Too many concurrent attempts"),
            });
        }

        let base = self
            .task_definition
            .as_ref()
            .map(|described| described.task_definition.revision())
            .unwrap_or_default();
        let revision = base + calls.registered.len() as i32;
        Ok(TaskDefinition::builder()
            .task_definition_arn(format!(
                "{}:task-definition/{}:{}",
                ACCOUNT_ARN_PREFIX, family, revision
            ))
            .family(family)
            .revision(revision)
            .build())
    }

    async fn update_service(
        &self,
        cluster: &str,
        service: &str,
        task_definition_arn: &str,
    ) -> Result<()> {
        self.calls.lock().unwrap().updated.push((
            cluster.to_string(),
            service.to_string(),
            task_definition_arn.to_string(),
        ));
        if self.fail_update {
            return Err(Error::UpdateService {
                cluster: cluster.to_string(),
                service: service.to_string(),
                source: SdkError::construction_failure("Service not found"),
            });
        }
        Ok(())
    }
}

/// An `Ecr` with a fixed tag-to-digest mapping.
#[derive(Clone, Default)]
pub(crate) struct FakeEcr {
    digests: HashMap<String, String>,
    lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeEcr {
    pub(crate) fn with_digest<S1, S2>(mut self, tag: S1, digest: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.digests.insert(tag.into(), digest.into());
        self
    }

    pub(crate) fn lookups(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.lookups)
    }
}

#[async_trait]
impl Ecr for FakeEcr {
    async fn image_digest(&self, repository: &str, tag: &str) -> Result<String> {
        self.lookups
            .lock()
            .unwrap()
            .push((repository.to_string(), tag.to_string()));
        self.digests
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::ImageNotFound {
                repository: repository.to_string(),
                tag: tag.to_string(),
            })
    }
}
