// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AWS provider adapter backed by the `aws` CLI.
//!
//! Shells out to `aws ec2 ...` with `--output json` and parses the
//! response with serde_json. Credentials and region come from the
//! standard AWS environment/config chain; an explicit region can be
//! forced per adapter.

use super::{CloudError, CloudProvider, InstanceInfo, InstanceState, LaunchSpec};
use crate::subprocess::{run_with_timeout, CLOUD_TIMEOUT};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::process::Command;

/// Cloud provider implementation that wraps the `aws` binary.
#[derive(Clone, Debug, Default)]
pub struct AwsCliProvider {
    region: Option<String>,
}

impl AwsCliProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
        }
    }

    async fn ec2(&self, args: &[&str], description: &str) -> Result<Value, CloudError> {
        let mut cmd = Command::new("aws");
        cmd.arg("ec2").args(args).args(["--output", "json"]);
        if let Some(ref region) = self.region {
            cmd.args(["--region", region]);
        }
        let output = run_with_timeout(cmd, CLOUD_TIMEOUT, description)
            .await
            .map_err(CloudError::Call)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::Call(format!(
                "{}: {}",
                description,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|e| CloudError::Parse(format!("{}: {}", description, e)))
    }
}

/// Whether a failed describe means "no such instance" rather than a
/// transient provider error.
fn is_not_found(message: &str) -> bool {
    message.contains("InvalidInstanceID.NotFound") || message.contains("InvalidInstanceID.Malformed")
}

fn parse_instance(value: &Value) -> Result<InstanceInfo, CloudError> {
    let id = value
        .get("InstanceId")
        .and_then(Value::as_str)
        .ok_or_else(|| CloudError::Parse("instance without InstanceId".to_string()))?;
    let state = value
        .pointer("/State/Name")
        .and_then(Value::as_str)
        .map(InstanceState::from_name)
        .ok_or_else(|| CloudError::Parse(format!("instance {} without State", id)))?;
    let launched_at = value
        .get("LaunchTime")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));
    let public_host = value
        .get("PublicDnsName")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            value
                .get("PublicIpAddress")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string);
    let instance_type = value
        .get("InstanceType")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(InstanceInfo {
        id: id.to_string(),
        state,
        launched_at,
        public_host,
        instance_type,
    })
}

fn reservation_instances(doc: &Value) -> Vec<&Value> {
    doc.get("Reservations")
        .and_then(Value::as_array)
        .map(|reservations| {
            reservations
                .iter()
                .filter_map(|r| r.get("Instances").and_then(Value::as_array))
                .flatten()
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl CloudProvider for AwsCliProvider {
    async fn run_instance(&self, spec: &LaunchSpec) -> Result<String, CloudError> {
        let doc = self
            .ec2(
                &[
                    "run-instances",
                    "--image-id",
                    &spec.image,
                    "--instance-type",
                    &spec.instance_type,
                    "--security-group-ids",
                    &spec.security_group,
                    "--subnet-id",
                    &spec.subnet,
                    "--count",
                    "1",
                ],
                "ec2 run-instances",
            )
            .await?;
        doc.pointer("/Instances/0/InstanceId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CloudError::Parse("run-instances returned no instance".to_string()))
    }

    async fn describe_instance(&self, id: &str) -> Result<Option<InstanceInfo>, CloudError> {
        let result = self
            .ec2(
                &["describe-instances", "--instance-ids", id],
                "ec2 describe-instances",
            )
            .await;
        let doc = match result {
            Ok(doc) => doc,
            Err(CloudError::Call(msg)) if is_not_found(&msg) => return Ok(None),
            Err(e) => return Err(e),
        };
        match reservation_instances(&doc).first() {
            Some(instance) => Ok(Some(parse_instance(instance)?)),
            None => Ok(None),
        }
    }

    async fn instance_status(&self, id: &str) -> Result<Option<InstanceState>, CloudError> {
        let result = self
            .ec2(
                &[
                    "describe-instance-status",
                    "--include-all-instances",
                    "--instance-ids",
                    id,
                ],
                "ec2 describe-instance-status",
            )
            .await;
        let doc = match result {
            Ok(doc) => doc,
            Err(CloudError::Call(msg)) if is_not_found(&msg) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(doc
            .pointer("/InstanceStatuses/0/InstanceState/Name")
            .and_then(Value::as_str)
            .map(InstanceState::from_name))
    }

    async fn stop_instance(&self, id: &str) -> Result<(), CloudError> {
        self.ec2(&["stop-instances", "--instance-ids", id], "ec2 stop-instances")
            .await
            .map(|_| ())
    }

    async fn terminate_instance(&self, id: &str) -> Result<(), CloudError> {
        self.ec2(
            &["terminate-instances", "--instance-ids", id],
            "ec2 terminate-instances",
        )
        .await
        .map(|_| ())
    }

    async fn create_tags(&self, id: &str, tags: &[(String, String)]) -> Result<(), CloudError> {
        let mut args: Vec<String> = vec![
            "create-tags".to_string(),
            "--resources".to_string(),
            id.to_string(),
            "--tags".to_string(),
        ];
        for (key, value) in tags {
            args.push(format!("Key={},Value={}", key, value));
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.ec2(&arg_refs, "ec2 create-tags").await.map(|_| ())
    }

    async fn list_tagged(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<InstanceInfo>, CloudError> {
        let filter = format!("Name=tag:{},Values={}", key, value);
        let doc = self
            .ec2(
                &["describe-instances", "--filters", &filter],
                "ec2 describe-instances by tag",
            )
            .await?;
        reservation_instances(&doc)
            .into_iter()
            .map(parse_instance)
            .collect()
    }
}

#[cfg(test)]
#[path = "aws_cli_tests.rs"]
mod tests;
