use crate::errors::AppError;
use crate::model::InvocationContext;
use serde::{Deserialize, Serialize};

// IAM policy language version, not a date.
const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Action")]
    pub action: Vec<String>,
    #[serde(rename = "Resource")]
    pub resource: Vec<String>,
}

impl Statement {
    fn allow(actions: &[&str], resource: String) -> Self {
        Self {
            effect: "Allow".to_string(),
            action: actions.iter().map(|a| a.to_string()).collect(),
            resource: vec![resource],
        }
    }
}

pub fn company_policy(
    ctx: &InvocationContext,
    namespace: &str,
    company_id: &str,
) -> AccessPolicyDocument {
    let topic = format!(
        "arn:{}:iot:{}:{}:topic/{}/{}/*",
        ctx.partition, ctx.region, ctx.account_id, namespace, company_id
    );

    AccessPolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![
            Statement::allow(&["iot:Publish", "iot:Receive", "iot:Subscribe"], topic),
            Statement::allow(&["iot:Connect"], "*".to_string()),
        ],
    }
}

pub fn to_policy_json(document: &AccessPolicyDocument) -> Result<String, AppError> {
    serde_json::to_string(document).map_err(AppError::SerializationError)
}

pub fn policy_name(company_id: &str) -> &str {
    company_id.split('-').next().unwrap_or(company_id)
}
