use crate::config::Config;
use crate::dynamodb::RecordStore;
use crate::errors::AppError;
use crate::event::IncomingEvent;
use crate::iot::{DeviceRegistry, KeysAndCertificate};
use crate::s3::CodeStorage;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    pub registry: Arc<dyn DeviceRegistry>,
    pub storage: Arc<dyn CodeStorage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub partition: String,
    pub region: String,
    pub account_id: String,
}

impl InvocationContext {
    // arn:<partition>:lambda:<region>:<account-id>:function:<name>[:<qualifier>]
    pub fn from_function_arn(arn: &str) -> Result<Self, AppError> {
        let parts: Vec<&str> = arn.split(':').collect();
        match parts.as_slice() {
            ["arn", partition, _service, region, account_id, ..]
                if !partition.is_empty() && !region.is_empty() && !account_id.is_empty() =>
            {
                Ok(Self {
                    partition: partition.to_string(),
                    region: region.to_string(),
                    account_id: account_id.to_string(),
                })
            }
            _ => Err(AppError::InvalidContext(format!(
                "malformed invoked function ARN: {:?}",
                arn
            ))),
        }
    }
}

pub fn new_company_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub sub: String,
    pub company_id: String,
    pub user_name: String,
    pub payed: bool,
    pub service_tier: i64,
    pub role: String,
}

impl UserRecord {
    pub fn for_new_company(event: &IncomingEvent, company_id: String) -> Self {
        let attributes = &event.request.user_attributes;
        Self {
            email: attributes.email.clone(),
            sub: attributes.sub.clone(),
            company_id,
            user_name: event.user_name.clone(),
            payed: false,
            service_tier: 0,
            role: "admin".to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub company_id: String,
    pub created_by: String,
    pub certificate_arn: String,
    pub certificate_id: String,
    pub certificate_pem: String,
    pub private_key: String,
    pub public_key: String,
}

impl CertificateRecord {
    pub fn new(user: &UserRecord, keys: &KeysAndCertificate) -> Self {
        Self {
            company_id: user.company_id.clone(),
            created_by: user.sub.clone(),
            certificate_arn: keys.certificate_arn.clone(),
            certificate_id: keys.certificate_id.clone(),
            certificate_pem: keys.certificate_pem.clone(),
            private_key: keys.private_key.clone(),
            public_key: keys.public_key.clone(),
        }
    }
}

// Keeps key material out of logs.
impl fmt::Debug for CertificateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateRecord")
            .field("company_id", &self.company_id)
            .field("created_by", &self.created_by)
            .field("certificate_arn", &self.certificate_arn)
            .field("certificate_id", &self.certificate_id)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
