use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_iot::operation::attach_policy::AttachPolicyError;
use aws_sdk_iot::operation::attach_thing_principal::AttachThingPrincipalError;
use aws_sdk_iot::operation::create_keys_and_certificate::CreateKeysAndCertificateError;
use aws_sdk_iot::operation::create_policy::CreatePolicyError;
use aws_sdk_iot::operation::create_thing::CreateThingError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use std::fmt;
use thiserror::Error;

/// Error type crossing the service seams, so fakes can inject any failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum DynamodbError {
    #[error("Put Item error: {0}")]
    PutItemError(#[from] SdkError<PutItemError>),
}

#[derive(Debug, Error)]
pub enum IotError {
    #[error("Create keys and certificate error: {0}")]
    CreateKeysAndCertificateError(#[from] SdkError<CreateKeysAndCertificateError>),

    #[error("Create policy error: {0}")]
    CreatePolicyError(#[from] SdkError<CreatePolicyError>),

    #[error("Attach policy error: {0}")]
    AttachPolicyError(#[from] SdkError<AttachPolicyError>),

    #[error("Create thing error: {0}")]
    CreateThingError(#[from] SdkError<CreateThingError>),

    #[error("Attach thing principal error: {0}")]
    AttachThingPrincipalError(#[from] SdkError<AttachThingPrincipalError>),

    #[error("IoT response is missing {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("Put Object error: {0}")]
    PutObjectError(#[from] SdkError<PutObjectError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PutUser,
    CreateKeysAndCertificate,
    PutCertificate,
    CreatePolicy,
    AttachPolicy,
    CreateThing,
    AttachThingPrincipal,
    CreateCodePrefix,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::PutUser => "put_user",
            Step::CreateKeysAndCertificate => "create_keys_and_certificate",
            Step::PutCertificate => "put_certificate",
            Step::CreatePolicy => "create_policy",
            Step::AttachPolicy => "attach_policy",
            Step::CreateThing => "create_thing",
            Step::AttachThingPrincipal => "attach_thing_principal",
            Step::CreateCodePrefix => "create_code_prefix",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resources created earlier in the invocation and left behind by a failure.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Orphans(pub Vec<String>);

impl fmt::Display for Orphans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&self.0.join(", "))
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Decode error: {0}")]
    DecodeError(#[source] serde_json::Error),

    #[error("Persistence error at {step} (table {table}, orphaned: {orphans}): {source}")]
    PersistenceError {
        step: Step,
        table: String,
        orphans: Orphans,
        #[source]
        source: BoxError,
    },

    #[error("Provisioning error at {step} (orphaned: {orphans}): {source}")]
    ProvisioningError {
        step: Step,
        orphans: Orphans,
        #[source]
        source: BoxError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[source] serde_json::Error),

    #[error("Invalid invocation context: {0}")]
    InvalidContext(String),
}

impl AppError {
    pub fn step(&self) -> Option<Step> {
        match self {
            AppError::PersistenceError { step, .. } | AppError::ProvisioningError { step, .. } => {
                Some(*step)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DecodeError(_) => "DecodeError",
            AppError::PersistenceError { .. } => "PersistenceError",
            AppError::ProvisioningError { .. } => "ProvisioningError",
            AppError::SerializationError(_) => "SerializationError",
            AppError::InvalidContext(_) => "InvalidContext",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisioning_error_names_step_and_orphans() {
        let err = AppError::ProvisioningError {
            step: Step::CreateThing,
            orphans: Orphans(vec!["certificate arn:cert".to_string(), "policy abcd".to_string()]),
            source: "throttled".into(),
        };

        assert_eq!(err.step(), Some(Step::CreateThing));
        assert_eq!(err.kind(), "ProvisioningError");
        assert_eq!(
            err.to_string(),
            "Provisioning error at create_thing (orphaned: certificate arn:cert, policy abcd): throttled"
        );
    }

    #[test]
    fn persistence_error_without_orphans() {
        let err = AppError::PersistenceError {
            step: Step::PutUser,
            table: "users".to_string(),
            orphans: Orphans::default(),
            source: "access denied".into(),
        };

        assert!(err.to_string().contains("orphaned: none"));
        assert!(err.to_string().contains("table users"));
    }
}
