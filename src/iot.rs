use crate::errors::{BoxError, IotError};
use async_trait::async_trait;
use aws_sdk_iot::types::AttributePayload;
use aws_sdk_iot::Client;

#[derive(Clone)]
pub struct KeysAndCertificate {
    pub certificate_arn: String,
    pub certificate_id: String,
    pub certificate_pem: String,
    pub public_key: String,
    pub private_key: String,
}

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn create_keys_and_certificate(&self) -> Result<KeysAndCertificate, BoxError>;

    async fn create_policy(&self, name: &str, document: &str) -> Result<String, BoxError>;

    async fn attach_policy(&self, policy_name: &str, certificate_arn: &str)
        -> Result<(), BoxError>;

    async fn create_thing(&self, company_id: &str) -> Result<String, BoxError>;

    async fn attach_thing_principal(
        &self,
        thing_name: &str,
        certificate_arn: &str,
    ) -> Result<(), BoxError>;
}

pub struct IotDeviceRegistry {
    pub iot: Client,
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, IotError> {
    value
        .map(str::to_string)
        .ok_or(IotError::MissingField(field))
}

#[async_trait]
impl DeviceRegistry for IotDeviceRegistry {
    async fn create_keys_and_certificate(&self) -> Result<KeysAndCertificate, BoxError> {
        let resp = self
            .iot
            .create_keys_and_certificate()
            .set_as_active(true)
            .send()
            .await
            .map_err(IotError::CreateKeysAndCertificateError)?;

        let key_pair = resp.key_pair().ok_or(IotError::MissingField("keyPair"))?;

        Ok(KeysAndCertificate {
            certificate_arn: required(resp.certificate_arn(), "certificateArn")?,
            certificate_id: required(resp.certificate_id(), "certificateId")?,
            certificate_pem: required(resp.certificate_pem(), "certificatePem")?,
            public_key: required(key_pair.public_key(), "keyPair.publicKey")?,
            private_key: required(key_pair.private_key(), "keyPair.privateKey")?,
        })
    }

    async fn create_policy(&self, name: &str, document: &str) -> Result<String, BoxError> {
        let resp = self
            .iot
            .create_policy()
            .policy_name(name)
            .policy_document(document)
            .send()
            .await
            .map_err(IotError::CreatePolicyError)?;

        Ok(resp.policy_name().unwrap_or(name).to_string())
    }

    async fn attach_policy(
        &self,
        policy_name: &str,
        certificate_arn: &str,
    ) -> Result<(), BoxError> {
        self.iot
            .attach_policy()
            .policy_name(policy_name)
            .target(certificate_arn)
            .send()
            .await
            .map_err(IotError::AttachPolicyError)?;
        Ok(())
    }

    async fn create_thing(&self, company_id: &str) -> Result<String, BoxError> {
        let resp = self
            .iot
            .create_thing()
            .thing_name(company_id)
            .attribute_payload(
                AttributePayload::builder()
                    .attributes("company_id", company_id)
                    .build(),
            )
            .send()
            .await
            .map_err(IotError::CreateThingError)?;

        tracing::info!(thing_arn = resp.thing_arn().unwrap_or_default(), "Thing created");
        Ok(resp.thing_name().unwrap_or(company_id).to_string())
    }

    async fn attach_thing_principal(
        &self,
        thing_name: &str,
        certificate_arn: &str,
    ) -> Result<(), BoxError> {
        self.iot
            .attach_thing_principal()
            .thing_name(thing_name)
            .principal(certificate_arn)
            .send()
            .await
            .map_err(IotError::AttachThingPrincipalError)?;
        Ok(())
    }
}
