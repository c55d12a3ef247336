use crate::errors::{BoxError, DynamodbError};
use crate::model::{CertificateRecord, UserRecord};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_user(&self, table: &str, user: &UserRecord) -> Result<(), BoxError>;

    async fn put_certificate(
        &self,
        table: &str,
        certificate: &CertificateRecord,
    ) -> Result<(), BoxError>;
}

pub struct DynamoRecordStore {
    pub db: Client,
}

pub fn user_item(user: &UserRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("email".to_string(), AttributeValue::S(user.email.clone())),
        ("sub".to_string(), AttributeValue::S(user.sub.clone())),
        ("company_id".to_string(), AttributeValue::S(user.company_id.clone())),
        ("user_name".to_string(), AttributeValue::S(user.user_name.clone())),
        ("payed".to_string(), AttributeValue::Bool(user.payed)),
        ("service_tier".to_string(), AttributeValue::N(user.service_tier.to_string())),
        ("role".to_string(), AttributeValue::S(user.role.clone())),
    ])
}

pub fn certificate_item(certificate: &CertificateRecord) -> HashMap<String, AttributeValue> {
    let s = |v: &String| AttributeValue::S(v.clone());
    HashMap::from([
        ("company_id".to_string(), s(&certificate.company_id)),
        ("sub".to_string(), s(&certificate.created_by)),
        ("certificate_arn".to_string(), s(&certificate.certificate_arn)),
        ("certificate_id".to_string(), s(&certificate.certificate_id)),
        ("certificate_pem".to_string(), s(&certificate.certificate_pem)),
        ("private_key".to_string(), s(&certificate.private_key)),
        ("public_key".to_string(), s(&certificate.public_key)),
    ])
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put_user(&self, table: &str, user: &UserRecord) -> Result<(), BoxError> {
        self.db
            .put_item()
            .table_name(table)
            .set_item(Some(user_item(user)))
            .send()
            .await
            .map_err(DynamodbError::PutItemError)?;
        Ok(())
    }

    async fn put_certificate(
        &self,
        table: &str,
        certificate: &CertificateRecord,
    ) -> Result<(), BoxError> {
        self.db
            .put_item()
            .table_name(table)
            .set_item(Some(certificate_item(certificate)))
            .send()
            .await
            .map_err(DynamodbError::PutItemError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_item_types() {
        let user = UserRecord {
            email: "a@b.com".to_string(),
            sub: "sub-1".to_string(),
            company_id: "cid".to_string(),
            user_name: "alice".to_string(),
            payed: false,
            service_tier: 0,
            role: "admin".to_string(),
        };
        let item = user_item(&user);

        assert_eq!(item.len(), 7);
        assert_eq!(item["company_id"], AttributeValue::S("cid".to_string()));
        assert_eq!(item["user_name"], AttributeValue::S("alice".to_string()));
        assert_eq!(item["payed"], AttributeValue::Bool(false));
        assert_eq!(item["service_tier"], AttributeValue::N("0".to_string()));
        assert_eq!(item["role"], AttributeValue::S("admin".to_string()));
    }

    #[test]
    fn certificate_item_keeps_creator_under_sub() {
        let certificate = CertificateRecord {
            company_id: "cid".to_string(),
            created_by: "sub-1".to_string(),
            certificate_arn: "arn:aws:iot:eu-west-1:1:cert/abc".to_string(),
            certificate_id: "abc".to_string(),
            certificate_pem: "pem".to_string(),
            private_key: "private".to_string(),
            public_key: "public".to_string(),
        };
        let item = certificate_item(&certificate);

        assert_eq!(item.len(), 7);
        assert_eq!(item["sub"], AttributeValue::S("sub-1".to_string()));
        assert_eq!(item["private_key"], AttributeValue::S("private".to_string()));
        assert_eq!(
            item["certificate_arn"],
            AttributeValue::S("arn:aws:iot:eu-west-1:1:cert/abc".to_string())
        );
    }
}
