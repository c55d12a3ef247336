use crate::errors::{AppError, BoxError, Orphans, Step};
use crate::event::decode_event;
use crate::model::{new_company_id, AppState, CertificateRecord, InvocationContext, UserRecord};
use crate::policy::{company_policy, policy_name, to_policy_json};
use crate::s3::code_prefix;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::{error, info};

// Entry point for the Cognito post confirmation trigger
pub async fn function_handler(
    state: &AppState,
    event: LambdaEvent<Value>,
) -> Result<Value, AppError> {
    let LambdaEvent { payload, context } = event;
    let ctx = InvocationContext::from_function_arn(&context.invoked_function_arn)?;

    let result = handle_post_confirmation(state, &ctx, payload).await;
    if let Err(err) = &result {
        error!(
            kind = err.kind(),
            step = err.step().map(|s| s.as_str()).unwrap_or("-"),
            "Post confirmation failed: {}",
            err
        );
    }
    result
}

pub async fn handle_post_confirmation(
    state: &AppState,
    ctx: &InvocationContext,
    payload: Value,
) -> Result<Value, AppError> {
    let event = decode_event(&payload)?;
    let attributes = &event.request.user_attributes;
    info!(sub = %attributes.sub, "SUB");
    info!(
        version = %event.version,
        trigger_source = %event.trigger_source,
        region = %event.region,
        user_pool_id = %event.user_pool_id,
        client_id = %event.caller_context.client_id,
        given_name = %attributes.given_name,
        email_verified = attributes.email_verified,
        event = %payload,
        "Received post confirmation event"
    );

    let user = UserRecord::for_new_company(&event, new_company_id());
    provision_company(state, ctx, &user).await?;

    Ok(payload)
}

fn provisioning_failed(step: Step, created: &[String]) -> impl FnOnce(BoxError) -> AppError {
    let orphans = Orphans(created.to_vec());
    move |source| AppError::ProvisioningError {
        step,
        orphans,
        source,
    }
}

fn persistence_failed(
    step: Step,
    table: &str,
    created: &[String],
) -> impl FnOnce(BoxError) -> AppError {
    let table = table.to_string();
    let orphans = Orphans(created.to_vec());
    move |source| AppError::PersistenceError {
        step,
        table,
        orphans,
        source,
    }
}

// Nothing is rolled back: the returned error lists what was already created.
pub async fn provision_company(
    state: &AppState,
    ctx: &InvocationContext,
    user: &UserRecord,
) -> Result<(), AppError> {
    let config = &state.config;
    let company_id = user.company_id.as_str();
    let mut created: Vec<String> = Vec::new();

    // 1. user row
    info!(company_id, "Creating Dynamo Entry");
    state
        .store
        .put_user(&config.users_table, user)
        .await
        .map_err(persistence_failed(Step::PutUser, &config.users_table, &created))?;
    created.push(format!("{} row {}", config.users_table, company_id));

    // 2. device certificate, stored before anything references it
    info!(company_id, "Generating Keys");
    let keys = state
        .registry
        .create_keys_and_certificate()
        .await
        .map_err(provisioning_failed(Step::CreateKeysAndCertificate, &created))?;
    created.push(format!("certificate {}", keys.certificate_arn));

    let certificate = CertificateRecord::new(user, &keys);
    state
        .store
        .put_certificate(&config.certificates_table, &certificate)
        .await
        .map_err(persistence_failed(
            Step::PutCertificate,
            &config.certificates_table,
            &created,
        ))?;
    created.push(format!("{} row {}", config.certificates_table, company_id));

    // 3. policy
    let document = to_policy_json(&company_policy(ctx, &config.topic_namespace, company_id))?;
    info!(company_id, policy = %document, "Creating IoT policy");
    let policy = state
        .registry
        .create_policy(policy_name(company_id), &document)
        .await
        .map_err(provisioning_failed(Step::CreatePolicy, &created))?;
    created.push(format!("policy {}", policy));

    state
        .registry
        .attach_policy(&policy, &keys.certificate_arn)
        .await
        .map_err(provisioning_failed(Step::AttachPolicy, &created))?;
    created.push(format!("policy attachment {} -> {}", policy, keys.certificate_arn));

    // 4. thing
    info!(company_id, "Creating Thing");
    let thing = state
        .registry
        .create_thing(company_id)
        .await
        .map_err(provisioning_failed(Step::CreateThing, &created))?;
    created.push(format!("thing {}", thing));

    state
        .registry
        .attach_thing_principal(&thing, &keys.certificate_arn)
        .await
        .map_err(provisioning_failed(Step::AttachThingPrincipal, &created))?;
    created.push(format!("thing attachment {} -> {}", thing, keys.certificate_arn));

    // 5. code prefix
    info!(company_id, bucket = %config.code_bucket, "Creating code prefix");
    state
        .storage
        .create_prefix(&config.code_bucket, &code_prefix(company_id))
        .await
        .map_err(provisioning_failed(Step::CreateCodePrefix, &created))?;

    info!(company_id, "Company provisioned");
    Ok(())
}
