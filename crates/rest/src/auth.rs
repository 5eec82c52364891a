//! Caller authentication and patient-level authorization.

use std::time::Duration;

use fhirbridge_store::{AccessToken, AuthError, Identity, IdentityProvider};
use tracing::debug;

use crate::config::AccessPolicy;
use crate::error::{RestError, RestResult};

/// Resolves the caller behind `token`, bounded by `timeout`.
pub async fn authenticate<I>(
    provider: &I,
    token: &AccessToken,
    timeout: Duration,
) -> RestResult<Identity>
where
    I: IdentityProvider + ?Sized,
{
    let identity = tokio::time::timeout(timeout, provider.get_user(token))
        .await
        .map_err(|_| AuthError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        })??;

    debug!(user = %identity.id, "Authenticated caller");
    Ok(identity)
}

/// Checks that `identity` may read patient `patient_id` under `policy`.
pub fn authorize(policy: AccessPolicy, identity: &Identity, patient_id: &str) -> RestResult<()> {
    match policy {
        AccessPolicy::Authenticated => Ok(()),
        AccessPolicy::PatientBound => match identity.patient_id.as_deref() {
            Some(bound) if bound == patient_id => Ok(()),
            Some(_) => Err(RestError::Forbidden {
                message: format!("caller may not read Patient/{}", patient_id),
            }),
            None => Err(RestError::Forbidden {
                message: "caller is not linked to a patient record".to_string(),
            }),
        },
    }
}
