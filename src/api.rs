// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed client for the disbursement REST API.
//!
//! Every endpoint answers with a `{success, data, message}` envelope which is
//! turned into a `Result<T, ApiError>` here. Nothing is retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decision::DecisionPayload;
use crate::models::{
    ActivityLog, ApplicationDetail, ApplicationSummary, BudgetOverview, Paginated, Payment,
    PaymentUpdate, Scheme,
};
use crate::utils::{http_client, validate_resource_id};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("response had no data")]
    MissingData,
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("auth token expired at {0}; set a new one with `zakatdesk config set --token`")]
    TokenExpired(DateTime<Utc>),
    #[error("invalid resource id '{0}'")]
    InvalidId(String),
}

/// Bearer credentials handed to the client explicitly.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        self.data.ok_or(ApiError::MissingData)
    }

    /// For write endpoints where only the outcome matters.
    pub fn into_ack(self) -> Result<Option<String>, ApiError> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ))
        }
    }
}

/// Decodes a raw HTTP response. Error statuses keep the server's message when
/// the body is an envelope.
pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<ApiEnvelope<T>, ApiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        return Err(ApiError::Status { status, message });
    }
    Ok(serde_json::from_str(body)?)
}

pub struct ApiClient {
    base_url: String,
    auth: AuthContext,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: AuthContext, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            auth,
            http: http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn list_applications(
        &self,
        query: &[(String, String)],
    ) -> Result<Paginated<ApplicationSummary>, ApiError> {
        self.get("applications", query)?.into_result()
    }

    pub fn get_application(&self, id: &str) -> Result<ApplicationDetail, ApiError> {
        let id = checked_id(id)?;
        self.get(&format!("applications/{}", id), &[])?
            .into_result()
    }

    pub fn submit_committee_decision(
        &self,
        id: &str,
        payload: &DecisionPayload,
    ) -> Result<Option<String>, ApiError> {
        let id = checked_id(id)?;
        let path = format!("applications/{}/committee-decision", id);
        info!(application = id, decision = payload.decision, "submitting committee decision");
        self.send::<_, serde_json::Value>(self.http.post(self.endpoint(&path)), &path, payload)?
            .into_ack()
    }

    pub fn list_payments(&self, query: &[(String, String)]) -> Result<Paginated<Payment>, ApiError> {
        self.get("payments", query)?.into_result()
    }

    pub fn update_payment(&self, id: &str, update: &PaymentUpdate) -> Result<Option<String>, ApiError> {
        let id = checked_id(id)?;
        let path = format!("payments/{}", id);
        self.send::<_, serde_json::Value>(self.http.put(self.endpoint(&path)), &path, update)?
            .into_ack()
    }

    pub fn list_schemes(&self, query: &[(String, String)]) -> Result<Paginated<Scheme>, ApiError> {
        self.get("schemes", query)?.into_result()
    }

    pub fn budget_overview(&self) -> Result<BudgetOverview, ApiError> {
        self.get("budget/overview", &[])?.into_result()
    }

    pub fn list_activity_logs(
        &self,
        query: &[(String, String)],
    ) -> Result<Paginated<ActivityLog>, ApiError> {
        self.get("activity-logs", query)?.into_result()
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let req = self.http.get(self.endpoint(path)).query(query);
        self.execute(req, path)
    }

    fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.execute(req.json(body), path)
    }

    fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        if let Some(exp) = self.auth.expires_at().filter(|_| self.auth.is_expired_at(Utc::now())) {
            return Err(ApiError::TokenExpired(exp));
        }
        debug!(path, "api request");
        let resp = req.bearer_auth(self.auth.token()).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        let decoded = decode_response(status, &body);
        if let Err(err) = &decoded {
            warn!(path, status, error = %err, "api request failed");
        }
        decoded
    }
}

fn checked_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if validate_resource_id(id) {
        Ok(id)
    } else {
        Err(ApiError::InvalidId(id.to_string()))
    }
}
