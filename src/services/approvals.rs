use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::approval::{self, ApprovalStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateApprovalRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type and data are required"))]
    pub approval_type: String,
    /// Staged payload, e.g. parsed spreadsheet rows
    #[schema(value_type = Object)]
    pub data: Value,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewApprovalRequest {
    /// `pending`, `approved` or `rejected`
    pub status: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Clone)]
pub struct ApprovalService {
    db: Arc<DatabaseConnection>,
}

impl ApprovalService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<approval::Model>, ServiceError> {
        Ok(approval::Entity::find()
            .order_by_desc(approval::Column::CreatedAt)
            .order_by_desc(approval::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Stages a request from `requester_id` in the `pending` state.
    #[instrument(skip(self, request), fields(approval_type = %request.approval_type))]
    pub async fn create(
        &self,
        requester_id: i32,
        request: CreateApprovalRequest,
    ) -> Result<approval::Model, ServiceError> {
        if request.data.is_null() {
            return Err(ServiceError::ValidationError(
                "Type and data are required".to_string(),
            ));
        }

        let now = Utc::now();
        let created = approval::ActiveModel {
            approval_type: Set(request.approval_type),
            data: Set(request.data),
            notes: Set(request.notes.unwrap_or_default()),
            user_id: Set(Some(requester_id)),
            status: Set(ApprovalStatus::Pending),
            admin_notes: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(approval_id = created.id, requester_id, "approval requested");
        Ok(created)
    }

    #[instrument(skip(self, request), fields(status = %request.status))]
    pub async fn review(
        &self,
        id: i32,
        request: ReviewApprovalRequest,
    ) -> Result<approval::Model, ServiceError> {
        let status: ApprovalStatus = request.status.parse().map_err(|_| {
            ServiceError::ValidationError(format!(
                "Status must be one of pending, approved, rejected (got '{}')",
                request.status
            ))
        })?;

        let existing = approval::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Approval {}", id)))?;

        let mut active: approval::ActiveModel = existing.into();
        active.status = Set(status);
        active.admin_notes = Set(request.admin_notes.unwrap_or_default());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        info!(approval_id = id, status = %status, "approval reviewed");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = approval::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Approval {}", id)))?;
        existing.delete(&*self.db).await?;
        Ok(())
    }
}
