//! Per-operation context
//!
//! Identity, clock and cancellation travel with every mutating operation;
//! the engine never reads ambient state for them.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Role;
use tokio_util::sync::CancellationToken;

/// The operator performing an operation
#[derive(Debug, Clone, Copy)]
pub struct Operator {
    pub id: i64,
    pub role: Role,
}

/// Context handed to every mutating operation
#[derive(Debug, Clone)]
pub struct OpContext {
    pub operator: Operator,
    /// Operation timestamp (Unix millis), stamped on every row written
    pub now: i64,
    /// Request cancellation; checked before commit
    pub cancel: CancellationToken,
}

impl OpContext {
    pub fn new(operator: Operator, now: i64, cancel: CancellationToken) -> Self {
        Self {
            operator,
            now,
            cancel,
        }
    }

    /// Context with the current wall clock and a fresh token
    pub fn now(operator: Operator) -> Self {
        Self::new(operator, shared::util::now_millis(), CancellationToken::new())
    }

    /// Fail unless the operator holds `required` or above
    pub fn require_role(&self, required: Role) -> AppResult<()> {
        if self.operator.role.at_least(required) {
            return Ok(());
        }
        let code = match required {
            Role::Admin => ErrorCode::AdminRequired,
            Role::Cashier => ErrorCode::CashierRequired,
            _ => ErrorCode::PermissionDenied,
        };
        Err(AppError::new(code).with_detail("required_role", format!("{:?}", required)))
    }

    /// Fail if the request has been cancelled
    pub fn ensure_live(&self) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::cancelled());
        }
        Ok(())
    }
}
