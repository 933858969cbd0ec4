//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ShiftNotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::MenuItemNotFound
            | Self::MenuOptionNotFound
            | Self::AccountNotFound
            | Self::ParentAccountNotFound
            | Self::RelationAccountNotFound
            | Self::CashierExpenseNotFound
            | Self::ExpenseNotFound
            | Self::SupplierNotFound
            | Self::EmployeeNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::ShiftAlreadyOpen
            | Self::OrderLocked
            | Self::TableAlreadyHasOpenOrder => StatusCode::CONFLICT,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::CashierRequired
            | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 422 Unprocessable Entity (state-machine / ledger rule violations)
            Self::ShiftRequired
            | Self::OrderNotDraft
            | Self::OrderItemVoided
            | Self::CashierExpensesDisabled
            | Self::CashierExpenseCapExceeded
            | Self::AccountInactive
            | Self::AccountLocked
            | Self::AccountManagedByShift
            | Self::AccountParentCycle
            | Self::CounterExhausted => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::OperationCancelled
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
