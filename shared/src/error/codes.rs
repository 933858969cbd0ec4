//! Unified error codes for the POS back-office engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 3xxx: Shift errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Account/ledger errors
//! - 8xxx: Expense errors
//! - 9xxx: System errors
//!
//! Every rule-violation code carries a stable SCREAMING_SNAKE string
//! (`as_str()`) that the boundary layer returns to clients unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes are represented as u16 values for efficient serialization and
/// cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Cashier role or above required
    CashierRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Shift ====================
    /// No shift is currently open
    ShiftRequired = 3001,
    /// A shift is already open
    ShiftAlreadyOpen = 3002,
    /// Shift not found
    ShiftNotFound = 3003,
    /// Cashier expenses are disabled by configuration
    CashierExpensesDisabled = 3004,
    /// Cashier expense would exceed the per-shift cap
    CashierExpenseCapExceeded = 3005,
    /// Cashier expense does not belong to the current open shift
    CashierExpenseNotFound = 3006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is paid/closed and cannot be mutated
    OrderLocked = 4002,
    /// Order is not in draft status
    OrderNotDraft = 4003,
    /// Table already has a non-closed order
    TableAlreadyHasOpenOrder = 4004,
    /// Neither table nor takeaway destination supplied
    DestinationRequired = 4005,
    /// Both table and takeaway destination supplied
    DestinationConflict = 4006,
    /// Merge requires at least two source orders
    MergeMin2 = 4007,
    /// Merge target is not among the source orders
    MergeTargetInvalid = 4008,
    /// Order item not found
    OrderItemNotFound = 4009,
    /// Order item has been voided
    OrderItemVoided = 4010,
    /// Void requires a reason
    VoidReasonRequired = 4011,
    /// Daily order counter exhausted
    CounterExhausted = 4012,

    // ==================== 5xxx: Payment ====================
    /// Unknown payment method
    BadMethod = 5001,
    /// No account configured for payment method
    PaymentMethodNotConfigured = 5002,
    /// Payment amount is invalid
    InvalidAmount = 5003,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found or inactive
    MenuItemNotFound = 6001,
    /// Menu option not found
    MenuOptionNotFound = 6002,

    // ==================== 7xxx: Account / Ledger ====================
    /// Account not found
    AccountNotFound = 7001,
    /// Account is inactive
    AccountInactive = 7002,
    /// System/locked account cannot be edited
    AccountLocked = 7003,
    /// Shift-managed account cannot be used manually
    AccountManagedByShift = 7004,
    /// Account cannot be its own parent
    AccountParentSelf = 7005,
    /// Account parent chain would form a cycle
    AccountParentCycle = 7006,
    /// Parent account not found
    ParentAccountNotFound = 7007,
    /// Transfer requires two distinct accounts
    TransferSameAccount = 7008,
    /// Transfer accounts have different currencies
    TransferCurrencyMismatch = 7009,
    /// Malformed account relation entry
    BadAccountRelation = 7010,
    /// Account relation targets its own source
    AccountRelationSelf = 7011,
    /// Duplicate (target, kind) pair in relation set
    AccountRelationDuplicate = 7012,
    /// Relation percentage outside (0, 100]
    BadAccountRelationPercentage = 7013,
    /// Relation percentages for a kind exceed 100
    AccountRelationPercentageOver100 = 7014,
    /// Relation references a missing account
    RelationAccountNotFound = 7015,

    // ==================== 8xxx: Expense ====================
    /// Expense must name exactly one of supplier/employee/account
    BadExpenseTarget = 8001,
    /// Expense not found
    ExpenseNotFound = 8002,
    /// Supplier not found
    SupplierNotFound = 8003,
    /// Employee not found
    EmployeeNotFound = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation cancelled before commit
    OperationCancelled = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Stable string code, returned to clients unchanged
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Success => "SUCCESS",
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",

            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::CashierRequired => "CASHIER_REQUIRED",
            ErrorCode::AdminRequired => "ADMIN_REQUIRED",

            ErrorCode::ShiftRequired => "SHIFT_REQUIRED",
            ErrorCode::ShiftAlreadyOpen => "SHIFT_ALREADY_OPEN",
            ErrorCode::ShiftNotFound => "SHIFT_NOT_FOUND",
            ErrorCode::CashierExpensesDisabled => "CASHIER_EXPENSES_DISABLED",
            ErrorCode::CashierExpenseCapExceeded => "CASHIER_EXPENSE_CAP_EXCEEDED",
            ErrorCode::CashierExpenseNotFound => "CASHIER_EXPENSE_NOT_FOUND",

            ErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            ErrorCode::OrderLocked => "ORDER_LOCKED",
            ErrorCode::OrderNotDraft => "ORDER_NOT_DRAFT",
            ErrorCode::TableAlreadyHasOpenOrder => "TABLE_ALREADY_HAS_OPEN_ORDER",
            ErrorCode::DestinationRequired => "DESTINATION_REQUIRED",
            ErrorCode::DestinationConflict => "DESTINATION_CONFLICT",
            ErrorCode::MergeMin2 => "MERGE_MIN_2",
            ErrorCode::MergeTargetInvalid => "MERGE_TARGET_INVALID",
            ErrorCode::OrderItemNotFound => "ORDER_ITEM_NOT_FOUND",
            ErrorCode::OrderItemVoided => "ORDER_ITEM_VOIDED",
            ErrorCode::VoidReasonRequired => "VOID_REASON_REQUIRED",
            ErrorCode::CounterExhausted => "COUNTER_EXHAUSTED",

            ErrorCode::BadMethod => "BAD_METHOD",
            ErrorCode::PaymentMethodNotConfigured => "PAYMENT_METHOD_NOT_CONFIGURED",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",

            ErrorCode::MenuItemNotFound => "MENU_ITEM_NOT_FOUND",
            ErrorCode::MenuOptionNotFound => "MENU_OPTION_NOT_FOUND",

            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::AccountInactive => "ACCOUNT_INACTIVE",
            ErrorCode::AccountLocked => "ACCOUNT_LOCKED",
            ErrorCode::AccountManagedByShift => "ACCOUNT_MANAGED_BY_SHIFT",
            ErrorCode::AccountParentSelf => "ACCOUNT_PARENT_SELF",
            ErrorCode::AccountParentCycle => "ACCOUNT_PARENT_CYCLE",
            ErrorCode::ParentAccountNotFound => "PARENT_ACCOUNT_NOT_FOUND",
            ErrorCode::TransferSameAccount => "TRANSFER_SAME_ACCOUNT",
            ErrorCode::TransferCurrencyMismatch => "TRANSFER_CURRENCY_MISMATCH",
            ErrorCode::BadAccountRelation => "BAD_ACCOUNT_RELATION",
            ErrorCode::AccountRelationSelf => "ACCOUNT_RELATION_SELF",
            ErrorCode::AccountRelationDuplicate => "ACCOUNT_RELATION_DUPLICATE",
            ErrorCode::BadAccountRelationPercentage => "BAD_ACCOUNT_RELATION_PERCENTAGE",
            ErrorCode::AccountRelationPercentageOver100 => "ACCOUNT_RELATION_PERCENTAGE_OVER_100",
            ErrorCode::RelationAccountNotFound => "RELATION_ACCOUNT_NOT_FOUND",

            ErrorCode::BadExpenseTarget => "BAD_EXPENSE_TARGET",
            ErrorCode::ExpenseNotFound => "EXPENSE_NOT_FOUND",
            ErrorCode::SupplierNotFound => "SUPPLIER_NOT_FOUND",
            ErrorCode::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",

            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::OperationCancelled => "OPERATION_CANCELLED",
        }
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::CashierRequired => "Cashier role or above is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            ErrorCode::ShiftRequired => "No shift is currently open",
            ErrorCode::ShiftAlreadyOpen => "A shift is already open",
            ErrorCode::ShiftNotFound => "Shift not found",
            ErrorCode::CashierExpensesDisabled => "Cashier expenses are disabled",
            ErrorCode::CashierExpenseCapExceeded => {
                "Cashier expense exceeds the per-shift cap"
            }
            ErrorCode::CashierExpenseNotFound => {
                "Cashier expense does not belong to the current open shift"
            }

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderLocked => "Order is locked and cannot be modified",
            ErrorCode::OrderNotDraft => "Order is not in draft status",
            ErrorCode::TableAlreadyHasOpenOrder => "Table already has an open order",
            ErrorCode::DestinationRequired => "Order destination is required",
            ErrorCode::DestinationConflict => "Order cannot be both table and takeaway",
            ErrorCode::MergeMin2 => "Merge requires at least two orders",
            ErrorCode::MergeTargetInvalid => "Merge target must be one of the source orders",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderItemVoided => "Order item has been voided",
            ErrorCode::VoidReasonRequired => "A void reason is required",
            ErrorCode::CounterExhausted => "Order counter exhausted for this business date",

            ErrorCode::BadMethod => "Unknown payment method",
            ErrorCode::PaymentMethodNotConfigured => {
                "No active account configured for payment method"
            }
            ErrorCode::InvalidAmount => "Amount is invalid",

            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuOptionNotFound => "Menu option not found",

            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::AccountInactive => "Account is inactive",
            ErrorCode::AccountLocked => "System account cannot be edited",
            ErrorCode::AccountManagedByShift => "Account is managed by the shift lifecycle",
            ErrorCode::AccountParentSelf => "Account cannot be its own parent",
            ErrorCode::AccountParentCycle => "Account parent chain would form a cycle",
            ErrorCode::ParentAccountNotFound => "Parent account not found",
            ErrorCode::TransferSameAccount => "Transfer requires two distinct accounts",
            ErrorCode::TransferCurrencyMismatch => "Transfer accounts use different currencies",
            ErrorCode::BadAccountRelation => "Malformed account relation",
            ErrorCode::AccountRelationSelf => "Account relation cannot target its own source",
            ErrorCode::AccountRelationDuplicate => "Duplicate account relation target",
            ErrorCode::BadAccountRelationPercentage => {
                "Relation percentage must be greater than 0 and at most 100"
            }
            ErrorCode::AccountRelationPercentageOver100 => {
                "Relation percentages for a kind exceed 100"
            }
            ErrorCode::RelationAccountNotFound => "Relation account not found",

            ErrorCode::BadExpenseTarget => {
                "Expense must name exactly one of supplier, employee or account"
            }
            ErrorCode::ExpenseNotFound => "Expense not found",
            ErrorCode::SupplierNotFound => "Supplier not found",
            ErrorCode::EmployeeNotFound => "Employee not found",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::OperationCancelled => "Operation was cancelled",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::CashierRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Shift
            3001 => Ok(ErrorCode::ShiftRequired),
            3002 => Ok(ErrorCode::ShiftAlreadyOpen),
            3003 => Ok(ErrorCode::ShiftNotFound),
            3004 => Ok(ErrorCode::CashierExpensesDisabled),
            3005 => Ok(ErrorCode::CashierExpenseCapExceeded),
            3006 => Ok(ErrorCode::CashierExpenseNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderLocked),
            4003 => Ok(ErrorCode::OrderNotDraft),
            4004 => Ok(ErrorCode::TableAlreadyHasOpenOrder),
            4005 => Ok(ErrorCode::DestinationRequired),
            4006 => Ok(ErrorCode::DestinationConflict),
            4007 => Ok(ErrorCode::MergeMin2),
            4008 => Ok(ErrorCode::MergeTargetInvalid),
            4009 => Ok(ErrorCode::OrderItemNotFound),
            4010 => Ok(ErrorCode::OrderItemVoided),
            4011 => Ok(ErrorCode::VoidReasonRequired),
            4012 => Ok(ErrorCode::CounterExhausted),

            // Payment
            5001 => Ok(ErrorCode::BadMethod),
            5002 => Ok(ErrorCode::PaymentMethodNotConfigured),
            5003 => Ok(ErrorCode::InvalidAmount),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuOptionNotFound),

            // Account / Ledger
            7001 => Ok(ErrorCode::AccountNotFound),
            7002 => Ok(ErrorCode::AccountInactive),
            7003 => Ok(ErrorCode::AccountLocked),
            7004 => Ok(ErrorCode::AccountManagedByShift),
            7005 => Ok(ErrorCode::AccountParentSelf),
            7006 => Ok(ErrorCode::AccountParentCycle),
            7007 => Ok(ErrorCode::ParentAccountNotFound),
            7008 => Ok(ErrorCode::TransferSameAccount),
            7009 => Ok(ErrorCode::TransferCurrencyMismatch),
            7010 => Ok(ErrorCode::BadAccountRelation),
            7011 => Ok(ErrorCode::AccountRelationSelf),
            7012 => Ok(ErrorCode::AccountRelationDuplicate),
            7013 => Ok(ErrorCode::BadAccountRelationPercentage),
            7014 => Ok(ErrorCode::AccountRelationPercentageOver100),
            7015 => Ok(ErrorCode::RelationAccountNotFound),

            // Expense
            8001 => Ok(ErrorCode::BadExpenseTarget),
            8002 => Ok(ErrorCode::ExpenseNotFound),
            8003 => Ok(ErrorCode::SupplierNotFound),
            8004 => Ok(ErrorCode::EmployeeNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::OperationCancelled),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
