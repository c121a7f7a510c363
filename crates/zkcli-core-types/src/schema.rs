//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Node identifiers
pub const FIELD_PATH: &str = "path";
pub const FIELD_VERSION: &str = "version";

// Retry loop
pub const FIELD_ATTEMPT: &str = "attempt";

// Collection sizes
pub const FIELD_CHILD_COUNT: &str = "child_count";
pub const FIELD_DATA_LEN: &str = "data_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_RETRY: &str = "retry";
