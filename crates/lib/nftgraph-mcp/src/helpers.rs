use std::borrow::Cow;

use nftgraph_core::control::ControlError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use tracing::warn;

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Maps control-plane failures onto MCP error codes.
///
/// Missing parameters are invalid requests, bad values are invalid params,
/// and remote or storage failures are internal errors.
pub(crate) fn map_err(err: ControlError) -> ErrorData {
    match err {
        ControlError::Invocation(message) => mcp_err(ErrorCode::INVALID_REQUEST, message),
        ControlError::InvalidValue(message) => mcp_err(ErrorCode::INVALID_PARAMS, message),
        other => {
            warn!(error = %other, "tool call failed");
            mcp_err(ErrorCode::INTERNAL_ERROR, other.to_string())
        }
    }
}

const DEFAULT_LIST_LIMIT: usize = 100;

pub(crate) fn limit_or_default(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIST_LIMIT)
}
