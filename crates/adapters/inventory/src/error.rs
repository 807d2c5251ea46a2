//! reqwest 错误与 HTTP 状态到 AppError 的映射

use estoque_errors::AppError;
use reqwest::StatusCode;

/// 传输层错误（连接、超时、响应解码）统一视为网络错误
pub fn map_transport_error(err: reqwest::Error, context: &str) -> AppError {
    if err.is_timeout() {
        AppError::network(format!("{}: request timed out", context))
    } else if err.is_connect() {
        AppError::network(format!("{}: server unreachable: {}", context, err))
    } else if err.is_decode() {
        AppError::network(format!("{}: invalid response body: {}", context, err))
    } else {
        AppError::network(format!("{}: {}", context, err))
    }
}

/// 非 2xx 状态
pub fn map_status_error(status: StatusCode, detail: Option<&str>, context: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        return AppError::unauthenticated(format!("{}: HTTP 401", context));
    }

    match detail.filter(|d| !d.trim().is_empty()) {
        Some(detail) => AppError::network(format!("{}: HTTP {}: {}", context, status.as_u16(), detail)),
        None => AppError::network(format!("{}: HTTP {}", context, status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_401() {
        let err = map_status_error(StatusCode::UNAUTHORIZED, None, "Login");
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn test_map_server_error_with_detail() {
        let err = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, Some("db down"), "Release");
        assert!(matches!(err, AppError::Network(_)));
        assert!(err.to_string().contains("HTTP 500: db down"));
    }

    #[test]
    fn test_map_blank_detail() {
        let err = map_status_error(StatusCode::BAD_GATEWAY, Some("  "), "Sales");
        assert_eq!(err.to_string(), "Network error: Sales: HTTP 502");
    }
}
