//! 에러 타입 정의

use thiserror::Error;

/// 공통 에러 타입
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("평가자 이름과 소속을 모두 입력해 주세요")]
    MissingIdentity,
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("score 7".to_string());
        assert_eq!(format!("{}", error), "Parse error: score 7");
    }

    #[test]
    fn test_error_display_identity() {
        let display = format!("{}", Error::MissingIdentity);
        assert!(display.contains("이름"));
        assert!(display.contains("소속"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Parse("테스트".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Parse"));
        assert!(debug.contains("테스트"));
    }
}
