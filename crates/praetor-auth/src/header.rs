//! 요청 헤더에서 토큰 추출.

use std::collections::{BTreeMap, HashMap};

use praetor_core::TokenError;

/// 헤더 조회 인터페이스.
///
/// HTTP 프레임워크의 헤더 맵을 감싸서 구현합니다. 헤더 이름 비교는
/// 구현체의 규칙(HTTP는 대소문자 무시)을 따릅니다.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl HeaderSource for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// `"<type> <token>"` 형식의 헤더 값에서 토큰 부분 추출.
///
/// 타입 접두어는 대소문자를 구분하며 하나 이상의 공백으로 토큰과 구분됩니다.
/// 값이 없거나, 접두어가 다르거나, 토큰이 비어 있으면 `MissingHeader`.
pub fn parse_header_value<'a>(
    value: Option<&'a str>,
    header_type: &str,
) -> Result<&'a str, TokenError> {
    let value = value.ok_or(TokenError::MissingHeader)?.trim();

    let rest = value
        .strip_prefix(header_type)
        .ok_or(TokenError::MissingHeader)?;

    // 접두어 뒤에는 공백이 와야 한다 ("Bearerxyz" 거부)
    if !rest.starts_with(char::is_whitespace) {
        return Err(TokenError::MissingHeader);
    }

    let token = rest.trim_start();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(TokenError::MissingHeader);
    }

    Ok(token)
}

/// 헤더 맵에서 토큰 추출.
pub fn read_token_from_header<'a, H>(
    headers: &'a H,
    header_name: &str,
    header_type: &str,
) -> Result<&'a str, TokenError>
where
    H: HeaderSource + ?Sized,
{
    parse_header_value(headers.header(header_name), header_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reads_bearer_token() {
        let h = headers(&[("Authorization", "Bearer abc.def.ghi")]);
        assert_eq!(
            read_token_from_header(&h, "Authorization", "Bearer"),
            Ok("abc.def.ghi")
        );

        // 헤더 이름은 대소문자 무시
        let h = headers(&[("authorization", "Bearer   abc.def.ghi")]);
        assert_eq!(
            read_token_from_header(&h, "Authorization", "Bearer"),
            Ok("abc.def.ghi")
        );
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let empty = headers(&[]);
        assert_eq!(
            read_token_from_header(&empty, "Authorization", "Bearer"),
            Err(TokenError::MissingHeader)
        );

        for value in ["Basic abc", "Bearer", "Bearer ", "Bearerabc", "bearer abc", "Bearer a b"] {
            let h = headers(&[("Authorization", value)]);
            assert_eq!(
                read_token_from_header(&h, "Authorization", "Bearer"),
                Err(TokenError::MissingHeader),
                "value: {value:?}"
            );
        }
    }

    #[test]
    fn test_custom_header_name_and_type() {
        let h = headers(&[("X-Api-Token", "JWT abc.def.ghi")]);
        assert_eq!(
            read_token_from_header(&h, "X-Api-Token", "JWT"),
            Ok("abc.def.ghi")
        );
        assert_eq!(
            read_token_from_header(&h, "Authorization", "Bearer"),
            Err(TokenError::MissingHeader)
        );
    }
}
