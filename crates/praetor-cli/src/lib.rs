//! 운영자용 CLI 도구 모음.
//!
//! - 비밀번호 해시 생성
//! - 토큰 발급 (서비스 계정용 영구 토큰 포함)
//! - 토큰 검사

pub mod commands;
