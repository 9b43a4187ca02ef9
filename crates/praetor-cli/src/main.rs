//! Praetor 운영자 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 저장소에 넣을 비밀번호 해시 생성
//! praetor hash-password calmerthanyouare
//!
//! # 서비스 계정용 영구 Access Token 발급
//! praetor mint --subject svc-1 --username deploy-bot --roles operator --eternal
//!
//! # 토큰 내용 확인 (서명/만료 검증 포함)
//! praetor inspect eyJhbGciOi...
//! ```

use std::path::PathBuf;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use praetor_core::logging::{init_logging, LogConfig};
use praetor_core::TokenType;
use serde_json::Value;

use praetor_cli::commands::{self, hash, inspect, mint};

#[derive(Parser)]
#[command(name = "praetor")]
#[command(about = "JWT 토큰 관리 CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 비밀번호 해시 생성 (Argon2id, PHC 형식)
    HashPassword {
        /// 해싱할 비밀번호
        password: String,
    },

    /// 토큰 발급
    Mint {
        /// 사용자 식별자
        #[arg(short, long)]
        subject: String,

        /// 사용자 이름
        #[arg(short, long)]
        username: String,

        /// 쉼표 구분 역할 목록 (예: operator,admin)
        #[arg(short, long, default_value = "")]
        roles: String,

        /// 토큰 타입 (access, refresh)
        #[arg(short = 't', long = "type", default_value = "access", value_parser = mint::parse_token_type)]
        token_type: TokenType,

        /// 수명 (초). 생략 시 설정값 사용
        #[arg(
            long = "lifespan-secs",
            conflicts_with = "eternal",
            value_parser = mint::parse_lifespan_secs
        )]
        lifespan: Option<Duration>,

        /// 사실상 만료되지 않는 Access Token
        #[arg(long)]
        eternal: bool,

        /// 사용자 정의 클레임 (KEY=VALUE, 반복 가능)
        #[arg(long = "claim", value_parser = mint::parse_claim)]
        claims: Vec<(String, Value)>,
    },

    /// 토큰 검증 및 내용 출력
    Inspect {
        /// 인코딩된 토큰
        token: String,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // 출력은 stdout, 로그는 RUST_LOG 설정 시에만
    init_logging(LogConfig::new("warn")).map_err(|e| anyhow::anyhow!("{e}"))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => {
            println!("{}", hash::run(&password)?);
        }
        Commands::Mint {
            subject,
            username,
            roles,
            token_type,
            lifespan,
            eternal,
            claims,
        } => {
            let codec = commands::load_codec(&cli.config)?;
            let options = mint::MintOptions {
                subject,
                username,
                roles,
                token_type,
                lifespan,
                eternal,
                claims,
            };
            println!("{}", mint::run(&codec, &options, Utc::now())?);
        }
        Commands::Inspect { token } => {
            let codec = commands::load_codec(&cli.config)?;
            let report = inspect::run(&codec, &token, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
