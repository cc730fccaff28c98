//! # Core Service 設定
//!
//! 環境変数から Core Service サーバーの設定を読み込む。
//!
//! 読み込みは参照関数を経由するため、テストではプロセスの環境変数を
//! 書き換えずに任意の値を与えられる。

use std::{
   env,
   net::{IpAddr, Ipv4Addr},
};

use campusqa_shared::observability::LogFormat;
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   /// 必須の環境変数が未設定
   #[error("{0} is not set")]
   Missing(&'static str),

   /// 値の形式が不正
   #[error("{name} has an invalid value: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// Core Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
   /// バインドアドレス（IPv4 / IPv6）
   pub host:       IpAddr,
   /// ポート番号
   pub port:       u16,
   /// ログ出力形式
   pub log_format: LogFormat,
}

impl CoreConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 参照関数から設定を読み込む
   ///
   /// - `CORE_HOST`: IP アドレス。省略時 `0.0.0.0`
   /// - `CORE_PORT`: 必須
   /// - `LOG_FORMAT`: 省略時 `pretty`
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let host = match lookup("CORE_HOST") {
         Some(raw_host) => raw_host.parse().map_err(|_| ConfigError::Invalid {
            name:  "CORE_HOST",
            value: raw_host.clone(),
         })?,
         None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
      };

      let raw_port = lookup("CORE_PORT").ok_or(ConfigError::Missing("CORE_PORT"))?;
      let port = raw_port.parse().map_err(|_| ConfigError::Invalid {
         name:  "CORE_PORT",
         value: raw_port.clone(),
      })?;

      let log_format = lookup("LOG_FORMAT")
         .map(|value| LogFormat::parse(&value))
         .unwrap_or_default();

      Ok(Self {
         host,
         port,
         log_format,
      })
   }
}
