//! # テストユーティリティ
//!
//! ユースケース・ハンドラのテストで共通するセットアップを提供する。

mod forum_test_builder;

pub use forum_test_builder::{ForumTestBuilder, ForumTestSetup};
