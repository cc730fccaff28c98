//! # Clock（時刻プロバイダ）
//!
//! ユースケース層での `Utc::now()` 直接呼び出しを置き換え、
//! テストで時刻を固定・前進させられるようにするための抽象化。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 手動で進めるテスト用実装
///
/// 申請日時と解決日時のように、前後関係を検証したいテストで使う。
pub struct ManualClock {
   now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を `delta` だけ進める
   pub fn advance(&self, delta: Duration) {
      let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
      *now += delta;
   }
}

impl Clock for ManualClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(|e| e.into_inner())
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn epoch() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   #[test]
   fn test_system_clock_は現在時刻を返す() {
      let before = Utc::now();
      let result = SystemClock.now();
      let after = Utc::now();

      assert!(result >= before);
      assert!(result <= after);
   }

   #[test]
   fn test_manual_clock_は進めるまで同じ時刻を返す() {
      let clock = ManualClock::new(epoch());

      assert_eq!(clock.now(), epoch());
      assert_eq!(clock.now(), epoch());
   }

   #[test]
   fn test_manual_clock_はadvanceした分だけ進む() {
      let clock = ManualClock::new(epoch());

      clock.advance(Duration::minutes(5));

      assert_eq!(clock.now(), epoch() + Duration::minutes(5));
   }
}
