use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// 每次請求專用的識別字串：毫秒時間戳加上隨機片段
///
/// 同一毫秒內的並行請求也不會重複
#[must_use]
pub fn unique_token() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    format!("{millis}_{}", &random[..8])
}
