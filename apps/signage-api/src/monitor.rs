//! 离线监测后台任务
//!
//! 唯一的常驻后台任务：按固定周期扫描设备注册表，把心跳静默超过
//! 阈值且仍标记在线的设备批量置为离线+停播。
//!
//! 错误策略：
//! - 表尚未创建（进程启动早期）→ 静默跳过本周期
//! - 其他存储错误 → 记日志后跳过，循环永不终止
//!
//! 与在途心跳的竞争为后提交者胜出：最坏情况是设备被多标记一个
//! 周期的离线，下一个心跳自行纠正。

use signage_storage::DeviceStore;
use signage_telemetry::{record_devices_marked_offline, record_sweep_failure};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 监测参数。
pub struct MonitorSettings {
    /// 清扫周期
    pub interval: Duration,
    /// 心跳静默多久判定离线
    pub offline_after: Duration,
}

/// 离线监测主循环。仅在进程退出时结束。
pub async fn run_offline_monitor(device_store: Arc<dyn DeviceStore>, settings: MonitorSettings) {
    let mut ticker = tokio::time::interval(settings.interval);
    loop {
        ticker.tick().await;
        let cutoff_ms = domain::now_epoch_ms() - settings.offline_after.as_millis() as i64;
        match device_store.sweep_offline(cutoff_ms).await {
            Ok(names) => {
                if !names.is_empty() {
                    record_devices_marked_offline(names.len() as u64);
                    for name in &names {
                        info!(device = %name, "device_marked_offline");
                    }
                }
            }
            Err(err) if err.is_schema_missing() => {
                debug!("device table not ready, skipping sweep");
            }
            Err(err) => {
                record_sweep_failure();
                warn!(error = %err, "offline_sweep_failed");
            }
        }
    }
}
