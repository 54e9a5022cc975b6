//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub sync_requests: u64,
    pub heartbeats: u64,
    pub media_downloads: u64,
    pub media_uploads: u64,
    pub playlist_rebuilds: u64,
    pub devices_marked_offline: u64,
    pub sweep_failures: u64,
}

/// 基础指标（进程内计数器）。
pub struct TelemetryMetrics {
    sync_requests: AtomicU64,
    heartbeats: AtomicU64,
    media_downloads: AtomicU64,
    media_uploads: AtomicU64,
    playlist_rebuilds: AtomicU64,
    devices_marked_offline: AtomicU64,
    sweep_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            sync_requests: AtomicU64::new(0),
            heartbeats: AtomicU64::new(0),
            media_downloads: AtomicU64::new(0),
            media_uploads: AtomicU64::new(0),
            playlist_rebuilds: AtomicU64::new(0),
            devices_marked_offline: AtomicU64::new(0),
            sweep_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sync_requests: self.sync_requests.load(Ordering::Relaxed),
            heartbeats: self.heartbeats.load(Ordering::Relaxed),
            media_downloads: self.media_downloads.load(Ordering::Relaxed),
            media_uploads: self.media_uploads.load(Ordering::Relaxed),
            playlist_rebuilds: self.playlist_rebuilds.load(Ordering::Relaxed),
            devices_marked_offline: self.devices_marked_offline.load(Ordering::Relaxed),
            sweep_failures: self.sweep_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次设备配置拉取。
pub fn record_sync_request() {
    metrics().sync_requests.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次设备心跳。
pub fn record_heartbeat() {
    metrics().heartbeats.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次设备媒体下载。
pub fn record_media_download() {
    metrics().media_downloads.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次媒体上传。
pub fn record_media_upload() {
    metrics().media_uploads.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次播放列表重建。
pub fn record_playlist_rebuild() {
    metrics().playlist_rebuilds.fetch_add(1, Ordering::Relaxed);
}

/// 记录被离线清扫标记的设备数。
pub fn record_devices_marked_offline(count: u64) {
    metrics()
        .devices_marked_offline
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录一次离线清扫失败（表缺失的静默跳过不计入）。
pub fn record_sweep_failure() {
    metrics().sweep_failures.fetch_add(1, Ordering::Relaxed);
}
