// 系统指标

use std::fmt;

use serde::Serialize;

/// 指标类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// CPU 使用率，如 `10.00%`
    CpuUsage,
    /// 内存使用，如 `10/20MB (50.00%)`
    MemoryUsage,
    /// 根分区使用，如 `10/20GB (50%)`
    DiskUsage,
    /// 内核版本
    KernelVersion,
    /// 发行版名称
    OsVersion,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::CpuUsage,
        MetricKind::MemoryUsage,
        MetricKind::DiskUsage,
        MetricKind::KernelVersion,
        MetricKind::OsVersion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CpuUsage => "cpu usage",
            Self::MemoryUsage => "memory usage",
            Self::DiskUsage => "disk usage",
            Self::KernelVersion => "kernel version",
            Self::OsVersion => "os version",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 一次指标采集的结果，值为远端输出的格式化文本
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SystemMetric {
    kind: MetricKind,
    value: String,
}

impl SystemMetric {
    pub(crate) fn new(kind: MetricKind, value: String) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }
}
