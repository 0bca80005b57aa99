// 系统信息

use async_trait::async_trait;

use crate::error::{ErrorKind, Result};
use crate::executor::{CommandRequest, CommandRunner};
use crate::models::{MetricKind, SystemMetric};
use crate::parsers::parse_metric;

/// 各指标对应的固定命令
pub fn metric_command(kind: MetricKind) -> &'static str {
    match kind {
        MetricKind::CpuUsage => {
            r#"top -b -n1 | grep 'Cpu(s)' | awk '{printf "%.2f%%", $2 + $4}'"#
        }
        MetricKind::MemoryUsage => {
            r#"free -m | awk 'NR==2{printf "%s/%sMB (%.2f%%)", $3,$2,$3*100/$2 }'"#
        }
        MetricKind::DiskUsage => r#"df -h | awk '$NF=="/"{printf "%d/%dGB (%s)", $3,$2,$5}'"#,
        MetricKind::KernelVersion => "uname -r",
        MetricKind::OsVersion => "cat /etc/os-release | grep PRETTY_NAME | cut -d '=' -f 2",
    }
}

/// 远端系统信息
#[async_trait]
pub trait SystemInfo: CommandRunner {
    /// 采集单个指标
    async fn system_metric(&mut self, kind: MetricKind, run_as_root: bool) -> Result<SystemMetric> {
        let request = CommandRequest::new(metric_command(kind))
            .run_as_root(run_as_root)
            .error_kind(ErrorKind::GetSystemInfo);
        let result = self.run(request).await?;
        Ok(SystemMetric::new(kind, parse_metric(&result.output)))
    }

    /// CPU 使用率，如 `10.00%`
    async fn get_cpu_usage(&mut self, run_as_root: bool) -> Result<String> {
        Ok(self
            .system_metric(MetricKind::CpuUsage, run_as_root)
            .await?
            .into_value())
    }

    /// 内存使用，如 `10/20MB (50.00%)`
    async fn get_memory_usage(&mut self, run_as_root: bool) -> Result<String> {
        Ok(self
            .system_metric(MetricKind::MemoryUsage, run_as_root)
            .await?
            .into_value())
    }

    /// 根分区使用，如 `10/20GB (50%)`
    async fn get_disk_usage(&mut self, run_as_root: bool) -> Result<String> {
        Ok(self
            .system_metric(MetricKind::DiskUsage, run_as_root)
            .await?
            .into_value())
    }

    async fn get_kernel_version(&mut self, run_as_root: bool) -> Result<String> {
        Ok(self
            .system_metric(MetricKind::KernelVersion, run_as_root)
            .await?
            .into_value())
    }

    async fn get_os_version(&mut self, run_as_root: bool) -> Result<String> {
        Ok(self
            .system_metric(MetricKind::OsVersion, run_as_root)
            .await?
            .into_value())
    }
}

impl<T: CommandRunner + ?Sized> SystemInfo for T {}
