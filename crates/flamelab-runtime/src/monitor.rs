//! Process resource sampling.

use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessesToUpdate, System};

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// CPU and memory of this process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemStats {
    /// Percent of one core; can exceed 100 on multi-core machines.
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

impl SystemStats {
    /// One-line summary for the overlay.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("CPU {:.0}%  MEM {:.0} MB", self.cpu_percent, self.memory_mb)
    }
}

/// Samples this process through `sysinfo`, at most once per second.
pub struct SystemMonitor {
    system: System,
    pid: Option<Pid>,
    last_sample: Option<Instant>,
    stats: SystemStats,
}

impl std::fmt::Debug for SystemMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemMonitor")
            .field("pid", &self.pid)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMonitor {
    #[must_use]
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(reason) => {
                tracing::warn!(reason, "Process stats unavailable");
                None
            }
        };
        Self {
            system: System::new(),
            pid,
            last_sample: None,
            stats: SystemStats::default(),
        }
    }

    /// Latest stats, refreshed if the last sample is over a second old.
    pub fn sample(&mut self) -> SystemStats {
        let now = Instant::now();
        if self
            .last_sample
            .is_some_and(|last| now.duration_since(last) < SAMPLE_INTERVAL)
        {
            return self.stats;
        }
        self.last_sample = Some(now);

        let Some(pid) = self.pid else {
            return self.stats;
        };
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), false);
        if let Some(process) = self.system.process(pid) {
            self.stats = SystemStats {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / (1024.0 * 1024.0),
            };
            tracing::trace!(
                cpu = self.stats.cpu_percent,
                memory_mb = self.stats.memory_mb,
                "Sampled process stats"
            );
        }
        self.stats
    }
}
