//! Host-level samples derived from the system stats call.

use super::descriptors::{
    push_traffic, Observation, Traffic, CPU_TEMPERATURE, CPU_USAGE_RATIO, DEVICE_COUNT,
    MEMORY_BUFFERS, MEMORY_CACHED, MEMORY_SIZE, MEMORY_USAGE, UPTIME, VERSION,
};
use crate::config::HOST_ID;
use crate::error_handling::CollectError;
use crate::ikuai::SystemStats;

/// Converts a percentage string such as `"12.5%"` into a ratio; unparsable input is 0.
pub fn parse_cpu_ratio(raw: &str) -> f64 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .map(|percent| percent / 100.0)
        .unwrap_or(0.0)
}

/// Appends version, CPU, memory, device count, host traffic and uptime samples.
pub fn observe(stats: &SystemStats, out: &mut Vec<Observation>) -> Result<(), CollectError> {
    let version = &stats.verinfo;
    out.push(VERSION.observe(
        &[&version.version, &version.arch, &version.verstring],
        1.0,
    )?);

    for (idx, usage) in stats.cpu.iter().enumerate() {
        let id = format!("core/{}", idx);
        out.push(CPU_USAGE_RATIO.observe(&[&id], parse_cpu_ratio(usage))?);
    }

    if let Some(temperature) = stats.cputemp.first() {
        out.push(CPU_TEMPERATURE.observe(&[], *temperature)?);
    }

    let memory = &stats.memory;
    out.push(MEMORY_SIZE.observe(&[], memory.total as f64)?);
    out.push(MEMORY_USAGE.observe(&[], memory.total.saturating_sub(memory.available) as f64)?);
    out.push(MEMORY_CACHED.observe(&[], memory.cached as f64)?);
    out.push(MEMORY_BUFFERS.observe(&[], memory.buffers as f64)?);

    out.push(DEVICE_COUNT.observe(&[], stats.online_user.count as f64)?);

    let stream = &stats.stream;
    push_traffic(
        out,
        HOST_ID,
        "",
        Traffic {
            total_up: stream.total_up,
            total_down: stream.total_down,
            upload: stream.upload,
            download: stream.download,
            connections: stream.connect_num,
        },
    )?;
    out.push(UPTIME.observe(&[HOST_ID, ""], stats.uptime as f64)?);

    Ok(())
}
