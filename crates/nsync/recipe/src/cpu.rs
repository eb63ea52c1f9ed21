//! Memory-proportional CPU weighting

/// Memory (MB) at or below which an LRP gets the minimum weight
pub const MIN_CPU_PROXY: i64 = 256;

/// Memory (MB) at or above which an LRP gets the maximum weight
pub const MAX_CPU_PROXY: i64 = 8192;

/// Map a memory limit onto a CPU weight in `1..=100`.
///
/// Linear between the two proxies, rounded down.
pub fn cpu_weight(memory_mb: i32) -> u32 {
    let memory = i64::from(memory_mb);

    if memory > MAX_CPU_PROXY {
        return 100;
    }

    if memory < MIN_CPU_PROXY {
        return 1;
    }

    let weight = 99 * (memory - MIN_CPU_PROXY) / (MAX_CPU_PROXY - MIN_CPU_PROXY) + 1;
    weight.clamp(1, 100) as u32
}
