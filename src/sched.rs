//! Best-effort scheduling setup for the benchmark process.
//!
//! Raises priority, requests the FIFO real-time policy and pins the process
//! to a CPU range so timed runs see less scheduler noise. None of these are
//! required: failures are logged and the benchmark carries on.

use tracing::{info, warn};

/// Niceness the setup starts from; it steps towards 0 until one is accepted.
pub const TARGET_NICENESS: i32 = -20;

/// What the scheduling setup managed to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulingReport {
    /// Niceness in effect, if any level could be set.
    pub niceness: Option<i32>,
    pub fifo: bool,
    pub affinity: bool,
}

/// Applies niceness, FIFO scheduling and an affinity mask of
/// `cpu..cpu + nthreads` to the calling process.
pub fn configure(cpu: usize, nthreads: usize) -> SchedulingReport {
    info!("setting up schedulers and affinity");

    let niceness = set_niceness();
    match niceness {
        Some(level) => info!(level, "process niceness set"),
        None => warn!("could not change process niceness"),
    }

    let fifo = set_fifo();
    if fifo {
        info!("FIFO scheduling with maximum priority enabled");
    } else {
        warn!("FIFO scheduling unavailable, keeping default policy");
    }

    let affinity = set_affinity(cpu, nthreads);
    if affinity {
        info!(first_cpu = cpu, cpus = nthreads, "affinity mask applied");
    } else {
        warn!(first_cpu = cpu, cpus = nthreads, "could not apply affinity mask");
    }

    SchedulingReport {
        niceness,
        fifo,
        affinity,
    }
}

#[cfg(target_os = "linux")]
fn set_niceness() -> Option<i32> {
    (TARGET_NICENESS..=0).find(|&level| {
        // SAFETY: setpriority only reads its scalar arguments.
        unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, level) == 0 }
    })
}

#[cfg(target_os = "linux")]
fn set_fifo() -> bool {
    // SAFETY: sched_param is plain data, zero is a valid starting value, and
    // pid 0 targets the calling process.
    unsafe {
        let max = libc::sched_get_priority_max(libc::SCHED_FIFO);
        if max < 0 {
            return false;
        }
        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = max;
        libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) == 0
    }
}

#[cfg(target_os = "linux")]
fn set_affinity(cpu: usize, nthreads: usize) -> bool {
    let limit = libc::CPU_SETSIZE as usize;
    let Some(end) = cpu.checked_add(nthreads) else {
        return false;
    };
    if nthreads == 0 || end > limit {
        return false;
    }

    // SAFETY: the set is correctly sized, every index is below CPU_SETSIZE,
    // and pid 0 targets the calling thread.
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        for core in cpu..end {
            libc::CPU_SET(core, &mut set);
        }
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
    }
}

#[cfg(not(target_os = "linux"))]
fn set_niceness() -> Option<i32> {
    None
}

#[cfg(not(target_os = "linux"))]
fn set_fifo() -> bool {
    false
}

#[cfg(not(target_os = "linux"))]
fn set_affinity(cpu: usize, nthreads: usize) -> bool {
    let _ = (cpu, nthreads);
    false
}
