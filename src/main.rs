/*!
 * RAS Simulator - Main Entry Point
 *
 * Drives a single simulated processor through a fixed number of ticks and
 * prints the resulting policy statistics as JSON.
 *
 * Environment:
 * - RAS_CONFIG: path to a JSON policy config (falls back to RAS_TIMESLICE_* variables)
 * - RAS_SIM_TICKS: number of ticks to run (default 200)
 * - RAS_SIM_TASKS: comma-separated `pid:prio:weight` triples
 */

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use ras_sched::core::limits::{DEFAULT_CPU, DEFAULT_TICK_NANOS};
use ras_sched::{init_tracing, CpuScheduler, PolicyChain, RasConfig, RasScheduler};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

const DEFAULT_TICKS: u64 = 200;
const DEFAULT_TASKS: &str = "1:0:4,2:0:4,3:5:16,4:10:1";

#[derive(Debug, Serialize)]
struct TaskReport {
    pid: u32,
    wcounts: u32,
    time_slice: u32,
    runtime_ns: u64,
}

#[derive(Debug, Serialize)]
struct Report {
    ticks: u64,
    context_switches: u64,
    queue_runtime_ns: u64,
    stats: ras_sched::RasStats,
    tasks: Vec<TaskReport>,
}

fn load_config() -> Result<RasConfig> {
    match std::env::var("RAS_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading {path}"))?;
            Ok(RasConfig::from_json_str(&raw)?)
        }
        Err(_) => Ok(RasConfig::from_env()?),
    }
}

fn parse_tasks(spec: &str) -> Result<Vec<(u32, i32, u32)>> {
    spec.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let fields: Vec<&str> = entry.trim().split(':').collect();
            let [pid, prio, weight] = fields.as_slice() else {
                return Err(miette!("task entry {entry:?} is not pid:prio:weight"));
            };
            Ok((
                pid.parse().into_diagnostic().wrap_err("pid")?,
                prio.parse().into_diagnostic().wrap_err("prio")?,
                weight.parse().into_diagnostic().wrap_err("weight")?,
            ))
        })
        .collect()
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    let ticks = match std::env::var("RAS_SIM_TICKS") {
        Ok(raw) => raw.parse().into_diagnostic().wrap_err("RAS_SIM_TICKS")?,
        Err(_) => DEFAULT_TICKS,
    };
    let task_spec = std::env::var("RAS_SIM_TASKS").unwrap_or_else(|_| DEFAULT_TASKS.to_string());
    let specs = parse_tasks(&task_spec)?;

    let ras = Arc::new(RasScheduler::new(config)?);
    let mut cpu = CpuScheduler::new(DEFAULT_CPU, PolicyChain::standard(Arc::clone(&ras)))?;

    let mut ids = Vec::with_capacity(specs.len());
    for (pid, prio, weight) in specs {
        ids.push(cpu.spawn(pid, prio, weight)?);
    }
    cpu.schedule()?;

    info!(ticks, tasks = ids.len(), "simulation starting");
    for tick in 1..=ticks {
        cpu.tick(tick * DEFAULT_TICK_NANOS)?;
    }

    let mut tasks = Vec::with_capacity(ids.len());
    for id in ids {
        let task = cpu.task(id)?;
        tasks.push(TaskReport {
            pid: task.pid,
            wcounts: task.wcounts,
            time_slice: task.ras.time_slice(),
            runtime_ns: task.se.sum_exec_runtime,
        });
    }

    let report = Report {
        ticks,
        context_switches: cpu.context_switches(),
        queue_runtime_ns: cpu.rq().ras().runtime(),
        stats: ras.stats(),
        tasks,
    };
    let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tasks() {
        assert_eq!(
            parse_tasks("1:0:4, 2:-5:8,").unwrap(),
            vec![(1, 0, 4), (2, -5, 8)]
        );
        assert!(parse_tasks("1:0").is_err());
        assert!(parse_tasks("x:0:1").is_err());
    }
}
