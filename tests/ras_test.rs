/*!
 * RAS Scheduler Tests
 * End-to-end scenarios through the single-processor host
 */

use pretty_assertions::assert_eq;
use ras_sched::{
    CpuScheduler, Place, PolicyChain, RasConfig, RasScheduler, Rq, SchedClass, SchedulerError,
    SliceOverflow, TaskId, TaskTable, RR_INTERVAL_INVALID,
};
use std::sync::Arc;

fn host(config: RasConfig) -> (Arc<RasScheduler>, CpuScheduler) {
    let ras = Arc::new(RasScheduler::new(config).unwrap());
    let cpu = CpuScheduler::new(0, PolicyChain::standard(Arc::clone(&ras))).unwrap();
    (ras, cpu)
}

fn order(cpu: &CpuScheduler) -> Vec<TaskId> {
    cpu.rq().ras().iter(cpu.tasks()).collect()
}

#[test]
fn test_equal_weights_share_equal_slices() {
    let (_, mut cpu) = host(RasConfig::default());
    let a = cpu.spawn(1, 0, 4).unwrap();
    let b = cpu.spawn(2, 0, 4).unwrap();

    assert_eq!(cpu.task(a).unwrap().ras.time_slice(), 5);
    assert_eq!(cpu.task(b).unwrap().ras.time_slice(), 5);
    assert_eq!(cpu.rq().ras().total_wcounts(), 8);
}

#[test]
fn test_round_robin_rotation() {
    let (ras, mut cpu) = host(RasConfig::default());
    let a = cpu.spawn(1, 0, 4).unwrap();
    let b = cpu.spawn(2, 0, 4).unwrap();
    assert_eq!(cpu.schedule().unwrap(), a);

    // a runs its full 5-tick slice, then b takes over
    let mut now = 0;
    for _ in 0..4 {
        now += 1_000;
        assert!(!cpu.tick(now).unwrap());
        assert_eq!(cpu.current(), Some(a));
    }
    now += 1_000;
    assert!(cpu.tick(now).unwrap());
    assert_eq!(cpu.current(), Some(b));
    assert_eq!(order(&cpu), vec![b, a]);
    assert_eq!(cpu.rq().ras().nr_running(), 2);

    let stats = ras.stats();
    assert_eq!(stats.rotations, 1);
    assert_eq!(stats.ticks, 5);
    assert_eq!(cpu.task(a).unwrap().se.sum_exec_runtime, 5_000);
}

#[test]
fn test_single_task_keeps_running() {
    let (_, mut cpu) = host(RasConfig::default());
    let a = cpu.spawn(1, 0, 4).unwrap();
    cpu.schedule().unwrap();
    let switches = cpu.context_switches();

    for tick in 1..=20 {
        cpu.tick(tick * 1_000).unwrap();
        assert_eq!(cpu.current(), Some(a));
    }
    assert_eq!(order(&cpu), vec![a]);
    assert_eq!(cpu.context_switches(), switches);
}

#[test]
fn test_heavy_task_gets_shorter_slice() {
    let (_, mut cpu) = host(RasConfig::default());
    let light = cpu.spawn(1, 0, 10).unwrap();
    let heavy = cpu.spawn(2, 0, 30).unwrap();

    // average 20 when heavy arrives, ratio 1
    assert_eq!(cpu.rr_interval(heavy), 5);
    // light against average 20: ratio -2
    assert_eq!(cpu.rr_interval(light), 5);

    let heavier = cpu.spawn(3, 0, 200).unwrap();
    // average 80, ratio 2
    assert_eq!(cpu.task(heavier).unwrap().ras.time_slice(), 3);
    // light is now 8x lighter
    assert_eq!(cpu.rr_interval(light), 8);
}

#[test]
fn test_priority_wakeup_preempts() {
    let (ras, mut cpu) = host(RasConfig::default());
    let low = cpu.spawn(1, 10, 4).unwrap();
    cpu.schedule().unwrap();

    let high = cpu.spawn(2, 1, 4).unwrap();
    assert!(cpu.task(low).unwrap().need_resched());
    assert_eq!(ras.stats().preemptions, 1);

    // A tick with slice left withdraws the pending request
    assert!(!cpu.tick(1_000).unwrap());
    assert!(!cpu.task(low).unwrap().need_resched());

    // FIFO head still wins at the next decision point
    assert_eq!(cpu.schedule().unwrap(), low);
    assert!(cpu.task(high).unwrap().ras.on_rq());
}

#[test]
fn test_yield_moves_to_tail() {
    let (ras, mut cpu) = host(RasConfig::default());
    let a = cpu.spawn(1, 0, 1).unwrap();
    let b = cpu.spawn(2, 0, 1).unwrap();
    let c = cpu.spawn(3, 0, 1).unwrap();
    cpu.schedule().unwrap();

    assert_eq!(cpu.yield_current().unwrap(), b);
    assert_eq!(order(&cpu), vec![b, c, a]);
    assert_eq!(ras.stats().yields, 1);
}

#[test]
fn test_weight_change_folded_in_at_exhaustion() {
    let (_, mut cpu) = host(RasConfig::default());
    let a = cpu.spawn(1, 0, 4).unwrap();
    let _b = cpu.spawn(2, 0, 4).unwrap();
    cpu.schedule().unwrap();

    cpu.set_weight(a, 40).unwrap();
    assert_eq!(cpu.rq().ras().total_wcounts(), 8);

    for tick in 1..=5 {
        cpu.tick(tick * 1_000).unwrap();
    }
    assert_eq!(cpu.rq().ras().total_wcounts(), 44);
    // average 22, ratio 1
    assert_eq!(cpu.task(a).unwrap().ras.time_slice(), 5);

    cpu.exit(a).unwrap();
    assert_eq!(cpu.rq().ras().total_wcounts(), 4);
}

#[test]
fn test_sleep_wake_round_trip() {
    let (_, mut cpu) = host(RasConfig::default());
    let ids: Vec<_> = (1..=4).map(|pid| cpu.spawn(pid, 0, 2).unwrap()).collect();

    cpu.sleep(ids[1]).unwrap();
    cpu.wake_up(ids[1]).unwrap();
    assert_eq!(order(&cpu), vec![ids[0], ids[2], ids[3], ids[1]]);
    assert_eq!(cpu.rq().ras().nr_running(), 4);
    assert_eq!(cpu.rq().nr_running(), 4);
    assert_eq!(cpu.rq().ras().total_wcounts(), 8);
}

#[test]
fn test_rejected_slices_never_leave_zero() {
    let config = RasConfig::default().with_bounds(3, 6);
    assert_eq!(config.overflow, SliceOverflow::Reject);
    let (ras, mut cpu) = host(config);

    // weight 0 always computes slice 10
    let a = cpu.spawn(1, 0, 0).unwrap();
    cpu.schedule().unwrap();
    assert_eq!(cpu.task(a).unwrap().ras.time_slice(), 3);
    assert_eq!(cpu.rr_interval(a), RR_INTERVAL_INVALID);

    for tick in 1..=10 {
        cpu.tick(tick * 1_000).unwrap();
        assert!(cpu.task(a).unwrap().ras.time_slice() > 0);
    }
    assert!(ras.stats().rejected_slices >= 4);
}

#[test]
fn test_clamp_policy() {
    let (_, mut cpu) = host(RasConfig::clamped().with_bounds(3, 6));
    let a = cpu.spawn(1, 0, 0).unwrap();
    assert_eq!(cpu.task(a).unwrap().ras.time_slice(), 6);
    assert_eq!(cpu.rr_interval(a), 6);
}

#[test]
fn test_runtime_counter_readable_outside_queue() {
    let (_, mut cpu) = host(RasConfig::default());
    cpu.spawn(1, 0, 4).unwrap();
    let counter = cpu.rq().ras().runtime_counter();
    cpu.schedule().unwrap();

    for tick in 1..=3 {
        cpu.tick(tick * 2_000).unwrap();
    }
    assert_eq!(counter.get(), 6_000);
}

#[test]
fn test_class_used_directly() {
    let ras = RasScheduler::default();
    let mut rq = Rq::new(3);
    let mut tasks = TaskTable::new();
    let a = tasks.insert(ras_sched::Task::ras(1, 0, 4)).unwrap();

    assert_eq!(ras.pick_next_task(&mut rq, &mut tasks), None);
    ras.enqueue_task(&mut rq, &mut tasks, a, Place::Tail).unwrap();
    assert_eq!(ras.pick_next_task(&mut rq, &mut tasks), Some(a));
    assert_eq!(
        ras.yield_task(&mut rq, &mut tasks),
        Err(SchedulerError::NoCurrentTask(3))
    );
    assert_eq!(ras.get_rr_interval(None, &tasks, Some(a)), RR_INTERVAL_INVALID);

    ras.dequeue_task(&mut rq, &mut tasks, a).unwrap();
    assert!(tasks.remove(a).is_ok());
}

#[test]
fn test_remove_while_queued_is_refused() {
    let ras = RasScheduler::default();
    let mut rq = Rq::new(0);
    let mut tasks = TaskTable::new();
    let a = tasks.insert(ras_sched::Task::ras(1, 0, 4)).unwrap();
    ras.enqueue_task(&mut rq, &mut tasks, a, Place::Head).unwrap();

    assert_eq!(tasks.remove(a).unwrap_err(), SchedulerError::StillQueued(a));
}
