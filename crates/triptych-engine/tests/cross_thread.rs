//! Integration test: host and mirror running on real threads.
//!
//! A simulation-style thread owns a `SyncHost`, updates a node's position
//! each tick, and publishes at end of frame. A render-style thread owns a
//! `SyncMirror`, swaps at the start of each frame, and must observe a
//! monotonically advancing subsequence of the published snapshots with no
//! torn or reordered values. Disposal then crosses the same boundary:
//! refcount to zero on the host, ack from the mirror, reclamation on the
//! host.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use triptych_core::PropValue;
use triptych_engine::{SyncHost, SyncMirror};
use triptych_test_utils::node_schemas;

const TICKS: u32 = 200;
const DEADLINE: Duration = Duration::from_secs(20);

#[test]
fn mirror_observes_monotonic_subsequence_then_disposal() {
    let mut host = SyncHost::new(node_schemas()).unwrap();
    let link = host.attach_mirror().unwrap();

    let id = host
        .registry_mut()
        .create("node", &[("visible", PropValue::U32(1))])
        .unwrap();

    // Mirror signals once it has observed the final tick's position.
    let (saw_final_tx, saw_final_rx) = bounded::<()>(1);
    // Host signals once the resource has been marked for disposal.
    let (disposing_tx, disposing_rx) = bounded::<()>(1);

    let mirror_thread = thread::spawn(move || {
        let mut mirror = SyncMirror::new(node_schemas(), link).unwrap();
        let deadline = Instant::now() + DEADLINE;

        // Phase 1: watch the position advance. Values may skip ticks but
        // must never go backwards, and visibility must always read as a
        // complete snapshot.
        let mut last = 0f32;
        while last < TICKS as f32 {
            assert!(Instant::now() < deadline, "mirror never saw the final tick");
            mirror.begin_frame().unwrap();
            if let Some(node) = mirror.registry().get(id) {
                let position = node.get_vec3("position").unwrap();
                assert!(
                    position[0] >= last,
                    "position went backwards: {} after {last}",
                    position[0]
                );
                assert_eq!(position[1], -position[0]);
                assert_eq!(node.get_u32("visible").unwrap(), 1);
                last = position[0];
            }
            mirror.end_frame();
            thread::yield_now();
        }
        saw_final_tx.send(()).unwrap();

        // Phase 2: keep frames running until the disposal notification
        // arrives and the local instance is dropped.
        disposing_rx.recv().unwrap();
        while mirror.registry().get(id).is_some() {
            assert!(Instant::now() < deadline, "mirror never saw the disposal");
            mirror.begin_frame().unwrap();
            mirror.end_frame();
            thread::yield_now();
        }
        assert_eq!(mirror.registry().acked(), 1);
        mirror.metrics().clone()
    });

    for tick in 1..=TICKS {
        host.begin_frame();
        let node = host.registry_mut().get_mut(id).unwrap();
        node.set_vec3("position", [tick as f32, -(tick as f32), 0.0])
            .unwrap();
        host.end_frame();
        thread::yield_now();
    }

    saw_final_rx
        .recv_timeout(DEADLINE)
        .expect("mirror finished phase 1");

    host.registry_mut().remove_ref(id).unwrap();
    assert_eq!(host.registry().pending_disposals(), 1);
    disposing_tx.send(()).unwrap();

    let deadline = Instant::now() + DEADLINE;
    while host.registry().get(id).is_some() {
        assert!(Instant::now() < deadline, "host never reclaimed the resource");
        host.begin_frame();
        host.end_frame();
        thread::yield_now();
    }
    assert_eq!(host.registry().reclaimed(), 1);
    assert_eq!(host.registry().pending_disposals(), 0);

    let mirror_metrics = mirror_thread.join().unwrap();
    // Every adopted snapshot was fresh; the mirror may also have spun on
    // stale frames while the host was between publishes.
    assert!(mirror_metrics.swapped_reads >= 1);
}

#[test]
fn two_mirrors_gate_reclamation_independently() {
    let mut host = SyncHost::new(node_schemas()).unwrap();
    let render_link = host.attach_mirror().unwrap();
    let ui_link = host.attach_mirror().unwrap();

    let id = host.registry_mut().create("node", &[]).unwrap();
    host.end_frame();

    let mut render = SyncMirror::new(node_schemas(), render_link).unwrap();
    let mut ui = SyncMirror::new(node_schemas(), ui_link).unwrap();
    render.begin_frame().unwrap();
    ui.begin_frame().unwrap();
    assert!(render.registry().get(id).is_some());
    assert!(ui.registry().get(id).is_some());

    host.registry_mut().remove_ref(id).unwrap();

    // Only one mirror acks; the host must keep the slots alive.
    render.begin_frame().unwrap();
    host.begin_frame();
    assert!(host.registry().get(id).is_some());
    assert_eq!(host.registry().pending_disposals(), 1);

    ui.begin_frame().unwrap();
    host.begin_frame();
    assert!(host.registry().get(id).is_none());
    assert_eq!(host.registry().reclaimed(), 1);
}
