// Frame loop for the cursor overlay.
// The original effect reschedules itself forever; here the loop is a tokio
// task bound to the Animator handle, with an explicit stop for clean
// shutdown. Pointer events are applied as they arrive; the overlay ticks at
// the frame interval.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::events::PointerEvent;
use super::overlay::{CursorOverlay, Layer};

/// Default target frame rate.
pub const DEFAULT_FPS: u32 = 60;

/// Frame duration for a target frame rate.
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

/// Snapshot of the overlay published after every frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub layers: [Layer; 3],
    pub hover: bool,
    pub pressed: bool,
}

fn snapshot(overlay: &CursorOverlay, frame: u64) -> FrameSnapshot {
    FrameSnapshot {
        frame,
        layers: overlay.layers(),
        hover: overlay.hover_active(),
        pressed: overlay.pressed(),
    }
}

/// Handle to a running frame loop.
///
/// Dropping the handle aborts the loop; `stop` shuts it down and waits.
pub struct Animator {
    events: mpsc::Sender<PointerEvent>,
    frames: watch::Receiver<FrameSnapshot>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Animator {
    /// Spawn the frame loop for a mounted overlay.
    pub fn spawn(mut overlay: CursorOverlay, fps: u32) -> Self {
        let (event_tx, mut event_rx) = mpsc::channel::<PointerEvent>(64);
        let (frame_tx, frame_rx) = watch::channel(snapshot(&overlay, 0));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(frame_duration(fps));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut frame = 0u64;

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    maybe = event_rx.recv() => {
                        match maybe {
                            Some(event) => overlay.apply(&event),
                            None => break,
                        }
                    }
                    _ = interval.tick() => {
                        overlay.tick();
                        frame += 1;
                        let _ = frame_tx.send(snapshot(&overlay, frame));
                    }
                }
            }
        });

        Self {
            events: event_tx,
            frames: frame_rx,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }

    /// Sender for pointer events feeding the loop.
    pub fn events(&self) -> mpsc::Sender<PointerEvent> {
        self.events.clone()
    }

    /// Receiver of per-frame snapshots.
    pub fn frames(&self) -> watch::Receiver<FrameSnapshot> {
        self.frames.clone()
    }

    /// Stop the loop and wait for the task to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::follower::Point;
    use crate::cursor::overlay::{InputProfile, LayerKind};

    fn dot(snapshot: &FrameSnapshot) -> Layer {
        *snapshot
            .layers
            .iter()
            .find(|layer| layer.kind == LayerKind::Dot)
            .unwrap()
    }

    #[tokio::test]
    async fn test_loop_ticks_and_applies_events() {
        let overlay = CursorOverlay::mount((100.0, 100.0), InputProfile::Pointer).unwrap();
        let animator = Animator::spawn(overlay, 240);
        let mut frames = animator.frames();

        animator
            .events()
            .send(PointerEvent::Moved { x: 10.0, y: 20.0 })
            .await
            .unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            tokio::time::timeout_at(deadline, frames.changed())
                .await
                .expect("frame loop stalled")
                .unwrap();
            let snap = frames.borrow().clone();
            if snap.frame > 0 && dot(&snap).pos == Point::new(10.0, 20.0) {
                break;
            }
        }

        animator.stop().await;
    }

    #[tokio::test]
    async fn test_stop_ends_the_task() {
        let overlay = CursorOverlay::mount((100.0, 100.0), InputProfile::Pointer).unwrap();
        let animator = Animator::spawn(overlay, 240);

        // Returns only once the task has actually finished.
        animator.stop().await;
    }

    #[test]
    fn test_frame_duration_60fps() {
        let duration = frame_duration(DEFAULT_FPS);
        assert!(duration.as_millis() >= 16 && duration.as_millis() <= 17);
    }
}
