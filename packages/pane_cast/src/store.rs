use std::sync::Arc;

use tokio::sync::RwLock;

use term_frame::Frame;

/// Single-slot holder for the most recent frame. The sampler overwrites it
/// once per cycle; every viewer task reads it on its own schedule.
#[derive(Debug, Default)]
pub struct FrameStore {
    slot: RwLock<Option<Arc<Frame>>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot. Readers holding the previous `Arc` keep a valid
    /// frame and see the new one on their next read.
    pub async fn publish(&self, frame: Frame) {
        *self.slot.write().await = Some(Arc::new(frame));
    }

    /// The latest frame, or `None` before the first successful capture.
    pub async fn latest(&self) -> Option<Arc<Frame>> {
        self.slot.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use term_frame::parse_frame;

    #[test]
    fn starts_empty() {
        tokio_test::block_on(async {
            let store = FrameStore::new();
            assert!(store.latest().await.is_none());
        });
    }

    #[tokio::test]
    async fn publish_then_read() {
        let store = FrameStore::new();
        store.publish(parse_frame("hi", 2, 1)).await;

        let frame = store.latest().await.unwrap();
        assert_eq!(frame.cell(0, 0).ch, 'h');
        assert_eq!(frame.cell(1, 0).ch, 'i');
    }

    #[tokio::test]
    async fn held_frames_survive_replacement() {
        let store = FrameStore::new();
        store.publish(parse_frame("aa", 2, 1)).await;
        let held = store.latest().await.unwrap();

        store.publish(parse_frame("bb", 2, 1)).await;

        assert_eq!(held.cell(0, 0).ch, 'a');
        assert_eq!(store.latest().await.unwrap().cell(0, 0).ch, 'b');
    }
}
