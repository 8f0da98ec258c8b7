use std::cell::RefCell;

use super::*;
use crate::foundation::error::ReelError;

#[derive(Default)]
struct DeferredSource {
    pending: RefCell<Vec<CompletionSink>>,
    fetches: RefCell<Vec<AssetRequest>>,
}

impl AssetSource for DeferredSource {
    fn fetch(&self, request: AssetRequest, sink: CompletionSink) {
        self.fetches.borrow_mut().push(request);
        self.pending.borrow_mut().push(sink);
    }
}

impl DeferredSource {
    fn settle(&self, index: usize, result: Result<Raster, ReelError>) {
        let mut pending = self.pending.borrow_mut();
        let pos = pending.iter().position(|s| s.index() == index).unwrap();
        pending.remove(pos).complete(result);
    }
}

fn frame() -> Raster {
    Raster::solid(4, 3, [255, 0, 0, 255])
}

fn buffer(len: u32, start: StartPolicy) -> FrameBuffer {
    FrameBuffer::new("/frames", Sequence::numbered("f-", 3, 1, len, "png").unwrap(), start)
}

#[test]
fn request_is_idempotent() {
    let source = DeferredSource::default();
    let mut buf = buffer(3, StartPolicy::Prefix(1));

    buf.request(1, &source);
    buf.request(1, &source);
    buf.request(9, &source);

    let fetches = source.fetches.borrow();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].index, 1);
    assert_eq!(fetches[0].location(), "/frames/f-002.png");
    assert_eq!(buf.slot(1), Some(&FrameSlot::Loading));
    assert_eq!(buf.slot(0), Some(&FrameSlot::Unrequested));
}

#[test]
fn completions_apply_only_on_drain() {
    let source = DeferredSource::default();
    let mut buf = buffer(3, StartPolicy::Prefix(1));
    buf.request_all(&source);
    assert_eq!(source.fetches.borrow().len(), 3);

    source.settle(0, Ok(frame()));
    source.settle(2, Err(ReelError::load("404")));
    assert!(!buf.is_ready(0));

    assert_eq!(buf.drain(), 2);
    assert!(buf.is_ready(0));
    assert_eq!(buf.raster(0).map(|r| r.width), Some(4));
    assert_eq!(buf.slot(1), Some(&FrameSlot::Loading));
    assert_eq!(buf.slot(2), Some(&FrameSlot::Failed));
    assert!(buf.raster(2).is_none());
    assert_eq!(buf.ready_count(), 1);
    assert_eq!(buf.drain(), 0);
}

#[test]
fn threshold_counts_leading_settled_frames() {
    let source = DeferredSource::default();
    let mut buf = buffer(5, StartPolicy::Prefix(2));
    assert_eq!(buf.start_threshold(), 2);
    buf.request_all(&source);

    source.settle(0, Ok(frame()));
    source.settle(4, Ok(frame()));
    buf.drain();
    assert!(!buf.threshold_met());

    source.settle(1, Err(ReelError::load("corrupt")));
    buf.drain();
    assert!(buf.threshold_met());
}

#[test]
fn threshold_is_clamped() {
    let mut buf = buffer(3, StartPolicy::AllFrames);
    assert_eq!(buf.start_threshold(), 3);
    buf.set_start_threshold(0);
    assert_eq!(buf.start_threshold(), 1);
    buf.set_start_threshold(99);
    assert_eq!(buf.start_threshold(), 3);
}

#[test]
fn abandoned_buffer_ignores_late_results() {
    let source = DeferredSource::default();
    let mut buf = buffer(2, StartPolicy::Prefix(1));
    buf.request(0, &source);
    buf.abandon();
    assert!(buf.is_abandoned());

    source.settle(0, Ok(frame()));
    assert_eq!(buf.drain(), 0);
    assert_eq!(buf.slot(0), Some(&FrameSlot::Loading));

    buf.request(1, &source);
    assert_eq!(source.fetches.borrow().len(), 1);
}

#[test]
fn buffers_do_not_share_slots() {
    let source = DeferredSource::default();
    let mut a = buffer(1, StartPolicy::Prefix(1));
    let mut b = buffer(1, StartPolicy::Prefix(1));
    a.request(0, &source);
    b.request(0, &source);

    source.pending.borrow_mut().remove(0).complete(Ok(frame()));
    a.drain();
    b.drain();
    assert!(a.is_ready(0));
    assert!(!b.is_ready(0));
}
