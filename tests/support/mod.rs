#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use framereel::{
    AssetRequest, AssetSource, CompletionSink, FramePlayer, ManualScheduler, PlayerConfig,
    PlayerHost, Raster, ReelError, ReelResult, Rect, RenderTarget, Sequence, StartPolicy,
    Viewport,
};

/// Solid 16:9 frame whose red channel encodes its index.
pub fn frame_raster(index: usize) -> Raster {
    Raster::solid(16, 9, [index as u8, 0, 0, 255])
}

pub fn tag_of(raster: &Raster) -> usize {
    usize::from(raster.rgba8_premul[0])
}

pub fn sequence(len: u32) -> Sequence {
    Sequence::numbered("frame-", 3, 1, len, "png").unwrap()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    Immediate,
    Fail,
    Defer,
}

#[derive(Default)]
pub struct SourceState {
    pub fetches: Vec<AssetRequest>,
    pub pending: Vec<CompletionSink>,
    behaviors: HashMap<usize, Behavior>,
    default: Option<Behavior>,
}

/// Asset source whose per-frame outcome is scripted by index.
#[derive(Clone, Default)]
pub struct ScriptedSource(pub Rc<RefCell<SourceState>>);

impl ScriptedSource {
    pub fn new(default: Behavior) -> Self {
        let s = Self::default();
        s.0.borrow_mut().default = Some(default);
        s
    }

    pub fn with(self, index: usize, behavior: Behavior) -> Self {
        self.0.borrow_mut().behaviors.insert(index, behavior);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.0.borrow().fetches.len()
    }

    pub fn fetched_indices(&self) -> Vec<usize> {
        self.0.borrow().fetches.iter().map(|r| r.index).collect()
    }

    fn take(&self, index: usize) -> CompletionSink {
        let mut state = self.0.borrow_mut();
        let pos = state
            .pending
            .iter()
            .position(|s| s.index() == index)
            .unwrap_or_else(|| panic!("frame {index} is not pending"));
        state.pending.remove(pos)
    }

    pub fn settle(&self, index: usize) {
        self.take(index).complete(Ok(frame_raster(index)));
    }

    pub fn fail(&self, index: usize) {
        self.take(index)
            .complete(Err(ReelError::load(format!("frame {index} unavailable"))));
    }
}

impl AssetSource for ScriptedSource {
    fn fetch(&self, request: AssetRequest, sink: CompletionSink) {
        let mut state = self.0.borrow_mut();
        let behavior = state
            .behaviors
            .get(&request.index)
            .copied()
            .or(state.default)
            .unwrap_or(Behavior::Immediate);
        let index = request.index;
        state.fetches.push(request);
        match behavior {
            Behavior::Immediate => sink.complete(Ok(frame_raster(index))),
            Behavior::Fail => sink.complete(Err(ReelError::load("scripted failure"))),
            Behavior::Defer => state.pending.push(sink),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    pub frame: usize,
    pub dest: Rect,
    pub viewport: Option<Viewport>,
}

/// Render target that records every call.
#[derive(Debug)]
pub struct RecordingTarget {
    pub host: Option<Viewport>,
    pub configured: Vec<Viewport>,
    pub draws: Vec<Draw>,
    pub listening: bool,
}

impl RecordingTarget {
    pub fn new(width: f64, height: f64, dpr: f64) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            host: Some(Viewport::new(width, height, dpr)),
            configured: Vec::new(),
            draws: Vec::new(),
            listening: false,
        }))
    }

    pub fn drawn_frames(&self) -> Vec<usize> {
        self.draws.iter().map(|d| d.frame).collect()
    }

    pub fn last_frame(&self) -> Option<usize> {
        self.draws.last().map(|d| d.frame)
    }
}

impl RenderTarget for RecordingTarget {
    fn measure(&self) -> Option<Viewport> {
        self.host
    }

    fn configure(&mut self, viewport: &Viewport) -> ReelResult<()> {
        self.configured.push(*viewport);
        Ok(())
    }

    fn draw_raster(&mut self, raster: &Raster, dest: Rect) -> ReelResult<()> {
        self.draws.push(Draw {
            frame: tag_of(raster),
            dest,
            viewport: self.configured.last().copied(),
        });
        Ok(())
    }

    fn attach_resize_listener(&mut self) {
        self.listening = true;
    }

    fn detach_resize_listener(&mut self) {
        self.listening = false;
    }
}

pub struct Rig {
    pub player: FramePlayer,
    pub source: ScriptedSource,
    pub target: Rc<RefCell<RecordingTarget>>,
    pub scheduler: ManualScheduler,
}

pub fn rig(len: u32, start: StartPolicy, source: ScriptedSource) -> Rig {
    let target = RecordingTarget::new(320.0, 180.0, 1.0);
    let scheduler = ManualScheduler::new();
    let host = PlayerHost {
        target: Some(Box::new(target.clone())),
        source: Box::new(source.clone()),
        scheduler: Box::new(scheduler.clone()),
    };
    let config = PlayerConfig {
        start,
        ..PlayerConfig::default()
    };
    Rig {
        player: FramePlayer::new(host, "/hero-frames", sequence(len), config),
        source,
        target,
        scheduler,
    }
}
