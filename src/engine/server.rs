use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, info};

use crate::{
    config::{validate_sample_rate, EngineConfig},
    error::Result,
    graph::node::{Cached, RenderCtx, RenderUnit},
};

/*
Mix Server
==========

Owns every registered unit and mixes them per output channel, once per driver
callback.

    control thread                      audio thread
    ──────────────                      ────────────
    insert(unit) ──→ UnitId             callback(input, output, frames)
    add_client(id, ch)                    │ lock registry
    remove_client(id, ch)                 │ snapshot input
    remove(id) ──→ unit back              │ for each channel (ascending):
          │                               │   zero region
          └──── registry lock ────────────│   process each unit, sum
                                          │ clock += frames
                                          └ unlock

Units live in an arena and are reached through `UnitId` handles, so a channel
list can never point at a freed unit. Each arena entry carries its own render
cache: a unit registered on two channels renders once per callback and both
channels receive identical samples.

Summation is plain addition. Nothing is clipped or normalized.

Channel layout is planar: channel `c` of a block of `frames` samples occupies
`buf[c * frames..(c + 1) * frames]`. `callback_interleaved` wraps the planar
path for drivers that deliver frames interleaved.
*/

new_key_type! {
    /// Handle to a unit owned by a [`MixServer`].
    pub struct UnitId;
}

type Unit = Cached<Box<dyn RenderUnit>>;

struct Registry {
    config: EngineConfig,
    units: SlotMap<UnitId, Unit>,
    channels: BTreeMap<usize, Vec<UnitId>>,
    /// Planar input snapshot of the last callback.
    input: Vec<f32>,
    input_frames: usize,
    /// One unit's block before it is summed into a channel.
    temp: Vec<f32>,
    /// Destination for channels past the output count.
    spill: Vec<f32>,
    /// Planar staging for the interleaved callback.
    planar: Vec<f32>,
}

impl Registry {
    fn new(config: EngineConfig) -> Self {
        let block = config.max_block_size;
        Self {
            config,
            units: SlotMap::with_key(),
            channels: BTreeMap::new(),
            input: vec![0.0; config.input_channels * block],
            input_frames: 0,
            temp: vec![0.0; block],
            spill: vec![0.0; block],
            planar: vec![0.0; config.output_channels * block],
        }
    }

    fn snapshot_planar(&mut self, input: &[f32], frames: usize) {
        let len = self.config.input_channels * frames;
        let copied = input.len().min(len);
        self.input[..copied].copy_from_slice(&input[..copied]);
        self.input[copied..len].fill(0.0);
        self.input_frames = frames;
    }

    fn snapshot_interleaved(&mut self, input: &[f32], frames: usize) {
        let channels = self.config.input_channels;
        for ch in 0..channels {
            let region = &mut self.input[ch * frames..(ch + 1) * frames];
            for (i, sample) in region.iter_mut().enumerate() {
                *sample = input.get(i * channels + ch).copied().unwrap_or(0.0);
            }
        }
        self.input_frames = frames;
    }

    /// Render every channel into `out` (planar, `output_channels * frames`).
    fn mix(&mut self, out: &mut [f32], frames: usize, clock: u64) {
        let Registry {
            config,
            units,
            channels,
            input,
            temp,
            spill,
            ..
        } = self;

        let input_channels = config.input_channels;
        let ctx = RenderCtx::new(config.sample_rate, clock)
            .with_input(&input[..input_channels * frames], input_channels);
        let temp = &mut temp[..frames];

        out[..config.output_channels * frames].fill(0.0);

        for (&channel, clients) in channels.iter() {
            let region = if channel < config.output_channels {
                &mut out[channel * frames..(channel + 1) * frames]
            } else {
                // rendered so the unit's clock stays current, then dropped
                spill[..frames].fill(0.0);
                &mut spill[..frames]
            };

            for id in clients {
                if let Some(unit) = units.get_mut(*id) {
                    unit.process(temp, &ctx);
                    for (acc, sample) in region.iter_mut().zip(temp.iter()) {
                        *acc += *sample;
                    }
                }
            }
        }
    }
}

/// Multi-channel mixer driven by the audio callback.
///
/// Share it between the control and audio threads as `Arc<MixServer>`.
/// Registry mutations and the callback are serialized by one lock; the clock
/// can be read at any time without it.
pub struct MixServer {
    registry: Mutex<Registry>,
    clock: AtomicU64,
}

impl MixServer {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        info!(
            sample_rate = config.sample_rate,
            inputs = config.input_channels,
            outputs = config.output_channels,
            max_block = config.max_block_size,
            "mix server created"
        );
        Ok(Self {
            registry: Mutex::new(Registry::new(config)),
            clock: AtomicU64::new(0),
        })
    }

    /// Move `unit` into the server. It produces nothing until registered on
    /// a channel with [`add_client`](Self::add_client).
    pub fn insert(&self, unit: impl RenderUnit + 'static) -> UnitId {
        self.insert_boxed(Box::new(unit))
    }

    pub fn insert_boxed(&self, unit: Box<dyn RenderUnit>) -> UnitId {
        let mut registry = self.registry.lock();
        let block = registry.config.max_block_size;
        let id = registry.units.insert(Cached::with_capacity(unit, block));
        debug!(?id, "unit inserted");
        id
    }

    /// Unregister `id` from every channel and hand the unit back.
    pub fn remove(&self, id: UnitId) -> Option<Box<dyn RenderUnit>> {
        let mut registry = self.registry.lock();
        let unit = registry.units.remove(id)?;
        registry.channels.retain(|_, clients| {
            clients.retain(|client| *client != id);
            !clients.is_empty()
        });
        debug!(?id, "unit removed");
        Some(unit.into_inner())
    }

    /// Register `id` on `channel`. Returns `false` if it was already there or
    /// the handle is stale.
    pub fn add_client(&self, id: UnitId, channel: usize) -> bool {
        let mut registry = self.registry.lock();
        if !registry.units.contains_key(id) {
            return false;
        }

        let clients = registry.channels.entry(channel).or_default();
        if clients.contains(&id) {
            return false;
        }
        clients.push(id);
        debug!(?id, channel, "client added");
        true
    }

    /// Unregister `id` from `channel`, dropping the channel once it is empty.
    /// The unit itself stays in the server.
    pub fn remove_client(&self, id: UnitId, channel: usize) -> bool {
        let mut registry = self.registry.lock();
        let Some(clients) = registry.channels.get_mut(&channel) else {
            return false;
        };
        let Some(pos) = clients.iter().position(|client| *client == id) else {
            return false;
        };

        clients.remove(pos);
        if clients.is_empty() {
            registry.channels.remove(&channel);
        }
        debug!(?id, channel, "client removed");
        true
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.registry.lock().units.contains_key(id)
    }

    /// Units registered on `channel`, in mixing order.
    pub fn clients(&self, channel: usize) -> Vec<UnitId> {
        self.registry
            .lock()
            .channels
            .get(&channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Channels with at least one registered unit, ascending.
    pub fn channels(&self) -> Vec<usize> {
        self.registry.lock().channels.keys().copied().collect()
    }

    /// Planar entry point for the audio driver.
    ///
    /// `input` holds `input_channels * frames` samples (missing samples read
    /// as silence), `output` at least `output_channels * frames`. Panics if
    /// `frames` exceeds the configured maximum block size.
    pub fn callback(&self, input: &[f32], output: &mut [f32], frames: usize) {
        let mut registry = self.registry.lock();
        let outputs = registry.config.output_channels;
        check_block(&registry.config, output.len(), frames, outputs);

        registry.snapshot_planar(input, frames);
        let clock = self.clock.load(Ordering::Acquire);
        registry.mix(output, frames, clock);
        self.clock.fetch_add(frames as u64, Ordering::AcqRel);
    }

    /// Interleaved entry point: `frames = output.len() / output_channels`.
    ///
    /// Blocks longer than the maximum block size are rendered in chunks, each
    /// one a separate clock step.
    pub fn callback_interleaved(&self, input: &[f32], output: &mut [f32]) {
        let mut registry = self.registry.lock();
        let outputs = registry.config.output_channels;
        let inputs = registry.config.input_channels;
        if outputs == 0 {
            output.fill(0.0);
            return;
        }

        let total = output.len() / outputs;
        // a partial trailing frame is never rendered
        output[total * outputs..].fill(0.0);
        let max_block = registry.config.max_block_size;
        let mut planar = std::mem::take(&mut registry.planar);

        let mut offset = 0;
        while offset < total {
            let frames = (total - offset).min(max_block);
            let in_start = (offset * inputs).min(input.len());
            let in_end = ((offset + frames) * inputs).min(input.len());
            registry.snapshot_interleaved(&input[in_start..in_end], frames);

            let clock = self.clock.load(Ordering::Acquire);
            registry.mix(&mut planar, frames, clock);
            self.clock.fetch_add(frames as u64, Ordering::AcqRel);

            let chunk = &mut output[offset * outputs..(offset + frames) * outputs];
            for (i, frame) in chunk.chunks_exact_mut(outputs).enumerate() {
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = planar[ch * frames + i];
                }
            }
            offset += frames;
        }

        registry.planar = planar;
    }

    /// Copy the last callback's input for `channel` into `buffer`.
    ///
    /// Samples beyond the snapshot, or all of them before the first
    /// callback, are silence.
    pub fn get_input(&self, buffer: &mut [f32], channel: usize) {
        let registry = self.registry.lock();
        assert!(
            channel < registry.config.input_channels,
            "input channel {channel} out of range ({} configured)",
            registry.config.input_channels
        );

        let frames = registry.input_frames;
        let snapshot = &registry.input[channel * frames..(channel + 1) * frames];
        let copied = buffer.len().min(frames);
        buffer[..copied].copy_from_slice(&snapshot[..copied]);
        buffer[copied..].fill(0.0);
    }

    /// Frames rendered since the server was created.
    pub fn clock(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    pub fn config(&self) -> EngineConfig {
        self.registry.lock().config
    }

    pub fn sample_rate(&self) -> f32 {
        self.registry.lock().config.sample_rate
    }

    pub fn input_channels(&self) -> usize {
        self.registry.lock().config.input_channels
    }

    pub fn output_channels(&self) -> usize {
        self.registry.lock().config.output_channels
    }

    pub fn set_sample_rate(&self, sample_rate: f32) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.registry.lock().config.sample_rate = sample_rate;
        info!(sample_rate, "sample rate set");
        Ok(())
    }

    /// Resizes the input snapshot. The previous snapshot is discarded.
    pub fn set_input_channels(&self, channels: usize) {
        let mut registry = self.registry.lock();
        let block = registry.config.max_block_size;
        registry.config.input_channels = channels;
        registry.input = vec![0.0; channels * block];
        registry.input_frames = 0;
        info!(channels, "input channels set");
    }

    pub fn set_output_channels(&self, channels: usize) {
        let mut registry = self.registry.lock();
        let block = registry.config.max_block_size;
        registry.config.output_channels = channels;
        registry.planar = vec![0.0; channels * block];
        info!(channels, "output channels set");
    }
}

fn check_block(config: &EngineConfig, output_len: usize, frames: usize, outputs: usize) {
    assert!(
        frames <= config.max_block_size,
        "block of {frames} frames exceeds maximum block size {}",
        config.max_block_size
    );
    assert!(
        output_len >= frames * outputs,
        "output buffer holds {output_len} samples, need {}",
        frames * outputs
    );
}
