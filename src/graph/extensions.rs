use crate::graph::{
    amplify::Multiply,
    node::{Cached, RenderUnit, Shared},
    shaper::Waveshaper,
    source::Silence,
};

pub trait UnitExt: RenderUnit + Sized {
    fn cached(self) -> Cached<Self> {
        Cached::new(self)
    }

    fn shared(self) -> Shared<Self> {
        Shared::new(self)
    }

    fn multiply<M: RenderUnit>(self, modulator: M) -> Multiply<Self, M> {
        Multiply::new(self, modulator)
    }

    fn scaled(self, gain: f32) -> Multiply<Self, Silence> {
        Multiply::by_constant(self, gain)
    }

    fn shaped(self, table: &[f32]) -> Waveshaper<Self> {
        Waveshaper::new(self, table)
    }
}

impl<T: RenderUnit> UnitExt for T {}
