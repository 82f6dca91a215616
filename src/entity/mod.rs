// Copyright (c) 2026 rezky_nightky

// Each entity owns its state and advances one step per displayed frame;
// there is no delta time, so speeds are in logical pixels per frame.

mod bubble;
mod matrix;
mod nebula;
mod neural;
mod orb;
mod particle;
mod star;
mod synthwave;
mod wave;

pub use bubble::FloatingBubble;
pub use matrix::MatrixChar;
pub use nebula::NebulaLayer;
pub use neural::{draw_connections, link_weight, NeuralNode};
pub use orb::{FloatingLightOrb, FloatingOrb, NeonCyberOrb};
pub use particle::{AIParticle, SolarParticle};
pub use star::TwinklingStar;
pub use synthwave::SynthwaveGrid;
pub use wave::Wave;

use rand::Rng;

use crate::color::Rgba;
use crate::surface::Surface;
use crate::viewport::Viewport;

pub type SimRng = rand::rngs::StdRng;

pub trait Simulate {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng);

    fn draw(&self, surface: &mut dyn Surface, rng: &mut SimRng);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    NeuralNode,
    MatrixChar,
    AIParticle,
    FloatingOrb,
    FloatingLightOrb,
    NeonCyberOrb,
    NebulaLayer,
    FloatingBubble,
    TwinklingStar,
    SolarParticle,
    Wave,
    SynthwaveGrid,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::NeuralNode,
        EntityKind::MatrixChar,
        EntityKind::AIParticle,
        EntityKind::FloatingOrb,
        EntityKind::FloatingLightOrb,
        EntityKind::NeonCyberOrb,
        EntityKind::NebulaLayer,
        EntityKind::FloatingBubble,
        EntityKind::TwinklingStar,
        EntityKind::SolarParticle,
        EntityKind::Wave,
        EntityKind::SynthwaveGrid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::NeuralNode => "neural-node",
            EntityKind::MatrixChar => "matrix-char",
            EntityKind::AIParticle => "ai-particle",
            EntityKind::FloatingOrb => "floating-orb",
            EntityKind::FloatingLightOrb => "light-orb",
            EntityKind::NeonCyberOrb => "neon-orb",
            EntityKind::NebulaLayer => "nebula-layer",
            EntityKind::FloatingBubble => "bubble",
            EntityKind::TwinklingStar => "star",
            EntityKind::SolarParticle => "solar-particle",
            EntityKind::Wave => "wave",
            EntityKind::SynthwaveGrid => "synthwave-grid",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Entity {
    NeuralNode(NeuralNode),
    MatrixChar(MatrixChar),
    AIParticle(AIParticle),
    FloatingOrb(FloatingOrb),
    FloatingLightOrb(FloatingLightOrb),
    NeonCyberOrb(NeonCyberOrb),
    NebulaLayer(NebulaLayer),
    FloatingBubble(FloatingBubble),
    TwinklingStar(TwinklingStar),
    SolarParticle(SolarParticle),
    Wave(Wave),
    SynthwaveGrid(SynthwaveGrid),
}

impl Entity {
    pub fn spawn(kind: EntityKind, index: usize, viewport: Viewport, rng: &mut SimRng) -> Self {
        match kind {
            EntityKind::NeuralNode => Entity::NeuralNode(NeuralNode::new(viewport, rng)),
            EntityKind::MatrixChar => Entity::MatrixChar(MatrixChar::new(viewport, rng)),
            EntityKind::AIParticle => Entity::AIParticle(AIParticle::new(viewport, rng)),
            EntityKind::FloatingOrb => Entity::FloatingOrb(FloatingOrb::new(viewport, rng)),
            EntityKind::FloatingLightOrb => {
                Entity::FloatingLightOrb(FloatingLightOrb::new(viewport, rng))
            }
            EntityKind::NeonCyberOrb => Entity::NeonCyberOrb(NeonCyberOrb::new(viewport, rng)),
            EntityKind::NebulaLayer => Entity::NebulaLayer(NebulaLayer::new(index, rng)),
            EntityKind::FloatingBubble => {
                Entity::FloatingBubble(FloatingBubble::new(viewport, rng))
            }
            EntityKind::TwinklingStar => Entity::TwinklingStar(TwinklingStar::new(viewport, rng)),
            EntityKind::SolarParticle => Entity::SolarParticle(SolarParticle::new(viewport, rng)),
            EntityKind::Wave => Entity::Wave(Wave::preset(index)),
            EntityKind::SynthwaveGrid => Entity::SynthwaveGrid(SynthwaveGrid::new(viewport, rng)),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::NeuralNode(_) => EntityKind::NeuralNode,
            Entity::MatrixChar(_) => EntityKind::MatrixChar,
            Entity::AIParticle(_) => EntityKind::AIParticle,
            Entity::FloatingOrb(_) => EntityKind::FloatingOrb,
            Entity::FloatingLightOrb(_) => EntityKind::FloatingLightOrb,
            Entity::NeonCyberOrb(_) => EntityKind::NeonCyberOrb,
            Entity::NebulaLayer(_) => EntityKind::NebulaLayer,
            Entity::FloatingBubble(_) => EntityKind::FloatingBubble,
            Entity::TwinklingStar(_) => EntityKind::TwinklingStar,
            Entity::SolarParticle(_) => EntityKind::SolarParticle,
            Entity::Wave(_) => EntityKind::Wave,
            Entity::SynthwaveGrid(_) => EntityKind::SynthwaveGrid,
        }
    }

    pub fn as_neural(&self) -> Option<&NeuralNode> {
        match self {
            Entity::NeuralNode(n) => Some(n),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_nebula(&self) -> Option<&NebulaLayer> {
        match self {
            Entity::NebulaLayer(n) => Some(n),
            _ => None,
        }
    }

    fn sim(&self) -> &dyn Simulate {
        match self {
            Entity::NeuralNode(e) => e,
            Entity::MatrixChar(e) => e,
            Entity::AIParticle(e) => e,
            Entity::FloatingOrb(e) => e,
            Entity::FloatingLightOrb(e) => e,
            Entity::NeonCyberOrb(e) => e,
            Entity::NebulaLayer(e) => e,
            Entity::FloatingBubble(e) => e,
            Entity::TwinklingStar(e) => e,
            Entity::SolarParticle(e) => e,
            Entity::Wave(e) => e,
            Entity::SynthwaveGrid(e) => e,
        }
    }

    fn sim_mut(&mut self) -> &mut dyn Simulate {
        match self {
            Entity::NeuralNode(e) => e,
            Entity::MatrixChar(e) => e,
            Entity::AIParticle(e) => e,
            Entity::FloatingOrb(e) => e,
            Entity::FloatingLightOrb(e) => e,
            Entity::NeonCyberOrb(e) => e,
            Entity::NebulaLayer(e) => e,
            Entity::FloatingBubble(e) => e,
            Entity::TwinklingStar(e) => e,
            Entity::SolarParticle(e) => e,
            Entity::Wave(e) => e,
            Entity::SynthwaveGrid(e) => e,
        }
    }
}

impl Simulate for Entity {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.sim_mut().update(viewport, rng);
    }

    fn draw(&self, surface: &mut dyn Surface, rng: &mut SimRng) {
        self.sim().draw(surface, rng);
    }
}

pub(crate) fn signed(rng: &mut SimRng, scale: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * scale
}

pub(crate) fn span(rng: &mut SimRng, lo: f32, width: f32) -> f32 {
    rng.random::<f32>() * width + lo
}

/// Points `vel` back inside [0, max] whenever `pos` has left it.
pub(crate) fn reflect(pos: f32, vel: &mut f32, max: f32) -> bool {
    if pos < 0.0 {
        *vel = vel.abs();
        true
    } else if pos > max {
        *vel = -vel.abs();
        true
    } else {
        false
    }
}

pub(crate) fn wrap(pos: &mut f32, margin: f32, max: f32) {
    if *pos < -margin {
        *pos = max + margin;
    } else if *pos > max + margin {
        *pos = -margin;
    }
}

pub(crate) fn pick<T: Copy>(rng: &mut SimRng, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn rgba(self, a: f32) -> Rgba {
        Rgba::hsla(self.h, self.s, self.l, a)
    }

    pub fn shift(self, dh: f32, ds: f32, dl: f32) -> Self {
        Self::new(self.h + dh, self.s + ds, self.l + dl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{Op, RecordingSurface};
    use rand::SeedableRng;

    fn ops_are_sane(ops: &[Op]) -> bool {
        ops.iter().all(|op| match op {
            Op::Alpha(a) => a.is_finite() && *a >= 0.0,
            Op::FillCircle { center, radius } => {
                center.x.is_finite() && center.y.is_finite() && radius.is_finite() && *radius >= 0.0
            }
            Op::StrokeArc { radius, .. } => radius.is_finite() && *radius >= 0.0,
            _ => true,
        })
    }

    #[test]
    fn every_kind_spawns_as_itself() {
        let mut rng = SimRng::seed_from_u64(7);
        let vp = Viewport::new(1280.0, 720.0);
        for kind in EntityKind::ALL {
            assert_eq!(Entity::spawn(kind, 0, vp, &mut rng).kind(), kind);
        }
    }

    #[test]
    fn every_kind_draws_finite_geometry_for_many_frames() {
        let mut rng = SimRng::seed_from_u64(11);
        let vp = Viewport::new(640.0, 384.0);
        for kind in EntityKind::ALL {
            let mut e = Entity::spawn(kind, 1, vp, &mut rng);
            let mut s = RecordingSurface::new(vp.width, vp.height);
            for _ in 0..600 {
                e.update(vp, &mut rng);
                e.draw(&mut s, &mut rng);
            }
            assert!(ops_are_sane(&s.ops), "{kind:?} drew bad geometry");
            assert!(!s.ops.is_empty(), "{kind:?} drew nothing");
        }
    }

    #[test]
    fn draw_balances_save_and_restore() {
        let mut rng = SimRng::seed_from_u64(3);
        let vp = Viewport::new(640.0, 384.0);
        for kind in EntityKind::ALL {
            let e = Entity::spawn(kind, 0, vp, &mut rng);
            let mut s = RecordingSurface::new(vp.width, vp.height);
            e.draw(&mut s, &mut rng);
            let saves = s.ops.iter().filter(|o| **o == Op::Save).count();
            let restores = s.ops.iter().filter(|o| **o == Op::Restore).count();
            assert_eq!(saves, restores, "{kind:?}");
        }
    }

    #[test]
    fn reflect_is_sign_aware() {
        let mut v = -0.3;
        assert!(reflect(-1.0, &mut v, 100.0));
        assert_eq!(v, 0.3);
        assert!(reflect(-2.0, &mut v, 100.0));
        assert_eq!(v, 0.3);

        let mut v = 0.3;
        assert!(reflect(150.0, &mut v, 100.0));
        assert_eq!(v, -0.3);
        assert!(!reflect(50.0, &mut v, 100.0));
        assert_eq!(v, -0.3);
    }

    #[test]
    fn wrap_moves_to_the_far_side() {
        let mut x = -31.0;
        wrap(&mut x, 30.0, 200.0);
        assert_eq!(x, 230.0);
        wrap(&mut x, 30.0, 200.0);
        assert_eq!(x, 230.0);
        x = 231.0;
        wrap(&mut x, 30.0, 200.0);
        assert_eq!(x, -30.0);
    }
}
