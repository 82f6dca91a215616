// Copyright (c) 2026 rezky_nightky

use crate::color::Rgba;
use crate::entity::{Entity, EntityKind, SimRng};
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Neural,
    Matrix,
    AiParticles,
    FloatingOrbs,
    LightOrbs,
    NeonCyber,
    CosmicNebula,
    SolarParticles,
    Waves,
    SynthwaveRetro,
    TwinklingStars,
    CosmicCss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cohort {
    pub kind: EntityKind,
    pub count: usize,
}

const fn cohort(kind: EntityKind, count: usize) -> Cohort {
    Cohort { kind, count }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClearPolicy {
    FullClear,
    FadeTrail(Rgba),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    Canvas,
    CssStarfield,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantSpec {
    pub cohorts: &'static [Cohort],
    pub background: &'static str,
    pub clear: ClearPolicy,
    pub hud_overlay: bool,
    pub connections: bool,
    pub presentation: Presentation,
}

impl VariantSpec {
    pub const EMPTY: VariantSpec = VariantSpec {
        cohorts: &[],
        background: "transparent",
        clear: ClearPolicy::FullClear,
        hud_overlay: false,
        connections: false,
        presentation: Presentation::Canvas,
    };

    pub fn population(&self) -> usize {
        self.cohorts.iter().map(|c| c.count).sum()
    }
}

const fn canvas(cohorts: &'static [Cohort], background: &'static str) -> VariantSpec {
    VariantSpec {
        cohorts,
        background,
        clear: ClearPolicy::FullClear,
        hud_overlay: false,
        connections: false,
        presentation: Presentation::Canvas,
    }
}

const NEURAL: VariantSpec = VariantSpec {
    hud_overlay: true,
    connections: true,
    ..canvas(
        &[cohort(EntityKind::NeuralNode, 50)],
        "linear-gradient(135deg, #1e293b 0%, #312e81 25%, #4c1d95 50%, #334155 75%, #64748b 100%)",
    )
};

const MATRIX: VariantSpec = VariantSpec {
    clear: ClearPolicy::FadeTrail(Rgba::rgba8(0, 0, 0, 0.1)),
    ..canvas(
        &[cohort(EntityKind::MatrixChar, 50)],
        "linear-gradient(135deg, #000000 0%, #001100 50%, #002200 100%)",
    )
};

const AI_PARTICLES: VariantSpec = canvas(
    &[cohort(EntityKind::AIParticle, 35)],
    "linear-gradient(135deg, #0c0c0c 0%, #1a1a2e 50%, #16213e 100%)",
);

const FLOATING_ORBS: VariantSpec = canvas(&[cohort(EntityKind::FloatingOrb, 15)], "transparent");

const LIGHT_ORBS: VariantSpec = canvas(
    &[cohort(EntityKind::FloatingLightOrb, 20)],
    "linear-gradient(135deg, #fefce8 0%, #fef3c7 25%, #fde68a 50%, #fed7aa 75%, #fecaca 100%)",
);

const NEON_CYBER: VariantSpec = canvas(
    &[cohort(EntityKind::NeonCyberOrb, 18)],
    "linear-gradient(135deg, #0a0a0a 0%, #1a0a2e 25%, #16213e 50%, #0f3460 75%, #0e4b99 100%)",
);

const COSMIC_NEBULA: VariantSpec = VariantSpec {
    clear: ClearPolicy::FadeTrail(Rgba::rgba8(13, 20, 33, 0.02)),
    ..canvas(
        &[cohort(EntityKind::NebulaLayer, 3)],
        "radial-gradient(ellipse at center, #0d1421 0%, #1a0a2e 25%, #16213e 50%, #0f1419 75%, #000000 100%)",
    )
};

const SOLAR_PARTICLES: VariantSpec = canvas(
    &[
        cohort(EntityKind::FloatingBubble, 25),
        cohort(EntityKind::SolarParticle, 25),
    ],
    "linear-gradient(135deg, #fff8e1 0%, #ffecb3 20%, #ffe082 40%, #ffcc02 60%, #ff8f00 80%, #e65100 100%)",
);

const WAVES: VariantSpec = canvas(
    &[
        cohort(EntityKind::Wave, 6),
        cohort(EntityKind::FloatingLightOrb, 30),
    ],
    "linear-gradient(135deg, #fff3e0 0%, #ffe0b2 25%, #ffcc80 50%, #ffb74d 75%, #ff8f00 100%)",
);

const SYNTHWAVE_RETRO: VariantSpec = canvas(
    &[cohort(EntityKind::SynthwaveGrid, 1)],
    "linear-gradient(180deg, #0a0a0a 0%, #1a0a2e 30%, #2d1b69 60%, #ff006e 100%)",
);

const DEEP_SKY: &str = "radial-gradient(ellipse at bottom, #1b2735 0%, #090a0f 100%)";

const TWINKLING_STARS: VariantSpec = canvas(&[cohort(EntityKind::TwinklingStar, 50)], DEEP_SKY);

const COSMIC_CSS: VariantSpec = VariantSpec {
    presentation: Presentation::CssStarfield,
    ..canvas(&[], DEEP_SKY)
};

impl Variant {
    pub const ALL: [Variant; 12] = [
        Variant::Neural,
        Variant::Matrix,
        Variant::AiParticles,
        Variant::FloatingOrbs,
        Variant::LightOrbs,
        Variant::NeonCyber,
        Variant::CosmicNebula,
        Variant::SolarParticles,
        Variant::Waves,
        Variant::SynthwaveRetro,
        Variant::TwinklingStars,
        Variant::CosmicCss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Neural => "neural",
            Variant::Matrix => "matrix",
            Variant::AiParticles => "ai-particles",
            Variant::FloatingOrbs => "floating-orbs",
            Variant::LightOrbs => "light-orbs",
            Variant::NeonCyber => "neon-cyber",
            Variant::CosmicNebula => "cosmic-nebula",
            Variant::SolarParticles => "solar-particles",
            Variant::Waves => "waves",
            Variant::SynthwaveRetro => "synthwave-retro",
            Variant::TwinklingStars => "twinkling-stars",
            Variant::CosmicCss => "cosmic-css",
        }
    }

    pub fn from_name(name: &str) -> Option<Variant> {
        let name = name.trim();
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }

    pub fn spec(self) -> VariantSpec {
        match self {
            Variant::Neural => NEURAL,
            Variant::Matrix => MATRIX,
            Variant::AiParticles => AI_PARTICLES,
            Variant::FloatingOrbs => FLOATING_ORBS,
            Variant::LightOrbs => LIGHT_ORBS,
            Variant::NeonCyber => NEON_CYBER,
            Variant::CosmicNebula => COSMIC_NEBULA,
            Variant::SolarParticles => SOLAR_PARTICLES,
            Variant::Waves => WAVES,
            Variant::SynthwaveRetro => SYNTHWAVE_RETRO,
            Variant::TwinklingStars => TWINKLING_STARS,
            Variant::CosmicCss => COSMIC_CSS,
        }
    }

    pub fn cycle(self, forward: bool) -> Variant {
        let n = Variant::ALL.len();
        let i = Variant::ALL.iter().position(|v| *v == self).unwrap_or(0);
        let j = if forward { (i + 1) % n } else { (i + n - 1) % n };
        Variant::ALL[j]
    }
}

pub fn populate(spec: &VariantSpec, viewport: Viewport, rng: &mut SimRng) -> Vec<Entity> {
    let mut out = Vec::with_capacity(spec.population());
    for c in spec.cohorts {
        out.extend((0..c.count).map(|i| Entity::spawn(c.kind, i, viewport, rng)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::Background;
    use rand::SeedableRng;

    #[test]
    fn names_round_trip() {
        for v in Variant::ALL {
            assert_eq!(Variant::from_name(v.name()), Some(v));
        }
        assert_eq!(Variant::from_name(" Matrix "), Some(Variant::Matrix));
        assert_eq!(Variant::from_name("vaporwave"), None);
    }

    #[test]
    fn every_background_parses() {
        for v in Variant::ALL {
            assert!(
                Background::parse(v.spec().background).is_ok(),
                "{} background",
                v.name()
            );
        }
    }

    #[test]
    fn populations_match_the_table() {
        let counts: Vec<_> = Variant::ALL
            .iter()
            .map(|v| (v.name(), v.spec().population()))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("neural", 50),
                ("matrix", 50),
                ("ai-particles", 35),
                ("floating-orbs", 15),
                ("light-orbs", 20),
                ("neon-cyber", 18),
                ("cosmic-nebula", 3),
                ("solar-particles", 50),
                ("waves", 36),
                ("synthwave-retro", 1),
                ("twinkling-stars", 50),
                ("cosmic-css", 0),
            ]
        );
    }

    #[test]
    fn only_neural_has_overlay_and_links() {
        for v in Variant::ALL {
            let s = v.spec();
            assert_eq!(s.hud_overlay, v == Variant::Neural);
            assert_eq!(s.connections, v == Variant::Neural);
        }
    }

    #[test]
    fn trails_only_for_matrix_and_nebula() {
        for v in Variant::ALL {
            let trail = matches!(v.spec().clear, ClearPolicy::FadeTrail(_));
            assert_eq!(trail, matches!(v, Variant::Matrix | Variant::CosmicNebula));
        }
    }

    #[test]
    fn populate_preserves_cohort_order() {
        let mut rng = SimRng::seed_from_u64(1);
        let vp = Viewport::new(1024.0, 768.0);
        let kinds: Vec<_> = populate(&Variant::Waves.spec(), vp, &mut rng)
            .iter()
            .map(Entity::kind)
            .collect();
        assert_eq!(kinds.len(), 36);
        assert!(kinds[..6].iter().all(|k| *k == EntityKind::Wave));
        assert!(kinds[6..].iter().all(|k| *k == EntityKind::FloatingLightOrb));
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Variant::Neural.cycle(false), Variant::CosmicCss);
        assert_eq!(Variant::CosmicCss.cycle(true), Variant::Neural);
        assert_eq!(Variant::Matrix.cycle(true), Variant::AiParticles);
    }

    #[test]
    fn empty_spec_populates_nothing() {
        let mut rng = SimRng::seed_from_u64(2);
        let vp = Viewport::new(1024.0, 768.0);
        assert!(populate(&VariantSpec::EMPTY, vp, &mut rng).is_empty());
        assert!(Background::parse(VariantSpec::EMPTY.background)
            .map(|b| b.is_transparent())
            .unwrap_or(false));
    }
}
