// Copyright (c) 2026 rezky_nightky

use std::collections::BTreeMap;

use crate::entity::{draw_connections, Entity, EntityKind, NeuralNode, SimRng, Simulate};
use crate::hud;
use crate::registry::{populate, ClearPolicy, VariantSpec};
use crate::surface::Surface;
use crate::viewport::Viewport;

pub struct Scene {
    entities: Vec<Entity>,
    clear: ClearPolicy,
    hud: bool,
    connections: bool,
    rng: SimRng,
}

impl Scene {
    pub fn new(spec: &VariantSpec, viewport: Viewport, mut rng: SimRng) -> Self {
        let entities = populate(spec, viewport, &mut rng);
        Self {
            entities,
            clear: spec.clear,
            hud: spec.hud_overlay,
            connections: spec.connections,
            rng,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn census(&self) -> Vec<(EntityKind, usize)> {
        let mut counts = BTreeMap::new();
        for e in &self.entities {
            *counts.entry(e.kind()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// One frame: clear, overlay, links, then update and draw each entity.
    ///
    /// Links are drawn from the positions the nodes had before this frame's
    /// update, so they trail the nodes by one frame.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        let (w, h) = surface.size();
        let viewport = Viewport::new(w, h);

        match self.clear {
            ClearPolicy::FullClear => surface.clear(),
            ClearPolicy::FadeTrail(color) => surface.fill_rect(0.0, 0.0, w, h, color),
        }

        if self.hud {
            hud::draw(surface, self.entities.len());
        }

        if self.connections {
            let nodes: Vec<&NeuralNode> =
                self.entities.iter().filter_map(Entity::as_neural).collect();
            draw_connections(&nodes, surface, &mut self.rng);
        }

        for e in &mut self.entities {
            e.update(viewport, &mut self.rng);
            e.draw(surface, &mut self.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::link_weight;
    use crate::registry::Variant;
    use crate::surface::testing::{Op, RecordingSurface};
    use crate::surface::Point;
    use rand::SeedableRng;

    fn scene(v: Variant, vp: Viewport, seed: u64) -> Scene {
        Scene::new(&v.spec(), vp, SimRng::seed_from_u64(seed))
    }

    fn neural_positions(s: &Scene) -> Vec<Point> {
        s.entities()
            .iter()
            .filter_map(Entity::as_neural)
            .map(NeuralNode::position)
            .collect()
    }

    #[test]
    fn neural_frame_runs_in_order() {
        let vp = Viewport::new(640.0, 384.0);
        let mut sc = scene(Variant::Neural, vp, 1);
        let before = neural_positions(&sc);
        let mut surf = RecordingSurface::new(vp.width, vp.height);
        sc.tick(&mut surf);
        let after = neural_positions(&sc);

        assert_eq!(surf.ops[0], Op::Clear);
        let hud_end = surf
            .ops
            .iter()
            .position(|o| *o == Op::Text("SE_SECTOR".into()))
            .unwrap();

        let is_link = |o: &Op| match o {
            Op::StrokeLine { from, to, .. } => before.contains(from) && before.contains(to),
            _ => false,
        };
        let first_link = surf.ops.iter().position(is_link).unwrap();
        let last_link = surf.ops.iter().rposition(is_link).unwrap();
        let first_body = surf
            .ops
            .iter()
            .position(|o| matches!(o, Op::FillCircle { center, .. } if after.contains(center)))
            .unwrap();

        assert!(hud_end < first_link);
        assert!(last_link < first_body);
    }

    #[test]
    fn one_link_per_pair_in_range() {
        let vp = Viewport::new(640.0, 384.0);
        let mut sc = scene(Variant::Neural, vp, 2);
        let nodes: Vec<NeuralNode> = sc
            .entities()
            .iter()
            .filter_map(Entity::as_neural)
            .cloned()
            .collect();
        let before: Vec<Point> = nodes.iter().map(NeuralNode::position).collect();
        let mut expected = 0;
        for (i, p) in nodes.iter().enumerate() {
            for q in &nodes[i + 1..] {
                if link_weight(p, q).is_some() {
                    expected += 1;
                }
            }
        }

        let mut surf = RecordingSurface::new(vp.width, vp.height);
        sc.tick(&mut surf);
        let links = surf
            .lines()
            .iter()
            .filter(|(a, b, _)| before.contains(a) && before.contains(b))
            .count();
        assert!(expected > 0);
        assert_eq!(links, expected);
    }

    #[test]
    fn fade_trail_paints_instead_of_clearing() {
        let vp = Viewport::new(640.0, 384.0);
        let mut sc = scene(Variant::Matrix, vp, 3);
        let mut surf = RecordingSurface::new(vp.width, vp.height);
        sc.tick(&mut surf);
        assert!(matches!(surf.ops[0], Op::FillRect(c) if (c.a - 0.1).abs() < 1e-6));
        assert!(!surf.ops.contains(&Op::Clear));
        assert_eq!(surf.ops.iter().filter(|o| matches!(o, Op::Text(_))).count(), 50);
    }

    #[test]
    fn matrix_census_is_fifty_chars() {
        let sc = scene(Variant::Matrix, Viewport::new(640.0, 384.0), 4);
        assert_eq!(sc.census(), vec![(EntityKind::MatrixChar, 50)]);
    }

    #[test]
    fn solar_census_has_both_cohorts() {
        let sc = scene(Variant::SolarParticles, Viewport::new(640.0, 384.0), 5);
        assert_eq!(
            sc.census(),
            vec![(EntityKind::FloatingBubble, 25), (EntityKind::SolarParticle, 25)]
        );
    }

    #[test]
    fn nebula_layers_advance_every_frame() {
        let vp = Viewport::new(800.0, 600.0);
        let mut sc = scene(Variant::CosmicNebula, vp, 6);
        let mut surf = RecordingSurface::new(vp.width, vp.height);
        let times = |s: &Scene| -> Vec<f32> {
            s.entities()
                .iter()
                .filter_map(Entity::as_nebula)
                .map(|n| n.time())
                .collect()
        };
        let indices: Vec<usize> = sc
            .entities()
            .iter()
            .filter_map(Entity::as_nebula)
            .map(|n| n.index())
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let mut last = times(&sc);
        for _ in 0..30 {
            sc.tick(&mut surf);
            let now = times(&sc);
            assert!(now.iter().zip(&last).all(|(n, l)| n > l));
            last = now;
        }
    }

    #[test]
    fn empty_scene_only_clears() {
        let mut sc = Scene::new(
            &VariantSpec::EMPTY,
            Viewport::new(100.0, 100.0),
            SimRng::seed_from_u64(7),
        );
        let mut surf = RecordingSurface::new(100.0, 100.0);
        sc.tick(&mut surf);
        assert!(sc.is_empty());
        assert_eq!(surf.ops, vec![Op::Clear]);
    }
}
