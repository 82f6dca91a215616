// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::background::Background;
use crate::color::ColorMode;
use crate::entity::SimRng;
use crate::frame::Frame;
use crate::registry::{Presentation, Variant, VariantSpec};
use crate::scene::Scene;
use crate::scheduler::{FrameId, FrameScheduler};
use crate::starfield::Starfield;
use crate::viewport::SurfaceManager;

pub const DEFAULT_VARIANT: &str = "neural";

fn resolve(name: &str) -> (Option<Variant>, VariantSpec, Background) {
    let variant = Variant::from_name(name);
    let spec = match variant {
        Some(v) => v.spec(),
        None => {
            warn!(variant = name, "unknown variant, mounting an empty background");
            VariantSpec::EMPTY
        }
    };
    let background = Background::parse(spec.background).unwrap_or_else(|err| {
        warn!(%err, "unusable background, falling back to transparent");
        Background::Transparent
    });
    (variant, spec, background)
}

pub struct Stage {
    name: String,
    variant: Option<Variant>,
    spec: VariantSpec,
    background: Background,
    surface: SurfaceManager,
    scheduler: FrameScheduler,
    scene: Option<Scene>,
    starfield: Option<Starfield>,
    seed: Option<u64>,
    mounts: u64,
    mounted_at: Option<Instant>,
}

impl Stage {
    pub fn new(variant: &str) -> Self {
        let (resolved, spec, background) = resolve(variant);
        Self {
            name: variant.to_string(),
            variant: resolved,
            spec,
            background,
            surface: SurfaceManager::new(),
            scheduler: FrameScheduler::new(),
            scene: None,
            starfield: None,
            seed: None,
            mounts: 0,
            mounted_at: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_attached()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    fn next_rng(&mut self) -> SimRng {
        self.mounts += 1;
        match self.seed {
            Some(seed) => SimRng::seed_from_u64(seed ^ self.mounts),
            None => SimRng::from_os_rng(),
        }
    }

    pub fn mount(&mut self, cols: u16, rows: u16) -> bool {
        if self.is_mounted() {
            self.unmount();
        }
        let canvas = self.spec.presentation == Presentation::Canvas;
        if let Err(err) = self.surface.attach(cols, rows, canvas) {
            warn!(%err, variant = %self.name, "mount skipped");
            return false;
        }

        let mut rng = self.next_rng();
        match self.spec.presentation {
            Presentation::Canvas => {
                let scene = Scene::new(&self.spec, self.surface.viewport(), rng);
                info!(
                    variant = %self.name,
                    entities = scene.len(),
                    cols,
                    rows,
                    "mounted"
                );
                self.scene = Some(scene);
                self.scheduler.start();
            }
            Presentation::CssStarfield => {
                let starfield = Starfield::new(&mut rng);
                info!(variant = %self.name, stars = starfield.star_count(), cols, rows, "mounted");
                self.starfield = Some(starfield);
                self.mounted_at = Some(Instant::now());
            }
        }
        true
    }

    pub fn unmount(&mut self) {
        self.scheduler.cancel();
        self.surface.detach();
        let dropped = self.scene.take().map(|s| s.len()).unwrap_or(0);
        self.starfield = None;
        self.mounted_at = None;
        info!(variant = %self.name, entities = dropped, "unmounted");
    }

    pub fn set_variant(&mut self, name: &str) -> bool {
        let was = self.is_mounted().then(|| self.surface.cells());
        self.unmount();

        let (resolved, spec, background) = resolve(name);
        info!(from = %self.name, to = name, "variant switch");
        self.name = name.to_string();
        self.variant = resolved;
        self.spec = spec;
        self.background = background;

        match was {
            Some((cols, rows)) => self.mount(cols, rows),
            None => false,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        let resized = self.surface.on_resize(cols, rows);
        if resized {
            debug!(cols, rows, "stage resized");
        }
        resized
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.scheduler.pending()
    }

    /// Fires frame `id`. Stale ids (cancelled, or from before a remount)
    /// are ignored.
    pub fn on_frame(&mut self, id: FrameId) -> bool {
        let Self {
            scheduler,
            scene,
            surface,
            ..
        } = self;
        scheduler.run_frame(id, || {
            if let (Some(scene), Some(canvas)) = (scene.as_mut(), surface.canvas_mut()) {
                scene.tick(canvas);
            }
        })
    }

    pub fn advance(&mut self) -> bool {
        match self.pending_frame() {
            Some(id) => self.on_frame(id),
            None => false,
        }
    }

    pub fn compose(&self, frame: &mut Frame, mode: ColorMode) {
        let elapsed = self
            .mounted_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);
        self.compose_at(frame, mode, elapsed);
    }

    pub fn compose_at(&self, frame: &mut Frame, mode: ColorMode, elapsed: Duration) {
        if !self.is_mounted() {
            frame.clear();
            return;
        }
        frame.compose(self.surface.canvas(), &self.background, mode);
        if let Some(starfield) = &self.starfield {
            starfield.paint(frame, elapsed, mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::entity::EntityKind;

    fn census(stage: &Stage) -> Vec<(EntityKind, usize)> {
        stage.scene().map(Scene::census).unwrap_or_default()
    }

    #[test]
    fn mount_starts_the_frame_loop() {
        let mut s = Stage::new("neural").with_seed(1);
        assert!(s.pending_frame().is_none());
        assert!(s.mount(80, 24));
        assert!(s.is_running());
        assert_eq!(census(&s), vec![(EntityKind::NeuralNode, 50)]);
        assert!(s.advance());
        assert!(s.advance());
    }

    #[test]
    fn unavailable_surface_never_starts() {
        let mut s = Stage::new("matrix").with_seed(2);
        assert!(!s.mount(0, 24));
        assert!(!s.is_mounted());
        assert!(s.pending_frame().is_none());
        assert!(s.scene().is_none());
    }

    #[test]
    fn unknown_variant_mounts_nothing_over_transparent() {
        let mut s = Stage::new("vaporwave").with_seed(3);
        assert!(s.variant().is_none());
        assert!(s.background().is_transparent());
        assert!(s.mount(40, 12));
        assert!(s.scene().is_some_and(Scene::is_empty));
        assert!(s.advance());

        let mut f = Frame::new(40, 12);
        s.compose(&mut f, ColorMode::TrueColor);
        assert!((0..40 * 12).all(|i| f.cell_at_index(i) == Cell::BLANK));
    }

    #[test]
    fn switching_variants_never_merges_populations() {
        let mut s = Stage::new("neural").with_seed(4);
        assert!(s.mount(80, 24));
        let old = s.pending_frame().unwrap();
        assert!(s.set_variant("matrix"));
        assert_eq!(census(&s), vec![(EntityKind::MatrixChar, 50)]);
        assert!(!s.on_frame(old));
        assert!(s.advance());
        assert_eq!(census(&s), vec![(EntityKind::MatrixChar, 50)]);
    }

    #[test]
    fn switching_while_unmounted_stays_unmounted() {
        let mut s = Stage::new("neural");
        assert!(!s.set_variant("waves"));
        assert_eq!(s.variant(), Some(Variant::Waves));
        assert!(!s.is_mounted());
    }

    #[test]
    fn unmount_cancels_the_pending_frame() {
        let mut s = Stage::new("ai-particles").with_seed(5);
        assert!(s.mount(80, 24));
        let id = s.pending_frame().unwrap();
        s.unmount();
        assert!(!s.on_frame(id));
        assert!(s.scene().is_none());
        assert!(!s.is_running());
    }

    #[test]
    fn resize_before_mount_is_ignored() {
        let mut s = Stage::new("neural");
        assert!(!s.resize(100, 30));
        assert!(s.mount(80, 24));
        assert!(s.resize(100, 30));
        assert!(!s.resize(0, 30));
    }

    #[test]
    fn resize_keeps_the_population() {
        let mut s = Stage::new("neon-cyber").with_seed(6);
        assert!(s.mount(80, 24));
        assert!(s.advance());
        assert!(s.resize(40, 12));
        assert_eq!(census(&s), vec![(EntityKind::NeonCyberOrb, 18)]);
        assert!(s.advance());
    }

    #[test]
    fn css_starfield_has_no_scene_or_scheduler() {
        let mut s = Stage::new("cosmic-css").with_seed(7);
        assert!(s.mount(120, 40));
        assert!(s.is_mounted());
        assert!(s.scene().is_none());
        assert!(s.pending_frame().is_none());

        let mut f = Frame::new(120, 40);
        s.compose_at(&mut f, ColorMode::TrueColor, Duration::from_secs(3));
        let stars = (0..120 * 40)
            .filter(|&i| matches!(f.cell_at_index(i).ch, '·' | '•' | '*'))
            .count();
        assert!(stars > 0);
        assert!(f.cell_at_index(0).bg.is_some());
    }

    #[test]
    fn seeded_mounts_are_reproducible_but_distinct() {
        let positions = |stage: &Stage| -> Vec<(f32, f32)> {
            stage
                .scene()
                .map(|sc| {
                    sc.entities()
                        .iter()
                        .filter_map(|e| e.as_neural())
                        .map(|n| (n.position().x, n.position().y))
                        .collect()
                })
                .unwrap_or_default()
        };
        let mut a = Stage::new("neural").with_seed(8);
        let mut b = Stage::new("neural").with_seed(8);
        assert!(a.mount(80, 24) && b.mount(80, 24));
        assert_eq!(positions(&a), positions(&b));
        let first = positions(&a);
        assert!(a.mount(80, 24));
        assert_ne!(positions(&a), first);
    }

    #[test]
    fn nebula_frames_fade_instead_of_clearing() {
        let mut s = Stage::new("cosmic-nebula").with_seed(9);
        assert!(s.mount(60, 20));
        for _ in 0..5 {
            assert!(s.advance());
        }
        let mut f = Frame::new(60, 20);
        s.compose(&mut f, ColorMode::Color256);
        assert!((0..60 * 20).all(|i| f.cell_at_index(i).bg.is_some()));
    }

    #[test]
    fn matrix_keeps_fifty_chars_over_a_hundred_frames() {
        let mut s = Stage::new("matrix").with_seed(10);
        assert!(s.mount(80, 24));
        for _ in 0..100 {
            assert!(s.advance());
        }
        assert_eq!(census(&s), vec![(EntityKind::MatrixChar, 50)]);
        let mut f = Frame::new(80, 24);
        s.compose(&mut f, ColorMode::TrueColor);
        let glyphs = (0..80 * 24)
            .filter(|&i| {
                let c = f.cell_at_index(i).ch;
                c == '0' || c == '1' || ('\u{FF66}'..='\u{FF9D}').contains(&c)
            })
            .count();
        assert!(glyphs > 0);
    }
}
