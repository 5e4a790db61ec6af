//! Particle field simulation
//!
//! Drifting dots joined by faint lines when close, pushed away from the
//! pointer and spawned on click. Pure state: drawing lives in
//! `crate::background`, so this compiles and tests without a browser.

/// Visual and interaction parameters for the background
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    /// Particles per `density_area`
    pub number: u32,
    /// Reference area (in thousands of CSS px²) for `number`
    pub density_area: f64,
    pub color: &'static str,
    pub opacity: f64,
    /// Maximum radius
    pub size: f64,
    pub size_random: bool,
    pub link_distance: f64,
    pub link_opacity: f64,
    pub link_width: f64,
    /// Pixels per frame at 60 fps is `speed / 2`
    pub speed: f64,
    pub repulse_distance: f64,
    pub push_count: usize,
    pub retina_detect: bool,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            number: 80,
            density_area: 800.0,
            color: "#8CC5D0",
            opacity: 0.5,
            size: 3.0,
            size_random: true,
            link_distance: 150.0,
            link_opacity: 0.4,
            link_width: 1.0,
            speed: 6.0,
            repulse_distance: 100.0,
            push_count: 4,
            retina_detect: true,
        }
    }
}

/// Strongest single-frame repulse displacement
const MAX_REPULSE_STEP: f64 = 50.0;
const REPULSE_VELOCITY: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

/// Line between two nearby particles
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub opacity: f64,
}

pub struct ParticleField {
    config: ParticleConfig,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    pointer: Option<(f64, f64)>,
    rng: RngState,
}

impl ParticleField {
    /// Fill a `width` x `height` area (CSS px) with particles
    pub fn new(config: ParticleConfig, width: f64, height: f64) -> Self {
        let mut field = Self {
            config,
            particles: Vec::new(),
            width,
            height,
            pointer: None,
            rng: RngState::new(),
        };
        let count = field.target_count();
        for _ in 0..count {
            let (x, y) = (field.rng.next_f64() * width, field.rng.next_f64() * height);
            field.spawn(x, y);
        }
        field
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle count for the current area, scaled from `number` per
    /// `density_area`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn target_count(&self) -> usize {
        let area = self.width * self.height / 1000.0;
        (area * f64::from(self.config.number) / self.config.density_area).round().max(0.0) as usize
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        for p in &mut self.particles {
            p.x = p.x.clamp(0.0, width);
            p.y = p.y.clamp(0.0, height);
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
        self.pointer = pointer;
    }

    /// Click interaction: add `push_count` particles at the pointer
    pub fn push(&mut self, x: f64, y: f64) {
        for _ in 0..self.config.push_count {
            self.spawn(x, y);
        }
    }

    /// Advance by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        // Movement is specified per frame at 60 fps
        let frames = (dt * 60.0).clamp(0.0, 4.0);
        let step = self.config.speed / 2.0 * frames;
        let (w, h) = (self.width, self.height);

        for p in &mut self.particles {
            p.x += p.vx * step;
            p.y += p.vy * step;

            // Out mode: leave one edge, come back on the opposite one
            if p.x - p.radius > w {
                p.x = -p.radius;
            } else if p.x + p.radius < 0.0 {
                p.x = w + p.radius;
            }
            if p.y - p.radius > h {
                p.y = -p.radius;
            } else if p.y + p.radius < 0.0 {
                p.y = h + p.radius;
            }
        }

        if let Some(pointer) = self.pointer {
            self.repulse(pointer, frames);
        }
    }

    fn repulse(&mut self, (mx, my): (f64, f64), frames: f64) {
        let radius = self.config.repulse_distance;
        for p in &mut self.particles {
            let (dx, dy) = (p.x - mx, p.y - my);
            let dist = dx.hypot(dy);
            if dist >= radius || dist == 0.0 {
                continue;
            }
            let falloff = 1.0 - (dist / radius).powi(2);
            let push = (REPULSE_VELOCITY * falloff).clamp(0.0, MAX_REPULSE_STEP) * frames.min(1.0);
            p.x += dx / dist * push;
            p.y += dy / dist * push;
        }
    }

    /// Pairs closer than `link_distance`, faded by distance
    pub fn links(&self) -> Vec<Link> {
        let max = self.config.link_distance;
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dist = (a.x - b.x).hypot(a.y - b.y);
                if dist > max {
                    continue;
                }
                let opacity = self.config.link_opacity * (1.0 - dist / max);
                if opacity > 0.0 {
                    links.push(Link {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        opacity,
                    });
                }
            }
        }
        links
    }

    fn spawn(&mut self, x: f64, y: f64) {
        let radius = if self.config.size_random {
            // Keep dots visible
            (self.rng.next_f64() * self.config.size).max(0.5)
        } else {
            self.config.size
        };
        // No preferred direction
        let vx = self.rng.next_f64() - 0.5;
        let vy = self.rng.next_f64() - 0.5;
        self.particles.push(Particle { x, y, vx, vy, radius });
    }
}

// PCG Random
struct RngState {
    state: u64,
    inc: u64,
}

impl RngState {
    const fn new() -> Self {
        Self {
            state: 0x853C_49E6_748F_EA9B,
            inc: (0xDA3E_39CB_94B9_5BDB << 1) | 1,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next()) / f64::from(u32::MAX)
    }
}
