//! Flappy Bird entities: the bird, a single pipe, and their hitboxes.
//!
//! Coordinates are playfield units with y growing downward; row 0 is the
//! top of the sky and `PlayfieldConfig::ground_y()` is the top of the ground.

use crate::config::BirdConfig;

/// Selectable bird colours, in the order the selection screen lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdSkin {
    Orange,
    Red,
    Green,
}

impl BirdSkin {
    pub const ALL: [BirdSkin; 3] = [BirdSkin::Orange, BirdSkin::Red, BirdSkin::Green];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Orange => 0,
            Self::Red => 1,
            Self::Green => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Orange => "Orange",
            Self::Red => "Red",
            Self::Green => "Green",
        }
    }

    /// Body colour as RGB.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Orange => (255, 165, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
        }
    }
}

/// Axis-aligned box used for overlap queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Hitbox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Shrink inward by `padding` on every side.
    ///
    /// Padding is capped at half of each dimension, so the result collapses
    /// to the centre line instead of turning inside out. A larger padding
    /// always yields a box contained in the one from a smaller padding.
    pub fn inset(&self, padding: f32) -> Self {
        let pad_x = padding.max(0.0).min(self.width() / 2.0);
        let pad_y = padding.max(0.0).min(self.height() / 2.0);
        Self {
            left: self.left + pad_x,
            top: self.top + pad_y,
            right: self.right - pad_x,
            bottom: self.bottom - pad_y,
        }
    }

    /// Strict horizontal overlap: touching edges do not count.
    pub fn overlaps_horizontally(&self, other: &Hitbox) -> bool {
        self.right > other.left && self.left < other.right
    }

    pub fn overlaps_vertically(&self, other: &Hitbox) -> bool {
        self.bottom > other.top && self.top < other.bottom
    }

    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.overlaps_horizontally(other) && self.overlaps_vertically(other)
    }
}

/// The player-controlled bird.
///
/// `x` never changes; the world scrolls past instead.
#[derive(Debug, Clone)]
pub struct Bird {
    x: f32,
    y: f32,
    velocity: f32,
    /// Visual tilt in degrees, negative = nose up.
    rotation: f32,
    skin: BirdSkin,
    physics: BirdConfig,
}

impl Bird {
    pub fn new(skin: BirdSkin, physics: BirdConfig) -> Self {
        Self {
            x: physics.start_x,
            y: physics.start_y,
            velocity: 0.0,
            rotation: 0.0,
            skin,
            physics,
        }
    }

    /// Back to the start position, at rest and level.
    pub fn reset(&mut self) {
        self.x = self.physics.start_x;
        self.y = self.physics.start_y;
        self.velocity = 0.0;
        self.rotation = 0.0;
    }

    /// Overwrite velocity with the upward impulse. Repeated flaps do not stack.
    pub fn flap(&mut self) {
        self.velocity = self.physics.flap_impulse;
    }

    /// Advance one tick of gravity, movement and tilt.
    pub fn update(&mut self) {
        let physics = &self.physics;

        self.velocity += physics.gravity;
        // Gravity only pushes downward, so only the downward speed is capped
        if self.velocity > physics.terminal_velocity {
            self.velocity = physics.terminal_velocity;
        }

        self.y += self.velocity;

        if self.velocity < 0.0 {
            self.rotation = (self.rotation - physics.rotation_speed).max(-physics.max_rotation);
        } else {
            self.rotation = (self.rotation + physics.rotation_speed).min(physics.max_rotation);
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn skin(&self) -> BirdSkin {
        self.skin
    }

    pub fn width(&self) -> f32 {
        self.physics.width
    }

    pub fn height(&self) -> f32 {
        self.physics.height
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.physics.height
    }

    /// Full visual bounds.
    pub fn bounds(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.x + self.width(), self.bottom())
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, y: f32, velocity: f32) {
        self.y = y;
        self.velocity = velocity;
    }
}

/// One top/bottom pipe pair. Shape is fixed at spawn; only `x` moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    x: f32,
    width: f32,
    gap_center: f32,
    gap_height: f32,
    /// Set once the bird has fully passed, so a pipe scores at most once.
    scored: bool,
}

impl Pipe {
    pub fn new(x: f32, gap_center: f32, width: f32, gap_height: f32) -> Self {
        Self {
            x,
            width,
            gap_center,
            gap_height,
            scored: false,
        }
    }

    /// Move left by `speed`.
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// True once the right edge has gone past the left edge of the playfield.
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap_center(&self) -> f32 {
        self.gap_center
    }

    pub fn gap_height(&self) -> f32 {
        self.gap_height
    }

    /// Bottom edge of the top pipe.
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    /// Top edge of the bottom pipe.
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub(crate) fn mark_scored(&mut self) {
        self.scored = true;
    }

    /// The bird's left edge is past this pipe's right edge and it has not scored yet.
    pub fn is_passed_by(&self, bird_left: f32) -> bool {
        !self.scored && bird_left > self.right()
    }

    /// Solid part above the gap.
    pub fn top_hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, 0.0, self.right(), self.gap_top())
    }

    /// Solid part below the gap, down to the ground line.
    pub fn bottom_hitbox(&self, ground_y: f32) -> Hitbox {
        Hitbox::new(self.x, self.gap_bottom(), self.right(), ground_y)
    }
}
