/// Axis-aligned bounding boxes and the overlap test every pairing in the
/// tick goes through.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box centred on `(x, y)` reaching `half_width` / `half_height` out on
    /// each side.
    pub fn centered(x: f32, y: f32, half_width: f32, half_height: f32) -> Self {
        Self::new(x - half_width, y - half_height, x + half_width, y + half_height)
    }

    /// Boxes overlap unless one lies strictly to one side of the other.
    /// Touching edges count as a hit.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_y < other.min_y
            || self.min_y > other.max_y)
    }

    /// Inclusive point test, used for button hit-testing.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Same box moved vertically by `dy`.
    pub fn shifted(&self, dy: f32) -> Self {
        Self::new(self.min_x, self.min_y + dy, self.max_x, self.max_y + dy)
    }
}
