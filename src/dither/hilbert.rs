//! Hilbert space-filling curve traversal.
//!
//! The curve is generated for the smallest power-of-two square covering the
//! image; cells falling outside the image bounds are skipped, so every pixel
//! is visited exactly once. The recursive construction is flattened into an
//! explicit frame stack so the traversal can be driven incrementally.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurveDirection {
    Up,
    Left,
    Right,
    Down,
}

/// One event of the curve traversal.
///
/// `Enter` marks descent into a recursion frame and carries the number of
/// cells emitted so far; it is the natural place to throttle progress
/// reporting. `Cell` is an in-bounds pixel visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CurveEvent {
    Enter { index: usize },
    Cell { x: usize, y: usize },
}

#[derive(Debug)]
struct Frame {
    level: u32,
    direction: CurveDirection,
    phase: u8,
}

/// Sub-curve orientations entered from `direction`, in traversal order.
fn walks(direction: CurveDirection) -> [CurveDirection; 4] {
    use CurveDirection::*;
    match direction {
        Up => [Left, Up, Up, Right],
        Left => [Up, Left, Left, Down],
        Right => [Down, Right, Right, Up],
        Down => [Right, Down, Down, Left],
    }
}

/// Moves between the sub-curves of `direction`, in traversal order.
fn moves(direction: CurveDirection) -> [CurveDirection; 3] {
    use CurveDirection::*;
    match direction {
        Up => [Down, Right, Up],
        Left => [Right, Down, Left],
        Right => [Left, Up, Right],
        Down => [Up, Left, Down],
    }
}

#[derive(Debug)]
pub(crate) struct HilbertWalker {
    width: i64,
    height: i64,
    stack: Vec<Frame>,
    x: i64,
    y: i64,
    index: usize,
    final_visit_done: bool,
}

impl HilbertWalker {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let max_bound = width.max(height) as f64;
        let level = (max_bound.ln() / 2f64.ln() + 1.0).floor();
        let mut stack = Vec::new();
        if level >= 1.0 {
            stack.push(Frame {
                level: level as u32,
                direction: CurveDirection::Up,
                phase: 0,
            });
        }
        Self {
            width: width as i64,
            height: height as i64,
            stack,
            x: 0,
            y: 0,
            index: 0,
            final_visit_done: false,
        }
    }

    /// Emits the current cell if it lies inside the image, then moves.
    fn visit(&mut self, direction: Option<CurveDirection>) -> Option<CurveEvent> {
        let cell = if self.x >= 0 && self.x < self.width && self.y >= 0 && self.y < self.height {
            self.index += 1;
            Some(CurveEvent::Cell {
                x: self.x as usize,
                y: self.y as usize,
            })
        } else {
            None
        };
        match direction {
            Some(CurveDirection::Left) => self.x -= 1,
            Some(CurveDirection::Right) => self.x += 1,
            Some(CurveDirection::Up) => self.y -= 1,
            Some(CurveDirection::Down) => self.y += 1,
            None => {}
        }
        cell
    }
}

impl Iterator for HilbertWalker {
    type Item = CurveEvent;

    fn next(&mut self) -> Option<CurveEvent> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                // The curve ends one cell short; close it out.
                if self.final_visit_done {
                    return None;
                }
                self.final_visit_done = true;
                match self.visit(None) {
                    Some(cell) => return Some(cell),
                    None => return None,
                }
            };
            let level = frame.level;
            let direction = frame.direction;
            let phase = frame.phase;
            frame.phase += 1;
            match phase {
                0 => return Some(CurveEvent::Enter { index: self.index }),
                1 | 3 | 5 => {
                    let child = walks(direction)[(phase / 2) as usize];
                    if level > 1 {
                        self.stack.push(Frame {
                            level: level - 1,
                            direction: child,
                            phase: 0,
                        });
                    }
                }
                2 | 4 | 6 => {
                    let step = moves(direction)[(phase / 2 - 1) as usize];
                    if let Some(cell) = self.visit(Some(step)) {
                        return Some(cell);
                    }
                }
                _ => {
                    let child = walks(direction)[3];
                    self.stack.pop();
                    if level > 1 {
                        self.stack.push(Frame {
                            level: level - 1,
                            direction: child,
                            phase: 0,
                        });
                    }
                }
            }
        }
    }
}
