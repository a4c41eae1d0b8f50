/// Decides which display frames are logical ticks.
pub trait TickSource {
    /// Called once per display frame, returns `true` when a logical tick is due.
    fn poll(&mut self) -> bool;
}

/// Fires on every `n`th frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameDivider {
    frames_per_step: u16,
    frame: u16,
}

impl FrameDivider {
    pub fn new(frames_per_step: u16) -> Self {
        Self {
            frames_per_step: frames_per_step.max(1),
            frame: 0,
        }
    }

    pub fn frames_per_step(&self) -> u16 {
        self.frames_per_step
    }
}

impl TickSource for FrameDivider {
    fn poll(&mut self) -> bool {
        self.frame = (self.frame + 1) % self.frames_per_step;
        self.frame == 0
    }
}

/// Every frame is a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EveryFrame;

impl TickSource for EveryFrame {
    fn poll(&mut self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_fires_on_every_nth_frame() {
        let mut divider = FrameDivider::new(4);

        let fired: [bool; 8] = core::array::from_fn(|_| divider.poll());

        assert_eq!(fired, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn zero_divider_fires_every_frame() {
        let mut divider = FrameDivider::new(0);

        assert_eq!(divider.frames_per_step(), 1);
        assert!(divider.poll());
        assert!(divider.poll());
    }
}
