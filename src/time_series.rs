/// Live speed sampled once per elapsed second of a practice session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    pub t: f64,
    pub gross_wpm: f64,
    pub net_wpm: f64,
}

impl SpeedSample {
    pub fn new(t: f64, gross_wpm: f64, net_wpm: f64) -> Self {
        Self {
            t,
            gross_wpm,
            net_wpm,
        }
    }

    pub fn net_point(&self) -> (f64, f64) {
        (self.t, self.net_wpm)
    }

    pub fn gross_point(&self) -> (f64, f64) {
        (self.t, self.gross_wpm)
    }
}
