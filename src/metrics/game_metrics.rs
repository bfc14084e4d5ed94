use std::time::{Duration, Instant};

/// Per-session counters shown in the HUD
pub struct GameMetrics {
    pub round_started: Instant,
    pub elapsed_time: Duration,
    pub rounds_played: u32,
    pub best_this_session: u32,
    pub longest_body: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            elapsed_time: Duration::ZERO,
            rounds_played: 0,
            best_this_session: 0,
            longest_body: 0,
        }
    }

    /// Refresh the round timer; frozen while `running` is false
    pub fn update(&mut self, running: bool) {
        if running {
            self.elapsed_time = self.round_started.elapsed();
        } else {
            // Shift the origin so paused time is not counted
            let now = Instant::now();
            self.round_started = now.checked_sub(self.elapsed_time).unwrap_or(now);
        }
    }

    pub fn observe_length(&mut self, length: usize) {
        self.longest_body = self.longest_body.max(length);
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.rounds_played += 1;
        if final_score > self.best_this_session {
            self.best_this_session = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_session_best_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10);
        assert_eq!(metrics.best_this_session, 10);
        assert_eq!(metrics.rounds_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.best_this_session, 10);
        assert_eq!(metrics.rounds_played, 2);
    }

    #[test]
    fn test_longest_body_only_grows() {
        let mut metrics = GameMetrics::new();
        metrics.observe_length(4);
        metrics.observe_length(2);
        assert_eq!(metrics.longest_body, 4);
    }

    #[test]
    fn test_round_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update(true);
        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_round_start();
        metrics.update(true);
        assert!(metrics.elapsed_time.as_millis() < 50);
    }

    #[test]
    fn test_paused_time_is_not_counted() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(3);
        metrics.update(false);
        assert_eq!(metrics.elapsed_time, Duration::from_secs(3));
        metrics.update(true);
        assert!(metrics.elapsed_time >= Duration::from_secs(3));
    }
}
