//! 帧统计模块
//!
//! FrameMetrics 用于跟踪帧率和帧时间，每秒刷新一次。

use std::time::{Duration, Instant};

/// 帧统计（帧率、帧时间）
#[derive(Debug)]
pub struct FrameMetrics {
    frame_count: u32,
    total_frames: u64,
    last_update: Instant,
    fps: f32,
    frame_time_ms: f32,
}

impl FrameMetrics {
    /// 创建新的统计器
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// 以指定时间点为起点创建统计器
    pub fn starting_at(start: Instant) -> Self {
        Self {
            frame_count: 0,
            total_frames: 0,
            last_update: start,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// 记录一帧
    ///
    /// 返回 `true` 表示这次调用刷新了 FPS。
    pub fn record_frame(&mut self) -> bool {
        self.record_frame_at(Instant::now())
    }

    /// 在给定时间点记录一帧
    pub fn record_frame_at(&mut self, now: Instant) -> bool {
        self.frame_count += 1;
        self.total_frames += 1;
        let elapsed = now.saturating_duration_since(self.last_update);

        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_time_ms = 1000.0 / self.fps;
            self.frame_count = 0;
            self.last_update = now;
            true
        } else {
            false
        }
    }

    /// 当前 FPS
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// 当前帧时间（毫秒）
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }

    /// 累计帧数
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_updates_once_per_second() {
        let start = Instant::now();
        let mut metrics = FrameMetrics::starting_at(start);

        for i in 1..60u64 {
            assert!(!metrics.record_frame_at(start + Duration::from_millis(i * 16)));
        }
        assert_eq!(metrics.fps(), 0.0);

        assert!(metrics.record_frame_at(start + Duration::from_secs(1)));
        assert!((metrics.fps() - 60.0).abs() < 1e-3);
        assert!((metrics.frame_time_ms() - 16.666).abs() < 0.01);
        assert_eq!(metrics.total_frames(), 60);
    }

    #[test]
    fn test_counter_resets_after_update() {
        let start = Instant::now();
        let mut metrics = FrameMetrics::starting_at(start);

        metrics.record_frame_at(start + Duration::from_secs(2));
        assert!((metrics.fps() - 0.5).abs() < 1e-4);

        for i in 1..=30u64 {
            metrics.record_frame_at(start + Duration::from_secs(2) + Duration::from_millis(i * 33));
        }
        assert!(metrics.record_frame_at(start + Duration::from_secs(3)));
        assert!((metrics.fps() - 31.0).abs() < 1e-3);
        assert_eq!(metrics.total_frames(), 32);
    }
}
